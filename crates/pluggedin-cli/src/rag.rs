//! RAG command - query the knowledge base

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use pluggedin_sdk::PluggedIn;
use serde_json::json;

use crate::output::print_json;

/// Query the knowledge base
#[derive(Args, Debug)]
pub struct RagArgs {
    #[command(subcommand)]
    pub command: RagCommand,
}

#[derive(Subcommand, Debug)]
pub enum RagCommand {
    /// Ask a question and print only the answer
    Ask {
        /// Question text
        query: String,
    },

    /// Ask a question and print the answer with its sources
    Query {
        /// Question text
        query: String,
    },

    /// List documents relevant to a query
    Docs {
        /// Query text
        query: String,

        /// Maximum number of documents
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Show storage usage for a user
    Stats {
        /// User id
        user_id: String,
    },

    /// Check whether the knowledge base is reachable
    Health,
}

/// Execute the rag command
pub async fn execute(args: RagArgs, client: &PluggedIn) -> Result<()> {
    let rag = client.rag();

    match args.command {
        RagCommand::Ask { query } => {
            let answer = rag.ask_question(&query).await.context("asking knowledge base")?;
            println!("{}", answer);
            Ok(())
        }
        RagCommand::Query { query } => {
            let result = rag
                .query_with_sources(&query)
                .await
                .context("querying knowledge base")?;
            print_json(&result)
        }
        RagCommand::Docs { query, limit } => {
            let documents = rag
                .find_relevant_documents(&query, limit)
                .await
                .context("searching knowledge base")?;
            print_json(&json!({ "documents": documents }))
        }
        RagCommand::Stats { user_id } => {
            let stats = rag
                .get_storage_stats(&user_id)
                .await
                .context("fetching storage statistics")?;
            print_json(&stats)
        }
        RagCommand::Health => print_json(&rag.check_availability().await),
    }
}
