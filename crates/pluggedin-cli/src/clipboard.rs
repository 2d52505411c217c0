//! Clipboard command - read and write the shared clipboard

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use pluggedin_sdk::{ClearStrategy, PluggedIn, WriteOptions};
use serde_json::json;

use crate::output::print_json;

/// Read and write the shared clipboard
#[derive(Args, Debug)]
pub struct ClipboardArgs {
    #[command(subcommand)]
    pub command: ClipboardCommand,
}

/// Which entry to address; exactly one is required.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct Target {
    /// Entry name
    #[arg(long)]
    pub name: Option<String>,

    /// Stack index
    #[arg(long)]
    pub idx: Option<i64>,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// MIME type of the value
    #[arg(long, default_value = "text/plain")]
    pub content_type: String,

    /// Value encoding: utf-8, base64 or hex
    #[arg(long, default_value = "utf-8")]
    pub encoding: String,

    /// Visibility: private, workspace or public
    #[arg(long, default_value = "private")]
    pub visibility: String,

    /// Expire the entry after this many seconds
    #[arg(long, allow_negative_numbers = true)]
    pub ttl: Option<i64>,

    /// Tool name recorded as the author
    #[arg(long)]
    pub tool: Option<String>,

    /// Model name recorded as the author
    #[arg(long)]
    pub model: Option<String>,
}

impl WriteArgs {
    fn options(&self) -> Result<WriteOptions> {
        let mut options = WriteOptions::new()
            .content_type(&self.content_type)
            .encoding_str(&self.encoding)?
            .visibility_str(&self.visibility)?;
        if let Some(ttl) = self.ttl {
            options = options.ttl_seconds(ttl);
        }
        if let Some(tool) = &self.tool {
            options = options.created_by_tool(tool);
        }
        if let Some(model) = &self.model {
            options = options.created_by_model(model);
        }
        Ok(options)
    }
}

#[derive(Subcommand, Debug)]
pub enum ClipboardCommand {
    /// List all entries
    List,

    /// Show one entry
    Get {
        #[command(flatten)]
        target: Target,
    },

    /// Create or replace a named entry
    Set {
        /// Entry name
        name: String,

        /// Entry value
        value: String,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Push a value onto the stack
    Push {
        /// Entry value
        value: String,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Pop the top of the stack
    Pop,

    /// Delete one entry
    Delete {
        #[command(flatten)]
        target: Target,
    },

    /// Delete every entry
    Clear {
        /// List and delete one by one instead of a single bulk request
        #[arg(long)]
        iterative: bool,
    },
}

/// Execute the clipboard command
pub async fn execute(args: ClipboardArgs, client: &PluggedIn) -> Result<()> {
    let clipboard = client.clipboard();

    match args.command {
        ClipboardCommand::List => {
            let entries = clipboard.list().await.context("listing clipboard")?;
            print_json(&entries)
        }
        ClipboardCommand::Get { target } => {
            let entry = clipboard
                .get(target.name.as_deref(), target.idx)
                .await
                .context("reading clipboard entry")?;
            print_json(&entry)
        }
        ClipboardCommand::Set { name, value, write } => {
            let entry = clipboard
                .set(&name, &value, &write.options()?)
                .await
                .with_context(|| format!("setting clipboard entry '{}'", name))?;
            print_json(&entry)
        }
        ClipboardCommand::Push { value, write } => {
            let entry = clipboard
                .push(&value, &write.options()?)
                .await
                .context("pushing to clipboard")?;
            print_json(&entry)
        }
        ClipboardCommand::Pop => {
            let entry = clipboard.pop().await.context("popping clipboard")?;
            print_json(&entry)
        }
        ClipboardCommand::Delete { target } => {
            let deleted = clipboard
                .delete(target.name.as_deref(), target.idx)
                .await
                .context("deleting clipboard entry")?;
            print_json(&json!({ "deleted": deleted }))
        }
        ClipboardCommand::Clear { iterative } => {
            let strategy = if iterative {
                ClearStrategy::Iterative
            } else {
                clipboard.clear_strategy()
            };
            let result = clipboard
                .clear_all_with(strategy)
                .await
                .context("clearing clipboard")?;
            print_json(&json!({
                "deleted": result.deleted,
                "failed": result.failed,
                "total": result.total(),
                "success": result.success(),
                "strategy": result.strategy,
            }))
        }
    }
}
