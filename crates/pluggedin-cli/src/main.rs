//! Plugged.in CLI - clipboard and knowledge base from the terminal
//!
//! # Examples
//!
//! ```bash
//! # Store and read back a named entry
//! pluggedin clipboard set notes "remember the milk"
//! pluggedin clipboard get --name notes
//!
//! # Use the stack
//! pluggedin clipboard push "step 1 done"
//! pluggedin clipboard pop
//!
//! # Ask the knowledge base
//! pluggedin rag ask "What is our refund policy?"
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pluggedin_sdk::PluggedIn;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod clipboard;
mod config;
mod output;
mod rag;

/// Plugged.in CLI
#[derive(Parser)]
#[command(name = "pluggedin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path [default: <config dir>/pluggedin/config.toml]
    #[arg(short, long, env = "PLUGGEDIN_CONFIG")]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read and write the shared clipboard
    Clipboard(clipboard::ClipboardArgs),

    /// Query the knowledge base
    Rag(rag::RagArgs),

    /// Show current configuration
    Config,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pluggedin=debug,pluggedin_sdk=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pluggedin=info,pluggedin_sdk=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => shellexpand::tilde(&path).to_string(),
        None => config::Config::default_path()?.display().to_string(),
    };
    debug!(config_path = %config_path, "Starting pluggedin");

    match cli.command {
        Commands::Clipboard(args) => clipboard::execute(args, &connect(&config_path)?).await,
        Commands::Rag(args) => rag::execute(args, &connect(&config_path)?).await,
        Commands::Config => config::show(&config_path),
    }
}

fn connect(config_path: &str) -> Result<PluggedIn> {
    let settings = config::Config::load(config_path)?
        .client_config(std::env::var("PLUGGEDIN_API_KEY").ok());
    PluggedIn::from_config(settings).context("building Plugged.in client")
}
