//! podchat CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Write a default config file
//! - `chat`    — Interactive podcast chat session
//! - `ask`     — Answer a single question and exit
//! - `search`  — Debug: dump raw retrieval results for a query

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "podchat",
    about = "podchat — chat with a podcast transcript corpus",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Onboard,

    /// Start an interactive chat session
    Chat,

    /// Ask a single question instead of entering interactive mode
    Ask {
        /// The question to answer
        question: String,
    },

    /// Dump raw retrieval results for a query
    Search {
        /// The query to search for
        query: String,

        /// Override the number of documents to fetch
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Chat => commands::chat::run().await?,
        Commands::Ask { question } => commands::ask::run(&question).await?,
        Commands::Search { query, limit } => commands::search::run(&query, limit).await?,
    }

    Ok(())
}
