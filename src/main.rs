//! quotebook - random quotes from a local store
//!
//! Quotes live in a local key-value store and are periodically merged
//! with a remote collection

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use quotebook::commands;
use quotebook::config::QuotebookPaths;
use quotebook::reconcile::ReconcileOutcome;

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(author, version, about = "Quotebook - random quotes with periodic server sync")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize quotebook (first-time setup)
    Init,

    /// Show a random quote
    Show {
        /// Category to pick from (defaults to the selected filter)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add a new quote
    Add {
        /// Quote text
        text: String,

        /// Quote category
        #[arg(short, long)]
        category: String,
    },

    /// List quotes
    List {
        /// Category to list (defaults to the selected filter)
        #[arg(short, long)]
        category: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories
    Categories,

    /// Select the category filter ("all" clears it)
    Filter {
        /// Category name or "all"
        category: String,
    },

    /// Export all quotes to a JSON file
    Export {
        /// Output file (defaults to exports/quotes.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import quotes from a JSON file
    Import {
        /// JSON file containing an array of quotes
        file: PathBuf,
    },

    /// Show store and sync settings
    Status,

    /// Merge quotes from the server once
    Sync,

    /// Merge quotes from the server on a fixed interval
    Watch {
        /// Seconds between syncs (defaults to config)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many syncs
        #[arg(long)]
        ticks: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let paths = QuotebookPaths::new()?;

    match cli.command {
        Commands::Init => {
            commands::init(&paths)?;
        }
        Commands::Show { category } => {
            commands::show(&paths, category.as_deref())?;
        }
        Commands::Add { text, category } => {
            commands::add(&paths, &text, &category)?;
        }
        Commands::List { category, json } => {
            let format = if json {
                commands::OutputFormat::Json
            } else {
                commands::OutputFormat::Table
            };
            commands::list(&paths, category.as_deref(), format)?;
        }
        Commands::Categories => {
            commands::categories(&paths)?;
        }
        Commands::Filter { category } => {
            commands::filter(&paths, &category)?;
        }
        Commands::Export { output } => {
            commands::export(&paths, output.as_deref())?;
        }
        Commands::Import { file } => {
            commands::import(&paths, &file)?;
        }
        Commands::Status => {
            commands::status(&paths)?;
        }
        Commands::Sync => {
            let outcome = commands::sync(&paths).await?;
            if let ReconcileOutcome::Failed { .. } = outcome {
                std::process::exit(1);
            }
            println!("{}", outcome);
        }
        Commands::Watch { interval, ticks } => {
            commands::watch(&paths, interval, ticks).await?;
        }
    }

    Ok(())
}
