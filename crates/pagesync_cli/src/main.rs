//! pagesync CLI
//!
//! Terminal frontend for remote paged collections.
//!
//! # Commands
//!
//! - `list` - Page through the collection
//! - `add` - Create a record from key=value fields
//! - `update` - Edit fields of a record and commit the full record
//! - `delete` - Delete a record by id

mod client;
mod commands;

use clap::{Parser, Subcommand};
use client::ReqwestClient;
use pagesync_engine::{HttpTransport, SyncConfig, SyncController};
use tracing_subscriber::EnvFilter;

/// pagesync command-line collection tools.
#[derive(Parser)]
#[command(name = "pagesync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the remote API
    #[arg(
        global = true,
        long,
        default_value = "https://jsonplaceholder.typicode.com"
    )]
    base_url: String,

    /// Collection path under the base URL
    #[arg(global = true, long, default_value = "users")]
    collection: String,

    /// Records per page
    #[arg(global = true, long, default_value = "10")]
    page_size: u32,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through the collection
    List {
        /// Maximum number of pages to fetch (default: until exhausted)
        #[arg(short, long)]
        pages: Option<u32>,
    },

    /// Create a record
    Add {
        /// Field as key=value (repeatable)
        #[arg(short, long = "field", value_parser = commands::parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Edit fields of a record and commit the full record
    Update {
        /// Record id
        id: u64,

        /// Field as key=value (repeatable)
        #[arg(short, long = "field", value_parser = commands::parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Delete a record by id
    Delete {
        /// Record id
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = SyncConfig::new(&cli.base_url)
        .with_collection(&cli.collection)
        .with_page_size(cli.page_size);
    let client = ReqwestClient::new(config.timeout)?;
    let transport = HttpTransport::new(&config.base_url, &config.collection, client);
    let controller = SyncController::new(config, transport);

    match cli.command {
        Commands::List { pages } => {
            commands::list::run(&controller, pages).await?;
        }
        Commands::Add { fields } => {
            commands::add::run(&controller, fields).await?;
        }
        Commands::Update { id, fields } => {
            commands::update::run(&controller, id, fields).await?;
        }
        Commands::Delete { id } => {
            commands::delete::run(&controller, id).await?;
        }
    }

    Ok(())
}
