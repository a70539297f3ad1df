//! Meridian CLI - region inspection and redirect dry runs.
//!
//! # Usage
//!
//! ```bash
//! # List the region map served by the commerce backend
//! mrd-cli regions
//!
//! # Show how a request would be localized
//! mrd-cli resolve / --geo ca
//! mrd-cli resolve /ca/de/store --cookie
//! ```
//!
//! # Commands
//!
//! - `regions` - List countries and their regions
//! - `resolve` - Dry-run the redirect policy for a request

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::resolve::ResolveRequest;

#[derive(Parser)]
#[command(name = "mrd-cli")]
#[command(author, version, about = "Meridian CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the region map served by the commerce backend
    Regions,
    /// Dry-run the redirect policy for a request
    Resolve {
        /// Request path, optionally with a query string
        #[arg(default_value = "/")]
        url: String,

        /// Geo header value (ISO country code)
        #[arg(short, long)]
        geo: Option<String>,

        /// Accept-Language header value
        #[arg(short = 'l', long)]
        accept_language: Option<String>,

        /// Simulate a request that already carries the cache-id cookie
        #[arg(short, long)]
        cookie: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Regions => commands::regions::list().await?,
        Commands::Resolve {
            url,
            geo,
            accept_language,
            cookie,
        } => {
            commands::resolve::run(&ResolveRequest {
                url,
                geo,
                accept_language,
                has_cookie: cookie,
            })
            .await?;
        }
    }
    Ok(())
}
