//! azbucket - Azure Blob Storage transfer helpers
//!
//! The `azb` binary: upload, download, bulk-download and list blobs in the
//! configured container.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use azbucket::cli::Cli;
use azbucket::config::Config;
use azbucket::error::Result;

#[tokio::main]
async fn main() {
    // Initialize logging
    init_logging();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the command
    if let Err(e) = run(cli).await {
        error!("Error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting azbucket");

    // Configuration is environment-sourced, loaded once here and passed
    // down by reference
    let config = Config::from_env()?;

    cli.execute(config).await
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "azbucket=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
