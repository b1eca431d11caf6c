//! Command definitions and execution for the azb CLI

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use futures::StreamExt;
use indicatif::ProgressBar;
use tokio::io::AsyncReadExt;

use crate::blob::{create_transfer_manager, TransferManager};
use crate::config::Config;
use crate::error::{AzbucketError, Result};

#[derive(Parser)]
#[command(name = "azb")]
#[command(about = "Move files between the local filesystem and an Azure Blob Storage container")]
#[command(version, author)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a local file as a blob
    #[command(alias = "up")]
    Upload {
        /// Path of the local file to upload
        file_path: PathBuf,
        /// Blob name to upload as (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
        /// MIME type hint (accepted for compatibility, not sent)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Upload a base64-encoded payload as a blob
    UploadBase64 {
        /// Blob name to upload as
        name: String,
        /// Base64 payload (read from stdin when omitted)
        #[arg(long)]
        data: Option<String>,
    },
    /// Download a single blob into the downloads tree
    #[command(alias = "down")]
    Download {
        /// Grouping directory under the downloads root
        group_id: String,
        /// Blob name
        name: String,
    },
    /// Download the whole container into a local directory
    Pull {
        /// Local directory that will mirror the container
        local_directory: PathBuf,
        /// Number of concurrent blob transfers
        #[arg(short, long)]
        concurrency: Option<usize>,
    },
    /// List blob names in the container
    #[command(alias = "ls")]
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn execute(self, config: Config) -> Result<()> {
        let manager = create_transfer_manager(&config)?;

        match self.command {
            Commands::Upload {
                file_path,
                name,
                content_type,
            } => execute_upload(&manager, &file_path, name, content_type).await,
            Commands::UploadBase64 { name, data } => {
                execute_upload_base64(&manager, &name, data).await
            }
            Commands::Download { group_id, name } => {
                execute_download(&manager, &group_id, &name).await
            }
            Commands::Pull {
                local_directory,
                concurrency,
            } => {
                let manager = match concurrency {
                    Some(n) => manager.with_max_concurrent(n),
                    None => manager,
                };
                execute_pull(&manager, &local_directory).await
            }
            Commands::List { json } => execute_list(&manager, json).await,
        }
    }
}

async fn execute_upload(
    manager: &TransferManager,
    file_path: &Path,
    name: Option<String>,
    content_type: Option<String>,
) -> Result<()> {
    let blob_name = name.unwrap_or_else(|| {
        file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    });

    println!(
        "Uploading '{}' as blob '{}'...",
        file_path.display(),
        blob_name
    );

    let outcome = manager
        .upload_file(file_path, &blob_name, content_type.as_deref())
        .await?;

    println!("✅ Uploaded to {}", outcome.url);
    Ok(())
}

async fn execute_upload_base64(
    manager: &TransferManager,
    name: &str,
    data: Option<String>,
) -> Result<()> {
    let payload = match data {
        Some(payload) => payload,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin().read_to_string(&mut buffer).await?;
            buffer
        }
    };

    println!("Uploading payload as blob '{name}'...");

    let outcome = manager.upload_base64(name, &payload).await?;

    println!("✅ Uploaded to {}", outcome.url);
    Ok(())
}

async fn execute_download(manager: &TransferManager, group_id: &str, name: &str) -> Result<()> {
    println!("Downloading blob '{name}'...");

    let output = manager.download_file(group_id, name).await?;

    println!("✅ Downloaded to {}", output.display());
    Ok(())
}

async fn execute_pull(manager: &TransferManager, local_directory: &Path) -> Result<()> {
    println!(
        "Downloading container contents to '{}'...",
        local_directory.display()
    );

    let stream = manager.download_container_stream(local_directory).await?;
    futures::pin_mut!(stream);

    let bar = ProgressBar::new_spinner();
    let mut total = 0usize;
    let mut failed = 0usize;

    // Outcomes arrive in completion order, not submission order
    while let Some(outcome) = stream.next().await {
        total += 1;
        match outcome.result {
            Ok(path) => bar.set_message(format!("{}", path.display())),
            Err(e) => {
                failed += 1;
                bar.println(format!("⚠️  {}: {e}", outcome.name));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    if failed > 0 {
        return Err(AzbucketError::unknown(format!(
            "{failed} of {total} blobs failed to download"
        )));
    }

    println!("✅ Downloaded {total} blobs");
    Ok(())
}

async fn execute_list(manager: &TransferManager, json: bool) -> Result<()> {
    let names = manager.list_blobs().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if names.is_empty() {
        println!("No blobs found");
        return Ok(());
    }

    for name in &names {
        println!("{name}");
    }
    println!("\nTotal blobs: {}", names.len());

    Ok(())
}
