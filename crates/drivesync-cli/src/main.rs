//! DriveSync CLI: manage the sync token and push files to a running service.
//!
//! `token` commands work on SYNC_TOKEN_FILE directly. `push` talks to the service at
//! DRIVESYNC_URL with DRIVESYNC_TOKEN.

use anyhow::Context;
use clap::{Parser, Subcommand};
use drivesync_api_client::{PushOutcome, SyncClient};
use drivesync_cli::{guess_mime_type, init_tracing, print_json};
use drivesync_core::{regenerate_sync_token, TokenProvider};
use drivesync_storage::FileTokenStore;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "drivesync", about = "DriveSync intake CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or rotate the sync token
    Token {
        /// Token file shared with the server
        #[arg(long, env = "SYNC_TOKEN_FILE", default_value = "./data/sync_token")]
        token_file: PathBuf,
        #[command(subcommand)]
        sub: TokenCommands,
    },
    /// Upload a local file through the intake endpoint
    Push {
        /// Path to the file to upload
        file: PathBuf,
        /// MIME type, guessed from the extension when omitted
        #[arg(long)]
        mime_type: Option<String>,
        /// Category label attached to the asset
        #[arg(long, default_value = "")]
        category: String,
        /// Name to send instead of the file's own name
        #[arg(long)]
        name: Option<String>,
        /// Only check that the endpoint accepts the token
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Print the current token
    Show,
    /// Replace the token with a fresh one and print it
    Regenerate,
}

async fn run_token(token_file: PathBuf, sub: TokenCommands) -> anyhow::Result<()> {
    let store = FileTokenStore::new(token_file.clone());
    match sub {
        TokenCommands::Show => {
            let token = store
                .get()
                .await
                .with_context(|| format!("Failed to read {}", token_file.display()))?
                .context("No sync token yet. Start the server or run `drivesync token regenerate`")?;
            println!("{}", token);
        }
        TokenCommands::Regenerate => {
            let token = regenerate_sync_token(&store)
                .await
                .with_context(|| format!("Failed to write {}", token_file.display()))?;
            println!("{}", token);
        }
    }
    Ok(())
}

async fn run_push(
    file: PathBuf,
    mime_type: Option<String>,
    category: String,
    name: Option<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let client = SyncClient::from_env()
        .context("Failed to create client. Set DRIVESYNC_TOKEN and DRIVESYNC_URL")?;

    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    let file_name = match name {
        Some(name) => name,
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let mime_type = mime_type.unwrap_or_else(|| guess_mime_type(&file).to_string());

    match client
        .push_bytes(&file_name, &mime_type, &bytes, &category, dry_run)
        .await?
    {
        PushOutcome::Created(reply) => print_json(&reply),
        PushOutcome::Acknowledged(reply) => print_json(&reply),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { token_file, sub } => run_token(token_file, sub).await,
        Commands::Push {
            file,
            mime_type,
            category,
            name,
            dry_run,
        } => run_push(file, mime_type, category, name, dry_run).await,
    }
}
