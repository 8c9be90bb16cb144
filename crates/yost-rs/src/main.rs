//! Command line client for the Yost record and blob stores.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use yost_rs::Yost;
use yost_rs::config::{LayeredConfigOptions, YostConfig};
use yost_rs::records::{QueryRequest, WriteRequest};

/// Command-line options for the `yost` client.
#[derive(Parser)]
#[command(name = "yost", version)]
struct Cli {
    /// Optional yost.json5 applied as the highest-precedence layer
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save a record; it stays hidden until its cooldown elapses
    Save {
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        blob_key: String,
        /// Attach a verification link and mark the record as link-verified
        #[arg(long)]
        verification_link: Option<String>,
        #[arg(long)]
        verified_user: bool,
        /// Requested visibility time in unix seconds
        #[arg(long)]
        visible_after: Option<i64>,
    },
    /// List visible records for a display name
    Query {
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        verified_links: bool,
        #[arg(long)]
        verified_users: bool,
    },
    /// Upload a file to the blob store
    PutBlob {
        #[arg(long)]
        key: String,
        file: PathBuf,
    },
    /// Download a blob to a file or stdout
    GetBlob {
        #[arg(long)]
        key: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

/// Entry point for the Yost client.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    yost_rs::init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    if matches!(cli.command, Command::Config) {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    let yost = Yost::open(config).context("failed to open stores")?;

    match cli.command {
        Command::Save {
            display_name,
            blob_key,
            verification_link,
            verified_user,
            visible_after,
        } => {
            let mut request = WriteRequest::new(display_name, blob_key);
            if let Some(link) = verification_link {
                request = request.with_verified_link(link);
            }
            if verified_user {
                request = request.with_verified_user(true);
            }
            if let Some(visible_after) = visible_after {
                request = request.with_visible_after(visible_after);
            }
            let record = yost.writer().save(request).await?;
            println!("{}", serde_json::to_string(&record)?);
        }
        Command::Query {
            display_name,
            verified_links,
            verified_users,
        } => {
            let mut request = QueryRequest::new(display_name);
            if verified_links {
                request = request.verified_links_only();
            }
            if verified_users {
                request = request.verified_users_only();
            }
            let records = yost.query_engine().query(&request).await?;
            debug!("query returned {} records", records.len());
            for record in records {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        Command::PutBlob { key, file } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let receipt = yost.blobs().put(&key, &bytes).await?;
            println!("{}", serde_json::to_string(&receipt)?);
        }
        Command::GetBlob { key, output } => {
            let Some(bytes) = yost.blobs().get(&key).await? else {
                bail!("blob not found: {key}");
            };
            match output {
                Some(path) => tokio::fs::write(&path, &bytes)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
        Command::Config => {}
    }
    Ok(())
}

fn load_config(runtime: Option<&PathBuf>) -> anyhow::Result<YostConfig> {
    let cwd = std::env::current_dir().context("cwd")?;
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = runtime {
        options = options.with_runtime_path(path);
    }
    info!("loading layered config from cwd: {}", cwd.display());
    let layered =
        YostConfig::load_layered_with_options(options).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}
