//! ILM node
//!
//! Runs one lifecycle policy action against the stored cluster snapshot and
//! prints the response as JSON.
//!
//! Usage:
//!   ilm-node put policy.json
//!   ilm-node get [NAME]...
//!   ilm-node delete NAME --ack-timeout-ms 5000

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ilm_actions::{DeleteLifecycleRequest, GetLifecycleRequest, PutLifecycleRequest};
use ilm_metadata::LifecyclePolicy;
use ilm_node::{load_metadata, save_metadata, start, NodeConfig};
use serde::Serialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ilm-node")]
#[command(about = "Manage index lifecycle policies in a cluster snapshot")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "ilm-node.toml")]
    config: PathBuf,

    /// Snapshot path, overriding the config file
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Time to wait for followers to acknowledge (ms)
    #[arg(long)]
    ack_timeout_ms: Option<u64>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a policy read from a JSON file
    Put { file: PathBuf },
    /// Show policies, all of them if no name is given
    Get { names: Vec<String> },
    /// Delete a policy that no index uses
    Delete { name: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let mut config = NodeConfig::load(&args.config)?;
    if let Some(state) = args.state {
        config.state_path = state;
    }
    let ack_timeout = args.ack_timeout_ms.map(Duration::from_millis);

    let metadata = load_metadata(&config.state_path)?;
    let service = start(&config, metadata);
    info!(
        "Node {} started with {} follower(s)",
        config.cluster.node_name, config.followers
    );

    match args.command {
        Command::Put { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read policy file {}", file.display()))?;
            let policy: LifecyclePolicy =
                serde_json::from_str(&raw).context("Failed to decode policy")?;
            let mut request = PutLifecycleRequest::new(policy);
            request.ack_timeout = ack_timeout;
            print_json(&service.put_policy(request).await?)?;
        }
        Command::Get { names } => {
            let response = service.get_policies(&GetLifecycleRequest::named(names))?;
            print_json(&response)?;
            return Ok(());
        }
        Command::Delete { name } => {
            let mut request = DeleteLifecycleRequest::new(name);
            request.ack_timeout = ack_timeout;
            print_json(&service.delete_policy(request).await?)?;
        }
    }

    save_metadata(&config.state_path, service.cluster().state().metadata())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
