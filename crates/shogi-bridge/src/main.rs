//! `shogi-ai`: answers one JSON move or evaluation request.

use anyhow::{Context, Result};
use clap::Parser;
use shogi_bridge::{AiRequest, BridgeConfig, MoveOrchestrator};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shogi-ai")]
#[command(about = "Choose a shogi move or evaluate a position", long_about = None)]
struct Args {
    /// Request JSON file (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Bridge config file (defaults to ./shogi.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Engine executable, overriding config and environment
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = BridgeConfig::load(args.config.as_deref()).context("loading bridge config")?;
    if let Some(engine) = args.engine {
        config.engine_path = Some(engine);
    }

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };
    let request: AiRequest = serde_json::from_str(&raw).context("parsing request")?;
    tracing::debug!(mode = ?request.mode, depth = request.depth, time_ms = request.time_ms, "request");

    let response = MoveOrchestrator::new(config).handle(&request).await;
    let out = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", out);
    Ok(())
}
