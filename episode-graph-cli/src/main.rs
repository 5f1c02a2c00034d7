mod cli;
mod commands;

use clap::Parser;
use episode_graph::EpisodeGraphConfig;
use tracing::{error, info};

use crate::cli::{text_or_default, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Tracing ───────────────────────────────────────────────────────────────
    // stdout carries command output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("episode_graph=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    // ── Config ────────────────────────────────────────────────────────────────
    let config = EpisodeGraphConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        model = %config.model_name,
        neo4j = %config.neo4j_uri,
        "configuration loaded"
    );

    // ── Dispatch ──────────────────────────────────────────────────────────────
    let outcome = match &cli.command {
        Command::Ingest { text, description } => {
            commands::run_ingest(&config, text_or_default(text.as_deref()), description.as_deref()).await
        }
        Command::Search { query, limit } => {
            let limit = limit.map_or(config.search_limit, usize::from);
            commands::run_search(&config, query, limit).await
        }
        Command::Extract { text } => commands::run_extract(&config, text_or_default(text.as_deref())).await,
    };

    if let Err(e) = &outcome {
        error!("Command failed: {:#}", e);
    }
    outcome
}
