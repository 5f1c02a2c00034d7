//! Subcommand handlers. Each one builds its own clients from the environment
//! and owns the store for exactly one operation.

use std::fmt::Write as _;

use anyhow::Context;
use episode_graph::driver::neo4j::Neo4jStore;
use episode_graph::embedder::openai::OpenAiEmbedder;
use episode_graph::llm_client::openai::OpenAiClient;
use episode_graph::{ingest, query, EpisodeGraphConfig, ExtractionEnvelope, Extractor, SearchResult};
use tracing::info;

async fn connect(config: &EpisodeGraphConfig) -> anyhow::Result<Neo4jStore<OpenAiEmbedder>> {
    let store = Neo4jStore::connect(
        &config.neo4j_uri,
        &config.neo4j_user,
        &config.neo4j_password,
        OpenAiEmbedder::from_config(config),
    )
    .await
    .with_context(|| format!("connecting to {}", config.neo4j_uri))?;

    Ok(match &config.group_id {
        Some(group_id) => store.with_group_id(group_id.clone()),
        None => store,
    })
}

async fn extract(config: &EpisodeGraphConfig, text: &str) -> anyhow::Result<ExtractionEnvelope> {
    let llm = OpenAiClient::from_config(config);
    let envelope = Extractor::new(llm).extract(text).await.context("extraction failed")?;
    info!(
        entities = envelope.content.entities.len(),
        relationships = envelope.content.relationships.len(),
        "extraction complete"
    );
    Ok(envelope)
}

pub async fn run_ingest(
    config: &EpisodeGraphConfig,
    text: &str,
    description: Option<&str>,
) -> anyhow::Result<()> {
    let envelope = extract(config, text).await?;
    let description = description.unwrap_or(&envelope.description);

    let store = connect(config).await?;
    let uuid = ingest(&store, &config.episode_name, &envelope.content, description)
        .await
        .context("ingestion failed")?;

    println!(
        "Ingested episode {uuid} ({}): {} entities, {} relationships",
        config.episode_name,
        envelope.content.entities.len(),
        envelope.content.relationships.len()
    );
    Ok(())
}

pub async fn run_search(config: &EpisodeGraphConfig, text: &str, limit: usize) -> anyhow::Result<()> {
    let store = connect(config).await?;
    let results = query(&store, text, limit).await.context("search failed")?;

    if results.is_empty() {
        println!("No facts found for {text:?}");
        return Ok(());
    }
    for result in &results {
        print!("{}", format_result(result));
    }
    Ok(())
}

pub async fn run_extract(config: &EpisodeGraphConfig, text: &str) -> anyhow::Result<()> {
    let envelope = extract(config, text).await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Render one search hit as a block of labelled lines. Absent validity
/// bounds are left out.
pub fn format_result(result: &SearchResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "UUID: {}", result.uuid);
    let _ = writeln!(out, "Fact: {}", result.fact);
    if let Some(valid_at) = result.valid_at {
        let _ = writeln!(out, "Valid from: {}", valid_at.to_rfc3339());
    }
    if let Some(invalid_at) = result.invalid_at {
        let _ = writeln!(out, "Valid until: {}", invalid_at.to_rfc3339());
    }
    let _ = writeln!(out, "---");
    out
}
