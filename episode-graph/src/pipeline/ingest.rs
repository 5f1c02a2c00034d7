//! Episode ingestion: write one extraction result as a JSON episode.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::driver::GraphStore;
use crate::errors::Result;
use crate::extraction::ExtractionResult;
use crate::nodes::episodic::{EpisodeRecord, EpisodeType};

use super::release;

/// Used when the caller (or the model) supplies no description.
pub const DEFAULT_SOURCE_DESCRIPTION: &str = "structured knowledge extraction from text";

/// Persist `extraction` as one episode named `name`.
///
/// Calls `ensure_schema` before `write_episode`, then `close` exactly once
/// whatever happened. The reference time is the current UTC time. Returns the
/// new episode's uuid.
pub async fn ingest<S: GraphStore>(
    store: &S,
    name: &str,
    extraction: &ExtractionResult,
    description: &str,
) -> Result<Uuid> {
    let outcome: Result<Uuid> = async {
        store.ensure_schema().await?;

        let description = description.trim();
        let episode = EpisodeRecord {
            name: name.to_string(),
            body: serde_json::to_string(extraction)?,
            source: EpisodeType::Json,
            source_description: if description.is_empty() {
                DEFAULT_SOURCE_DESCRIPTION.to_string()
            } else {
                description.to_string()
            },
            reference_time: Utc::now(),
        };

        store.write_episode(&episode).await
    }
    .await;

    let uuid = release(store, outcome).await?;
    info!(episode = %uuid, name, "episode ingested");
    Ok(uuid)
}
