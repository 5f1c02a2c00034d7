//! Fact search.
//!
//! [`query`] is a pass-through to the store's own full-text ranking: it makes
//! sure the schema exists, runs one search and releases the store. No caching,
//! pagination or reranking happens here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::driver::GraphStore;
use crate::errors::{EpisodeGraphError, Result};
use crate::pipeline::release;
use crate::utils::parse_store_datetime;

/// One matching fact, as projected by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub uuid: Uuid,
    pub fact: String,
    /// When the fact became true in the real world.
    pub valid_at: Option<DateTime<Utc>>,
    /// When the fact stopped being true.
    pub invalid_at: Option<DateTime<Utc>>,
}

impl SearchResult {
    /// Build a result from raw column values.
    ///
    /// A uuid that does not parse is an error. A timestamp that does not parse
    /// is dropped (and logged) so callers only ever see valid bounds.
    pub fn from_store_row(
        uuid: &str,
        fact: String,
        valid_at: Option<&str>,
        invalid_at: Option<&str>,
    ) -> Result<Self> {
        let uuid = Uuid::parse_str(uuid)
            .map_err(|e| EpisodeGraphError::StoreQuery(format!("invalid uuid {uuid:?}: {e}")))?;

        Ok(Self {
            uuid,
            fact,
            valid_at: timestamp(&uuid, "valid_at", valid_at),
            invalid_at: timestamp(&uuid, "invalid_at", invalid_at),
        })
    }
}

fn timestamp(uuid: &Uuid, field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw.filter(|s| !s.trim().is_empty())?;
    let parsed = parse_store_datetime(raw);
    if parsed.is_none() {
        warn!(%uuid, field, value = raw, "dropping unparseable timestamp");
    }
    parsed
}

/// Search stored facts for `text`, returning at most `limit` results in the
/// store's relevance order.
///
/// Calls `ensure_schema` first and `close` exactly once on every exit path.
pub async fn query<S: GraphStore>(store: &S, text: &str, limit: usize) -> Result<Vec<SearchResult>> {
    let outcome: Result<Vec<SearchResult>> = async {
        store.ensure_schema().await?;
        store.search(text, limit).await
    }
    .await;

    let results = release(store, outcome).await?;
    info!(hits = results.len(), "search finished");
    Ok(results)
}
