//! Graph store abstraction.
//!
//! Defines the [`GraphStore`] trait the ingestion and query pipelines talk to,
//! plus the Neo4j implementation.

pub mod neo4j;

use uuid::Uuid;

use crate::errors::Result;
use crate::nodes::episodic::EpisodeRecord;
use crate::search::SearchResult;

/// Trait representing a graph-backed knowledge store.
///
/// A store is a scoped resource: callers create it, run one operation, and
/// call [`GraphStore::close`] on every exit path.
#[allow(async_fn_in_trait)]
pub trait GraphStore: Send + Sync {
    /// Create required indices and constraints. Idempotent.
    async fn ensure_schema(&self) -> Result<()>;

    /// Persist one episode and return its uuid.
    async fn write_episode(&self, episode: &EpisodeRecord) -> Result<Uuid>;

    /// Free-text search over stored facts, best match first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>>;

    /// Release the connection.
    async fn close(&self) -> Result<()>;
}
