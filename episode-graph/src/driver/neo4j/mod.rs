//! Neo4j graph store implementation.
//!
//! Uses `neo4rs` 0.8 for async, pooled Bolt connections. Episodes are written
//! in one transaction; searches go through the `edge_name_and_fact` full-text
//! index.

pub mod queries;

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use neo4rs::{query, Graph, Query};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::driver::GraphStore;
use crate::embedder::EmbedderClient;
use crate::errors::{EpisodeGraphError, Result};
use crate::extraction::ExtractionResult;
use crate::nodes::episodic::{EpisodeRecord, EpisodeType};
use crate::search::SearchResult;
use crate::utils::{format_neo4j_datetime, lucene_sanitize, normalize_whitespace};

// ── Write plan ────────────────────────────────────────────────────────────────

/// One `Entity` node to merge.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub uuid: Uuid,
    pub mention_uuid: Uuid,
    pub name: String,
    pub entity_type: String,
    pub singular: bool,
    pub summary: String,
}

/// One `RELATES_TO` edge to create.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRow {
    pub uuid: Uuid,
    pub source_name: String,
    pub target_name: String,
    /// Relationship type in Graphiti's SCREAMING_SNAKE form.
    pub name: String,
    pub fact: String,
}

/// Everything one episode write touches, decided before any I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct WritePlan {
    pub episode_uuid: Uuid,
    pub entities: Vec<EntityRow>,
    pub edges: Vec<EdgeRow>,
}

impl WritePlan {
    /// Build the plan for `episode`.
    ///
    /// A JSON episode must carry an [`ExtractionResult`]; other sources only
    /// produce the `Episodic` node. Entities repeated by name keep their first
    /// occurrence.
    pub fn for_episode(episode: &EpisodeRecord) -> Result<Self> {
        let extraction = match episode.source {
            EpisodeType::Json => serde_json::from_str::<ExtractionResult>(&episode.body).map_err(|e| {
                EpisodeGraphError::StoreWrite(format!("episode body is not an extraction result: {e}"))
            })?,
            EpisodeType::Message | EpisodeType::Text => ExtractionResult::default(),
        };

        let mut seen = HashSet::new();
        let entities = extraction
            .entities
            .iter()
            .filter(|e| seen.insert(e.name.as_str()))
            .map(|e| EntityRow {
                uuid: Uuid::new_v4(),
                mention_uuid: Uuid::new_v4(),
                name: e.name.clone(),
                entity_type: e.entity_type.clone(),
                singular: e.singular,
                summary: e.description.clone(),
            })
            .collect();

        let edges = extraction
            .relationships
            .iter()
            .map(|r| EdgeRow {
                uuid: Uuid::new_v4(),
                source_name: r.entity_1.clone(),
                target_name: r.entity_2.clone(),
                name: r.relationship_type.to_uppercase(),
                fact: r.fact(),
            })
            .collect();

        Ok(Self {
            episode_uuid: Uuid::new_v4(),
            entities,
            edges,
        })
    }

    fn facts(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.fact.as_str()).collect()
    }
}

/// Lucene query for `text`, restricted to `group_id` when one is set.
pub fn fulltext_query(group_id: &str, text: &str) -> String {
    let text = lucene_sanitize(text);
    if group_id.is_empty() {
        text
    } else {
        format!("group_id:\"{}\" AND ({text})", lucene_sanitize(group_id))
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Neo4j-backed [`GraphStore`].
pub struct Neo4jStore<E> {
    graph: Mutex<Option<Graph>>,
    embedder: E,
    group_id: String,
}

impl<E: EmbedderClient> Neo4jStore<E> {
    /// Open a connection pool to `uri`.
    pub async fn connect(
        uri: &str,
        user: &str,
        password: &str,
        embedder: E,
    ) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| EpisodeGraphError::StoreConnection(format!("{uri}: {e}")))?;

        debug!(uri, "connected to neo4j");

        Ok(Self {
            graph: Mutex::new(Some(graph)),
            embedder,
            group_id: String::new(),
        })
    }

    /// Partition every read and write by `group_id` (default: empty string).
    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = group_id.into();
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    /// A handle to the pool, or an error once the store is closed.
    fn graph(&self) -> Result<Graph> {
        self.graph
            .lock()
            .map_err(|_| EpisodeGraphError::StoreConnection("connection lock poisoned".to_string()))?
            .clone()
            .ok_or_else(|| EpisodeGraphError::StoreConnection("store is closed".to_string()))
    }

    fn write_queries(
        &self,
        episode: &EpisodeRecord,
        plan: &WritePlan,
        embeddings: Vec<Vec<f64>>,
        created_at: &DateTime<Utc>,
    ) -> Vec<Query> {
        let created_at = format_neo4j_datetime(created_at);
        let valid_at = format_neo4j_datetime(&episode.reference_time);
        let episode_uuid = plan.episode_uuid.to_string();

        let mut statements = Vec::with_capacity(1 + plan.entities.len() + plan.edges.len());

        statements.push(
            query(queries::CREATE_EPISODE)
                .param("uuid", episode_uuid.clone())
                .param("name", episode.name.clone())
                .param("group_id", self.group_id.clone())
                .param("source", episode.source.as_str())
                .param("source_description", episode.source_description.clone())
                .param("content", episode.body.clone())
                .param("created_at", created_at.clone())
                .param("valid_at", valid_at.clone()),
        );

        for entity in &plan.entities {
            statements.push(
                query(queries::MERGE_ENTITY)
                    .param("uuid", entity.uuid.to_string())
                    .param("mention_uuid", entity.mention_uuid.to_string())
                    .param("name", entity.name.clone())
                    .param("entity_type", entity.entity_type.clone())
                    .param("singular", entity.singular)
                    .param("summary", entity.summary.clone())
                    .param("group_id", self.group_id.clone())
                    .param("episode_uuid", episode_uuid.clone())
                    .param("created_at", created_at.clone()),
            );
        }

        for (edge, embedding) in plan.edges.iter().zip(embeddings) {
            statements.push(
                query(queries::CREATE_RELATES_TO)
                    .param("uuid", edge.uuid.to_string())
                    .param("source_name", edge.source_name.clone())
                    .param("source_uuid", Uuid::new_v4().to_string())
                    .param("target_name", edge.target_name.clone())
                    .param("target_uuid", Uuid::new_v4().to_string())
                    .param("name", edge.name.clone())
                    .param("fact", edge.fact.clone())
                    .param("fact_embedding", embedding)
                    .param("group_id", self.group_id.clone())
                    .param("episode_uuid", episode_uuid.clone())
                    .param("created_at", created_at.clone())
                    .param("valid_at", valid_at.clone()),
            );
        }

        statements
    }
}

impl<E: EmbedderClient> GraphStore for Neo4jStore<E> {
    async fn ensure_schema(&self) -> Result<()> {
        let graph = self.graph()?;
        for statement in queries::SCHEMA {
            graph
                .run(query(statement))
                .await
                .map_err(|e| EpisodeGraphError::StoreConnection(format!("schema setup failed: {e}")))?;
        }
        debug!(statements = queries::SCHEMA.len(), "schema ensured");
        Ok(())
    }

    async fn write_episode(&self, episode: &EpisodeRecord) -> Result<Uuid> {
        let graph = self.graph()?;
        let plan = WritePlan::for_episode(episode)?;

        let facts = plan.facts();
        let embeddings: Vec<Vec<f64>> = if facts.is_empty() {
            Vec::new()
        } else {
            self.embedder
                .embed_batch(&facts)
                .await?
                .into_iter()
                .map(|v| v.into_iter().map(f64::from).collect())
                .collect()
        };
        if embeddings.len() != plan.edges.len() {
            return Err(EpisodeGraphError::Embedder(format!(
                "expected {} fact embeddings, got {}",
                plan.edges.len(),
                embeddings.len()
            )));
        }

        let statements = self.write_queries(episode, &plan, embeddings, &Utc::now());

        let mut txn = graph
            .start_txn()
            .await
            .map_err(|e| EpisodeGraphError::StoreConnection(e.to_string()))?;

        for statement in statements {
            if let Err(e) = txn.run(statement).await {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!(error = %rollback_err, "rollback after failed episode write also failed");
                }
                return Err(EpisodeGraphError::StoreWrite(e.to_string()));
            }
        }

        txn.commit()
            .await
            .map_err(|e| EpisodeGraphError::StoreWrite(e.to_string()))?;

        info!(
            episode = %plan.episode_uuid,
            entities = plan.entities.len(),
            relationships = plan.edges.len(),
            "episode written"
        );

        Ok(plan.episode_uuid)
    }

    async fn search(&self, text: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let normalized = normalize_whitespace(text);
        if normalized.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let graph = self.graph()?;
        let q = query(queries::SEARCH_FACTS)
            .param("query", fulltext_query(&self.group_id, &normalized))
            .param("limit", i64::try_from(limit).unwrap_or(i64::MAX))
            .param("group_id", self.group_id.clone());

        let query_err = |e: neo4rs::Error| EpisodeGraphError::StoreQuery(e.to_string());
        let mut rows = graph.execute(q).await.map_err(query_err)?;

        let mut results = Vec::new();
        while let Some(row) = rows.next().await.map_err(query_err)? {
            let uuid: String = row
                .get("uuid")
                .map_err(|e| EpisodeGraphError::StoreQuery(format!("uuid: {e}")))?;
            let fact: String = row
                .get("fact")
                .map_err(|e| EpisodeGraphError::StoreQuery(format!("fact: {e}")))?;
            let valid_at: Option<String> = row
                .get("valid_at")
                .map_err(|e| EpisodeGraphError::StoreQuery(format!("valid_at: {e}")))?;
            let invalid_at: Option<String> = row
                .get("invalid_at")
                .map_err(|e| EpisodeGraphError::StoreQuery(format!("invalid_at: {e}")))?;
            results.push(SearchResult::from_store_row(
                &uuid,
                fact,
                valid_at.as_deref(),
                invalid_at.as_deref(),
            )?);
        }

        debug!(query = %normalized, hits = results.len(), "fact search finished");
        Ok(results)
    }

    async fn close(&self) -> Result<()> {
        let graph = self
            .graph
            .lock()
            .map_err(|_| EpisodeGraphError::StoreConnection("connection lock poisoned".to_string()))?
            .take();

        if graph.is_some() {
            info!("graph store connection closed");
        }
        Ok(())
    }
}
