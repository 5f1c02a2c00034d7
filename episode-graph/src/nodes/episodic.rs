//! EpisodeRecord: one ingested unit of content, as written to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The source type of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EpisodeType {
    Message,
    Json,
    Text,
}

impl EpisodeType {
    /// Lowercase label stored on the `Episodic` node.
    pub fn as_str(&self) -> &'static str {
        match self {
            EpisodeType::Message => "message",
            EpisodeType::Json => "json",
            EpisodeType::Text => "text",
        }
    }
}

/// A timestamped episode ready to be written.
///
/// Created once per ingestion call. After `write_episode` returns, the store
/// owns the data and nothing here refers to it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub name: String,
    /// Serialised content; a JSON document when `source` is [`EpisodeType::Json`].
    pub body: String,
    pub source: EpisodeType,
    pub source_description: String,
    /// When the content was captured (UTC).
    pub reference_time: DateTime<Utc>,
}
