//! # episode-graph
//!
//! Turn a chunk of text into a knowledge-graph episode:
//!
//! - **Prompt**: a fixed extraction template wrapped around the input text
//! - **Extract**: one LLM completion, fence-stripped and parsed into entities and relationships
//! - **Ingest**: the result stored as a timestamped JSON episode in Neo4j, using Graphiti's graph layout
//! - **Search**: free-text lookup of stored facts with their validity bounds
//!
//! Vendors sit behind three small traits: [`llm_client::LanguageModel`],
//! [`embedder::EmbedderClient`] and [`driver::GraphStore`].

pub mod edges;
pub mod errors;
pub mod extraction;
pub mod nodes;
pub mod types;

pub mod driver;
pub mod embedder;
pub mod llm_client;

pub mod prompts;
pub mod search;

pub mod pipeline;
pub mod utils;

pub use errors::{EpisodeGraphError, LlmError, Result};
pub use extraction::{ExtractionEnvelope, ExtractionResult};
pub use pipeline::{ingest, Extractor};
pub use search::{query, SearchResult};
pub use types::EpisodeGraphConfig;
