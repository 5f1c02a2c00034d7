//! Node types for the knowledge graph.
//!
//! - [`entity::ExtractedEntity`]: a named item the model found in the text
//! - [`episodic::EpisodeRecord`]: one ingested episode, as handed to the store

pub mod entity;
pub mod episodic;
