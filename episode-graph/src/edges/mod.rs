//! Edge types for the knowledge graph.
//!
//! - [`entity::ExtractedRelationship`]: directed, typed link between two extracted entities

pub mod entity;
