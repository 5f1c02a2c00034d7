//! ExtractedRelationship: a directed, typed link between two extracted entities.

use serde::{Deserialize, Serialize};

/// A directed relationship from `entity_1` to `entity_2`.
///
/// Endpoints refer to entities by name, not by identifier; nothing checks that
/// they appear in the entity list. A bidirectional relation is two records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRelationship {
    /// Name of entity 1 (lowercase).
    pub entity_1: String,
    /// Name of entity 2 (lowercase).
    pub entity_2: String,
    /// Type of relationship (lowercase, snake_case).
    pub relationship_type: String,
    /// How the relationship is introduced in the text, with a supporting excerpt.
    pub description: String,
}

impl ExtractedRelationship {
    /// Human-readable fact stored on the graph edge.
    ///
    /// Falls back to `"<entity_1> <relationship_type> <entity_2>"` when the
    /// model left the description blank.
    pub fn fact(&self) -> String {
        let description = self.description.trim();
        if description.is_empty() {
            format!(
                "{} {} {}",
                self.entity_1,
                self.relationship_type.replace('_', " "),
                self.entity_2
            )
        } else {
            description.to_string()
        }
    }
}
