//! ExtractedEntity: a named item pulled out of text by the language model.

use serde::{Deserialize, Serialize};

/// A real-world entity (person, place, substance, organisation) found in a text chunk.
///
/// Produced only from model output and never mutated afterwards. Names are
/// expected lowercase and types snake_case, but neither is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    /// Name of the entity (lowercase).
    pub name: String,
    /// Type of the entity (lowercase, snake_case).
    pub entity_type: String,
    /// `true` for a unique item or person, `false` for a plural/collective one.
    pub singular: bool,
    /// How the entity is introduced in the text, with a supporting excerpt.
    pub description: String,
}
