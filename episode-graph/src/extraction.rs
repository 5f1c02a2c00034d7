//! Extraction results: what the model returns for one text chunk.

use serde::{Deserialize, Serialize};

use crate::edges::entity::ExtractedRelationship;
use crate::nodes::entity::ExtractedEntity;

/// Entities and relationships extracted from one chunk; persisted as one episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub entities: Vec<ExtractedEntity>,
    #[serde(default)]
    pub relationships: Vec<ExtractedRelationship>,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    /// Look up an entity by exact name.
    pub fn entity(&self, name: &str) -> Option<&ExtractedEntity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

fn default_kind() -> String {
    "json".to_string()
}

/// The full reply object: `{content, type, description}`.
///
/// Only `content` is required; `type` defaults to `"json"` and `description`
/// to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionEnvelope {
    pub content: ExtractionResult,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_defaults() {
        let envelope: ExtractionEnvelope =
            serde_json::from_value(json!({ "content": {} })).expect("deserialize");
        assert_eq!(envelope.kind, "json");
        assert!(envelope.description.is_empty());
        assert!(envelope.content.is_empty());
    }

    #[test]
    fn test_envelope_requires_content() {
        let value = json!({ "type": "json", "description": "no content here" });
        assert!(serde_json::from_value::<ExtractionEnvelope>(value).is_err());
    }

    #[test]
    fn test_envelope_serializes_type_key() {
        let envelope = ExtractionEnvelope {
            content: ExtractionResult::default(),
            kind: "json".to_string(),
            description: "structured knowledge extraction from text".to_string(),
        };
        let value = serde_json::to_value(&envelope).expect("serialize");
        assert_eq!(value["type"], "json");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_entity_lookup() {
        let result: ExtractionResult = serde_json::from_value(json!({
            "entities": [
                { "name": "radium", "entity_type": "chemical_element", "singular": true, "description": "d" }
            ]
        }))
        .expect("deserialize");
        assert!(result.entity("radium").is_some());
        assert!(result.entity("polonium").is_none());
        assert!(result.relationships.is_empty());
    }
}
