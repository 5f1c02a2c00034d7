//! Entity/relationship extraction prompt: text chunk → JSON envelope.

use std::sync::OnceLock;

use super::PromptTemplate;
use crate::errors::Result;

/// Output contract shown to the model, including a worked example.
pub const FORMAT_INSTRUCTIONS: &str = r#"Respond with only a JSON object that follows this structure:
{
  "content": {
    "entities": [
      {
        "name": "marie curie",
        "entity_type": "scientist",
        "singular": true,
        "description": "Marie Curie is introduced as a scientist who discovered radium."
      }
    ],
    "relationships": [
      {
        "entity_1": "marie curie",
        "entity_2": "radium",
        "relationship_type": "discovered",
        "description": "Marie Curie is said to have discovered radium."
      }
    ]
  },
  "type": "json",
  "description": "structured knowledge extraction from text"
}"#;

const EXTRACT_JSON_TEMPLATE: &str = r#"Your task is to extract a list of entities and their relationships from the given text.

Instructions for extracting **entities**:
1. Only include important and relevant proper nouns (no pronouns, prepositions, or adjectives).
2. Avoid generic entities.
3. Use lowercase for entity names and snake_case for types.
4. Use 'singular': true if the entity represents a unique item or person.

Instructions for extracting **relationships**:
1. Include only relationships between entities you have extracted.
2. Use lowercase names and snake_case for the relationship type.
3. Relationships are directed from entity_1 to entity_2.
4. Include a reverse relationship if it's bidirectional.

Instructions for **descriptions**:
1. Describe how each entity and relationship is introduced in the text.
2. Include an excerpt from the text to support the description.

{format_instructions}

The text is: "{text}"
"#;

static TEMPLATE: OnceLock<PromptTemplate> = OnceLock::new();

/// The built-in extraction template.
pub fn template() -> &'static PromptTemplate {
    TEMPLATE.get_or_init(|| PromptTemplate::new(EXTRACT_JSON_TEMPLATE))
}

/// Render the extraction prompt for `text`.
pub fn build_prompt(text: &str) -> Result<String> {
    template().render(FORMAT_INSTRUCTIONS, text)
}
