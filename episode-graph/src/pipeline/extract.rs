//! Extraction client: text → prompt → completion → [`ExtractionEnvelope`].

use tracing::debug;

use crate::errors::{EpisodeGraphError, Result};
use crate::extraction::ExtractionEnvelope;
use crate::llm_client::LanguageModel;
use crate::prompts::build_prompt;
use crate::utils::{strip_code_fence, truncate_with_ellipsis};

/// Runs entity/relationship extraction against a [`LanguageModel`].
pub struct Extractor<L> {
    llm: L,
}

impl<L: LanguageModel> Extractor<L> {
    pub fn new(llm: L) -> Self {
        Self { llm }
    }

    /// Extract entities and relationships from `text`.
    ///
    /// Makes exactly one model call. A reply that is not a valid envelope
    /// after fence-stripping fails with [`EpisodeGraphError::ExtractionParse`];
    /// an empty result is never substituted.
    pub async fn extract(&self, text: &str) -> Result<ExtractionEnvelope> {
        let prompt = build_prompt(text)?;
        let raw = self.llm.complete(&prompt).await?;
        debug!(reply = %truncate_with_ellipsis(&raw, 200), "model reply received");

        let envelope = parse_extraction(&raw)?;
        debug!(
            entities = envelope.content.entities.len(),
            relationships = envelope.content.relationships.len(),
            "extraction parsed"
        );
        Ok(envelope)
    }
}

/// Fence-strip `raw` and parse it as an [`ExtractionEnvelope`].
pub fn parse_extraction(raw: &str) -> Result<ExtractionEnvelope> {
    serde_json::from_str(strip_code_fence(raw)).map_err(|e| EpisodeGraphError::ExtractionParse {
        message: e.to_string(),
        raw: raw.to_string(),
    })
}
