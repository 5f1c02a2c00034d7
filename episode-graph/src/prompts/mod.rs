//! Prompt templates for LLM interactions.
//!
//! Prompts are stored as Rust string literals (not external files) for
//! compile-time inclusion. A template marks where content goes with named
//! slots such as `{text}`; [`PromptTemplate::render`] refuses to render a
//! template that is missing one.

pub mod extract_json;

pub use extract_json::{build_prompt, FORMAT_INSTRUCTIONS};

use crate::errors::{EpisodeGraphError, Result};

/// Slot replaced by the output-schema instructions.
pub const FORMAT_INSTRUCTIONS_SLOT: &str = "{format_instructions}";
/// Slot replaced by the input text chunk.
pub const TEXT_SLOT: &str = "{text}";

/// An instruction template with `{format_instructions}` and `{text}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Fill both slots.
    ///
    /// The schema instructions are substituted first, so slot-like sequences
    /// inside `text` are left untouched.
    pub fn render(&self, format_instructions: &str, text: &str) -> Result<String> {
        for slot in [FORMAT_INSTRUCTIONS_SLOT, TEXT_SLOT] {
            if !self.template.contains(slot) {
                return Err(EpisodeGraphError::Format(format!(
                    "template has no {slot} slot"
                )));
            }
        }

        let (head, tail) = self
            .template
            .split_once(TEXT_SLOT)
            .ok_or_else(|| EpisodeGraphError::Format(format!("template has no {TEXT_SLOT} slot")))?;

        let mut prompt = String::with_capacity(self.template.len() + format_instructions.len() + text.len());
        prompt.push_str(&head.replace(FORMAT_INSTRUCTIONS_SLOT, format_instructions));
        prompt.push_str(text);
        prompt.push_str(&tail.replace(FORMAT_INSTRUCTIONS_SLOT, format_instructions));
        Ok(prompt)
    }
}
