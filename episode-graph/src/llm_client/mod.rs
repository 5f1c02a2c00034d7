//! LLM client abstraction.
//!
//! # Implementations
//! - [`openai::OpenAiClient`]: any OpenAI-compatible chat-completions endpoint
//!   (Gemini by default), configured through `async-openai`.
//!
//! The pipeline only needs [`LanguageModel::complete`]: one prompt in, one
//! completion text out. Swapping providers means implementing that one method.

pub mod openai;

use crate::errors::Result;
use serde::Serialize;

/// A chat message for the LLM conversation.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Speaker role in a chat conversation. Extraction is a single user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// A text-completion capability.
#[allow(async_fn_in_trait)]
pub trait LanguageModel: Send + Sync {
    /// Send `prompt` as a single-turn user message and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

impl<T: LanguageModel + ?Sized> LanguageModel for &T {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}
