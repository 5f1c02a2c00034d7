//! Error types for episode-graph.

/// Alias for Results returning [`EpisodeGraphError`].
pub type Result<T> = std::result::Result<T, EpisodeGraphError>;

/// Top-level error type for episode-graph.
#[derive(Debug, thiserror::Error)]
pub enum EpisodeGraphError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt template error: {0}")]
    Format(String),

    /// The model reply was not a valid extraction envelope. `raw` holds the
    /// reply exactly as received.
    #[error("Could not parse extraction output: {message}")]
    ExtractionParse { message: String, raw: String },

    #[error("Store connection error: {0}")]
    StoreConnection(String),

    #[error("Store write error: {0}")]
    StoreWrite(String),

    #[error("Store query error: {0}")]
    StoreQuery(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Embedder error: {0}")]
    Embedder(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// LLM-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Rate limited")]
    RateLimit,

    #[error("Empty response from LLM")]
    EmptyResponse,

    #[error("Authentication failed")]
    Authentication,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },
}

impl LlmError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::RateLimit | LlmError::Transport(_) => true,
            LlmError::Api { status, .. } => *status >= 500,
            LlmError::EmptyResponse | LlmError::Authentication => false,
        }
    }
}
