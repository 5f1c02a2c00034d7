//! Shared configuration types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// OpenAI-compatible endpoint for Google Gemini.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.0-flash";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost:7687";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
/// Name label attached to every ingested episode.
pub const DEFAULT_EPISODE_NAME: &str = "Freakonomics Radio";
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

const NEO4J_SCHEMES: &[&str] = &["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s", "neo4j+ssc"];

fn validate_neo4j_uri(uri: &str) -> Result<(), validator::ValidationError> {
    let scheme_ok = uri
        .split_once("://")
        .is_some_and(|(scheme, rest)| NEO4J_SCHEMES.contains(&scheme) && !rest.is_empty());
    if !scheme_ok {
        return Err(validator::ValidationError::new("neo4j_uri must use a bolt:// or neo4j:// scheme"));
    }
    Ok(())
}

/// Central configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EpisodeGraphConfig {
    /// API key for the language model and embedding endpoints.
    #[validate(length(min = 1))]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API.
    #[validate(length(min = 1))]
    pub api_base: String,

    /// Chat model used for extraction.
    #[validate(length(min = 1))]
    pub model_name: String,

    /// Embedding model used for relationship facts.
    #[validate(length(min = 1))]
    pub embedding_model: String,

    /// Neo4j connection URI (e.g. `bolt://localhost:7687`).
    #[validate(custom(function = "validate_neo4j_uri"))]
    pub neo4j_uri: String,

    /// Neo4j username.
    pub neo4j_user: String,

    /// Neo4j password.
    #[validate(length(min = 1))]
    pub neo4j_password: String,

    /// Name label written on every episode.
    #[validate(length(min = 1))]
    pub episode_name: String,

    /// Optional group ID for partitioning graph data.
    pub group_id: Option<String>,

    /// Maximum number of facts returned by a search.
    #[validate(range(min = 1, max = 100))]
    pub search_limit: usize,
}

impl Default for EpisodeGraphConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            neo4j_uri: DEFAULT_NEO4J_URI.to_string(),
            neo4j_user: DEFAULT_NEO4J_USER.to_string(),
            neo4j_password: String::new(),
            episode_name: DEFAULT_EPISODE_NAME.to_string(),
            group_id: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl EpisodeGraphConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` first (non-fatal if `.env` is absent),
    /// then reads each variable from the process environment. Required variables
    /// (`GOOGLE_API_KEY`, `NEO4J_PASSWORD`) return a [`crate::EpisodeGraphError::Config`]
    /// error when absent or empty.
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = required_var("GOOGLE_API_KEY")?;
        let neo4j_password = required_var("NEO4J_PASSWORD")?;

        let search_limit = match std::env::var("SEARCH_LIMIT") {
            Ok(val) => val.parse::<usize>().map_err(|_| {
                crate::EpisodeGraphError::Config("SEARCH_LIMIT must be a positive integer".to_string())
            })?,
            Err(_) => DEFAULT_SEARCH_LIMIT,
        };

        let config = Self {
            api_key,
            api_base: var_or("LLM_API_BASE", DEFAULT_API_BASE),
            model_name: var_or("MODEL_NAME", DEFAULT_MODEL_NAME),
            embedding_model: var_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            neo4j_uri: var_or("NEO4J_URI", DEFAULT_NEO4J_URI),
            neo4j_user: var_or("NEO4J_USER", DEFAULT_NEO4J_USER),
            neo4j_password,
            episode_name: var_or("EPISODE_NAME", DEFAULT_EPISODE_NAME),
            group_id: std::env::var("GROUP_ID").ok().filter(|g| !g.is_empty()),
            search_limit,
        };

        config
            .validate()
            .map_err(|e| crate::EpisodeGraphError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn required_var(name: &str) -> crate::Result<String> {
    match std::env::var(name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(crate::EpisodeGraphError::Config(format!(
            "{name} environment variable must be set"
        ))),
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
