//! OpenAI-compatible embedding client implementation.
//!
//! Wraps [`async_openai`] to provide [`EmbedderClient`] for any endpoint that
//! speaks the OpenAI Embeddings API (Gemini's included), with chunked batch
//! support and exponential-backoff retry.

use async_openai::{
    config::OpenAIConfig, error::OpenAIError, types::CreateEmbeddingRequestArgs, Client,
};
use backoff::{future::retry, ExponentialBackoffBuilder};
use std::time::Duration;
use tracing::warn;

use crate::embedder::{EmbedderClient, Embedding};
use crate::errors::{EpisodeGraphError, Result};
use crate::types::EpisodeGraphConfig;

/// Maximum number of inputs per embeddings API call.
const BATCH_CHUNK_SIZE: usize = 2048;

/// Return the embedding dimension for a given model name.
///
/// Falls back to 768 (the `text-embedding-004` dimension) for unrecognised models.
fn model_dim(model: &str) -> usize {
    match model.trim_start_matches("models/") {
        "gemini-embedding-001" | "text-embedding-3-large" => 3072,
        "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
        _ => 768,
    }
}

/// Classify an [`OpenAIError`] as transient (should retry) or permanent.
fn classify_error(err: OpenAIError) -> backoff::Error<EpisodeGraphError> {
    let msg = err.to_string();
    match &err {
        OpenAIError::Reqwest(e) if e.is_timeout() || e.is_connect() => {
            warn!(error = %msg, "embedding call failed, retrying with backoff");
            backoff::Error::transient(EpisodeGraphError::Embedder(msg))
        }
        _ => backoff::Error::permanent(EpisodeGraphError::Embedder(msg)),
    }
}

/// Embedding client that implements [`EmbedderClient`].
pub struct OpenAiEmbedder {
    client: Client<OpenAIConfig>,
    model: String,
    dim: usize,
}

impl OpenAiEmbedder {
    /// Create a new embedder.
    ///
    /// # Arguments
    /// * `api_key`  – Secret key for the endpoint.
    /// * `api_base` – Base URL of the OpenAI-compatible API.
    /// * `model`    – Embedding model name (e.g. `"text-embedding-004"`).
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let dim = model_dim(&model);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
            model,
            dim,
        }
    }

    /// Build an embedder from the loaded configuration.
    pub fn from_config(config: &EpisodeGraphConfig) -> Self {
        Self::new(&config.api_key, &config.api_base, &config.embedding_model)
    }

    /// Issue a single embeddings API call for up to [`BATCH_CHUNK_SIZE`] texts.
    ///
    /// Retries on transient network failures with exponential back-off
    /// (initial 500 ms, cap 10 s, total budget 60 s).
    async fn embed_chunk(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(500))
            .with_max_interval(Duration::from_secs(10))
            .with_max_elapsed_time(Some(Duration::from_secs(60)))
            .build();

        let input: Vec<String> = texts.iter().map(|s| (*s).to_owned()).collect();
        let model = self.model.clone();
        let client = self.client.clone();

        let embeddings = retry(policy, move || {
            let input = input.clone();
            let model = model.clone();
            let client = client.clone();
            async move {
                let request = CreateEmbeddingRequestArgs::default()
                    .model(model.as_str())
                    .input(input)
                    .build()
                    .map_err(|e| {
                        backoff::Error::permanent(EpisodeGraphError::Embedder(e.to_string()))
                    })?;

                let response = client
                    .embeddings()
                    .create(request)
                    .await
                    .map_err(classify_error)?;

                let mut data = response.data;
                data.sort_by_key(|item| item.index);
                Ok::<Vec<Embedding>, backoff::Error<EpisodeGraphError>>(
                    data.into_iter()
                        .map(|item| item.embedding.into_iter().map(|x| x as f32).collect())
                        .collect(),
                )
            }
        })
        .await?;

        if embeddings.len() != texts.len() {
            return Err(EpisodeGraphError::Embedder(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }
}

impl EmbedderClient for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let mut embeddings = self.embed_chunk(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EpisodeGraphError::Embedder("empty response from embedding API".to_string()))
    }

    /// Embed multiple texts, splitting into chunks of at most
    /// [`BATCH_CHUNK_SIZE`] items per call.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>> {
        let mut result = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_CHUNK_SIZE) {
            result.extend(self.embed_chunk(chunk).await?);
        }
        Ok(result)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}
