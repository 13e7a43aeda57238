//! Embeddings from a model server speaking the OpenAI `/embeddings` API
//! (text-embeddings-inference, llama.cpp, Ollama, LocalAI, ...).
//!
//! Uses the blocking client: call it from a plain thread or a blocking pool,
//! never directly from an async task.

use distrag_core::{Embedder, Error, Result, Vector};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpEmbedderConfig {
    /// Base URL, e.g. `http://localhost:8080/v1`
    pub base_url: String,
    pub model: String,
    pub dim: usize,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl HttpEmbedderConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, dim: usize) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            dim,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

pub struct HttpEmbedder {
    client: reqwest::blocking::Client,
    endpoint: String,
    config: HttpEmbedderConfig,
}

impl HttpEmbedder {
    pub fn new(config: HttpEmbedderConfig) -> Result<Self> {
        if config.dim == 0 {
            return Err(Error::InvalidConfig("embedding dimension must be positive".to_string()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Embedding(format!("failed to build HTTP client: {}", e)))?;
        let endpoint = format!("{}/embeddings", config.base_url.trim_end_matches('/'));

        Ok(Self { client, endpoint, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, texts: &[String]) -> Result<Vec<Vector>> {
        let body = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .map_err(|e| Error::Embedding(format!("request to {} failed: {}", self.endpoint, e)))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(Error::Embedding(format!(
                "{} returned {}: {}",
                self.endpoint, status, detail
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| Error::Embedding(format!("invalid response body: {}", e)))?;
        decode(parsed, texts.len(), self.config.dim)
    }
}

/// Order embeddings by their `index` and check count and dimension
fn decode(response: EmbeddingResponse, expected: usize, dim: usize) -> Result<Vec<Vector>> {
    if response.data.len() != expected {
        return Err(Error::Embedding(format!(
            "expected {} embeddings, got {}",
            expected,
            response.data.len()
        )));
    }

    let mut slots: Vec<Option<Vector>> = vec![None; expected];
    for (fallback, item) in response.data.into_iter().enumerate() {
        let slot = item.index.unwrap_or(fallback);
        if slot >= expected || slots[slot].is_some() {
            return Err(Error::Embedding(format!("bad embedding index {}", slot)));
        }
        if item.embedding.len() != dim {
            return Err(Error::InvalidDimension {
                expected: dim,
                actual: item.embedding.len(),
            });
        }
        slots[slot] = Some(Vector::new(item.embedding));
    }

    slots
        .into_iter()
        .map(|v| v.ok_or_else(|| Error::Embedding("missing embedding in response".to_string())))
        .collect()
}

impl Embedder for HttpEmbedder {
    fn dim(&self) -> usize {
        self.config.dim
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn encode(&self, text: &str) -> Result<Vector> {
        let mut vectors = self.request(&[text.to_string()])?;
        vectors
            .pop()
            .ok_or_else(|| Error::Embedding("empty response".to_string()))
    }

    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        tracing::debug!("Requesting {} embeddings from {}", texts.len(), self.endpoint);
        self.request(texts)
    }
}
