// client.rs - the HTTP embedder
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use super::Embedder;
use super::model::EmbeddingModelInfo;
use super::types::{EmbeddingRequest, EmbeddingResponse};

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Server returned error status {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Response contained no embedding")]
    EmptyResponse,

    #[error("Expected a {expected}-dimensional embedding, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Client for an OpenAI-compatible `/embeddings` endpoint
pub struct EmbeddingClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: EmbeddingModelInfo,
}

impl EmbeddingClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: EmbeddingModelInfo,
    ) -> Result<Self, EmbedError> {
        Self::with_timeout(base_url, api_key, model, Duration::from_secs(60))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: Option<String>,
        model: EmbeddingModelInfo,
        timeout: Duration,
    ) -> Result<Self, EmbedError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &EmbeddingModelInfo {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let req = EmbeddingRequest {
            model: &self.model.name,
            input: text,
        };

        let mut request = self.http.post(self.endpoint()).json(&req);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(EmbedError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let res: EmbeddingResponse = response.json().await?;
        let vector = res.into_first().ok_or(EmbedError::EmptyResponse)?;
        check_dimensions(&self.model, vector)
    }

    fn model_name(&self) -> &str {
        &self.model.name
    }
}

/// Reject vectors that don't match the configured model; `dim == 0` accepts any size
pub(crate) fn check_dimensions(
    model: &EmbeddingModelInfo,
    vector: Vec<f32>,
) -> Result<Vec<f32>, EmbedError> {
    if model.dim != 0 && vector.len() != model.dim {
        return Err(EmbedError::DimensionMismatch {
            expected: model.dim,
            actual: vector.len(),
        });
    }
    Ok(vector)
}
