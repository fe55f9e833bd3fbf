pub mod client;
pub mod model;
pub mod types;


use async_trait::async_trait;

pub use client::{EmbedError, EmbeddingClient};
pub use model::EmbeddingModelInfo;
pub use types::{EmbeddingRequest, EmbeddingResponse};

/// Turns chunk text into a vector
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    /// Model name recorded next to stored vectors
    fn model_name(&self) -> &str;
}
