// model.rs - stores metadata about the model you're using
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub name: String,
    pub dim: usize,
}

impl EmbeddingModelInfo {
    pub fn new(name: impl Into<String>, dim: usize) -> Self {
        Self {
            name: name.into(),
            dim,
        }
    }

    pub fn ada_002() -> Self {
        Self::new("text-embedding-ada-002", 1536)
    }
}

impl Default for EmbeddingModelInfo {
    fn default() -> Self {
        Self::ada_002()
    }
}
