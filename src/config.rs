use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::chunker::ChunkConfig;
use crate::crawler::CrawlConfig;
use crate::embedder::EmbeddingModelInfo;

/// Environment variable holding the embeddings API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Overrides `embedding.base_url` when set
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub crawl: CrawlConfig,
    pub chunking: ChunkConfig,
    pub embedding: EmbeddingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub base_url: String,
    pub model: String,
    /// Expected vector size; 0 accepts any
    pub dim: usize,
    /// Pause after each embedding call
    pub delay_ms: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        let model = EmbeddingModelInfo::default();
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: model.name,
            dim: model.dim,
            delay_ms: 5000,
        }
    }
}

impl EmbeddingSettings {
    pub fn model_info(&self) -> EmbeddingModelInfo {
        EmbeddingModelInfo::new(&self.model, self.dim)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Settings {
    /// Defaults, overlaid with a JSON file when given, then with the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .context(format!("Failed to read settings: {}", path.display()))?;
        serde_json::from_str(&raw).context(format!("Failed to parse settings: {}", path.display()))
    }

    fn apply_env(&mut self) {
        if let Ok(base_url) = env::var(BASE_URL_VAR) {
            debug!(base_url = %base_url, "embedding base url from environment");
            self.embedding.base_url = base_url;
        }
    }
}

/// Load `.env.local` then `.env` from the working directory, if present.
/// Variables already set win over both files.
pub fn load_dotenv() {
    for file in [".env.local", ".env"] {
        if let Ok(path) = dotenvy::from_filename(file) {
            debug!(path = %path.display(), "loaded environment file");
        }
    }
}

/// Embeddings API key from the environment
pub fn api_key() -> Option<String> {
    env::var(API_KEY_VAR).ok().filter(|key| !key.is_empty())
}
