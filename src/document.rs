use serde::{Deserialize, Serialize};

/// One scraped page section (a paragraph of a docs page)
///
/// Serialized with the `essay` field layout the scrape JSON has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Human-readable label of the source (link text)
    pub title: String,
    /// Canonical source address
    pub url: String,
    /// Sanitized full text
    pub content: String,
    /// Token count of `content`
    pub tokens: usize,
    /// Retrieval chunks in reading order
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

impl Document {
    /// Create a document that has not been chunked yet
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
        tokens: usize,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            tokens,
            chunks: Vec::new(),
        }
    }
}

/// A retrieval-unit passage derived from a [`Document`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(rename = "essay_title")]
    pub source_title: String,
    #[serde(rename = "essay_url")]
    pub source_url: String,
    /// Trimmed passage text
    pub content: String,
    /// Character count; summed (not recounted) when chunks merge
    pub content_length: usize,
    /// Token count; summed (not recounted) when chunks merge
    pub content_tokens: usize,
    /// Filled in by the embedder, empty until then
    #[serde(default)]
    pub embedding: Vec<f32>,
}

/// Result of one scrape run, written to disk as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapeOutput {
    pub total_tokens: usize,
    pub total_essays: usize,
    pub essays: Vec<Document>,
}

impl ScrapeOutput {
    /// Build the output and its totals from the collected documents
    pub fn from_documents(essays: Vec<Document>) -> Self {
        Self {
            total_tokens: essays.iter().map(|e| e.tokens).sum(),
            total_essays: essays.len(),
            essays,
        }
    }

    /// Total number of chunks across all documents
    pub fn chunk_count(&self) -> usize {
        self.essays.iter().map(|e| e.chunks.len()).sum()
    }
}
