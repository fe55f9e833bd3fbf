mod merge;
mod splitter;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{Chunk, Document};
use crate::tokenizer::TokenCounter;

pub use merge::merge_small_chunks;
pub use splitter::{SENTENCE_DELIMITER, split_sentences};

/// Maximum tokens per chunk at split time
pub const CHUNK_TOKEN_BUDGET: usize = 200;

/// Chunks below this many tokens are folded into their predecessor
pub const MIN_CHUNK_TOKENS: usize = 100;

/// Cookie-consent placeholder served instead of real page content
pub const DEAD_PAGE_SENTINEL: &str = "We do not use cookies of this type.";

/// Chunking knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkConfig {
    /// Split budget; `None` keeps every document as a single chunk
    pub token_budget: Option<usize>,
    /// Merge threshold; 0 disables the merge pass
    pub min_chunk_tokens: usize,
    /// Trimmed content equal to this string is treated as a dead page
    pub dead_page_sentinel: String,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            token_budget: Some(CHUNK_TOKEN_BUDGET),
            min_chunk_tokens: MIN_CHUNK_TOKENS,
            dead_page_sentinel: DEAD_PAGE_SENTINEL.to_string(),
        }
    }
}

/// Turns documents into token-bounded retrieval chunks
pub struct Chunker<T> {
    counter: T,
    config: ChunkConfig,
}

impl<T: TokenCounter> Chunker<T> {
    pub fn new(counter: T, config: ChunkConfig) -> Self {
        Self { counter, config }
    }

    pub fn with_defaults(counter: T) -> Self {
        Self::new(counter, ChunkConfig::default())
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    /// Token count under the same counter the chunker splits with
    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    /// Whether `text` is the dead-page placeholder once trimmed
    pub fn is_dead_page(&self, text: &str) -> bool {
        text.trim() == self.config.dead_page_sentinel
    }

    /// Chunk a document's content:
    /// - Dead pages return `None`
    /// - Content within budget becomes a single trimmed chunk
    /// - Longer content is split on `". "` and greedily packed up to the budget
    /// - Undersized chunks are then merged into their predecessor
    ///
    /// Empty or whitespace-only content yields a document with no chunks.
    pub fn chunk(&self, mut document: Document) -> Option<Document> {
        if self.is_dead_page(&document.content) {
            debug!(url = %document.url, "skipping dead page content");
            return None;
        }

        let texts = match self.config.token_budget {
            Some(budget) if self.counter.count(&document.content) > budget => {
                split_sentences(&document.content, budget, &self.counter)
            }
            _ => vec![document.content.trim().to_string()],
        };

        let chunks: Vec<Chunk> = texts
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty() && !self.is_dead_page(text))
            .map(|text| Chunk {
                source_title: document.title.clone(),
                source_url: document.url.clone(),
                content: text.to_string(),
                content_length: text.chars().count(),
                content_tokens: self.counter.count(text),
                embedding: Vec::new(),
            })
            .collect();

        let split_count = chunks.len();
        document.chunks = merge_small_chunks(chunks, self.config.min_chunk_tokens);

        debug!(
            url = %document.url,
            tokens = document.tokens,
            split = split_count,
            merged = document.chunks.len(),
            "chunked document"
        );

        Some(document)
    }
}
