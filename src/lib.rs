// Public API exports
pub mod chunker;
pub mod config;
pub mod crawler;
pub mod document;
pub mod embedder;
pub mod pipeline;
pub mod sanitizer;
pub mod search;
pub mod store;
pub mod tokenizer;

// Re-export main types for convenience
pub use sanitizer::sanitize;
pub use tokenizer::{Gpt2Tokenizer, TokenCounter, TokenizerError, WhitespaceTokenizer};

pub use document::{Chunk, Document, ScrapeOutput};

pub use chunker::{
    CHUNK_TOKEN_BUDGET, ChunkConfig, Chunker, DEAD_PAGE_SENTINEL, MIN_CHUNK_TOKENS,
};

pub use crawler::{
    CrawlConfig, CrawlError, HttpPageSource, Link, LinkFilter, PageSource, crawl, page_documents,
};

pub use embedder::{EmbedError, Embedder, EmbeddingClient, EmbeddingModelInfo};

pub use pipeline::{EmbedStats, embed_documents};
pub use search::{SearchMatch, build_prompt, cosine_similarity};
pub use store::{ChunkStore, StoreStats, StoredChunk};
