use thiserror::Error;
use tiktoken_rs::{CoreBPE, r50k_base};

use super::TokenCounter;

#[derive(Error, Debug)]
pub enum TokenizerError {
    #[error("Failed to load BPE vocabulary: {0}")]
    LoadFailed(String),
}

/// GPT-2/GPT-3 byte-pair tokenizer (`r50k_base` vocabulary)
pub struct Gpt2Tokenizer {
    bpe: CoreBPE,
}

impl Gpt2Tokenizer {
    /// Load the embedded `r50k_base` ranks
    pub fn new() -> Result<Self, TokenizerError> {
        let bpe = r50k_base().map_err(|e| TokenizerError::LoadFailed(e.to_string()))?;
        Ok(Self { bpe })
    }

    /// Encode `text` into token ids, treating special-token text as plain text
    pub fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_ordinary(text)
    }
}

impl TokenCounter for Gpt2Tokenizer {
    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}
