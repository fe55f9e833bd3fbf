mod gpt2;

pub use gpt2::{Gpt2Tokenizer, TokenizerError};

/// Counts tokens for budget decisions.
///
/// Implementations must be deterministic: the chunker compares counts of
/// buffers and sentences against each other, so the same text has to yield
/// the same count for a whole run.
pub trait TokenCounter: Send + Sync {
    /// Number of tokens `text` encodes to
    fn count(&self, text: &str) -> usize;
}

/// Cheap word-count estimate: one token per whitespace-separated word
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl TokenCounter for WhitespaceTokenizer {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for &T {
    fn count(&self, text: &str) -> usize {
        (**self).count(text)
    }
}

impl<T: TokenCounter + ?Sized> TokenCounter for Box<T> {
    fn count(&self, text: &str) -> usize {
        (**self).count(text)
    }
}
