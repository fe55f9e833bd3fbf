use crate::tokenizer::TokenCounter;

/// Naive sentence boundary: a period followed by a space.
///
/// Abbreviations and decimals get split too; chunk sizes were tuned
/// against this rule, so it stays literal.
pub const SENTENCE_DELIMITER: &str = ". ";

/// Split `content` into sentences and pack them into chunks of at most
/// `budget` tokens (checked before each append).
///
/// A sentence ending in an ASCII letter or digit gets `". "` re-appended,
/// anything else (including an empty sentence) gets a single space.
/// Returned texts are untrimmed and never empty.
pub fn split_sentences<T: TokenCounter + ?Sized>(
    content: &str,
    budget: usize,
    counter: &T,
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();

    for sentence in content.split(SENTENCE_DELIMITER) {
        // Check if adding this sentence would exceed the budget
        if !buffer.is_empty() && counter.count(&buffer) + counter.count(sentence) > budget {
            chunks.push(std::mem::take(&mut buffer));
        }

        buffer.push_str(sentence);
        if ends_with_alphanumeric(sentence) {
            buffer.push_str(SENTENCE_DELIMITER);
        } else {
            buffer.push(' ');
        }
    }

    // Flush remaining buffer
    if !buffer.is_empty() {
        chunks.push(buffer);
    }

    chunks
}

fn ends_with_alphanumeric(sentence: &str) -> bool {
    sentence
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphanumeric())
}
