use crate::document::Chunk;

/// Fold every chunk after the first that has fewer than `min_tokens` tokens
/// into the chunk kept before it.
///
/// Content is joined with a single space; length and token counts are summed,
/// so a merged chunk may exceed the split budget.
pub fn merge_small_chunks(chunks: Vec<Chunk>, min_tokens: usize) -> Vec<Chunk> {
    chunks
        .into_iter()
        .fold(Vec::new(), |mut merged: Vec<Chunk>, chunk| {
            match merged.last_mut() {
                Some(prev) if chunk.content_tokens < min_tokens => {
                    prev.content.push(' ');
                    prev.content.push_str(&chunk.content);
                    prev.content_length += chunk.content_length;
                    prev.content_tokens += chunk.content_tokens;
                }
                _ => merged.push(chunk),
            }
            merged
        })
}
