use serde::Serialize;

use crate::store::StoredChunk;

/// Number of passages fed into a prompt by default
pub const DEFAULT_MATCH_COUNT: usize = 5;

/// Matches at or below this similarity are dropped
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.01;

#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub chunk: StoredChunk,
    pub similarity: f32,
}

/// Cosine similarity; 0.0 for zero vectors or mismatched lengths
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut na = 0.0;
    let mut nb = 0.0;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }

    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }

    dot / (na.sqrt() * nb.sqrt())
}

/// Keep chunks scoring above `threshold` against `query`, best first, at most `count`
pub fn rank_by_similarity(
    query: &[f32],
    chunks: Vec<StoredChunk>,
    count: usize,
    threshold: f32,
) -> Vec<SearchMatch> {
    let mut matches: Vec<SearchMatch> = chunks
        .into_iter()
        .map(|chunk| SearchMatch {
            similarity: cosine_similarity(query, &chunk.embedding),
            chunk,
        })
        .filter(|m| m.similarity > threshold)
        .collect();

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches.truncate(count);
    matches
}

/// Completion prompt grounding the answer in the matched passages
pub fn build_prompt<S: AsRef<str>>(query: &str, passages: &[S]) -> String {
    let passages = passages
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Use the following passages to answer the query: {}\n\n{}",
        query, passages
    )
}
