use super::*;
use crate::tokenizer::{Gpt2Tokenizer, WhitespaceTokenizer};

/// A sentence of exactly `words` whitespace tokens, tagged so sentences stay distinct
fn make_sentence(tag: &str, words: usize) -> String {
    (0..words)
        .map(|i| format!("{}{}", tag, i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join sentences the way prose reads: ". " between, "." at the end
fn make_content(sizes: &[usize]) -> String {
    let sentences: Vec<String> = sizes
        .iter()
        .enumerate()
        .map(|(i, &words)| make_sentence(&format!("s{}w", i), words))
        .collect();
    format!("{}.", sentences.join(". "))
}

fn make_doc(content: &str) -> Document {
    Document::new(
        "Getting started",
        "https://docs.example.com/start",
        content,
        WhitespaceTokenizer.count(content),
    )
}

fn word_chunker(budget: Option<usize>, min_tokens: usize) -> Chunker<WhitespaceTokenizer> {
    Chunker::new(
        WhitespaceTokenizer,
        ChunkConfig {
            token_budget: budget,
            min_chunk_tokens: min_tokens,
            ..ChunkConfig::default()
        },
    )
}

#[test]
fn test_defaults() {
    let config = ChunkConfig::default();
    assert_eq!(config.token_budget, Some(200));
    assert_eq!(config.min_chunk_tokens, 100);
    assert_eq!(config.dead_page_sentinel, "We do not use cookies of this type.");
}

#[test]
fn test_within_budget_is_single_trimmed_chunk() {
    let chunker = Chunker::with_defaults(WhitespaceTokenizer);
    let doc = chunker
        .chunk(make_doc("  Hello there. General Kenobi.  "))
        .unwrap();

    assert_eq!(doc.chunks.len(), 1);
    let chunk = &doc.chunks[0];
    assert_eq!(chunk.content, "Hello there. General Kenobi.");
    assert_eq!(chunk.content_length, 28);
    assert_eq!(chunk.content_tokens, 4);
    assert_eq!(chunk.source_title, "Getting started");
    assert_eq!(chunk.source_url, "https://docs.example.com/start");
    assert!(chunk.embedding.is_empty());
}

#[test]
fn test_exactly_budget_is_not_split() {
    let content = make_content(&[120, 80]);
    let doc = word_chunker(Some(200), 100).chunk(make_doc(&content)).unwrap();

    assert_eq!(doc.chunks.len(), 1);
    assert_eq!(doc.chunks[0].content, content);
}

#[test]
fn test_three_sentences_merge_into_one() {
    // 80 + 80 fit the budget, the third spills over and is then merged back
    let content = make_content(&[80, 80, 80]);
    let doc = word_chunker(Some(200), 100).chunk(make_doc(&content)).unwrap();

    assert_eq!(doc.chunks.len(), 1);
    assert_eq!(doc.chunks[0].content, content);
    assert_eq!(doc.chunks[0].content_tokens, 240);
}

#[test]
fn test_split_respects_budget_without_merge() {
    let content = make_content(&[20; 10]);
    let doc = word_chunker(Some(50), 0).chunk(make_doc(&content)).unwrap();

    assert_eq!(doc.chunks.len(), 5);
    for chunk in &doc.chunks[..doc.chunks.len() - 1] {
        assert!(chunk.content_tokens <= 50, "chunk over budget: {}", chunk.content_tokens);
    }
}

#[test]
fn test_split_and_merge_token_counts() {
    // Split yields [150, 195, 60, 150, 70]; the 60 and 70 fold backwards
    let content = make_content(&[150, 195, 60, 150, 70]);
    let doc = word_chunker(Some(200), 100).chunk(make_doc(&content)).unwrap();

    let tokens: Vec<usize> = doc.chunks.iter().map(|c| c.content_tokens).collect();
    assert_eq!(tokens, vec![150, 255, 220]);

    for chunk in &doc.chunks[1..] {
        assert!(chunk.content_tokens >= 100);
    }
}

#[test]
fn test_chunks_preserve_sentence_order() {
    let content = make_content(&[150, 195, 60, 150, 70, 33, 180, 12]);
    let doc = word_chunker(Some(200), 100).chunk(make_doc(&content)).unwrap();

    let rebuilt = doc
        .chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(rebuilt, content);
}

#[test]
fn test_punctuation_rule_reproduced() {
    let doc = word_chunker(Some(5), 0)
        .chunk(make_doc("Are you sure?. Yes I am. Good"))
        .unwrap();

    let contents: Vec<&str> = doc.chunks.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["Are you sure?", "Yes I am. Good."]);
}

#[test]
fn test_dead_page_returns_none() {
    let chunker = Chunker::with_defaults(WhitespaceTokenizer);
    assert!(chunker.chunk(make_doc(DEAD_PAGE_SENTINEL)).is_none());
    assert!(
        chunker
            .chunk(make_doc("  We do not use cookies of this type.  "))
            .is_none()
    );
    assert!(chunker.chunk(make_doc("We use cookies of this type.")).is_some());
}

#[test]
fn test_trailing_sentinel_fragment_dropped() {
    let content = format!("{}. {}", make_sentence("w", 12), DEAD_PAGE_SENTINEL);
    let doc = word_chunker(Some(10), 0).chunk(make_doc(&content)).unwrap();

    assert_eq!(doc.chunks.len(), 1);
    assert_eq!(doc.chunks[0].content, format!("{}.", make_sentence("w", 12)));
}

#[test]
fn test_custom_sentinel() {
    let chunker = Chunker::new(
        WhitespaceTokenizer,
        ChunkConfig {
            dead_page_sentinel: "Page not found".to_string(),
            ..ChunkConfig::default()
        },
    );

    assert!(chunker.chunk(make_doc("Page not found")).is_none());
    assert!(chunker.chunk(make_doc(DEAD_PAGE_SENTINEL)).is_some());
}

#[test]
fn test_no_budget_keeps_whole_content() {
    let content = make_content(&[300, 300]);
    let doc = word_chunker(None, 100).chunk(make_doc(&content)).unwrap();

    assert_eq!(doc.chunks.len(), 1);
    assert_eq!(doc.chunks[0].content_tokens, 600);
}

#[test]
fn test_empty_content_yields_no_chunks() {
    let chunker = Chunker::with_defaults(WhitespaceTokenizer);

    let empty = chunker.chunk(make_doc("")).unwrap();
    assert!(empty.chunks.is_empty());

    let blank = chunker.chunk(make_doc("   \u{00A0}  ")).unwrap();
    assert!(blank.chunks.is_empty());
}

#[test]
fn test_document_fields_preserved() {
    let content = make_content(&[10, 10]);
    let doc = make_doc(&content);
    let chunked = Chunker::with_defaults(WhitespaceTokenizer)
        .chunk(doc.clone())
        .unwrap();

    assert_eq!(chunked.title, doc.title);
    assert_eq!(chunked.url, doc.url);
    assert_eq!(chunked.content, doc.content);
    assert_eq!(chunked.tokens, doc.tokens);
}

#[test]
fn test_gpt2_tokenizer_invariants() {
    let tokenizer = Gpt2Tokenizer::new().unwrap();
    let content = (0..120)
        .map(|i| format!("The modem on site {} reports its signal strength to the portal every hour", i))
        .collect::<Vec<_>>()
        .join(". ");

    let split_only = Chunker::new(
        &tokenizer,
        ChunkConfig {
            min_chunk_tokens: 0,
            ..ChunkConfig::default()
        },
    );
    let doc = split_only
        .chunk(Document::new("Modems", "https://docs.example.com/modems", content.clone(), 0))
        .unwrap();

    assert!(doc.chunks.len() > 1);
    for chunk in &doc.chunks[..doc.chunks.len() - 1] {
        // The re-appended period can add one token past the pre-append check
        assert!(chunk.content_tokens <= CHUNK_TOKEN_BUDGET + 2);
    }

    let merged = Chunker::with_defaults(&tokenizer)
        .chunk(Document::new("Modems", "https://docs.example.com/modems", content, 0))
        .unwrap();
    for chunk in &merged.chunks[1..] {
        assert!(chunk.content_tokens >= MIN_CHUNK_TOKENS);
    }
    assert!(merged.chunks[0].content.starts_with("The modem on site 0 "));
    assert!(merged.chunks.last().unwrap().content.contains("site 119 "));
}
