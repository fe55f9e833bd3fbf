use std::time::Duration;
use tracing::{error, info};

use crate::document::Document;
use crate::embedder::{EmbedError, Embedder};
use crate::store::ChunkStore;

/// Default pause between embedding calls, keeps under API rate limits
pub const DEFAULT_EMBED_DELAY: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedStats {
    pub embedded: usize,
    pub saved: usize,
    pub failed: usize,
}

/// Embed every chunk of every document and store it.
///
/// An embedding failure aborts the run; a store failure is logged and the
/// chunk is counted as failed. `delay` is slept after each chunk.
pub async fn embed_documents<E: Embedder + ?Sized>(
    documents: &[Document],
    embedder: &E,
    store: &ChunkStore,
    delay: Duration,
) -> Result<EmbedStats, EmbedError> {
    let mut stats = EmbedStats::default();

    for (i, document) in documents.iter().enumerate() {
        for (j, chunk) in document.chunks.iter().enumerate() {
            let embedding = embedder.embed(&chunk.content).await?;
            stats.embedded += 1;

            let mut chunk = chunk.clone();
            chunk.embedding = embedding;

            match store.insert_chunk(&chunk, embedder.model_name()) {
                Ok(id) => {
                    stats.saved += 1;
                    info!(essay = i, chunk = j, id = %id, "saved");
                }
                Err(e) => {
                    stats.failed += 1;
                    error!(essay = i, chunk = j, error = %e, "failed to save chunk");
                }
            }

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Embeds text as [word count, char count]; fails on a marker text
    struct FakeEmbedder {
        calls: Mutex<Vec<String>>,
    }

    impl FakeEmbedder {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
            self.calls.lock().unwrap().push(text.to_string());
            if text == "boom" {
                return Err(EmbedError::EmptyResponse);
            }
            Ok(vec![
                text.split_whitespace().count() as f32,
                text.chars().count() as f32,
            ])
        }

        fn model_name(&self) -> &str {
            "fake"
        }
    }

    fn make_doc(url: &str, chunks: &[&str]) -> Document {
        let mut doc = Document::new("Docs", url, chunks.join(" "), 0);
        doc.chunks = chunks
            .iter()
            .map(|c| Chunk {
                source_title: "Docs".to_string(),
                source_url: url.to_string(),
                content: c.to_string(),
                content_length: c.chars().count(),
                content_tokens: c.split_whitespace().count(),
                embedding: vec![],
            })
            .collect();
        doc
    }

    #[tokio::test]
    async fn test_embeds_and_stores_every_chunk() {
        let store = ChunkStore::new_in_memory().unwrap();
        let embedder = FakeEmbedder::new();
        let docs = vec![
            make_doc("https://a", &["first chunk", "second one here"]),
            make_doc("https://b", &["third"]),
        ];

        let stats = embed_documents(&docs, &embedder, &store, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(
            stats,
            EmbedStats {
                embedded: 3,
                saved: 3,
                failed: 0
            }
        );
        assert_eq!(
            *embedder.calls.lock().unwrap(),
            vec!["first chunk", "second one here", "third"]
        );

        let stored = store.get_all_chunks().unwrap();
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().all(|c| c.model == "fake"));
        let third = stored.iter().find(|c| c.content == "third").unwrap();
        assert_eq!(third.embedding, vec![1.0, 5.0]);
    }

    #[tokio::test]
    async fn test_embed_failure_aborts() {
        let store = ChunkStore::new_in_memory().unwrap();
        let embedder = FakeEmbedder::new();
        let docs = vec![make_doc("https://a", &["ok", "boom", "never"])];

        let result = embed_documents(&docs, &embedder, &store, Duration::ZERO).await;

        assert!(matches!(result, Err(EmbedError::EmptyResponse)));
        assert_eq!(store.get_all_chunks().unwrap().len(), 1);
        assert_eq!(embedder.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_chunks() {
        let store = ChunkStore::new_in_memory().unwrap();
        let embedder = FakeEmbedder::new();
        let docs = vec![make_doc("https://a", &["one", "two"])];

        let start = tokio::time::Instant::now();
        embed_documents(&docs, &embedder, &store, Duration::from_secs(5))
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_secs(10));
    }
}
