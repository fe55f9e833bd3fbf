use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::document::Chunk;
use crate::search::{SearchMatch, rank_by_similarity};

/// A chunk row as persisted, embedding included
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub id: String,
    pub essay_title: String,
    pub essay_url: String,
    pub content: String,
    pub content_length: usize,
    pub content_tokens: usize,
    pub embedding: Vec<f32>,
    pub model: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreStats {
    pub chunk_count: u32,
    pub embedded_count: u32,
    pub total_tokens: u64,
}

pub struct ChunkStore {
    conn: Connection,
}

const SELECT_COLUMNS: &str = "SELECT id, essay_title, essay_url, content, content_length, content_tokens, embedding, model, created_at FROM chunks";

impl ChunkStore {
    /// Create a new in-memory database
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory database")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open (or create) a database file
    pub fn open(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                essay_title TEXT NOT NULL,
                essay_url TEXT NOT NULL,
                content TEXT NOT NULL,
                content_length INTEGER NOT NULL,
                content_tokens INTEGER NOT NULL,
                embedding BLOB NOT NULL,
                model TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_chunks_url ON chunks(essay_url);
            "#,
            )
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Row key: SHA-256 over title, url and content
    pub fn chunk_id(essay_title: &str, essay_url: &str, content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(essay_title.as_bytes());
        hasher.update([0u8]);
        hasher.update(essay_url.as_bytes());
        hasher.update([0u8]);
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Insert or replace a chunk, returning its row id
    pub fn insert_chunk(&self, chunk: &Chunk, model: &str) -> Result<String> {
        let id = Self::chunk_id(&chunk.source_title, &chunk.source_url, &chunk.content);

        self.conn
            .execute(
                "INSERT OR REPLACE INTO chunks (id, essay_title, essay_url, content, content_length, content_tokens, embedding, model, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    chunk.source_title,
                    chunk.source_url,
                    chunk.content,
                    chunk.content_length as i64,
                    chunk.content_tokens as i64,
                    encode_vector(&chunk.embedding),
                    model,
                    Utc::now().to_rfc3339(),
                ],
            )
            .context(format!("Failed to insert chunk from {}", chunk.source_url))?;
        Ok(id)
    }

    /// Get all chunks
    pub fn get_all_chunks(&self) -> Result<Vec<StoredChunk>> {
        let mut stmt = self
            .conn
            .prepare(SELECT_COLUMNS)
            .context("Failed to prepare statement")?;

        let chunks = stmt
            .query_map([], read_chunk)
            .context("Failed to query chunks")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to collect chunks")?;

        Ok(chunks)
    }

    /// Get a chunk by row id
    pub fn get_chunk(&self, id: &str) -> Result<Option<StoredChunk>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
            .context("Failed to prepare statement")?;

        let mut rows = stmt.query(params![id]).context("Failed to query chunk")?;
        match rows.next().context("Failed to get next row")? {
            Some(row) => Ok(Some(read_chunk(row)?)),
            None => Ok(None),
        }
    }

    /// Nearest chunks to `query` by cosine similarity, best first.
    /// Rows without an embedding are never returned.
    pub fn search(
        &self,
        query: &[f32],
        match_count: usize,
        match_threshold: f32,
    ) -> Result<Vec<SearchMatch>> {
        let chunks = self
            .get_all_chunks()?
            .into_iter()
            .filter(|c| !c.embedding.is_empty())
            .collect();
        Ok(rank_by_similarity(query, chunks, match_count, match_threshold))
    }

    /// Get statistics
    pub fn get_stats(&self) -> Result<StoreStats> {
        let (chunk_count, embedded_count, total_tokens): (u32, u32, i64) = self
            .conn
            .query_row(
                "SELECT COUNT(*), COUNT(CASE WHEN length(embedding) > 0 THEN 1 END), COALESCE(SUM(content_tokens), 0) FROM chunks",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .context("Failed to count chunks")?;

        Ok(StoreStats {
            chunk_count,
            embedded_count,
            total_tokens: total_tokens as u64,
        })
    }
}

fn read_chunk(row: &Row<'_>) -> rusqlite::Result<StoredChunk> {
    let vector_bytes: Vec<u8> = row.get(6)?;
    let content_length: i64 = row.get(4)?;
    let content_tokens: i64 = row.get(5)?;

    Ok(StoredChunk {
        id: row.get(0)?,
        essay_title: row.get(1)?,
        essay_url: row.get(2)?,
        content: row.get(3)?,
        content_length: content_length as usize,
        content_tokens: content_tokens as usize,
        embedding: decode_vector(&vector_bytes),
        model: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Vec<f32> to little-endian bytes
fn encode_vector(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn decode_vector(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
