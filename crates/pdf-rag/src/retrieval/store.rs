//! Single-document retrieval store
//!
//! Holds at most one loaded document. A load builds the new chunk list and
//! index off to the side and swaps it in whole, so readers see either the old
//! document or the new one, never a mix. Queries take a snapshot of the
//! current document and release the lock before awaiting the embedder.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::{RagConfig, RetrievalConfig};
use crate::error::{Error, Result};
use crate::ingestion::WordChunker;
use crate::providers::EmbeddingProvider;
use crate::types::{Chunk, DocumentInfo, LoadResult, RetrievedChunk};

use super::index::{build_index, validate_vectors, VectorIndex};

/// Number of chunks echoed back by a load
pub const PREVIEW_CHUNKS: usize = 3;

/// Name used when a document is loaded without one
const UNNAMED_DOCUMENT: &str = "document";

/// A loaded document: its chunks and the index over their embeddings.
/// Vector `i` in the index belongs to `chunks[i]`.
pub struct DocumentIndex {
    name: String,
    chunks: Vec<Chunk>,
    index: Box<dyn VectorIndex>,
    loaded_at: DateTime<Utc>,
}

impl DocumentIndex {
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            name: self.name.clone(),
            chunk_count: self.chunks.len(),
            dimensions: self.index.dimensions(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Chunks, embeds and indexes one document at a time and answers
/// nearest-chunk queries against it
pub struct RetrievalStore {
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: WordChunker,
    config: RetrievalConfig,
    current: RwLock<Option<Arc<DocumentIndex>>>,
    /// Serializes loads; queries never wait on it
    load_gate: Mutex<()>,
}

impl RetrievalStore {
    /// Create an empty store
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        chunker: WordChunker,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            embedder,
            chunker,
            config,
            current: RwLock::new(None),
            load_gate: Mutex::new(()),
        }
    }

    /// Create an empty store from the chunking and retrieval sections
    pub fn from_config(embedder: Arc<dyn EmbeddingProvider>, config: &RagConfig) -> Result<Self> {
        let chunker = WordChunker::new(config.chunking.chunk_size)?;
        Ok(Self::new(embedder, chunker, config.retrieval.clone()))
    }

    /// Replace the loaded document with `text`
    pub async fn load(&self, text: &str) -> Result<LoadResult> {
        self.load_named(UNNAMED_DOCUMENT, text).await
    }

    /// Replace the loaded document with `text`, remembering `name`.
    ///
    /// Text with no words clears the store without calling the embedder.
    /// On error the previously loaded document stays in place.
    pub async fn load_named(&self, name: &str, text: &str) -> Result<LoadResult> {
        let _gate = self.load_gate.lock().await;

        let pieces = self.chunker.chunk(text);
        if pieces.is_empty() {
            *self.current.write() = None;
            tracing::info!("Document '{}' has no words; store cleared", name);
            return Ok(LoadResult {
                chunk_count: 0,
                preview: Vec::new(),
            });
        }

        tracing::info!(
            "Embedding {} chunks of '{}' with {}",
            pieces.len(),
            name,
            self.embedder.name()
        );

        let vectors = self.embedder.embed_batch(&pieces).await?;
        if vectors.len() != pieces.len() {
            return Err(Error::embedding(format!(
                "Embedder returned {} vectors for {} chunks",
                vectors.len(),
                pieces.len()
            )));
        }
        validate_vectors(&vectors).map_err(|e| match e {
            Error::VectorIndex(msg) => Error::Embedding(msg),
            other => other,
        })?;

        let config = self.config.clone();
        let index = tokio::task::spawn_blocking(move || build_index(&config, vectors))
            .await
            .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        let preview: Vec<String> = pieces.iter().take(PREVIEW_CHUNKS).cloned().collect();
        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(i, content)| Chunk::new(i, content))
            .collect();
        let chunk_count = chunks.len();

        let document = Arc::new(DocumentIndex {
            name: name.to_string(),
            chunks,
            index,
            loaded_at: Utc::now(),
        });

        tracing::info!(
            "Loaded '{}': {} chunks, {} dimensions, {} index",
            name,
            chunk_count,
            document.index.dimensions(),
            document.index.name()
        );

        *self.current.write() = Some(document);

        Ok(LoadResult {
            chunk_count,
            preview,
        })
    }

    /// Up to `k` chunks nearest to `question`, nearest first.
    /// Equal distances keep document order.
    pub async fn query(&self, question: &str, k: usize) -> Result<Vec<RetrievedChunk>> {
        if k == 0 {
            return Err(Error::InvalidRequest("k must be at least 1".to_string()));
        }

        let document = self.current().ok_or(Error::NoDocumentLoaded)?;

        let vector = self.embedder.embed(question).await?;
        if vector.len() != document.index.dimensions() {
            return Err(Error::embedding(format!(
                "Question embedding has {} dimensions, document index has {}",
                vector.len(),
                document.index.dimensions()
            )));
        }

        let hits = document.index.search(&vector, k)?;

        hits.into_iter()
            .map(|hit| {
                let chunk = document.chunks.get(hit.id).cloned().ok_or_else(|| {
                    Error::vector_index(format!("Index returned unknown position {}", hit.id))
                })?;
                Ok(RetrievedChunk {
                    chunk,
                    distance: hit.distance,
                })
            })
            .collect()
    }

    /// Snapshot of the loaded document
    pub fn current(&self) -> Option<Arc<DocumentIndex>> {
        self.current.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    /// Chunks in the loaded document, 0 when none
    pub fn chunk_count(&self) -> usize {
        self.current.read().as_ref().map_or(0, |d| d.chunk_count())
    }

    pub fn info(&self) -> Option<DocumentInfo> {
        self.current().map(|d| d.info())
    }

    /// Drop the loaded document
    pub async fn clear(&self) {
        let _gate = self.load_gate.lock().await;
        *self.current.write() = None;
    }

    pub fn chunk_size(&self) -> usize {
        self.chunker.chunk_size()
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }
}
