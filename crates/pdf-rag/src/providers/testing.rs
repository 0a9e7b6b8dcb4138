//! Deterministic collaborator stubs for unit tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Bag-of-words embedder over a fixed vocabulary.
///
/// Component `i` counts occurrences of `vocab[i]`; the final component is a
/// constant 1.0 so no vector is all zeros.
pub struct KeywordEmbedder {
    vocab: Vec<String>,
    batch_calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn new(vocab: &[&str]) -> Self {
        Self {
            vocab: vocab.iter().map(|w| w.to_string()).collect(),
            batch_calls: AtomicUsize::new(0),
        }
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.vocab.len() + 1];
        for word in text.split_whitespace() {
            if let Some(i) = self.vocab.iter().position(|v| v == word) {
                vector[i] += 1.0;
            }
        }
        vector[self.vocab.len()] = 1.0;
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.vocab.len() + 1
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "keyword-stub"
    }
}

/// Embedder that always fails
pub struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::embedding("embedder offline"))
    }

    fn dimensions(&self) -> usize {
        4
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &str {
        "failing-stub"
    }
}

/// Embedder returning a fixed (possibly malformed) batch
pub struct FixedEmbedder {
    pub vectors: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.vectors
            .first()
            .cloned()
            .ok_or_else(|| Error::embedding("no vectors"))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(self.vectors.clone())
    }

    fn dimensions(&self) -> usize {
        self.vectors.first().map(Vec::len).unwrap_or(0)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "fixed-stub"
    }
}

/// LLM stub returning a canned reply and recording the last prompt
pub struct StubLlm {
    reply: std::result::Result<String, String>,
    last_prompt: Mutex<Option<String>>,
}

impl StubLlm {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(diagnostic: &str) -> Self {
        Self {
            reply: Err(diagnostic.to_string()),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    async fn generate(&self, prompt: &str) -> Result<String> {
        *self.last_prompt.lock() = Some(prompt.to_string());
        self.reply.clone().map_err(Error::Generation)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}
