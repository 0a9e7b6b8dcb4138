//! Application state for the PDF RAG server

use serde::Serialize;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::AnswerComposer;
use crate::providers::{build_embedder, build_llm, EmbeddingProvider, LlmProvider};
use crate::retrieval::RetrievalStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// The single loaded document and its index
    store: RetrievalStore,
    /// Prompt assembly and generation
    composer: AnswerComposer,
}

/// Collaborator availability reported by `/ready`
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Readiness {
    /// Embedding provider answered its health check
    pub embedder: bool,
    /// Language model answered its health check
    pub llm: bool,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.embedder && self.llm
    }
}

impl AppState {
    /// Build providers from the configuration and create the state
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing PDF RAG application state...");

        let embedder = build_embedder(&config).await?;
        let llm = build_llm(&config)?;

        Self::from_parts(config, embedder, llm)
    }

    /// Create the state around existing providers
    pub fn from_parts(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let store = RetrievalStore::from_config(embedder, &config)?;
        tracing::info!(
            "Retrieval store initialized (chunk size {}, {:?} index)",
            store.chunk_size(),
            config.retrieval.index
        );

        let composer = AnswerComposer::new(llm);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                composer,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the retrieval store
    pub fn store(&self) -> &RetrievalStore {
        &self.inner.store
    }

    /// Get the answer composer
    pub fn composer(&self) -> &AnswerComposer {
        &self.inner.composer
    }

    /// Run both collaborator health checks; errors count as unavailable
    pub async fn readiness(&self) -> Readiness {
        let embedder = self.store().embedder().health_check();
        let llm = self.composer().llm().health_check();
        let (embedder, llm) = tokio::join!(embedder, llm);

        Readiness {
            embedder: matches!(embedder, Ok(true)),
            llm: matches!(llm, Ok(true)),
        }
    }
}
