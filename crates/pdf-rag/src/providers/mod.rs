//! Collaborator abstractions for embeddings and language-model generation
//!
//! Trait objects let the store and composer run against Ollama, a local ONNX
//! model, or test stubs without changing retrieval logic.

pub mod embedding;
pub mod llm;
pub mod ollama;
pub mod ollama_cli;

#[cfg(feature = "onnx")]
pub mod onnx;

#[cfg(any(feature = "onnx", test))]
mod pooling;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::config::{EmbeddingBackend, LlmBackend, RagConfig};
use crate::error::Result;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use ollama_cli::OllamaCli;

#[cfg(feature = "onnx")]
pub use onnx::OnnxEmbedder;

/// Build the embedding provider selected by `embeddings.backend`
pub async fn build_embedder(config: &RagConfig) -> Result<Arc<dyn EmbeddingProvider>> {
    match config.embeddings.backend {
        EmbeddingBackend::Ollama => {
            tracing::info!("Embedding with Ollama model {}", config.llm.embed_model);
            Ok(Arc::new(OllamaEmbedder::new(
                &config.llm,
                config.embeddings.dimensions(),
            )?))
        }
        #[cfg(feature = "onnx")]
        EmbeddingBackend::Onnx => Ok(Arc::new(OnnxEmbedder::new(&config.embeddings).await?)),
        #[cfg(not(feature = "onnx"))]
        EmbeddingBackend::Onnx => Err(crate::error::Error::Config(
            "embeddings.backend = \"onnx\" requires the `onnx` feature".to_string(),
        )),
    }
}

/// Build the language-model provider selected by `llm.backend`
pub fn build_llm(config: &RagConfig) -> Result<Arc<dyn LlmProvider>> {
    let llm: Arc<dyn LlmProvider> = match config.llm.backend {
        LlmBackend::Cli => Arc::new(OllamaCli::new(&config.llm)),
        LlmBackend::Http => Arc::new(OllamaLlm::new(&config.llm)?),
    };
    tracing::info!("Generating with {} ({})", llm.model(), llm.name());
    Ok(llm)
}
