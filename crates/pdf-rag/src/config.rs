//! Configuration for the question-answering service
//!
//! Values come from `Default`, then an optional TOML file, then `PDF_RAG_*`
//! environment variables. The server binary applies its CLI flags last.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::retrieval::IndexKind;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "PDF_RAG_";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Upload persistence configuration
    pub uploads: UploadConfig,
}

impl RagConfig {
    /// Load configuration from an optional TOML file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a TOML configuration file; missing sections fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Apply `PDF_RAG_*` overrides using the given variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(size) = var("CHUNK_SIZE") {
            self.chunking.chunk_size = parse_var("CHUNK_SIZE", &size)?;
        }
        if let Some(top_k) = var("TOP_K") {
            self.retrieval.top_k = parse_var("TOP_K", &top_k)?;
        }
        if let Some(url) = var("OLLAMA_URL") {
            self.llm.base_url = url;
        }
        if let Some(model) = var("LLM_MODEL") {
            self.llm.generate_model = model;
        }
        if let Some(model) = var("EMBED_MODEL") {
            self.llm.embed_model = model;
        }
        if let Some(dir) = var("UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(dir);
        }

        Ok(())
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::Config("chunking.chunk_size must be at least 1".into()));
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be at least 1".into()));
        }
        if self.embeddings.dimensions == Some(0) {
            return Err(Error::Config("embeddings.dimensions must be at least 1".into()));
        }
        if self.embeddings.batch_size == 0 {
            return Err(Error::Config("embeddings.batch_size must be at least 1".into()));
        }
        if self.llm.timeout_secs == 0 {
            return Err(Error::Config("llm.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        Error::Config(format!("{}{} has an invalid value: {:?}", ENV_PREFIX, name, value))
    })
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Words per chunk
    pub chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: crate::ingestion::DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks forwarded to the LLM
    pub top_k: usize,
    /// Index backend built for each loaded document
    pub index: IndexKind,
    /// HNSW M parameter (connections per layer)
    pub hnsw_m: usize,
    /// HNSW ef_construction parameter
    pub hnsw_ef_construction: usize,
    /// HNSW ef_search parameter
    pub hnsw_ef_search: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: crate::retrieval::DEFAULT_TOP_K,
            index: IndexKind::Flat,
            hnsw_m: 16,
            hnsw_ef_construction: 200,
            hnsw_ef_search: 64,
        }
    }
}

/// Which embedding backend to run
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Ollama `/api/embeddings`
    #[default]
    Ollama,
    /// Local ONNX sentence transformer (requires the `onnx` feature)
    Onnx,
}

impl EmbeddingBackend {
    /// Vector size of the backend's default model
    pub fn default_dimensions(self) -> usize {
        match self {
            // nomic-embed-text
            EmbeddingBackend::Ollama => 768,
            // all-MiniLM-L6-v2
            EmbeddingBackend::Onnx => 384,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Backend selection
    pub backend: EmbeddingBackend,
    /// ONNX model to use (default: all-MiniLM-L6-v2)
    pub model: String,
    /// Embedding dimensions; unset means the backend's default model size
    pub dimensions: Option<usize>,
    /// Batch size for embedding generation
    pub batch_size: usize,
    /// Maximum sequence length
    pub max_length: usize,
    /// Cache directory for models
    pub cache_dir: PathBuf,
}

impl EmbeddingConfig {
    /// Configured dimensions, or the backend's default
    pub fn dimensions(&self) -> usize {
        self.dimensions
            .unwrap_or_else(|| self.backend.default_dimensions())
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Ollama,
            model: "all-MiniLM-L6-v2".to_string(),
            dimensions: None,
            batch_size: 32,
            max_length: 256,
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pdf-rag")
                .join("models"),
        }
    }
}

/// How the language model is invoked
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmBackend {
    /// `ollama run <model>` child process, prompt on stdin
    #[default]
    Cli,
    /// Ollama HTTP `/api/generate`
    Http,
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Backend selection
    pub backend: LlmBackend,
    /// Ollama executable used by the CLI backend
    pub binary: PathBuf,
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation (HTTP backend only)
    pub temperature: f32,
    /// Upper bound on a single generation or HTTP request, in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed HTTP requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: LlmBackend::Cli,
            binary: PathBuf::from("ollama"),
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama2".to_string(),
            temperature: 0.3,
            timeout_secs: 300,
            max_retries: 2,
        }
    }
}

/// Upload persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Keep a copy of every uploaded file on disk
    pub persist: bool,
    /// Directory uploaded files are written to
    pub dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            persist: true,
            dir: PathBuf::from("uploaded_docs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_service_behaviour() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.retrieval.index, IndexKind::Flat);
        assert_eq!(config.llm.generate_model, "llama2");
        assert_eq!(config.llm.backend, LlmBackend::Cli);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RagConfig::from_toml(
            r#"
            [chunking]
            chunk_size = 200

            [llm]
            backend = "http"
            generate_model = "phi3"
            "#,
        )
        .unwrap();

        assert_eq!(config.chunking.chunk_size, 200);
        assert_eq!(config.llm.backend, LlmBackend::Http);
        assert_eq!(config.llm.generate_model, "phi3");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PDF_RAG_PORT", "9000"),
            ("PDF_RAG_TOP_K", "5"),
            ("PDF_RAG_LLM_MODEL", "mistral"),
        ]
        .into_iter()
        .collect();

        let mut config = RagConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.llm.generate_model, "mistral");
    }

    #[test]
    fn test_bad_env_value_is_rejected() {
        let mut config = RagConfig::default();
        let result = config.apply_overrides(|key| {
            (key == "PDF_RAG_CHUNK_SIZE").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_embedding_dimensions_follow_backend() {
        let config = RagConfig::default();
        assert_eq!(config.embeddings.dimensions(), 768);

        let onnx = RagConfig::from_toml(
            r#"
            [embeddings]
            backend = "onnx"
            "#,
        )
        .unwrap();
        assert_eq!(onnx.embeddings.dimensions(), 384);

        let explicit = RagConfig::from_toml(
            r#"
            [embeddings]
            backend = "onnx"
            dimensions = 512
            "#,
        )
        .unwrap();
        assert_eq!(explicit.embeddings.dimensions(), 512);
    }

    #[test]
    fn test_validate_rejects_zero_chunk_size() {
        let mut config = RagConfig::default();
        config.chunking.chunk_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
