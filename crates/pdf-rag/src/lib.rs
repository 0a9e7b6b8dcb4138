//! pdf-rag: ask questions about a single uploaded PDF
//!
//! The uploaded document is split into fixed-size word chunks, embedded, and
//! indexed by L2 distance. A question retrieves its nearest chunks, which are
//! placed into a prompt for a local language model (Ollama by default).

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use generation::AnswerComposer;
pub use retrieval::{DocumentIndex, RetrievalStore};
pub use types::{
    document::{Chunk, LoadResult, RetrievedChunk},
    query::AskRequest,
    response::{AskResponse, UploadResponse},
};
