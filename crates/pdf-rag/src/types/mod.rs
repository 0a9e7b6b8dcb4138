//! Core types for the question-answering service

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, DocumentInfo, FileType, LoadResult, RetrievedChunk};
pub use query::AskRequest;
pub use response::{AskResponse, UploadResponse};
