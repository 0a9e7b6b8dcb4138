//! Response bodies for the upload and ask operations

use serde::{Deserialize, Serialize};

use super::document::LoadResult;

/// Successful upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable status line
    pub message: String,
    /// Number of chunks created
    pub chunks: usize,
    /// First few chunks of the document
    pub preview: Vec<String>,
}

impl From<LoadResult> for UploadResponse {
    fn from(result: LoadResult) -> Self {
        Self {
            message: "PDF uploaded successfully.".to_string(),
            chunks: result.chunk_count,
            preview: result.preview,
        }
    }
}

/// Successful answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer, whitespace-trimmed
    pub answer: String,
}
