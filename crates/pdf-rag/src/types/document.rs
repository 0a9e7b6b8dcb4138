//! Document and chunk types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported upload types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Plain text file
    Text,
    /// Markdown file
    Markdown,
}

impl FileType {
    /// Detect file type from a filename's extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            "md" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// A contiguous run of words from the loaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the chunk in the document (0-based)
    pub index: usize,
    /// Chunk text, words joined by single spaces
    pub content: String,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
        }
    }
}

/// A chunk returned by a query with its L2 distance to the question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// The matched chunk
    pub chunk: Chunk,
    /// Euclidean distance between question and chunk embeddings
    pub distance: f32,
}

/// Outcome of loading a document into the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadResult {
    /// Number of chunks the document produced
    pub chunk_count: usize,
    /// Up to the first three chunks
    pub preview: Vec<String>,
}

/// Summary of the currently loaded document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Name the document was loaded under
    pub name: String,
    /// Number of chunks
    pub chunk_count: usize,
    /// Embedding dimensions of the index
    pub dimensions: usize,
    /// When the document was loaded
    pub loaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_filename("report.PDF"), Some(FileType::Pdf));
        assert_eq!(FileType::from_filename("notes.txt"), Some(FileType::Text));
        assert_eq!(FileType::from_filename("README.md"), Some(FileType::Markdown));
        assert_eq!(FileType::from_filename("sheet.xlsx"), None);
        assert_eq!(FileType::from_filename("no_extension"), None);
    }
}
