//! Error types for the question-answering service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for pdf-rag operations
pub type Result<T> = std::result::Result<T, Error>;

/// pdf-rag errors
#[derive(Debug, Error)]
pub enum Error {
    /// A question was asked before any document was loaded
    #[error("No document uploaded yet.")]
    NoDocumentLoaded,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed or out-of-range request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Embedding collaborator error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Vector index construction or search error
    #[error("Vector index error: {0}")]
    VectorIndex(String),

    /// Language-model collaborator error; the diagnostic is kept verbatim
    #[error("{0}")]
    Generation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a vector index error
    pub fn vector_index(message: impl Into<String>) -> Self {
        Self::VectorIndex(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status used when this error crosses the HTTP boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NoDocumentLoaded => StatusCode::CONFLICT,
            Error::Config(_)
            | Error::InvalidRequest(_)
            | Error::FileParse { .. }
            | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::Embedding(_) | Error::Generation(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::VectorIndex(_) | Error::Io(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match status {
            s if s.is_server_error() => tracing::error!("Request failed: {}", self),
            _ => tracing::warn!("Request rejected: {}", self),
        }

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_message_is_verbatim() {
        let err = Error::generation("model not found");
        assert_eq!(err.to_string(), "model not found");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_no_document_status() {
        assert_eq!(Error::NoDocumentLoaded.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            Error::NoDocumentLoaded.to_string(),
            "No document uploaded yet."
        );
    }
}
