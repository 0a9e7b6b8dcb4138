//! Document upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::FileParser;
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// Multipart field carrying the document
const FILE_FIELD: &str = "file";

/// POST /upload - Parse a document and make it the one questions are answered from
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::InvalidRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .and_then(safe_file_name)
            .unwrap_or_else(|| format!("upload_{}.pdf", Uuid::new_v4()));

        let data = field.bytes().await.map_err(|e| {
            Error::InvalidRequest(format!("Failed to read file: {}", e))
        })?;

        tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());

        let parse_name = filename.clone();
        let parse_data = data.clone();
        let parsed =
            tokio::task::spawn_blocking(move || FileParser::parse(&parse_name, &parse_data))
                .await
                .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

        if state.config().uploads.persist {
            persist_upload(&state, &filename, &data).await?;
        }

        tracing::debug!(
            "Parsed {}: {} characters, {:?} pages, sha256 {}",
            filename,
            parsed.content.len(),
            parsed.total_pages,
            parsed.content_hash
        );

        let result = state.store().load_named(&filename, &parsed.content).await?;

        tracing::info!(
            "Uploaded {}: {} chunks in {}ms",
            filename,
            result.chunk_count,
            start.elapsed().as_millis()
        );

        return Ok(Json(result.into()));
    }

    Err(Error::InvalidRequest(format!(
        "Multipart field '{}' is missing",
        FILE_FIELD
    )))
}

/// Final path component of a client-supplied filename
fn safe_file_name(name: &str) -> Option<String> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// Keep a copy of the upload in the configured directory
async fn persist_upload(state: &AppState, filename: &str, data: &[u8]) -> Result<()> {
    let dir = &state.config().uploads.dir;
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(filename);
    tokio::fs::write(&path, data).await?;
    tracing::debug!("Saved upload to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("report.pdf"), Some("report.pdf".to_string()));
        assert_eq!(safe_file_name("../../etc/passwd"), Some("passwd".to_string()));
        assert_eq!(safe_file_name("dir/notes.txt"), Some("notes.txt".to_string()));
        assert_eq!(safe_file_name(".."), None);
        assert_eq!(safe_file_name(""), None);
    }
}
