//! Question answering endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse};

/// POST /chat - Answer a question from the uploaded document
pub async fn chat(
    State(state): State<AppState>,
    request: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>> {
    let Json(request) = request.map_err(|e| Error::InvalidRequest(e.body_text()))?;
    let start = Instant::now();

    let top_k = request.top_k.unwrap_or(state.config().retrieval.top_k);
    tracing::info!("Question: \"{}\" (top_k {})", request.question, top_k);

    let answer = state
        .composer()
        .ask(state.store(), &request.question, top_k)
        .await?;

    tracing::info!("Answered in {}ms", start.elapsed().as_millis());

    Ok(Json(AskResponse { answer }))
}
