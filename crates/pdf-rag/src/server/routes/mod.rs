//! API routes for the PDF RAG server

pub mod chat;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::temporary("/info") }))
        // Upload - with larger body limit for PDFs
        .route(
            "/upload",
            post(upload::upload_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Questions
        .route("/chat", post(chat::chat))
        .route("/ask", post(chat::chat))
        // Info
        .route("/info", get(info))
}

/// Service info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();

    Json(serde_json::json!({
        "name": "pdf-rag",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Ask questions about an uploaded PDF",
        "endpoints": {
            "POST /upload": "Upload a PDF (multipart field `file`), replacing the current document",
            "POST /chat": "Ask a question about the uploaded document",
            "POST /ask": "Alias of /chat",
            "GET /health": "Liveness check",
            "GET /ready": "Embedder and LLM availability (503 when either is down)"
        },
        "config": {
            "chunk_size": state.store().chunk_size(),
            "top_k": config.retrieval.top_k,
            "index": config.retrieval.index,
            "embedder": state.store().embedder().name(),
            "llm": state.composer().llm().name(),
            "model": state.composer().llm().model()
        },
        "document": state.store().info()
    }))
}
