//! PDF RAG server binary
//!
//! Run with: cargo run -p pdf-rag --bin pdf-rag-server -- --config pdf-rag.toml

use clap::Parser;
use pdf_rag::{config::RagConfig, server::RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Answer questions about an uploaded PDF
#[derive(Debug, Parser)]
#[command(name = "pdf-rag-server", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "PDF_RAG_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Ollama model used for answers
    #[arg(short, long)]
    model: Option<String>,

    /// Words per chunk
    #[arg(long)]
    chunk_size: Option<usize>,
}

impl Args {
    fn apply(self, config: &mut RagConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model) = self.model {
            config.llm.generate_model = model;
        }
        if let Some(size) = self.chunk_size {
            config.chunking.chunk_size = size;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = RagConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding backend: {:?}", config.embeddings.backend);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - LLM backend: {:?}", config.llm.backend);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Top k: {}", config.retrieval.top_k);

    let server = RagServer::new(config).await?;

    // Check collaborators
    let state = server.state();
    let readiness = state.readiness().await;
    let embedder = state.store().embedder();
    if readiness.embedder {
        tracing::info!("Embedder {} is available", embedder.name());
    } else {
        tracing::warn!(
            "Embedder {} is not available; uploads will fail until it is",
            embedder.name()
        );
    }
    let llm = state.composer().llm();
    if readiness.llm {
        tracing::info!("LLM {} ({}) is available", llm.model(), llm.name());
    } else {
        tracing::warn!("LLM {} ({}) is not available", llm.model(), llm.name());
        tracing::warn!("  Start Ollama with `ollama serve` and pull the model: ollama pull {}", llm.model());
    }

    tracing::info!("Health: http://{}/health", server.address());
    tracing::info!("Ready: http://{}/ready", server.address());
    tracing::info!("Info: http://{}/info", server.address());

    server.start().await?;

    Ok(())
}
