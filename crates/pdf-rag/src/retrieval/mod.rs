//! Embedding-based retrieval over the loaded document

mod hnsw;
mod index;
mod store;

pub use hnsw::HnswIndex;
pub use index::{build_index, FlatL2Index, IndexKind, Neighbor, VectorIndex};
pub use store::{DocumentIndex, RetrievalStore, PREVIEW_CHUNKS};

/// Chunks returned per question when the caller does not say
pub const DEFAULT_TOP_K: usize = 3;
