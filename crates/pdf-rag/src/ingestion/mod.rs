//! Document ingestion: upload parsing and word chunking

mod chunker;
mod parser;

pub use chunker::{chunk, WordChunker, DEFAULT_CHUNK_SIZE};
pub use parser::{FileParser, ParsedDocument};

#[cfg(test)]
pub(crate) use parser::sample_pdf;
