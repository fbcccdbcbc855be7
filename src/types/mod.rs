//! Core types for the documentation RAG pipeline.

mod chunk;
mod config;
mod document;

pub use chunk::{Chunk, ChunkMetadata, EmbeddingRecord, RetrievedChunk};
pub use config::{ChunkConfig, ConfigError, PipelineConfig};
pub use document::Document;
