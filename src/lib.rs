//! Documentation RAG Pipeline Library
//!
//! Chunks a scraped-documentation corpus into overlapping token windows,
//! stores embedded chunks in a vector database in bounded-size batches,
//! and synthesizes animation code from retrieved context.

pub mod assembly;
pub mod batch;
pub mod chunkers;
pub mod corpus;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod script;
pub mod types;

pub use assembly::{AssemblyResult, ChunkAssembler, DocumentError};
pub use batch::Batcher;
pub use chunkers::{TiktokenCounter, TokenCounter, TokenWindowChunker};
pub use pipeline::{IngestPipeline, IngestReport, PipelineContext, QueryPipeline};
pub use retry::RetryPolicy;
pub use types::{Chunk, ChunkConfig, ChunkMetadata, Document, EmbeddingRecord, PipelineConfig};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::assembly::*;
    pub use crate::batch::Batcher;
    pub use crate::chunkers::*;
    pub use crate::output::*;
    pub use crate::pipeline::*;
    pub use crate::retry::RetryPolicy;
    pub use crate::types::*;
}

/// Default tokens per prose window
pub const DEFAULT_PROSE_CHUNK_SIZE: usize = 500;

/// Default overlap between consecutive prose windows
pub const DEFAULT_PROSE_OVERLAP: usize = 50;

/// Default tokens per code window
pub const DEFAULT_CODE_CHUNK_SIZE: usize = 300;

/// Default overlap between consecutive code windows
pub const DEFAULT_CODE_OVERLAP: usize = 30;

/// Default records per vector-store submission, matching the store's
/// observed per-call item limit
pub const DEFAULT_MAX_BATCH_SIZE: usize = 5460;

/// Default nearest neighbors per query
pub const DEFAULT_N_RESULTS: usize = 5;
