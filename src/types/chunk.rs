//! Chunk and embedding record definitions.

use serde::{Deserialize, Serialize};

/// A chunk of content derived from a corpus document.
///
/// Chunks are the unit of content that gets embedded and indexed. Each
/// chunk keeps its source path and an ordinal identifier so provenance
/// is recoverable after chunks are mixed into a flat global sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Source document path this chunk came from
    pub source: String,

    /// Identifier unique within the source document:
    /// `text_<i>` for prose windows, `code_<j>_<k>` for code block `j`
    pub chunk_id: String,

    /// The decoded text content of the chunk
    pub content: String,
}

impl Chunk {
    /// Create a chunk with the given provenance and content.
    pub fn new(
        source: impl Into<String>,
        chunk_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            chunk_id: chunk_id.into(),
            content: content.into(),
        }
    }

    /// Globally unique record id handed to the vector store.
    pub fn record_id(&self) -> String {
        format!("{}_{}", self.source, self.chunk_id)
    }

    /// Metadata payload stored alongside the embedding.
    pub fn metadata(&self) -> ChunkMetadata {
        ChunkMetadata {
            source: self.source.clone(),
            chunk_id: self.chunk_id.clone(),
        }
    }
}

/// Provenance metadata stored with each embedded chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document path
    pub source: String,

    /// Per-document chunk identifier
    pub chunk_id: String,
}

/// A fully derived record, ready for submission to the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Globally unique id, `<source>_<chunk_id>`
    pub id: String,

    /// Chunk text content
    pub content: String,

    /// Provenance metadata
    pub metadata: ChunkMetadata,

    /// Embedding vector produced by the embedding collaborator
    pub embedding: Vec<f32>,
}

/// A chunk returned by a nearest-neighbor query against the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Record id as stored
    pub id: String,

    /// Chunk text content
    pub content: String,

    /// Provenance metadata
    pub metadata: ChunkMetadata,
}
