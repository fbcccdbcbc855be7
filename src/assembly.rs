//! Corpus chunk assembly.
//!
//! Applies the token-window chunker to every document's prose body and,
//! independently, to each of its code blocks, assigning stable per-document
//! chunk identifiers. The resulting flat sequence is deterministic:
//! documents in corpus order, prose chunks before code chunks, code blocks
//! in appearance order.

use anyhow::Result;
use tracing::{debug, warn};

use crate::chunkers::{TiktokenCounter, TokenCounter, TokenWindowChunker};
use crate::types::{Chunk, ChunkConfig, Document};

/// A document that failed to chunk, recorded without aborting the run.
#[derive(Debug, Clone)]
pub struct DocumentError {
    pub source: String,
    pub error: String,
}

/// Output of one assembly pass over the corpus.
#[derive(Debug)]
pub struct AssemblyResult {
    /// All chunks in deterministic global order
    pub chunks: Vec<Chunk>,

    /// Documents skipped because their chunking failed
    pub errors: Vec<DocumentError>,
}

/// Assembles the global chunk sequence from a corpus.
pub struct ChunkAssembler<C: TokenCounter = TiktokenCounter> {
    chunker: TokenWindowChunker<C>,
    prose: ChunkConfig,
    code: ChunkConfig,
    continue_on_error: bool,
}

impl ChunkAssembler<TiktokenCounter> {
    /// Create an assembler with the default tiktoken counter.
    pub fn new(prose: ChunkConfig, code: ChunkConfig) -> Self {
        Self::with_chunker(TokenWindowChunker::new(), prose, code)
    }
}

impl<C: TokenCounter> ChunkAssembler<C> {
    /// Create an assembler around a specific chunker.
    pub fn with_chunker(chunker: TokenWindowChunker<C>, prose: ChunkConfig, code: ChunkConfig) -> Self {
        Self {
            chunker,
            prose,
            code,
            continue_on_error: true,
        }
    }

    /// Set whether a failed document aborts the run.
    pub fn continue_on_error(mut self, yes: bool) -> Self {
        self.continue_on_error = yes;
        self
    }

    /// Chunk the whole corpus.
    ///
    /// Invalid windowing presets fail before any document is touched. A
    /// tokenizer failure is fatal for that document only: its partial
    /// output is discarded and the error recorded, leaving every other
    /// document's chunks intact.
    pub fn assemble(&self, docs: &[Document]) -> Result<AssemblyResult> {
        self.prose.validate()?;
        self.code.validate()?;

        let mut chunks = Vec::new();
        let mut errors = Vec::new();

        for doc in docs {
            match self.assemble_document(doc) {
                Ok(doc_chunks) => {
                    debug!(
                        source = %doc.file_path,
                        chunks = doc_chunks.len(),
                        "Chunked document"
                    );
                    chunks.extend(doc_chunks);
                }
                Err(e) => {
                    if !self.continue_on_error {
                        return Err(e);
                    }
                    warn!(source = %doc.file_path, error = %e, "Failed to chunk document");
                    errors.push(DocumentError {
                        source: doc.file_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(AssemblyResult { chunks, errors })
    }

    /// Chunk one document: prose first, then each code block in order.
    fn assemble_document(&self, doc: &Document) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();

        for (i, content) in self.chunker.chunk(&doc.text, &self.prose)?.into_iter().enumerate() {
            chunks.push(Chunk::new(&doc.file_path, format!("text_{i}"), content));
        }

        for (j, block) in doc.code_blocks.iter().enumerate() {
            for (k, content) in self.chunker.chunk(block, &self.code)?.into_iter().enumerate() {
                chunks.push(Chunk::new(&doc.file_path, format!("code_{j}_{k}"), content));
            }
        }

        Ok(chunks)
    }
}
