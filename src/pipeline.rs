//! Ingestion and query orchestration.
//!
//! The ingest pipeline turns a corpus into stored embedding records:
//! assemble chunks, derive parallel id/content/metadata sequences, then
//! embed and submit them batch by batch. The query pipeline embeds a
//! request, retrieves the nearest chunks, and asks the chat collaborator
//! to synthesize animation code against that context.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::assembly::{ChunkAssembler, DocumentError};
use crate::batch::Batcher;
use crate::output::{ChatModel, Embedder, VectorStore};
use crate::retry::RetryPolicy;
use crate::types::{ChunkMetadata, Document, EmbeddingRecord, PipelineConfig};

/// System prompt for retrieval-augmented code synthesis.
const CODE_SYNTHESIS_SYSTEM_PROMPT: &str = "You are a helpful assistant who responds with Manim \
code files implementing the script for a short (under one minute) video. You will be given the \
detailed script together with retrieved documentation excerpts. Generate the animations exactly \
as the script describes. Output only complete, correct Manim code files; make sure the animations \
visually match the script, do not overlap, and actually run.";

/// Explicitly constructed collaborator handles, passed to the pipelines
/// instead of living in process-wide singletons so tests can substitute
/// fakes.
#[derive(Clone)]
pub struct PipelineContext {
    pub embedder: Arc<dyn Embedder>,
    pub store: Arc<dyn VectorStore>,
    pub chat: Arc<dyn ChatModel>,
    pub retry: RetryPolicy,
}

/// Summary of one ingest run.
#[derive(Debug)]
pub struct IngestReport {
    pub run_id: Uuid,
    pub documents: usize,
    pub chunks: usize,
    pub batches: usize,
    pub records_stored: usize,
    pub errors: Vec<DocumentError>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Chunks a corpus and stores embedded records batch by batch.
pub struct IngestPipeline {
    context: PipelineContext,
    assembler: ChunkAssembler,
    batcher: Batcher,
}

impl IngestPipeline {
    /// Build the pipeline, validating all size parameters up front.
    pub fn new(context: PipelineContext, config: &PipelineConfig) -> Result<Self> {
        config.prose.validate()?;
        config.code.validate()?;
        let batcher = Batcher::new(config.max_batch_size)?;
        let assembler = ChunkAssembler::new(config.prose, config.code)
            .continue_on_error(config.continue_on_error);
        Ok(Self {
            context,
            assembler,
            batcher,
        })
    }

    /// Run the full ingest: chunk, embed, store.
    pub async fn run(&self, docs: &[Document]) -> Result<IngestReport> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();

        info!(%run_id, documents = docs.len(), "Starting ingest run");

        self.context
            .retry
            .run("vector store heartbeat", || self.context.store.heartbeat())
            .await?;

        let assembly = self.assembler.assemble(docs)?;
        info!(
            chunks = assembly.chunks.len(),
            failed_documents = assembly.errors.len(),
            "Corpus chunked"
        );

        // Parallel sequences, batched in lock-step; equal lengths keep
        // the index ranges aligned.
        let ids: Vec<String> = assembly.chunks.iter().map(|c| c.record_id()).collect();
        let contents: Vec<String> = assembly.chunks.iter().map(|c| c.content.clone()).collect();
        let metas: Vec<ChunkMetadata> = assembly.chunks.iter().map(|c| c.metadata()).collect();

        let mut batches = 0;
        let mut records_stored = 0;

        for ((batch_ids, batch_contents), batch_metas) in self
            .batcher
            .split(&ids)
            .zip(self.batcher.split(&contents))
            .zip(self.batcher.split(&metas))
        {
            let embeddings = self
                .context
                .retry
                .run("embed batch", || self.context.embedder.embed(batch_contents))
                .await?;
            anyhow::ensure!(
                embeddings.len() == batch_contents.len(),
                "embedder returned {} vectors for {} chunks",
                embeddings.len(),
                batch_contents.len()
            );

            let records: Vec<EmbeddingRecord> = batch_ids
                .iter()
                .zip(batch_contents)
                .zip(batch_metas)
                .zip(embeddings)
                .map(|(((id, content), metadata), embedding)| EmbeddingRecord {
                    id: id.clone(),
                    content: content.clone(),
                    metadata: metadata.clone(),
                    embedding,
                })
                .collect();

            self.context
                .retry
                .run("store batch", || self.context.store.add(&records))
                .await?;

            batches += 1;
            records_stored += records.len();
            info!(batch = batches, size = records.len(), "Stored batch");
        }

        let report = IngestReport {
            run_id,
            documents: docs.len(),
            chunks: assembly.chunks.len(),
            batches,
            records_stored,
            errors: assembly.errors,
            started_at,
            completed_at: Utc::now(),
        };

        info!(
            %run_id,
            chunks = report.chunks,
            batches = report.batches,
            stored = report.records_stored,
            "Ingest run complete"
        );

        Ok(report)
    }
}

/// Retrieval-augmented code synthesis for one request.
pub struct QueryPipeline {
    context: PipelineContext,
    n_results: usize,
}

impl QueryPipeline {
    /// Build a query pipeline fetching `n_results` neighbors per request.
    pub fn new(context: PipelineContext, n_results: usize) -> Self {
        Self { context, n_results }
    }

    /// Embed the request, retrieve context, and synthesize code.
    pub async fn answer(&self, request: &str) -> Result<String> {
        let query_texts = vec![request.to_string()];
        let mut embeddings = self
            .context
            .retry
            .run("embed query", || self.context.embedder.embed(&query_texts))
            .await?;
        let embedding = embeddings
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for the query"))?;

        let hits = self
            .context
            .retry
            .run("query vector store", || {
                self.context.store.query(&embedding, self.n_results)
            })
            .await?;
        info!(hits = hits.len(), "Retrieved context chunks");

        let mut combined = String::new();
        for (i, hit) in hits.iter().enumerate() {
            combined.push_str(&format!("\n--- Document {} ---\n{}\n", i + 1, hit.content));
        }

        let user_prompt = format!("{request} Documents: {combined}");
        self.context
            .retry
            .run("chat completion", || {
                self.context
                    .chat
                    .complete(CODE_SYNTHESIS_SYSTEM_PROMPT, &user_prompt)
            })
            .await
    }
}
