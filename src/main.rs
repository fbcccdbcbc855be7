//! Corpus ingest runner.
//!
//! Loads the JSON corpus, chunks it, and stores embedded records in the
//! vector store. All configuration comes from the environment; there are
//! no CLI flags.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docrag::corpus;
use docrag::output::{HttpEmbedder, HttpVectorStore, OpenAiChatClient};
use docrag::{IngestPipeline, PipelineConfig, PipelineContext, RetryPolicy};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "docrag=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = PipelineConfig::from_env()?;

    info!("Starting docrag ingest v{}", env!("CARGO_PKG_VERSION"));
    info!(
        prose_chunk_size = config.prose.chunk_size,
        code_chunk_size = config.code.chunk_size,
        max_batch_size = config.max_batch_size,
        "Pipeline configuration"
    );

    let context = PipelineContext {
        embedder: Arc::new(HttpEmbedder::new(&config.embedding_service_url)?),
        store: Arc::new(HttpVectorStore::new(
            &config.vector_store_url,
            &config.collection,
        )?),
        chat: Arc::new(OpenAiChatClient::new(
            &config.chat_api_url,
            &config.chat_api_key,
            &config.chat_model,
        )?),
        retry: RetryPolicy::default(),
    };

    let docs = corpus::load_corpus(&config.corpus_path)?;
    let pipeline = IngestPipeline::new(context, &config)?;
    let report = pipeline.run(&docs).await?;

    info!(
        run_id = %report.run_id,
        documents = report.documents,
        chunks = report.chunks,
        batches = report.batches,
        stored = report.records_stored,
        failed_documents = report.errors.len(),
        "Ingest finished"
    );

    Ok(())
}
