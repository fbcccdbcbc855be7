//! HTTP client for the vector store.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{EmbeddingRecord, RetrievedChunk};

/// Persists embedding records and answers nearest-neighbor queries.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Submit one batch of records to the collection.
    async fn add(&self, records: &[EmbeddingRecord]) -> Result<()>;

    /// Return the `n_results` stored chunks nearest to `embedding`.
    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<RetrievedChunk>>;

    /// Liveness check before a long ingest run.
    async fn heartbeat(&self) -> Result<()>;
}

/// Client for a Chroma-style vector store over HTTP.
pub struct HttpVectorStore {
    client: Client,
    base_url: String,
    collection: String,
}

#[derive(Debug, Serialize)]
struct AddRequest<'a> {
    records: &'a [EmbeddingRecord],
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    embedding: &'a [f32],
    n_results: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<RetrievedChunk>,
}

impl HttpVectorStore {
    /// Create a client bound to one collection.
    pub fn new(base_url: &str, collection: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        })
    }

    fn collection_url(&self, op: &str) -> String {
        format!("{}/collections/{}/{op}", self.base_url, self.collection)
    }
}

#[async_trait]
impl VectorStore for HttpVectorStore {
    async fn add(&self, records: &[EmbeddingRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.collection_url("add"))
            .json(&AddRequest { records })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("vector store add returned {status}: {body}");
        }

        debug!(count = records.len(), collection = %self.collection, "Stored batch");
        Ok(())
    }

    async fn query(&self, embedding: &[f32], n_results: usize) -> Result<Vec<RetrievedChunk>> {
        let response = self
            .client
            .post(self.collection_url("query"))
            .json(&QueryRequest {
                embedding,
                n_results,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("vector store query returned {status}: {body}");
        }

        let parsed: QueryResponse = response.json().await?;
        Ok(parsed.results)
    }

    async fn heartbeat(&self) -> Result<()> {
        let url = format!("{}/heartbeat", self.base_url);
        let response = self.client.get(&url).send().await?;
        anyhow::ensure!(
            response.status().is_success(),
            "vector store heartbeat returned {}",
            response.status()
        );
        Ok(())
    }
}
