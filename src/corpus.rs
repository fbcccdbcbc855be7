//! Loading the scraped-documentation corpus.
//!
//! The corpus is a JSON array of documents produced by the scraping step.
//! It is read in full before chunking begins; there is no streaming.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::types::Document;

/// Load and parse the corpus file.
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus file {}", path.display()))?;
    let docs = parse_corpus(&raw)
        .with_context(|| format!("failed to parse corpus file {}", path.display()))?;
    info!(documents = docs.len(), path = %path.display(), "Loaded corpus");
    Ok(docs)
}

/// Parse a corpus from its JSON text.
pub fn parse_corpus(json: &str) -> Result<Vec<Document>> {
    let docs: Vec<Document> =
        serde_json::from_str(json).context("corpus must be a JSON array of documents")?;
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_corpus() {
        let json = r#"[
            {"file_path": "a.html", "text": "prose", "code_blocks": ["x = 1", "y = 2"]},
            {"file_path": "b.html"}
        ]"#;
        let docs = parse_corpus(json).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].code_blocks.len(), 2);
        assert!(docs[1].is_empty());
    }

    #[test]
    fn test_non_array_corpus_rejected() {
        assert!(parse_corpus(r#"{"file_path": "a.html"}"#).is_err());
    }
}
