//! Corpus document definitions.

use serde::{Deserialize, Serialize};

/// A single scraped documentation page, as read from the JSON corpus.
///
/// The corpus is a JSON array of these objects. `text` and `code_blocks`
/// may be absent in the source file; absence means "no content", not an
/// error, so both default to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Path of the original HTML file this page was scraped from
    pub file_path: String,

    /// Prose body of the page with markup stripped
    #[serde(default)]
    pub text: String,

    /// Code examples extracted from the page, in appearance order
    #[serde(default)]
    pub code_blocks: Vec<String>,
}

impl Document {
    /// Create a document from its parts.
    pub fn new(file_path: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            text: text.into(),
            code_blocks: Vec::new(),
        }
    }

    /// Attach code blocks to this document.
    pub fn with_code_blocks(mut self, code_blocks: Vec<String>) -> Self {
        self.code_blocks = code_blocks;
        self
    }

    /// A document with no prose and no code contributes zero chunks.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.code_blocks.is_empty()
    }
}
