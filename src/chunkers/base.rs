//! Token counting behind a trait so tests can use a deterministic counter.

use anyhow::{Context, Result};

/// Token counter trait for encoding text to token ids and back.
///
/// Chunk boundaries are computed in token-count space, not character
/// space, because embedding models enforce token-length limits.
pub trait TokenCounter: Send + Sync {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;

    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<usize>;

    /// Decode token ids back to text.
    fn decode(&self, tokens: &[usize]) -> Result<String>;
}

/// Default token counter using tiktoken (cl100k_base encoding).
pub struct TiktokenCounter {
    bpe: tiktoken_rs::CoreBPE,
}

impl TiktokenCounter {
    /// Create a new token counter with the cl100k_base encoding, the
    /// vocabulary used by GPT-4 and text-embedding-ada-002.
    pub fn new() -> Self {
        let bpe = tiktoken_rs::cl100k_base().expect("Failed to load cl100k_base encoding");
        Self { bpe }
    }
}

impl Default for TiktokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_ordinary(text)
    }

    fn decode(&self, tokens: &[usize]) -> Result<String> {
        self.bpe
            .decode(tokens.to_vec())
            .context("failed to decode token ids back to text")
    }
}
