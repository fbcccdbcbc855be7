//! Fixed-size token window chunker with overlap.

use anyhow::Result;

use super::base::{TiktokenCounter, TokenCounter};
use crate::types::{ChunkConfig, ConfigError};

/// Splits text into overlapping fixed-size token windows.
///
/// Starting at token index 0, each window covers `chunk_size` tokens and
/// the index advances by `chunk_size - overlap`, so consecutive windows
/// share `overlap` tokens of context. The final window may be shorter.
/// The chunker is parameter-agnostic; prose and code presets live in
/// [`ChunkConfig`], not here.
pub struct TokenWindowChunker<C: TokenCounter = TiktokenCounter> {
    counter: C,
}

impl TokenWindowChunker<TiktokenCounter> {
    /// Create a chunker backed by the default tiktoken counter.
    pub fn new() -> Self {
        Self {
            counter: TiktokenCounter::new(),
        }
    }
}

impl Default for TokenWindowChunker<TiktokenCounter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: TokenCounter> TokenWindowChunker<C> {
    /// Create a chunker backed by a specific token counter.
    pub fn with_counter(counter: C) -> Self {
        Self { counter }
    }

    /// Access the underlying counter.
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Split `text` into overlapping token windows, decoded back to text.
    ///
    /// Empty text yields an empty vec, not a single empty chunk. Text no
    /// longer than `chunk_size` tokens yields exactly one chunk with the
    /// full content. An invalid config fails before any work is done.
    pub fn chunk(&self, text: &str, config: &ChunkConfig) -> Result<Vec<String>> {
        self.validate(config)?;

        if text.is_empty() {
            return Ok(vec![]);
        }

        let tokens = self.counter.encode(text);
        if tokens.is_empty() {
            return Ok(vec![]);
        }

        let step = config.step();
        let mut chunks = Vec::new();
        let mut idx = 0;

        while idx < tokens.len() {
            let end = (idx + config.chunk_size).min(tokens.len());
            chunks.push(self.counter.decode(&tokens[idx..end])?);
            idx += step;
        }

        Ok(chunks)
    }

    /// Fail fast on configs that would stall or move the window backward.
    fn validate(&self, config: &ChunkConfig) -> Result<(), ConfigError> {
        config.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic counter for exact window arithmetic: each
    /// whitespace-separated word is one token, its id being the word's
    /// numeric value.
    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count_tokens(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }

        fn encode(&self, text: &str) -> Vec<usize> {
            text.split_whitespace()
                .map(|w| w.parse().expect("WordCounter input must be numeric words"))
                .collect()
        }

        fn decode(&self, tokens: &[usize]) -> Result<String> {
            Ok(tokens
                .iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(" "))
        }
    }

    fn numbered_text(n: usize) -> String {
        (0..n).map(|i| i.to_string()).collect::<Vec<_>>().join(" ")
    }

    fn first_token(chunk: &str) -> usize {
        chunk.split_whitespace().next().unwrap().parse().unwrap()
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TokenWindowChunker::with_counter(WordCounter);
        let config = ChunkConfig::new(500, 50).unwrap();
        let chunks = chunker.chunk("", &config).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_text_within_one_window_yields_single_chunk() {
        let chunker = TokenWindowChunker::with_counter(WordCounter);
        let config = ChunkConfig::new(500, 50).unwrap();
        let text = numbered_text(500);
        let chunks = chunker.chunk(&text, &config).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], text);
    }

    #[test]
    fn test_1200_tokens_with_prose_preset() {
        // 1200 tokens at chunk_size=500, overlap=50: windows start at
        // offsets 0, 450, 900; the last covers [900, 1200).
        let chunker = TokenWindowChunker::with_counter(WordCounter);
        let config = ChunkConfig::new(500, 50).unwrap();
        let chunks = chunker.chunk(&numbered_text(1200), &config).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(first_token(&chunks[0]), 0);
        assert_eq!(first_token(&chunks[1]), 450);
        assert_eq!(first_token(&chunks[2]), 900);
        assert_eq!(chunks[0].split_whitespace().count(), 500);
        assert_eq!(chunks[1].split_whitespace().count(), 500);
        assert_eq!(chunks[2].split_whitespace().count(), 300);
    }

    #[test]
    fn test_zero_overlap_partitions_tokens() {
        let chunker = TokenWindowChunker::with_counter(WordCounter);
        let config = ChunkConfig::new(10, 0).unwrap();
        let chunks = chunker.chunk(&numbered_text(25), &config).unwrap();

        assert_eq!(chunks.len(), 3);
        // Disjoint windows reassemble exactly.
        assert_eq!(chunks.join(" "), numbered_text(25));
    }

    #[test]
    fn test_coverage_no_tokens_skipped() {
        let chunker = TokenWindowChunker::with_counter(WordCounter);
        let config = ChunkConfig::new(7, 3).unwrap();
        let total = 53;
        let chunks = chunker.chunk(&numbered_text(total), &config).unwrap();

        // Dropping the first `overlap` tokens of every chunk after the
        // first reconstructs the original token stream.
        let mut rebuilt: Vec<usize> = Vec::new();
        for (i, chunk) in chunks.iter().enumerate() {
            let tokens: Vec<usize> = chunk
                .split_whitespace()
                .map(|w| w.parse().unwrap())
                .collect();
            let skip = if i == 0 { 0 } else { config.overlap };
            rebuilt.extend(&tokens[skip..]);
        }
        assert_eq!(rebuilt, (0..total).collect::<Vec<_>>());
    }

    #[test]
    fn test_progress_bound() {
        let chunker = TokenWindowChunker::with_counter(WordCounter);
        let config = ChunkConfig::new(7, 3).unwrap();
        let total = 101;
        let chunks = chunker.chunk(&numbered_text(total), &config).unwrap();
        // ceil(total / step) windows at most.
        let bound = total.div_ceil(config.step());
        assert!(chunks.len() <= bound);
    }

    #[test]
    fn test_invalid_config_fails_before_chunking() {
        let chunker = TokenWindowChunker::with_counter(WordCounter);
        let config = ChunkConfig {
            chunk_size: 10,
            overlap: 10,
        };
        assert!(chunker.chunk(&numbered_text(100), &config).is_err());
    }

    #[test]
    fn test_tiktoken_counter_round_trip() {
        let chunker = TokenWindowChunker::new();
        let config = ChunkConfig::new(5, 1).unwrap();
        let text = "The quick brown fox jumps over the lazy dog near the river bank.";
        let chunks = chunker.chunk(text, &config).unwrap();
        assert!(chunks.len() > 1);
        // Zero-overlap chunking of the same text reassembles exactly.
        let disjoint = chunker
            .chunk(text, &ChunkConfig::new(5, 0).unwrap())
            .unwrap();
        assert_eq!(disjoint.concat(), text);
    }
}
