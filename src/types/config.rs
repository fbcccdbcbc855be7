//! Configuration types for chunking and the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    DEFAULT_CODE_CHUNK_SIZE, DEFAULT_CODE_OVERLAP, DEFAULT_MAX_BATCH_SIZE, DEFAULT_N_RESULTS,
    DEFAULT_PROSE_CHUNK_SIZE, DEFAULT_PROSE_OVERLAP,
};

/// Invalid configuration detected before any chunking work begins.
///
/// These are programmer errors, not runtime conditions to recover from.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chunk_size must be positive")]
    ZeroChunkSize,

    #[error("overlap ({overlap}) must be smaller than chunk_size ({chunk_size})")]
    OverlapTooLarge { overlap: usize, chunk_size: usize },

    #[error("max_batch_size must be positive")]
    ZeroBatchSize,
}

/// Windowing parameters for one content class.
///
/// `overlap < chunk_size` is required so the window index always moves
/// forward; the constructor rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Tokens per window
    pub chunk_size: usize,

    /// Tokens shared between consecutive windows
    pub overlap: usize,
}

impl ChunkConfig {
    /// Create a validated config.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ConfigError> {
        let config = Self {
            chunk_size,
            overlap,
        };
        config.validate()?;
        Ok(config)
    }

    /// Preset for prose text: larger windows, coarser overlap.
    pub fn prose() -> Self {
        Self {
            chunk_size: DEFAULT_PROSE_CHUNK_SIZE,
            overlap: DEFAULT_PROSE_OVERLAP,
        }
    }

    /// Preset for code blocks: code is denser, so finer granularity.
    pub fn code() -> Self {
        Self {
            chunk_size: DEFAULT_CODE_CHUNK_SIZE,
            overlap: DEFAULT_CODE_OVERLAP,
        }
    }

    /// Check the forward-progress invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::ZeroChunkSize);
        }
        if self.overlap >= self.chunk_size {
            return Err(ConfigError::OverlapTooLarge {
                overlap: self.overlap,
                chunk_size: self.chunk_size,
            });
        }
        Ok(())
    }

    /// Window advance per step.
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Pipeline configuration, loaded from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Windowing preset for prose text
    pub prose: ChunkConfig,

    /// Windowing preset for code blocks
    pub code: ChunkConfig,

    /// Maximum records per vector-store submission
    pub max_batch_size: usize,

    /// Nearest neighbors fetched per query
    pub n_results: usize,

    /// Path of the JSON corpus file
    pub corpus_path: String,

    /// Name of the vector-store collection
    pub collection: String,

    /// URL of the embedding service
    pub embedding_service_url: String,

    /// URL of the vector store
    pub vector_store_url: String,

    /// Base URL of the chat-completion API
    pub chat_api_url: String,

    /// API key for the chat-completion API
    pub chat_api_key: String,

    /// Chat model name
    pub chat_model: String,

    /// Whether a failed document aborts the run or is recorded and skipped
    pub continue_on_error: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prose: ChunkConfig::prose(),
            code: ChunkConfig::code(),
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
            n_results: DEFAULT_N_RESULTS,
            corpus_path: "docs_corpus.json".to_string(),
            collection: "docs".to_string(),
            embedding_service_url: "http://localhost:3018".to_string(),
            vector_store_url: "http://localhost:8000".to_string(),
            chat_api_url: "https://api.deepseek.com".to_string(),
            chat_api_key: String::new(),
            chat_model: "deepseek-coder".to_string(),
            continue_on_error: true,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables, validating the
    /// chunking presets and batch size up front.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            prose: ChunkConfig {
                chunk_size: env_usize("PROSE_CHUNK_SIZE", defaults.prose.chunk_size),
                overlap: env_usize("PROSE_OVERLAP", defaults.prose.overlap),
            },
            code: ChunkConfig {
                chunk_size: env_usize("CODE_CHUNK_SIZE", defaults.code.chunk_size),
                overlap: env_usize("CODE_OVERLAP", defaults.code.overlap),
            },
            max_batch_size: env_usize("MAX_BATCH_SIZE", defaults.max_batch_size),
            n_results: env_usize("N_RESULTS", defaults.n_results),
            corpus_path: env_string("CORPUS_PATH", &defaults.corpus_path),
            collection: env_string("COLLECTION", &defaults.collection),
            embedding_service_url: env_string(
                "EMBEDDING_SERVICE_URL",
                &defaults.embedding_service_url,
            ),
            vector_store_url: env_string("VECTOR_STORE_URL", &defaults.vector_store_url),
            chat_api_url: env_string("CHAT_API_URL", &defaults.chat_api_url),
            chat_api_key: env_string("API_KEY", &defaults.chat_api_key),
            chat_model: env_string("CHAT_MODEL", &defaults.chat_model),
            continue_on_error: std::env::var("CONTINUE_ON_ERROR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.continue_on_error),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate all size parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prose.validate()?;
        self.code.validate()?;
        if self.max_batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ChunkConfig::prose().validate().is_ok());
        assert!(ChunkConfig::code().validate().is_ok());
        assert_eq!(ChunkConfig::prose().step(), 450);
        assert_eq!(ChunkConfig::code().step(), 270);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert_eq!(ChunkConfig::new(0, 0), Err(ConfigError::ZeroChunkSize));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        assert_eq!(
            ChunkConfig::new(100, 100),
            Err(ConfigError::OverlapTooLarge {
                overlap: 100,
                chunk_size: 100
            })
        );
        assert_eq!(
            ChunkConfig::new(100, 150),
            Err(ConfigError::OverlapTooLarge {
                overlap: 150,
                chunk_size: 100
            })
        );
        assert!(ChunkConfig::new(100, 99).is_ok());
    }

    #[test]
    fn test_default_pipeline_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }
}
