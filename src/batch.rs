//! Fixed-size batching for bulk submission to size-limited APIs.

use crate::types::ConfigError;

/// Partitions an ordered sequence into consecutive slices no larger than
/// a configured maximum.
///
/// Every batch has exactly `max_batch_size` items except possibly the
/// last; concatenating all batches in order reproduces the input. To
/// batch parallel sequences (ids, contents, metadata) in lock-step,
/// invoke the same batcher once per sequence; equal lengths guarantee
/// aligned index ranges.
#[derive(Debug, Clone, Copy)]
pub struct Batcher {
    max_batch_size: usize,
}

impl Batcher {
    /// Create a batcher. A zero batch size fails fast.
    pub fn new(max_batch_size: usize) -> Result<Self, ConfigError> {
        if max_batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(Self { max_batch_size })
    }

    /// Maximum items per batch.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Lazily yield consecutive sub-slices of at most `max_batch_size`
    /// items. An empty input yields no batches.
    pub fn split<'a, T>(&self, items: &'a [T]) -> std::slice::Chunks<'a, T> {
        items.chunks(self.max_batch_size)
    }

    /// Number of batches `split` will yield for a sequence of `len` items.
    pub fn batch_count(&self, len: usize) -> usize {
        len.div_ceil(self.max_batch_size)
    }
}
