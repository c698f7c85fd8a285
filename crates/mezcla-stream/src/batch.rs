//! Batch grouping over record sources

use crate::error::StreamError;
use crate::record::Record;
use crate::source::RecordSource;

/// Configuration for the batcher
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Whether to drop a final incomplete batch
    pub drop_last: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            drop_last: false,
        }
    }
}

/// Groups records from a source into fixed-size batches
///
/// Records are batched in stream order; a final short batch is yielded
/// unless `drop_last` is set. Source errors propagate unchanged.
pub struct Batcher<S: RecordSource> {
    source: S,
    config: BatchConfig,
    done: bool,
}

impl<S: RecordSource> Batcher<S> {
    /// Create a batcher over `source`
    ///
    /// # Errors
    /// Returns [`StreamError::InvalidArgument`] if `batch_size` is zero.
    pub fn new(source: S, config: BatchConfig) -> Result<Self, StreamError> {
        if config.batch_size == 0 {
            return Err(StreamError::InvalidArgument(
                "batch size must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            source,
            config,
            done: false,
        })
    }

    /// Configured batch size
    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    /// Get the next batch, `Ok(None)` once the source is drained
    pub fn next_batch(&mut self) -> Result<Option<Vec<Record>>, StreamError> {
        if self.done {
            return Ok(None);
        }

        let mut batch = Vec::with_capacity(self.config.batch_size);
        while batch.len() < self.config.batch_size {
            match self.source.next_record()? {
                Some(record) => batch.push(record),
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if batch.is_empty() {
            return Ok(None);
        }
        if self.done && self.config.drop_last && batch.len() < self.config.batch_size {
            return Ok(None);
        }

        Ok(Some(batch))
    }
}
