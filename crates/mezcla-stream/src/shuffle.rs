//! Buffered shuffle stream with a fixed memory budget
//!
//! Reorders a lazy source by holding up to `buffer_size` records in memory
//! and emitting a uniformly random occupied slot on each pull. This yields
//! a locally randomized approximation of a full shuffle: a larger buffer
//! improves randomness quality at memory cost, and `buffer_size == 1`
//! degenerates to pass-through order.

use crate::error::StreamError;
use crate::record::Record;
use crate::source::RecordSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded, bounded-memory reordering of a record source
///
/// Not restartable in place: replaying a permutation means constructing a
/// fresh `ShuffleBuffer` over a fresh source with the same seed.
pub struct ShuffleBuffer<S: RecordSource> {
    source: S,
    buffer: Vec<Record>,
    buffer_size: usize,
    seed: u64,
    rng: StdRng,
    primed: bool,
    source_done: bool,
}

impl<S: RecordSource> ShuffleBuffer<S> {
    /// Create a shuffle buffer over `source`
    ///
    /// # Arguments
    /// * `source` - Stream to reorder
    /// * `buffer_size` - Number of records held in memory; must be positive
    /// * `seed` - RNG seed; fixes the output permutation for a fixed source
    ///
    /// # Errors
    /// Returns [`StreamError::InvalidArgument`] if `buffer_size` is zero.
    pub fn new(source: S, buffer_size: usize, seed: u64) -> Result<Self, StreamError> {
        if buffer_size == 0 {
            return Err(StreamError::InvalidArgument(
                "shuffle buffer size must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            source,
            buffer: Vec::new(),
            buffer_size,
            seed,
            rng: StdRng::seed_from_u64(seed),
            primed: false,
            source_done: false,
        })
    }

    /// Seed this buffer was constructed with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Configured buffer capacity
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Fill the buffer up to capacity, stopping early on a short source
    fn fill(&mut self) -> Result<(), StreamError> {
        while self.buffer.len() < self.buffer_size {
            match self.source.next_record()? {
                Some(record) => self.buffer.push(record),
                None => {
                    self.source_done = true;
                    break;
                }
            }
        }
        Ok(())
    }
}

impl<S: RecordSource> RecordSource for ShuffleBuffer<S> {
    /// Pull one record in shuffled order
    ///
    /// The first pull fills the buffer. Each pull picks a uniformly random
    /// occupied slot, yields it, and refills the slot from the source; once
    /// the source is exhausted the buffer shrinks instead (the emptied slot
    /// is swap-removed). The stream ends when the buffer is empty and the
    /// source is exhausted.
    fn next_record(&mut self) -> Result<Option<Record>, StreamError> {
        if !self.primed {
            self.fill()?;
            self.primed = true;
        }

        if self.buffer.is_empty() {
            return Ok(None);
        }

        let slot = self.rng.gen_range(0..self.buffer.len());

        if self.source_done {
            return Ok(Some(self.buffer.swap_remove(slot)));
        }

        match self.source.next_record()? {
            Some(incoming) => Ok(Some(std::mem::replace(&mut self.buffer[slot], incoming))),
            None => {
                self.source_done = true;
                Ok(Some(self.buffer.swap_remove(slot)))
            }
        }
    }

    fn len_hint(&self) -> Option<usize> {
        if self.source_done {
            Some(self.buffer.len())
        } else {
            self.source.len_hint().map(|n| n + self.buffer.len())
        }
    }
}
