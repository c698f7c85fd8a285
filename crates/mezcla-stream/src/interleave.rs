//! Weighted interleaving of multiple record sources
//!
//! Merges N lazy sources into one lazy stream. Each pull makes a single
//! seeded weighted draw among the still-active sources and advances only
//! the chosen source's cursor, so records from any one source keep their
//! original relative order.

use crate::error::StreamError;
use crate::record::Record;
use crate::source::RecordSource;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// What happens when a drawn source turns out to be exhausted
///
/// The policy is a required constructor argument so the behavior is always
/// explicit at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustionPolicy {
    /// End the combined stream the first time any source runs out,
    /// leaving records in the other sources unconsumed. Avoids skewing
    /// the tail of the stream toward sources that run long.
    FirstExhausted,
    /// Drop the exhausted source from the candidate set, renormalize the
    /// remaining weights, and continue until every source is drained.
    /// Zero-weight sources are never drawn, so the stream also ends once
    /// only zero-weight sources remain.
    AllExhausted,
}

/// Seeded weighted merge of several record sources
///
/// Weights need not be pre-normalized; they are normalized internally.
/// Exhaustion of a source is discovered on draw; there is no lookahead
/// buffering beyond the single in-flight pull.
pub struct Interleaver {
    active: Vec<(Box<dyn RecordSource>, f64)>,
    dist: Option<WeightedIndex<f64>>,
    policy: ExhaustionPolicy,
    rng: StdRng,
    done: bool,
}

impl Interleaver {
    /// Create an interleaver over `sources` with per-source `weights`
    ///
    /// # Arguments
    /// * `sources` - Streams to merge; order pairs them with `weights`
    /// * `weights` - Non-negative sampling weights, one per source
    /// * `seed` - RNG seed; fixes the draw sequence for reproducibility
    /// * `policy` - Behavior when a drawn source is exhausted
    ///
    /// # Errors
    /// Returns [`StreamError::InvalidArgument`] if `sources` is empty, the
    /// counts differ, any weight is negative or non-finite, or all weights
    /// are zero.
    pub fn new(
        sources: Vec<Box<dyn RecordSource>>,
        weights: Vec<f64>,
        seed: u64,
        policy: ExhaustionPolicy,
    ) -> Result<Self, StreamError> {
        if sources.is_empty() {
            return Err(StreamError::InvalidArgument(
                "at least one source is required".to_string(),
            ));
        }
        if sources.len() != weights.len() {
            return Err(StreamError::InvalidArgument(format!(
                "source count ({}) does not match weight count ({})",
                sources.len(),
                weights.len()
            )));
        }
        for &weight in &weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(StreamError::InvalidArgument(format!(
                    "weights must be finite and non-negative, got {}",
                    weight
                )));
            }
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(StreamError::InvalidArgument(
                "weights must not all be zero".to_string(),
            ));
        }

        let dist = WeightedIndex::new(weights.iter().copied())
            .map_err(|e| StreamError::InvalidArgument(format!("invalid weights: {}", e)))?;

        Ok(Self {
            active: sources.into_iter().zip(weights).collect(),
            dist: Some(dist),
            policy,
            rng: StdRng::seed_from_u64(seed),
            done: false,
        })
    }

    /// Configured exhaustion policy
    pub fn policy(&self) -> ExhaustionPolicy {
        self.policy
    }

    /// Number of sources still in the candidate set
    pub fn active_sources(&self) -> usize {
        self.active.len()
    }
}

impl RecordSource for Interleaver {
    fn next_record(&mut self) -> Result<Option<Record>, StreamError> {
        while !self.done {
            let dist = match self.dist.as_ref() {
                Some(dist) => dist,
                // Remaining weights are all zero: no source can ever be
                // drawn again, so the stream ends.
                None => break,
            };

            let idx = dist.sample(&mut self.rng);
            if let Some(record) = self.active[idx].0.next_record()? {
                return Ok(Some(record));
            }

            match self.policy {
                ExhaustionPolicy::FirstExhausted => {
                    self.done = true;
                }
                ExhaustionPolicy::AllExhausted => {
                    self.active.remove(idx);
                    self.dist = WeightedIndex::new(self.active.iter().map(|(_, w)| *w)).ok();
                }
            }
        }

        Ok(None)
    }

    fn len_hint(&self) -> Option<usize> {
        match self.policy {
            // Which source runs out first depends on the draws, so the
            // combined length is unknowable up front.
            ExhaustionPolicy::FirstExhausted => None,
            ExhaustionPolicy::AllExhausted => self
                .active
                .iter()
                .map(|(source, _)| source.len_hint())
                .sum::<Option<usize>>(),
        }
    }
}
