//! Pipeline configuration structures
//!
//! This module provides the JSON configuration format describing a record
//! pipeline: which JSONL sources to read, their sampling weights, the
//! exhaustion policy, and an optional shuffle buffer.

use crate::error::StreamError;
use crate::interleave::{ExhaustionPolicy, Interleaver};
use crate::shuffle::ShuffleBuffer;
use crate::source::{JsonlDirSource, JsonlSource, RecordSource};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One input source of a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    /// JSONL file, or directory of JSONL files
    pub path: PathBuf,
    /// Sampling weight relative to the other sources
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

/// Complete pipeline configuration loaded from file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input sources, interleaved by weight when there is more than one
    pub sources: Vec<SourceSpec>,
    /// Random seed for interleaving and shuffling
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Behavior when one source runs out before the others
    #[serde(default = "default_policy")]
    pub policy: ExhaustionPolicy,
    /// Shuffle buffer size; omit to keep stream order
    #[serde(default)]
    pub shuffle_buffer: Option<usize>,
}

fn default_seed() -> u64 {
    42
}

fn default_policy() -> ExhaustionPolicy {
    ExhaustionPolicy::FirstExhausted
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON configuration file
    ///
    /// # Returns
    /// Loaded configuration or error if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read pipeline config: {:?}", path))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse pipeline config: {:?}", path))?;
        Ok(config)
    }

    /// Build the configured source stack
    ///
    /// Opens every source (a `.jsonl` file or a directory of them), merges
    /// them through an [`Interleaver`] when there is more than one, and
    /// wraps the result in a [`ShuffleBuffer`] when `shuffle_buffer` is set.
    pub fn build(&self) -> Result<Box<dyn RecordSource>, StreamError> {
        if self.sources.is_empty() {
            return Err(StreamError::InvalidArgument(
                "pipeline needs at least one source".to_string(),
            ));
        }

        let mut opened: Vec<Box<dyn RecordSource>> = Vec::with_capacity(self.sources.len());
        for spec in &self.sources {
            if spec.path.is_dir() {
                opened.push(Box::new(JsonlDirSource::open(&spec.path)?));
            } else {
                opened.push(Box::new(JsonlSource::open(&spec.path)?));
            }
        }

        let merged: Box<dyn RecordSource> = if opened.len() == 1 {
            opened.remove(0)
        } else {
            let weights = self.sources.iter().map(|s| s.weight).collect();
            Box::new(Interleaver::new(opened, weights, self.seed, self.policy)?)
        };

        match self.shuffle_buffer {
            Some(buffer_size) => Ok(Box::new(ShuffleBuffer::new(merged, buffer_size, self.seed)?)),
            None => Ok(merged),
        }
    }
}
