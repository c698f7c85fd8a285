//! Bounded-memory shuffling and weighted interleaving for lazy record streams
//!
//! This crate provides the building blocks for streaming data pipelines:
//! pull-based record sources (in-memory and JSONL-backed), a buffered
//! shuffle stream that reorders records within a fixed memory budget, a
//! weighted interleaver that merges several sources into one stream, and a
//! batching layer on top. All components speak the same [`RecordSource`]
//! contract, so they compose freely.

pub mod batch;
pub mod config;
pub mod error;
pub mod interleave;
pub mod record;
pub mod shuffle;
pub mod source;

pub use error::StreamError;
pub use interleave::{ExhaustionPolicy, Interleaver};
pub use record::Record;
pub use shuffle::ShuffleBuffer;
pub use source::{RecordSource, SourceExt};
