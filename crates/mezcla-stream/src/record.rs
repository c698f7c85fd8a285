//! Record model for streaming pipelines

use serde_json::{Map, Value};

/// A single structured unit of data flowing through a pipeline.
///
/// A record is a mapping from field name to JSON value, matching the
/// top-level object of one JSONL line.
pub type Record = Map<String, Value>;
