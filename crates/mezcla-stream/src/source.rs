//! Source Sequence abstraction and file-backed sources
//!
//! A source is a forward-only, lazily-produced stream of records. It is
//! consumed at most once and is not rewindable; replaying a stream means
//! constructing a fresh source.

use crate::error::StreamError;
use crate::record::Record;
use anyhow::Context;
use serde_json::Value;
use std::collections::VecDeque;
use std::fs;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Pull-based stream of records
///
/// The only required operation is "get next record or signal end". The
/// optional length hint is used for diagnostics, never for correctness.
pub trait RecordSource {
    /// Pull the next record, `Ok(None)` once the source is exhausted.
    ///
    /// Errors from the underlying storage propagate unchanged; a source
    /// that has returned an error is not required to recover.
    fn next_record(&mut self) -> Result<Option<Record>, StreamError>;

    /// Number of records still to come, if known.
    fn len_hint(&self) -> Option<usize> {
        None
    }
}

impl RecordSource for Box<dyn RecordSource> {
    fn next_record(&mut self) -> Result<Option<Record>, StreamError> {
        (**self).next_record()
    }

    fn len_hint(&self) -> Option<usize> {
        (**self).len_hint()
    }
}

/// In-memory source yielding owned records in order
///
/// Mainly useful for tests and for feeding programmatically built data
/// into a pipeline.
pub struct MemorySource {
    records: VecDeque<Record>,
}

impl MemorySource {
    /// Create a source over the given records
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }
}

impl RecordSource for MemorySource {
    fn next_record(&mut self) -> Result<Option<Record>, StreamError> {
        Ok(self.records.pop_front())
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.records.len())
    }
}

/// Lazily reads records from a single JSONL file
///
/// One line is read per pull; blank lines are skipped. Every non-blank
/// line must parse to a JSON object. I/O and parse failures surface as
/// [`StreamError::Source`] with file and line context.
pub struct JsonlSource {
    path: PathBuf,
    lines: Lines<BufReader<fs::File>>,
    line_num: usize,
}

impl JsonlSource {
    /// Open a JSONL file for streaming
    pub fn open(path: &Path) -> Result<Self, StreamError> {
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open JSONL file: {:?}", path))?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            line_num: 0,
        })
    }
}

impl RecordSource for JsonlSource {
    fn next_record(&mut self) -> Result<Option<Record>, StreamError> {
        loop {
            let line = match self.lines.next() {
                Some(line) => line.with_context(|| {
                    format!("Failed to read line {} in {:?}", self.line_num + 1, self.path)
                })?,
                None => return Ok(None),
            };
            self.line_num += 1;

            if line.trim().is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(&line).with_context(|| {
                format!(
                    "Failed to parse record at line {} in {:?}",
                    self.line_num, self.path
                )
            })?;

            return match value {
                Value::Object(record) => Ok(Some(record)),
                _ => Err(anyhow::anyhow!(
                    "Expected a JSON object at line {} in {:?}",
                    self.line_num,
                    self.path
                )
                .into()),
            };
        }
    }
}

/// Streams records from every `.jsonl` file in a directory
///
/// Files are drained one after another in sorted filename order, so the
/// overall record order is deterministic for a fixed directory state.
pub struct JsonlDirSource {
    pending: VecDeque<PathBuf>,
    current: Option<JsonlSource>,
}

impl JsonlDirSource {
    /// Open a directory of JSONL files for streaming
    pub fn open(dir: &Path) -> Result<Self, StreamError> {
        let mut paths = Vec::new();
        let entries =
            fs::read_dir(dir).with_context(|| format!("Failed to read data directory: {:?}", dir))?;

        for entry in entries {
            let entry =
                entry.with_context(|| format!("Failed to read directory entry in {:?}", dir))?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
                paths.push(path);
            }
        }

        paths.sort();

        Ok(Self {
            pending: paths.into(),
            current: None,
        })
    }
}

impl RecordSource for JsonlDirSource {
    fn next_record(&mut self) -> Result<Option<Record>, StreamError> {
        loop {
            if let Some(source) = self.current.as_mut() {
                if let Some(record) = source.next_record()? {
                    return Ok(Some(record));
                }
                self.current = None;
            }

            match self.pending.pop_front() {
                Some(path) => self.current = Some(JsonlSource::open(&path)?),
                None => return Ok(None),
            }
        }
    }
}

/// Adapter bridging a [`RecordSource`] into a standard iterator
pub struct RecordIter<S: RecordSource> {
    source: S,
}

impl<S: RecordSource> Iterator for RecordIter<S> {
    type Item = Result<Record, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.next_record().transpose()
    }
}

/// Extension methods available on every source
pub trait SourceExt: RecordSource + Sized {
    /// Bridge into an `Iterator` of fallible records for use in `for`
    /// loops and iterator combinators.
    fn records(self) -> RecordIter<Self> {
        RecordIter { source: self }
    }
}

impl<S: RecordSource> SourceExt for S {}
