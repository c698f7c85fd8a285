//! Unit tests for record sources

use mezcla_stream::error::StreamError;
use mezcla_stream::record::Record;
use mezcla_stream::source::{
    JsonlDirSource, JsonlSource, MemorySource, RecordSource, SourceExt,
};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_memory_source_yields_in_order() {
    let mut source = MemorySource::new(vec![record(1), record(2), record(3)]);

    assert_eq!(source.len_hint(), Some(3));
    assert_eq!(pull_id(&mut source), Some(1));
    assert_eq!(source.len_hint(), Some(2));
    assert_eq!(pull_id(&mut source), Some(2));
    assert_eq!(pull_id(&mut source), Some(3));
    assert_eq!(pull_id(&mut source), None);
    assert_eq!(source.len_hint(), Some(0));
}

#[test]
fn test_jsonl_source_reads_records() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_jsonl(
        dir.path(),
        "data.jsonl",
        "{\"id\": 1}\n{\"id\": 2}\n{\"id\": 3}\n",
    );

    let mut source = JsonlSource::open(&path).expect("Failed to open JSONL file");
    assert_eq!(pull_id(&mut source), Some(1));
    assert_eq!(pull_id(&mut source), Some(2));
    assert_eq!(pull_id(&mut source), Some(3));
    assert_eq!(pull_id(&mut source), None);
}

#[test]
fn test_jsonl_source_skips_blank_lines() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_jsonl(dir.path(), "data.jsonl", "{\"id\": 1}\n\n   \n{\"id\": 2}\n");

    let mut source = JsonlSource::open(&path).expect("Failed to open JSONL file");
    assert_eq!(pull_id(&mut source), Some(1));
    assert_eq!(pull_id(&mut source), Some(2));
    assert_eq!(pull_id(&mut source), None);
}

#[test]
fn test_jsonl_source_fails_on_malformed_line() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_jsonl(dir.path(), "data.jsonl", "{\"id\": 1}\nnot json\n{\"id\": 3}\n");

    let mut source = JsonlSource::open(&path).expect("Failed to open JSONL file");

    // Records before the bad line still come through.
    assert_eq!(pull_id(&mut source), Some(1));
    assert!(matches!(source.next_record(), Err(StreamError::Source(_))));
}

#[test]
fn test_jsonl_source_rejects_non_object_line() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = write_jsonl(dir.path(), "data.jsonl", "[1, 2, 3]\n");

    let mut source = JsonlSource::open(&path).expect("Failed to open JSONL file");
    assert!(matches!(source.next_record(), Err(StreamError::Source(_))));
}

#[test]
fn test_jsonl_source_missing_file() {
    let result = JsonlSource::open(Path::new("/nonexistent/data.jsonl"));
    assert!(matches!(result, Err(StreamError::Source(_))));
}

#[test]
fn test_jsonl_dir_source_sorted_file_order() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    // Written out of order; drained in sorted filename order.
    write_jsonl(dir.path(), "b.jsonl", "{\"id\": 3}\n{\"id\": 4}\n");
    write_jsonl(dir.path(), "a.jsonl", "{\"id\": 1}\n{\"id\": 2}\n");
    write_jsonl(dir.path(), "notes.txt", "not a jsonl file\n");

    let mut source = JsonlDirSource::open(dir.path()).expect("Failed to open directory");
    assert_eq!(pull_id(&mut source), Some(1));
    assert_eq!(pull_id(&mut source), Some(2));
    assert_eq!(pull_id(&mut source), Some(3));
    assert_eq!(pull_id(&mut source), Some(4));
    assert_eq!(pull_id(&mut source), None);
}

#[test]
fn test_jsonl_dir_source_empty_dir() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let mut source = JsonlDirSource::open(dir.path()).expect("Failed to open directory");
    assert_eq!(pull_id(&mut source), None);
}

#[test]
fn test_records_iterator_bridge() {
    let source = MemorySource::new(vec![record(1), record(2)]);

    let ids: Vec<i64> = source
        .records()
        .collect::<Result<Vec<Record>, StreamError>>()
        .expect("Iteration failed")
        .iter()
        .map(|r| r["id"].as_i64().expect("id field"))
        .collect();

    assert_eq!(ids, vec![1, 2]);
}

// Helper functions

fn record(id: i64) -> Record {
    let mut map = Record::new();
    map.insert("id".to_string(), json!(id));
    map
}

fn pull_id<S: RecordSource>(source: &mut S) -> Option<i64> {
    source
        .next_record()
        .expect("Pull failed")
        .map(|r| r["id"].as_i64().expect("id field should be an integer"))
}

fn write_jsonl(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write test data");
    path
}
