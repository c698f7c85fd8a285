//! Unit tests for batch grouping

use mezcla_stream::batch::{BatchConfig, Batcher};
use mezcla_stream::error::StreamError;
use mezcla_stream::record::Record;
use mezcla_stream::source::MemorySource;
use serde_json::json;

#[test]
fn test_batcher_rejects_zero_batch_size() {
    let config = BatchConfig {
        batch_size: 0,
        drop_last: false,
    };
    let result = Batcher::new(numbered_source(5), config);
    assert!(matches!(result, Err(StreamError::InvalidArgument(_))));
}

#[test]
fn test_batcher_groups_in_order() {
    let config = BatchConfig {
        batch_size: 3,
        drop_last: false,
    };
    let mut batcher = Batcher::new(numbered_source(10), config).expect("Failed to create batcher");

    let sizes_and_first: Vec<(usize, i64)> = std::iter::from_fn(|| {
        batcher
            .next_batch()
            .expect("Failed to get batch")
            .map(|batch| (batch.len(), batch[0]["id"].as_i64().expect("id field")))
    })
    .collect();

    // 3 full batches plus a short final one, in stream order.
    assert_eq!(sizes_and_first, vec![(3, 0), (3, 3), (3, 6), (1, 9)]);
}

#[test]
fn test_batcher_drop_last() {
    let config = BatchConfig {
        batch_size: 3,
        drop_last: true,
    };
    let mut batcher = Batcher::new(numbered_source(10), config).expect("Failed to create batcher");

    let mut batches = 0;
    while let Some(batch) = batcher.next_batch().expect("Failed to get batch") {
        assert_eq!(batch.len(), 3);
        batches += 1;
    }
    assert_eq!(batches, 3);
}

#[test]
fn test_batcher_exact_multiple() {
    let config = BatchConfig {
        batch_size: 5,
        drop_last: false,
    };
    let mut batcher = Batcher::new(numbered_source(10), config).expect("Failed to create batcher");

    assert_eq!(batcher.next_batch().expect("Failed to get batch").map(|b| b.len()), Some(5));
    assert_eq!(batcher.next_batch().expect("Failed to get batch").map(|b| b.len()), Some(5));
    assert!(batcher.next_batch().expect("Failed to get batch").is_none());
}

#[test]
fn test_batcher_empty_source() {
    let mut batcher = Batcher::new(numbered_source(0), BatchConfig::default())
        .expect("Failed to create batcher");
    assert!(batcher.next_batch().expect("Failed to get batch").is_none());
}

#[test]
fn test_batch_config_default() {
    let config = BatchConfig::default();
    assert_eq!(config.batch_size, 32);
    assert!(!config.drop_last);
}

// Helper functions

fn record(id: i64) -> Record {
    let mut map = Record::new();
    map.insert("id".to_string(), json!(id));
    map
}

fn numbered_source(count: i64) -> MemorySource {
    MemorySource::new((0..count).map(record).collect())
}
