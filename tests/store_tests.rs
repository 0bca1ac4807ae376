//! Tests for the backend store engines and the transaction batcher
//!
//! These tests verify:
//! - Create-new open semantics (destination must not pre-exist)
//! - Transactional put/commit round-trips on both engines
//! - Batch commit cadence (threshold, final partial batch, no empty commits)
//! - Corruption detection on read
//!
//! Both engines are exercised through the same store facade; anything
//! engine-specific is asserted through the table engine's
//! one-segment-per-commit layout.

use std::path::{Path, PathBuf};

use datasetkv::batcher::Batcher;
use datasetkv::store::{read_all, segment_entry_counts, BackendKind, Mode, Store};
use datasetkv::DatasetError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("db");
    (temp_dir, path)
}

/// Run `count` puts through a batcher with the given threshold
fn batch_puts(kind: BackendKind, path: &Path, count: usize, batch_size: usize) -> usize {
    let store = Store::open(kind, path, Mode::CreateNew).unwrap();
    let mut batcher = Batcher::new("test", store, batch_size);

    for i in 0..count {
        let key = format!("{:08}_img{}.jpg", i, i);
        let value = format!("value{}", i);
        batcher.put(&key, value.as_bytes()).unwrap();
    }

    let (committed, _store) = batcher.finish().unwrap();
    committed
}

// =============================================================================
// Open Semantics Tests (both engines)
// =============================================================================

#[test]
fn test_create_new_fails_if_path_exists() {
    for kind in [BackendKind::Log, BackendKind::Table] {
        let (_temp, path) = setup_store_path();
        std::fs::create_dir(&path).unwrap();

        let result = Store::open(kind, &path, Mode::CreateNew);

        assert!(
            matches!(result, Err(DatasetError::BackendOpen { .. })),
            "{} engine accepted an existing path",
            kind
        );
    }
}

#[test]
fn test_create_new_fails_over_existing_store() {
    for kind in [BackendKind::Log, BackendKind::Table] {
        let (_temp, path) = setup_store_path();
        batch_puts(kind, &path, 3, 10);

        let before = read_all(kind, &path).unwrap();
        let result = Store::open(kind, &path, Mode::CreateNew);

        assert!(matches!(result, Err(DatasetError::BackendOpen { .. })));
        // Nothing was written over the existing store
        assert_eq!(read_all(kind, &path).unwrap(), before);
    }
}

#[test]
fn test_read_only_fails_without_store() {
    for kind in [BackendKind::Log, BackendKind::Table] {
        let (_temp, path) = setup_store_path();

        let result = Store::open(kind, &path, Mode::ReadOnly);

        assert!(matches!(result, Err(DatasetError::BackendOpen { .. })));
    }
}

// =============================================================================
// Put/Commit Round-Trip Tests (both engines)
// =============================================================================

#[test]
fn test_commit_roundtrip_preserves_order() {
    for kind in [BackendKind::Log, BackendKind::Table] {
        let (_temp, path) = setup_store_path();

        let mut store = Store::open(kind, &path, Mode::CreateNew).unwrap();
        let mut txn = store.new_transaction();
        txn.put(&b"00000000_a.jpg"[..], &b"alpha"[..]);
        txn.put(&b"00000001_b.jpg"[..], &b"beta"[..]);
        txn.put(&b"00000002_c.jpg"[..], &b"gamma"[..]);
        let committed = store.commit(&mut txn).unwrap();

        assert_eq!(committed, 3);
        assert_eq!(txn.pending(), 0);

        let entries = read_all(kind, &path).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], (b"00000000_a.jpg".to_vec(), b"alpha".to_vec()));
        assert_eq!(entries[2], (b"00000002_c.jpg".to_vec(), b"gamma".to_vec()));
    }
}

#[test]
fn test_commit_empty_transaction_is_noop() {
    for kind in [BackendKind::Log, BackendKind::Table] {
        let (_temp, path) = setup_store_path();

        let mut store = Store::open(kind, &path, Mode::CreateNew).unwrap();
        let mut txn = store.new_transaction();
        let committed = store.commit(&mut txn).unwrap();

        assert_eq!(committed, 0);
        assert!(read_all(kind, &path).unwrap().is_empty());
    }
}

#[test]
fn test_multiple_commits_accumulate() {
    for kind in [BackendKind::Log, BackendKind::Table] {
        let (_temp, path) = setup_store_path();

        let mut store = Store::open(kind, &path, Mode::CreateNew).unwrap();
        for batch in 0..3 {
            let mut txn = store.new_transaction();
            for i in 0..4 {
                let key = format!("{:08}_f.jpg", batch * 4 + i);
                txn.put(key.as_bytes(), &b"v"[..]);
            }
            store.commit(&mut txn).unwrap();
        }

        assert_eq!(read_all(kind, &path).unwrap().len(), 12);
    }
}

#[test]
fn test_empty_store_reads_empty() {
    for kind in [BackendKind::Log, BackendKind::Table] {
        let (_temp, path) = setup_store_path();

        Store::open(kind, &path, Mode::CreateNew).unwrap();

        assert!(read_all(kind, &path).unwrap().is_empty());
    }
}

#[test]
fn test_large_values_roundtrip() {
    for kind in [BackendKind::Log, BackendKind::Table] {
        let (_temp, path) = setup_store_path();
        let large_value = vec![0xAB; 1024 * 100]; // 100 KB

        let mut store = Store::open(kind, &path, Mode::CreateNew).unwrap();
        let mut txn = store.new_transaction();
        txn.put(&b"big_key"[..], large_value.clone());
        store.commit(&mut txn).unwrap();

        let entries = read_all(kind, &path).unwrap();
        assert_eq!(entries[0].1, large_value);
    }
}

// =============================================================================
// Batcher Cadence Tests
// =============================================================================

#[test]
fn test_batcher_commits_exact_thousands() {
    // 2500 rows at the standard threshold: commits of 1000, 1000, 500
    let (_temp, path) = setup_store_path();

    let committed = batch_puts(BackendKind::Table, &path, 2500, 1000);

    assert_eq!(committed, 2500);
    assert_eq!(segment_entry_counts(&path).unwrap(), vec![1000, 1000, 500]);
}

#[test]
fn test_batcher_no_empty_final_commit() {
    // 2000 rows divide evenly; there must be no trailing empty commit
    let (_temp, path) = setup_store_path();

    let committed = batch_puts(BackendKind::Table, &path, 2000, 1000);

    assert_eq!(committed, 2000);
    assert_eq!(segment_entry_counts(&path).unwrap(), vec![1000, 1000]);
}

#[test]
fn test_batcher_single_partial_batch() {
    let (_temp, path) = setup_store_path();

    let committed = batch_puts(BackendKind::Table, &path, 7, 1000);

    assert_eq!(committed, 7);
    assert_eq!(segment_entry_counts(&path).unwrap(), vec![7]);
}

#[test]
fn test_batcher_zero_rows_commits_nothing() {
    let (_temp, path) = setup_store_path();

    let committed = batch_puts(BackendKind::Table, &path, 0, 1000);

    assert_eq!(committed, 0);
    assert!(segment_entry_counts(&path).unwrap().is_empty());
}

#[test]
fn test_batcher_preserves_order_across_batches() {
    let (_temp, path) = setup_store_path();

    batch_puts(BackendKind::Log, &path, 25, 4);

    let entries = read_all(BackendKind::Log, &path).unwrap();
    assert_eq!(entries.len(), 25);
    for (i, (key, _)) in entries.iter().enumerate() {
        let expected = format!("{:08}_img{}.jpg", i, i);
        assert_eq!(key, expected.as_bytes());
    }
}

// =============================================================================
// Corruption Detection Tests
// =============================================================================

#[test]
fn test_log_rejects_garbage_file() {
    let (_temp, path) = setup_store_path();
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("data.log"), b"GARBAGE_DATA_NOT_A_LOG").unwrap();

    let result = read_all(BackendKind::Log, &path);

    assert!(matches!(result, Err(DatasetError::Storage(_))));
}

#[test]
fn test_log_detects_flipped_bit() {
    let (_temp, path) = setup_store_path();
    batch_puts(BackendKind::Log, &path, 5, 10);

    // Flip one byte in the last entry's value region
    let log_path = path.join("data.log");
    let mut data = std::fs::read(&log_path).unwrap();
    let last = data.len() - 1;
    data[last] ^= 0xFF;
    std::fs::write(&log_path, data).unwrap();

    let result = read_all(BackendKind::Log, &path);
    assert!(matches!(result, Err(DatasetError::Storage(_))));
}

#[test]
fn test_segment_rejects_garbage_file() {
    let (_temp, path) = setup_store_path();
    batch_puts(BackendKind::Table, &path, 3, 10);
    std::fs::write(path.join("segment_000002.seg"), b"NOT_A_SEGMENT").unwrap();

    let result = read_all(BackendKind::Table, &path);

    assert!(matches!(result, Err(DatasetError::Storage(_))));
}

#[test]
fn test_segment_detects_truncation() {
    let (_temp, path) = setup_store_path();
    batch_puts(BackendKind::Table, &path, 10, 10);

    let seg_path = path.join("segment_000001.seg");
    let data = std::fs::read(&seg_path).unwrap();
    std::fs::write(&seg_path, &data[..data.len() - 8]).unwrap();

    let result = read_all(BackendKind::Table, &path);
    assert!(matches!(result, Err(DatasetError::Storage(_))));
}

// =============================================================================
// Backend Selection Tests
// =============================================================================

#[test]
fn test_backend_kind_from_str() {
    assert_eq!("log".parse::<BackendKind>().unwrap(), BackendKind::Log);
    assert_eq!("table".parse::<BackendKind>().unwrap(), BackendKind::Table);
    assert!(matches!(
        "lmdb".parse::<BackendKind>(),
        Err(DatasetError::Config(_))
    ));
}
