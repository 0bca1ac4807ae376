//! Tests for record encoding building blocks
//!
//! These tests verify:
//! - Row key formatting
//! - Label record shape and byte layout
//! - Wire serialization round-trips
//! - Encode-type inference from file extensions
//! - Size consistency checking

use datasetkv::manifest::LabelPair;
use datasetkv::record::key::row_key;
use datasetkv::record::label::{decode_labels, label_record, LABEL_DATA_SIZE};
use datasetkv::record::{infer_encode_type, Record, SizeChecker};
use datasetkv::DatasetError;

// =============================================================================
// Helper Functions
// =============================================================================

fn record_with_data(channels: i32, height: i32, width: i32, data: Vec<u8>) -> Record {
    Record {
        channels,
        height,
        width,
        data,
        label: 0,
        encoded: false,
    }
}

// =============================================================================
// Key Formatting Tests
// =============================================================================

#[test]
fn test_key_zero_pads_to_eight_digits() {
    assert_eq!(row_key(5, "img5.jpg"), "00000005_img5.jpg");
}

#[test]
fn test_key_first_row() {
    assert_eq!(row_key(0, "a/b.png"), "00000000_a/b.png");
}

#[test]
fn test_key_large_index() {
    assert_eq!(row_key(12_345_678, "x.jpg"), "12345678_x.jpg");
}

// =============================================================================
// Label Record Tests
// =============================================================================

#[test]
fn test_label_record_shape() {
    let record = label_record(&LabelPair::from_raw(3, 1, 2));

    assert_eq!(record.channels, 2);
    assert_eq!(record.height, 1);
    assert_eq!(record.width, 1);
    assert_eq!(record.label, 0);
    assert_eq!(record.data.len(), LABEL_DATA_SIZE);
}

#[test]
fn test_label_record_byte_layout() {
    let record = label_record(&LabelPair {
        primary: 7,
        composite: 300,
    });

    assert_eq!(&record.data[0..4], &7i32.to_le_bytes());
    assert_eq!(&record.data[4..8], &300i32.to_le_bytes());
}

#[test]
fn test_label_record_roundtrip() {
    let labels = LabelPair::from_raw(9, 3, 1);

    let decoded = decode_labels(&label_record(&labels)).unwrap();

    assert_eq!(decoded, labels);
}

#[test]
fn test_decode_labels_rejects_wrong_width() {
    let record = record_with_data(2, 1, 1, vec![0u8; 12]);

    assert!(decode_labels(&record).is_none());
}

// =============================================================================
// Wire Serialization Tests
// =============================================================================

#[test]
fn test_record_roundtrip() {
    let record = record_with_data(3, 2, 2, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);

    let bytes = record.to_bytes().unwrap();
    let decoded = Record::from_bytes(&bytes).unwrap();

    assert_eq!(decoded, record);
}

#[test]
fn test_record_serialization_deterministic() {
    let record = record_with_data(1, 4, 4, vec![0xAB; 16]);

    assert_eq!(record.to_bytes().unwrap(), record.to_bytes().unwrap());
}

#[test]
fn test_encoded_flag_not_persisted() {
    let mut record = record_with_data(0, 0, 0, vec![1, 2, 3]);
    record.encoded = true;

    let decoded = Record::from_bytes(&record.to_bytes().unwrap()).unwrap();

    assert!(!decoded.encoded);
    assert_eq!(decoded.data, record.data);
}

// =============================================================================
// Encode-Type Inference Tests
// =============================================================================

#[test]
fn test_infer_lowercases_extension() {
    assert_eq!(infer_encode_type("photo.PNG"), Some(".png".to_string()));
}

#[test]
fn test_infer_uses_last_dot() {
    assert_eq!(infer_encode_type("archive.tar.jpg"), Some(".jpg".to_string()));
}

#[test]
fn test_infer_fails_without_extension() {
    assert_eq!(infer_encode_type("noextension"), None);
}

// =============================================================================
// Size Checker Tests
// =============================================================================

#[test]
fn test_first_record_fixes_expected_size() {
    let mut checker = SizeChecker::new();

    checker
        .check("00000000_a.jpg", &record_with_data(1, 10, 10, vec![0; 100]))
        .unwrap();

    assert_eq!(checker.expected(), Some(100));
}

#[test]
fn test_uniform_sizes_pass() {
    let mut checker = SizeChecker::new();

    for i in 0..10 {
        let key = row_key(i, "img.jpg");
        checker
            .check(&key, &record_with_data(1, 10, 10, vec![0; 100]))
            .unwrap();
    }
}

#[test]
fn test_size_mismatch_is_an_error() {
    let mut checker = SizeChecker::new();

    checker
        .check("00000000_a.jpg", &record_with_data(1, 10, 10, vec![0; 100]))
        .unwrap();
    let result = checker.check("00000001_b.jpg", &record_with_data(1, 20, 20, vec![0; 400]));

    match result {
        Err(DatasetError::SizeMismatch {
            key,
            expected,
            actual,
        }) => {
            assert_eq!(key, "00000001_b.jpg");
            assert_eq!(expected, 100);
            assert_eq!(actual, 400);
        }
        other => panic!("expected SizeMismatch, got {:?}", other),
    }
}

#[test]
fn test_checkers_are_independent_per_store() {
    let mut payload = SizeChecker::new();
    let mut labels = SizeChecker::new();

    payload
        .check("k0", &record_with_data(1, 10, 10, vec![0; 100]))
        .unwrap();
    // Label records are 8 bytes regardless of the payload size
    labels
        .check("k0", &label_record(&LabelPair::from_raw(1, 2, 3)))
        .unwrap();
    labels
        .check("k1", &label_record(&LabelPair::from_raw(4, 5, 6)))
        .unwrap();

    assert_eq!(payload.expected(), Some(100));
    assert_eq!(labels.expected(), Some(8));
}
