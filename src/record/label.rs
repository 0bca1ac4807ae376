//! Label encoder
//!
//! Pure function of a row's labels; never fails and never touches I/O.

use crate::manifest::LabelPair;

use super::Record;

/// Number of bytes in a label record's data field: two `i32` values.
pub const LABEL_DATA_SIZE: usize = 8;

/// Build the fixed-shape label record for one row.
///
/// Shape is always `channels=2, height=1, width=1`; the data field is
/// the primary and composite labels as little-endian `i32`s, and the
/// record's own label slot is unused (0).
pub fn label_record(labels: &LabelPair) -> Record {
    let mut data = Vec::with_capacity(LABEL_DATA_SIZE);
    data.extend_from_slice(&labels.primary.to_le_bytes());
    data.extend_from_slice(&labels.composite.to_le_bytes());

    Record {
        channels: 2,
        height: 1,
        width: 1,
        data,
        label: 0,
        encoded: false,
    }
}

/// Decode the two labels back out of a label record's data field.
///
/// Returns `None` if the data field is not exactly two `i32`s wide.
pub fn decode_labels(record: &Record) -> Option<LabelPair> {
    if record.data.len() != LABEL_DATA_SIZE {
        return None;
    }

    let primary = i32::from_le_bytes(record.data[0..4].try_into().ok()?);
    let composite = i32::from_le_bytes(record.data[4..8].try_into().ok()?);
    Some(LabelPair { primary, composite })
}
