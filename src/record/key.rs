//! Row key generation
//!
//! Keys are derived from a row's position in the sequence actually
//! written, so both stores generate identical keys from the shared
//! row ordering.

/// Build the sort/lookup key for one row:
/// 8-digit zero-padded sequence index, an underscore, the relative path.
///
/// Position 5 with path "img5.jpg" yields "00000005_img5.jpg".
pub fn row_key(index: usize, path: &str) -> String {
    format!("{:08}_{}", index, path)
}
