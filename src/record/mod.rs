//! Record Module
//!
//! The fixed-schema value written into both stores, plus the encoders
//! that produce it.
//!
//! ## Responsibilities
//! - Payload encoding via the media decode capability
//! - Label encoding (pure, never fails)
//! - Deterministic row key generation
//! - Optional per-store size consistency checking
//!
//! ## Wire Format (bincode, little-endian)
//! ```text
//! ┌──────────────┬─────────────┬────────────┬──────────────────┬───────────┐
//! │ Channels (4) │ Height (4)  │ Width (4)  │ DataLen (8)+Data │ Label (4) │
//! └──────────────┴─────────────┴────────────┴──────────────────┴───────────┘
//! ```

pub mod key;
pub mod label;
pub mod media;
mod size_check;

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};

pub use media::{encode_file, infer_encode_type, EncodeOptions};
pub use size_check::SizeChecker;

/// One sample record: declared shape, raw data bytes, and a scalar label.
///
/// Payload records hold decoded pixel bytes (or the original compressed
/// file bytes when pre-encoding is requested); label records hold the
/// two labels as little-endian `i32`s. Records exist only transiently
/// between encoding and serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub channels: i32,
    pub height: i32,
    pub width: i32,
    pub data: Vec<u8>,
    pub label: i32,

    /// True when `data` holds the original compressed file bytes.
    /// Not part of the persisted schema.
    #[serde(skip)]
    pub encoded: bool,
}

impl Record {
    /// Serialize to the persisted wire format
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| DatasetError::Serialization(e.to_string()))
    }

    /// Deserialize from the persisted wire format
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| DatasetError::Serialization(e.to_string()))
    }
}
