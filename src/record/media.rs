//! Record encoder
//!
//! Turns one manifest row plus the root folder into a payload record.
//! Decoding and resizing are consumed as an external capability: the
//! `image` crate, compiled in through the `media-decode` feature. A
//! build without the feature cannot convert anything and reports the
//! missing capability before any store is touched.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::config::Config;
use crate::error::{DatasetError, Result};

use super::Record;

/// Options controlling payload encoding, passed explicitly per run
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Decode to three-channel color (false: single-channel grayscale)
    pub color: bool,

    /// Target width in pixels; 0 keeps the source width
    pub resize_width: u32,

    /// Target height in pixels; 0 keeps the source height
    pub resize_height: u32,

    /// Store the original compressed file bytes instead of pixels
    pub pre_encoded: bool,

    /// Declared encode type (e.g. ".png"); empty means infer per file
    pub encode_type: String,
}

impl EncodeOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            color: !config.gray,
            resize_width: config.resize_width,
            resize_height: config.resize_height,
            pre_encoded: config.effective_encoded(),
            encode_type: config.encode_type.clone(),
        }
    }
}

/// Fail unless the decode capability was compiled in.
///
/// Checked once at startup so a capability-less build aborts before
/// either store is created.
pub fn ensure_decode_available() -> Result<()> {
    if cfg!(feature = "media-decode") {
        Ok(())
    } else {
        Err(DatasetError::Capability(
            "built without the media-decode feature; media files cannot be processed".to_string(),
        ))
    }
}

/// Infer an encode type from a path's file extension.
///
/// Returns the substring after the last '.', lower-cased and including
/// the dot ("photo.PNG" → ".png"), or `None` when the path has no
/// extension to infer from.
pub fn infer_encode_type(path: &str) -> Option<String> {
    let dot = path.rfind('.')?;
    Some(path[dot..].to_lowercase())
}

/// Encode one media file into a payload record.
///
/// Pre-encoded mode stores the file's original bytes unmodified with
/// zero dimensions; raw mode decodes, optionally resizes, and stores
/// interleaved pixel bytes with the decoded shape. Any read or decode
/// failure is returned as an [`DatasetError::Encode`] skip signal; the
/// caller excludes the row and moves on.
pub fn encode_file(root: &Path, relative_path: &str, opts: &EncodeOptions) -> Result<Record> {
    let full_path = root.join(relative_path);

    if opts.pre_encoded {
        let encode_type = if opts.encode_type.is_empty() {
            match infer_encode_type(relative_path) {
                Some(inferred) => inferred,
                None => {
                    warn!(path = relative_path, "failed to infer encode type");
                    String::new()
                }
            }
        } else {
            opts.encode_type.clone()
        };

        let data = fs::read(&full_path).map_err(|e| DatasetError::Encode {
            path: full_path.clone(),
            reason: e.to_string(),
        })?;

        tracing::trace!(path = relative_path, encode_type, bytes = data.len(), "stored pre-encoded");
        return Ok(Record {
            channels: 0,
            height: 0,
            width: 0,
            data,
            label: 0,
            encoded: true,
        });
    }

    decode_pixels(&full_path, opts)
}

#[cfg(feature = "media-decode")]
fn decode_pixels(full_path: &Path, opts: &EncodeOptions) -> Result<Record> {
    use image::imageops::FilterType;

    let img = image::open(full_path).map_err(|e| DatasetError::Encode {
        path: full_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    // Resize only when both target dimensions are set
    let img = if opts.resize_width > 0 && opts.resize_height > 0 {
        img.resize_exact(opts.resize_width, opts.resize_height, FilterType::Triangle)
    } else {
        img
    };

    let record = if opts.color {
        let rgb = img.to_rgb8();
        Record {
            channels: 3,
            height: rgb.height() as i32,
            width: rgb.width() as i32,
            data: rgb.into_raw(),
            label: 0,
            encoded: false,
        }
    } else {
        let gray = img.to_luma8();
        Record {
            channels: 1,
            height: gray.height() as i32,
            width: gray.width() as i32,
            data: gray.into_raw(),
            label: 0,
            encoded: false,
        }
    };

    Ok(record)
}

#[cfg(not(feature = "media-decode"))]
fn decode_pixels(full_path: &Path, _opts: &EncodeOptions) -> Result<Record> {
    Err(DatasetError::Encode {
        path: full_path.to_path_buf(),
        reason: "media-decode feature not compiled in".to_string(),
    })
}
