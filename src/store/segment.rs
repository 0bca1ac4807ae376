//! Segment files for the table engine
//!
//! A segment is one committed batch, written once and immutable after
//! `finish()`.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14)                                             │
//! │   Magic: "DSKS" (4) | Version: u16 (2) | Count: u64 (8) │
//! ├─────────────────────────────────────────────────────────┤
//! │ Data Block (variable)                                   │
//! │   [KeyLen: u32][ValLen: u32][Key][Value]                │
//! │   ... repeated for each entry ...                       │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (4)                                              │
//! │   DataCRC: u32                                          │
//! └─────────────────────────────────────────────────────────┘
//! ```

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{DatasetError, Result};

/// Magic bytes identifying a datasetkv segment file
const MAGIC: &[u8; 4] = b"DSKS";

/// Current segment format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + EntryCount (8)
const HEADER_SIZE: usize = 14;

/// Footer size: DataCRC (4)
const FOOTER_SIZE: usize = 4;

/// Builder for writing one segment from a committed batch
pub(crate) struct SegmentBuilder {
    writer: BufWriter<File>,
    entry_count: u64,
    data_hasher: crc32fast::Hasher,
}

impl SegmentBuilder {
    /// Create a new segment builder.
    ///
    /// Writes the header immediately; call `add()` per entry, then
    /// `finish()` to write the footer and patch the entry count.
    pub(crate) fn new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?; // Placeholder for entry count

        Ok(Self {
            writer,
            entry_count: 0,
            data_hasher: crc32fast::Hasher::new(),
        })
    }

    /// Add a key-value pair in batch order
    pub(crate) fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let key_len_bytes = (key.len() as u32).to_le_bytes();
        let val_len_bytes = (value.len() as u32).to_le_bytes();

        self.writer.write_all(&key_len_bytes)?;
        self.writer.write_all(&val_len_bytes)?;
        self.writer.write_all(key)?;
        self.writer.write_all(value)?;

        self.data_hasher.update(&key_len_bytes);
        self.data_hasher.update(&val_len_bytes);
        self.data_hasher.update(key);
        self.data_hasher.update(value);

        self.entry_count += 1;
        Ok(())
    }

    /// Finish the segment: write footer, patch the entry count, sync
    pub(crate) fn finish(mut self) -> Result<u64> {
        let data_crc = self.data_hasher.finalize();
        self.writer.write_all(&data_crc.to_le_bytes())?;
        self.writer.flush()?;

        let mut file = self
            .writer
            .into_inner()
            .map_err(|e| DatasetError::Storage(format!("failed to flush segment: {}", e)))?;
        file.seek(SeekFrom::Start(6))?; // After magic + version
        file.write_all(&self.entry_count.to_le_bytes())?;
        file.sync_all()?;

        Ok(self.entry_count)
    }
}

/// Reader for one finished segment file
pub(crate) struct SegmentReader {
    entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl SegmentReader {
    /// Open and fully validate a segment: magic, version, declared
    /// entry count, and data checksum.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;

        if data.len() < HEADER_SIZE + FOOTER_SIZE || &data[0..4] != MAGIC {
            return Err(DatasetError::Storage(format!(
                "'{}' is not a datasetkv segment file",
                path.display()
            )));
        }

        let version = u16::from_le_bytes(data[4..6].try_into().unwrap());
        if version != VERSION {
            return Err(DatasetError::Storage(format!(
                "unsupported segment version: {}",
                version
            )));
        }

        let entry_count = u64::from_le_bytes(data[6..14].try_into().unwrap());

        let data_end = data.len() - FOOTER_SIZE;
        let stored_crc = u32::from_le_bytes(data[data_end..].try_into().unwrap());

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&data[HEADER_SIZE..data_end]);
        if hasher.finalize() != stored_crc {
            return Err(DatasetError::Storage(format!(
                "segment checksum mismatch in '{}'",
                path.display()
            )));
        }

        // Parse data block: [key_len(4)][val_len(4)][key][value]
        let mut entries = Vec::with_capacity(entry_count as usize);
        let mut pos = HEADER_SIZE;

        for _ in 0..entry_count {
            if pos + 8 > data_end {
                return Err(DatasetError::Storage("truncated segment entry".to_string()));
            }

            let key_len = u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
            let val_len =
                u32::from_le_bytes(data[pos + 4..pos + 8].try_into().unwrap()) as usize;
            pos += 8;

            if pos + key_len + val_len > data_end {
                return Err(DatasetError::Storage("truncated segment entry".to_string()));
            }

            let key = data[pos..pos + key_len].to_vec();
            let value = data[pos + key_len..pos + key_len + val_len].to_vec();
            pos += key_len + val_len;

            entries.push((key, value));
        }

        if pos != data_end {
            return Err(DatasetError::Storage(format!(
                "segment '{}' has {} trailing bytes",
                path.display(),
                data_end - pos
            )));
        }

        Ok(Self { entries })
    }

    /// Number of entries in this segment
    pub(crate) fn entry_count(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Consume the reader, yielding entries in batch order
    pub(crate) fn into_entries(self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.entries
    }
}
