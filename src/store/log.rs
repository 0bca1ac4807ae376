//! Log engine
//!
//! Append-only storage: one CRC-framed log file per store. Every commit
//! appends its batch and fsyncs, so a batch is either fully on disk or
//! detectably torn.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Header (6): Magic "DSKL" (4) | Version (2)  │
//! ├─────────────────────────────────────────────┤
//! │ Entry                                       │
//! │ ┌─────────┬───────────┬───────────┬───────┐ │
//! │ │ CRC (4) │ KeyLen(4) │ ValLen(4) │ K │ V │ │
//! │ └─────────┴───────────┴───────────┴───────┘ │
//! │ ... repeated for each entry ...             │
//! └─────────────────────────────────────────────┘
//! ```
//! CRC covers the length fields, the key and the value.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result};

use super::{create_store_dir, require_store_dir, Engine, Mode};

/// Magic bytes identifying a datasetkv log file
const MAGIC: &[u8; 4] = b"DSKL";

/// Current log format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2)
const HEADER_SIZE: usize = 6;

/// Entry frame header size: CRC (4) + KeyLen (4) + ValLen (4)
const FRAME_HEADER_SIZE: usize = 12;

/// Log file name inside the store directory
const LOG_FILENAME: &str = "data.log";

pub(crate) struct LogEngine {
    log_path: PathBuf,
    /// Open writer when the store was created for writing
    writer: Option<BufWriter<File>>,
}

impl LogEngine {
    pub(crate) fn open(path: &Path, mode: Mode) -> Result<Self> {
        match mode {
            Mode::CreateNew => {
                create_store_dir(path)?;
                let log_path = path.join(LOG_FILENAME);

                let file = OpenOptions::new()
                    .create_new(true)
                    .write(true)
                    .open(&log_path)?;
                let mut writer = BufWriter::new(file);

                writer.write_all(MAGIC)?;
                writer.write_all(&VERSION.to_le_bytes())?;
                writer.flush()?;

                Ok(Self {
                    log_path,
                    writer: Some(writer),
                })
            }
            Mode::ReadOnly => {
                require_store_dir(path)?;
                Ok(Self {
                    log_path: path.join(LOG_FILENAME),
                    writer: None,
                })
            }
        }
    }
}

impl Engine for LogEngine {
    fn write_batch(&mut self, batch: &[(Vec<u8>, Vec<u8>)]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            DatasetError::Commit("log store was opened read-only".to_string())
        })?;

        let commit = |writer: &mut BufWriter<File>| -> std::io::Result<()> {
            for (key, value) in batch {
                let key_len = (key.len() as u32).to_le_bytes();
                let val_len = (value.len() as u32).to_le_bytes();

                let mut hasher = crc32fast::Hasher::new();
                hasher.update(&key_len);
                hasher.update(&val_len);
                hasher.update(key);
                hasher.update(value);

                writer.write_all(&hasher.finalize().to_le_bytes())?;
                writer.write_all(&key_len)?;
                writer.write_all(&val_len)?;
                writer.write_all(key)?;
                writer.write_all(value)?;
            }

            // The batch is durable only once it reaches the disk
            writer.flush()?;
            writer.get_ref().sync_all()
        };

        commit(writer).map_err(|e| DatasetError::Commit(format!("log append failed: {}", e)))
    }

    fn entries(&mut self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let data = fs::read(&self.log_path)?;

        if data.len() < HEADER_SIZE || &data[0..4] != MAGIC {
            return Err(DatasetError::Storage(format!(
                "'{}' is not a datasetkv log file",
                self.log_path.display()
            )));
        }

        let version = u16::from_le_bytes(data[4..6].try_into().unwrap());
        if version != VERSION {
            return Err(DatasetError::Storage(format!(
                "unsupported log version: {}",
                version
            )));
        }

        let mut entries = Vec::new();
        let mut pos = HEADER_SIZE;

        while pos < data.len() {
            if pos + FRAME_HEADER_SIZE > data.len() {
                return Err(DatasetError::Storage("truncated log entry".to_string()));
            }

            let stored_crc = u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap());
            let key_len =
                u32::from_le_bytes(data[pos + 4..pos + 8].try_into().unwrap()) as usize;
            let val_len =
                u32::from_le_bytes(data[pos + 8..pos + 12].try_into().unwrap()) as usize;

            let body_start = pos + FRAME_HEADER_SIZE;
            let body_end = body_start + key_len + val_len;
            if body_end > data.len() {
                return Err(DatasetError::Storage("truncated log entry".to_string()));
            }

            let mut hasher = crc32fast::Hasher::new();
            hasher.update(&data[pos + 4..pos + 12]);
            hasher.update(&data[body_start..body_end]);
            if hasher.finalize() != stored_crc {
                return Err(DatasetError::Storage(format!(
                    "log entry checksum mismatch at offset {}",
                    pos
                )));
            }

            let key = data[body_start..body_start + key_len].to_vec();
            let value = data[body_start + key_len..body_end].to_vec();
            entries.push((key, value));

            pos = body_end;
        }

        Ok(entries)
    }
}
