//! Table engine
//!
//! Directory of immutable segment files, one per committed batch,
//! numbered in commit order. A commit is atomic at the granularity of
//! its segment: either the finished, checksummed file exists or the
//! commit failed.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DatasetError, Result};

use super::segment::{SegmentBuilder, SegmentReader};
use super::{create_store_dir, require_store_dir, Engine, Mode};

pub(crate) struct TableEngine {
    dir: PathBuf,
    writable: bool,
    next_segment_id: u64,
}

impl TableEngine {
    pub(crate) fn open(path: &Path, mode: Mode) -> Result<Self> {
        match mode {
            Mode::CreateNew => {
                create_store_dir(path)?;
                Ok(Self {
                    dir: path.to_path_buf(),
                    writable: true,
                    next_segment_id: 1,
                })
            }
            Mode::ReadOnly => {
                require_store_dir(path)?;
                let next_id = discover_segment_ids(path)?
                    .last()
                    .map(|&id| id + 1)
                    .unwrap_or(1);
                Ok(Self {
                    dir: path.to_path_buf(),
                    writable: false,
                    next_segment_id: next_id,
                })
            }
        }
    }
}

impl Engine for TableEngine {
    fn write_batch(&mut self, batch: &[(Vec<u8>, Vec<u8>)]) -> Result<()> {
        if !self.writable {
            return Err(DatasetError::Commit(
                "table store was opened read-only".to_string(),
            ));
        }

        let id = self.next_segment_id;
        let path = segment_path(&self.dir, id);

        let commit = || -> Result<u64> {
            let mut builder = SegmentBuilder::new(&path)?;
            for (key, value) in batch {
                builder.add(key, value)?;
            }
            builder.finish()
        };

        let count = commit().map_err(|e| match e {
            DatasetError::Commit(_) => e,
            other => DatasetError::Commit(format!("segment write failed: {}", other)),
        })?;

        self.next_segment_id += 1;
        debug!(segment = id, entries = count, "wrote segment");
        Ok(())
    }

    fn entries(&mut self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut entries = Vec::new();
        for id in discover_segment_ids(&self.dir)? {
            let reader = SegmentReader::open(&segment_path(&self.dir, id))?;
            entries.extend(reader.into_entries());
        }
        Ok(entries)
    }
}

/// Per-segment entry counts in commit order (verification helper)
pub fn segment_entry_counts(dir: &Path) -> Result<Vec<u64>> {
    require_store_dir(dir)?;

    let mut counts = Vec::new();
    for id in discover_segment_ids(dir)? {
        let reader = SegmentReader::open(&segment_path(dir, id))?;
        counts.push(reader.entry_count());
    }
    Ok(counts)
}

// =============================================================================
// Private Helpers
// =============================================================================

/// Generate the file path for a segment with given ID
fn segment_path(dir: &Path, id: u64) -> PathBuf {
    dir.join(format!("segment_{:06}.seg", id))
}

/// Parse a segment ID from a filename
/// "segment_000042.seg" → Some(42)
fn parse_segment_id(path: &Path) -> Option<u64> {
    if path.extension()?.to_str()? != "seg" {
        return None;
    }
    let name = path.file_stem()?.to_string_lossy();
    name.strip_prefix("segment_")?.parse().ok()
}

/// Discover segment IDs in a store directory, sorted in commit order
fn discover_segment_ids(dir: &Path) -> Result<Vec<u64>> {
    let mut ids = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_path = entry.path();

        if file_path.is_file() {
            if let Some(id) = parse_segment_id(&file_path) {
                ids.push(id);
            }
        }
    }

    ids.sort();
    Ok(ids)
}
