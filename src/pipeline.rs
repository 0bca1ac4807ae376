//! Pipeline Module
//!
//! The conversion run: manifest → optional shuffle → per-row encoding →
//! batched commits into the payload and label stores.
//!
//! ## Alignment
//! Both stores are driven from one row loop. A row's payload encode is
//! attempted first; only on success does the row get a key, a payload
//! put and a label put, and both batchers commit on the same cadence.
//! A failed encode withholds the row from both stores, so the two
//! stores always describe the same sample set under the same keys.

use tracing::{debug, info, warn};

use crate::batcher::Batcher;
use crate::config::Config;
use crate::error::{DatasetError, Result};
use crate::manifest::{self, ManifestEntry};
use crate::record::{self, key, label, media, EncodeOptions, SizeChecker};
use crate::store::{Mode, Store};

/// Outcome of a completed conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows in the manifest
    pub rows_total: usize,

    /// Rows written to both stores
    pub rows_written: usize,

    /// Rows skipped because their payload could not be encoded
    pub rows_skipped: usize,
}

/// One-shot conversion pipeline
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute the conversion.
    ///
    /// Fatal conditions (missing decode capability, destination exists,
    /// commit failure, size mismatch under `check_size`) are returned as
    /// errors; per-row encode failures are logged and skipped.
    pub fn run(&self) -> Result<RunSummary> {
        let config = &self.config;

        // The decode capability is a build-time dependency; refuse to
        // run before either store is touched.
        media::ensure_decode_available()?;

        if !config.encode_type.is_empty() && !config.encoded {
            info!("encode type specified, assuming pre-encoded payloads");
        }

        let mut entries = manifest::parse_file(&config.manifest_path)?;
        if let Some(first) = entries.first() {
            debug!(
                path = %first.path,
                primary = first.labels.primary,
                composite = first.labels.composite,
                "first manifest row"
            );
        }
        info!(rows = entries.len(), "parsed manifest");

        if config.shuffle {
            info!("shuffling row order");
            let mut rng = manifest::rng_from_seed(config.shuffle_seed);
            manifest::shuffle_entries(&mut entries, &mut rng);
        }

        let payload_store = Store::open(config.backend, &config.payload_db, Mode::CreateNew)?;
        let label_store = Store::open(config.backend, &config.label_db, Mode::CreateNew)?;

        let mut payload_batcher = Batcher::new("payload", payload_store, config.batch_size);
        let mut label_batcher = Batcher::new("label", label_store, config.batch_size);

        let mut payload_sizes = config.check_size.then(SizeChecker::new);
        let mut label_sizes = config.check_size.then(SizeChecker::new);

        let opts = EncodeOptions::from_config(config);
        let mut written = 0;
        let mut skipped = 0;

        for (index, entry) in entries.iter().enumerate() {
            let payload = match self.encode_row(entry, &opts) {
                Some(record) => record?,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let labels = label::label_record(&entry.labels);

            // One key per surviving row, shared by both stores. Skipped
            // rows keep their index, leaving gaps in the key space.
            let row_key = key::row_key(index, &entry.path);

            if let Some(checker) = payload_sizes.as_mut() {
                checker.check(&row_key, &payload)?;
            }
            if let Some(checker) = label_sizes.as_mut() {
                checker.check(&row_key, &labels)?;
            }

            payload_batcher.put(&row_key, &payload.to_bytes()?)?;
            label_batcher.put(&row_key, &labels.to_bytes()?)?;
            written += 1;
        }

        let (payload_rows, _) = payload_batcher.finish()?;
        let (label_rows, _) = label_batcher.finish()?;
        debug_assert_eq!(payload_rows, label_rows);

        let summary = RunSummary {
            rows_total: entries.len(),
            rows_written: written,
            rows_skipped: skipped,
        };
        info!(
            total = summary.rows_total,
            written = summary.rows_written,
            skipped = summary.rows_skipped,
            "conversion complete"
        );

        Ok(summary)
    }

    /// Encode one row's payload.
    ///
    /// `None` is the skip signal: the row's source file was unreadable
    /// or undecodable, which excludes the row from both stores. Any
    /// other error is fatal and propagates.
    fn encode_row(
        &self,
        entry: &ManifestEntry,
        opts: &EncodeOptions,
    ) -> Option<Result<record::Record>> {
        match media::encode_file(&self.config.root_folder, &entry.path, opts) {
            Ok(record) => Some(Ok(record)),
            Err(DatasetError::Encode { path, reason }) => {
                warn!(path = %path.display(), reason, "skipping row");
                None
            }
            Err(other) => Some(Err(other)),
        }
    }
}
