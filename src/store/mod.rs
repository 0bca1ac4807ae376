//! Store Module
//!
//! Pluggable transactional key-value backend for the two output stores.
//!
//! ## Responsibilities
//! - Create-new open semantics (a destination path must not pre-exist)
//! - Buffered transactional puts, committed atomically as a unit
//! - Read-only open for verification of finished stores
//! - Two interchangeable engines selected by name
//!
//! ## Engines
//! ```text
//!                  ┌──────────────────┐
//!                  │      Store       │
//!                  │ (dyn Engine box) │
//!                  └────────┬─────────┘
//!            ┌──────────────┴──────────────┐
//!            ▼                             ▼
//!   ┌─────────────────┐          ┌──────────────────┐
//!   │   log engine    │          │   table engine   │
//!   │  one append-    │          │  one sorted      │
//!   │  only CRC log   │          │  segment file    │
//!   │  per store      │          │  per commit      │
//!   └─────────────────┘          └──────────────────┘
//! ```

mod log;
mod segment;
mod table;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{DatasetError, Result};

use self::log::LogEngine;
use self::table::TableEngine;

pub use self::table::segment_entry_counts;

// =============================================================================
// Backend Selection
// =============================================================================

/// Which storage engine backs a store, selected by name on the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Append-only log file per store
    Log,

    /// One sorted segment file per committed batch
    Table,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Log => "log",
            BackendKind::Table => "table",
        }
    }
}

impl FromStr for BackendKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "log" => Ok(BackendKind::Log),
            "table" => Ok(BackendKind::Table),
            other => Err(DatasetError::Config(format!(
                "unknown backend '{}' (expected 'log' or 'table')",
                other
            ))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Open mode for a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Create a fresh store; fails if the path already exists
    CreateNew,

    /// Open an existing store for reading only
    ReadOnly,
}

// =============================================================================
// Engine Contract
// =============================================================================

/// Contract shared by both storage engines.
///
/// `write_batch` must make the whole batch durable atomically; a failure
/// is a commit failure and propagates, never gets swallowed.
pub(crate) trait Engine {
    fn write_batch(&mut self, batch: &[(Vec<u8>, Vec<u8>)]) -> Result<()>;

    /// All entries in commit/insertion order (read-only verification path)
    fn entries(&mut self) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}

// =============================================================================
// Store Facade
// =============================================================================

/// A single key-value store bound to one destination path
pub struct Store {
    path: PathBuf,
    mode: Mode,
    engine: Box<dyn Engine>,
}

impl Store {
    /// Open a store.
    ///
    /// `Mode::CreateNew` fails with [`DatasetError::BackendOpen`] when the
    /// destination path already exists; there is no overwrite and no
    /// append. `Mode::ReadOnly` fails when the path holds no store.
    pub fn open(kind: BackendKind, path: &Path, mode: Mode) -> Result<Self> {
        let engine: Box<dyn Engine> = match kind {
            BackendKind::Log => Box::new(LogEngine::open(path, mode)?),
            BackendKind::Table => Box::new(TableEngine::open(path, mode)?),
        };

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            engine,
        })
    }

    /// Start a new transaction (buffered puts, nothing touches disk yet)
    pub fn new_transaction(&self) -> Transaction {
        Transaction::new()
    }

    /// Commit a transaction: write all buffered puts durably and
    /// atomically, then leave the transaction empty.
    ///
    /// Returns the number of puts committed. Committing an empty
    /// transaction is a no-op.
    pub fn commit(&mut self, txn: &mut Transaction) -> Result<usize> {
        if self.mode == Mode::ReadOnly {
            return Err(DatasetError::Storage(format!(
                "store at '{}' is read-only",
                self.path.display()
            )));
        }

        let batch = txn.take();
        if batch.is_empty() {
            return Ok(0);
        }

        self.engine.write_batch(&batch)?;
        Ok(batch.len())
    }

    /// All committed entries in commit/insertion order
    pub fn entries(&mut self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.engine.entries()
    }

    /// Destination path of this store
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// An in-flight group of pending puts bound to one store
#[derive(Debug, Default)]
pub struct Transaction {
    pending: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Transaction {
    fn new() -> Self {
        Self::default()
    }

    /// Buffer one put into this transaction
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.pending.push((key.into(), value.into()));
    }

    /// Number of buffered puts
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn take(&mut self) -> Vec<(Vec<u8>, Vec<u8>)> {
        std::mem::take(&mut self.pending)
    }
}

/// Read every entry of a finished store (verification convenience)
pub fn read_all(kind: BackendKind, path: &Path) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut store = Store::open(kind, path, Mode::ReadOnly)?;
    store.entries()
}

// =============================================================================
// Shared Path Helpers
// =============================================================================

/// Create the store directory, enforcing create-new semantics
pub(crate) fn create_store_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|e| {
        let reason = if e.kind() == std::io::ErrorKind::AlreadyExists {
            "path already exists".to_string()
        } else {
            e.to_string()
        };
        DatasetError::BackendOpen {
            path: path.to_path_buf(),
            reason,
        }
    })
}

/// Validate that a store directory exists for read-only open
pub(crate) fn require_store_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(DatasetError::BackendOpen {
            path: path.to_path_buf(),
            reason: "no store at path".to_string(),
        })
    }
}
