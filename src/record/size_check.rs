//! Size consistency checker
//!
//! Optional per-store invariant: every record committed to one store
//! carries a data field of the same byte length as the store's first
//! record. Each store gets its own checker instance; state never
//! crosses stores.

use crate::error::{DatasetError, Result};

use super::Record;

/// Stateful size checker for a single store's write pass
#[derive(Debug, Default)]
pub struct SizeChecker {
    /// Byte length fixed by the first record seen
    expected: Option<usize>,
}

impl SizeChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check one record before it is written.
    ///
    /// The first record fixes the expected size; any later divergence
    /// is a [`DatasetError::SizeMismatch`], fatal for the whole run.
    pub fn check(&mut self, key: &str, record: &Record) -> Result<()> {
        match self.expected {
            None => {
                self.expected = Some(record.data.len());
                Ok(())
            }
            Some(expected) if record.data.len() == expected => Ok(()),
            Some(expected) => Err(DatasetError::SizeMismatch {
                key: key.to_string(),
                expected,
                actual: record.data.len(),
            }),
        }
    }

    /// The size fixed by the first record, if any record was seen yet
    pub fn expected(&self) -> Option<usize> {
        self.expected
    }
}
