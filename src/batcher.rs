//! Transaction Batcher
//!
//! Accumulates puts against one store and commits them in bounded-size
//! atomic groups.
//!
//! ## State Machine (per store)
//! ```text
//! Idle ──open──▶ TxnOpen ──threshold──▶ commit, fresh TxnOpen ──▶ …
//!                   │
//!                end of input: commit final partial batch ──▶ Closed
//! ```
//! Commit failure is fatal and aborts the run; batches already
//! committed remain durable in the backend.

use tracing::info;

use crate::error::Result;
use crate::store::{Store, Transaction};

/// Buffers puts into an open transaction and commits every
/// `batch_size` puts; the final partial batch is committed by
/// [`Batcher::finish`]. Empty batches are never committed.
pub struct Batcher {
    /// Store name used in progress logs ("payload", "label")
    name: &'static str,
    store: Store,
    txn: Transaction,
    batch_size: usize,
    committed: usize,
}

impl Batcher {
    pub fn new(name: &'static str, store: Store, batch_size: usize) -> Self {
        debug_assert!(batch_size > 0);
        let txn = store.new_transaction();
        Self {
            name,
            store,
            txn,
            batch_size,
            committed: 0,
        }
    }

    /// Buffer one put; commits and reopens the transaction when the
    /// batch threshold is reached.
    pub fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.txn.put(key.as_bytes(), value);

        if self.txn.pending() >= self.batch_size {
            self.commit_and_reopen()?;
        }

        Ok(())
    }

    /// Rows committed so far
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Commit the final partial batch, if any, and close the batcher.
    ///
    /// Returns the total number of rows committed and the underlying
    /// store (for post-run inspection).
    pub fn finish(mut self) -> Result<(usize, Store)> {
        if self.txn.pending() > 0 {
            self.commit_and_reopen()?;
        }
        Ok((self.committed, self.store))
    }

    fn commit_and_reopen(&mut self) -> Result<()> {
        let committed = self.store.commit(&mut self.txn)?;
        self.committed += committed;
        info!(store = self.name, processed = self.committed, "processed rows");

        self.txn = self.store.new_transaction();
        Ok(())
    }
}
