//! A table shared between threads.
//!
//! [`Table`] itself does no locking. Callers that mutate one table from
//! several threads wrap it in a [`SharedTable`], which serializes every
//! access through one mutex.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::table::Table;

/// Reference-counted handle to a mutex-protected [`Table`].
#[derive(Debug, Clone, Default)]
pub struct SharedTable {
    inner: Arc<Mutex<Table>>,
}

impl SharedTable {
    pub fn new(table: Table) -> Self {
        Self {
            inner: Arc::new(Mutex::new(table)),
        }
    }

    /// Locks the table until the returned guard is dropped.
    pub fn lock(&self) -> MutexGuard<'_, Table> {
        self.inner.lock()
    }

    /// Runs `f` with the table locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut Table) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Returns a copy of the current table state.
    pub fn snapshot(&self) -> Table {
        self.inner.lock().clone()
    }

    /// Unwraps the table if this is the last handle.
    pub fn try_unwrap(self) -> Result<Table, SharedTable> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| SharedTable { inner })
    }
}

impl From<Table> for SharedTable {
    fn from(table: Table) -> Self {
        Self::new(table)
    }
}
