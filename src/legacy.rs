//! Integer status codes for callers built around the classic table API.
//!
//! The typed API reports failures through [`TableError`](crate::TableError).
//! Code that still expects `O_K`/`NOT_EXEC`/`ERR_TRUNCATE` style returns can
//! collapse any result with [`LegacyStatus::status`]:
//!
//! ```
//! use dtable::legacy::{LegacyStatus, NOT_EXEC, OK};
//! use dtable::{ComponentType, Table};
//!
//! let mut table = Table::new();
//! assert_eq!(table.allocate(4).status(), NOT_EXEC);
//! table.append_component("x", ComponentType::F64).unwrap();
//! assert_eq!(table.allocate(4).status(), OK);
//! ```

use crate::common::{BulkStatus, Result};

/// Operation succeeded
pub const OK: i16 = 0;

/// Operation was not executed
pub const NOT_EXEC: i16 = -1;

/// Operation completed but dropped data
pub const ERR_TRUNCATE: i16 = -2;

/// Record index returned when an append or insert fails
pub const NO_RECORD: i64 = -1;

/// Collapses a result into a legacy status code.
pub trait LegacyStatus {
    fn status(&self) -> i16;
}

impl LegacyStatus for Result<()> {
    fn status(&self) -> i16 {
        match self {
            Ok(()) => OK,
            Err(_) => NOT_EXEC,
        }
    }
}

impl LegacyStatus for Result<BulkStatus> {
    fn status(&self) -> i16 {
        match self {
            Ok(BulkStatus::Complete) => OK,
            Ok(BulkStatus::Truncated) => ERR_TRUNCATE,
            Err(_) => NOT_EXEC,
        }
    }
}

impl LegacyStatus for BulkStatus {
    fn status(&self) -> i16 {
        match self {
            BulkStatus::Complete => OK,
            BulkStatus::Truncated => ERR_TRUNCATE,
        }
    }
}

/// Collapses a record-index result, as returned by `add_records` and
/// `insert_records`, into the index or [`NO_RECORD`].
pub fn record_index(result: Result<usize>) -> i64 {
    match result {
        Ok(index) => i64::try_from(index).unwrap_or(NO_RECORD),
        Err(_) => NO_RECORD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::TableError;

    #[test]
    fn test_unit_results() {
        assert_eq!(Ok::<(), TableError>(()).status(), OK);
        assert_eq!(Err::<(), _>(TableError::NotAllocated).status(), NOT_EXEC);
    }

    #[test]
    fn test_bulk_results() {
        assert_eq!(Ok::<_, TableError>(BulkStatus::Complete).status(), OK);
        assert_eq!(Ok::<_, TableError>(BulkStatus::Truncated).status(), ERR_TRUNCATE);
        assert_eq!(Err::<BulkStatus, _>(TableError::EmptySource).status(), NOT_EXEC);
        assert_eq!(BulkStatus::Truncated.status(), ERR_TRUNCATE);
    }

    #[test]
    fn test_record_index() {
        assert_eq!(record_index(Ok(7)), 7);
        assert_eq!(
            record_index(Err(TableError::CapacityExhausted { needed: 2, capacity: 1 })),
            NO_RECORD
        );
    }
}
