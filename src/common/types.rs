use std::fmt;

/// Outcome of a bulk operation that completed.
///
/// `Truncated` means the operation finished but had to drop data because the
/// shapes of the two tables did not match. Callers may treat it as a warning.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkStatus {
    Complete,
    Truncated,
}

impl BulkStatus {
    pub fn is_truncated(&self) -> bool {
        matches!(self, BulkStatus::Truncated)
    }
}

/// Generation of a table's buffer layout.
///
/// Bumped whenever the record buffer is replaced or the schema changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

impl Generation {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generation({})", self.0)
    }
}

/// Index-based handle to one cell, tied to the layout generation it was
/// taken from. Resolving it after the layout changed fails instead of
/// reading moved memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle {
    pub record: usize,
    pub component: usize,
    pub generation: Generation,
}
