//! The record table: schema management, record storage, cell access and
//! bulk structural operations.
//!
//! A table packs `capacity` records of `record_len` bytes each into one
//! contiguous buffer. Every component occupies a fixed span inside each
//! record, starting at the sum of the sizes of the components before it:
//!
//! ```text
//! record 0: | comp 0 | comp 1 | ... | comp n-1 |
//! record 1: | comp 0 | comp 1 | ... | comp n-1 |
//! ...
//! record capacity-1
//! ```
//!
//! Only the first `valid_records` records hold logical data. The remaining
//! slots are reserved capacity: addressable, but not part of the table's
//! content.
//!
//! # Address stability
//!
//! Operations that replace the record buffer or change the schema bump the
//! table's [`Generation`]. Borrowed cell slices cannot outlive such a call;
//! [`CellHandle`]s taken before it fail to resolve afterwards. Operations
//! that may replace the buffer:
//!
//! - every schema mutation (insert, append, delete, widen components)
//! - `allocate`, `alloc`, `reallocate`, `reset`, `soft_reset`
//! - `add_records` / `insert_records` when capacity is short and growth is
//!   permitted (`increment > 0`); with `increment == 0` they never move data
//! - `copy`, `scopy`, `join`, `cat`, `cat_ex`, `delete_*_from`

mod bulk;
mod cell;
mod component;
mod describe;
mod records;
mod relayout;

use std::fmt;

use bytes::{Bytes, BytesMut};

pub use component::Component;

use crate::common::{Generation, Result, TableError, COMPONENT_CHUNK};

/// Free-form annotations carried alongside the table data.
///
/// They describe the signal the records came from and are copied by
/// `copy` and `dcopy` but survive a `soft_reset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// Five general-purpose numeric descriptors
    pub descr: [f64; 5],
    /// Continuation rate (record period) in milliseconds
    pub rate: f64,
    /// Window length in milliseconds
    pub window: f64,
    /// Time offset of the first record in milliseconds
    pub offset: f64,
    /// Realization description
    pub rtext: Option<String>,
    /// Realization attribute
    pub vrtext: Option<String>,
}

/// A schema-mutable table of fixed-width records.
#[derive(Clone)]
pub struct Table {
    /// Ordered component descriptors
    components: Vec<Component>,
    /// Reserved descriptor slots, grown in batches of `COMPONENT_CHUNK`
    max_components: usize,
    /// Record buffer, exactly `capacity * record_len` bytes
    data: BytesMut,
    /// Sum of all component sizes
    record_len: usize,
    /// Number of logically valid records
    valid: usize,
    /// Number of allocated record slots
    capacity: usize,
    generation: Generation,
    annotations: Annotations,
}

impl Table {
    /// Creates an empty table with no components and no records.
    pub fn new() -> Self {
        Self {
            components: Vec::with_capacity(COMPONENT_CHUNK),
            max_components: COMPONENT_CHUNK,
            data: BytesMut::new(),
            record_len: 0,
            valid: 0,
            capacity: 0,
            generation: Generation::default(),
            annotations: Annotations::default(),
        }
    }

    /// Clears schema and data. Annotations are kept.
    pub fn soft_reset(&mut self) {
        self.components = Vec::with_capacity(COMPONENT_CHUNK);
        self.max_components = COMPONENT_CHUNK;
        self.data = BytesMut::new();
        self.record_len = 0;
        self.valid = 0;
        self.capacity = 0;
        self.bump();
    }

    /// Clears schema, data and annotations.
    pub fn reset(&mut self) {
        self.soft_reset();
        self.annotations = Annotations::default();
    }

    /// Length of one record in bytes.
    pub fn record_len(&self) -> usize {
        self.record_len
    }

    /// Number of allocated record slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of logically valid records.
    pub fn valid_records(&self) -> usize {
        self.valid
    }

    /// Returns true if the table has no components or no valid records.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() || self.valid == 0
    }

    /// Current layout generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    /// Continuation rate of the records.
    pub fn rate(&self) -> f64 {
        self.annotations.rate
    }

    /// Raw bytes of the valid records.
    pub fn records_bytes(&self) -> &[u8] {
        &self.data[..self.valid * self.record_len]
    }

    fn bump(&mut self) {
        self.generation = self.generation.next();
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("components", &self.components)
            .field("record_len", &self.record_len)
            .field("valid", &self.valid)
            .field("capacity", &self.capacity)
            .field("generation", &self.generation)
            .field("annotations", &self.annotations)
            .finish()
    }
}

/// Size in bytes of `records` records of `stride` bytes.
pub(crate) fn buffer_len(records: usize, stride: usize) -> Result<usize> {
    records
        .checked_mul(stride)
        .ok_or(TableError::AllocationFailed(usize::MAX))
}

/// Allocates a zero-filled buffer, reporting allocator failure instead of
/// aborting.
pub(crate) fn zeroed_buffer(len: usize) -> Result<BytesMut> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| TableError::AllocationFailed(len))?;
    buf.resize(len, 0);
    Ok(BytesMut::from(Bytes::from(buf)))
}
