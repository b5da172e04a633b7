use thiserror::Error;

use crate::types::ComponentType;

/// Table error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("Table has no components")]
    NoComponents,

    #[error("Table has no allocated records")]
    NotAllocated,

    #[error("Invalid type code: {0}")]
    InvalidTypeCode(i32),

    #[error("Unknown type name: {0:?}")]
    UnknownTypeName(String),

    #[error("Invalid symbolic width {0}, expected 1..={max}", max = super::MAX_SYMBOLIC_WIDTH)]
    InvalidSymbolicWidth(usize),

    #[error("Record {record} out of range (capacity {capacity})")]
    RecordOutOfRange { record: usize, capacity: usize },

    #[error("Record {record} is not a valid record ({valid} valid)")]
    InvalidRecord { record: usize, valid: usize },

    #[error("Component {component} out of range (dimension {dim})")]
    ComponentOutOfRange { component: usize, dim: usize },

    #[error("Component {component} has type {actual}, expected a {expected} component")]
    TypeMismatch {
        component: usize,
        expected: &'static str,
        actual: ComponentType,
    },

    #[error("Capacity exhausted: {needed} records needed, {capacity} available")]
    CapacityExhausted { needed: usize, capacity: usize },

    #[error("Allocation of {0} bytes failed")]
    AllocationFailed(usize),

    #[error("Source table is empty")]
    EmptySource,

    #[error("Stale cell handle: generation {handle}, table is at {current}")]
    StaleHandle { handle: u64, current: u64 },

    #[error("Cannot parse {text:?} as {ty}")]
    Parse { text: String, ty: ComponentType },
}

pub type Result<T> = std::result::Result<T, TableError>;
