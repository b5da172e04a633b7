//! dtable - A schema-mutable in-memory record table
//!
//! This crate stores records of fixed-width, typed components (columns) in
//! one contiguous byte buffer. Unlike a fixed struct array, the schema can
//! change at any time: components are inserted or deleted while the table
//! holds data, and every record is relaid out so stored values survive.
//!
//! # Architecture
//!
//! - **Types** (`types`): component types and their bit-level encoding
//!   - `ComponentType`: numeric, fixed-width symbolic, pointer and instance
//!   - `Complex`: the common value every numeric cell converts through
//!
//! - **Table** (`table`): the engine
//!   - schema management (`insert_components`, `delete_components`, ...)
//!   - record storage (`allocate`, `reallocate`, `add_records`, ...)
//!   - typed cell access (`store_real`, `fetch_string`, `resolve`, ...)
//!   - bulk operations (`copy`, `join`, `cat_ex`)
//!
//! - **Legacy** (`legacy`): integer status codes for older callers
//!
//! - **Shared** (`shared`): a mutex-guarded table for multi-threaded use
//!
//! # Example
//!
//! ```rust
//! use dtable::{ComponentType, Table};
//!
//! let mut table = Table::new();
//! table.append_component("a", ComponentType::I32).unwrap();
//! table.append_component("b", ComponentType::symbolic(8).unwrap()).unwrap();
//! table.allocate(3).unwrap();
//!
//! table.store_real(5.0, 0, 0).unwrap();
//! table.store_string("hi", 0, 1).unwrap();
//!
//! // Insert a component between the two; existing values are kept
//! table.insert_component("c", ComponentType::F64, 1).unwrap();
//! assert_eq!(table.record_len(), 20);
//! assert_eq!(table.fetch_real(0, 0), 5.0);
//! assert_eq!(table.fetch_real(0, 1), 0.0);
//! assert_eq!(table.fetch_string(0, 2), "hi");
//! ```

pub mod common;
pub mod legacy;
pub mod shared;
pub mod table;
pub mod types;

// Re-export commonly used types at the crate root
pub use common::{BulkStatus, CellHandle, Generation, Result, TableError};
pub use shared::SharedTable;
pub use table::{Annotations, Component, Table};
pub use types::{Complex, ComponentType, NumericKind};
