//! Component type system: type codes, sizes, classification, bit-level
//! cell access and text conversion.

mod data_type;
mod value;

pub use data_type::{ComponentType, NumericKind};
pub use value::{parse_complex, Complex};

pub(crate) use value::{store_symbolic, symbolic_bytes};
