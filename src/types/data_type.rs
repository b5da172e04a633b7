use std::fmt;

use crate::common::{Result, TableError, MAX_SYMBOLIC_WIDTH};

/// Numeric cell representations.
/// Every numeric kind reads back as a complex number; only `Complex`
/// stores the imaginary part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    /// Boolean: 1 byte, stored values are clipped to 0 or 1
    Bool,

    /// Unsigned 8-bit integer
    U8,

    /// Signed 8-bit integer
    I8,

    /// Unsigned 16-bit integer
    U16,

    /// Signed 16-bit integer
    I16,

    /// Unsigned 32-bit integer
    U32,

    /// Signed 32-bit integer
    I32,

    /// Unsigned 64-bit integer
    U64,

    /// Signed 64-bit integer
    I64,

    /// 32-bit floating point, IEEE 754
    F32,

    /// 64-bit floating point, IEEE 754
    F64,

    /// Complex number: two 64-bit floats (real, imaginary), 16 bytes
    Complex,
}

impl NumericKind {
    /// All numeric kinds in legacy type-table order.
    pub const ALL: [NumericKind; 12] = [
        NumericKind::Bool,
        NumericKind::U8,
        NumericKind::I8,
        NumericKind::U16,
        NumericKind::I16,
        NumericKind::U32,
        NumericKind::I32,
        NumericKind::U64,
        NumericKind::I64,
        NumericKind::F32,
        NumericKind::F64,
        NumericKind::Complex,
    ];

    /// Returns the size of one cell of this kind in bytes.
    pub fn size(&self) -> usize {
        match self {
            NumericKind::Bool | NumericKind::U8 | NumericKind::I8 => 1,
            NumericKind::U16 | NumericKind::I16 => 2,
            NumericKind::U32 | NumericKind::I32 | NumericKind::F32 => 4,
            NumericKind::U64 | NumericKind::I64 | NumericKind::F64 => 8,
            NumericKind::Complex => 16,
        }
    }

    pub fn is_integer(&self) -> bool {
        !matches!(
            self,
            NumericKind::Bool | NumericKind::F32 | NumericKind::F64 | NumericKind::Complex
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(
            self,
            NumericKind::F32 | NumericKind::F64 | NumericKind::Complex
        )
    }

    /// Legacy integer type code.
    pub fn code(&self) -> i16 {
        match self {
            NumericKind::Bool => 1000,
            NumericKind::U8 => 1001,
            NumericKind::I8 => 2001,
            NumericKind::U16 => 1002,
            NumericKind::I16 => 2002,
            NumericKind::U32 => 1004,
            NumericKind::I32 => 2004,
            NumericKind::U64 => 1008,
            NumericKind::I64 => 2008,
            NumericKind::F32 => 3004,
            NumericKind::F64 => 3008,
            NumericKind::Complex => 3009,
        }
    }

    /// Type name, e.g. "unsigned short".
    pub fn name(&self) -> &'static str {
        match self {
            NumericKind::Bool => "bool",
            NumericKind::U8 => "unsigned char",
            NumericKind::I8 => "char",
            NumericKind::U16 => "unsigned short",
            NumericKind::I16 => "short",
            NumericKind::U32 => "unsigned int",
            NumericKind::I32 => "int",
            NumericKind::U64 => "unsigned long",
            NumericKind::I64 => "long",
            NumericKind::F32 => "float",
            NumericKind::F64 => "double",
            NumericKind::Complex => "complex",
        }
    }

    /// Fixed-width alias of the type name, e.g. "UINT16".
    pub fn alias(&self) -> &'static str {
        match self {
            NumericKind::Bool => "BOOL",
            NumericKind::U8 => "UINT8",
            NumericKind::I8 => "INT8",
            NumericKind::U16 => "UINT16",
            NumericKind::I16 => "INT16",
            NumericKind::U32 => "UINT32",
            NumericKind::I32 => "INT32",
            NumericKind::U64 => "UINT64",
            NumericKind::I64 => "INT64",
            NumericKind::F32 => "FLOAT32",
            NumericKind::F64 => "FLOAT64",
            NumericKind::Complex => "COMPLEX64",
        }
    }
}

/// The type of a table component.
///
/// Symbolic components are fixed-width, NUL-terminated character arrays whose
/// width is part of the type. Pointer and instance components hold opaque
/// addresses the table never dereferences or frees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Numeric(NumericKind),
    Symbolic(u16),
    Pointer,
    Instance,
}

impl ComponentType {
    pub const BOOL: ComponentType = ComponentType::Numeric(NumericKind::Bool);
    pub const U8: ComponentType = ComponentType::Numeric(NumericKind::U8);
    pub const I8: ComponentType = ComponentType::Numeric(NumericKind::I8);
    pub const U16: ComponentType = ComponentType::Numeric(NumericKind::U16);
    pub const I16: ComponentType = ComponentType::Numeric(NumericKind::I16);
    pub const U32: ComponentType = ComponentType::Numeric(NumericKind::U32);
    pub const I32: ComponentType = ComponentType::Numeric(NumericKind::I32);
    pub const U64: ComponentType = ComponentType::Numeric(NumericKind::U64);
    pub const I64: ComponentType = ComponentType::Numeric(NumericKind::I64);
    pub const F32: ComponentType = ComponentType::Numeric(NumericKind::F32);
    pub const F64: ComponentType = ComponentType::Numeric(NumericKind::F64);
    pub const COMPLEX: ComponentType = ComponentType::Numeric(NumericKind::Complex);

    /// Creates a symbolic type of the given width, including the terminator.
    pub fn symbolic(width: usize) -> Result<Self> {
        if width == 0 || width > MAX_SYMBOLIC_WIDTH {
            return Err(TableError::InvalidSymbolicWidth(width));
        }
        Ok(ComponentType::Symbolic(width as u16))
    }

    /// Returns the size of one cell of this type in bytes.
    pub fn size(&self) -> usize {
        match self {
            ComponentType::Numeric(kind) => kind.size(),
            ComponentType::Symbolic(width) => *width as usize,
            ComponentType::Pointer | ComponentType::Instance => std::mem::size_of::<usize>(),
        }
    }

    /// Checks that a symbolic width is inside the legal range.
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            ComponentType::Symbolic(width) => {
                let width = *width as usize;
                if width == 0 || width > MAX_SYMBOLIC_WIDTH {
                    return Err(TableError::InvalidSymbolicWidth(width));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ComponentType::Numeric(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, ComponentType::Numeric(k) if k.is_integer())
    }

    pub fn is_float(&self) -> bool {
        matches!(self, ComponentType::Numeric(k) if k.is_float())
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, ComponentType::Numeric(NumericKind::Complex))
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, ComponentType::Symbolic(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, ComponentType::Pointer | ComponentType::Instance)
    }

    /// Returns the width of a symbolic type, or None for other types.
    pub fn symbolic_width(&self) -> Option<usize> {
        match self {
            ComponentType::Symbolic(width) => Some(*width as usize),
            _ => None,
        }
    }

    /// Returns the legacy integer type code. Symbolic types encode their width.
    pub fn code(&self) -> i16 {
        match self {
            ComponentType::Numeric(kind) => kind.code(),
            ComponentType::Symbolic(width) => *width as i16,
            ComponentType::Pointer => 6000,
            ComponentType::Instance => 6002,
        }
    }

    /// Decodes a legacy integer type code.
    pub fn from_code(code: i32) -> Result<Self> {
        if code > 0 && code as usize <= MAX_SYMBOLIC_WIDTH {
            return Ok(ComponentType::Symbolic(code as u16));
        }
        match code {
            6000 => Ok(ComponentType::Pointer),
            6002 => Ok(ComponentType::Instance),
            _ => NumericKind::ALL
                .iter()
                .find(|kind| kind.code() as i32 == code)
                .map(|kind| ComponentType::Numeric(*kind))
                .ok_or(TableError::InvalidTypeCode(code)),
        }
    }

    /// Resolves a type name. Accepts type names ("double"), fixed-width
    /// aliases ("FLOAT64"), `char[N]` and bare widths ("16").
    pub fn from_name(name: &str) -> Result<Self> {
        let name = name.trim();
        let width = name
            .strip_prefix("char[")
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(name);
        if let Ok(width) = width.parse::<usize>() {
            return Self::symbolic(width);
        }

        match name {
            "void*" | "pointer" => return Ok(ComponentType::Pointer),
            "object" | "instance" => return Ok(ComponentType::Instance),
            _ => {}
        }

        NumericKind::ALL
            .iter()
            .find(|kind| kind.name() == name || kind.alias() == name)
            .map(|kind| ComponentType::Numeric(*kind))
            .ok_or_else(|| TableError::UnknownTypeName(name.to_string()))
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentType::Numeric(kind) => write!(f, "{}", kind.name()),
            ComponentType::Symbolic(width) => write!(f, "char[{}]", width),
            ComponentType::Pointer => write!(f, "void*"),
            ComponentType::Instance => write!(f, "object"),
        }
    }
}
