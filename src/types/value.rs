use std::fmt;

use super::{ComponentType, NumericKind};
use crate::common::{Result, TableError};

/// Complex number, the widest numeric value a cell can hold.
/// Real-valued cells read back with a zero imaginary part.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };

    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Complex::real(re)
    }
}

impl From<i32> for Complex {
    fn from(re: i32) -> Self {
        Complex::real(re as f64)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.im == 0.0 {
            return write!(f, "{}", self.re);
        }
        if self.im.is_sign_negative() {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

/// Clips a double to the finite range of f64, keeping NaN.
fn clip_f64(v: f64) -> f64 {
    v.clamp(f64::MIN, f64::MAX)
}

impl NumericKind {
    /// Writes `value` into the first `self.size()` bytes of `out`.
    /// Values outside the target range are clipped; NaN stores as zero for
    /// integer kinds. Only `Complex` keeps the imaginary part.
    pub fn store(&self, value: Complex, out: &mut [u8]) {
        let re = value.re;
        match self {
            NumericKind::Bool => out[0] = (re.clamp(0.0, 1.0) as i8) as u8,
            NumericKind::U8 => out[0] = re as u8,
            NumericKind::I8 => out[0] = (re as i8) as u8,
            NumericKind::U16 => out[..2].copy_from_slice(&(re as u16).to_le_bytes()),
            NumericKind::I16 => out[..2].copy_from_slice(&(re as i16).to_le_bytes()),
            NumericKind::U32 => out[..4].copy_from_slice(&(re as u32).to_le_bytes()),
            NumericKind::I32 => out[..4].copy_from_slice(&(re as i32).to_le_bytes()),
            NumericKind::U64 => out[..8].copy_from_slice(&(re as u64).to_le_bytes()),
            NumericKind::I64 => out[..8].copy_from_slice(&(re as i64).to_le_bytes()),
            NumericKind::F32 => {
                let v = re.clamp(-(f32::MAX as f64), f32::MAX as f64) as f32;
                out[..4].copy_from_slice(&v.to_le_bytes());
            }
            NumericKind::F64 => out[..8].copy_from_slice(&clip_f64(re).to_le_bytes()),
            NumericKind::Complex => {
                out[..8].copy_from_slice(&clip_f64(re).to_le_bytes());
                out[8..16].copy_from_slice(&clip_f64(value.im).to_le_bytes());
            }
        }
    }

    /// Reads a value of this kind from the first `self.size()` bytes.
    pub fn fetch(&self, bytes: &[u8]) -> Complex {
        let re = match self {
            NumericKind::Bool => bytes[0] as i8 as f64,
            NumericKind::U8 => bytes[0] as f64,
            NumericKind::I8 => bytes[0] as i8 as f64,
            NumericKind::U16 => u16::from_le_bytes(array(bytes)) as f64,
            NumericKind::I16 => i16::from_le_bytes(array(bytes)) as f64,
            NumericKind::U32 => u32::from_le_bytes(array(bytes)) as f64,
            NumericKind::I32 => i32::from_le_bytes(array(bytes)) as f64,
            NumericKind::U64 => u64::from_le_bytes(array(bytes)) as f64,
            NumericKind::I64 => i64::from_le_bytes(array(bytes)) as f64,
            NumericKind::F32 => f32::from_le_bytes(array(bytes)) as f64,
            NumericKind::F64 => f64::from_le_bytes(array(bytes)),
            NumericKind::Complex => {
                return Complex::new(
                    f64::from_le_bytes(array(bytes)),
                    f64::from_le_bytes(array(&bytes[8..])),
                )
            }
        };
        Complex::real(re)
    }

    /// Formats the value in `bytes` exactly; 64-bit integers are not routed
    /// through f64.
    fn format(&self, bytes: &[u8]) -> String {
        match self {
            NumericKind::U64 => u64::from_le_bytes(array(bytes)).to_string(),
            NumericKind::I64 => i64::from_le_bytes(array(bytes)).to_string(),
            NumericKind::F32 => f32::from_le_bytes(array(bytes)).to_string(),
            _ => self.fetch(bytes).to_string(),
        }
    }
}

/// Parses "re", "re+imi", "re-imi", "imi" or "(re,im)".
pub fn parse_complex(text: &str) -> Option<Complex> {
    let s = text.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        let (re, im) = inner.split_once(',')?;
        return Some(Complex::new(re.trim().parse().ok()?, im.trim().parse().ok()?));
    }

    let Some(body) = s.strip_suffix('i') else {
        return s.parse().ok().map(Complex::real);
    };

    // Split before the last sign that is not an exponent sign
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| (bytes[i] == b'+' || bytes[i] == b'-') && !matches!(bytes[i - 1], b'e' | b'E'));

    let imag = |s: &str| -> Option<f64> {
        match s {
            "" | "+" => Some(1.0),
            "-" => Some(-1.0),
            _ => s.parse().ok(),
        }
    };

    match split {
        Some(i) => Some(Complex::new(body[..i].parse().ok()?, imag(&body[i..])?)),
        None => Some(Complex::new(0.0, imag(body)?)),
    }
}

/// Writes `text` into a symbolic cell of `width` bytes: at most `width - 1`
/// bytes of text (cut at a character boundary), NUL-terminated.
pub(crate) fn store_symbolic(text: &str, out: &mut [u8], width: usize) {
    let mut len = text.len().min(width.saturating_sub(1));
    while !text.is_char_boundary(len) {
        len -= 1;
    }
    out[..len].copy_from_slice(&text.as_bytes()[..len]);
    out[len..width].fill(0);
}

/// Returns the bytes of a symbolic cell up to its first NUL.
pub(crate) fn symbolic_bytes(cell: &[u8]) -> &[u8] {
    let end = cell.iter().position(|&b| b == 0).unwrap_or(cell.len());
    &cell[..end]
}

impl ComponentType {
    /// Renders a cell of this type as text.
    pub fn format(&self, cell: &[u8]) -> String {
        match self {
            ComponentType::Numeric(kind) => kind.format(cell),
            ComponentType::Symbolic(_) => String::from_utf8_lossy(symbolic_bytes(cell)).into_owned(),
            ComponentType::Pointer | ComponentType::Instance => {
                format!("{:#x}", usize::from_le_bytes(array(cell)))
            }
        }
    }

    /// Parses `text` and writes it into a cell of this type.
    pub fn parse(&self, text: &str, cell: &mut [u8]) -> Result<()> {
        let parse_error = || TableError::Parse {
            text: text.to_string(),
            ty: *self,
        };
        match self {
            ComponentType::Numeric(kind) => {
                let trimmed = text.trim();
                match kind {
                    // Keep full 64-bit precision for integer text
                    NumericKind::U64 => {
                        if let Ok(v) = trimmed.parse::<u64>() {
                            cell[..8].copy_from_slice(&v.to_le_bytes());
                            return Ok(());
                        }
                    }
                    NumericKind::I64 => {
                        if let Ok(v) = trimmed.parse::<i64>() {
                            cell[..8].copy_from_slice(&v.to_le_bytes());
                            return Ok(());
                        }
                    }
                    _ => {}
                }
                let value = parse_complex(trimmed).ok_or_else(parse_error)?;
                kind.store(value, cell);
                Ok(())
            }
            ComponentType::Symbolic(width) => {
                store_symbolic(text, cell, *width as usize);
                Ok(())
            }
            ComponentType::Pointer | ComponentType::Instance => Err(parse_error()),
        }
    }
}
