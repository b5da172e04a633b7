//! Typed access to single cells.
//!
//! Every accessor family comes in two shapes: `get_*`/`try_*` return a
//! [`Result`] naming what went wrong, while `fetch_*` collapse any failure
//! into a neutral value (zero, empty string, null pointer). Cells are
//! addressable up to `capacity`, so reserved records can be written before
//! they are counted as valid.

use std::borrow::Cow;
use std::ops::Range;

use super::Table;
use crate::common::{CellHandle, Result, TableError};
use crate::types::{store_symbolic, symbolic_bytes, Complex, ComponentType};

impl Table {
    /// Byte range and type of cell `(record, component)`.
    fn locate(&self, record: usize, component: usize) -> Result<(Range<usize>, ComponentType)> {
        let c = self
            .components
            .get(component)
            .ok_or(TableError::ComponentOutOfRange {
                component,
                dim: self.components.len(),
            })?;
        if record >= self.capacity {
            return Err(TableError::RecordOutOfRange {
                record,
                capacity: self.capacity,
            });
        }
        let start = record * self.record_len + c.offset();
        Ok((start..start + c.size(), c.component_type()))
    }

    /// Like [`Table::locate`], additionally requiring the type to satisfy
    /// `accepts`.
    fn locate_typed(
        &self,
        record: usize,
        component: usize,
        expected: &'static str,
        accepts: fn(&ComponentType) -> bool,
    ) -> Result<(Range<usize>, ComponentType)> {
        let (range, ty) = self.locate(record, component)?;
        if !accepts(&ty) {
            return Err(TableError::TypeMismatch {
                component,
                expected,
                actual: ty,
            });
        }
        Ok((range, ty))
    }

    /// Raw bytes of a cell.
    pub fn try_cell(&self, record: usize, component: usize) -> Result<&[u8]> {
        let (range, _) = self.locate(record, component)?;
        Ok(&self.data[range])
    }

    /// Raw bytes of a cell, or `None` if either index is out of range.
    pub fn cell(&self, record: usize, component: usize) -> Option<&[u8]> {
        self.try_cell(record, component).ok()
    }

    pub fn try_cell_mut(&mut self, record: usize, component: usize) -> Result<&mut [u8]> {
        let (range, _) = self.locate(record, component)?;
        Ok(&mut self.data[range])
    }

    pub fn cell_mut(&mut self, record: usize, component: usize) -> Option<&mut [u8]> {
        self.try_cell_mut(record, component).ok()
    }

    /// Takes a handle on a cell that stays checkable across mutations.
    pub fn handle(&self, record: usize, component: usize) -> Option<CellHandle> {
        self.locate(record, component).ok().map(|_| CellHandle {
            record,
            component,
            generation: self.generation,
        })
    }

    fn check_handle(&self, handle: &CellHandle) -> Result<()> {
        if handle.generation != self.generation {
            return Err(TableError::StaleHandle {
                handle: handle.generation.as_u64(),
                current: self.generation.as_u64(),
            });
        }
        Ok(())
    }

    /// Resolves a handle to the cell bytes. Fails if the buffer was replaced
    /// or the schema changed since the handle was taken.
    pub fn resolve(&self, handle: &CellHandle) -> Result<&[u8]> {
        self.check_handle(handle)?;
        self.try_cell(handle.record, handle.component)
    }

    pub fn resolve_mut(&mut self, handle: &CellHandle) -> Result<&mut [u8]> {
        self.check_handle(handle)?;
        self.try_cell_mut(handle.record, handle.component)
    }

    /// Reads a numeric cell as a complex value.
    pub fn get_complex(&self, record: usize, component: usize) -> Result<Complex> {
        let (range, ty) = self.locate_typed(record, component, "numeric", ComponentType::is_numeric)?;
        match ty {
            ComponentType::Numeric(kind) => Ok(kind.fetch(&self.data[range])),
            _ => Ok(Complex::ZERO),
        }
    }

    /// Reads a numeric cell, returning zero on any failure.
    pub fn fetch_complex(&self, record: usize, component: usize) -> Complex {
        self.get_complex(record, component).unwrap_or(Complex::ZERO)
    }

    /// Writes a numeric cell, clipping to the component's range. The
    /// imaginary part is dropped unless the component is complex.
    pub fn store_complex(&mut self, value: Complex, record: usize, component: usize) -> Result<()> {
        let (range, ty) = self.locate_typed(record, component, "numeric", ComponentType::is_numeric)?;
        if let ComponentType::Numeric(kind) = ty {
            kind.store(value, &mut self.data[range]);
        }
        Ok(())
    }

    pub fn get_real(&self, record: usize, component: usize) -> Result<f64> {
        self.get_complex(record, component).map(|v| v.re)
    }

    /// Real part of a numeric cell, zero on any failure.
    pub fn fetch_real(&self, record: usize, component: usize) -> f64 {
        self.fetch_complex(record, component).re
    }

    pub fn store_real(&mut self, value: f64, record: usize, component: usize) -> Result<()> {
        self.store_complex(Complex::real(value), record, component)
    }

    /// Reads the address stored in a pointer or instance cell.
    pub fn get_pointer(&self, record: usize, component: usize) -> Result<*const ()> {
        let (range, _) = self.locate_typed(record, component, "pointer", ComponentType::is_pointer)?;
        let mut raw = [0u8; std::mem::size_of::<usize>()];
        raw.copy_from_slice(&self.data[range]);
        Ok(usize::from_le_bytes(raw) as *const ())
    }

    /// Stored address, or null on any failure.
    pub fn fetch_pointer(&self, record: usize, component: usize) -> *const () {
        self.get_pointer(record, component).unwrap_or(std::ptr::null())
    }

    /// Stores an address in a pointer or instance cell. The table only
    /// keeps the address; it never dereferences or frees it.
    pub fn store_pointer<T>(&mut self, ptr: *const T, record: usize, component: usize) -> Result<()> {
        let (range, _) = self.locate_typed(record, component, "pointer", ComponentType::is_pointer)?;
        self.data[range].copy_from_slice(&(ptr as usize).to_le_bytes());
        Ok(())
    }

    /// Reads a symbolic cell up to its terminator. Invalid UTF-8 is
    /// replaced.
    pub fn get_string(&self, record: usize, component: usize) -> Result<Cow<'_, str>> {
        let (range, _) = self.locate_typed(record, component, "symbolic", ComponentType::is_symbolic)?;
        Ok(String::from_utf8_lossy(symbolic_bytes(&self.data[range])))
    }

    /// Symbolic cell content, empty on any failure.
    pub fn fetch_string(&self, record: usize, component: usize) -> Cow<'_, str> {
        self.get_string(record, component).unwrap_or(Cow::Borrowed(""))
    }

    /// Writes a symbolic cell. Text longer than the width minus the
    /// terminator is truncated.
    pub fn store_string(&mut self, text: &str, record: usize, component: usize) -> Result<()> {
        let (range, ty) = self.locate_typed(record, component, "symbolic", ComponentType::is_symbolic)?;
        store_symbolic(text, &mut self.data[range], ty.size());
        Ok(())
    }

    /// Renders any cell as text.
    pub fn get_text(&self, record: usize, component: usize) -> Result<String> {
        let (range, ty) = self.locate(record, component)?;
        Ok(ty.format(&self.data[range]))
    }

    pub fn fetch_text(&self, record: usize, component: usize) -> String {
        self.get_text(record, component).unwrap_or_default()
    }

    /// Parses `text` according to the component type and stores it.
    /// Pointer components reject text.
    pub fn store_text(&mut self, text: &str, record: usize, component: usize) -> Result<()> {
        let (range, ty) = self.locate(record, component)?;
        ty.parse(text, &mut self.data[range])
    }
}
