use std::iter;

use log::debug;

use super::{relayout, Table};
use crate::common::{Result, TableError, COMPONENT_CHUNK, MAX_COMPONENT_NAME_LEN};
use crate::types::ComponentType;

/// Describes one component (column) of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component name, at most `MAX_COMPONENT_NAME_LEN` bytes
    name: String,

    /// Component type
    ty: ComponentType,

    /// Byte offset of the component inside a record
    offset: usize,
}

impl Component {
    fn new(name: &str, ty: ComponentType) -> Self {
        Self {
            name: bounded_name(name),
            ty,
            offset: 0, // Set by Table::recompute_offsets
        }
    }

    /// Returns the component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the component type.
    pub fn component_type(&self) -> ComponentType {
        self.ty
    }

    /// Returns the size of one cell in bytes.
    pub fn size(&self) -> usize {
        self.ty.size()
    }

    /// Returns the byte offset of the component inside a record.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Cuts a name to `MAX_COMPONENT_NAME_LEN` bytes at a character boundary.
fn bounded_name(name: &str) -> String {
    let mut len = name.len().min(MAX_COMPONENT_NAME_LEN);
    while !name.is_char_boundary(len) {
        len -= 1;
    }
    name[..len].to_string()
}

impl Table {
    /// Inserts `count` components named `name` of type `ty` before index
    /// `at`. An index at or past the current dimension appends. Existing
    /// cell values of every record are preserved; the new cells read as
    /// zero. Returns the index of the first inserted component.
    pub fn insert_components(
        &mut self,
        name: &str,
        ty: ComponentType,
        at: usize,
        count: usize,
    ) -> Result<usize> {
        ty.validate()?;
        let dim = self.components.len();
        let at = at.min(dim);
        if count == 0 {
            return Ok(at);
        }

        let overflow = || TableError::AllocationFailed(usize::MAX);
        let inserted = ty.size().checked_mul(count).ok_or_else(overflow)?;
        self.record_len.checked_add(inserted).ok_or_else(overflow)?;
        let new_dim = dim.checked_add(count).ok_or_else(overflow)?;
        let max_components = if new_dim >= self.max_components {
            self.max_components
                .checked_add(count)
                .and_then(|n| n.checked_add(COMPONENT_CHUNK))
                .ok_or_else(overflow)?
        } else {
            self.max_components
        };
        self.components
            .try_reserve_exact(max_components.saturating_sub(self.components.len()))
            .map_err(|_| TableError::AllocationFailed(max_components))?;

        let before = self.components.get(at).map_or(self.record_len, |c| c.offset);
        let after = self.record_len - before;
        if self.capacity > 0 {
            self.data = relayout::widen_records(&self.data, self.capacity, before, inserted, after)?;
        }

        self.max_components = max_components;
        self.components
            .splice(at..at, iter::repeat(Component::new(name, ty)).take(count));
        self.recompute_offsets();
        self.bump();

        debug!(
            "inserted {} component(s) {:?} of type {} at {}, record length now {}",
            count, name, ty, at, self.record_len
        );
        Ok(at)
    }

    /// Inserts one component before index `at`.
    pub fn insert_component(&mut self, name: &str, ty: ComponentType, at: usize) -> Result<usize> {
        self.insert_components(name, ty, at, 1)
    }

    /// Appends one component. Returns its index.
    pub fn append_component(&mut self, name: &str, ty: ComponentType) -> Result<usize> {
        self.insert_components(name, ty, usize::MAX, 1)
    }

    /// Appends `count` unnamed components. Returns the index of the first.
    pub fn append_components(&mut self, ty: ComponentType, count: usize) -> Result<usize> {
        self.insert_components("", ty, usize::MAX, count)
    }

    /// Deletes `count` components starting at `first`, relayouting every
    /// record. Out-of-range starts are a no-op; counts running past the
    /// end are clamped. Deleting every component soft-resets the table.
    pub fn delete_components(&mut self, first: usize, count: usize) -> Result<()> {
        let dim = self.components.len();
        if count == 0 || first >= dim {
            return Ok(());
        }
        let end = first + count.min(dim - first);
        if first == 0 && end == dim {
            debug!("deleting all {} components", dim);
            self.soft_reset();
            return Ok(());
        }

        let before = self.components[first].offset;
        let removed: usize = self.components[first..end].iter().map(Component::size).sum();
        let after = self.record_len - before - removed;
        if self.capacity > 0 {
            self.data = relayout::narrow_records(&self.data, self.capacity, before, removed, after)?;
        }

        self.components.drain(first..end);
        self.recompute_offsets();
        self.bump();

        debug!(
            "deleted components {}..{}, record length now {}",
            first, end, self.record_len
        );
        Ok(())
    }

    /// Replaces this table with a copy of the valid records of `src` minus
    /// `count` components starting at `first`. Leaves this table untouched
    /// if the range is empty.
    pub fn delete_components_from(&mut self, src: &Table, first: usize, count: usize) -> Result<()> {
        if count == 0 || first >= src.components.len() {
            return Ok(());
        }
        self.copy(src, 0, src.valid)?;
        self.delete_components(first, count)
    }

    /// Widens the symbolic component at `index` to `width` bytes in place.
    /// Stored strings are kept; the added bytes are zero. A width not
    /// larger than the current one is a no-op.
    pub fn widen_symbolic(&mut self, index: usize, width: usize) -> Result<()> {
        let dim = self.components.len();
        let component = self
            .components
            .get(index)
            .ok_or(TableError::ComponentOutOfRange { component: index, dim })?;
        let Some(current) = component.ty.symbolic_width() else {
            return Err(TableError::TypeMismatch {
                component: index,
                expected: "symbolic",
                actual: component.ty,
            });
        };
        let widened = ComponentType::symbolic(width)?;
        if width <= current {
            return Ok(());
        }

        let before = component.offset + current;
        let after = self.record_len - before;
        if self.capacity > 0 {
            self.data = relayout::widen_records(&self.data, self.capacity, before, width - current, after)?;
        }

        self.components[index].ty = widened;
        self.recompute_offsets();
        self.bump();

        debug!("widened symbolic component {} from {} to {} bytes", index, current, width);
        Ok(())
    }

    /// Returns the component at `index`.
    pub fn find_by_index(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    /// Returns the first component called `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Returns the index of the first component called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.components.iter().position(|c| c.name == name)
    }

    /// Renames the component at `index`.
    pub fn rename_component(&mut self, index: usize, name: &str) -> Result<()> {
        let dim = self.components.len();
        let component = self
            .components
            .get_mut(index)
            .ok_or(TableError::ComponentOutOfRange { component: index, dim })?;
        component.name = bounded_name(name);
        Ok(())
    }

    /// Number of components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Iterates over the component descriptors in record order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    pub fn component_type(&self, index: usize) -> Option<ComponentType> {
        self.components.get(index).map(|c| c.ty)
    }

    pub fn component_name(&self, index: usize) -> Option<&str> {
        self.components.get(index).map(|c| c.name.as_str())
    }

    pub fn component_offset(&self, index: usize) -> Option<usize> {
        self.components.get(index).map(|c| c.offset)
    }

    pub fn component_size(&self, index: usize) -> Option<usize> {
        self.components.get(index).map(Component::size)
    }

    /// Returns true if both tables have the same number of components with
    /// pairwise equal types.
    pub fn same_types(&self, other: &Table) -> bool {
        self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(&other.components)
                .all(|(a, b)| a.ty == b.ty)
    }

    /// Recomputes every offset as the prefix sum of the sizes before it and
    /// the record length as the total.
    pub(crate) fn recompute_offsets(&mut self) {
        let mut offset = 0;
        for component in &mut self.components {
            component.offset = offset;
            offset += component.size();
        }
        self.record_len = offset;
    }
}
