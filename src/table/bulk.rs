//! Whole-table operations: copy, join (horizontal) and cat (vertical).

use log::{debug, warn};

use super::{buffer_len, zeroed_buffer, Table};
use crate::common::{BulkStatus, Result, TableError, COMPONENT_CHUNK};
use crate::types::{symbolic_bytes, ComponentType};

impl Table {
    /// Swaps in a freshly built table, keeping the generation moving forward
    /// so handles into the old buffer go stale.
    fn replace_with(&mut self, mut table: Table) {
        table.generation = self.generation.next();
        *self = table;
    }

    /// Replaces this table with `count` records of `src` starting at
    /// `first`, along with its schema and annotations.
    ///
    /// The new table has capacity `count`. If the range runs past the valid
    /// records of `src`, only the records inside it count as valid; bytes
    /// past the capacity of `src` read as zero. On failure this table is
    /// left unchanged.
    pub fn copy(&mut self, src: &Table, first: usize, count: usize) -> Result<()> {
        let count = if src.record_len == 0 { 0 } else { count };
        let stride = src.record_len;

        let mut table = Table::new();
        table.components = src.components.clone();
        table.max_components = src.max_components;
        table.record_len = stride;
        table.data = zeroed_buffer(buffer_len(count, stride)?)?;
        table.capacity = count;

        let available = src.capacity.saturating_sub(first).min(count);
        if available > 0 {
            let start = first * stride;
            table.data[..available * stride].copy_from_slice(&src.data[start..start + available * stride]);
        }
        table.valid = if first.saturating_add(count) > src.valid {
            src.valid.saturating_sub(first)
        } else {
            count
        };
        table.annotations = src.annotations.clone();

        debug!("copied {} records starting at {}", count, first);
        self.replace_with(table);
        Ok(())
    }

    /// Resets this table and takes over the schema of `src`, without
    /// records or annotations.
    pub fn scopy(&mut self, src: &Table) {
        self.reset();
        self.components = src.components.clone();
        self.max_components = src.max_components;
        self.record_len = src.record_len;
    }

    /// Takes over the annotations of `src`. Schema and data are unchanged.
    pub fn dcopy(&mut self, src: &Table) {
        self.annotations = src.annotations.clone();
    }

    /// Appends every component of `src` to every record of this table.
    ///
    /// The record count of this table is kept. Records of `src` beyond it
    /// are dropped and reported as `Truncated`; if `src` is shorter, the
    /// joined cells of the remaining records are zero. An empty `src` is a
    /// no-op; joining onto an empty table copies `src`. The capacity shrinks
    /// to the number of valid records.
    pub fn join(&mut self, src: &Table) -> Result<BulkStatus> {
        if src.is_empty() {
            return Ok(BulkStatus::Complete);
        }
        if self.is_empty() {
            self.copy(src, 0, src.valid)?;
            return Ok(BulkStatus::Complete);
        }

        let records = self.valid;
        let own = self.record_len;
        let other = src.record_len;
        let stride = own
            .checked_add(other)
            .ok_or(TableError::AllocationFailed(usize::MAX))?;
        let mut data = zeroed_buffer(buffer_len(records, stride)?)?;
        for r in 0..records {
            let dst = r * stride;
            data[dst..dst + own].copy_from_slice(&self.data[r * own..(r + 1) * own]);
            if r < src.valid {
                data[dst + own..dst + stride].copy_from_slice(&src.data[r * other..(r + 1) * other]);
            }
        }

        let mut components = Vec::new();
        let max_components = self
            .components
            .len()
            .checked_add(src.components.len())
            .and_then(|n| n.checked_add(COMPONENT_CHUNK))
            .ok_or(TableError::AllocationFailed(usize::MAX))?;
        components
            .try_reserve_exact(max_components)
            .map_err(|_| TableError::AllocationFailed(max_components))?;
        components.extend(self.components.iter().cloned());
        components.extend(src.components.iter().cloned());

        self.components = components;
        self.max_components = max_components;
        self.recompute_offsets();
        self.data = data;
        self.capacity = records;
        self.bump();
        debug!(
            "joined {} components onto {} records, record length now {}",
            src.components.len(),
            records,
            self.record_len
        );

        if records < src.valid {
            warn!(
                "join dropped {} of {} source records",
                src.valid - records,
                src.valid
            );
            return Ok(BulkStatus::Truncated);
        }
        Ok(BulkStatus::Complete)
    }

    /// Appends all valid records of `src`. See [`Table::cat_ex`].
    pub fn cat(&mut self, src: &Table) -> Result<BulkStatus> {
        if src.is_empty() {
            return Err(TableError::EmptySource);
        }
        self.cat_ex(src, 0, src.valid)
    }

    /// Appends `count` records of `src` starting at `first`.
    ///
    /// With identical component types the records are moved as bytes.
    /// Otherwise each source component is converted into the destination
    /// component at the same index: numeric to numeric by value, symbolic to
    /// symbolic by string, where a narrower destination symbolic component
    /// is first widened to the source width. Mixed numeric/symbolic pairs
    /// stay zero. Source components without a counterpart are dropped and
    /// reported as `Truncated`. An empty table without components becomes a
    /// copy of the requested range.
    pub fn cat_ex(&mut self, src: &Table, first: usize, count: usize) -> Result<BulkStatus> {
        if src.is_empty() {
            return Err(TableError::EmptySource);
        }
        if first >= src.valid {
            return Err(TableError::InvalidRecord {
                record: first,
                valid: src.valid,
            });
        }
        let count = count.min(src.valid - first);
        if count == 0 {
            return Ok(BulkStatus::Complete);
        }
        if self.capacity == 0 && self.components.is_empty() {
            self.copy(src, first, count)?;
            return Ok(BulkStatus::Complete);
        }

        if self.same_types(src) {
            let base = self.grow_for_append(count)?;
            let stride = self.record_len;
            let from = first * stride;
            self.data[base * stride..(base + count) * stride]
                .copy_from_slice(&src.data[from..from + count * stride]);
            self.valid = base + count;
            return Ok(BulkStatus::Complete);
        }

        let base = self.grow_for_append(count)?;

        // Widen narrower symbolic targets before their cells are written
        for j in 0..src.components.len().min(self.components.len()) {
            if let (ComponentType::Symbolic(theirs), ComponentType::Symbolic(ours)) =
                (src.components[j].component_type(), self.components[j].component_type())
            {
                if theirs > ours {
                    self.widen_symbolic(j, theirs as usize)?;
                }
            }
        }

        let stride = self.record_len;
        self.data[base * stride..(base + count) * stride].fill(0);
        self.valid = base + count;

        for j in 0..src.components.len().min(self.components.len()) {
            let theirs = src.components[j].component_type();
            let ours = self.components[j].component_type();
            for i in 0..count {
                match (theirs, ours) {
                    (ComponentType::Numeric(_), ComponentType::Numeric(_)) => {
                        let value = src.fetch_complex(first + i, j);
                        self.store_complex(value, base + i, j)?;
                    }
                    (ComponentType::Symbolic(_), ComponentType::Symbolic(width)) => {
                        let (Some(text), Some(cell)) = (src.cell(first + i, j), self.cell_mut(base + i, j))
                        else {
                            continue;
                        };
                        let text = symbolic_bytes(text);
                        let len = text.len().min(width as usize - 1);
                        cell[..len].copy_from_slice(&text[..len]);
                        cell[len..].fill(0);
                    }
                    _ => {}
                }
            }
        }

        if src.components.len() > self.components.len() {
            warn!(
                "cat dropped {} source components without a destination",
                src.components.len() - self.components.len()
            );
            return Ok(BulkStatus::Truncated);
        }
        Ok(BulkStatus::Complete)
    }

    /// Makes room for `count` more records and returns the index of the
    /// first one. The valid count is not touched.
    fn grow_for_append(&mut self, count: usize) -> Result<usize> {
        let base = self.valid;
        let needed = base
            .checked_add(count)
            .ok_or(TableError::AllocationFailed(usize::MAX))?;
        if needed > self.capacity {
            self.reallocate(needed)?;
        }
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Complex;

    fn fill_strings(table: &mut Table, component: usize, text: &str) {
        for r in 0..table.valid_records() {
            table.store_string(text, r, component).unwrap();
        }
    }

    fn numbered(ty: ComponentType, records: usize) -> Table {
        let mut table = Table::new();
        table.append_component("v", ty).unwrap();
        table.allocate(records).unwrap();
        for r in 0..records {
            table.store_real(r as f64 + 1.0, r, 0).unwrap();
        }
        table
    }

    #[test]
    fn test_copy_slice() {
        let mut src = numbered(ComponentType::I32, 5);
        src.annotations_mut().rate = 10.0;
        src.annotations_mut().vrtext = Some("v".into());

        let mut dst = Table::new();
        dst.copy(&src, 1, 3).unwrap();
        assert_eq!(dst.capacity(), 3);
        assert_eq!(dst.valid_records(), 3);
        assert_eq!(dst.fetch_real(0, 0), 2.0);
        assert_eq!(dst.fetch_real(2, 0), 4.0);
        assert_eq!(dst.annotations(), src.annotations());
    }

    #[test]
    fn test_copy_past_valid_records() {
        let mut src = numbered(ComponentType::I32, 3);
        src.set_valid_records(2);
        let mut dst = Table::new();
        dst.copy(&src, 1, 10).unwrap();
        assert_eq!(dst.capacity(), 10);
        assert_eq!(dst.valid_records(), 1);
        assert_eq!(dst.fetch_real(0, 0), 2.0);
        assert_eq!(dst.fetch_real(1, 0), 3.0);
        assert_eq!(dst.fetch_real(2, 0), 0.0);
    }

    #[test]
    fn test_copy_advances_generation() {
        let src = numbered(ComponentType::U8, 2);
        let mut dst = numbered(ComponentType::U8, 2);
        for _ in 0..5 {
            dst.append_component("x", ComponentType::U8).unwrap();
        }
        let handle = dst.handle(0, 0).unwrap();
        dst.copy(&src, 0, 2).unwrap();
        assert!(dst.generation() > handle.generation);
        assert!(dst.resolve(&handle).is_err());
    }

    #[test]
    fn test_scopy_and_dcopy() {
        let mut src = numbered(ComponentType::F64, 2);
        src.annotations_mut().window = 16.0;
        let mut dst = numbered(ComponentType::U8, 4);

        dst.scopy(&src);
        assert!(dst.same_types(&src));
        assert_eq!(dst.capacity(), 0);
        assert_eq!(dst.annotations().window, 0.0);

        dst.dcopy(&src);
        assert_eq!(dst.annotations().window, 16.0);
    }

    #[test]
    fn test_join_interleaves_records() {
        let mut dst = numbered(ComponentType::I16, 3);
        let mut src = Table::new();
        src.append_component("s", ComponentType::Symbolic(4)).unwrap();
        src.allocate(2).unwrap();
        fill_strings(&mut src, 0, "ab");

        assert_eq!(dst.join(&src).unwrap(), BulkStatus::Complete);
        assert_eq!(dst.component_count(), 2);
        assert_eq!(dst.record_len(), 6);
        assert_eq!(dst.capacity(), 3);
        assert_eq!(dst.fetch_real(2, 0), 3.0);
        assert_eq!(dst.fetch_string(1, 1), "ab");
        assert_eq!(dst.fetch_string(2, 1), "");
    }

    #[test]
    fn test_join_truncates_longer_source() {
        let mut dst = numbered(ComponentType::I16, 2);
        let src = numbered(ComponentType::F32, 4);
        assert_eq!(dst.join(&src).unwrap(), BulkStatus::Truncated);
        assert_eq!(dst.valid_records(), 2);
        assert_eq!(dst.fetch_real(1, 1), 2.0);
    }

    #[test]
    fn test_join_edge_cases() {
        let src = numbered(ComponentType::F32, 2);
        let mut empty = Table::new();
        assert_eq!(empty.join(&src).unwrap(), BulkStatus::Complete);
        assert!(empty.same_types(&src));
        assert_eq!(empty.valid_records(), 2);

        let mut dst = numbered(ComponentType::U8, 2);
        assert_eq!(dst.join(&Table::new()).unwrap(), BulkStatus::Complete);
        assert_eq!(dst.component_count(), 1);
    }

    #[test]
    fn test_cat_identical_schema() {
        let mut dst = numbered(ComponentType::I32, 2);
        let src = numbered(ComponentType::I32, 3);
        assert_eq!(dst.cat(&src).unwrap(), BulkStatus::Complete);
        let values: Vec<f64> = (0..5).map(|r| dst.fetch_real(r, 0)).collect();
        assert_eq!(values, vec![1.0, 2.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cat_ex_range() {
        let mut dst = numbered(ComponentType::I32, 1);
        let src = numbered(ComponentType::I32, 4);
        assert_eq!(dst.cat_ex(&src, 2, 10).unwrap(), BulkStatus::Complete);
        assert_eq!(dst.valid_records(), 3);
        assert_eq!(dst.fetch_real(1, 0), 3.0);
        assert_eq!(dst.fetch_real(2, 0), 4.0);
        assert_eq!(
            dst.cat_ex(&src, 4, 1),
            Err(TableError::InvalidRecord { record: 4, valid: 4 })
        );
        assert_eq!(dst.valid_records(), 3);
        assert_eq!(dst.cat(&Table::new()), Err(TableError::EmptySource));
    }

    #[test]
    fn test_cat_converts_numeric_types() {
        let mut dst = numbered(ComponentType::U8, 1);
        let mut src = Table::new();
        src.append_component("z", ComponentType::COMPLEX).unwrap();
        src.allocate(1).unwrap();
        src.store_complex(Complex::new(300.0, 1.0), 0, 0).unwrap();

        assert_eq!(dst.cat(&src).unwrap(), BulkStatus::Complete);
        assert_eq!(dst.fetch_real(1, 0), 255.0);
    }

    #[test]
    fn test_cat_mixed_pairs_stay_zero_and_extra_components_truncate() {
        let mut dst = Table::new();
        dst.append_component("n", ComponentType::I32).unwrap();
        dst.allocate(1).unwrap();
        dst.store_real(9.0, 0, 0).unwrap();

        let mut src = Table::new();
        src.append_component("s", ComponentType::Symbolic(4)).unwrap();
        src.append_component("extra", ComponentType::F64).unwrap();
        src.allocate(2).unwrap();
        fill_strings(&mut src, 0, "xyz");

        assert_eq!(dst.cat(&src).unwrap(), BulkStatus::Truncated);
        assert_eq!(dst.valid_records(), 3);
        assert_eq!(dst.fetch_real(0, 0), 9.0);
        assert_eq!(dst.fetch_real(1, 0), 0.0);
        assert_eq!(dst.fetch_real(2, 0), 0.0);
    }

    #[test]
    fn test_cat_widens_symbolic_after_growing() {
        let mut dst = Table::new();
        dst.append_component("s", ComponentType::Symbolic(3)).unwrap();
        dst.append_component("n", ComponentType::I32).unwrap();
        dst.allocate(2).unwrap();
        fill_strings(&mut dst, 0, "ab");
        dst.store_real(7.0, 0, 1).unwrap();
        dst.store_real(8.0, 1, 1).unwrap();

        let mut src = Table::new();
        src.append_component("s", ComponentType::Symbolic(8)).unwrap();
        src.append_component("n", ComponentType::I32).unwrap();
        src.allocate(2).unwrap();
        fill_strings(&mut src, 0, "abcdefg");
        src.store_real(1.0, 0, 1).unwrap();
        src.store_real(2.0, 1, 1).unwrap();

        assert_eq!(dst.cat(&src).unwrap(), BulkStatus::Complete);
        assert_eq!(dst.capacity(), 4);
        assert_eq!(dst.valid_records(), 4);
        assert_eq!(dst.record_len(), 12);
        assert_eq!(
            dst.find_by_index(0).map(|c| c.component_type()),
            Some(ComponentType::Symbolic(8))
        );
        let strings: Vec<String> = (0..4).map(|r| dst.fetch_string(r, 0).into_owned()).collect();
        assert_eq!(strings, vec!["ab", "ab", "abcdefg", "abcdefg"]);
        let numbers: Vec<f64> = (0..4).map(|r| dst.fetch_real(r, 1)).collect();
        assert_eq!(numbers, vec![7.0, 8.0, 1.0, 2.0]);
    }

    #[test]
    fn test_cat_into_blank_table_copies() {
        let src = numbered(ComponentType::F64, 3);
        let mut dst = Table::new();
        assert_eq!(dst.cat_ex(&src, 1, 2).unwrap(), BulkStatus::Complete);
        assert_eq!(dst.valid_records(), 2);
        assert_eq!(dst.fetch_real(0, 0), 2.0);
    }
}
