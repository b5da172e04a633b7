use log::debug;

use super::{buffer_len, zeroed_buffer, Table};
use crate::common::{Result, TableError};

impl Table {
    /// Replaces the record buffer with `count` zero-filled records, all of
    /// them valid. Destroys the previous content; keeps the schema.
    pub fn allocate(&mut self, count: usize) -> Result<()> {
        if count > 0 && self.record_len == 0 {
            return Err(TableError::NoComponents);
        }
        let data = zeroed_buffer(buffer_len(count, self.record_len)?)?;
        debug!("allocated {} records of {} bytes", count, self.record_len);

        self.data = data;
        self.capacity = count;
        self.valid = count;
        self.bump();
        Ok(())
    }

    /// Like [`Table::allocate`], for callers that overwrite every cell
    /// anyway. The buffer content is unspecified by contract (it is zeroed
    /// in practice).
    pub fn allocate_uninitialized(&mut self, count: usize) -> Result<()> {
        self.allocate(count)
    }

    /// Replaces the record buffer with capacity for `count` zero-filled
    /// records, none of them valid yet.
    pub fn alloc(&mut self, count: usize) -> Result<()> {
        self.allocate(count)?;
        self.valid = 0;
        Ok(())
    }

    /// Like [`Table::alloc`] without the zero-fill contract.
    pub fn alloc_uninitialized(&mut self, count: usize) -> Result<()> {
        self.alloc(count)
    }

    /// Resizes the record buffer to `count` slots, preserving existing bytes
    /// up to the smaller of the old and new size. New slots are zeroed.
    /// Shrinking below the number of valid records truncates them.
    pub fn reallocate(&mut self, count: usize) -> Result<()> {
        if count == 0 || self.capacity == 0 {
            return self.alloc(count);
        }
        if count == self.capacity {
            return Ok(());
        }

        let new_len = buffer_len(count, self.record_len)?;
        let mut data = zeroed_buffer(new_len)?;
        let keep = new_len.min(self.data.len());
        data[..keep].copy_from_slice(&self.data[..keep]);
        debug!("reallocated records from {} to {}", self.capacity, count);

        self.data = data;
        self.capacity = count;
        self.valid = self.valid.min(count);
        self.bump();
        Ok(())
    }

    /// Appends `count` zeroed valid records and returns the index of the
    /// first. Reserved slots taken over are cleared; to keep cells written
    /// ahead of the valid count, use [`Table::increment_valid_records`].
    ///
    /// If capacity is short and `increment > 0`, the buffer grows to hold
    /// `max(count, increment)` records past the current valid ones; this
    /// invalidates previously taken cell handles. With `increment == 0` the
    /// buffer never moves and a shortage fails with `CapacityExhausted`
    /// without changing the table.
    pub fn add_records(&mut self, count: usize, increment: usize) -> Result<usize> {
        let first = self.valid;
        let needed = first
            .checked_add(count)
            .ok_or(TableError::AllocationFailed(usize::MAX))?;
        if needed > self.capacity {
            if increment == 0 {
                return Err(TableError::CapacityExhausted {
                    needed,
                    capacity: self.capacity,
                });
            }
            let grown = first
                .checked_add(increment.max(count))
                .ok_or(TableError::AllocationFailed(usize::MAX))?;
            self.reallocate(grown)?;
        }
        let stride = self.record_len;
        self.data[first * stride..needed * stride].fill(0);
        self.valid = needed;
        Ok(first)
    }

    /// Inserts `count` zeroed records before record `at` and returns the
    /// index of the first inserted record. An index at or past the valid
    /// records appends. Growth follows [`Table::add_records`].
    pub fn insert_records(&mut self, at: usize, count: usize, increment: usize) -> Result<usize> {
        let first = self.add_records(count, increment)?;
        if at >= first {
            return Ok(first);
        }

        let stride = self.record_len;
        if stride > 0 && count > 0 {
            let tail = (self.capacity - count) * stride;
            self.data.copy_within(at * stride..tail, (at + count) * stride);
            self.data[at * stride..(at + count) * stride].fill(0);
        }
        Ok(at)
    }

    /// Deletes `count` valid records starting at `first` by shifting the
    /// following records left. Capacity is unchanged. Out-of-range starts
    /// are a no-op; counts running past the valid records are clamped.
    pub fn delete_records(&mut self, first: usize, count: usize) -> Result<()> {
        if count == 0 || first >= self.valid {
            return Ok(());
        }
        let count = count.min(self.valid - first);
        let stride = self.record_len;
        self.data
            .copy_within((first + count) * stride..self.capacity * stride, first * stride);
        self.valid -= count;
        Ok(())
    }

    /// Replaces this table with a copy of `src` minus `count` records
    /// starting at `first`. The copy keeps the full capacity of `src`.
    /// Leaves this table untouched if the range is empty.
    pub fn delete_records_from(&mut self, src: &Table, first: usize, count: usize) -> Result<()> {
        if count == 0 || first >= src.valid {
            return Ok(());
        }
        self.copy(src, 0, src.capacity)?;
        self.delete_records(first, count)
    }

    /// Zero-fills every valid record. Schema and capacity are unchanged.
    pub fn clear(&mut self) -> Result<()> {
        if self.capacity == 0 {
            return Err(TableError::NotAllocated);
        }
        let len = self.valid * self.record_len;
        self.data[..len].fill(0);
        Ok(())
    }

    /// Sets the number of valid records, clamped to the capacity.
    /// Returns the new count.
    pub fn set_valid_records(&mut self, count: usize) -> usize {
        self.valid = count.min(self.capacity);
        self.valid
    }

    /// Adjusts the number of valid records by `delta`, clamped to
    /// `0..=capacity`. Returns the new count.
    pub fn increment_valid_records(&mut self, delta: isize) -> usize {
        let count = if delta < 0 {
            self.valid.saturating_sub(delta.unsigned_abs())
        } else {
            self.valid.saturating_add(delta as usize)
        };
        self.set_valid_records(count)
    }
}
