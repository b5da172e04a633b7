//! Buffer relayout for schema changes.
//!
//! When a span of bytes is inserted into or removed from every record, the
//! bytes that stay put form two runs per record: `before` (components ahead
//! of the change) and `after` (components behind it). In the old buffer the
//! `after` run of record `i - 1` is directly followed by the `before` run of
//! record `i`, and the same holds in the new buffer. Each of those
//! cross-record windows of `before + after` bytes therefore moves as one
//! block:
//!
//! ```text
//! old: [B0 A0][B1 A1][B2 A2]
//!          \____/ \____/
//! new: [B0 ++ A0][B1 ++ A1][B2 ++ A2]      (++ = inserted bytes)
//! ```
//!
//! Record 0's `before` run and the last record's `after` run have no
//! partner and are moved on their own. All records up to `capacity` are
//! moved, reserved slots included.

use bytes::BytesMut;
use log::debug;

use super::{buffer_len, zeroed_buffer};
use crate::common::{Result, TableError};

/// Moves the kept runs of every record from a buffer with stride
/// `before + changed + after` into a fresh buffer with stride `new_stride`.
fn shift_windows(
    old: &[u8],
    capacity: usize,
    old_stride: usize,
    new_stride: usize,
    before: usize,
    after: usize,
) -> Result<BytesMut> {
    let mut new = zeroed_buffer(buffer_len(capacity, new_stride)?)?;
    if capacity == 0 {
        return Ok(new);
    }
    debug_assert_eq!(old.len(), capacity * old_stride);

    let window = before + after;
    new[..before].copy_from_slice(&old[..before]);
    for i in 1..capacity {
        let src = i * old_stride - after;
        let dst = i * new_stride - after;
        new[dst..dst + window].copy_from_slice(&old[src..src + window]);
    }
    let src = capacity * old_stride - after;
    let dst = capacity * new_stride - after;
    new[dst..dst + after].copy_from_slice(&old[src..src + after]);

    Ok(new)
}

/// Returns a copy of `old` with `inserted` zero bytes spliced into every
/// record at byte offset `before`. `after` is the number of bytes behind the
/// insertion point in the old layout.
pub(crate) fn widen_records(
    old: &[u8],
    capacity: usize,
    before: usize,
    inserted: usize,
    after: usize,
) -> Result<BytesMut> {
    let old_stride = before + after;
    let new_stride = old_stride
        .checked_add(inserted)
        .ok_or(TableError::AllocationFailed(usize::MAX))?;
    debug!(
        "widening {} records from {} to {} bytes at offset {}",
        capacity, old_stride, new_stride, before
    );
    shift_windows(old, capacity, old_stride, new_stride, before, after)
}

/// Returns a copy of `old` with `removed` bytes cut out of every record at
/// byte offset `before`. `after` is the number of bytes behind the removed
/// span.
pub(crate) fn narrow_records(
    old: &[u8],
    capacity: usize,
    before: usize,
    removed: usize,
    after: usize,
) -> Result<BytesMut> {
    let old_stride = before + removed + after;
    let new_stride = before + after;
    debug!(
        "narrowing {} records from {} to {} bytes at offset {}",
        capacity, old_stride, new_stride, before
    );
    shift_windows(old, capacity, old_stride, new_stride, before, after)
}
