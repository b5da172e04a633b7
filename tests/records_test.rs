//! Integration tests for record allocation, growth and streaming fill

use dtable::legacy::{record_index, NO_RECORD};
use dtable::{ComponentType, Table, TableError};

fn create_table(capacity: usize) -> Table {
    let mut table = Table::new();
    table.append_component("t", ComponentType::F64).unwrap();
    table.append_component("tag", ComponentType::symbolic(4).unwrap()).unwrap();
    table.alloc(capacity).unwrap();
    table
}

#[test]
fn test_add_records_within_capacity_never_grows() {
    let mut table = create_table(4);
    for expected in 0..4 {
        assert_eq!(table.add_records(1, 0).unwrap(), expected);
    }
    assert_eq!(table.capacity(), 4);
    assert_eq!(
        record_index(table.add_records(1, 0)),
        NO_RECORD
    );
    assert_eq!(table.valid_records(), 4);
}

#[test]
fn test_add_records_growth_covers_request() {
    for (count, increment) in [(1, 1), (3, 1), (1, 8), (10, 4)] {
        let mut table = create_table(2);
        table.add_records(2, 0).unwrap();
        let first = table.add_records(count, increment).unwrap();
        assert_eq!(first, 2);
        assert!(table.capacity() >= 2 + count);
        assert_eq!(table.valid_records(), 2 + count);
    }
}

#[test]
fn test_handles_survive_append_without_growth() {
    let mut table = create_table(8);
    table.add_records(1, 0).unwrap();
    table.store_real(1.5, 0, 0).unwrap();
    let handle = table.handle(0, 0).unwrap();

    table.add_records(3, 0).unwrap();
    assert_eq!(table.resolve(&handle).unwrap(), &1.5f64.to_le_bytes());

    table.add_records(10, 10).unwrap();
    assert!(matches!(
        table.resolve(&handle),
        Err(TableError::StaleHandle { .. })
    ));
    assert_eq!(table.fetch_real(0, 0), 1.5);
}

#[test]
fn test_streaming_fill() {
    // Reader pattern: allocate for an estimate, write ahead, bump the count
    let mut table = create_table(3);
    for r in 0..3 {
        table.store_real(r as f64 * 0.5, r, 0).unwrap();
        table.store_string("ok", r, 1).unwrap();
        assert_eq!(table.increment_valid_records(1), r + 1);
    }
    assert_eq!(table.increment_valid_records(1), 3);
    assert_eq!(table.fetch_real(2, 0), 1.0);
}

#[test]
fn test_insert_and_delete_records() {
    let mut table = create_table(0);
    for r in 0..5 {
        let index = table.add_records(1, 2).unwrap();
        table.store_real(r as f64, index, 0).unwrap();
    }

    let at = table.insert_records(2, 2, 4).unwrap();
    assert_eq!(at, 2);
    table.store_string("new", 2, 1).unwrap();
    let values: Vec<f64> = (0..7).map(|r| table.fetch_real(r, 0)).collect();
    assert_eq!(values, vec![0.0, 1.0, 0.0, 0.0, 2.0, 3.0, 4.0]);

    table.delete_records(2, 2).unwrap();
    let values: Vec<f64> = (0..5).map(|r| table.fetch_real(r, 0)).collect();
    assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(table.fetch_string(1, 1), "");
}

#[test]
fn test_reallocate_shrink_truncates_tail_only() {
    let mut table = create_table(0);
    table.allocate(6).unwrap();
    for r in 0..6 {
        table.store_real(r as f64, r, 0).unwrap();
    }
    table.reallocate(4).unwrap();
    assert_eq!(table.valid_records(), 4);
    let values: Vec<f64> = (0..4).map(|r| table.fetch_real(r, 0)).collect();
    assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_clear_keeps_shape() {
    let mut table = create_table(2);
    table.add_records(2, 0).unwrap();
    table.store_string("abc", 1, 1).unwrap();
    table.clear().unwrap();
    assert_eq!(table.fetch_string(1, 1), "");
    assert_eq!(table.capacity(), 2);
    assert_eq!(table.component_count(), 2);
}
