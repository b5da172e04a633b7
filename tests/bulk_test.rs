//! Integration tests for copy, join and concatenation

use dtable::legacy::{LegacyStatus, ERR_TRUNCATE, OK};
use dtable::{BulkStatus, Complex, ComponentType, Table};

fn create_mixed(records: usize) -> Table {
    let mut table = Table::new();
    table.append_component("id", ComponentType::U32).unwrap();
    table.append_component("name", ComponentType::symbolic(8).unwrap()).unwrap();
    table.append_component("z", ComponentType::COMPLEX).unwrap();
    table.allocate(records).unwrap();
    for r in 0..records {
        table.store_real(r as f64, r, 0).unwrap();
        table.store_string(&format!("row{}", r), r, 1).unwrap();
        table.store_complex(Complex::new(r as f64, -1.0), r, 2).unwrap();
    }
    table.annotations_mut().rate = 10.0;
    table.annotations_mut().rtext = Some("test".into());
    table
}

#[test]
fn test_copy_round_trip() {
    let src = create_mixed(6);
    for n in [0, 1, 6] {
        let mut dst = Table::new();
        dst.copy(&src, 0, n).unwrap();
        assert_eq!(dst.valid_records(), n);
        assert!(dst.same_types(&src));
        assert_eq!(dst.annotations(), src.annotations());
        for r in 0..n {
            for c in 0..src.component_count() {
                assert_eq!(dst.cell(r, c), src.cell(r, c));
                assert_eq!(dst.fetch_text(r, c), src.fetch_text(r, c));
            }
        }
    }
}

#[test]
fn test_cat_widens_narrower_symbolic_component() {
    let mut dst = Table::new();
    dst.append_component("word", ComponentType::symbolic(8).unwrap()).unwrap();
    dst.allocate(2).unwrap();
    dst.store_string("seven77", 0, 0).unwrap();
    dst.store_string("short", 1, 0).unwrap();

    let mut src = Table::new();
    src.append_component("word", ComponentType::symbolic(16).unwrap()).unwrap();
    src.allocate(1).unwrap();
    src.store_string("fifteen_chars15", 0, 0).unwrap();

    assert_eq!(dst.cat(&src).unwrap(), BulkStatus::Complete);
    assert_eq!(dst.component_type(0), Some(ComponentType::Symbolic(16)));
    assert_eq!(dst.valid_records(), 3);
    assert_eq!(dst.fetch_string(0, 0), "seven77");
    assert_eq!(dst.fetch_string(1, 0), "short");
    assert_eq!(dst.fetch_string(2, 0), "fifteen_chars15");
}

#[test]
fn test_cat_widening_keeps_neighbours() {
    let mut dst = create_mixed(2);
    let mut src = Table::new();
    src.append_component("id", ComponentType::F64).unwrap();
    src.append_component("name", ComponentType::symbolic(12).unwrap()).unwrap();
    src.allocate(1).unwrap();
    src.store_real(99.0, 0, 0).unwrap();
    src.store_string("longer name", 0, 1).unwrap();

    assert_eq!(dst.cat(&src).status(), OK);
    assert_eq!(dst.record_len(), 4 + 12 + 16);
    assert_eq!(dst.fetch_complex(1, 2), Complex::new(1.0, -1.0));
    assert_eq!(dst.fetch_string(1, 1), "row1");
    assert_eq!(dst.fetch_real(2, 0), 99.0);
    assert_eq!(dst.fetch_string(2, 1), "longer name");
    assert_eq!(dst.fetch_complex(2, 2), Complex::ZERO);
}

#[test]
fn test_join_reports_truncation() {
    let mut dst = Table::new();
    dst.append_component("k", ComponentType::I8).unwrap();
    dst.allocate(2).unwrap();
    dst.store_real(-3.0, 1, 0).unwrap();
    let src = create_mixed(5);

    let status = dst.join(&src);
    assert_eq!(status.status(), ERR_TRUNCATE);
    assert_eq!(dst.component_count(), 4);
    assert_eq!(dst.valid_records(), 2);
    assert_eq!(dst.fetch_real(1, 0), -3.0);
    assert_eq!(dst.fetch_real(1, 1), 1.0);
    assert_eq!(dst.fetch_string(1, 2), "row1");
    assert_eq!(dst.component_name(3), Some("z"));
}

#[test]
fn test_join_shorter_source_zero_fills() {
    let mut dst = create_mixed(3);
    let mut src = Table::new();
    src.append_component("flag", ComponentType::BOOL).unwrap();
    src.allocate(1).unwrap();
    src.store_real(1.0, 0, 0).unwrap();

    assert_eq!(dst.join(&src).unwrap(), BulkStatus::Complete);
    assert_eq!(dst.fetch_real(0, 3), 1.0);
    assert_eq!(dst.fetch_real(2, 3), 0.0);
    assert_eq!(dst.fetch_string(2, 1), "row2");
}
