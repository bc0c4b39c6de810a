//! Filter and pivot behaviour over a larger generated table.

use sheet_report::data::filter::{apply_filter, FilterSet};
use sheet_report::data::model::{CellValue, Column, Table};
use sheet_report::data::pivot::{build_pivot, Aggregation, PivotRequest};

mod common;

fn generated() -> Table {
    let n = 200;
    Table::new(vec![
        Column::new(
            "a",
            (0..n).map(|i| CellValue::from(format!("a{}", i % 3))).collect(),
        ),
        Column::new("b", (0..n).map(|i| CellValue::Integer(i % 5)).collect()),
        Column::new(
            "c",
            (0..n).map(|i| CellValue::Float(i as f64 * 0.5)).collect(),
        ),
    ])
    .unwrap()
}

#[test]
fn test_filter_keeps_exactly_the_matching_rows() {
    let table = generated();
    let filters = FilterSet::from_pairs([("a", "a1"), ("b", "2")]);
    let display = vec!["c".to_string(), "a".to_string()];
    let out = apply_filter(&table, &filters, &display).unwrap();

    assert_eq!(out.column_names(), display);
    let expected: Vec<CellValue> = (0..200i64)
        .filter(|i| i % 3 == 1 && i % 5 == 2)
        .map(|i| CellValue::Float(i as f64 * 0.5))
        .collect();
    assert_eq!(out.column("c").unwrap().values, expected);
    assert!(out
        .column("a")
        .unwrap()
        .values
        .iter()
        .all(|v| v.to_string() == "a1"));
}

#[test]
fn test_pivot_covers_every_combination() {
    let table = generated();
    let request = PivotRequest {
        index: "a".into(),
        columns: "b".into(),
        values: None,
        aggregation: Aggregation::Count,
    };
    let pivot = build_pivot(&table, &request).unwrap();
    assert_eq!(pivot.row_labels.len(), 3);
    assert_eq!(pivot.column_labels.len(), 5);
    let total: i64 = pivot
        .cells
        .iter()
        .flatten()
        .map(|v| match v {
            CellValue::Integer(i) => *i,
            other => panic!("unexpected cell {other:?}"),
        })
        .sum();
    assert_eq!(total, 200);
}

#[test]
fn test_example_pivot_has_zero_for_absent_pair() {
    let request = PivotRequest {
        index: "region".into(),
        columns: "product".into(),
        values: Some("sales".into()),
        aggregation: "sum".parse().unwrap(),
    };
    let pivot = build_pivot(&common::sales_table(), &request).unwrap();
    assert_eq!(pivot.get("EU", "gadget"), Some(&CellValue::Integer(0)));
    assert_eq!(pivot.get("EU", "widget"), Some(&CellValue::Integer(7)));
}
