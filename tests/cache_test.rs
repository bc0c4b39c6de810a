use sheet_report::data::cache::{list_cache_files, load_table, save_table};
use sheet_report::data::model::{CellValue, Column, Table};
use sheet_report::ReportError;

mod common;

#[test]
fn test_round_trip_preserves_names_order_and_text() {
    let dir = tempfile::tempdir().unwrap();
    let table = Table::new(vec![
        Column::new("name", vec!["a".into(), CellValue::Null, "c".into()]),
        Column::new(
            "qty",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Integer(3)],
        ),
        Column::new(
            "price",
            vec![
                CellValue::Float(1.0),
                CellValue::Float(2.5),
                CellValue::Null,
            ],
        ),
        Column::new(
            "active",
            vec![CellValue::Bool(true), CellValue::Bool(false), CellValue::Null],
        ),
        Column::new(
            "when",
            vec![
                CellValue::DateTime("2024-03-01 00:00:00".into()),
                CellValue::Null,
                CellValue::DateTime("2024-03-02 12:30:00".into()),
            ],
        ),
        Column::new(
            "mixed",
            vec![CellValue::Integer(10), "x".into(), CellValue::Float(0.5)],
        ),
    ])
    .unwrap();

    let path = common::write_cache(dir.path(), "sheet", &table);
    let loaded = load_table(&path).unwrap();

    assert_eq!(loaded.column_names(), table.column_names());
    assert_eq!(loaded.len(), 3);
    for name in ["name", "qty", "price", "active", "when"] {
        assert_eq!(
            loaded.column(name).unwrap().values,
            table.column(name).unwrap().values,
            "column {name}"
        );
    }
    // Mixed columns come back as text with the same printed form.
    let mixed: Vec<String> = loaded
        .column("mixed")
        .unwrap()
        .values
        .iter()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(mixed, vec!["10", "x", "0.5"]);
}

#[test]
fn test_zero_row_table_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let table = Table::empty(&["a".to_string(), "b".to_string()]).unwrap();
    let path = common::write_cache(dir.path(), "empty", &table);
    let loaded = load_table(&path).unwrap();
    assert!(loaded.is_empty());
    assert_eq!(loaded.column_names(), vec!["a", "b"]);
}

#[test]
fn test_listing_filters_by_extension_and_sorts() {
    let dir = tempfile::tempdir().unwrap();
    let table = common::sales_table();
    common::write_cache(dir.path(), "b_sheet", &table);
    common::write_cache(dir.path(), "a_sheet", &table);
    std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

    let files = list_cache_files(dir.path()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a_sheet.parquet", "b_sheet.parquet"]);
}

#[test]
fn test_empty_or_missing_directory_is_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        list_cache_files(dir.path()).unwrap_err(),
        ReportError::MissingFile { .. }
    ));
    assert!(matches!(
        list_cache_files(&dir.path().join("nope")).unwrap_err(),
        ReportError::MissingFile { .. }
    ));
}

#[test]
fn test_loaded_column_names_are_trimmed() {
    use arrow::array::{ArrayRef, Int64Array};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use std::sync::Arc;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.parquet");
    let batch = RecordBatch::try_from_iter([(
        "  padded ",
        Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef,
    )])
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let loaded = load_table(&path).unwrap();
    assert_eq!(loaded.column_names(), vec!["padded"]);
    assert_eq!(
        loaded.column("padded").unwrap().values,
        vec![CellValue::Integer(1), CellValue::Integer(2)]
    );
}

#[test]
fn test_save_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_cache(dir.path(), "s", &common::sales_table());
    let smaller = Table::new(vec![Column::new("only", vec!["x".into()])]).unwrap();
    save_table(&smaller, &path).unwrap();
    assert_eq!(load_table(&path).unwrap(), smaller);
}
