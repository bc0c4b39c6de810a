//! End-to-end flows through `AppState`: select a cached table, set filters,
//! and run each kind of report without a UI.

use sheet_report::config::AppConfig;
use sheet_report::data::chart::ChartKind;
use sheet_report::data::model::CellValue;
use sheet_report::state::{AppState, ReportForm, ReportOutput};

mod common;

fn state_with_sales(dir: &std::path::Path) -> AppState {
    common::write_cache(dir, "sales", &common::sales_table());
    let config = AppConfig {
        data_dir: dir.to_path_buf(),
        ..AppConfig::default()
    };
    let mut state = AppState::new(config);
    state.refresh_cache_files();
    assert_eq!(state.cache_files.len(), 1);
    let path = state.cache_files[0].1.clone();
    state.select_table(&path);
    assert!(state.session.table().is_some());
    state
}

#[test]
fn test_text_report_via_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    state.toggle_filter_column("region");
    // First sorted choice is preselected.
    assert_eq!(state.filter_values.get("region").map(String::as_str), Some("EU"));
    state.set_filter_value("region", "US");
    state.toggle_display_column("product");
    state.toggle_display_column("sales");
    state.run_text_report();

    let Some(ReportOutput::Text { table, text }) = &state.output else {
        panic!("expected a text report, status: {:?}", state.status);
    };
    assert_eq!(table.column_names(), vec!["product", "sales"]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.row(0), vec![&CellValue::from("widget"), &CellValue::Integer(10)]);
    assert_eq!(table.row(1), vec![&CellValue::from("gadget"), &CellValue::Integer(5)]);
    assert!(text.contains("widget"));
}

#[test]
fn test_missing_selections_are_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    state.toggle_display_column("sales");
    state.run_text_report();
    assert!(state.output.is_none());
    let status = state.status.clone().unwrap();
    assert!(status.is_error);
    assert!(status.message.contains("filter column"));

    state.toggle_filter_column("region");
    state.set_filter_value("region", "  ");
    state.run_text_report();
    assert!(state.status.clone().unwrap().message.contains("is empty"));
}

#[test]
fn test_pivot_form_via_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    state.form = Some(ReportForm::Pivot {
        index: "region".into(),
        columns: "product".into(),
        values: Some("sales".into()),
        aggregation: "sum".into(),
    });
    state.submit_form();
    assert!(state.form.is_none());

    let Some(ReportOutput::Pivot { pivot, table, .. }) = &state.output else {
        panic!("expected a pivot, status: {:?}", state.status);
    };
    assert_eq!(pivot.get("EU", "gadget"), Some(&CellValue::Integer(0)));
    assert_eq!(pivot.get("US", "widget"), Some(&CellValue::Integer(10)));
    assert_eq!(table.column_names(), vec!["region", "gadget", "widget"]);
}

#[test]
fn test_unsupported_aggregation_keeps_form_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    state.form = Some(ReportForm::Pivot {
        index: "region".into(),
        columns: "product".into(),
        values: Some("sales".into()),
        aggregation: "median".into(),
    });
    state.submit_form();
    assert!(state.form.is_some());
    assert!(state.output.is_none());
    assert!(state.status.clone().unwrap().message.contains("median"));
}

#[test]
fn test_distribution_chart_via_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    state.form = Some(ReportForm::Chart {
        kind: ChartKind::Bar,
        columns: vec!["region".into()],
    });
    state.submit_form();

    let Some(ReportOutput::Distribution { kind, data }) = &state.output else {
        panic!("expected a distribution, status: {:?}", state.status);
    };
    assert_eq!(*kind, ChartKind::Bar);
    assert_eq!(data.counts, vec![("US".to_string(), 2), ("EU".to_string(), 1)]);
}

#[test]
fn test_incomplete_chart_form_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    state.form = Some(ReportForm::chart(ChartKind::Scatter));
    if let Some(ReportForm::Chart { columns, .. }) = state.form.as_mut() {
        columns[0] = "sales".into();
    }
    state.submit_form();
    assert!(state.output.is_none());
    assert!(state.status.clone().unwrap().is_error);
}

#[test]
fn test_scatter_of_text_column_fails_per_chart() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    state.form = Some(ReportForm::Chart {
        kind: ChartKind::Scatter,
        columns: vec!["region".into(), "sales".into()],
    });
    state.submit_form();
    assert!(state.output.is_none());
    assert!(state.status.clone().unwrap().message.contains("non-numeric"));

    // The session is unaffected; another chart still works.
    state.form = Some(ReportForm::Chart {
        kind: ChartKind::Pie,
        columns: vec!["product".into()],
    });
    state.submit_form();
    assert!(matches!(state.output, Some(ReportOutput::Distribution { .. })));
}

#[test]
fn test_export_writes_last_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    let out = dir.path().join("report.csv");
    state.export_output(&out);
    assert!(state.status.clone().unwrap().is_error);
    assert!(!out.exists());

    state.toggle_filter_column("product");
    state.set_filter_value("product", "widget");
    state.toggle_display_column("region");
    state.run_text_report();
    state.export_output(&out);

    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text, "region\nUS\nEU\n");
}

#[test]
fn test_conversion_failure_is_posted_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = state_with_sales(dir.path());

    state.workbook_input = dir.path().join("missing.xlsx").display().to_string();
    state.start_conversion();
    assert!(state.is_loading());
    state.wait_for_conversion();
    assert!(!state.is_loading());
    assert!(state.status.clone().unwrap().is_error);
    // The loaded table is untouched.
    assert!(state.session.table().is_some());
}

#[test]
fn test_pivot_without_keyed_rows_says_so() {
    use sheet_report::data::model::{Column, Table};
    use sheet_report::data::report::{NO_MATCHING_ROWS, NO_PIVOT_ROWS};

    let dir = tempfile::tempdir().unwrap();
    let table = Table::new(vec![
        Column::new("region", vec![CellValue::Null, CellValue::Null]),
        Column::new("product", vec!["widget".into(), "gadget".into()]),
    ])
    .unwrap();
    common::write_cache(dir.path(), "blank", &table);
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    let mut state = AppState::new(config);
    state.refresh_cache_files();
    let path = state.cache_files[0].1.clone();
    state.select_table(&path);

    state.form = Some(ReportForm::Pivot {
        index: "region".into(),
        columns: "product".into(),
        values: None,
        aggregation: "size".into(),
    });
    state.submit_form();

    let Some(ReportOutput::Pivot { table, text, .. }) = &state.output else {
        panic!("expected a pivot, status: {:?}", state.status);
    };
    assert!(table.is_empty());
    assert_eq!(text, NO_PIVOT_ROWS);
    assert_ne!(text, NO_MATCHING_ROWS);
}
