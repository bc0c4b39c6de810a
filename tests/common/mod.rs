use std::path::{Path, PathBuf};

use sheet_report::data::cache::{cache_path, save_table};
use sheet_report::data::model::{CellValue, Column, Table};

/// `region, product, sales` with rows (US, widget, 10), (US, gadget, 5), (EU, widget, 7).
pub fn sales_table() -> Table {
    Table::new(vec![
        Column::new("region", vec!["US".into(), "US".into(), "EU".into()]),
        Column::new(
            "product",
            vec!["widget".into(), "gadget".into(), "widget".into()],
        ),
        Column::new(
            "sales",
            vec![
                CellValue::Integer(10),
                CellValue::Integer(5),
                CellValue::Integer(7),
            ],
        ),
    ])
    .unwrap()
}

/// Write `table` as cache file `name` in `dir`.
pub fn write_cache(dir: &Path, name: &str, table: &Table) -> PathBuf {
    let path = cache_path(dir, name);
    save_table(table, &path).unwrap();
    path
}
