use std::collections::HashSet;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};

use super::cache::{cache_path, save_table};
use super::model::{CellValue, Column, Table};
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Spreadsheet → cache conversion
// ---------------------------------------------------------------------------

/// Convert every sheet except the first into a cache file in `out_dir`.
///
/// The first sheet is a cover/index sheet and is never converted. Returns the
/// written cache paths in sheet order.
pub fn convert_workbook(path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    if !path.is_file() {
        return Err(ReportError::missing_file(path, "spreadsheet not found"));
    }

    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();
    let data_sheets = data_sheet_names(&sheet_names)?;

    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(data_sheets.len());
    for sheet in data_sheets {
        let range = workbook.worksheet_range(sheet)?;
        let rows: Vec<&[Data]> = range.rows().collect();
        let table = sheet_to_table(&rows)?;

        let target = cache_path(out_dir, sheet);
        save_table(&table, &target)?;
        log::info!(
            "Saved sheet '{sheet}' ({} rows) to {}",
            table.len(),
            target.display()
        );
        written.push(target);
    }
    Ok(written)
}

/// All sheets after the first; a workbook without them is rejected.
pub fn data_sheet_names(sheet_names: &[String]) -> Result<&[String]> {
    match sheet_names.get(1..) {
        Some(rest) if !rest.is_empty() => Ok(rest),
        _ => Err(ReportError::InvalidSelection(
            "spreadsheet has no sheets besides the first".to_string(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Sheet → Table
// ---------------------------------------------------------------------------

/// Build a table from sheet rows; the first row is the header.
pub fn sheet_to_table(rows: &[&[Data]]) -> Result<Table> {
    let Some((header, body)) = rows.split_first() else {
        return Table::new(Vec::new());
    };

    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
    let names = header_names(header, width);

    let columns = names
        .into_iter()
        .enumerate()
        .map(|(col_idx, name)| {
            let cells: Vec<Option<&Data>> = body.iter().map(|row| row.get(col_idx)).collect();
            Column::new(name, column_values(&cells))
        })
        .collect();
    Table::new(columns)
}

/// Trimmed header names. Blank headers become `column_N`; repeated names get
/// `.1`, `.2`, … suffixes.
fn header_names(header: &[Data], width: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    (0..width)
        .map(|idx| {
            let raw = match header.get(idx) {
                Some(Data::Empty) | None => String::new(),
                Some(cell) => cell.to_string(),
            };
            let base = match raw.trim() {
                "" => format!("column_{}", idx + 1),
                trimmed => trimmed.to_string(),
            };
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            name
        })
        .collect()
}

/// Convert one column of cells.
///
/// A purely numeric column is an integer column only when every cell is
/// filled with a whole number; a gap or a fraction makes every number a
/// float. In any other column each whole-valued float becomes an integer.
fn column_values(cells: &[Option<&Data>]) -> Vec<CellValue> {
    let is_gap = |cell: &&Option<&Data>| matches!(cell, None | Some(Data::Empty));
    let numeric_only = cells
        .iter()
        .filter(|c| !is_gap(c))
        .all(|cell| matches!(cell, Some(Data::Float(_) | Data::Int(_))));
    let all_whole = cells.iter().flatten().all(|cell| match cell {
        Data::Float(f) => is_whole(*f),
        _ => true,
    });
    let as_float = numeric_only && (!all_whole || cells.iter().any(|c| is_gap(&c)));

    cells
        .iter()
        .map(|cell| match cell {
            None | Some(Data::Empty) => CellValue::Null,
            Some(Data::Int(i)) if as_float => CellValue::Float(*i as f64),
            Some(Data::Float(f)) if as_float => CellValue::Float(*f),
            Some(Data::Float(f)) if is_whole(*f) => CellValue::Integer(*f as i64),
            Some(cell) => cell_value(cell),
        })
        .collect()
}

fn is_whole(f: f64) -> bool {
    f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::DateTime(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::DateTime(s.replace('T', " ")),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            log::warn!("spreadsheet error cell {e:?} kept as text");
            CellValue::Text(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn first_sheet_is_skipped() {
        let names = vec!["Index".to_string(), "Sales".to_string(), "Stock".to_string()];
        assert_eq!(data_sheet_names(&names).unwrap(), &names[1..]);
    }

    #[test]
    fn single_sheet_workbook_is_rejected() {
        let names = vec!["Index".to_string()];
        assert!(matches!(
            data_sheet_names(&names).unwrap_err(),
            ReportError::InvalidSelection(_)
        ));
        assert!(data_sheet_names(&[]).is_err());
    }

    #[test]
    fn header_is_trimmed_and_deduplicated() {
        let header = [s(" region "), Data::Empty, s("region"), s("sales")];
        let row = [s("US"), Data::Empty, s("x"), Data::Float(10.0)];
        let rows: Vec<&[Data]> = vec![&header[..], &row[..]];
        let table = sheet_to_table(&rows).unwrap();
        assert_eq!(
            table.column_names(),
            vec!["region", "column_2", "region.1", "sales"]
        );
    }

    #[test]
    fn filled_whole_number_columns_become_integers() {
        let header = [s("a"), s("b")];
        let r1 = [Data::Float(10.0), Data::Float(1.5)];
        let r2 = [Data::Float(3.0), Data::Int(2)];
        let rows: Vec<&[Data]> = vec![&header[..], &r1[..], &r2[..]];
        let table = sheet_to_table(&rows).unwrap();

        let a = &table.column("a").unwrap().values;
        assert_eq!(a, &vec![CellValue::Integer(10), CellValue::Integer(3)]);
        let b = &table.column("b").unwrap().values;
        assert_eq!(b, &vec![CellValue::Float(1.5), CellValue::Float(2.0)]);
        assert_eq!(b[1].to_string(), "2.0");
    }

    #[test]
    fn numeric_column_with_gap_stays_float() {
        let header = [s("a")];
        let r1 = [Data::Float(10.0)];
        let r2 = [Data::Empty];
        let r3 = [Data::Int(4)];
        let rows: Vec<&[Data]> = vec![&header[..], &r1[..], &r2[..], &r3[..]];
        let table = sheet_to_table(&rows).unwrap();

        let a = &table.column("a").unwrap().values;
        assert_eq!(
            a,
            &vec![CellValue::Float(10.0), CellValue::Null, CellValue::Float(4.0)]
        );
        assert_eq!(a[0].to_string(), "10.0");
    }

    #[test]
    fn whole_numbers_in_text_columns_print_as_integers() {
        let header = [s("code")];
        let r1 = [s("A-1")];
        let r2 = [Data::Float(10.0)];
        let r3 = [Data::Float(2.5)];
        let rows: Vec<&[Data]> = vec![&header[..], &r1[..], &r2[..], &r3[..]];
        let table = sheet_to_table(&rows).unwrap();

        let code: Vec<String> = table
            .column("code")
            .unwrap()
            .values
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(code, vec!["A-1", "10", "2.5"]);
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let header = [s("a"), s("b")];
        let r1 = [s("x")];
        let rows: Vec<&[Data]> = vec![&header[..], &r1[..]];
        let table = sheet_to_table(&rows).unwrap();
        assert_eq!(table.column("b").unwrap().values, vec![CellValue::Null]);
    }

    #[test]
    fn missing_spreadsheet_is_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_workbook(&dir.path().join("nope.xlsx"), dir.path()).unwrap_err();
        assert!(matches!(err, ReportError::MissingFile { .. }));
    }
}
