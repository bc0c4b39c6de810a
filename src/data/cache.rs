use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, GenericStringArray, Int64Array,
    OffsetSizeTrait, StringArray,
};
use arrow::datatypes::{DataType, Field, Float64Type, Int64Type, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;

use super::model::{CellValue, Column, Table};
use crate::error::{ReportError, Result};

/// Extension of cache files in the data directory.
pub const CACHE_EXTENSION: &str = "parquet";

/// Field metadata key marking Utf8 columns that hold date-times.
const KIND_KEY: &str = "sheet_report.kind";
const DATETIME_KIND: &str = "datetime";

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

fn has_cache_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(CACHE_EXTENSION))
}

/// List the cache files in `dir`, sorted by path.
///
/// A missing directory, or one without cache files, is a `MissingFile` error.
pub fn list_cache_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ReportError::missing_file(dir, "cache directory not found"));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_cache_extension(&path) {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ReportError::missing_file(dir, "no cached tables found"));
    }
    Ok(files)
}

/// Display name of a cached table: the file stem, which is the sheet name.
pub fn table_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Cache path for a sheet. Path separators in the name are replaced.
pub fn cache_path(dir: &Path, sheet: &str) -> PathBuf {
    let safe: String = sheet
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    dir.join(format!("{safe}.{CACHE_EXTENSION}"))
}

// ---------------------------------------------------------------------------
// Table → Arrow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StorageKind {
    Int64,
    Float64,
    Boolean,
    DateTime,
    Utf8,
}

/// Pick one Arrow type for a column. Integers mixed with floats widen to
/// Float64; any other mix is stored as text.
fn storage_kind(values: &[CellValue]) -> StorageKind {
    use StorageKind::*;
    let mut kind: Option<StorageKind> = None;
    for v in values {
        let this = match v {
            CellValue::Null => continue,
            CellValue::Integer(_) => Int64,
            CellValue::Float(_) => Float64,
            CellValue::Bool(_) => Boolean,
            CellValue::DateTime(_) => DateTime,
            CellValue::Text(_) => Utf8,
        };
        kind = Some(match (kind, this) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(Int64), Float64) | (Some(Float64), Int64) => Float64,
            _ => return Utf8,
        });
    }
    kind.unwrap_or(Utf8)
}

fn encode_column(column: &Column) -> (Field, ArrayRef) {
    let values = &column.values;
    let kind = storage_kind(values);
    let text = || {
        StringArray::from_iter(values.iter().map(|v| match v {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }))
    };

    let (data_type, array): (DataType, ArrayRef) = match kind {
        StorageKind::Int64 => (
            DataType::Int64,
            Arc::new(Int64Array::from_iter(values.iter().map(|v| match v {
                CellValue::Integer(i) => Some(*i),
                _ => None,
            }))),
        ),
        StorageKind::Float64 => (
            DataType::Float64,
            Arc::new(Float64Array::from_iter(values.iter().map(|v| match v {
                CellValue::Float(f) => Some(*f),
                CellValue::Integer(i) => Some(*i as f64),
                _ => None,
            }))),
        ),
        StorageKind::Boolean => (
            DataType::Boolean,
            Arc::new(BooleanArray::from_iter(values.iter().map(|v| match v {
                CellValue::Bool(b) => Some(*b),
                _ => None,
            }))),
        ),
        StorageKind::DateTime | StorageKind::Utf8 => (DataType::Utf8, Arc::new(text())),
    };

    let mut field = Field::new(column.name.clone(), data_type, true);
    if kind == StorageKind::DateTime {
        field = field.with_metadata(HashMap::from([(
            KIND_KEY.to_string(),
            DATETIME_KIND.to_string(),
        )]));
    }
    (field, array)
}

/// Convert a table into a single Arrow record batch.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) =
        table.columns().iter().map(encode_column).unzip();
    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(table.len()));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

// ---------------------------------------------------------------------------
// Arrow → Table
// ---------------------------------------------------------------------------

fn push_strings<O: OffsetSizeTrait>(
    out: &mut Vec<CellValue>,
    array: &GenericStringArray<O>,
    is_datetime: bool,
) {
    out.extend(array.iter().map(|v| match v {
        None => CellValue::Null,
        Some(s) if is_datetime => CellValue::DateTime(s.to_string()),
        Some(s) => CellValue::Text(s.to_string()),
    }));
}

/// Append the cells of one Arrow column to `out`.
fn decode_column(out: &mut Vec<CellValue>, field: &Field, array: &ArrayRef) -> Result<()> {
    let is_datetime = field
        .metadata()
        .get(KIND_KEY)
        .is_some_and(|k| k == DATETIME_KIND);

    match array.data_type() {
        DataType::Utf8 => push_strings(out, array.as_string::<i32>(), is_datetime),
        DataType::LargeUtf8 => push_strings(out, array.as_string::<i64>(), is_datetime),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => {
            let cast = arrow::compute::cast(array, &DataType::Int64)?;
            out.extend(
                cast.as_primitive::<Int64Type>()
                    .iter()
                    .map(|v| v.map_or(CellValue::Null, CellValue::Integer)),
            );
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let cast = arrow::compute::cast(array, &DataType::Float64)?;
            out.extend(
                cast.as_primitive::<Float64Type>()
                    .iter()
                    .map(|v| v.map_or(CellValue::Null, CellValue::Float)),
            );
        }
        DataType::Boolean => {
            out.extend(
                array
                    .as_boolean()
                    .iter()
                    .map(|v| v.map_or(CellValue::Null, CellValue::Bool)),
            );
        }
        other => {
            log::debug!("column '{}' of type {other:?} read as text", field.name());
            for row in 0..array.len() {
                if array.is_null(row) {
                    out.push(CellValue::Null);
                } else {
                    out.push(CellValue::Text(array_value_to_string(array.as_ref(), row)?));
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet files
// ---------------------------------------------------------------------------

/// Write a table to a Parquet cache file, replacing any existing file.
pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    log::debug!("wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Load a whole cache file into a table. Column names are trimmed.
pub fn load_table(path: &Path) -> Result<Table> {
    if !path.is_file() {
        return Err(ReportError::missing_file(path, "cache file not found"));
    }

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let mut columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|f| Column::new(f.name().clone(), Vec::new()))
        .collect();

    for batch_result in reader {
        let batch = batch_result?;
        for (i, field) in schema.fields().iter().enumerate() {
            decode_column(&mut columns[i].values, field, batch.column(i))?;
        }
    }

    let table = Table::new(columns)?;
    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        table.len(),
        table.column_names(),
        path.display()
    );
    Ok(table)
}
