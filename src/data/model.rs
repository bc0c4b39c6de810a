use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value covering what spreadsheet cells hold.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date-time kept as `YYYY-MM-DD HH:MM:SS` text.
    DateTime(String),
    Null,
}

// -- Manual Eq/Ord/Hash so we can put CellValue in BTreeSet and HashSet --

/// `-0.0` compares and hashes as `0.0`; every NaN as the canonical NaN.
fn float_key(v: f64) -> f64 {
    if v.is_nan() {
        f64::NAN
    } else if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                Text(_) => 3,
                DateTime(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => float_key(*a).total_cmp(&float_key(*b)),
            // Integers and floats share one numeric axis; ties keep integers first.
            (Integer(a), Float(b)) => (*a as f64)
                .total_cmp(&float_key(*b))
                .then(Ordering::Less),
            (Float(a), Integer(b)) => float_key(*a)
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            (Text(a), Text(b)) | (DateTime(a), DateTime(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => float_key(*f).to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// The textual form used for display *and* for filter comparison.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) | CellValue::DateTime(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{}", format_float(*v)),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Null => Ok(()),
        }
    }
}

/// Whole floats keep a trailing `.0` so `1.0` and `1` stay distinguishable.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

impl CellValue {
    /// Null and NaN both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Interpret the value as an `f64` for numeric aggregation and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Column – one named column of a table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An in-memory columnar table. Column names are trimmed and unique, and all
/// columns have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table, trimming column names and validating the invariants.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        let mut seen = HashSet::with_capacity(columns.len());
        let mut trimmed = Vec::with_capacity(columns.len());

        for mut col in columns {
            col.name = col.name.trim().to_string();
            if !seen.insert(col.name.clone()) {
                return Err(ReportError::InvalidTable(format!(
                    "duplicate column '{}'",
                    col.name
                )));
            }
            if col.values.len() != n_rows {
                return Err(ReportError::InvalidTable(format!(
                    "column '{}' has {} rows, expected {n_rows}",
                    col.name,
                    col.values.len()
                )));
            }
            trimmed.push(col);
        }

        Ok(Table {
            columns: trimmed,
            n_rows,
        })
    }

    /// A table with the given columns and no rows.
    pub fn empty(names: &[String]) -> Result<Self> {
        Table::new(names.iter().map(|n| Column::new(n.clone(), Vec::new())).collect())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Ordered list of column names.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Like [`Table::column`] but reports a missing column as an error.
    pub fn require(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| ReportError::unknown_column(name))
    }

    /// Values of one row, in column order.
    pub fn row(&self, index: usize) -> Vec<&CellValue> {
        self.columns.iter().map(|c| &c.values[index]).collect()
    }

    /// Sorted distinct textual forms of the non-missing values in a column.
    /// Used to offer filter choices.
    pub fn distinct_text(&self, name: &str) -> Result<Vec<String>> {
        let column = self.require(name)?;
        let set: BTreeSet<String> = column
            .values
            .iter()
            .filter(|v| !v.is_missing())
            .map(|v| v.to_string())
            .collect();
        Ok(set.into_iter().collect())
    }

    /// Keep only the given rows (in the given order) of the named columns.
    pub fn select(&self, rows: &[usize], names: &[String]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|name| {
                let src = self.require(name)?;
                let values = rows.iter().map(|&r| src.values[r].clone()).collect();
                Ok(Column::new(name.clone(), values))
            })
            .collect::<Result<Vec<_>>>()?;
        Table::new(columns)
    }
}
