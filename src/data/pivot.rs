use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use super::model::{CellValue, Column, Table};
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Aggregation kinds
// ---------------------------------------------------------------------------

/// Supported pivot aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    Sum,
    Count,
    Mean,
    Size,
    Min,
    Max,
}

impl Aggregation {
    pub const ALL: [Aggregation; 6] = [
        Aggregation::Sum,
        Aggregation::Count,
        Aggregation::Mean,
        Aggregation::Size,
        Aggregation::Min,
        Aggregation::Max,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Count => "count",
            Aggregation::Mean => "mean",
            Aggregation::Size => "size",
            Aggregation::Min => "min",
            Aggregation::Max => "max",
        }
    }

    /// Reduce the values of one (index, column) group.
    /// `None` means the group produced no value (all inputs missing).
    fn reduce(self, values: &[&CellValue]) -> Result<Option<CellValue>> {
        let present: Vec<&CellValue> = values
            .iter()
            .copied()
            .filter(|v| !v.is_missing())
            .collect();
        match self {
            Aggregation::Size => Ok(Some(CellValue::Integer(values.len() as i64))),
            Aggregation::Count => Ok(Some(CellValue::Integer(present.len() as i64))),
            Aggregation::Sum => {
                if present.is_empty() {
                    return Ok(None);
                }
                let nums = numeric(&present, self)?;
                let ints: Option<Vec<i64>> = present
                    .iter()
                    .map(|v| match v {
                        CellValue::Integer(i) => Some(*i),
                        CellValue::Bool(b) => Some(i64::from(*b)),
                        _ => None,
                    })
                    .collect();
                // Integer totals that overflow fall back to a float sum.
                let total = ints.and_then(|ints| {
                    ints.iter().try_fold(0i64, |acc, &i| acc.checked_add(i))
                });
                match total {
                    Some(total) => Ok(Some(CellValue::Integer(total))),
                    None => Ok(Some(CellValue::Float(nums.iter().sum()))),
                }
            }
            Aggregation::Mean => {
                if present.is_empty() {
                    return Ok(None);
                }
                let nums = numeric(&present, self)?;
                Ok(Some(CellValue::Float(nums.iter().sum::<f64>() / nums.len() as f64)))
            }
            Aggregation::Min | Aggregation::Max => {
                let all_text = present.iter().all(|v| matches!(v, CellValue::Text(_)));
                let all_dates = present.iter().all(|v| matches!(v, CellValue::DateTime(_)));
                if !(all_text || all_dates) {
                    numeric(&present, self)?;
                }
                let pick = if self == Aggregation::Min {
                    present.iter().min()
                } else {
                    present.iter().max()
                };
                Ok(pick.map(|v| (*v).clone()))
            }
        }
    }
}

/// Numeric view of the values, failing on the first non-numeric one.
fn numeric(values: &[&CellValue], agg: Aggregation) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| {
            v.as_f64().ok_or_else(|| {
                ReportError::AggregationFailure(format!(
                    "'{}' cannot aggregate non-numeric value '{v}'",
                    agg.name()
                ))
            })
        })
        .collect()
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aggregation {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Aggregation::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| {
                ReportError::AggregationFailure(format!("unsupported aggregation function '{s}'"))
            })
    }
}

// ---------------------------------------------------------------------------
// Pivot request / result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRequest {
    pub index: String,
    pub columns: String,
    /// Column whose values are aggregated; `None` counts rows per pair.
    pub values: Option<String>,
    pub aggregation: Aggregation,
}

/// Dense cross-tabulation. `cells[r][c]` belongs to `row_labels[r]` and
/// `column_labels[c]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub index_name: String,
    pub columns_name: String,
    pub row_labels: Vec<CellValue>,
    pub column_labels: Vec<CellValue>,
    pub cells: Vec<Vec<CellValue>>,
}

impl PivotTable {
    /// Look up a cell by the textual form of its labels.
    pub fn get(&self, row: &str, column: &str) -> Option<&CellValue> {
        let r = self.row_labels.iter().position(|l| l.to_string() == row)?;
        let c = self.column_labels.iter().position(|l| l.to_string() == column)?;
        Some(&self.cells[r][c])
    }

    /// Flatten into a table whose first column holds the row labels.
    ///
    /// Labels that print alike once trimmed get `.1`, `.2`, ... suffixes so
    /// every column keeps its own name.
    pub fn to_table(&self) -> Result<Table> {
        let mut columns = Vec::with_capacity(self.column_labels.len() + 1);
        columns.push(Column::new(
            self.index_name.clone(),
            self.row_labels.clone(),
        ));
        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(self.index_name.trim().to_string());
        for (c, label) in self.column_labels.iter().enumerate() {
            let mut base = label.to_string().trim().to_string();
            if base == self.index_name.trim() {
                base = format!("{}={base}", self.columns_name.trim());
            }
            let mut name = base.clone();
            let mut n = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}.{n}");
                n += 1;
            }
            let values = self.cells.iter().map(|row| row[c].clone()).collect();
            columns.push(Column::new(name, values));
        }
        Table::new(columns)
    }
}

/// Cross-tabulate `request.index` against `request.columns`.
///
/// Rows missing either key are dropped; labels are sorted; every index ×
/// column combination without a value is filled with integer zero.
pub fn build_pivot(table: &Table, request: &PivotRequest) -> Result<PivotTable> {
    let index = table.require(&request.index)?;
    let columns = table.require(&request.columns)?;
    let values = request
        .values
        .as_deref()
        .map(|name| table.require(name))
        .transpose()?;

    let mut groups: BTreeMap<(&CellValue, &CellValue), Vec<&CellValue>> = BTreeMap::new();
    let mut row_labels = BTreeSet::new();
    let mut column_labels = BTreeSet::new();

    for row in 0..table.len() {
        let key_r = &index.values[row];
        let key_c = &columns.values[row];
        if key_r.is_missing() || key_c.is_missing() {
            continue;
        }
        row_labels.insert(key_r);
        column_labels.insert(key_c);
        let group = groups.entry((key_r, key_c)).or_default();
        // Without a values column every row counts once.
        group.push(values.map_or(key_r, |v| &v.values[row]));
    }

    let row_labels: Vec<&CellValue> = row_labels.into_iter().collect();
    let column_labels: Vec<&CellValue> = column_labels.into_iter().collect();
    let zero = CellValue::Integer(0);

    let mut cells = Vec::with_capacity(row_labels.len());
    for r in &row_labels {
        let mut out_row = Vec::with_capacity(column_labels.len());
        for c in &column_labels {
            let cell = match groups.get(&(*r, *c)) {
                Some(group) if values.is_some() => request.aggregation.reduce(group)?,
                Some(group) => Some(CellValue::Integer(group.len() as i64)),
                None => None,
            };
            out_row.push(cell.unwrap_or_else(|| zero.clone()));
        }
        cells.push(out_row);
    }

    log::debug!(
        "pivot {} x {} ({}): {} rows, {} columns",
        request.index,
        request.columns,
        request.aggregation,
        row_labels.len(),
        column_labels.len()
    );

    Ok(PivotTable {
        index_name: request.index.clone(),
        columns_name: request.columns.clone(),
        row_labels: row_labels.into_iter().cloned().collect(),
        column_labels: column_labels.into_iter().cloned().collect(),
        cells,
    })
}
