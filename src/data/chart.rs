use std::collections::HashMap;

use chrono::NaiveDateTime;

use super::model::{CellValue, Column, Table};
use crate::error::{ReportError, Result, NO_DATA};

/// Chart kinds offered by the report tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Scatter,
    Pie,
    Bar,
}

impl ChartKind {
    /// How many columns the selection form must collect.
    pub fn required_columns(self) -> usize {
        match self {
            ChartKind::Scatter => 2,
            ChartKind::Pie | ChartKind::Bar => 1,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Bar => "Bar Chart",
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Points ready for a scatter plot, plus the axis names.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterData {
    pub x_name: String,
    pub y_name: String,
    pub points: Vec<[f64; 2]>,
}

/// Place each row on numeric axes. Date-times become seconds since the epoch.
fn axis_value(column: &Column, value: &CellValue) -> Result<Option<f64>> {
    if value.is_missing() {
        return Ok(None);
    }
    if let Some(v) = value.as_f64() {
        return Ok(Some(v));
    }
    if let CellValue::DateTime(s) = value {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(Some(dt.and_utc().timestamp() as f64));
        }
    }
    Err(ReportError::RenderFailure(format!(
        "column '{}' holds non-numeric value '{value}'",
        column.name
    )))
}

/// Collect (x, y) pairs; rows missing either coordinate are skipped.
pub fn scatter_points(table: &Table, x: &str, y: &str) -> Result<ScatterData> {
    let xs = table.require(x)?;
    let ys = table.require(y)?;

    let mut points = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let px = axis_value(xs, &xs.values[row])?;
        let py = axis_value(ys, &ys.values[row])?;
        if let (Some(px), Some(py)) = (px, py) {
            points.push([px, py]);
        }
    }
    if points.is_empty() {
        return Err(ReportError::RenderFailure(NO_DATA.to_string()));
    }

    Ok(ScatterData {
        x_name: x.to_string(),
        y_name: y.to_string(),
        points,
    })
}

// ---------------------------------------------------------------------------
// Distribution (pie / bar)
// ---------------------------------------------------------------------------

/// Value → count, in the order values were first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub column: String,
    pub counts: Vec<(String, usize)>,
}

impl Distribution {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Share of each value as a pie label, e.g. `US (66.7%)`.
    pub fn percent_labels(&self) -> Vec<String> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|(label, n)| format!("{label} ({:.1}%)", *n as f64 * 100.0 / total))
            .collect()
    }
}

/// Frequency of each distinct non-missing value of `column`.
pub fn value_counts(table: &Table, column: &str) -> Result<Distribution> {
    let col = table.require(column)?;

    let mut position: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in col.values.iter().filter(|v| !v.is_missing()) {
        let label = value.to_string();
        match position.get(&label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }

    if counts.is_empty() {
        return Err(ReportError::RenderFailure(NO_DATA.to_string()));
    }
    Ok(Distribution {
        column: column.to_string(),
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::new(vec![
            Column::new("region", vec!["US".into(), "US".into(), "EU".into()]),
            Column::new("sales", vec![10i64.into(), 5i64.into(), 7.5f64.into()]),
            Column::new("units", vec![1i64.into(), CellValue::Null, 3i64.into()]),
            Column::new(
                "when",
                vec![
                    CellValue::DateTime("1970-01-01 00:00:10".into()),
                    CellValue::Null,
                    CellValue::Null,
                ],
            ),
            Column::new("empty", vec![CellValue::Null, CellValue::Null, CellValue::Null]),
        ])
        .unwrap()
    }

    #[test]
    fn counts_keep_discovery_order() {
        let dist = value_counts(&table(), "region").unwrap();
        assert_eq!(dist.counts, vec![("US".to_string(), 2), ("EU".to_string(), 1)]);
        assert_eq!(dist.total(), 3);
        assert_eq!(dist.percent_labels()[1], "EU (33.3%)");
    }

    #[test]
    fn empty_distribution_is_no_data() {
        let err = value_counts(&table(), "empty").unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn scatter_skips_missing_rows() {
        let data = scatter_points(&table(), "sales", "units").unwrap();
        assert_eq!(data.points, vec![[10.0, 1.0], [7.5, 3.0]]);
    }

    #[test]
    fn scatter_places_datetimes() {
        let data = scatter_points(&table(), "when", "sales").unwrap();
        assert_eq!(data.points, vec![[10.0, 10.0]]);
    }

    #[test]
    fn scatter_of_text_fails_for_that_chart() {
        let err = scatter_points(&table(), "region", "sales").unwrap_err();
        assert!(matches!(err, ReportError::RenderFailure(_)));
        assert!(!err.is_no_data());
    }

    #[test]
    fn selection_contract() {
        assert_eq!(ChartKind::Scatter.required_columns(), 2);
        assert_eq!(ChartKind::Pie.required_columns(), 1);
        assert_eq!(ChartKind::Bar.required_columns(), 1);
    }
}
