use std::collections::HashSet;

use super::model::Table;
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Filter predicate: column equals value, compared as text
// ---------------------------------------------------------------------------

/// Matches rows whose value in `column`, converted to text, equals `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriterion {
    pub column: String,
    pub value: String,
}

impl FilterCriterion {
    pub fn new(column: impl Into<String>, value: impl Into<String>) -> Self {
        FilterCriterion {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Conjunction of criteria, in the order the user picked the columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    criteria: Vec<FilterCriterion>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<C, V>(pairs: impl IntoIterator<Item = (C, V)>) -> Self
    where
        C: Into<String>,
        V: Into<String>,
    {
        FilterSet {
            criteria: pairs
                .into_iter()
                .map(|(c, v)| FilterCriterion::new(c, v))
                .collect(),
        }
    }

    /// Add a criterion. A second criterion on the same column replaces the first.
    pub fn push(&mut self, criterion: FilterCriterion) {
        match self.criteria.iter_mut().find(|c| c.column == criterion.column) {
            Some(existing) => existing.value = criterion.value,
            None => self.criteria.push(criterion),
        }
    }

    pub fn criteria(&self) -> &[FilterCriterion] {
        &self.criteria
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ReportRequest – filters plus the columns to show
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub filters: FilterSet,
    pub display_columns: Vec<String>,
}

impl ReportRequest {
    /// Build a request, rejecting an empty filter set or display list.
    pub fn new(filters: FilterSet, display_columns: Vec<String>) -> Result<Self> {
        if filters.is_empty() {
            return Err(ReportError::InvalidSelection(
                "select at least one filter column".to_string(),
            ));
        }
        if display_columns.is_empty() {
            return Err(ReportError::InvalidSelection(
                "select at least one display column".to_string(),
            ));
        }
        Ok(ReportRequest {
            filters,
            display_columns,
        })
    }

    pub fn apply(&self, table: &Table) -> Result<Table> {
        apply_filter(table, &self.filters, &self.display_columns)
    }
}

/// Return indices of rows that pass every criterion, in table order.
///
/// An empty filter set is rejected rather than treated as "match all".
pub fn matching_rows(table: &Table, filters: &FilterSet) -> Result<Vec<usize>> {
    if filters.is_empty() {
        return Err(ReportError::InvalidSelection(
            "select at least one filter column".to_string(),
        ));
    }

    let resolved = filters
        .criteria()
        .iter()
        .map(|c| Ok((table.require(&c.column)?, c.value.as_str())))
        .collect::<Result<Vec<_>>>()?;

    Ok((0..table.len())
        .filter(|&row| {
            resolved
                .iter()
                .all(|(col, target)| col.values[row].to_string() == *target)
        })
        .collect())
}

/// Select the rows matching `filters` and project them onto `display_columns`.
///
/// Zero matching rows is not an error: the result keeps the display columns.
pub fn apply_filter(
    table: &Table,
    filters: &FilterSet,
    display_columns: &[String],
) -> Result<Table> {
    if display_columns.is_empty() {
        return Err(ReportError::InvalidSelection(
            "select at least one display column".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for name in display_columns {
        table.require(name)?;
        if !seen.insert(name.as_str()) {
            return Err(ReportError::InvalidSelection(format!(
                "column '{name}' selected twice"
            )));
        }
    }

    let rows = matching_rows(table, filters)?;
    log::debug!(
        "filter {:?} matched {} of {} rows",
        filters.criteria(),
        rows.len(),
        table.len()
    );
    table.select(&rows, display_columns)
}
