use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::data::chart::{ChartKind, Distribution, ScatterData};
use crate::data::filter::{FilterCriterion, FilterSet, ReportRequest};
use crate::data::model::Table;
use crate::data::pivot::{Aggregation, PivotRequest, PivotTable};
use crate::data::report::{export_csv, render_text, NO_MATCHING_ROWS, NO_PIVOT_ROWS};
use crate::error::{ReportError, Result};
use crate::session::{available_tables, Session};
use crate::worker::{spawn_conversion, LoadMessage, PendingLoad};

// ---------------------------------------------------------------------------
// Screens and forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Menu,
    Load,
    Select,
    Report,
}

/// Selection form opened by one of the report buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportForm {
    Chart {
        kind: ChartKind,
        /// One entry per required column; empty string means "not chosen".
        columns: Vec<String>,
    },
    Pivot {
        index: String,
        columns: String,
        values: Option<String>,
        aggregation: String,
    },
}

impl ReportForm {
    pub fn chart(kind: ChartKind) -> Self {
        ReportForm::Chart {
            kind,
            columns: vec![String::new(); kind.required_columns()],
        }
    }

    pub fn pivot() -> Self {
        ReportForm::Pivot {
            index: String::new(),
            columns: String::new(),
            values: None,
            aggregation: Aggregation::Sum.name().to_string(),
        }
    }
}

/// The last rendered result.
#[derive(Debug, Clone)]
pub enum ReportOutput {
    Text { table: Table, text: String },
    Pivot { pivot: PivotTable, table: Table, text: String },
    Scatter(ScatterData),
    Distribution { kind: ChartKind, data: Distribution },
}

impl ReportOutput {
    /// Tabular form of the output, when it has one.
    pub fn table(&self) -> Option<&Table> {
        match self {
            ReportOutput::Text { table, .. } | ReportOutput::Pivot { table, .. } => Some(table),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Owner of the loaded table.
    pub session: Session,

    pub tab: Tab,

    /// Spreadsheet path as typed in the Load tab.
    pub workbook_input: String,

    /// Cache files found in the data directory: (table name, path).
    pub cache_files: Vec<(String, PathBuf)>,

    /// Conversion running in the background, if any.
    pending: Option<PendingLoad>,

    /// Filter columns in the order they were picked.
    pub filter_columns: Vec<String>,

    /// Chosen value per filter column.
    pub filter_values: BTreeMap<String, String>,

    /// Display columns in the order they were picked.
    pub display_columns: Vec<String>,

    pub form: Option<ReportForm>,

    pub output: Option<ReportOutput>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    pub dark_mode: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            workbook_input: config.workbook.display().to_string(),
            dark_mode: config.dark_mode,
            config,
            session: Session::new(),
            tab: Tab::Menu,
            cache_files: Vec::new(),
            pending: None,
            filter_columns: Vec::new(),
            filter_values: BTreeMap::new(),
            display_columns: Vec::new(),
            form: None,
            output: None,
            status: None,
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            message: message.into(),
            is_error: false,
        });
    }

    /// Record a failure. "No data" outcomes are shown as plain information.
    pub fn fail(&mut self, err: &ReportError) {
        if err.is_no_data() {
            self.info("No data for this chart.");
            return;
        }
        log::warn!("{err}");
        self.status = Some(Status {
            message: format!("Error: {err}"),
            is_error: true,
        });
    }

    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.fail(&e);
                None
            }
        }
    }

    // -- Load Data --------------------------------------------------------

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start converting the spreadsheet in the background.
    pub fn start_conversion(&mut self) {
        if self.is_loading() {
            self.info("A conversion is already running.");
            return;
        }
        let workbook = PathBuf::from(self.workbook_input.trim());
        self.pending = Some(spawn_conversion(workbook, self.config.data_dir.clone()));
        self.info("Converting spreadsheet…");
    }

    /// Check whether the background conversion finished. Returns true once
    /// a completion message has been handled.
    pub fn poll_conversion(&mut self) -> bool {
        let Some(msg) = self.pending.as_ref().and_then(PendingLoad::poll) else {
            return false;
        };
        self.pending = None;
        self.handle_load_message(msg);
        true
    }

    /// Block until the background conversion finishes.
    pub fn wait_for_conversion(&mut self) {
        if let Some(pending) = self.pending.take() {
            let msg = pending.wait();
            self.handle_load_message(msg);
        }
    }

    fn handle_load_message(&mut self, msg: LoadMessage) {
        match msg {
            LoadMessage::Converted(paths) => {
                self.info(format!("Saved {} sheet(s) to the cache.", paths.len()));
                self.refresh_cache_files();
            }
            LoadMessage::Failed(reason) => {
                self.status = Some(Status {
                    message: format!("Error: {reason}"),
                    is_error: true,
                });
            }
        }
    }

    // -- Select Data ------------------------------------------------------

    /// Re-list the cache directory.
    pub fn refresh_cache_files(&mut self) {
        let dir = self.config.data_dir.clone();
        self.cache_files = self.report(available_tables(&dir)).unwrap_or_default();
    }

    /// Load a cache file as the current table and reset all selections.
    pub fn select_table(&mut self, path: &Path) {
        let loaded = self
            .session
            .load(path)
            .map(|t| (t.len(), t.column_names().len()));
        if let Some((rows, cols)) = self.report(loaded) {
            self.filter_columns.clear();
            self.filter_values.clear();
            self.display_columns.clear();
            self.form = None;
            self.output = None;
            let name = self.session.table_name().unwrap_or_default();
            self.info(format!("Loaded '{name}': {rows} rows, {cols} columns."));
        }
    }

    // -- Generate Report: selections ---------------------------------------

    pub fn column_names(&self) -> Vec<String> {
        self.session
            .table()
            .map(Table::column_names)
            .unwrap_or_default()
    }

    /// Values a filter column can be set to.
    pub fn filter_choices(&self, column: &str) -> Vec<String> {
        self.session
            .table()
            .and_then(|t| t.distinct_text(column).ok())
            .unwrap_or_default()
    }

    pub fn toggle_filter_column(&mut self, column: &str) {
        if let Some(pos) = self.filter_columns.iter().position(|c| c == column) {
            self.filter_columns.remove(pos);
            self.filter_values.remove(column);
        } else {
            self.filter_columns.push(column.to_string());
            // Preselect the first choice, like a read-only combo box.
            if let Some(first) = self.filter_choices(column).into_iter().next() {
                self.filter_values.insert(column.to_string(), first);
            }
        }
    }

    pub fn set_filter_value(&mut self, column: &str, value: impl Into<String>) {
        self.filter_values.insert(column.to_string(), value.into());
    }

    pub fn toggle_display_column(&mut self, column: &str) {
        if let Some(pos) = self.display_columns.iter().position(|c| c == column) {
            self.display_columns.remove(pos);
        } else {
            self.display_columns.push(column.to_string());
        }
    }

    /// Turn the current selections into a request.
    pub fn report_request(&self) -> Result<ReportRequest> {
        if self.filter_columns.is_empty() {
            return Err(ReportError::InvalidSelection(
                "select at least one filter column".to_string(),
            ));
        }
        let mut filters = FilterSet::new();
        for column in &self.filter_columns {
            let value = match self.filter_values.get(column) {
                Some(v) if !v.trim().is_empty() => v.clone(),
                Some(_) => {
                    return Err(ReportError::InvalidSelection(format!(
                        "filter value for '{column}' is empty"
                    )))
                }
                None => {
                    return Err(ReportError::InvalidSelection(format!(
                        "filter value for '{column}' is missing"
                    )))
                }
            };
            filters.push(FilterCriterion::new(column.clone(), value));
        }
        ReportRequest::new(filters, self.display_columns.clone())
    }

    // -- Generate Report: actions ------------------------------------------

    pub fn run_text_report(&mut self) {
        let result = self.report_request().and_then(|req| {
            let table = self.session.text_report(&req)?;
            let text = render_text(&table, NO_MATCHING_ROWS)?;
            Ok((table, text))
        });
        if let Some((table, text)) = self.report(result) {
            self.info(format!("{} matching row(s).", table.len()));
            self.output = Some(ReportOutput::Text { table, text });
        }
    }

    /// Run the open form, if it is complete.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.clone() else {
            return;
        };
        let result = match &form {
            ReportForm::Chart { kind, columns } => self.chart(*kind, columns),
            ReportForm::Pivot {
                index,
                columns,
                values,
                aggregation,
            } => self.pivot(index, columns, values.as_deref(), aggregation),
        };
        if let Some(output) = self.report(result) {
            self.status = None;
            self.output = Some(output);
            self.form = None;
        }
    }

    fn chart(&self, kind: ChartKind, columns: &[String]) -> Result<ReportOutput> {
        let chosen: Vec<&str> = columns
            .iter()
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .collect();
        if chosen.len() != kind.required_columns() {
            return Err(ReportError::InvalidSelection(format!(
                "{} needs exactly {} column(s)",
                kind.title(),
                kind.required_columns()
            )));
        }
        match kind {
            ChartKind::Scatter => Ok(ReportOutput::Scatter(
                self.session.scatter(chosen[0], chosen[1])?,
            )),
            ChartKind::Pie | ChartKind::Bar => Ok(ReportOutput::Distribution {
                kind,
                data: self.session.distribution(chosen[0])?,
            }),
        }
    }

    fn pivot(
        &self,
        index: &str,
        columns: &str,
        values: Option<&str>,
        aggregation: &str,
    ) -> Result<ReportOutput> {
        if index.is_empty() || columns.is_empty() {
            return Err(ReportError::InvalidSelection(
                "choose both an index and a columns field".to_string(),
            ));
        }
        let request = PivotRequest {
            index: index.to_string(),
            columns: columns.to_string(),
            values: values.filter(|v| !v.is_empty()).map(str::to_string),
            aggregation: aggregation.parse()?,
        };
        let pivot = self.session.pivot(&request)?;
        let table = pivot.to_table()?;
        let text = render_text(&table, NO_PIVOT_ROWS)?;
        Ok(ReportOutput::Pivot { pivot, table, text })
    }

    /// Save the tabular part of the last output as CSV.
    pub fn export_output(&mut self, path: &Path) {
        let result = match self.output.as_ref().and_then(ReportOutput::table) {
            Some(table) => export_csv(table, path),
            None => Err(ReportError::InvalidSelection(
                "nothing to export; run a text report or pivot table first".to_string(),
            )),
        };
        if self.report(result).is_some() {
            self.info(format!("Exported to {}", path.display()));
        }
    }
}
