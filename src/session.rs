use std::path::{Path, PathBuf};

use crate::data::cache::{list_cache_files, load_table, table_name};
use crate::data::chart::{scatter_points, value_counts, Distribution, ScatterData};
use crate::data::filter::ReportRequest;
use crate::data::model::Table;
use crate::data::pivot::{build_pivot, PivotRequest, PivotTable};
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Session – owner of the current table
// ---------------------------------------------------------------------------

/// The currently loaded table and where it came from. Every engine call goes
/// through a session reference, so independent sessions never interfere.
#[derive(Debug, Default)]
pub struct Session {
    table: Option<Table>,
    source: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cache file. The current table is only replaced on success.
    pub fn load(&mut self, path: &Path) -> Result<&Table> {
        let table = load_table(path)?;
        self.source = Some(path.to_path_buf());
        Ok(self.table.insert(table))
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// The current table, or an error telling the user to load one first.
    pub fn require_table(&self) -> Result<&Table> {
        self.table.as_ref().ok_or_else(|| {
            ReportError::InvalidSelection("no table loaded; select data first".to_string())
        })
    }

    /// Name of the loaded table (its sheet name).
    pub fn table_name(&self) -> Option<String> {
        self.source.as_deref().map(table_name)
    }

    pub fn text_report(&self, request: &ReportRequest) -> Result<Table> {
        request.apply(self.require_table()?)
    }

    pub fn pivot(&self, request: &PivotRequest) -> Result<PivotTable> {
        build_pivot(self.require_table()?, request)
    }

    pub fn scatter(&self, x: &str, y: &str) -> Result<ScatterData> {
        scatter_points(self.require_table()?, x, y)
    }

    pub fn distribution(&self, column: &str) -> Result<Distribution> {
        value_counts(self.require_table()?, column)
    }
}

/// Cache files available in `dir`, paired with their table names.
pub fn available_tables(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    Ok(list_cache_files(dir)?
        .into_iter()
        .map(|p| (table_name(&p), p))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterSet;

    #[test]
    fn operations_need_a_loaded_table() {
        let session = Session::new();
        let request =
            ReportRequest::new(FilterSet::from_pairs([("a", "1")]), vec!["a".into()]).unwrap();
        assert!(matches!(
            session.text_report(&request).unwrap_err(),
            ReportError::InvalidSelection(_)
        ));
        assert!(session.distribution("a").is_err());
    }

    #[test]
    fn failed_load_keeps_current_table() {
        let mut session = Session::new();
        session.table = Some(Table::empty(&["a".to_string()]).unwrap());
        assert!(session.load(Path::new("/definitely/not/here.parquet")).is_err());
        assert!(session.table().is_some());
    }
}
