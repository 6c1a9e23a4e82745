use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::ApiResult;
use crate::model::CollegeTable;

/// Supplies the college table to the request handler.
pub trait CollegeSource: Send + Sync {
    fn load(&self) -> ApiResult<Arc<CollegeTable>>;
}

/// Reads and parses the CSV on every call, so edits to the file show up on
/// the next request.
#[derive(Clone, Debug)]
pub struct CsvCollegeSource {
    path: PathBuf,
}

impl CsvCollegeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CollegeSource for CsvCollegeSource {
    fn load(&self) -> ApiResult<Arc<CollegeTable>> {
        let table = CollegeTable::from_csv(&self.path)?;
        debug!(
            path = %self.path.display(),
            records = table.records().len(),
            categories = table.categories().len(),
            "college table loaded"
        );
        Ok(Arc::new(table))
    }
}

/// A table parsed once and shared read-only.
#[derive(Clone, Debug)]
pub struct SnapshotCollegeSource {
    table: Arc<CollegeTable>,
}

impl SnapshotCollegeSource {
    pub fn new(table: CollegeTable) -> Self {
        Self {
            table: Arc::new(table),
        }
    }
}

impl CollegeSource for SnapshotCollegeSource {
    fn load(&self) -> ApiResult<Arc<CollegeTable>> {
        Ok(Arc::clone(&self.table))
    }
}
