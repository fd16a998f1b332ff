use std::path::Path;

use tracing::{info, warn};

use crate::domain::employee::EmployeeTable;
use crate::domain::error::Result;
use crate::domain::schema::SchemaReport;
use crate::infrastructure::spreadsheet::read_table;

/// A freshly read table and its schema check
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: EmployeeTable,
    pub schema: SchemaReport,
}

pub struct LoadUseCase;

impl LoadUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, path: &Path) -> Result<LoadOutcome> {
        let table = read_table(path)?;
        let schema = SchemaReport::check(&table);

        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.columns().len(),
            "Spreadsheet loaded"
        );
        if !schema.is_valid() {
            warn!(
                path = %path.display(),
                missing = ?schema.missing,
                "Spreadsheet lacks required columns"
            );
        }

        Ok(LoadOutcome { table, schema })
    }
}
