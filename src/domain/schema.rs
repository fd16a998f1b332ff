use serde::{Deserialize, Serialize};

use super::employee::EmployeeTable;
use super::error::{AppError, Result};

pub const SALARY_COLUMN: &str = "Salary";
pub const DEPARTMENT_COLUMN: &str = "Department";

/// Columns the aggregation step reads
pub const REQUIRED_COLUMNS: [&str; 2] = [SALARY_COLUMN, DEPARTMENT_COLUMN];

/// Outcome of checking a freshly loaded table against the required columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaReport {
    pub missing: Vec<String>,
}

impl SchemaReport {
    pub fn check(table: &EmployeeTable) -> Self {
        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !table.has_column(name))
            .map(|name| name.to_string())
            .collect();

        Self { missing }
    }

    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    /// Single error naming every missing column at once
    pub fn into_result(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::SchemaError(self.missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::CellValue;

    fn table_with(columns: &[&str]) -> EmployeeTable {
        EmployeeTable::new(
            columns.iter().map(|c| c.to_string()).collect(),
            vec![vec![CellValue::Empty; columns.len()]],
        )
    }

    #[test]
    fn test_complete_schema() {
        let report = SchemaReport::check(&table_with(&["Name", "Department", "Salary"]));
        assert!(report.is_valid());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_reports_all_missing_columns() {
        let report = SchemaReport::check(&table_with(&["Name"]));
        assert_eq!(report.missing, vec!["Salary", "Department"]);
        assert_eq!(
            report.into_result(),
            Err(AppError::SchemaError(vec![
                "Salary".to_string(),
                "Department".to_string()
            ]))
        );
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let report = SchemaReport::check(&table_with(&["salary", "Department"]));
        assert_eq!(report.missing, vec!["Salary"]);
    }
}
