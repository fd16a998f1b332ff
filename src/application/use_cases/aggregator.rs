use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::employee::EmployeeTable;
use crate::domain::error::{AppError, Result};
use crate::domain::schema::{SchemaReport, DEPARTMENT_COLUMN, SALARY_COLUMN};
use crate::domain::summary::SummaryStatistics;

/// Mean salary and department headcount over a loaded table
pub struct AggregateUseCase;

impl AggregateUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, table: &EmployeeTable) -> Result<SummaryStatistics> {
        SchemaReport::check(table).into_result()?;

        let average_salary = Self::mean_salary(table)?;
        let department_distribution = Self::department_counts(table)?;

        info!(
            rows = table.row_count(),
            average_salary,
            departments = department_distribution.len(),
            "Summary statistics computed"
        );

        Ok(SummaryStatistics {
            average_salary,
            department_distribution,
            row_count: table.row_count(),
        })
    }

    /// Missing and non-numeric cells are left out of both sum and count.
    fn mean_salary(table: &EmployeeTable) -> Result<f64> {
        let (sum, count) = table
            .column(SALARY_COLUMN)
            .ok_or_else(|| AppError::SchemaError(vec![SALARY_COLUMN.to_string()]))?
            .filter_map(|cell| cell.as_number())
            .fold((0.0f64, 0usize), |(sum, count), n| (sum + n, count + 1));

        if count == 0 {
            warn!("No numeric salary values; average is undefined");
            return Ok(f64::NAN);
        }

        Ok(sum / count as f64)
    }

    fn department_counts(table: &EmployeeTable) -> Result<HashMap<String, usize>> {
        let mut counts = HashMap::new();
        for label in table
            .column(DEPARTMENT_COLUMN)
            .ok_or_else(|| AppError::SchemaError(vec![DEPARTMENT_COLUMN.to_string()]))?
            .filter_map(|cell| cell.as_label())
        {
            *counts.entry(label).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::CellValue;

    fn table(rows: Vec<(CellValue, CellValue)>) -> EmployeeTable {
        EmployeeTable::new(
            vec!["Salary".to_string(), "Department".to_string()],
            rows.into_iter().map(|(s, d)| vec![s, d]).collect(),
        )
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_reference_example() {
        let t = table(vec![
            (CellValue::Number(50000.0), text("Eng")),
            (CellValue::Number(70000.0), text("Eng")),
            (CellValue::Number(60000.0), text("Sales")),
        ]);

        let stats = AggregateUseCase::new().execute(&t).unwrap();
        assert_eq!(format!("{:.2}", stats.average_salary), "60000.00");
        assert_eq!(stats.department_distribution.len(), 2);
        assert_eq!(stats.department_distribution["Eng"], 2);
        assert_eq!(stats.department_distribution["Sales"], 1);
        assert_eq!(stats.row_count, 3);
    }

    #[test]
    fn test_missing_values_are_excluded() {
        let t = table(vec![
            (CellValue::Number(100.0), text("Eng")),
            (CellValue::Empty, text("Eng")),
            (text("n/a"), CellValue::Empty),
            (CellValue::Number(300.0), text("  ")),
        ]);

        let stats = AggregateUseCase::new().execute(&t).unwrap();
        assert_eq!(stats.average_salary, 200.0);
        // Only rows with a department value are counted
        assert_eq!(stats.counted_employees(), 2);
        assert_eq!(stats.department_distribution["Eng"], 2);
    }

    #[test]
    fn test_no_numeric_salaries_gives_nan() {
        let t = table(vec![(CellValue::Empty, text("Eng"))]);
        let stats = AggregateUseCase::new().execute(&t).unwrap();
        assert!(stats.average_salary.is_nan());
    }

    #[test]
    fn test_numeric_departments_are_labelled() {
        let t = table(vec![
            (CellValue::Number(1.0), CellValue::Number(10.0)),
            (CellValue::Number(1.0), text("10")),
        ]);
        let stats = AggregateUseCase::new().execute(&t).unwrap();
        assert_eq!(stats.department_distribution["10"], 2);
    }

    #[test]
    fn test_missing_salary_column() {
        let t = EmployeeTable::new(
            vec!["Department".to_string()],
            vec![vec![text("Eng")]],
        );
        let err = AggregateUseCase::new().execute(&t).unwrap_err();
        assert_eq!(err, AppError::SchemaError(vec!["Salary".to_string()]));
    }

    #[test]
    fn test_idempotent() {
        let t = table(vec![
            (CellValue::Number(1.0), text("A")),
            (CellValue::Number(2.0), text("B")),
        ]);
        let use_case = AggregateUseCase::new();
        assert_eq!(use_case.execute(&t).unwrap(), use_case.execute(&t).unwrap());
    }
}
