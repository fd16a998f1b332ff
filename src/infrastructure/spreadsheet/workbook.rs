use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::domain::employee::{CellValue, EmployeeTable};
use crate::domain::error::{AppError, Result};

/// Reads the first worksheet of an Excel or OpenDocument workbook
#[derive(Debug, Default)]
pub struct WorkbookReader;

impl WorkbookReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&self, path: &Path) -> Result<EmployeeTable> {
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            AppError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                AppError::LoadError(format!("No worksheet found in {}", path.display()))
            })?
            .map_err(|e| {
                AppError::LoadError(format!(
                    "Failed to read first sheet of {}: {}",
                    path.display(),
                    e
                ))
            })?;

        debug!(
            path = %path.display(),
            height = range.height(),
            width = range.width(),
            "Read worksheet range"
        );

        let rows = range
            .rows()
            .map(|row| row.iter().map(Self::convert_cell).collect::<Vec<_>>());

        super::table_from_rows(rows, path)
    }

    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) if s.trim().is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Bool(b) => CellValue::Bool(*b),
            // Formula errors (#N/A, #DIV/0!) count as missing
            Data::Error(_) | Data::Empty => CellValue::Empty,
            other => CellValue::Text(other.to_string()),
        }
    }
}
