// ============================================================
// SPREADSHEET INFRASTRUCTURE LAYER
// ============================================================
// Turns a workbook or CSV file on disk into an EmployeeTable

mod csv_reader;
mod workbook;

pub use csv_reader::CsvTableReader;
pub use workbook::WorkbookReader;

use std::path::Path;

use crate::domain::employee::{CellValue, EmployeeTable};
use crate::domain::error::{AppError, Result};

/// Read the first sheet of `path`, choosing the reader by extension
pub fn read_table(path: &Path) -> Result<EmployeeTable> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") => CsvTableReader::new().read(path),
        Some("xlsx") | Some("xlsm") | Some("xlsb") | Some("xls") | Some("ods") => {
            WorkbookReader::new().read(path)
        }
        Some(other) => Err(AppError::LoadError(format!(
            "Unsupported file type '.{}' for {}",
            other,
            path.display()
        ))),
        None => Err(AppError::LoadError(format!(
            "Cannot determine file type of {}",
            path.display()
        ))),
    }
}

/// Assemble a table from raw rows: the first row is the header,
/// fully blank rows are dropped.
fn table_from_rows<I>(mut rows: I, source: &Path) -> Result<EmployeeTable>
where
    I: Iterator<Item = Vec<CellValue>>,
{
    let header = rows
        .find(|row| !row.iter().all(CellValue::is_empty))
        .ok_or_else(|| {
            AppError::LoadError(format!("No header row found in {}", source.display()))
        })?;

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            cell.as_label()
                .map(|label| label.trim().to_string())
                .unwrap_or_else(|| format!("Unnamed: {}", idx))
        })
        .collect();

    let data = rows
        .filter(|row| !row.iter().all(CellValue::is_empty))
        .collect();

    Ok(EmployeeTable::new(columns, data))
}
