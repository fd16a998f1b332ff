// ============================================================
// CSV READER
// ============================================================
// Delimited text input with encoding fallback and delimiter detection

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::domain::employee::{CellValue, EmployeeTable};
use crate::domain::error::{AppError, Result};

/// CSV reader producing typed cells; the delimiter is detected per file
#[derive(Debug, Default)]
pub struct CsvTableReader;

impl CsvTableReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self, path: &Path) -> Result<EmployeeTable> {
        let bytes = fs::read(path).map_err(|e| {
            AppError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let content = Self::decode(&bytes);
        self.read_content(&content, path)
    }

    fn read_content(&self, content: &str, source: &Path) -> Result<EmployeeTable> {
        let delimiter = Self::detect_delimiter(content);

        debug!(path = %source.display(), delimiter = %(delimiter as char), "Parsing CSV");

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::LoadError(format!(
                    "Failed to parse CSV row {} of {}: {}",
                    index + 1,
                    source.display(),
                    e
                ))
            })?;
            rows.push(record.iter().map(Self::convert_field).collect::<Vec<_>>());
        }

        super::table_from_rows(rows.into_iter(), source)
    }

    /// UTF-8 (with or without BOM), falling back to Windows-1252
    fn decode(bytes: &[u8]) -> String {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        match std::str::from_utf8(bytes) {
            Ok(content) => content.to_string(),
            Err(_) => {
                let (decoded, _, _) = WINDOWS_1252.decode(bytes);
                decoded.into_owned()
            }
        }
    }

    fn convert_field(field: &str) -> CellValue {
        if field.is_empty() {
            return CellValue::Empty;
        }
        match field {
            "TRUE" | "True" | "true" => return CellValue::Bool(true),
            "FALSE" | "False" | "false" => return CellValue::Bool(false),
            _ => {}
        }
        match field.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(field.to_string()),
        }
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}
