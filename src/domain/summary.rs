use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregates derived from an `EmployeeTable`. Always rebuilt wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Mean of the numeric `Salary` cells; `NaN` when there are none
    pub average_salary: f64,
    /// Rows per non-empty `Department` value. Iteration order is unspecified.
    pub department_distribution: HashMap<String, usize>,
    /// Rows in the table the statistics were computed from
    pub row_count: usize,
}

impl SummaryStatistics {
    /// Distribution ordered by count (highest first), then by name
    pub fn sorted_distribution(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .department_distribution
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn counted_employees(&self) -> usize {
        self.department_distribution.values().sum()
    }

    /// `{'Eng': 2, 'Sales': 1}`
    pub fn render_distribution(&self) -> String {
        let body = self
            .sorted_distribution()
            .into_iter()
            .map(|(name, count)| format!("{}: {}", quote_label(name), count))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", body)
    }
}

/// Quote a label the way a Python `repr` of a string does: single quotes
/// unless the label contains one and no double quote.
fn quote_label(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\");
    if name.contains('\'') && !name.contains('"') {
        format!("\"{}\"", escaped)
    } else {
        format!("'{}'", escaped.replace('\'', "\\'"))
    }
}

/// Prose returned by the generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSummary {
    pub text: String,
    pub model: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl NarrativeSummary {
    pub fn new(text: String, model: String) -> Self {
        Self {
            text,
            model,
            generated_at: chrono::Utc::now(),
        }
    }
}
