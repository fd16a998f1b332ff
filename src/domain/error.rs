use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    LoadError(String),
    /// Every required column absent from the loaded table, in declaration order.
    SchemaError(Vec<String>),
    GenerationError(String),
    SequenceError(String),
    ConfigError(String),
    SecurityError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::LoadError(msg) => write!(f, "Error reading spreadsheet: {}", msg),
            AppError::SchemaError(missing) => write!(
                f,
                "Error processing data. Missing column{}: {}",
                if missing.len() == 1 { "" } else { "s" },
                missing
                    .iter()
                    .map(|name| format!("'{}'", name))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            AppError::GenerationError(msg) => write!(f, "Error using generation API: {}", msg),
            AppError::SequenceError(msg) => write!(f, "{}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::SecurityError(msg) => write!(f, "Security error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
