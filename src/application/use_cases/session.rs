use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::use_cases::aggregator::AggregateUseCase;
use crate::application::use_cases::loader::LoadUseCase;
use crate::application::use_cases::narrator::NarrateUseCase;
use crate::domain::employee::EmployeeTable;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::schema::SchemaReport;
use crate::domain::summary::{NarrativeSummary, SummaryStatistics};
use crate::infrastructure::llm_clients::LLMClient;

pub const NO_DATA_MESSAGE: &str = "No data to process. Please load the spreadsheet first.";
pub const NO_SUMMARY_MESSAGE: &str = "No summary available. Please process the data first.";

/// One processing session over a single input file.
///
/// Each stage only runs once the previous one has produced its output:
/// statistics never exist without a table, and narration never runs
/// without statistics.
pub struct DigestSession {
    input_path: PathBuf,
    table: Option<EmployeeTable>,
    schema: Option<SchemaReport>,
    summary: Option<SummaryStatistics>,
    loader: LoadUseCase,
    aggregator: AggregateUseCase,
    narrator: NarrateUseCase,
}

impl DigestSession {
    pub fn new(
        input_path: impl Into<PathBuf>,
        llm_client: Arc<dyn LLMClient + Send + Sync>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            table: None,
            schema: None,
            summary: None,
            loader: LoadUseCase::new(),
            aggregator: AggregateUseCase::new(),
            narrator: NarrateUseCase::new(llm_client),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn table(&self) -> Option<&EmployeeTable> {
        self.table.as_ref()
    }

    pub fn schema(&self) -> Option<&SchemaReport> {
        self.schema.as_ref()
    }

    pub fn summary(&self) -> Option<&SummaryStatistics> {
        self.summary.as_ref()
    }

    /// Replace the table wholesale. Statistics from an earlier table are
    /// discarded; a failed load leaves the session as it was.
    pub fn load(&mut self) -> Result<&EmployeeTable> {
        let outcome = self.loader.execute(&self.input_path)?;

        self.summary = None;
        self.schema = Some(outcome.schema);
        Ok(self.table.insert(outcome.table))
    }

    pub fn aggregate(&mut self) -> Result<&SummaryStatistics> {
        let table = self
            .table
            .as_ref()
            .ok_or_else(|| AppError::SequenceError(NO_DATA_MESSAGE.to_string()))?;

        let summary = self.aggregator.execute(table)?;
        Ok(self.summary.insert(summary))
    }

    pub async fn narrate(&self, config: &LLMConfig, api_key: &str) -> Result<NarrativeSummary> {
        let summary = self
            .summary
            .as_ref()
            .ok_or_else(|| AppError::SequenceError(NO_SUMMARY_MESSAGE.to_string()))?;

        self.narrator.execute(config, summary, api_key).await
    }
}
