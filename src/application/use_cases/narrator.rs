use std::sync::Arc;

use tracing::{error, info};

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::summary::{NarrativeSummary, SummaryStatistics};
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_completion;
use crate::infrastructure::security::redact;

/// Fixed prompt embedding the two statistics
pub fn build_prompt(summary: &SummaryStatistics) -> String {
    format!(
        "The data contains employee details. \
         The average salary is {:.2}. \
         The department distribution is as follows: {}. \
         Please generate a summary in plain English.",
        summary.average_salary,
        summary.render_distribution()
    )
}

pub struct NarrateUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl NarrateUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// One generation call authorized by `api_key`; no retry.
    pub async fn execute(
        &self,
        config: &LLMConfig,
        summary: &SummaryStatistics,
        api_key: &str,
    ) -> Result<NarrativeSummary> {
        let prompt = build_prompt(summary);
        let request_config = config.with_api_key(api_key);

        info!(
            provider = config.provider.name(),
            model = %config.model,
            max_tokens = ?config.max_tokens,
            "Requesting narrative summary"
        );

        let raw = self
            .llm_client
            .generate(&request_config, &prompt)
            .await
            .map_err(|err| match err {
                AppError::GenerationError(msg) => {
                    AppError::GenerationError(redact(&msg, Some(api_key)))
                }
                other => AppError::GenerationError(redact(&other.to_string(), Some(api_key))),
            })
            .map_err(|err| {
                error!(error = %err, "Narrative generation failed");
                err
            })?;

        let text = clean_completion(&raw);
        if text.is_empty() {
            return Err(AppError::GenerationError(
                "The service returned an empty completion".to_string(),
            ));
        }

        Ok(NarrativeSummary::new(text, config.model.clone()))
    }
}
