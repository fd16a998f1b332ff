pub mod gemini;
pub mod openai;
pub mod openrouter;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::llm_config::LLMProvider;
use crate::infrastructure::security::redact;
use async_trait::async_trait;
use gemini::GeminiClient;
use openai::OpenAIClient;
use openrouter::OpenRouterClient;

#[async_trait]
pub trait LLMClient {
    /// Submit `prompt` and return the first generated candidate, untrimmed
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String>;
}

pub struct RouterClient {
    openai: OpenAIClient,
    openrouter: OpenRouterClient,
    gemini: GeminiClient,
}

impl RouterClient {
    pub fn new() -> Self {
        Self {
            openai: OpenAIClient::new(),
            openrouter: OpenRouterClient::new(),
            gemini: GeminiClient::new(),
        }
    }
}

#[async_trait]
impl LLMClient for RouterClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        match config.provider {
            LLMProvider::OpenAI => self.openai.generate(config, prompt).await,
            LLMProvider::OpenRouter => self.openrouter.generate(config, prompt).await,
            LLMProvider::Gemini => self.gemini.generate(config, prompt).await,
        }
    }
}

fn api_key(config: &LLMConfig) -> Result<String> {
    config.api_key.clone().ok_or_else(|| {
        AppError::GenerationError(format!(
            "Missing API key for {} provider",
            config.provider.name()
        ))
    })
}

fn endpoint(config: &LLMConfig, path: &str) -> String {
    format!("{}/{}", config.base_url.trim_end_matches('/'), path)
}

/// Generation error with any credential scrubbed from the message
fn generation_error(config: &LLMConfig, message: String) -> AppError {
    AppError::GenerationError(redact(&message, config.api_key.as_deref()))
}

async fn error_for_status(config: &LLMConfig, response: reqwest::Response) -> AppError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    generation_error(config, format!("API error ({}): {}", status, text))
}
