use super::{api_key, endpoint, error_for_status, generation_error, LLMClient};
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

/// Client for the text-completion endpoint (`/completions`)
pub struct OpenAIClient {
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        let api_key = api_key(config)?;
        let url = endpoint(config, "completions");

        let body = CompletionRequest {
            model: &config.model,
            prompt,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| generation_error(config, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_for_status(config, response).await);
        }

        let json: CompletionResponse = response
            .json()
            .await
            .map_err(|e| generation_error(config, format!("Failed to parse JSON: {}", e)))?;

        json.choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| generation_error(config, "Invalid response format".to_string()))
    }
}
