use super::{api_key, endpoint, error_for_status, generation_error, LLMClient};
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde_json::json;

pub struct OpenRouterClient {
    client: reqwest::Client,
}

impl OpenRouterClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl LLMClient for OpenRouterClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        let api_key = api_key(config)?;
        let url = endpoint(config, "chat/completions");

        let mut body = json!({
            "model": config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "max_tokens": config.max_tokens,
        });
        if let Some(temperature) = config.temperature {
            body["temperature"] = json!(temperature);
        }

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

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| generation_error(config, format!("Failed to parse JSON: {}", e)))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| generation_error(config, "Invalid response format".to_string()))
    }
}
