use super::{api_key, endpoint, error_for_status, generation_error, LLMClient};
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: String,
}

pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn normalize_model(model: &str) -> &str {
        let trimmed = model.trim();
        trimmed.strip_prefix("models/").unwrap_or(trimmed)
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, config: &LLMConfig, prompt: &str) -> Result<String> {
        let api_key = api_key(config)?;
        let model_id = Self::normalize_model(&config.model);
        let url = endpoint(config, &format!("{}:generateContent", model_id));

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
                role: Some("user".to_string()),
            }],
            generation_config: Some(GenerationConfig {
                temperature: config.temperature.map(f64::from),
                max_output_tokens: config.max_tokens,
            }),
        };

        // Header rather than `?key=` so the credential never lands in a URL
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| generation_error(config, format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(error_for_status(config, response).await);
        }

        let json: GeminiResponse = response
            .json()
            .await
            .map_err(|e| generation_error(config, format!("Failed to parse JSON: {}", e)))?;

        json.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| generation_error(config, "Invalid response format".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use crate::domain::llm_config::LLMProvider;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(server: &MockServer) -> LLMConfig {
        LLMConfig {
            provider: LLMProvider::Gemini,
            base_url: server.url("/v1beta/models"),
            model: "models/gemini-1.5-flash".to_string(),
            max_tokens: Some(150),
            ..Default::default()
        }
        .with_api_key("g-key")
    }

    #[test]
    fn test_normalize_model() {
        assert_eq!(GeminiClient::normalize_model(" models/gemini-pro "), "gemini-pro");
        assert_eq!(GeminiClient::normalize_model("gemini-pro"), "gemini-pro");
    }

    #[tokio::test]
    async fn test_reads_first_candidate_part() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-1.5-flash:generateContent")
                    .header("x-goog-api-key", "g-key")
                    .json_body(json!({
                        "contents": [{"parts": [{"text": "prompt"}], "role": "user"}],
                        "generationConfig": {"maxOutputTokens": 150}
                    }));
                then.status(200).json_body(json!({
                    "candidates": [
                        {"content": {"parts": [{"text": "Team overview."}]}}
                    ]
                }));
            })
            .await;

        let text = GeminiClient::new()
            .generate(&config_for(&server), "prompt")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Team overview.");
    }

    #[tokio::test]
    async fn test_quota_error_is_generation_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).body("quota exhausted");
            })
            .await;

        let err = GeminiClient::new()
            .generate(&config_for(&server), "prompt")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GenerationError(msg) if msg.contains("429")));
    }
}
