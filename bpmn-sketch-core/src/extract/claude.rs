use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use super::{ExtractError, ModelExtractor};
use crate::model::ProcessModel;

/// Default Anthropic model. A Haiku-class model keeps extraction cheap;
/// override with `ANTHROPIC_MODEL`.
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

const SYSTEM_PROMPT: &str = include_str!("prompts/process_extraction.md");

/// Process-model extractor backed by the Anthropic Messages API.
#[derive(Clone)]
pub struct ClaudeExtractor {
    api_key: String,
    client: reqwest::Client,
    model: String,
}

impl ClaudeExtractor {
    /// Create a new extractor with the given API key.
    pub fn new(api_key: String) -> Self {
        let model = std::env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self {
            api_key,
            client: reqwest::Client::new(),
            model,
        }
    }

    /// Create with a specific model.
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self, ExtractError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| ExtractError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    async fn call_api(&self, user_prompt: &str) -> Result<String> {
        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": &self.model,
                "max_tokens": 1500,
                "temperature": 0.3,
                "system": SYSTEM_PROMPT,
                "messages": [{"role": "user", "content": user_prompt}]
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Api { status, body }.into());
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            text: Option<String>,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            content: Vec<ContentBlock>,
        }

        let api_response: ApiResponse = response.json().await?;
        let text = api_response
            .content
            .first()
            .and_then(|c| c.text.clone())
            .ok_or(ExtractError::EmptyResponse)?;
        Ok(text)
    }

    /// Strip markdown code fences the model sometimes wraps JSON in.
    fn extract_json(text: &str) -> &str {
        let text = text.trim();
        if let Some(inner) = text
            .split("```json")
            .nth(1)
            .and_then(|rest| rest.split("```").next())
        {
            return inner.trim();
        }
        if let Some(inner) = text
            .split("```")
            .nth(1)
            .and_then(|rest| rest.split("```").next())
        {
            return inner.trim();
        }
        text
    }
}

#[async_trait]
impl ModelExtractor for ClaudeExtractor {
    async fn extract(&self, text: &str) -> Result<ProcessModel> {
        let user_prompt = format!(
            "Extract the business process from this description:\n\n{}",
            text
        );
        let raw = self.call_api(&user_prompt).await?;
        let json = Self::extract_json(&raw);
        let model: ProcessModel = serde_json::from_str(json)
            .with_context(|| format!("model response was not ProcessModel JSON: {}", json))?;
        Ok(model.normalized())
    }

    fn provider_name(&self) -> &str {
        "anthropic"
    }
}
