//! Google Gemini `generateContent` 的 InferenceGateway 實作

use crate::domain::ports::{ConfigProvider, InferenceGateway};
use crate::utils::error::{RelayError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub struct GeminiGateway {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// 這些結束原因代表候選結果被攔下
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

impl GeminiGateway {
    pub fn new(api_key: &str, model: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(RelayError::MissingConfigError {
                field: "GEMINI_API_KEY".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_key(),
            config.model(),
            config.gemini_base_url(),
            Duration::from_secs(config.request_timeout_secs()),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl InferenceGateway for GeminiGateway {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        tracing::debug!("Making Gemini request for model: {}", self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Gemini response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(RelayError::gateway(format!(
                "Gemini API error [{}]: {}",
                status,
                detail.trim()
            )));
        }

        let payload: GenerateContentResponse = response.json().await?;
        extract_text(payload)
    }
}

fn extract_text(payload: GenerateContentResponse) -> Result<String> {
    let Some(candidate) = payload.candidates.into_iter().next() else {
        let reason = payload
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("Prompt was blocked due to {}", r))
            .unwrap_or_else(|| "Gemini returned no candidates".to_string());
        return Err(RelayError::gateway(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate
            .finish_reason
            .filter(|r| BLOCKING_FINISH_REASONS.contains(&r.as_str()))
        {
            return Err(RelayError::gateway(format!(
                "Candidate was blocked due to {}",
                reason
            )));
        }
    }

    Ok(text)
}
