use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;

use super::{AiBackend, AiError, GenerationRequest};
use crate::config::{AiConfig, DEFAULT_GEMINI_MODEL};

/// The key travels in a header so it never appears in request URLs.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini `generateContent` client.
pub struct GeminiBackend {
    api_key: String,
    model: String,
    api_base: String,
    client: reqwest::Client,
}

impl fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GeminiBackend {
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AiError::NotConfigured("Gemini API key is not set".to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::NotConfigured(format!("HTTP client init failed: {}", e)))?;

        Ok(GeminiBackend {
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Configured model first, then the stock flash model as a second chance.
    fn models_to_try(&self) -> Vec<&str> {
        let mut models = vec![self.model.as_str()];
        if self.model != DEFAULT_GEMINI_MODEL {
            models.push(DEFAULT_GEMINI_MODEL);
        }
        models
    }
}

pub(crate) fn build_request_body(request: &GenerationRequest) -> Value {
    let mut parts = vec![json!({ "text": request.prompt })];
    if let Some(image) = &request.image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": image.data
            }
        }));
    }

    json!({
        "contents": [{ "parts": parts }],
        "generationConfig": { "temperature": request.temperature }
    })
}

/// Concatenates the text parts of the first candidate.
pub(crate) fn extract_text(response: &Value) -> Option<String> {
    let parts = response["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect::<Vec<_>>()
        .join("");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[async_trait]
impl AiBackend for GeminiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        let body = build_request_body(request);
        let mut last_error = AiError::EmptyResponse;

        for model in self.models_to_try() {
            let url = format!("{}/v1beta/models/{}:generateContent", self.api_base, model);

            let resp = match self
                .client
                .post(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    let e = e.without_url();
                    tracing::warn!("Gemini network error ({}): {}", model, e);
                    last_error = AiError::Request(e.to_string());
                    continue;
                }
            };

            let status = resp.status();
            if status.is_success() {
                let json: Value = resp
                    .json()
                    .await
                    .map_err(|e| AiError::Request(e.without_url().to_string()))?;
                match extract_text(&json) {
                    Some(text) => return Ok(text),
                    None => {
                        tracing::warn!("Empty response from {}", model);
                        last_error = AiError::EmptyResponse;
                        continue;
                    }
                }
            }

            let error_text = resp.text().await.unwrap_or_default();
            last_error = AiError::Api {
                status: status.as_u16(),
                message: error_text,
            };

            // Another model will not fix a bad key or an exhausted quota.
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
                || status == reqwest::StatusCode::TOO_MANY_REQUESTS
            {
                break;
            }
        }

        Err(last_error)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
