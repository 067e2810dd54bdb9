//! Generative model access for the advisory features.
//!
//! Backends are trait objects so request handlers receive whichever
//! implementation the application state was built with: the Gemini HTTP
//! client in production, a scripted fake in tests.

mod gemini;
mod parse;

#[cfg(test)]
mod fake;

pub use gemini::GeminiBackend;
pub use parse::parse_model_json;

#[cfg(test)]
pub use fake::FakeBackend;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI backend not configured: {0}")]
    NotConfigured(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Model output is not a JSON object: {0}")]
    InvalidJson(String),

    #[error("Model output does not match the expected shape: {0}")]
    SchemaMismatch(String),

    #[error("No image supplied for a vision request")]
    MissingImage,
}

impl AiError {
    /// Short machine-readable label used in fallback diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::NotConfigured(_) => "not_configured",
            AiError::Request(_) => "transport",
            AiError::Api { status, .. } if *status == 401 || *status == 403 => "auth",
            AiError::Api { .. } => "api",
            AiError::EmptyResponse => "empty_response",
            AiError::InvalidJson(_) => "invalid_json",
            AiError::SchemaMismatch(_) => "schema_mismatch",
            AiError::MissingImage => "missing_image",
        }
    }
}

/// Image attached to a vision request, already base64 encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        use base64::{engine::general_purpose, Engine as _};
        InlineImage {
            mime_type: mime_type.to_string(),
            data: general_purpose::STANDARD.encode(bytes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub temperature: f64,
}

#[async_trait]
pub trait AiBackend: Send + Sync + fmt::Debug {
    /// Send the prompt (and image, if any) and return the model's raw text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError>;

    fn model_name(&self) -> &str;
}
