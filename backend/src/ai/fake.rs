//! Scripted backend for tests.

use async_trait::async_trait;
use std::sync::Mutex;

use super::{AiBackend, AiError, GenerationRequest};

#[derive(Debug, Clone)]
enum Script {
    Reply(String),
    Fail(u16),
}

/// Returns a canned reply (or a canned API failure) for every request and
/// remembers what it was asked.
#[derive(Debug)]
pub struct FakeBackend {
    script: Script,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeBackend {
    pub fn replying(text: &str) -> Self {
        FakeBackend {
            script: Script::Reply(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        FakeBackend {
            script: Script::Fail(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiBackend for FakeBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AiError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Reply(text) => Ok(text.clone()),
            Script::Fail(status) => Err(AiError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
