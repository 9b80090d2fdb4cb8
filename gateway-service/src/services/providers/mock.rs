//! Mock provider implementation for testing.

use super::{GenerationProvider, ProviderError};
use crate::models::GenerationRequest;
use async_trait::async_trait;
use tokio::sync::Mutex;

enum MockReply {
    Text(String),
    Fail(String),
}

/// Provider with a canned reply that records every request it receives.
pub struct MockProvider {
    reply: MockReply,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockProvider {
    /// Answer every request with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Text(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: MockReply::Fail(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in arrival order.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        _request_id: Option<&str>,
    ) -> Result<String, ProviderError> {
        self.requests.lock().await.push(request.clone());

        match &self.reply {
            MockReply::Text(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(ProviderError::Api(message.clone())),
        }
    }
}
