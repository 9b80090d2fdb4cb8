//! Generative model provider abstraction.
//!
//! Handlers only see [`GenerationProvider`]; the concrete backend (Gemini in
//! production, [`mock::MockProvider`] in tests) is injected at startup.

pub mod gemini;
pub mod mock;

use crate::models::GenerationRequest;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Model returned no text")]
    EmptyResponse,

    #[error("Network error: {0}")]
    Network(String),
}

impl ProviderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::Api(_) => "api",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered(_) => "content_filtered",
            ProviderError::EmptyResponse => "empty_response",
            ProviderError::Network(_) => "network",
        }
    }
}

/// A model that turns an ordered list of parts into text.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Provider name used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Run one non-streaming generation and return the reply text.
    async fn generate(
        &self,
        request: &GenerationRequest,
        request_id: Option<&str>,
    ) -> Result<String, ProviderError>;
}
