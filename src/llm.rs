//! LLM provider abstraction
//!
//! The text-polish service only ever needs "system prompt + user prompt
//! in, plain text out", so that is the whole interface. Everything else
//! (fallbacks, JSON salvage) lives with the caller.

mod error;
mod gemini;

pub use error::{LlmError, LlmErrorKind};
pub use gemini::GeminiService;

use async_trait::async_trait;
use std::sync::Arc;

/// One prompt exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub system: String,
    pub user: String,
    pub max_tokens: Option<u32>,
}

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request, returning the response text.
    async fn complete(&self, exchange: &Exchange) -> Result<String, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Provider configuration read from the environment.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model_id: String,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let model_id = std::env::var("GEMINI_MODEL_ID")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "gemini-3-flash".to_string());

        Self { api_key, model_id }
    }
}

/// Build a client from config; `None` when no API key is configured and
/// callers should use their offline paths.
pub fn client_from_config(config: &LlmConfig) -> Option<Arc<dyn LlmService>> {
    let api_key = config.api_key.clone()?;
    let service = GeminiService::new(api_key, config.model_id.clone());
    Some(Arc::new(LoggingService::new(Arc::new(service))))
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, exchange: &Exchange) -> Result<String, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(exchange).await;
        let duration = start.elapsed();

        match &result {
            Ok(_) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
