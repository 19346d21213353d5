//! Model provider trait and implementations.

pub mod google;
pub mod http;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::error::LogiqError;
use crate::models::LanguageModel;
use crate::tools::ToolDefinition;
use crate::types::{Content, FinishReason, GenerationSettings, Usage};

/// A request sent to a model provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub system_instruction: Option<String>,
    pub contents: Vec<Content>,
    pub settings: GenerationSettings,
    pub tools: Vec<ToolDefinition>,
}

/// Response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub content: Content,
    pub usage: Usage,
    pub finish_reason: Option<FinishReason>,
}

/// Core trait implemented by all model providers.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "google").
    fn provider_name(&self) -> &str;
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Generate one model reply (non-streaming).
    async fn generate_content(&self, request: &ProviderRequest)
        -> Result<ProviderResponse, LogiqError>;
}

/// Create a provider for the given model, using the provided config.
pub fn create_provider(
    model: &LanguageModel,
    config: &AppConfig,
) -> Result<Box<dyn ModelProvider>, LogiqError> {
    match model {
        LanguageModel::Google(m) => {
            let api_key = config.get_api_key("google").ok_or_else(|| {
                LogiqError::Authentication("Missing GOOGLE_API_KEY or GEMINI_API_KEY".into())
            })?;
            let mut provider = google::GoogleProvider::new(m.clone(), api_key);
            if let Some(url) = config.get_base_url("google") {
                provider = provider.with_base_url(url);
            }
            Ok(Box::new(provider))
        }
        LanguageModel::Custom { provider, .. } => Err(LogiqError::ModelNotFound(format!(
            "no provider implementation for '{provider}'"
        ))),
    }
}
