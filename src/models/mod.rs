//! Model definitions and selection.

pub mod google;

pub use google::GoogleModel;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LogiqError;

/// Language model an agent is bound to.
///
/// Parsed from `provider:model_id` (e.g. `google:gemini-2.0-flash-lite`). Bare
/// `gemini-*` identifiers are accepted as Google models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LanguageModel {
    Google(GoogleModel),
    /// Custom model with explicit provider and model ID.
    Custom { provider: String, model_id: String },
}

impl LanguageModel {
    /// Get the model's API identifier string.
    pub fn model_id(&self) -> &str {
        match self {
            Self::Google(m) => m.as_str(),
            Self::Custom { model_id, .. } => model_id,
        }
    }

    /// Get the provider name.
    pub fn provider_name(&self) -> &str {
        match self {
            Self::Google(_) => "google",
            Self::Custom { provider, .. } => provider,
        }
    }

    /// Upper bound on output tokens the model accepts, when known.
    pub fn max_output_tokens(&self) -> Option<u32> {
        match self {
            Self::Google(m) => Some(m.max_output_tokens()),
            Self::Custom { .. } => None,
        }
    }
}

impl Default for LanguageModel {
    fn default() -> Self {
        Self::Google(GoogleModel::Gemini20FlashLite)
    }
}

impl fmt::Display for LanguageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider_name(), self.model_id())
    }
}

impl FromStr for LanguageModel {
    type Err = LogiqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("gemini-") {
            return Ok(Self::Google(google_model(s)));
        }

        let (provider, model_id) = s.split_once(':').ok_or_else(|| {
            LogiqError::InvalidArgument(format!(
                "Invalid model selector '{s}': expected 'provider:model_id'"
            ))
        })?;
        if model_id.is_empty() {
            return Err(LogiqError::InvalidArgument(format!(
                "Invalid model selector '{s}': empty model id"
            )));
        }

        match provider {
            "google" | "gemini" => Ok(Self::Google(google_model(model_id))),
            other => Ok(Self::Custom {
                provider: other.to_string(),
                model_id: model_id.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for LanguageModel {
    type Error = LogiqError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LanguageModel> for String {
    fn from(model: LanguageModel) -> Self {
        model.to_string()
    }
}

fn google_model(model_id: &str) -> GoogleModel {
    GoogleModel::from_str(model_id).unwrap_or(GoogleModel::Custom(model_id.to_string()))
}
