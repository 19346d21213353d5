//! Google Gemini API provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::LogiqError;
use crate::models::GoogleModel;
use crate::types::{Content, FinishReason, Role, Usage};

use super::http::shared_client;
use super::{ModelProvider, ProviderRequest, ProviderResponse};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GoogleProvider {
    model: GoogleModel,
    api_key: String,
    base_url: String,
}

impl GoogleProvider {
    pub fn new(model: GoogleModel, api_key: String) -> Self {
        Self {
            model,
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at another endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub(crate) fn build_request_body(&self, request: &ProviderRequest) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("contents".into(), serde_json::json!(request.contents));

        if let Some(ref sys) = request.system_instruction {
            obj.insert(
                "systemInstruction".into(),
                serde_json::json!({ "parts": [{ "text": sys }] }),
            );
        }

        let mut gen_config = serde_json::Map::new();
        if let Some(max) = request.settings.max_output_tokens {
            gen_config.insert("maxOutputTokens".into(), max.into());
        }
        if let Some(temp) = request.settings.temperature {
            gen_config.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            gen_config.insert("topP".into(), top_p.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            gen_config.insert("stopSequences".into(), serde_json::json!(stops));
        }
        if !gen_config.is_empty() {
            obj.insert("generationConfig".into(), serde_json::Value::Object(gen_config));
        }

        if !request.tools.is_empty() {
            obj.insert(
                "tools".into(),
                serde_json::json!([{ "functionDeclarations": request.tools }]),
            );
        }

        serde_json::Value::Object(obj)
    }
}

#[async_trait]
impl ModelProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    async fn generate_content(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, LogiqError> {
        let body = self.build_request_body(request);
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            self.model.as_str()
        );

        debug!(
            model = self.model.as_str(),
            contents = request.contents.len(),
            tools = request.tools.len(),
            "Google generate_content"
        );

        let resp = shared_client()
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(redact_url)?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(super::http::status_to_error(status, &body_text));
        }

        let data: GeminiResponse = resp.json().await.map_err(redact_url)?;

        if let Some(feedback) = data.prompt_feedback.as_ref() {
            if let Some(reason) = feedback.block_reason.as_deref() {
                return Err(LogiqError::api(200, format!("prompt blocked: {reason}")));
            }
        }

        let candidate = data
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LogiqError::api(200, "No candidates in Gemini response"))?;

        let content = candidate.content.unwrap_or(Content {
            role: Role::Model,
            parts: Vec::new(),
        });

        let usage = data
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(ProviderResponse {
            content,
            usage,
            finish_reason: candidate.finish_reason.as_deref().map(FinishReason::from_gemini),
        })
    }
}

/// Request URLs never reach error messages or logs.
fn redact_url(e: reqwest::Error) -> LogiqError {
    LogiqError::Network(e.without_url())
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsage>,
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolDefinition;
    use crate::types::GenerationSettings;
    use serde_json::json;

    fn provider() -> GoogleProvider {
        GoogleProvider::new(GoogleModel::Gemini20FlashLite, "key".into())
    }

    #[test]
    fn body_carries_system_instruction_and_generation_config() {
        let request = ProviderRequest {
            system_instruction: Some("Be helpful.".into()),
            contents: vec![Content::user("hi")],
            settings: GenerationSettings::builder()
                .temperature(0.2)
                .max_output_tokens(1024)
                .build(),
            tools: vec![],
        };
        let body = provider().build_request_body(&request);

        assert_eq!(body["systemInstruction"], json!({"parts": [{"text": "Be helpful."}]}));
        assert_eq!(body["contents"], json!([{"role": "user", "parts": [{"text": "hi"}]}]));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["generationConfig"]["temperature"], 0.2);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn body_declares_tools() {
        let request = ProviderRequest {
            system_instruction: None,
            contents: vec![Content::user("what do you sell?")],
            settings: GenerationSettings::default(),
            tools: vec![ToolDefinition {
                name: "get_sub_categories".into(),
                description: "Sub-categories of a category".into(),
                parameters: json!({"type": "object", "properties": {}}),
            }],
        };
        let body = provider().build_request_body(&request);

        assert_eq!(
            body["tools"][0]["functionDeclarations"][0]["name"],
            "get_sub_categories"
        );
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let p = provider().with_base_url("http://localhost:8080/");
        assert_eq!(p.base_url, "http://localhost:8080");
    }
}
