//! Shared test helpers: a scripted model provider and a scripted runner.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use logiq::error::LogiqError;
use logiq::events::{Event, EventStream};
use logiq::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use logiq::runner::Runner;
use logiq::types::*;

/// A mock provider that replays queued responses and records every request.
pub struct MockProvider {
    model_id: String,
    responses: Mutex<VecDeque<Result<ProviderResponse, LogiqError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new(model_id: &str) -> Self {
        Self {
            model_id: model_id.to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a plain text reply.
    pub fn queue_response(&self, text: &str) {
        self.queue(Ok(ProviderResponse {
            content: Content::model(text),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 20,
                total_tokens: 30,
            },
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    /// Queue a reply that calls one tool.
    pub fn queue_tool_call(&self, name: &str, args: serde_json::Value) {
        self.queue(Ok(ProviderResponse {
            content: Content::new(
                Role::Model,
                vec![Part::function_call(FunctionCall {
                    id: None,
                    name: name.to_string(),
                    args,
                })],
            ),
            usage: Usage {
                input_tokens: 10,
                output_tokens: 5,
                total_tokens: 15,
            },
            finish_reason: Some(FinishReason::Stop),
        }));
    }

    pub fn queue_error(&self, error: LogiqError) {
        self.queue(Err(error));
    }

    fn queue(&self, response: Result<ProviderResponse, LogiqError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate_content(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderResponse, LogiqError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| {
            Err(LogiqError::InvalidState(
                "mock provider has no response queued".into(),
            ))
        })
    }
}

/// A runner that replays a fixed list of stream items.
pub struct ScriptedRunner {
    items: Mutex<Vec<Result<Event, LogiqError>>>,
}

impl ScriptedRunner {
    pub fn new(items: Vec<Result<Event, LogiqError>>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

impl Runner for ScriptedRunner {
    fn app_name(&self) -> &str {
        "scripted"
    }

    fn run_async(&self, _user_id: &str, _session_id: &str, _new_message: Content) -> EventStream {
        let items = std::mem::take(&mut *self.items.lock().unwrap());
        Box::pin(futures::stream::iter(items))
    }
}

/// A final model event carrying `text`.
pub fn final_text(text: &str) -> Event {
    Event::new("inv", "product_enquiry_agent").with_content(Content::model(text))
}

/// A model event that calls a tool and is therefore not final.
pub fn tool_call_event(name: &str) -> Event {
    Event::new("inv", "product_enquiry_agent").with_content(Content::new(
        Role::Model,
        vec![Part::function_call(FunctionCall {
            id: Some("call-1".into()),
            name: name.to_string(),
            args: serde_json::json!({}),
        })],
    ))
}
