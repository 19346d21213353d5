//! Events emitted by the runner while executing a turn.

use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LogiqError;
use crate::session::SessionState;
use crate::types::{Content, Usage};

/// Author recorded on events that carry the user's message.
pub const USER_AUTHOR: &str = "user";

/// Ordered stream of events for one turn.
pub type EventStream = BoxStream<'static, Result<Event, LogiqError>>;

/// Side effects attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventActions {
    /// State changes applied to the session when the event is appended.
    #[serde(default, skip_serializing_if = "SessionState::is_empty")]
    pub state_delta: SessionState,
    /// The event is final even if it carries a function response.
    #[serde(default)]
    pub skip_summarization: bool,
}

/// One unit of turn output: a model reply, a tool response or a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub invocation_id: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default)]
    pub actions: EventActions,
    /// Streaming fragment of a larger reply.
    #[serde(default)]
    pub partial: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    pub fn new(invocation_id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            invocation_id: invocation_id.into(),
            author: author.into(),
            content: None,
            actions: EventActions::default(),
            partial: false,
            usage: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    pub fn with_state_delta(mut self, delta: SessionState) -> Self {
        self.actions.state_delta = delta;
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn partial(mut self) -> Self {
        self.partial = true;
        self
    }

    pub fn has_function_calls(&self) -> bool {
        self.content
            .as_ref()
            .is_some_and(|c| !c.function_calls().is_empty())
    }

    pub fn has_function_responses(&self) -> bool {
        self.content
            .as_ref()
            .is_some_and(|c| !c.function_responses().is_empty())
    }

    /// Whether this event is the terminal output of a turn.
    pub fn is_final_response(&self) -> bool {
        if self.actions.skip_summarization {
            return true;
        }
        !self.has_function_calls() && !self.has_function_responses() && !self.partial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FunctionCall, FunctionResponse, Part, Role};
    use serde_json::json;

    fn call_event() -> Event {
        Event::new("inv", "agent").with_content(Content::new(
            Role::Model,
            vec![Part::function_call(FunctionCall {
                id: None,
                name: "get_categories".into(),
                args: json!({}),
            })],
        ))
    }

    fn response_event() -> Event {
        Event::new("inv", "agent").with_content(Content::new(
            Role::User,
            vec![Part::function_response(FunctionResponse {
                id: None,
                name: "get_categories".into(),
                response: json!({"result": []}),
            })],
        ))
    }

    #[test]
    fn plain_text_reply_is_final() {
        let event = Event::new("inv", "agent").with_content(Content::model("Hello"));
        assert!(event.is_final_response());
    }

    #[test]
    fn function_calls_and_responses_are_not_final() {
        assert!(!call_event().is_final_response());
        assert!(!response_event().is_final_response());
    }

    #[test]
    fn partial_text_is_not_final() {
        let event = Event::new("inv", "agent")
            .with_content(Content::model("Hel"))
            .partial();
        assert!(!event.is_final_response());
    }

    #[test]
    fn skip_summarization_forces_final() {
        let mut event = response_event();
        event.actions.skip_summarization = true;
        assert!(event.is_final_response());
    }
}
