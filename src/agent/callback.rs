//! Callbacks invoked around an agent turn.

use std::sync::Arc;

use crate::error::Result;
use crate::session::SessionState;
use crate::types::Content;

/// Runs before the model is called for a turn.
///
/// Returning `Some(content)` ends the turn with that content as the reply.
pub type BeforeAgentCallback =
    Arc<dyn Fn(&mut CallbackContext) -> Result<Option<Content>> + Send + Sync>;

/// Mutable view of session state handed to callbacks.
///
/// Writes go to both the visible state and a delta; the runner persists the
/// delta once the callback returns.
#[derive(Debug, Clone)]
pub struct CallbackContext {
    invocation_id: String,
    agent_name: String,
    state: SessionState,
    delta: SessionState,
}

impl CallbackContext {
    pub fn new(
        invocation_id: impl Into<String>,
        agent_name: impl Into<String>,
        state: SessionState,
    ) -> Self {
        Self {
            invocation_id: invocation_id.into(),
            agent_name: agent_name.into(),
            state,
            delta: SessionState::new(),
        }
    }

    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.contains(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        let key = key.into();
        let value = value.into();
        self.delta.insert(key.clone(), value.clone());
        self.state.insert(key, value);
    }

    /// Changes made through this context.
    pub fn into_delta(self) -> SessionState {
        self.delta
    }
}
