//! Session storage: conversation state and event history per user.

pub mod id;
pub mod memory;
pub mod state;

pub use id::generate_session_id;
pub use memory::InMemorySessionService;
pub use state::SessionState;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::Event;

/// Identifies one session within an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl SessionKey {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// A stored conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub app_name: String,
    pub user_id: String,
    pub state: SessionState,
    pub events: Vec<Event>,
    pub last_update_time: DateTime<Utc>,
}

impl Session {
    pub fn key(&self) -> SessionKey {
        SessionKey::new(&self.app_name, &self.user_id, &self.id)
    }
}

/// Async store of sessions.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Create a session. `session_id = None` lets the store pick one.
    ///
    /// Fails with `SessionExists` if the id is already taken.
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: Option<&str>,
        state: SessionState,
    ) -> Result<Session>;

    async fn get_session(&self, key: &SessionKey) -> Result<Option<Session>>;

    /// Ids of all sessions a user has in an application.
    async fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<String>>;

    async fn delete_session(&self, key: &SessionKey) -> Result<()>;

    /// Record an event and apply its state delta.
    async fn append_event(&self, key: &SessionKey, event: Event) -> Result<Event>;
}
