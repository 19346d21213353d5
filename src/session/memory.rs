//! Process-local session store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{generate_session_id, Session, SessionKey, SessionService, SessionState};
use crate::error::{LogiqError, Result};
use crate::events::Event;

/// Keeps every session in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemorySessionService {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl InMemorySessionService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: Option<&str>,
        state: SessionState,
    ) -> Result<Session> {
        let id = match session_id {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => generate_session_id(),
        };
        let key = SessionKey::new(app_name, user_id, &id);

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&key) {
            return Err(LogiqError::SessionExists(id));
        }

        let session = Session {
            id,
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            state,
            events: Vec::new(),
            last_update_time: Utc::now(),
        };
        sessions.insert(key, session.clone());
        tracing::debug!(app_name, user_id, session_id = %session.id, "session created");
        Ok(session)
    }

    async fn get_session(&self, key: &SessionKey) -> Result<Option<Session>> {
        Ok(self.sessions.read().await.get(key).cloned())
    }

    async fn list_sessions(&self, app_name: &str, user_id: &str) -> Result<Vec<String>> {
        let sessions = self.sessions.read().await;
        let mut ids: Vec<String> = sessions
            .keys()
            .filter(|k| k.app_name == app_name && k.user_id == user_id)
            .map(|k| k.session_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn delete_session(&self, key: &SessionKey) -> Result<()> {
        self.sessions.write().await.remove(key);
        Ok(())
    }

    async fn append_event(&self, key: &SessionKey, event: Event) -> Result<Event> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(key)
            .ok_or_else(|| LogiqError::SessionNotFound {
                app_name: key.app_name.clone(),
                user_id: key.user_id.clone(),
                session_id: key.session_id.clone(),
            })?;

        // Partial fragments are transient and never change state.
        if event.partial {
            return Ok(event);
        }

        session.state.merge(&event.actions.state_delta);
        session.last_update_time = event.timestamp;
        session.events.push(event.clone());
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Content;

    const APP: &str = "LogIQ Customer App";

    #[tokio::test]
    async fn create_then_get_returns_initial_state() {
        let service = InMemorySessionService::new();
        let state = SessionState::new().with("customer_id", "u1");
        let created = service
            .create_session(APP, "u1", Some("s1"), state.clone())
            .await
            .unwrap();

        let fetched = service.get_session(&created.key()).await.unwrap().unwrap();
        assert_eq!(fetched.state, state);
        assert!(fetched.events.is_empty());
    }

    #[tokio::test]
    async fn store_generates_id_when_none_given() {
        let service = InMemorySessionService::new();
        let created = service
            .create_session(APP, "u1", None, SessionState::new())
            .await
            .unwrap();
        assert!(created.id.starts_with("adk_session_"));
    }

    #[tokio::test]
    async fn duplicate_create_fails() {
        let service = InMemorySessionService::new();
        service
            .create_session(APP, "u1", Some("s1"), SessionState::new())
            .await
            .unwrap();
        let err = service
            .create_session(APP, "u1", Some("s1"), SessionState::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LogiqError::SessionExists(id) if id == "s1"));
    }

    #[tokio::test]
    async fn sessions_are_scoped_by_app_and_user() {
        let service = InMemorySessionService::new();
        service
            .create_session(APP, "u1", Some("s1"), SessionState::new())
            .await
            .unwrap();

        let other_user = SessionKey::new(APP, "u2", "s1");
        assert!(service.get_session(&other_user).await.unwrap().is_none());
        let other_app = SessionKey::new("Other", "u1", "s1");
        assert!(service.get_session(&other_app).await.unwrap().is_none());
        assert_eq!(service.list_sessions(APP, "u1").await.unwrap(), vec!["s1"]);
    }

    #[tokio::test]
    async fn append_event_applies_state_delta() {
        let service = InMemorySessionService::new();
        let session = service
            .create_session(APP, "u1", Some("s1"), SessionState::new().with("customer_id", "u1"))
            .await
            .unwrap();

        let event = Event::new("inv-1", "product_enquiry_agent")
            .with_state_delta(SessionState::new().with("current_date", "2025-03-01"));
        service.append_event(&session.key(), event).await.unwrap();

        let stored = service.get_session(&session.key()).await.unwrap().unwrap();
        assert_eq!(stored.events.len(), 1);
        assert_eq!(stored.state.get_str("current_date"), Some("2025-03-01"));
        assert_eq!(stored.state.get_str("customer_id"), Some("u1"));
    }

    #[tokio::test]
    async fn partial_events_are_not_recorded() {
        let service = InMemorySessionService::new();
        let session = service
            .create_session(APP, "u1", Some("s1"), SessionState::new())
            .await
            .unwrap();
        let event = Event::new("inv-1", "agent")
            .with_content(Content::model("Hel"))
            .partial();
        service.append_event(&session.key(), event).await.unwrap();

        let stored = service.get_session(&session.key()).await.unwrap().unwrap();
        assert!(stored.events.is_empty());
    }

    #[tokio::test]
    async fn append_to_missing_session_fails() {
        let service = InMemorySessionService::new();
        let err = service
            .append_event(&SessionKey::new(APP, "u1", "nope"), Event::new("inv", "user"))
            .await
            .unwrap_err();
        assert!(matches!(err, LogiqError::SessionNotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let service = InMemorySessionService::new();
        let session = service
            .create_session(APP, "u1", Some("s1"), SessionState::new())
            .await
            .unwrap();
        service.delete_session(&session.key()).await.unwrap();
        assert!(service.get_session(&session.key()).await.unwrap().is_none());
    }
}
