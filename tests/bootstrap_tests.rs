//! Session bootstrap memoization and recovery.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::MockProvider;
use logiq::bootstrap::{ChatScope, SessionBootstrap, CUSTOMER_ID_KEY, CUSTOMER_NAME_KEY};
use logiq::catalog::Catalog;
use logiq::config::AppConfig;
use logiq::customer::product_enquiry_agent;
use logiq::error::{LogiqError, Result};
use logiq::events::Event;
use logiq::session::{InMemorySessionService, Session, SessionKey, SessionService, SessionState};
use pretty_assertions::assert_eq;

const APP: &str = "LogIQ Customer App";

fn bootstrap_with(sessions: Arc<dyn SessionService>) -> SessionBootstrap {
    let config = AppConfig::default();
    let catalog = Arc::new(Catalog::sample().unwrap());
    let agent = Arc::new(product_enquiry_agent(&config, catalog));
    SessionBootstrap::new(APP, agent, Arc::new(MockProvider::new("mock")), sessions)
}

#[tokio::test]
async fn first_call_creates_session_with_customer_state() {
    let sessions = Arc::new(InMemorySessionService::new());
    let bootstrap = bootstrap_with(sessions.clone());
    let mut scope = ChatScope::new("Ada Lovelace");

    let (_, session_id) = bootstrap.initialize(&mut scope, "C-1001").await.unwrap();

    let re = regex::Regex::new(r"^adk_session_\d+_[0-9a-f]{8}$").unwrap();
    assert!(re.is_match(&session_id), "unexpected id {session_id}");
    assert_eq!(scope.session_id(), Some(session_id.as_str()));
    assert_eq!(
        sessions.list_sessions(APP, "C-1001").await.unwrap(),
        vec![session_id.clone()]
    );

    let session = sessions
        .get_session(&SessionKey::new(APP, "C-1001", &session_id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.state.get_str(CUSTOMER_NAME_KEY), Some("Ada Lovelace"));
    assert_eq!(session.state.get_str(CUSTOMER_ID_KEY), Some("C-1001"));
    assert!(session.events.is_empty());
}

#[tokio::test]
async fn repeated_calls_return_the_cached_pair() {
    let sessions = Arc::new(InMemorySessionService::new());
    let bootstrap = bootstrap_with(sessions.clone());
    let mut scope = ChatScope::new("Ada Lovelace");

    let (first_runner, first_id) = bootstrap.initialize(&mut scope, "C-1001").await.unwrap();
    assert_eq!(sessions.list_sessions(APP, "C-1001").await.unwrap().len(), 1);

    let (second_runner, second_id) = bootstrap.initialize(&mut scope, "C-1001").await.unwrap();
    assert!(Arc::ptr_eq(&first_runner, &second_runner));
    assert_eq!(first_id, second_id);
    assert!(bootstrap.is_active("C-1001").await);
    assert_eq!(
        sessions.list_sessions(APP, "C-1001").await.unwrap(),
        vec![first_id]
    );
}

#[tokio::test]
async fn deleted_session_is_recreated_with_the_same_id() {
    let sessions = Arc::new(InMemorySessionService::new());
    let bootstrap = bootstrap_with(sessions.clone());
    let mut scope = ChatScope::new("Ada Lovelace");

    let (first_runner, session_id) = bootstrap.initialize(&mut scope, "C-1001").await.unwrap();
    let key = SessionKey::new(APP, "C-1001", &session_id);
    sessions.delete_session(&key).await.unwrap();
    assert!(bootstrap.end_scope("C-1001").await);
    assert!(!bootstrap.is_active("C-1001").await);

    let (second_runner, recreated_id) = bootstrap.initialize(&mut scope, "C-1001").await.unwrap();
    assert_eq!(recreated_id, session_id);
    assert!(!Arc::ptr_eq(&first_runner, &second_runner));

    let session = sessions.get_session(&key).await.unwrap().unwrap();
    assert_eq!(session.state.get_str(CUSTOMER_NAME_KEY), Some("Ada Lovelace"));
}

#[tokio::test]
async fn existing_session_is_reused_after_scope_ends() {
    let sessions = Arc::new(InMemorySessionService::new());
    let bootstrap = bootstrap_with(sessions.clone());
    let mut scope = ChatScope::new("Ada Lovelace");

    let (_, session_id) = bootstrap.initialize(&mut scope, "C-1001").await.unwrap();
    let key = SessionKey::new(APP, "C-1001", &session_id);
    sessions
        .append_event(
            &key,
            Event::new("inv", "test")
                .with_state_delta(SessionState::new().with("current_date", "2025-06-01")),
        )
        .await
        .unwrap();
    bootstrap.end_scope("C-1001").await;

    let (_, again) = bootstrap.initialize(&mut scope, "C-1001").await.unwrap();
    assert_eq!(again, session_id);
    let session = sessions.get_session(&key).await.unwrap().unwrap();
    assert_eq!(session.state.get_str("current_date"), Some("2025-06-01"));
    assert_eq!(session.events.len(), 1);
}

#[test]
fn blocking_initialize_matches_async_path() {
    let bootstrap = bootstrap_with(Arc::new(InMemorySessionService::new()));
    let mut scope = ChatScope::new("Grace Hopper");

    let (runner, session_id) = bootstrap.initialize_blocking(&mut scope, "C-2002").unwrap();
    let (cached_runner, cached_id) = bootstrap.initialize_blocking(&mut scope, "C-2002").unwrap();
    assert!(Arc::ptr_eq(&runner, &cached_runner));
    assert_eq!(session_id, cached_id);
}

/// Store whose writes always fail.
struct BrokenStore;

#[async_trait]
impl SessionService for BrokenStore {
    async fn create_session(
        &self,
        _app_name: &str,
        _user_id: &str,
        _session_id: Option<&str>,
        _state: SessionState,
    ) -> Result<Session> {
        Err(LogiqError::InvalidState("store is read-only".into()))
    }

    async fn get_session(&self, _key: &SessionKey) -> Result<Option<Session>> {
        Ok(None)
    }

    async fn list_sessions(&self, _app_name: &str, _user_id: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn delete_session(&self, _key: &SessionKey) -> Result<()> {
        Ok(())
    }

    async fn append_event(&self, _key: &SessionKey, event: Event) -> Result<Event> {
        Ok(event)
    }
}

#[tokio::test]
async fn store_errors_propagate_unchanged() {
    let bootstrap = bootstrap_with(Arc::new(BrokenStore));
    let mut scope = ChatScope::new("Ada Lovelace");

    let err = bootstrap.initialize(&mut scope, "C-1001").await.unwrap_err();
    assert!(
        matches!(&err, LogiqError::InvalidState(message) if message == "store is read-only"),
        "unexpected error {err:?}"
    );
    // The id is assigned before the store is asked to create the session.
    assert!(scope.session_id().is_some());
    assert!(!bootstrap.is_active("C-1001").await);

    // A later attempt takes the recreate path and still surfaces the store error.
    let err = bootstrap.initialize(&mut scope, "C-1001").await.unwrap_err();
    assert!(matches!(err, LogiqError::InvalidState(_)));
}
