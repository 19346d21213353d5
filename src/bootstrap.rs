//! Find-or-create the conversation session for a chat scope.
//!
//! A [`ChatScope`] stands for one front-end session (one interactive user).
//! [`SessionBootstrap`] memoizes the `(runner, session_id)` pair per scope key
//! until [`SessionBootstrap::end_scope`] tears it down.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::error::Result;
use crate::provider::ModelProvider;
use crate::runner::AgentRunner;
use crate::session::{generate_session_id, SessionKey, SessionService, SessionState};
use crate::util::block_on;

/// State key holding the customer's display name.
pub const CUSTOMER_NAME_KEY: &str = "customer_full_name";
/// State key holding the customer id.
pub const CUSTOMER_ID_KEY: &str = "customer_id";

/// Front-end state that outlives a single bootstrap: who is chatting and
/// which session id they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatScope {
    pub customer_name: String,
    session_id: Option<String>,
}

impl ChatScope {
    pub fn new(customer_name: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            session_id: None,
        }
    }

    /// Session id assigned by an earlier bootstrap, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}

/// Memoizes one `(runner, session_id)` pair per scope key.
pub struct SessionBootstrap {
    app_name: String,
    agent: Arc<Agent>,
    provider: Arc<dyn ModelProvider>,
    sessions: Arc<dyn SessionService>,
    cache: Mutex<HashMap<String, (Arc<AgentRunner>, String)>>,
}

impl SessionBootstrap {
    pub fn new(
        app_name: impl Into<String>,
        agent: Arc<Agent>,
        provider: Arc<dyn ModelProvider>,
        sessions: Arc<dyn SessionService>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            agent,
            provider,
            sessions,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn session_service(&self) -> &Arc<dyn SessionService> {
        &self.sessions
    }

    /// Return the runner and session id for `user_id`, creating them on first use.
    ///
    /// Store errors are returned unchanged.
    pub async fn initialize(
        &self,
        scope: &mut ChatScope,
        user_id: &str,
    ) -> Result<(Arc<AgentRunner>, String)> {
        let mut cache = self.cache.lock().await;
        if let Some((runner, session_id)) = cache.get(user_id) {
            debug!(user_id, session_id = %session_id, "reusing cached session");
            return Ok((Arc::clone(runner), session_id.clone()));
        }

        let initial_state = SessionState::new()
            .with(CUSTOMER_NAME_KEY, scope.customer_name.clone())
            .with(CUSTOMER_ID_KEY, user_id);

        let runner = Arc::new(AgentRunner::new(
            Arc::clone(&self.agent),
            &self.app_name,
            Arc::clone(&self.sessions),
            Arc::clone(&self.provider),
        ));

        let session_id = match scope.session_id.clone() {
            None => {
                let session_id = generate_session_id();
                scope.session_id = Some(session_id.clone());
                self.sessions
                    .create_session(&self.app_name, user_id, Some(&session_id), initial_state)
                    .await?;
                info!(user_id, session_id = %session_id, "session created");
                session_id
            }
            Some(session_id) => {
                let key = SessionKey::new(&self.app_name, user_id, &session_id);
                if self.sessions.get_session(&key).await?.is_none() {
                    self.sessions
                        .create_session(&self.app_name, user_id, Some(&session_id), initial_state)
                        .await?;
                    info!(user_id, session_id = %session_id, "session recreated");
                }
                session_id
            }
        };

        cache.insert(user_id.to_string(), (Arc::clone(&runner), session_id.clone()));
        Ok((runner, session_id))
    }

    /// Blocking form of [`initialize`](Self::initialize).
    pub fn initialize_blocking(
        &self,
        scope: &mut ChatScope,
        user_id: &str,
    ) -> Result<(Arc<AgentRunner>, String)> {
        block_on(self.initialize(scope, user_id))?
    }

    /// Drop the cached pair for `user_id`. The session itself stays in the store.
    pub async fn end_scope(&self, user_id: &str) -> bool {
        self.cache.lock().await.remove(user_id).is_some()
    }

    /// Whether a pair is cached for `user_id`.
    pub async fn is_active(&self, user_id: &str) -> bool {
        self.cache.lock().await.contains_key(user_id)
    }
}

impl std::fmt::Debug for SessionBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBootstrap")
            .field("app_name", &self.app_name)
            .field("agent", &self.agent.name())
            .finish()
    }
}
