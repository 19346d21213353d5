//! Turn execution: drives an agent against a session and streams its events.

mod tooling;

use std::sync::Arc;

use async_stream::try_stream;
use futures::Stream;
use tracing::{debug, info};
use uuid::Uuid;

use crate::agent::{inject_session_state, Agent, CallbackContext};
use crate::config::AppConfig;
use crate::error::{LogiqError, Result};
use crate::events::{Event, EventStream, USER_AUTHOR};
use crate::provider::{self, ModelProvider, ProviderRequest};
use crate::session::{Session, SessionKey, SessionService};
use crate::types::{Content, FunctionCall, Role};

/// Executes one conversational turn, producing an ordered event stream.
pub trait Runner: Send + Sync {
    /// Application the runner's sessions belong to.
    fn app_name(&self) -> &str;

    /// Run one turn for `new_message`. Failures arrive as an `Err` item,
    /// after which the stream ends.
    fn run_async(&self, user_id: &str, session_id: &str, new_message: Content) -> EventStream;
}

/// Runner bound to one agent, one session store and one model provider.
#[derive(Clone)]
pub struct AgentRunner {
    agent: Arc<Agent>,
    app_name: String,
    session_service: Arc<dyn SessionService>,
    provider: Arc<dyn ModelProvider>,
}

impl AgentRunner {
    pub fn new(
        agent: Arc<Agent>,
        app_name: impl Into<String>,
        session_service: Arc<dyn SessionService>,
        provider: Arc<dyn ModelProvider>,
    ) -> Self {
        Self {
            agent,
            app_name: app_name.into(),
            session_service,
            provider,
        }
    }

    /// Build a runner whose provider is resolved from the agent's model and `config`.
    pub fn from_config(
        agent: Arc<Agent>,
        config: &AppConfig,
        session_service: Arc<dyn SessionService>,
    ) -> Result<Self> {
        let provider: Arc<dyn ModelProvider> =
            Arc::from(provider::create_provider(agent.model(), config)?);
        Ok(Self::new(agent, &config.app_name, session_service, provider))
    }

    pub fn agent(&self) -> &Arc<Agent> {
        &self.agent
    }

    pub fn session_service(&self) -> &Arc<dyn SessionService> {
        &self.session_service
    }
}

impl std::fmt::Debug for AgentRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRunner")
            .field("agent", &self.agent.name())
            .field("app_name", &self.app_name)
            .field("provider", &self.provider.provider_name())
            .finish()
    }
}

impl Runner for AgentRunner {
    fn app_name(&self) -> &str {
        &self.app_name
    }

    fn run_async(&self, user_id: &str, session_id: &str, new_message: Content) -> EventStream {
        let key = SessionKey::new(&self.app_name, user_id, session_id);
        Box::pin(run_turn_events(
            Arc::clone(&self.agent),
            Arc::clone(&self.session_service),
            Arc::clone(&self.provider),
            key,
            new_message,
        ))
    }
}

fn run_turn_events(
    agent: Arc<Agent>,
    sessions: Arc<dyn SessionService>,
    provider: Arc<dyn ModelProvider>,
    key: SessionKey,
    new_message: Content,
) -> impl Stream<Item = Result<Event>> + Send + 'static {
    try_stream! {
        let invocation_id = format!("e-{}", Uuid::new_v4());
        let session = load_session(sessions.as_ref(), &key).await?;
        info!(
            user_id = %key.user_id,
            session_id = %key.session_id,
            invocation_id = %invocation_id,
            agent = agent.name(),
            "turn started"
        );

        sessions
            .append_event(&key, Event::new(&invocation_id, USER_AUTHOR).with_content(new_message))
            .await?;

        let mut finished = false;
        if let Some(callback) = agent.before_agent_callback() {
            let mut ctx = CallbackContext::new(&invocation_id, agent.name(), session.state.clone());
            let reply = (callback)(&mut ctx)?;
            let delta = ctx.into_delta();
            if reply.is_some() || !delta.is_empty() {
                let mut event = Event::new(&invocation_id, agent.name()).with_state_delta(delta);
                if let Some(mut content) = reply {
                    content.role = Role::Model;
                    event = event.with_content(content);
                    finished = true;
                }
                let event = sessions.append_event(&key, event).await?;
                if finished {
                    debug!(
                        invocation_id = %invocation_id,
                        "before-agent callback answered the turn"
                    );
                    yield event;
                }
            }
        }

        let mut steps = 0usize;
        while !finished {
            if steps >= agent.max_steps() {
                Err::<(), _>(LogiqError::InvalidState(format!(
                    "agent '{}' exceeded {} model calls in one turn",
                    agent.name(),
                    agent.max_steps()
                )))?;
            }
            steps += 1;

            let session = load_session(sessions.as_ref(), &key).await?;
            let instruction = inject_session_state(agent.instruction(), &session.state)?;
            let request = ProviderRequest {
                system_instruction: (!instruction.is_empty()).then_some(instruction),
                contents: history(&session),
                settings: agent.settings().clone(),
                tools: agent.tool_definitions(),
            };

            let response = provider.generate_content(&request).await?;
            let mut content = response.content;
            content.role = Role::Model;
            assign_call_ids(&mut content);

            let calls: Vec<FunctionCall> = content.function_calls().into_iter().cloned().collect();
            debug!(
                invocation_id = %invocation_id,
                step = steps,
                function_calls = calls.len(),
                finish_reason = ?response.finish_reason,
                "model replied"
            );

            let event = Event::new(&invocation_id, agent.name())
                .with_content(content)
                .with_usage(response.usage);
            let event = sessions.append_event(&key, event).await?;
            yield event;

            if calls.is_empty() {
                finished = true;
            } else {
                let parts =
                    tooling::execute_calls(&agent, &calls, &invocation_id, &session.state).await;
                let event = Event::new(&invocation_id, agent.name())
                    .with_content(Content::new(Role::User, parts));
                let event = sessions.append_event(&key, event).await?;
                yield event;
            }
        }

        info!(invocation_id = %invocation_id, steps, "turn finished");
    }
}

async fn load_session(sessions: &dyn SessionService, key: &SessionKey) -> Result<Session> {
    sessions
        .get_session(key)
        .await?
        .ok_or_else(|| LogiqError::SessionNotFound {
            app_name: key.app_name.clone(),
            user_id: key.user_id.clone(),
            session_id: key.session_id.clone(),
        })
}

/// Conversation history sent to the model: every recorded event with content.
fn history(session: &Session) -> Vec<Content> {
    session
        .events
        .iter()
        .filter(|e| !e.partial)
        .filter_map(|e| e.content.clone())
        .filter(|c| !c.parts.is_empty())
        .collect()
}

/// Function calls without a provider id get one so responses can be matched.
fn assign_call_ids(content: &mut Content) {
    for part in &mut content.parts {
        if let Some(call) = part.function_call.as_mut() {
            if call.id.is_none() {
                call.id = Some(format!("adk-{}", Uuid::new_v4()));
            }
        }
    }
}
