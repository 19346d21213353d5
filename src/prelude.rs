//! Convenience re-exports for common use.

pub use crate::agent::{Agent, CallbackContext};
pub use crate::bootstrap::{ChatScope, SessionBootstrap};
pub use crate::bridge::{run_turn, run_turn_blocking, FALLBACK_RESPONSE};
pub use crate::catalog::Catalog;
pub use crate::config::AppConfig;
pub use crate::error::{LogiqError, Result};
pub use crate::events::{Event, EventStream};
pub use crate::models::LanguageModel;
pub use crate::provider::ModelProvider;
pub use crate::runner::{AgentRunner, Runner};
pub use crate::session::{InMemorySessionService, SessionService, SessionState};
pub use crate::tools::{FunctionTool, Tool, ToolArguments, ToolParameters};
pub use crate::types::{Content, GenerationSettings, Part, Role};
