//! Agent definitions: instruction, model settings, tools and callbacks.

pub mod agent;
pub mod callback;
pub mod instruction;

pub use agent::Agent;
pub use callback::{BeforeAgentCallback, CallbackContext};
pub use instruction::inject_session_state;
