//! Tool system for function calling.

pub mod arguments;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use tool::{FunctionTool, Tool, ToolContext};
pub use types::{ToolDefinition, ToolParameters};
