//! Declarative agent definition.

use std::sync::Arc;

use crate::models::LanguageModel;
use crate::tools::{Tool, ToolDefinition};
use crate::types::GenerationSettings;

use super::callback::BeforeAgentCallback;

/// Default cap on model calls per turn.
pub const DEFAULT_MAX_STEPS: usize = 10;

/// An LLM-driven responder: model, instruction template, tools and callbacks.
#[derive(Clone)]
pub struct Agent {
    name: String,
    description: String,
    model: LanguageModel,
    instruction: String,
    settings: GenerationSettings,
    tools: Vec<Arc<dyn Tool>>,
    before_agent_callback: Option<BeforeAgentCallback>,
    max_steps: usize,
}

impl Agent {
    /// Create a new agent.
    pub fn new(name: impl Into<String>, model: LanguageModel) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            model,
            instruction: String::new(),
            settings: GenerationSettings::default(),
            tools: Vec::new(),
            before_agent_callback: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the instruction template (may reference `{state_key}`).
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Set generation settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Add a tool.
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn with_before_agent_callback(mut self, callback: BeforeAgentCallback) -> Self {
        self.before_agent_callback = Some(callback);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn model(&self) -> &LanguageModel {
        &self.model
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    pub fn before_agent_callback(&self) -> Option<&BeforeAgentCallback> {
        self.before_agent_callback.as_ref()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .field("has_before_agent_callback", &self.before_agent_callback.is_some())
            .field("max_steps", &self.max_steps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{FunctionTool, ToolParameters};

    #[test]
    fn tools_are_looked_up_by_name() {
        let tool: Arc<dyn Tool> = Arc::new(FunctionTool::new(
            "get_categories",
            "List categories",
            ToolParameters::empty(),
            |_args, _ctx| async { Ok::<_, crate::error::LogiqError>(serde_json::json!([])) },
        ));
        let agent = Agent::new("a", LanguageModel::default()).with_tool(tool);

        assert!(agent.tool("get_categories").is_some());
        assert!(agent.tool("nope").is_none());
        assert_eq!(agent.tool_definitions()[0].name, "get_categories");
    }

    #[test]
    fn max_steps_is_at_least_one() {
        let agent = Agent::new("a", LanguageModel::default()).with_max_steps(0);
        assert_eq!(agent.max_steps(), 1);
    }
}
