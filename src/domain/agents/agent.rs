//! Agent descriptors.
//!
//! An [`Agent`] is configuration only: name, instructions, model, tools and an
//! optional output schema. It holds no conversation state; the runner threads
//! history through it per invocation.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::conversation::tools::ToolDefinition;
use crate::ports::AgentTool;

/// Key under which the detected language is passed in a [`RunContext`].
pub const LANGUAGE_KEY: &str = "language";

/// Run-time values handed to an agent's instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunContext(BTreeMap<String, Value>);

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Context carrying the detected conversation language.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self::new().with(LANGUAGE_KEY, language.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a string value, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn language(&self) -> Option<&str> {
        self.get_str(LANGUAGE_KEY)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Instruction source for an agent.
#[derive(Clone)]
pub enum Instructions {
    /// Fixed system prompt.
    Static(String),
    /// Prompt computed from the run context on every call.
    Dynamic(Arc<dyn Fn(&RunContext) -> String + Send + Sync>),
}

impl Instructions {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&RunContext) -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// Produces the system prompt for this run. Never cached.
    pub fn resolve(&self, context: &RunContext) -> String {
        match self {
            Instructions::Static(text) => text.clone(),
            Instructions::Dynamic(f) => f(context),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Instructions::Dynamic(_))
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instructions::Static(text) => f.debug_tuple("Static").field(&text.len()).finish(),
            Instructions::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl From<&str> for Instructions {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for Instructions {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

/// JSON schema constraining an agent's final answer.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

impl OutputSchema {
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// A named, stateless LLM persona.
#[derive(Clone)]
pub struct Agent {
    name: String,
    instructions: Instructions,
    model: String,
    tools: Vec<Arc<dyn AgentTool>>,
    output_schema: Option<OutputSchema>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<Instructions>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            model: model.into(),
            tools: Vec::new(),
            output_schema: None,
        }
    }

    /// Adds a callable tool.
    pub fn with_tool(mut self, tool: Arc<dyn AgentTool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Constrains the final answer to a JSON schema.
    pub fn with_output_schema(mut self, schema: OutputSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &Instructions {
        &self.instructions
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &[Arc<dyn AgentTool>] {
        &self.tools
    }

    pub fn output_schema(&self) -> Option<&OutputSchema> {
        self.output_schema.as_ref()
    }

    /// Definitions of every tool, in declaration order.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Finds a tool by the name the model used.
    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn AgentTool>> {
        self.tools.iter().find(|t| t.definition().name() == name)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tool_names: Vec<String> = self
            .tools
            .iter()
            .map(|t| t.definition().name().to_string())
            .collect();
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("instructions", &self.instructions)
            .field("model", &self.model)
            .field("tools", &tool_names)
            .field("output_schema", &self.output_schema)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn static_instructions_ignore_context() {
        let instructions = Instructions::from("Be brief.");
        let context = RunContext::with_language("French");

        assert_eq!(instructions.resolve(&context), "Be brief.");
        assert!(!instructions.is_dynamic());
    }

    #[test]
    fn dynamic_instructions_are_recomputed_per_call() {
        let instructions = Instructions::dynamic(|ctx| {
            format!("Reply in {}.", ctx.language().unwrap_or("English"))
        });

        assert_eq!(
            instructions.resolve(&RunContext::with_language("German")),
            "Reply in German."
        );
        assert_eq!(
            instructions.resolve(&RunContext::with_language("Spanish")),
            "Reply in Spanish."
        );
        assert_eq!(instructions.resolve(&RunContext::new()), "Reply in English.");
    }

    #[test]
    fn run_context_get_str_ignores_non_strings() {
        let context = RunContext::new().with("count", 3).with("name", "x");

        assert_eq!(context.get_str("count"), None);
        assert_eq!(context.get_str("name"), Some("x"));
        assert_eq!(context.get("count"), Some(&json!(3)));
    }

    #[test]
    fn agent_builder_sets_fields() {
        let agent = Agent::new("classifier", "Classify.", "gpt-4.1-mini")
            .with_output_schema(OutputSchema::new("out", json!({"type": "object"})));

        assert_eq!(agent.name(), "classifier");
        assert_eq!(agent.model(), "gpt-4.1-mini");
        assert!(agent.tools().is_empty());
        assert_eq!(agent.output_schema().map(|s| s.name.as_str()), Some("out"));
        assert!(agent.find_tool("anything").is_none());
    }
}
