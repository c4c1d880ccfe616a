//! Tool definition - schema and metadata for a tool.

use serde::{Deserialize, Serialize};

/// Definition of a tool that can be invoked by an agent.
///
/// Contains the schema the model needs to produce a well-formed call.
///
/// # Examples
///
/// ```ignore
/// use agency_assistant::domain::conversation::tools::ToolDefinition;
///
/// let definition = ToolDefinition::new(
///     "submit_project_brief",
///     "Record a project brief for the sales team",
///     serde_json::json!({
///         "type": "object",
///         "required": ["project_type", "summary"],
///         "properties": {
///             "project_type": { "type": "string" },
///             "summary": { "type": "string" }
///         }
///     }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "submit_project_brief")
    name: String,

    /// Human-readable description for the model
    description: String,

    /// JSON Schema for the parameters
    parameters_schema: serde_json::Value,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters_schema: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters_schema,
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters schema.
    pub fn parameters_schema(&self) -> &serde_json::Value {
        &self.parameters_schema
    }

    /// Converts to OpenAI tool format.
    pub fn to_openai_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters_schema
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["summary"],
            "properties": {
                "summary": { "type": "string" }
            }
        })
    }

    #[test]
    fn new_creates_definition() {
        let def =
            ToolDefinition::new("submit_project_brief", "Record a brief", sample_params_schema());

        assert_eq!(def.name(), "submit_project_brief");
        assert_eq!(def.description(), "Record a brief");
        assert_eq!(def.parameters_schema()["required"][0], "summary");
    }

    #[test]
    fn to_openai_format_has_correct_structure() {
        let def =
            ToolDefinition::new("submit_project_brief", "Record a brief", sample_params_schema());

        let openai = def.to_openai_format();

        assert_eq!(openai["type"], "function");
        assert_eq!(openai["function"]["name"], "submit_project_brief");
        assert_eq!(openai["function"]["description"], "Record a brief");
        assert!(openai["function"]["parameters"].is_object());
    }
}
