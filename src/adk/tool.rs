use crate::adk::error::ConductorError;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that agent steps can call.
///
/// `name()` and `description()` return `&str` and `schema()` returns `&Value`;
/// implementations store these in struct fields or statics.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool name
    fn name(&self) -> &str;

    /// Returns a human-readable description of what the tool does
    fn description(&self) -> &str;

    /// Returns the JSON schema for the tool's input parameters
    fn schema(&self) -> &Value;

    /// Execute the tool with the given input and return the result
    async fn execute(&self, input: Value) -> Result<Value, ConductorError>;
}
