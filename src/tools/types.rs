//! Core tool types.
//!
//! Defines the [`Tool`] trait every alarm tool implements, [`ToolResult`]
//! for carrying its JSON output, and [`ToolMode`] for access gating.

use serde::{Deserialize, Serialize};

use super::error::ToolError;

/// Tool execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMode {
    /// Read-only mode (no mutations allowed)
    #[default]
    ReadOnly,
    /// Full mode (all tools enabled)
    Full,
}

/// Successful output of a tool execution. Failures are [`ToolError`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Return value as JSON.
    pub content: serde_json::Value,
}

impl ToolResult {
    /// Create a successful tool result.
    pub fn success(content: impl Into<serde_json::Value>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Create a successful result from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Execution`] if `value` cannot be serialized.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ToolError> {
        serde_json::to_value(value)
            .map(Self::success)
            .map_err(|e| ToolError::Execution(format!("cannot serialize result: {e}")))
    }
}

/// Core trait for tools exposed to the assistant.
///
/// All tools must be `Send + Sync` so a registry can be shared across tasks.
pub trait Tool: Send + Sync {
    /// Returns the tool name (e.g. "self.alarm.add").
    fn name(&self) -> &str;

    /// Returns a human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// Returns the JSON Schema for the tool's arguments.
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns `ToolError` for validation/execution failures.
    fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError>;

    /// Whether this tool is allowed in the given mode.
    ///
    /// Query tools return true for both modes. Mutation tools only allow
    /// `ToolMode::Full`.
    fn allowed_in_mode(&self, mode: ToolMode) -> bool;
}
