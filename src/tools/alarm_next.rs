//! Next alarm tool.

use crate::alarm::AlarmManager;

use super::error::ToolError;
use super::types::{Tool, ToolMode, ToolResult};

/// Tool that reports the soonest scheduled alarm, or `{}` when none is.
pub struct AlarmNextTool {
    manager: AlarmManager,
}

impl AlarmNextTool {
    pub fn new(manager: AlarmManager) -> Self {
        Self { manager }
    }
}

impl Tool for AlarmNextTool {
    fn name(&self) -> &str {
        "self.alarm.next"
    }

    fn description(&self) -> &str {
        "Get next alarm info."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    fn execute(&self, _args: serde_json::Value) -> Result<ToolResult, ToolError> {
        match self.manager.next() {
            Some(next) => ToolResult::json(&next),
            None => Ok(ToolResult::success(serde_json::json!({}))),
        }
    }

    fn allowed_in_mode(&self, _mode: ToolMode) -> bool {
        true
    }
}
