//! Clear alarms tool.

use crate::alarm::AlarmManager;

use super::error::ToolError;
use super::types::{Tool, ToolMode, ToolResult};

/// Tool that removes every alarm. Always returns `true`.
pub struct AlarmClearTool {
    manager: AlarmManager,
}

impl AlarmClearTool {
    pub fn new(manager: AlarmManager) -> Self {
        Self { manager }
    }
}

impl Tool for AlarmClearTool {
    fn name(&self) -> &str {
        "self.alarm.clear"
    }

    fn description(&self) -> &str {
        "Clear all alarms."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    fn execute(&self, _args: serde_json::Value) -> Result<ToolResult, ToolError> {
        self.manager.clear()?;
        Ok(ToolResult::success(true))
    }

    fn allowed_in_mode(&self, mode: ToolMode) -> bool {
        mode == ToolMode::Full
    }
}
