//! Remove alarm tool.

use crate::alarm::AlarmManager;

use super::args;
use super::error::ToolError;
use super::types::{Tool, ToolMode, ToolResult};

/// Tool that removes an alarm by id. Returns `false` for unknown ids.
pub struct AlarmRemoveTool {
    manager: AlarmManager,
}

impl AlarmRemoveTool {
    pub fn new(manager: AlarmManager) -> Self {
        Self { manager }
    }
}

impl Tool for AlarmRemoveTool {
    fn name(&self) -> &str {
        "self.alarm.remove"
    }

    fn description(&self) -> &str {
        "Remove an alarm by id."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer", "minimum": 0, "maximum": 10000}
            },
            "required": ["id"]
        })
    }

    fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::required_int(&args, "id", 0..=10_000)? as u32;
        Ok(ToolResult::success(self.manager.remove(id)?))
    }

    fn allowed_in_mode(&self, mode: ToolMode) -> bool {
        mode == ToolMode::Full
    }
}
