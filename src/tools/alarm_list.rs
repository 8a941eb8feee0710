//! List alarms tool.
//!
//! Read-only tool returning every alarm, enabled or not, in insertion order.

use crate::alarm::AlarmManager;

use super::error::ToolError;
use super::types::{Tool, ToolMode, ToolResult};

/// Tool that lists all alarms.
///
/// Each entry carries the alarm fields plus `next` (formatted UTC time) and
/// `next_trigger` (seconds, `0` when not scheduled).
pub struct AlarmListTool {
    manager: AlarmManager,
}

impl AlarmListTool {
    pub fn new(manager: AlarmManager) -> Self {
        Self { manager }
    }
}

impl Tool for AlarmListTool {
    fn name(&self) -> &str {
        "self.alarm.list"
    }

    fn description(&self) -> &str {
        "List all alarms."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({"type": "object", "properties": {}})
    }

    fn execute(&self, _args: serde_json::Value) -> Result<ToolResult, ToolError> {
        ToolResult::json(&self.manager.list())
    }

    fn allowed_in_mode(&self, _mode: ToolMode) -> bool {
        true
    }
}
