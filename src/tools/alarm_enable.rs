//! Enable/disable alarm tool.

use crate::alarm::AlarmManager;

use super::args;
use super::error::ToolError;
use super::types::{Tool, ToolMode, ToolResult};

/// Tool that enables or disables an alarm.
///
/// Enabling recomputes the next trigger; a one-shot alarm whose date has
/// passed is switched straight back off. Returns `false` for unknown ids.
pub struct AlarmEnableTool {
    manager: AlarmManager,
}

impl AlarmEnableTool {
    pub fn new(manager: AlarmManager) -> Self {
        Self { manager }
    }
}

impl Tool for AlarmEnableTool {
    fn name(&self) -> &str {
        "self.alarm.enable"
    }

    fn description(&self) -> &str {
        "Enable or disable an alarm."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "id": {"type": "integer", "minimum": 0, "maximum": 10000},
                "enable": {"type": "boolean"}
            },
            "required": ["id", "enable"]
        })
    }

    fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let id = args::required_int(&args, "id", 0..=10_000)? as u32;
        let enable = args::required_bool(&args, "enable")?;
        Ok(ToolResult::success(self.manager.set_enabled(id, enable)?))
    }

    fn allowed_in_mode(&self, mode: ToolMode) -> bool {
        mode == ToolMode::Full
    }
}
