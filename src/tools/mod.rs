//! Tool surface for the alarm manager.
//!
//! Provides a registry-based tool architecture with mode gating and JSON
//! Schema metadata, so an assistant can drive alarms by name.
//!
//! # Tools
//!
//! - **self.alarm.add** — Add an alarm, returns its id
//! - **self.alarm.list** — List every alarm
//! - **self.alarm.remove** — Remove an alarm by id
//! - **self.alarm.enable** — Enable or disable an alarm
//! - **self.alarm.next** — Report the soonest scheduled alarm
//! - **self.alarm.clear** — Remove every alarm
//!
//! # Mode Gating
//!
//! - `ReadOnly` — Only `list` and `next` are available
//! - `Full` — All tools are available

pub mod alarm_add;
pub mod alarm_clear;
pub mod alarm_enable;
pub mod alarm_list;
pub mod alarm_next;
pub mod alarm_remove;
pub mod args;
pub mod error;
pub mod registry;
pub mod types;


use std::sync::Arc;

use crate::alarm::AlarmManager;

pub use alarm_add::AlarmAddTool;
pub use alarm_clear::AlarmClearTool;
pub use alarm_enable::AlarmEnableTool;
pub use alarm_list::AlarmListTool;
pub use alarm_next::AlarmNextTool;
pub use alarm_remove::AlarmRemoveTool;
pub use error::ToolError;
pub use registry::ToolRegistry;
pub use types::{Tool, ToolMode, ToolResult};

/// Register all six alarm tools against `manager`.
pub fn register_alarm_tools(registry: &mut ToolRegistry, manager: AlarmManager) {
    registry.register(Arc::new(AlarmAddTool::new(manager.clone())));
    registry.register(Arc::new(AlarmListTool::new(manager.clone())));
    registry.register(Arc::new(AlarmRemoveTool::new(manager.clone())));
    registry.register(Arc::new(AlarmEnableTool::new(manager.clone())));
    registry.register(Arc::new(AlarmNextTool::new(manager.clone())));
    registry.register(Arc::new(AlarmClearTool::new(manager)));
}
