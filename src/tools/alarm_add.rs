//! Add alarm tool.
//!
//! Mutation tool that creates an alarm of any kind and returns its id.

use std::ops::RangeInclusive;

use tracing::info;

use crate::alarm::{AlarmManager, AlarmRecord, AlarmType, WeekdayMask};

use super::args;
use super::error::ToolError;
use super::types::{Tool, ToolMode, ToolResult};

/// Tool that adds an alarm.
///
/// # Arguments (JSON)
///
/// - `type` (string, required): `once`, `daily`, `weekly`, `monthly`, or
///   `interval`; anything else is treated as `once`
/// - `hour` (0-23) and `minute` (0-59), required
/// - `second` (0-59), `day` (1-31), `month` (1-12), `year` (2024-2100),
///   `weekdays` (bit mask 0-0x7F, bit 0 = Monday), `interval` (1-86400)
/// - `label` (string)
///
/// Omitted integers are stored as `0` and an omitted label as `""`.
pub struct AlarmAddTool {
    manager: AlarmManager,
}

impl AlarmAddTool {
    pub fn new(manager: AlarmManager) -> Self {
        Self { manager }
    }
}

impl Tool for AlarmAddTool {
    fn name(&self) -> &str {
        "self.alarm.add"
    }

    fn description(&self) -> &str {
        "Add an alarm. 'once' needs year, month and day; 'monthly' needs day; \
         'weekly' needs a weekdays bit mask (bit 0 = Monday); 'interval' needs \
         interval seconds. All times are UTC."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": ["once", "daily", "weekly", "monthly", "interval"]
                },
                "hour": {"type": "integer", "minimum": 0, "maximum": 23},
                "minute": {"type": "integer", "minimum": 0, "maximum": 59},
                "second": {"type": "integer", "minimum": 0, "maximum": 59},
                "day": {"type": "integer", "minimum": 1, "maximum": 31},
                "month": {"type": "integer", "minimum": 1, "maximum": 12},
                "year": {"type": "integer", "minimum": 2024, "maximum": 2100},
                "weekdays": {
                    "type": "integer",
                    "minimum": 0,
                    "maximum": 127,
                    "description": "Bit mask of weekdays, bit 0 = Monday ... bit 6 = Sunday"
                },
                "interval": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 86400,
                    "description": "Seconds between firings for interval alarms"
                },
                "label": {"type": "string"}
            },
            "required": ["type", "hour", "minute"]
        })
    }

    fn execute(&self, args: serde_json::Value) -> Result<ToolResult, ToolError> {
        let template = parse_template(&args)?;
        let id = self.manager.add(&template)?;
        info!("add alarm id={id}");
        Ok(ToolResult::success(id))
    }

    fn allowed_in_mode(&self, mode: ToolMode) -> bool {
        mode == ToolMode::Full
    }
}

/// Build an enabled alarm template from tool arguments.
fn parse_template(args: &serde_json::Value) -> Result<AlarmRecord, ToolError> {
    let alarm_type = AlarmType::parse_lenient(args::required_str(args, "type")?);
    let int = |name: &str, range: RangeInclusive<i64>| -> Result<i32, ToolError> {
        Ok(args::optional_int(args, name, range)?.unwrap_or(0) as i32)
    };

    Ok(AlarmRecord {
        enabled: true,
        alarm_type,
        hour: args::required_int(args, "hour", 0..=23)? as i32,
        minute: args::required_int(args, "minute", 0..=59)? as i32,
        second: int("second", 0..=59)?,
        day: int("day", 1..=31)?,
        month: int("month", 1..=12)?,
        year: int("year", 2024..=2100)?,
        weekday_mask: WeekdayMask(int("weekdays", 0..=0x7F)? as u16),
        interval_seconds: args::optional_int(args, "interval", 1..=86_400)?.unwrap_or(0),
        label: args::optional_str(args, "label")?.unwrap_or_default().to_owned(),
        ..AlarmRecord::default()
    })
}
