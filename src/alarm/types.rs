//! Alarm record definitions.
//!
//! Defines [`AlarmType`], the [`AlarmRecord`] stored by the alarm store, and
//! the serializable summaries handed to the tool surface.

use serde::{Deserialize, Serialize};

use super::time::{self, Instant};

/// Interval used when an interval alarm has no positive `interval_seconds`.
pub const DEFAULT_INTERVAL_SECS: i64 = 60;

/// How an alarm recurs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmType {
    /// Fires once at an absolute date and time.
    #[default]
    #[serde(rename = "once")]
    OneShot,
    /// Fires every day at the same time.
    #[serde(rename = "daily")]
    Daily,
    /// Fires on the weekdays selected by the weekday mask.
    #[serde(rename = "weekly")]
    Weekly,
    /// Fires on a fixed day of every month that has that day.
    #[serde(rename = "monthly")]
    Monthly,
    /// Fires every `interval_seconds`.
    #[serde(rename = "interval")]
    Interval,
}

impl AlarmType {
    /// Wire name used in persisted data and tool arguments.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneShot => "once",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Interval => "interval",
        }
    }

    /// Parse a wire name. Unrecognised names fall back to [`AlarmType::OneShot`].
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "interval" => Self::Interval,
            _ => Self::OneShot,
        }
    }
}

impl std::fmt::Display for AlarmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seven-bit weekday selection, bit 0 = Monday … bit 6 = Sunday.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekdayMask(pub u16);

impl WeekdayMask {
    /// Every day of the week.
    pub const ALL: Self = Self(0x7F);
    /// Monday through Friday.
    pub const WORKDAYS: Self = Self(0x1F);

    /// Build a mask from Monday-based weekday indices (0-6). Out-of-range
    /// indices are ignored.
    #[must_use]
    pub fn from_days(days: &[u32]) -> Self {
        Self(
            days.iter()
                .filter(|d| **d < 7)
                .fold(0, |mask, d| mask | (1 << *d)),
        )
    }

    /// Whether the Monday-based weekday index is selected.
    #[must_use]
    pub fn contains(self, weekday: u32) -> bool {
        weekday < 7 && self.0 & (1 << weekday) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 & 0x7F == 0
    }
}

/// One user-defined alarm.
///
/// `next_trigger` is derived state maintained by the recurrence engine; it
/// is `0` when nothing is scheduled and is never edited by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmRecord {
    /// Unique within the store, never reused while the store lives.
    pub id: u32,
    pub enabled: bool,
    pub alarm_type: AlarmType,
    /// Used by one-shot alarms.
    pub year: i32,
    /// Used by one-shot alarms (1-12).
    pub month: i32,
    /// Used by one-shot and monthly alarms (1-31).
    pub day: i32,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    /// Used by weekly alarms.
    pub weekday_mask: WeekdayMask,
    /// Used by interval alarms; values below 1 mean [`DEFAULT_INTERVAL_SECS`].
    pub interval_seconds: i64,
    pub label: String,
    /// Next firing instant, `0` when none is scheduled.
    pub next_trigger: Instant,
}

impl AlarmRecord {
    fn template(alarm_type: AlarmType, label: impl Into<String>) -> Self {
        Self {
            enabled: true,
            alarm_type,
            label: label.into(),
            ..Self::default()
        }
    }

    /// One-shot alarm at an absolute UTC date and time.
    #[must_use]
    pub fn once(
        (year, month, day): (i32, i32, i32),
        (hour, minute, second): (i32, i32, i32),
        label: impl Into<String>,
    ) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            ..Self::template(AlarmType::OneShot, label)
        }
    }

    /// Alarm firing every day at `hour:minute:second`.
    #[must_use]
    pub fn daily(hour: i32, minute: i32, second: i32, label: impl Into<String>) -> Self {
        Self {
            hour,
            minute,
            second,
            ..Self::template(AlarmType::Daily, label)
        }
    }

    /// Alarm firing on the selected weekdays at `hour:minute:second`.
    #[must_use]
    pub fn weekly(
        weekday_mask: WeekdayMask,
        (hour, minute, second): (i32, i32, i32),
        label: impl Into<String>,
    ) -> Self {
        Self {
            weekday_mask,
            hour,
            minute,
            second,
            ..Self::template(AlarmType::Weekly, label)
        }
    }

    /// Alarm firing on `day` of every month that has that many days.
    #[must_use]
    pub fn monthly(day: i32, (hour, minute, second): (i32, i32, i32), label: impl Into<String>) -> Self {
        Self {
            day,
            hour,
            minute,
            second,
            ..Self::template(AlarmType::Monthly, label)
        }
    }

    /// Alarm firing every `interval_seconds`.
    #[must_use]
    pub fn interval(interval_seconds: i64, label: impl Into<String>) -> Self {
        Self {
            interval_seconds,
            ..Self::template(AlarmType::Interval, label)
        }
    }

    /// `interval_seconds`, or [`DEFAULT_INTERVAL_SECS`] when not positive.
    #[must_use]
    pub fn effective_interval(&self) -> i64 {
        if self.interval_seconds >= 1 {
            self.interval_seconds
        } else {
            DEFAULT_INTERVAL_SECS
        }
    }

    /// Enabled with a pending trigger.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.enabled && self.next_trigger != 0
    }

    /// Summary used by the list operation.
    #[must_use]
    pub fn summary(&self) -> AlarmSummary {
        AlarmSummary {
            id: self.id,
            enabled: self.enabled,
            alarm_type: self.alarm_type,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            day: self.day,
            month: self.month,
            year: self.year,
            weekdays: self.weekday_mask.0,
            next: time::format_instant(self.next_trigger),
            next_trigger: self.next_trigger,
            interval: (self.alarm_type == AlarmType::Interval).then_some(self.interval_seconds),
            label: self.label.clone(),
        }
    }

    /// Summary used by the next-alarm operation.
    #[must_use]
    pub fn next_summary(&self) -> NextAlarm {
        NextAlarm {
            id: self.id,
            alarm_type: self.alarm_type,
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            label: self.label.clone(),
            time: self.next_trigger,
            interval: (self.alarm_type == AlarmType::Interval).then_some(self.interval_seconds),
        }
    }
}

/// Read-only projection of one alarm for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmSummary {
    pub id: u32,
    pub enabled: bool,
    #[serde(rename = "type")]
    pub alarm_type: AlarmType,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub weekdays: u16,
    /// `YYYY-MM-DD HH:MM:SS` of the next trigger.
    pub next: String,
    pub next_trigger: Instant,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interval: Option<i64>,
    pub label: String,
}

/// Read-only projection of the soonest alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextAlarm {
    pub id: u32,
    #[serde(rename = "type")]
    pub alarm_type: AlarmType,
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
    pub label: String,
    /// Trigger instant in UTC seconds.
    pub time: Instant,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub interval: Option<i64>,
}
