//! Recurrence engine.
//!
//! Computes the next UTC instant at which an alarm must fire. The
//! calculation itself is pure ([`next_trigger`]); [`recalculate`] applies the
//! outcome to a record.
//!
//! Calendar scans (weekly, monthly) accept only candidates strictly after
//! `now`. Firing code advances recurring alarms with `now + 1` so an alarm
//! consumed in this second is never selected again.

use super::time::{self, CivilTime, Instant, SECS_PER_DAY};
use super::types::{AlarmRecord, AlarmType};

/// Days scanned ahead for weekly alarms.
const WEEKLY_LOOKAHEAD_DAYS: i64 = 14;

/// Months scanned ahead for monthly alarms.
const MONTHLY_LOOKAHEAD_MONTHS: i32 = 24;

/// Outcome of a recurrence calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextTrigger {
    /// The alarm fires at this instant.
    At(Instant),
    /// No candidate exists for the current configuration (empty weekday
    /// mask, day that never occurs in the lookahead). The alarm stays
    /// enabled.
    Dormant,
    /// A one-shot alarm whose instant has passed.
    Lapsed,
    /// The record is disabled.
    Disabled,
}

impl NextTrigger {
    /// Cached representation: the instant, or `0`.
    #[must_use]
    pub fn as_instant(self) -> Instant {
        match self {
            Self::At(t) => t,
            Self::Dormant | Self::Lapsed | Self::Disabled => 0,
        }
    }
}

/// Compute when `record` fires next, relative to `now`.
#[must_use]
pub fn next_trigger(record: &AlarmRecord, now: Instant) -> NextTrigger {
    if !record.enabled {
        return NextTrigger::Disabled;
    }

    match record.alarm_type {
        AlarmType::OneShot => {
            let t = time::make_instant(
                record.year,
                record.month,
                record.day,
                record.hour,
                record.minute,
                record.second,
            );
            if t <= now {
                NextTrigger::Lapsed
            } else {
                NextTrigger::At(t)
            }
        }
        AlarmType::Daily => {
            let today = CivilTime::from_instant(now);
            let mut candidate = today.at_time(record.hour, record.minute, record.second);
            if candidate <= now {
                candidate += SECS_PER_DAY;
            }
            NextTrigger::At(candidate)
        }
        AlarmType::Weekly => next_weekly(record, now),
        AlarmType::Monthly => next_monthly(record, now),
        AlarmType::Interval => {
            if record.next_trigger == 0 || record.next_trigger <= now {
                NextTrigger::At(now.saturating_add(record.effective_interval()))
            } else {
                NextTrigger::At(record.next_trigger)
            }
        }
    }
}

fn next_weekly(record: &AlarmRecord, now: Instant) -> NextTrigger {
    for offset in 0..WEEKLY_LOOKAHEAD_DAYS {
        let day = CivilTime::from_instant(now + offset * SECS_PER_DAY);
        if !record.weekday_mask.contains(day.weekday) {
            continue;
        }
        let candidate = day.at_time(record.hour, record.minute, record.second);
        if candidate > now {
            return NextTrigger::At(candidate);
        }
    }
    NextTrigger::Dormant
}

fn next_monthly(record: &AlarmRecord, now: Instant) -> NextTrigger {
    let today = CivilTime::from_instant(now);
    let day = record.day.max(1);

    for step in 0..MONTHLY_LOOKAHEAD_MONTHS {
        // Zero-based month count from the start of `today.year`.
        let index = today.month as i32 - 1 + step;
        let year = today.year + index / 12;
        let month = index % 12 + 1;

        if day > time::days_in_month(year, month as u32) as i32 {
            continue;
        }
        let candidate =
            time::make_instant(year, month, day, record.hour, record.minute, record.second);
        if candidate > now {
            return NextTrigger::At(candidate);
        }
    }
    NextTrigger::Dormant
}

/// Recompute `record.next_trigger` against `now`.
///
/// A lapsed one-shot alarm is disabled. Returns the outcome so callers can
/// log or react to lapses.
pub fn recalculate(record: &mut AlarmRecord, now: Instant) -> NextTrigger {
    let outcome = next_trigger(record, now);
    if outcome == NextTrigger::Lapsed {
        record.enabled = false;
    }
    record.next_trigger = outcome.as_instant();
    outcome
}

/// Advance a record that has just fired at `now`.
///
/// One-shot alarms are disabled, interval alarms restart from `now`, and
/// calendar alarms are recalculated from `now + 1`.
pub fn advance_after_fire(record: &mut AlarmRecord, now: Instant) {
    match record.alarm_type {
        AlarmType::OneShot => {
            record.enabled = false;
            record.next_trigger = 0;
        }
        AlarmType::Interval => {
            record.next_trigger = now.saturating_add(record.effective_interval());
        }
        AlarmType::Daily | AlarmType::Weekly | AlarmType::Monthly => {
            recalculate(record, now.saturating_add(1));
        }
    }
}
