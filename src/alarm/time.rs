//! UTC calendar arithmetic.
//!
//! All alarm times are naive UTC wall-clock values. Instants are plain
//! seconds since 1970-01-01T00:00:00 with no timezone or DST handling, so
//! conversion is done by counting days rather than through the platform's
//! broken-down-time routines.

use std::sync::atomic::{AtomicI64, Ordering};

/// UTC seconds since the Unix epoch.
pub type Instant = i64;

/// Seconds in one civil day.
pub const SECS_PER_DAY: i64 = 86_400;

/// Gregorian leap-year rule.
#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 31,
    }
}

/// Convert naive UTC calendar fields into an [`Instant`].
///
/// `month` is clamped into `1..=12` before counting; month 13 does not roll
/// over into the next year. `day` is not clamped: day 0 lands on the last
/// day of the previous month and day 32 spills into the next one.
#[must_use]
pub fn make_instant(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Instant {
    let month = month.clamp(1, 12);
    let days = days_from_civil(i64::from(year), i64::from(month)) + i64::from(day) - 1;

    days * SECS_PER_DAY + i64::from(hour) * 3600 + i64::from(minute) * 60 + i64::from(second)
}

// Days from the epoch to the first of `month` (1-12) in `year`, proleptic
// Gregorian. Inverse of `civil_from_days`.
fn days_from_civil(year: i64, month: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year.rem_euclid(400);
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Broken-down UTC representation of an [`Instant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilTime {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// 1-31.
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Monday = 0 … Sunday = 6, matching the weekday mask bit order.
    pub weekday: u32,
}

impl CivilTime {
    /// Break `instant` into calendar fields.
    #[must_use]
    pub fn from_instant(instant: Instant) -> Self {
        let days = instant.div_euclid(SECS_PER_DAY);
        let secs_of_day = instant.rem_euclid(SECS_PER_DAY);

        let (year, month, day) = civil_from_days(days);
        // 1970-01-01 was a Thursday (Monday-based index 3).
        let weekday = (days + 3).rem_euclid(7) as u32;

        Self {
            year,
            month,
            day,
            hour: (secs_of_day / 3600) as u32,
            minute: ((secs_of_day % 3600) / 60) as u32,
            second: (secs_of_day % 60) as u32,
            weekday,
        }
    }

    /// The same calendar day at the given time of day.
    #[must_use]
    pub fn at_time(&self, hour: i32, minute: i32, second: i32) -> Instant {
        make_instant(
            self.year,
            self.month as i32,
            self.day as i32,
            hour,
            minute,
            second,
        )
    }
}

// Days-since-epoch to (year, month, day), proleptic Gregorian.
fn civil_from_days(days: i64) -> (i32, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}

/// Format as `YYYY-MM-DD HH:MM:SS`, or `"invalid"` for negative instants.
#[must_use]
pub fn format_instant(instant: Instant) -> String {
    if instant < 0 {
        return "invalid".to_owned();
    }
    let t = CivilTime::from_instant(instant);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        t.year, t.month, t.day, t.hour, t.minute, t.second
    )
}

/// Format the time-of-day part as `HH:MM:SS`.
#[must_use]
pub fn format_time_of_day(instant: Instant) -> String {
    let t = CivilTime::from_instant(instant);
    format!("{:02}:{:02}:{:02}", t.hour, t.minute, t.second)
}

/// Current UTC time in whole seconds.
#[must_use]
pub fn now_utc() -> Instant {
    chrono::Utc::now().timestamp()
}

/// Source of "now" for the alarm manager.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now: Instant) -> Self {
        Self {
            now: AtomicI64::new(now),
        }
    }

    pub fn set(&self, now: Instant) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.load(Ordering::SeqCst)
    }
}
