//! Single-timer scheduling state machine.
//!
//! [`SingleTimerScheduler`] owns the one deadline timer. After every store
//! mutation or firing it is re-armed for the globally soonest enabled
//! trigger, or left idle when nothing is pending.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;

use super::store::AlarmStore;
use super::time::{self, Instant};
use super::timer::{DeadlineTimer, FireCallback};

/// Whether a deadline is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// No timer armed.
    #[default]
    Idle,
    /// Timer armed for the soonest trigger.
    Armed {
        /// Trigger instant the timer was armed for.
        deadline: Instant,
        /// Alarm owning that trigger (first found on ties).
        alarm_id: u32,
    },
}

impl SchedulerState {
    #[must_use]
    pub fn deadline(self) -> Option<Instant> {
        match self {
            Self::Idle => None,
            Self::Armed { deadline, .. } => Some(deadline),
        }
    }
}

/// Timing policy for arming the deadline timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmPolicy {
    /// Smallest delay ever requested from the timer.
    pub min_resolution: Duration,
    /// Extra time added to every delay to absorb clock and timer jitter.
    pub safety_margin: Duration,
}

impl Default for ArmPolicy {
    fn default() -> Self {
        Self {
            min_resolution: Duration::from_millis(1),
            safety_margin: Duration::from_secs(1),
        }
    }
}

impl ArmPolicy {
    /// Timer delay for `deadline` as seen from `now`.
    #[must_use]
    pub fn delay_until(&self, deadline: Instant, now: Instant) -> Duration {
        let remaining = Duration::from_secs(deadline.saturating_sub(now).max(0) as u64);
        remaining.max(self.min_resolution).saturating_add(self.safety_margin)
    }
}

/// Owner of the single outstanding deadline timer.
pub struct SingleTimerScheduler {
    timer: Box<dyn DeadlineTimer>,
    policy: ArmPolicy,
    state: SchedulerState,
}

impl SingleTimerScheduler {
    /// Create an idle scheduler driving `timer`.
    pub fn new(timer: Box<dyn DeadlineTimer>, policy: ArmPolicy) -> Self {
        Self {
            timer,
            policy,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Cancel the outstanding timer and arm for the soonest trigger in
    /// `store`, or go idle when there is none.
    ///
    /// # Errors
    ///
    /// Returns the timer error when arming fails; the scheduler is then
    /// idle.
    pub fn rearm(
        &mut self,
        store: &AlarmStore,
        now: Instant,
        on_fire: FireCallback,
    ) -> Result<SchedulerState> {
        self.timer.cancel();
        self.state = SchedulerState::Idle;

        let Some(target) = store.soonest() else {
            info!("no active alarms to schedule");
            return Ok(self.state);
        };

        let delay = self.policy.delay_until(target.next_trigger, now);
        self.timer.arm(delay, on_fire)?;
        self.state = SchedulerState::Armed {
            deadline: target.next_trigger,
            alarm_id: target.id,
        };

        let secs = delay.saturating_sub(self.policy.safety_margin).as_secs();
        info!(
            "scheduled alarm id={} label={} after {}h {}m {}s",
            target.id,
            target.label,
            secs / 3600,
            secs / 60 % 60,
            secs % 60
        );
        debug!("now {}", time::format_time_of_day(now));
        Ok(self.state)
    }
}
