//! Alarm manager: the store, the single-timer scheduler, persistence, and
//! firing side effects behind one exclusive lock.
//!
//! Every public operation takes the lock for its whole duration, persists
//! the list, and re-arms the timer before returning. The timer callback is
//! a closure holding a [`Weak`] reference to the manager, so dropping the
//! last [`AlarmManager`] handle stops any pending deadline from doing work.
//! Side effects of a firing are delivered to the [`AlarmNotifier`] only
//! after the lock has been released.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, error, info, warn};

use crate::config::{AlarmConfig, NotifyConfig};
use crate::error::Result;

use super::notify::{self, AlarmEvent, AlarmNotifier, NoopNotifier};
use super::persist::{self, FileStore, KeyValueStore, NAMESPACE};
use super::scheduler::{SchedulerState, SingleTimerScheduler};
use super::store::{AlarmStore, FiredAlarm};
use super::time::{Clock, Instant, SystemClock};
use super::timer::{DeadlineTimer, FireCallback, TokioTimer};
use super::types::{AlarmRecord, AlarmSummary, NextAlarm};

struct Inner {
    store: AlarmStore,
    scheduler: SingleTimerScheduler,
}

struct Shared {
    inner: Mutex<Inner>,
    storage: Box<dyn KeyValueStore>,
    notifier: Arc<dyn AlarmNotifier>,
    clock: Arc<dyn Clock>,
    notify_config: NotifyConfig,
    this: Weak<Shared>,
}

/// Handle to the process-wide alarm set.
///
/// Cheap to clone; all clones share one store and one timer.
#[derive(Clone)]
pub struct AlarmManager {
    shared: Arc<Shared>,
}

/// Builder for [`AlarmManager`].
pub struct AlarmManagerBuilder {
    config: AlarmConfig,
    storage: Option<Box<dyn KeyValueStore>>,
    timer: Option<Box<dyn DeadlineTimer>>,
    notifier: Option<Arc<dyn AlarmNotifier>>,
    clock: Option<Arc<dyn Clock>>,
}

impl AlarmManagerBuilder {
    /// Persist through `storage` instead of the configured file store.
    pub fn with_storage(mut self, storage: Box<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Drive `timer` instead of a [`TokioTimer`] on the current runtime.
    pub fn with_timer(mut self, timer: Box<dyn DeadlineTimer>) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Deliver firing side effects to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn AlarmNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Read "now" from `clock` instead of the system clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build an idle manager with an empty store. Call
    /// [`AlarmManager::initialize`] to load persisted alarms.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::Timer`](crate::AlarmError::Timer) when no timer
    /// was supplied and none can be created.
    pub fn build(self) -> Result<AlarmManager> {
        let timer = match self.timer {
            Some(timer) => timer,
            None => Box::new(TokioTimer::new()?),
        };
        let storage = self.storage.unwrap_or_else(|| {
            Box::new(FileStore::new(
                self.config.storage.resolved_dir(),
                NAMESPACE,
            ))
        });
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(NoopNotifier));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let policy = self.config.scheduler.arm_policy();
        let notify_config = self.config.notify;

        let shared = Arc::new_cyclic(|this| Shared {
            inner: Mutex::new(Inner {
                store: AlarmStore::new(),
                scheduler: SingleTimerScheduler::new(timer, policy),
            }),
            storage,
            notifier,
            clock,
            notify_config,
            this: this.clone(),
        });
        Ok(AlarmManager { shared })
    }
}

impl AlarmManager {
    /// Start building a manager from `config`.
    pub fn builder(config: AlarmConfig) -> AlarmManagerBuilder {
        AlarmManagerBuilder {
            config,
            storage: None,
            timer: None,
            notifier: None,
            clock: None,
        }
    }

    /// Load persisted alarms, recompute every trigger, and arm the timer.
    ///
    /// Unreadable or malformed persisted data is logged and treated as an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns the timer error when the deadline cannot be armed.
    pub fn initialize(&self) -> Result<SchedulerState> {
        self.shared.initialize()
    }

    /// Add an alarm built from `template` and return its id.
    ///
    /// The template's `id` and `next_trigger` are ignored. A one-shot
    /// template in the past is stored disabled.
    pub fn add(&self, template: &AlarmRecord) -> Result<u32> {
        let mut inner = self.shared.lock();
        let now = self.shared.clock.now();
        let id = inner.store.add(template, now);
        info!("added alarm id={id} type={} label={}", template.alarm_type, template.label);
        self.shared.commit(&mut inner, now)?;
        Ok(id)
    }

    /// Remove an alarm. Returns `false` when no alarm has `id`.
    pub fn remove(&self, id: u32) -> Result<bool> {
        let mut inner = self.shared.lock();
        if !inner.store.remove(id) {
            return Ok(false);
        }
        let now = self.shared.clock.now();
        self.shared.commit(&mut inner, now)?;
        Ok(true)
    }

    /// Enable or disable an alarm. Returns `false` when no alarm has `id`.
    pub fn set_enabled(&self, id: u32, enabled: bool) -> Result<bool> {
        let mut inner = self.shared.lock();
        let now = self.shared.clock.now();
        if !inner.store.set_enabled(id, enabled, now) {
            return Ok(false);
        }
        self.shared.commit(&mut inner, now)?;
        Ok(true)
    }

    /// Remove every alarm.
    pub fn clear(&self) -> Result<()> {
        let mut inner = self.shared.lock();
        inner.store.clear();
        let now = self.shared.clock.now();
        self.shared.commit(&mut inner, now)?;
        Ok(())
    }

    pub fn list(&self) -> Vec<AlarmSummary> {
        self.shared.lock().store.list()
    }

    /// The soonest enabled alarm, if any is scheduled.
    pub fn next(&self) -> Option<NextAlarm> {
        self.shared.lock().store.next()
    }

    /// Snapshot of every record.
    pub fn records(&self) -> Vec<AlarmRecord> {
        self.shared.lock().store.records().to_vec()
    }

    /// Current timer state.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.shared.lock().scheduler.state()
    }

    /// Process a timer expiry: fire every due alarm, persist, re-arm.
    ///
    /// Normally invoked by the timer itself; exposed for hosts that drive
    /// their own deadlines.
    pub fn on_deadline(&self) -> Result<Vec<FiredAlarm>> {
        self.shared.on_deadline()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn initialize(&self) -> Result<SchedulerState> {
        let mut inner = self.lock();
        let records = persist::load_alarms(self.storage.as_ref()).unwrap_or_else(|e| {
            warn!("cannot load persisted alarms: {e}");
            Vec::new()
        });
        info!("loaded {} persisted alarms", records.len());

        inner.store = AlarmStore::from_records(records);
        let now = self.clock.now();
        inner.store.recalculate_all(now);
        self.rearm(&mut inner, now)
    }

    fn on_deadline(&self) -> Result<Vec<FiredAlarm>> {
        let (fired, events, rearmed) = {
            let mut inner = self.lock();
            let now = self.clock.now();
            debug!("alarm deadline reached at {now}");

            let fired = inner.store.fire_due(now);
            let mut events: Vec<AlarmEvent> = Vec::with_capacity(fired.len() * 3);
            for alarm in &fired {
                info!("alarm fired id={} label={}", alarm.id, alarm.label);
                events.extend(notify::events_for(alarm, &self.notify_config));
            }

            self.persist(&inner.store);
            let rearmed = self.rearm(&mut inner, now);
            (fired, events, rearmed)
        };

        for event in events {
            self.notifier.notify(event);
        }
        rearmed?;
        Ok(fired)
    }

    fn commit(&self, inner: &mut Inner, now: Instant) -> Result<SchedulerState> {
        self.persist(&inner.store);
        self.rearm(inner, now)
    }

    fn persist(&self, store: &AlarmStore) {
        if let Err(e) = persist::save_alarms(self.storage.as_ref(), store.records()) {
            error!("cannot persist alarms: {e}");
        }
    }

    fn rearm(&self, inner: &mut Inner, now: Instant) -> Result<SchedulerState> {
        let this = self.this.clone();
        let on_fire: FireCallback = Box::new(move || {
            let Some(shared) = this.upgrade() else {
                debug!("alarm manager dropped before deadline");
                return;
            };
            if let Err(e) = shared.on_deadline() {
                error!("alarm timer could not be re-armed after firing: {e}");
            }
        });
        inner.scheduler.rearm(&inner.store, now, on_fire)
    }
}
