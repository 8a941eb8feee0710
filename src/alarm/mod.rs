//! Persistent alarm scheduling.
//!
//! Alarms are recurring or one-shot triggers on UTC wall-clock time:
//!
//! - [`types`]: the [`AlarmRecord`] data model and its summaries
//! - [`time`]: second-resolution UTC calendar arithmetic
//! - [`recurrence`]: next-trigger computation per alarm kind
//! - [`store`]: the in-memory ordered alarm set
//! - [`scheduler`]: the single deadline timer state machine
//! - [`persist`]: the key-value settings store and JSON codec
//! - [`notify`]: firing side effects
//! - [`manager`]: everything above behind one lock
//!
//! Only one timer is ever armed, for the soonest enabled trigger across all
//! alarms.

pub mod manager;
pub mod notify;
pub mod persist;
pub mod recurrence;
pub mod scheduler;
pub mod store;
pub mod time;
pub mod timer;
pub mod types;

pub use manager::{AlarmManager, AlarmManagerBuilder};
pub use notify::{AlarmEvent, AlarmNotifier, ChannelNotifier, NoopNotifier};
pub use persist::{FileStore, KeyValueStore, MemoryStore};
pub use scheduler::{ArmPolicy, SchedulerState};
pub use store::{AlarmStore, FiredAlarm};
pub use time::{Clock, Instant, ManualClock, SystemClock};
pub use timer::{DeadlineTimer, ManualTimer, TokioTimer};
pub use types::{AlarmRecord, AlarmSummary, AlarmType, NextAlarm, WeekdayMask};
