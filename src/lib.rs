//! Fae alarms: persistent UTC alarm scheduling for the Fae assistant.
//!
//! This crate keeps a small set of one-shot and recurring alarms, persists
//! them in a namespaced key-value store, and drives a single deadline timer
//! for whichever alarm is due next:
//! tool call → AlarmManager → AlarmStore → SingleTimerScheduler → AlarmEvent
//!
//! # Architecture
//!
//! - **Alarm engine** ([`alarm`]): time arithmetic, recurrence rules, the
//!   store, the one-timer scheduler, persistence, and the manager
//! - **Tools** ([`tools`]): `self.alarm.*` tools behind a mode-gated registry
//! - **Host bridge** ([`host`]): newline-delimited JSON over stdin/stdout
//! - **Config** ([`config`]): TOML settings with platform defaults

pub mod alarm;
pub mod config;
pub mod error;
pub mod host;
pub mod tools;

pub use alarm::{AlarmEvent, AlarmManager, AlarmRecord, AlarmType};
pub use config::AlarmConfig;
pub use error::{AlarmError, Result};
pub use tools::{ToolMode, ToolRegistry, register_alarm_tools};
