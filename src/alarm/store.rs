//! In-memory alarm collection.
//!
//! [`AlarmStore`] owns the ordered list of [`AlarmRecord`]s, allocates ids,
//! and keeps every record's `next_trigger` current through the recurrence
//! engine. It performs no locking, persistence, or timer work; the
//! [`AlarmManager`](super::manager::AlarmManager) wraps it for that.

use tracing::debug;

use super::recurrence::{self, NextTrigger};
use super::time::Instant;
use super::types::{AlarmRecord, AlarmSummary, NextAlarm};

/// An alarm that was due when the store processed a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredAlarm {
    pub id: u32,
    pub label: String,
    /// Instant the deadline was processed (not the scheduled trigger).
    pub fired_at: Instant,
}

/// Ordered alarm records with monotonically allocated ids.
#[derive(Debug, Clone)]
pub struct AlarmStore {
    alarms: Vec<AlarmRecord>,
    next_id: u32,
}

impl Default for AlarmStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmStore {
    /// Create an empty store. The first id handed out is `1`.
    pub fn new() -> Self {
        Self {
            alarms: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a store from previously persisted records.
    ///
    /// The id counter resumes at `max(id) + 1`.
    pub fn from_records(alarms: Vec<AlarmRecord>) -> Self {
        let next_id = alarms
            .iter()
            .map(|a| a.id.saturating_add(1))
            .max()
            .unwrap_or(1)
            .max(1);
        Self { alarms, next_id }
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[AlarmRecord] {
        &self.alarms
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Id the next [`add`](Self::add) will assign.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    pub fn get(&self, id: u32) -> Option<&AlarmRecord> {
        self.alarms.iter().find(|a| a.id == id)
    }

    /// Insert a copy of `template` with a fresh id and a computed trigger.
    ///
    /// The template's `id` and `next_trigger` are ignored.
    pub fn add(&mut self, template: &AlarmRecord, now: Instant) -> u32 {
        let mut record = template.clone();
        record.id = self.next_id;
        record.next_trigger = 0;
        self.next_id = self.next_id.saturating_add(1);

        if recurrence::recalculate(&mut record, now) == NextTrigger::Lapsed {
            debug!("alarm {} added with a past date; disabled", record.id);
        }

        let id = record.id;
        self.alarms.push(record);
        id
    }

    /// Delete the record with `id`. Returns `true` when found.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.alarms.len();
        self.alarms.retain(|a| a.id != id);
        self.alarms.len() != before
    }

    /// Enable or disable a record. Returns `true` when found.
    ///
    /// Enabling recomputes the trigger; disabling clears it.
    pub fn set_enabled(&mut self, id: u32, enabled: bool, now: Instant) -> bool {
        let Some(record) = self.alarms.iter_mut().find(|a| a.id == id) else {
            return false;
        };

        record.enabled = enabled;
        if enabled {
            recurrence::recalculate(record, now);
        } else {
            record.next_trigger = 0;
        }
        true
    }

    /// Drop every record. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.alarms.clear();
    }

    /// Recompute every trigger against `now`.
    pub fn recalculate_all(&mut self, now: Instant) {
        for record in &mut self.alarms {
            recurrence::recalculate(record, now);
        }
    }

    /// The enabled record with the smallest nonzero trigger.
    ///
    /// Ties resolve to the first record in insertion order.
    pub fn soonest(&self) -> Option<&AlarmRecord> {
        self.alarms
            .iter()
            .filter(|a| a.is_scheduled())
            .fold(None, |best: Option<&AlarmRecord>, a| match best {
                Some(b) if b.next_trigger <= a.next_trigger => Some(b),
                _ => Some(a),
            })
    }

    pub fn list(&self) -> Vec<AlarmSummary> {
        self.alarms.iter().map(AlarmRecord::summary).collect()
    }

    pub fn next(&self) -> Option<NextAlarm> {
        self.soonest().map(AlarmRecord::next_summary)
    }

    /// Advance every enabled record due at or before `now`.
    ///
    /// Returns the fired alarms in store order.
    pub fn fire_due(&mut self, now: Instant) -> Vec<FiredAlarm> {
        let mut fired = Vec::new();
        for record in &mut self.alarms {
            if !record.is_scheduled() || record.next_trigger > now {
                continue;
            }
            fired.push(FiredAlarm {
                id: record.id,
                label: record.label.clone(),
                fired_at: now,
            });
            recurrence::advance_after_fire(record, now);
        }
        fired
    }
}
