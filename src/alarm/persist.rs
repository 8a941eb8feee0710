//! Alarm list persistence.
//!
//! The alarm list is stored as one JSON array under key [`LIST_KEY`] of a
//! namespaced key/value store. Only enabled alarms are written, so lapsed
//! one-shots and disabled alarms do not survive a restart. Loading is
//! lenient: a malformed blob yields no alarms and a malformed record is
//! skipped on its own.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AlarmError, Result};

use super::types::{AlarmRecord, AlarmType, WeekdayMask};

/// Settings namespace holding the alarm list.
pub const NAMESPACE: &str = "alarm";

/// Key of the serialized alarm list within [`NAMESPACE`].
pub const LIST_KEY: &str = "list";

/// Minimal string key/value storage, one namespace per instance.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: each key lives in `<root>/<namespace>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store for `namespace` under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, namespace: &str) -> Self {
        Self {
            dir: root.into().join(namespace),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AlarmError::Storage(format!("cannot read '{key}': {e}"))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            AlarmError::Storage(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let path = self.key_path(key);
        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, value)
            .map_err(|e| AlarmError::Storage(format!("cannot write '{key}' temp file: {e}")))?;
        std::fs::rename(&tmp_path, &path)
            .map_err(|e| AlarmError::Storage(format!("cannot finalize '{key}': {e}")))?;
        Ok(())
    }
}

/// Process-local store, used by tests and embedders without a filesystem.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| AlarmError::Storage("memory store lock poisoned".to_owned()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| AlarmError::Storage("memory store lock poisoned".to_owned()))?;
        values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// On-disk shape of one alarm.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedAlarm {
    id: u32,
    #[serde(default)]
    enabled: bool,
    #[serde(rename = "type")]
    alarm_type: String,
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    #[serde(default)]
    second: i32,
    #[serde(default)]
    weekdays: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interval: Option<i64>,
    #[serde(default)]
    label: String,
}

impl From<&AlarmRecord> for PersistedAlarm {
    fn from(a: &AlarmRecord) -> Self {
        Self {
            id: a.id,
            enabled: a.enabled,
            alarm_type: a.alarm_type.as_str().to_owned(),
            year: a.year,
            month: a.month,
            day: a.day,
            hour: a.hour,
            minute: a.minute,
            second: a.second,
            weekdays: a.weekday_mask.0,
            interval: (a.alarm_type == AlarmType::Interval).then_some(a.interval_seconds),
            label: a.label.clone(),
        }
    }
}

impl From<PersistedAlarm> for AlarmRecord {
    fn from(p: PersistedAlarm) -> Self {
        Self {
            id: p.id,
            enabled: p.enabled,
            alarm_type: AlarmType::parse_lenient(&p.alarm_type),
            year: p.year,
            month: p.month,
            day: p.day,
            hour: p.hour,
            minute: p.minute,
            second: p.second,
            weekday_mask: WeekdayMask(p.weekdays),
            interval_seconds: p.interval.unwrap_or(0),
            label: p.label,
            next_trigger: 0,
        }
    }
}

/// Serialize the enabled alarms to a compact JSON array.
pub fn encode_alarms(alarms: &[AlarmRecord]) -> Result<String> {
    let persisted: Vec<PersistedAlarm> = alarms
        .iter()
        .filter(|a| a.enabled)
        .map(PersistedAlarm::from)
        .collect();
    serde_json::to_string(&persisted)
        .map_err(|e| AlarmError::Serialization(format!("cannot encode alarms: {e}")))
}

/// Parse a persisted alarm list.
///
/// Never fails: a blob that is not a JSON array yields an empty list and
/// records missing required fields are skipped. `next_trigger` is left at
/// `0` for the caller to recompute.
pub fn decode_alarms(blob: &str) -> Vec<AlarmRecord> {
    if blob.trim().is_empty() {
        return Vec::new();
    }

    let root: serde_json::Value = match serde_json::from_str(blob) {
        Ok(v) => v,
        Err(e) => {
            warn!("ignoring malformed persisted alarm list: {e}");
            return Vec::new();
        }
    };
    let Some(items) = root.as_array() else {
        warn!("ignoring persisted alarm list: root is not an array");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.is_object())
        .filter_map(|(index, item)| {
            match serde_json::from_value::<PersistedAlarm>(item.clone()) {
                Ok(p) => Some(AlarmRecord::from(p)),
                Err(e) => {
                    warn!("skipping persisted alarm #{index}: {e}");
                    None
                }
            }
        })
        .collect()
}

/// Load the alarm list from `store`.
pub fn load_alarms(store: &dyn KeyValueStore) -> Result<Vec<AlarmRecord>> {
    Ok(store
        .get(LIST_KEY)?
        .map(|blob| decode_alarms(&blob))
        .unwrap_or_default())
}

/// Overwrite the persisted alarm list in `store`.
pub fn save_alarms(store: &dyn KeyValueStore, alarms: &[AlarmRecord]) -> Result<()> {
    let blob = encode_alarms(alarms)?;
    store.set(LIST_KEY, &blob)
}
