//! Alarms surviving a restart through the file-backed settings store.

use fae_alarm::alarm::persist::{LIST_KEY, NAMESPACE};
use fae_alarm::alarm::time::make_instant;
use fae_alarm::alarm::{FileStore, KeyValueStore};
use serde_json::json;

use crate::helpers::fixture_with_storage;

fn file_store(dir: &tempfile::TempDir) -> Box<FileStore> {
    Box::new(FileStore::new(dir.path(), NAMESPACE))
}

#[test]
fn enabled_alarms_survive_restart_with_fresh_triggers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let t = make_instant(2025, 3, 10, 6, 0, 0);

    {
        let f = fixture_with_storage(file_store(&dir), t);
        f.call(
            "self.alarm.add",
            json!({"type": "daily", "hour": 7, "minute": 0, "label": "wake"}),
        );
        f.call(
            "self.alarm.add",
            json!({"type": "interval", "hour": 0, "minute": 0, "interval": 90, "label": "poll"}),
        );
        f.call(
            "self.alarm.add",
            json!({"type": "weekly", "hour": 18, "minute": 30, "weekdays": 0b1000000, "label": "sunday"}),
        );
    }
    assert!(dir.path().join(NAMESPACE).join("list.json").exists());

    // A day later: daily rolls forward, interval restarts from the new now.
    let later = t + 86_400;
    let f = fixture_with_storage(file_store(&dir), later);
    let list = f.call("self.alarm.list", json!({}));
    let entries = list.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["label"], "wake");
    assert_eq!(entries[0]["next"], "2025-03-11 07:00:00");
    assert_eq!(entries[1]["interval"], 90);
    assert_eq!(entries[1]["next_trigger"], later + 90);
    assert_eq!(entries[2]["next"], "2025-03-16 18:30:00");
    assert_eq!(entries[2]["weekdays"], 64);

    assert_eq!(f.manager.scheduler_state().deadline(), Some(later + 90));
}

#[test]
fn ids_continue_after_the_highest_persisted_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let t = make_instant(2025, 3, 10, 6, 0, 0);
    {
        let f = fixture_with_storage(file_store(&dir), t);
        for hour in [7, 8, 9] {
            f.call(
                "self.alarm.add",
                json!({"type": "daily", "hour": hour, "minute": 0}),
            );
        }
        f.call("self.alarm.remove", json!({"id": 1}));
    }

    let f = fixture_with_storage(file_store(&dir), t);
    let id = f.call(
        "self.alarm.add",
        json!({"type": "daily", "hour": 10, "minute": 0}),
    );
    assert_eq!(id, json!(4));
}

#[test]
fn disabled_and_lapsed_alarms_are_not_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let t = make_instant(2025, 3, 10, 6, 0, 0);
    {
        let f = fixture_with_storage(file_store(&dir), t);
        f.call(
            "self.alarm.add",
            json!({"type": "daily", "hour": 7, "minute": 0, "label": "keep"}),
        );
        f.call(
            "self.alarm.add",
            json!({"type": "daily", "hour": 8, "minute": 0, "label": "paused"}),
        );
        f.call(
            "self.alarm.add",
            json!({"type": "once", "year": 2025, "month": 3, "day": 10, "hour": 6, "minute": 0, "second": 5}),
        );
        f.call("self.alarm.enable", json!({"id": 2, "enable": false}));
        assert!(f.fire_at(t + 6));
    }

    let f = fixture_with_storage(file_store(&dir), t + 10);
    let list = f.call("self.alarm.list", json!({}));
    let labels: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["keep"]);
}

#[test]
fn corrupt_list_loads_as_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().expect("tempdir");
    file_store(&dir).set(LIST_KEY, "{not json").unwrap();

    let t = make_instant(2025, 3, 10, 6, 0, 0);
    let f = fixture_with_storage(file_store(&dir), t);
    assert_eq!(f.call("self.alarm.list", json!({})), json!([]));

    f.call(
        "self.alarm.add",
        json!({"type": "daily", "hour": 7, "minute": 0}),
    );
    let raw = file_store(&dir).get(LIST_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[test]
fn records_missing_required_fields_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let blob = json!([
        {"id": 3, "enabled": true, "type": "daily", "year": 0, "month": 0, "day": 0,
         "hour": 7, "minute": 15, "label": "kept"},
        {"id": 4, "enabled": true, "type": "daily", "label": "no time"},
        {"id": 5, "enabled": true, "type": "interval", "year": 0, "month": 0, "day": 0,
         "hour": 0, "minute": 0, "interval": 45}
    ]);
    file_store(&dir).set(LIST_KEY, &blob.to_string()).unwrap();

    let t = make_instant(2025, 3, 10, 6, 0, 0);
    let f = fixture_with_storage(file_store(&dir), t);
    let list = f.call("self.alarm.list", json!({}));
    let ids: Vec<u64> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 5]);
    assert_eq!(list[0]["second"], 0);
    assert_eq!(list[1]["label"], "");
    assert_eq!(f.call("self.alarm.next", json!({}))["time"], t + 45);
}
