//! End-to-end alarm behaviour through the `self.alarm.*` tools.

use fae_alarm::AlarmEvent;
use fae_alarm::alarm::time::make_instant;
use fae_alarm::alarm::{AlarmRecord, AlarmStore, SchedulerState};
use serde_json::json;

use crate::helpers::fixture_at;

#[test]
fn daily_added_after_its_time_waits_for_tomorrow() {
    let f = fixture_at(make_instant(2025, 3, 10, 7, 5, 0));
    let id = f.call(
        "self.alarm.add",
        json!({"type": "daily", "hour": 7, "minute": 0, "label": "wake up"}),
    );

    let tomorrow = make_instant(2025, 3, 11, 7, 0, 0);
    let next = f.call("self.alarm.next", json!({}));
    assert_eq!(next["id"], id);
    assert_eq!(next["time"], tomorrow);
    assert_eq!(f.manager.scheduler_state().deadline(), Some(tomorrow));
}

#[test]
fn daily_fires_then_rolls_to_next_day() {
    let mut f = fixture_at(make_instant(2025, 3, 10, 6, 0, 0));
    f.call(
        "self.alarm.add",
        json!({"type": "daily", "hour": 7, "minute": 0, "label": "wake up"}),
    );

    assert!(f.fire_at(make_instant(2025, 3, 10, 7, 0, 1)));
    let list = f.call("self.alarm.list", json!({}));
    assert_eq!(list[0]["next"], "2025-03-11 07:00:00");
    assert_eq!(list[0]["enabled"], true);
    assert_eq!(f.drain_events().len(), 3);
}

#[test]
fn weekly_on_same_weekday_after_time_skips_a_week() {
    // 2025-03-10 is a Monday; bit 0 selects Monday.
    let f = fixture_at(make_instant(2025, 3, 10, 7, 5, 0));
    f.call(
        "self.alarm.add",
        json!({"type": "weekly", "hour": 7, "minute": 0, "weekdays": 0b1}),
    );
    let next = f.call("self.alarm.next", json!({}));
    assert_eq!(next["time"], make_instant(2025, 3, 17, 7, 0, 0));
}

#[test]
fn weekly_without_weekdays_stays_enabled_but_unscheduled() {
    let f = fixture_at(make_instant(2025, 3, 10, 7, 5, 0));
    f.call(
        "self.alarm.add",
        json!({"type": "weekly", "hour": 7, "minute": 0, "weekdays": 0}),
    );
    let list = f.call("self.alarm.list", json!({}));
    assert_eq!(list[0]["enabled"], true);
    assert_eq!(list[0]["next_trigger"], 0);
    assert_eq!(f.call("self.alarm.next", json!({})), json!({}));
    assert_eq!(f.manager.scheduler_state(), SchedulerState::Idle);
}

#[test]
fn monthly_on_the_31st_skips_short_months() {
    let mut f = fixture_at(make_instant(2025, 4, 5, 12, 0, 0));
    f.call(
        "self.alarm.add",
        json!({"type": "monthly", "day": 31, "hour": 9, "minute": 0, "label": "rent"}),
    );
    let next = f.call("self.alarm.next", json!({}));
    assert_eq!(next["time"], make_instant(2025, 5, 31, 9, 0, 0));

    assert!(f.fire_at(make_instant(2025, 5, 31, 9, 0, 1)));
    let next = f.call("self.alarm.next", json!({}));
    assert_eq!(next["time"], make_instant(2025, 7, 31, 9, 0, 0));
    assert!(!f.drain_events().is_empty());
}

#[test]
fn interval_fires_every_period_from_the_firing_time() {
    let t = make_instant(2025, 6, 1, 10, 0, 0);
    let mut f = fixture_at(t);
    f.call(
        "self.alarm.add",
        json!({"type": "interval", "hour": 0, "minute": 0, "interval": 30, "label": "stretch"}),
    );
    assert_eq!(f.call("self.alarm.next", json!({}))["time"], t + 30);

    assert!(f.fire_at(t + 30));
    assert_eq!(f.call("self.alarm.next", json!({}))["time"], t + 60);

    let events = f.drain_events();
    assert_eq!(events.len(), 3);
    match &events[1] {
        AlarmEvent::ShowMessage { role, text, .. } => {
            assert_eq!(role, "assistant");
            assert_eq!(text, "10:00:30 stretch");
        }
        other => panic!("expected ShowMessage, got {other:?}"),
    }
    match &events[2] {
        AlarmEvent::FollowUp { prompt, .. } => assert!(prompt.contains("stretch")),
        other => panic!("expected FollowUp, got {other:?}"),
    }
}

#[test]
fn one_shot_fires_once_then_next_alarm_is_armed() {
    let t = make_instant(2025, 6, 1, 10, 0, 0);
    let mut f = fixture_at(t);
    let first = f.call(
        "self.alarm.add",
        json!({"type": "once", "year": 2025, "month": 6, "day": 1, "hour": 10, "minute": 0, "second": 10}),
    );
    let second = f.call(
        "self.alarm.add",
        json!({"type": "once", "year": 2025, "month": 6, "day": 1, "hour": 10, "minute": 0, "second": 20}),
    );

    assert_eq!(
        f.manager.scheduler_state(),
        SchedulerState::Armed {
            deadline: t + 10,
            alarm_id: first.as_u64().unwrap() as u32
        }
    );

    assert!(f.fire_at(t + 11));
    let list = f.call("self.alarm.list", json!({}));
    assert_eq!(list[0]["enabled"], false);
    assert_eq!(f.call("self.alarm.next", json!({}))["id"], second);
    assert_eq!(f.manager.scheduler_state().deadline(), Some(t + 20));

    let fired: Vec<u32> = f.drain_events().iter().map(AlarmEvent::alarm_id).collect();
    assert!(fired.iter().all(|id| json!(id) == first));

    assert!(f.fire_at(t + 21));
    assert_eq!(f.manager.scheduler_state(), SchedulerState::Idle);
    assert_eq!(f.call("self.alarm.next", json!({})), json!({}));
}

#[test]
fn past_one_shot_is_disabled_on_add() {
    let f = fixture_at(make_instant(2025, 6, 1, 10, 0, 0));
    f.call(
        "self.alarm.add",
        json!({"type": "once", "year": 2025, "month": 5, "day": 31, "hour": 9, "minute": 0}),
    );
    let list = f.call("self.alarm.list", json!({}));
    assert_eq!(list[0]["enabled"], false);
    assert_eq!(f.manager.scheduler_state(), SchedulerState::Idle);

    // Re-enabling a lapsed one-shot switches it straight back off.
    assert_eq!(
        f.call("self.alarm.enable", json!({"id": 1, "enable": true})),
        json!(true)
    );
    assert_eq!(f.call("self.alarm.list", json!({}))[0]["enabled"], false);
}

#[test]
fn simultaneous_triggers_fire_together_in_store_order() {
    let t = make_instant(2025, 6, 1, 10, 0, 0);
    let mut f = fixture_at(t);
    for label in ["a", "b"] {
        f.call(
            "self.alarm.add",
            json!({"type": "interval", "hour": 0, "minute": 0, "interval": 60, "label": label}),
        );
    }
    assert!(f.fire_at(t + 60));
    let ids: Vec<u32> = f
        .drain_events()
        .iter()
        .filter(|e| matches!(e, AlarmEvent::PlaySound { .. }))
        .map(AlarmEvent::alarm_id)
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn armed_deadline_tracks_the_minimum_trigger() {
    let t = make_instant(2025, 6, 1, 10, 0, 0);
    let f = fixture_at(t);
    assert_eq!(f.manager.scheduler_state(), SchedulerState::Idle);

    for interval in [300, 120, 900] {
        f.call(
            "self.alarm.add",
            json!({"type": "interval", "hour": 0, "minute": 0, "interval": interval}),
        );
        let min = f
            .manager
            .records()
            .iter()
            .filter(|r| r.is_scheduled())
            .map(|r| r.next_trigger)
            .min();
        assert_eq!(f.manager.scheduler_state().deadline(), min);
    }

    f.call("self.alarm.remove", json!({"id": 2}));
    assert_eq!(f.manager.scheduler_state().deadline(), Some(t + 300));
    f.call("self.alarm.clear", json!({}));
    assert_eq!(f.manager.scheduler_state(), SchedulerState::Idle);
}

#[test]
fn recalculation_is_idempotent_for_calendar_alarms() {
    let now = make_instant(2025, 2, 27, 23, 59, 59);
    let mut store = AlarmStore::new();
    store.add(&AlarmRecord::daily(0, 0, 0, "midnight"), now);
    store.add(
        &AlarmRecord::weekly(fae_alarm::alarm::WeekdayMask::WORKDAYS, (8, 30, 0), "work"),
        now,
    );
    store.add(&AlarmRecord::monthly(29, (12, 0, 0), "leap-ish"), now);

    let before: Vec<i64> = store.records().iter().map(|r| r.next_trigger).collect();
    store.recalculate_all(now);
    store.recalculate_all(now);
    let after: Vec<i64> = store.records().iter().map(|r| r.next_trigger).collect();
    assert_eq!(before, after);
    assert_eq!(after[2], make_instant(2025, 3, 29, 12, 0, 0));
}
