//! Shared helpers for integration tests.

use std::sync::Arc;

use fae_alarm::alarm::time::Instant;
use fae_alarm::alarm::{
    AlarmEvent, ChannelNotifier, KeyValueStore, ManualClock, ManualTimer, MemoryStore,
};
use fae_alarm::{AlarmConfig, AlarmManager, ToolMode, ToolRegistry, register_alarm_tools};
use serde_json::Value;
use tokio::sync::mpsc;

/// A manager wired to a manual clock and timer, with its tools registered.
pub(crate) struct Fixture {
    pub registry: ToolRegistry,
    pub manager: AlarmManager,
    pub clock: Arc<ManualClock>,
    pub timer: ManualTimer,
    pub events: mpsc::UnboundedReceiver<AlarmEvent>,
}

impl Fixture {
    /// Call a tool and return its JSON result, panicking on tool errors.
    pub fn call(&self, tool: &str, args: Value) -> Value {
        self.registry
            .dispatch(tool, args)
            .unwrap_or_else(|e| panic!("{tool} failed: {e}"))
            .content
    }

    /// Move the clock to `now` and run the armed timer callback.
    pub fn fire_at(&self, now: Instant) -> bool {
        self.clock.set(now);
        self.timer.fire()
    }

    /// Drain all pending alarm events.
    pub fn drain_events(&mut self) -> Vec<AlarmEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.events.try_recv() {
            events.push(evt);
        }
        events
    }
}

/// Fixture over an in-memory store.
pub(crate) fn fixture_at(now: Instant) -> Fixture {
    fixture_with_storage(Box::new(MemoryStore::new()), now)
}

/// Fixture over `storage`, initialized from whatever it already holds.
pub(crate) fn fixture_with_storage(storage: Box<dyn KeyValueStore>, now: Instant) -> Fixture {
    let clock = Arc::new(ManualClock::new(now));
    let timer = ManualTimer::new();
    let (notifier, events) = ChannelNotifier::channel();
    let manager = AlarmManager::builder(AlarmConfig::default())
        .with_storage(storage)
        .with_timer(Box::new(timer.clone()))
        .with_notifier(Arc::new(notifier))
        .with_clock(clock.clone())
        .build()
        .expect("build alarm manager");
    manager.initialize().expect("initialize alarm manager");

    let mut registry = ToolRegistry::new(ToolMode::Full);
    register_alarm_tools(&mut registry, manager.clone());

    Fixture {
        registry,
        manager,
        clock,
        timer,
        events,
    }
}
