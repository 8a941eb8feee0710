//! Alarm firing side effects.
//!
//! When an alarm fires the manager emits three [`AlarmEvent`]s: a sound
//! cue, a chat message for the display, and a follow-up request for the
//! assistant. Delivery goes through an [`AlarmNotifier`] after the store
//! lock has been released, so a slow consumer never delays re-arming.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::NotifyConfig;

use super::store::FiredAlarm;
use super::time;

/// Placeholder replaced by the alarm label in the follow-up template.
pub const LABEL_PLACEHOLDER: &str = "{label}";

/// A side effect requested by a fired alarm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlarmEvent {
    /// Play a notification sound.
    PlaySound {
        alarm_id: u32,
        cue: String,
    },
    /// Show a conversation message.
    ShowMessage {
        alarm_id: u32,
        role: String,
        text: String,
    },
    /// Submit a synthesized request to the conversational backend.
    FollowUp {
        alarm_id: u32,
        prompt: String,
    },
}

impl AlarmEvent {
    pub fn alarm_id(&self) -> u32 {
        match self {
            Self::PlaySound { alarm_id, .. }
            | Self::ShowMessage { alarm_id, .. }
            | Self::FollowUp { alarm_id, .. } => *alarm_id,
        }
    }
}

/// Receiver of alarm side effects. Fire-and-forget.
pub trait AlarmNotifier: Send + Sync {
    fn notify(&self, event: AlarmEvent);
}

/// Display text for a fired alarm: `"HH:MM:SS <label>"`.
#[must_use]
pub fn display_text(fired: &FiredAlarm) -> String {
    format!("{} {}", time::format_time_of_day(fired.fired_at), fired.label)
}

/// Follow-up prompt for a fired alarm.
#[must_use]
pub fn follow_up_prompt(template: &str, label: &str) -> String {
    template.replace(LABEL_PLACEHOLDER, label)
}

/// Events emitted for one fired alarm, in delivery order.
#[must_use]
pub fn events_for(fired: &FiredAlarm, config: &NotifyConfig) -> Vec<AlarmEvent> {
    vec![
        AlarmEvent::PlaySound {
            alarm_id: fired.id,
            cue: config.sound_cue.clone(),
        },
        AlarmEvent::ShowMessage {
            alarm_id: fired.id,
            role: config.display_role.clone(),
            text: display_text(fired),
        },
        AlarmEvent::FollowUp {
            alarm_id: fired.id,
            prompt: follow_up_prompt(&config.follow_up_template, &fired.label),
        },
    ]
}

/// Notifier that posts events onto an unbounded channel.
pub struct ChannelNotifier {
    event_tx: mpsc::UnboundedSender<AlarmEvent>,
}

impl ChannelNotifier {
    pub fn new(event_tx: mpsc::UnboundedSender<AlarmEvent>) -> Self {
        Self { event_tx }
    }

    /// Create a notifier together with the receiving end.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AlarmEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl AlarmNotifier for ChannelNotifier {
    fn notify(&self, event: AlarmEvent) {
        let alarm_id = event.alarm_id();
        if self.event_tx.send(event).is_err() {
            warn!("alarm event channel closed; dropping event for alarm {alarm_id}");
        } else {
            debug!("alarm event queued for alarm {alarm_id}");
        }
    }
}

/// Notifier that discards every event.
pub struct NoopNotifier;

impl AlarmNotifier for NoopNotifier {
    fn notify(&self, _event: AlarmEvent) {}
}
