//! One-shot deadline timers.
//!
//! The scheduler drives exactly one [`DeadlineTimer`]. Periodic behaviour
//! comes from re-arming after every firing, never from a repeating timer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{AlarmError, Result};

/// Callback invoked once when an armed timer expires.
pub type FireCallback = Box<dyn FnOnce() + Send + 'static>;

/// A cancellable one-shot timer.
pub trait DeadlineTimer: Send {
    /// Arm the timer, replacing any outstanding deadline.
    fn arm(&mut self, delay: Duration, on_fire: FireCallback) -> Result<()>;

    /// Cancel the outstanding deadline, if any.
    fn cancel(&mut self);

    /// Whether a deadline is outstanding.
    fn is_armed(&self) -> bool;
}

/// Timer backed by a sleeping tokio task.
pub struct TokioTimer {
    handle: Handle,
    task: Option<JoinHandle<()>>,
}

impl TokioTimer {
    /// Create a timer on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`AlarmError::Timer`] when called outside a runtime.
    pub fn new() -> Result<Self> {
        let handle = Handle::try_current()
            .map_err(|e| AlarmError::Timer(format!("no tokio runtime for alarm timer: {e}")))?;
        Ok(Self::with_handle(handle))
    }

    /// Create a timer that spawns onto `handle`.
    #[must_use]
    pub fn with_handle(handle: Handle) -> Self {
        Self { handle, task: None }
    }
}

impl DeadlineTimer for TokioTimer {
    fn arm(&mut self, delay: Duration, on_fire: FireCallback) -> Result<()> {
        self.cancel();
        self.task = Some(self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        }));
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            // Aborting from inside the firing callback is harmless: the task
            // has no await point left.
            task.abort();
        }
    }

    fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[derive(Default)]
struct ManualTimerState {
    delay: Option<Duration>,
    callback: Option<FireCallback>,
    arm_count: usize,
    fail_next_arm: bool,
}

/// Timer fired explicitly by the owner instead of by wall-clock time.
///
/// Clones share state, so a test can keep one handle while the scheduler
/// owns another.
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Arc<Mutex<ManualTimerState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay passed to the most recent successful `arm`, while outstanding.
    pub fn armed_delay(&self) -> Option<Duration> {
        self.state.lock().ok().and_then(|s| s.delay)
    }

    /// Number of successful `arm` calls.
    pub fn arm_count(&self) -> usize {
        self.state.lock().map(|s| s.arm_count).unwrap_or(0)
    }

    /// Make the next `arm` fail, as if timer resources were exhausted.
    pub fn fail_next_arm(&self) {
        if let Ok(mut s) = self.state.lock() {
            s.fail_next_arm = true;
        }
    }

    /// Run the outstanding callback. Returns `false` when nothing was armed.
    pub fn fire(&self) -> bool {
        let callback = match self.state.lock() {
            Ok(mut s) => {
                s.delay = None;
                s.callback.take()
            }
            Err(_) => None,
        };
        match callback {
            Some(cb) => {
                cb();
                true
            }
            None => false,
        }
    }
}

impl DeadlineTimer for ManualTimer {
    fn arm(&mut self, delay: Duration, on_fire: FireCallback) -> Result<()> {
        let mut s = self
            .state
            .lock()
            .map_err(|_| AlarmError::Timer("manual timer lock poisoned".to_owned()))?;
        if std::mem::take(&mut s.fail_next_arm) {
            s.delay = None;
            s.callback = None;
            return Err(AlarmError::Timer("timer creation failed".to_owned()));
        }
        debug!("manual timer armed for {delay:?}");
        s.delay = Some(delay);
        s.callback = Some(on_fire);
        s.arm_count += 1;
        Ok(())
    }

    fn cancel(&mut self) {
        if let Ok(mut s) = self.state.lock() {
            s.delay = None;
            s.callback = None;
        }
    }

    fn is_armed(&self) -> bool {
        self.state.lock().map(|s| s.callback.is_some()).unwrap_or(false)
    }
}
