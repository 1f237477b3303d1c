//! Notification routing.
//!
//! The engine pushes notifications for every handle it manages: its own log
//! lines, task lifecycle updates, and controller action updates. A
//! [`NotificationSink`] receives them, already parsed into the
//! `rigup-protocol` payload types. Sinks must tolerate being called from
//! engine worker threads.

use parking_lot::Mutex;
use rigup_protocol::{
    ControllerActionDetail, LogDetail, LogLevel, NotificationEvent, NotificationPhase,
    TaskStatusDetail,
};
use tracing::{debug, error, info, trace, warn};

/// Receiver for engine notifications.
///
/// One callback per category the engine emits; [`dispatch`] routes a parsed
/// event to the matching callback. Categories this crate does not know end
/// up in [`on_unknown`] with their payload intact.
///
/// [`dispatch`]: NotificationSink::dispatch
/// [`on_unknown`]: NotificationSink::on_unknown
pub trait NotificationSink: Send + Sync {
    fn on_log(&self, detail: &LogDetail);

    fn on_task_status(&self, detail: &TaskStatusDetail);

    fn on_controller_action(&self, detail: &ControllerActionDetail);

    fn on_unknown(&self, category: &str, payload: &serde_json::Value);

    /// Routes an event to the matching callback.
    fn dispatch(&self, event: &NotificationEvent) {
        match event {
            NotificationEvent::Log(detail) => self.on_log(detail),
            NotificationEvent::TaskStatus(detail) => self.on_task_status(detail),
            NotificationEvent::ControllerAction(detail) => self.on_controller_action(detail),
            NotificationEvent::Unknown { category, payload } => self.on_unknown(category, payload),
        }
    }
}

/// Sink that forwards every notification to `tracing` under the
/// `rigup.engine` target. This is the sink production sessions run with.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn on_log(&self, detail: &LogDetail) {
        match detail.level {
            LogLevel::Trace => trace!(target: "rigup.engine", "{}", detail.message),
            LogLevel::Debug => debug!(target: "rigup.engine", "{}", detail.message),
            LogLevel::Info => info!(target: "rigup.engine", "{}", detail.message),
            LogLevel::Warn => warn!(target: "rigup.engine", "{}", detail.message),
            LogLevel::Error => error!(target: "rigup.engine", "{}", detail.message),
        }
    }

    fn on_task_status(&self, detail: &TaskStatusDetail) {
        match detail.phase {
            NotificationPhase::Failed => warn!(
                target: "rigup.engine",
                task_id = detail.task_id,
                entry = %detail.entry,
                "task failed"
            ),
            phase => info!(
                target: "rigup.engine",
                task_id = detail.task_id,
                entry = %detail.entry,
                ?phase,
                "task update"
            ),
        }
    }

    fn on_controller_action(&self, detail: &ControllerActionDetail) {
        match detail.phase {
            NotificationPhase::Failed => warn!(
                target: "rigup.engine",
                action = %detail.action,
                action_id = detail.action_id,
                "controller action failed"
            ),
            phase => debug!(
                target: "rigup.engine",
                action = %detail.action,
                action_id = detail.action_id,
                ?phase,
                "controller action update"
            ),
        }
    }

    fn on_unknown(&self, category: &str, payload: &serde_json::Value) {
        debug!(
            target: "rigup.engine",
            category,
            %payload,
            "unrecognized notification category"
        );
    }
}

/// Sink that buffers every event for later inspection. Test-oriented, but
/// lives in the library so rehearsal harnesses can use it too.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything received so far, in arrival order.
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().clone()
    }

    /// Takes all buffered events, clearing the buffer.
    pub fn take(&self) -> Vec<NotificationEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl NotificationSink for RecordingSink {
    fn on_log(&self, detail: &LogDetail) {
        self.events.lock().push(NotificationEvent::Log(detail.clone()));
    }

    fn on_task_status(&self, detail: &TaskStatusDetail) {
        self.events
            .lock()
            .push(NotificationEvent::TaskStatus(detail.clone()));
    }

    fn on_controller_action(&self, detail: &ControllerActionDetail) {
        self.events
            .lock()
            .push(NotificationEvent::ControllerAction(detail.clone()));
    }

    fn on_unknown(&self, category: &str, payload: &serde_json::Value) {
        self.events.lock().push(NotificationEvent::Unknown {
            category: category.to_string(),
            payload: payload.clone(),
        });
    }
}
