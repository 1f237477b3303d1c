//! Notification payloads.
//!
//! The engine pushes notifications while a session runs: its own log lines,
//! task lifecycle updates, and controller action updates. Each arrives as a
//! category tag plus a JSON detail object. Categories we do not recognize
//! are preserved verbatim so a sink can still surface them.

use serde::{Deserialize, Serialize};

use crate::status::LogLevel;

/// Where a task or controller action is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationPhase {
    Starting,
    Succeeded,
    Failed,
    /// A phase string this crate does not know.
    #[serde(other)]
    Unknown,
}

/// Detail of a `log` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDetail {
    pub level: LogLevel,
    pub message: String,
}

/// Detail of a `taskStatus` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusDetail {
    pub task_id: u64,
    /// Pipeline entry the task was started with.
    pub entry: String,
    pub phase: NotificationPhase,
}

/// Detail of a `controllerAction` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerActionDetail {
    /// Action kind, e.g. `"connect"`, `"click"`, `"startApp"`.
    pub action: String,
    pub action_id: u64,
    pub phase: NotificationPhase,
}

/// A notification as it crosses the engine boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", content = "detail", rename_all = "camelCase")]
pub enum NotificationEvent {
    Log(LogDetail),
    TaskStatus(TaskStatusDetail),
    ControllerAction(ControllerActionDetail),
    Unknown {
        category: String,
        payload: serde_json::Value,
    },
}

impl NotificationEvent {
    /// The category tag, as it appears on the wire.
    pub fn category(&self) -> &str {
        match self {
            NotificationEvent::Log(_) => "log",
            NotificationEvent::TaskStatus(_) => "taskStatus",
            NotificationEvent::ControllerAction(_) => "controllerAction",
            NotificationEvent::Unknown { category, .. } => category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_action_wire_shape() {
        let event = NotificationEvent::ControllerAction(ControllerActionDetail {
            action: "connect".into(),
            action_id: 7,
            phase: NotificationPhase::Succeeded,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["category"], "controllerAction");
        assert_eq!(json["detail"]["actionId"], 7);
        assert_eq!(json["detail"]["phase"], "succeeded");
        let back: NotificationEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn unknown_phase_string_is_preserved_as_unknown() {
        let detail: TaskStatusDetail = serde_json::from_str(
            r#"{"taskId":3,"entry":"Main","phase":"aborted"}"#,
        )
        .unwrap();
        assert_eq!(detail.phase, NotificationPhase::Unknown);
    }

    #[test]
    fn category_accessor_matches_wire_tag() {
        let log = NotificationEvent::Log(LogDetail {
            level: LogLevel::Warn,
            message: "resource cache cold".into(),
        });
        assert_eq!(log.category(), "log");
        let odd = NotificationEvent::Unknown {
            category: "profiler".into(),
            payload: serde_json::json!({"ms": 12}),
        };
        assert_eq!(odd.category(), "profiler");
    }
}
