//! Session outcome reporting.

use std::fmt;

use rigup_protocol::JobStatus;
use serde::Serialize;
use serde_json::json;

use crate::engine::EngineError;

/// Milestones a session passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Init,
    ContextReady,
    ResourceReady,
    ControllerConnected,
    Bound,
    AppLaunched,
    AppLaunchSkipped,
    AppLaunchFailed,
    TornDown,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Init => "init",
            SessionPhase::ContextReady => "contextReady",
            SessionPhase::ResourceReady => "resourceReady",
            SessionPhase::ControllerConnected => "controllerConnected",
            SessionPhase::Bound => "bound",
            SessionPhase::AppLaunched => "appLaunched",
            SessionPhase::AppLaunchSkipped => "appLaunchSkipped",
            SessionPhase::AppLaunchFailed => "appLaunchFailed",
            SessionPhase::TornDown => "tornDown",
        };
        f.write_str(name)
    }
}

/// Which engine entity a failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Context,
    Resource,
    Controller,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Context => "execution context",
            EntityKind::Resource => "resource bundle",
            EntityKind::Controller => "device controller",
        };
        f.write_str(name)
    }
}

/// Why a session failed.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The engine declined to allocate an entity.
    #[error("failed to create {entity}")]
    CreationFailure { entity: EntityKind },
    /// The controller's connection job ended in a non-success status.
    #[error("device connection finished {} (code {})", .status, .status.code())]
    ConnectionFailure { status: JobStatus },
    /// The engine rejected binding resource and controller to the context.
    #[error("engine rejected resource/controller binding")]
    BindFailure,
    /// The app-launch job ended in a non-success status.
    #[error("app launch finished {} (code {})", .status, .status.code())]
    LaunchFailure { status: JobStatus },
    /// The engine raised a fault outside the expected failure points.
    #[error(transparent)]
    Unexpected(#[from] EngineError),
}

impl SessionError {
    /// Stable machine-readable tag for JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            SessionError::CreationFailure { .. } => "creationFailure",
            SessionError::ConnectionFailure { .. } => "connectionFailure",
            SessionError::BindFailure => "bindFailure",
            SessionError::LaunchFailure { .. } => "launchFailure",
            SessionError::Unexpected(_) => "unexpected",
        }
    }

    /// Terminal job status attached to the failure, if any.
    pub fn status(&self) -> Option<JobStatus> {
        match self {
            SessionError::ConnectionFailure { status }
            | SessionError::LaunchFailure { status } => Some(*status),
            _ => None,
        }
    }
}

/// How the app-launch stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AppLaunchOutcome {
    /// Launched and given its settle delay.
    Launched,
    /// No package configured.
    SkippedNoPackage,
    /// The controller cannot launch apps.
    CapabilityAbsent,
    /// The launch job ended in a non-success status.
    Failed { status: JobStatus },
    /// The session failed before reaching the launch stage.
    NotAttempted,
}

/// The full outcome of one session run.
#[derive(Debug)]
pub struct SessionReport {
    /// Milestones reached, in order.
    pub phases: Vec<SessionPhase>,
    /// First failure, if any.
    pub failure: Option<SessionError>,
    pub app_launch: AppLaunchOutcome,
    /// Whether teardown ran to completion.
    pub torn_down: bool,
}

impl SessionReport {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn reached(&self, phase: SessionPhase) -> bool {
        self.phases.contains(&phase)
    }

    /// JSON rendering for machine consumers.
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "ok": self.succeeded(),
            "phases": self.phases,
            "failure": self.failure.as_ref().map(|failure| json!({
                "kind": failure.kind(),
                "message": failure.to_string(),
                "status": failure.status().map(JobStatus::code),
            })),
            "appLaunch": self.app_launch,
            "tornDown": self.torn_down,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_json_carries_kind_and_code() {
        let report = SessionReport {
            phases: vec![SessionPhase::Init, SessionPhase::ContextReady],
            failure: Some(SessionError::ConnectionFailure {
                status: JobStatus::Failed,
            }),
            app_launch: AppLaunchOutcome::NotAttempted,
            torn_down: true,
        };

        let json = report.to_json();
        assert_eq!(json["ok"], false);
        assert_eq!(json["failure"]["kind"], "connectionFailure");
        assert_eq!(json["failure"]["status"], 4000);
        assert_eq!(json["phases"][1], "contextReady");
        assert_eq!(json["appLaunch"]["outcome"], "notAttempted");
    }

    #[test]
    fn test_success_json_has_null_failure() {
        let report = SessionReport {
            phases: vec![
                SessionPhase::Init,
                SessionPhase::ContextReady,
                SessionPhase::ResourceReady,
                SessionPhase::ControllerConnected,
                SessionPhase::Bound,
                SessionPhase::AppLaunched,
                SessionPhase::TornDown,
            ],
            failure: None,
            app_launch: AppLaunchOutcome::Launched,
            torn_down: true,
        };

        assert!(report.succeeded());
        assert!(report.reached(SessionPhase::Bound));
        let json = report.to_json();
        assert_eq!(json["ok"], true);
        assert!(json["failure"].is_null());
        assert_eq!(json["appLaunch"]["outcome"], "launched");
    }

    #[test]
    fn test_connection_failure_message_names_status_and_code() {
        let error = SessionError::ConnectionFailure {
            status: JobStatus::Failed,
        };
        assert_eq!(
            error.to_string(),
            "device connection finished Failed (code 4000)"
        );
    }
}
