//! Engine status codes.
//!
//! The engine reports the outcome of every asynchronous job as a numeric
//! status code. The codes are spaced out so the engine can add intermediate
//! states without renumbering; anything we do not recognize collapses to
//! `Invalid`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an engine job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", from = "u32")]
pub enum JobStatus {
    /// The job handle is not (or no longer) known to the engine.
    Invalid,
    /// Queued, not yet picked up.
    Pending,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Succeeded,
    /// Finished unsuccessfully.
    Failed,
}

impl JobStatus {
    /// The engine's numeric code for this status.
    pub fn code(self) -> u32 {
        match self {
            JobStatus::Invalid => 0,
            JobStatus::Pending => 1000,
            JobStatus::Running => 2000,
            JobStatus::Succeeded => 3000,
            JobStatus::Failed => 4000,
        }
    }

    /// Maps a raw engine code back to a status. Unknown codes are `Invalid`.
    pub fn from_code(code: u32) -> Self {
        match code {
            1000 => JobStatus::Pending,
            2000 => JobStatus::Running,
            3000 => JobStatus::Succeeded,
            4000 => JobStatus::Failed,
            _ => JobStatus::Invalid,
        }
    }

    pub fn succeeded(self) -> bool {
        self == JobStatus::Succeeded
    }

    /// Whether the job can still make progress. `Invalid` counts as
    /// terminal: the engine will never update a handle it does not know.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Pending | JobStatus::Running)
    }
}

impl From<u32> for JobStatus {
    fn from(code: u32) -> Self {
        JobStatus::from_code(code)
    }
}

impl From<JobStatus> for u32 {
    fn from(status: JobStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Invalid => "Invalid",
            JobStatus::Pending => "Pending",
            JobStatus::Running => "Running",
            JobStatus::Succeeded => "Succeeded",
            JobStatus::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Severity of an engine log notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", from = "u32")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn code(self) -> u32 {
        match self {
            LogLevel::Trace => 0,
            LogLevel::Debug => 1,
            LogLevel::Info => 2,
            LogLevel::Warn => 3,
            LogLevel::Error => 4,
        }
    }

    /// Unknown codes are reported at `Info` rather than dropped.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl From<u32> for LogLevel {
    fn from(code: u32) -> Self {
        LogLevel::from_code(code)
    }
}

impl From<LogLevel> for u32 {
    fn from(level: LogLevel) -> Self {
        level.code()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}
