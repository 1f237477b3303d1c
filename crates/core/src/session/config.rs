//! Session configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Delay granted to a launched app before the session proceeds.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(15);

/// What a session should bring up.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Device endpoint the controller connects to, e.g. `127.0.0.1:16384`.
    pub device_endpoint: String,
    /// App package to launch once bound. `None` skips the launch stage.
    pub app_package: Option<String>,
    /// How long a freshly launched app gets before the session proceeds.
    pub settle_delay: Duration,
    /// Directory handed to the engine for caches and its own logs.
    pub user_config_dir: Option<PathBuf>,
}

impl SessionConfig {
    pub fn new(device_endpoint: impl Into<String>) -> Self {
        Self {
            device_endpoint: device_endpoint.into(),
            app_package: None,
            settle_delay: DEFAULT_SETTLE_DELAY,
            user_config_dir: None,
        }
    }
}
