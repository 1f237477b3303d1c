use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use rigup::session::SessionConfig;

use crate::error::{CliError, Result};

fn default_settle_secs() -> u64 {
	15
}

/// Stored rehearsal settings.
///
/// Serialized as pretty JSON under the user config directory, same
/// shape as the `--device`/`--app`/`--settle-secs` overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub device_endpoint: String,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub app_package: Option<String>,

	#[serde(default = "default_settle_secs")]
	pub settle_secs: u64,

	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_config_dir: Option<PathBuf>,
}

impl Default for Profile {
	fn default() -> Self {
		Self {
			device_endpoint: "127.0.0.1:16384".to_string(),
			app_package: Some("tw.txwy.and.snqx".to_string()),
			settle_secs: default_settle_secs(),
			user_config_dir: None,
		}
	}
}

impl Profile {
	/// Default profile location, `<config dir>/rigup/profile.json`.
	pub fn default_path() -> Result<PathBuf> {
		let base = dirs::config_dir().ok_or(CliError::NoConfigDir)?;
		Ok(base.join("rigup").join("profile.json"))
	}

	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)?;
		serde_json::from_str(&content).map_err(|source| CliError::ProfileInvalid {
			path: path.to_path_buf(),
			source,
		})
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, serde_json::to_string_pretty(self)?)?;
		Ok(())
	}

	/// Translate into the session configuration the coordinator consumes.
	pub fn session_config(&self) -> SessionConfig {
		SessionConfig {
			device_endpoint: self.device_endpoint.clone(),
			app_package: self.app_package.clone(),
			settle_delay: Duration::from_secs(self.settle_secs),
			user_config_dir: self.user_config_dir.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn save_and_load_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("profile.json");

		let mut profile = Profile::default();
		profile.device_endpoint = "10.0.0.5:5555".to_string();
		profile.save(&path).unwrap();

		let loaded = Profile::load(&path).unwrap();
		assert_eq!(loaded.device_endpoint, "10.0.0.5:5555");
		assert_eq!(loaded.app_package.as_deref(), Some("tw.txwy.and.snqx"));
		assert_eq!(loaded.settle_secs, 15);
	}

	#[test]
	fn missing_fields_fall_back_to_defaults() {
		let profile: Profile =
			serde_json::from_str(r#"{"deviceEndpoint": "127.0.0.1:16384"}"#).unwrap();
		assert_eq!(profile.settle_secs, 15);
		assert!(profile.app_package.is_none());
	}

	#[test]
	fn garbage_json_is_reported_with_the_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("profile.json");
		std::fs::write(&path, "not json").unwrap();

		let err = Profile::load(&path).unwrap_err();
		assert!(matches!(err, CliError::ProfileInvalid { .. }));
		assert!(err.to_string().contains("profile.json"));
	}

	#[test]
	fn session_config_carries_the_settle_delay() {
		let mut profile = Profile::default();
		profile.settle_secs = 0;
		let config = profile.session_config();
		assert_eq!(config.settle_delay, Duration::ZERO);
		assert_eq!(config.device_endpoint, "127.0.0.1:16384");
	}
}
