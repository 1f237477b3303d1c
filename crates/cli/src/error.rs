use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error("profile not found at {path}")]
	ProfileMissing { path: PathBuf },

	#[error("profile already exists at {path} (pass --force to overwrite)")]
	ProfileExists { path: PathBuf },

	#[error("profile at {path} is not valid JSON")]
	ProfileInvalid {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("could not determine a config directory for this platform")]
	NoConfigDir,

	#[error("session rehearsal failed: {kind}")]
	CheckFailed { kind: &'static str },

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}
