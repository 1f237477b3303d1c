use std::path::PathBuf;

use serde_json::json;

use crate::error::{CliError, Result};
use crate::output::OutputFormat;
use crate::profile::Profile;

fn resolve_path(path: Option<PathBuf>) -> Result<PathBuf> {
	match path {
		Some(path) => Ok(path),
		None => Profile::default_path(),
	}
}

pub fn init(path: Option<PathBuf>, force: bool, format: OutputFormat) -> Result<()> {
	let path = resolve_path(path)?;

	if path.exists() && !force {
		return Err(CliError::ProfileExists { path });
	}

	let profile = Profile::default();
	profile.save(&path)?;

	match format {
		OutputFormat::Json => {
			let data = json!({
				"path": path,
				"written": true,
			});
			println!("{}", serde_json::to_string_pretty(&data)?);
		}
		OutputFormat::Text => println!("wrote profile to {}", path.display()),
	}

	Ok(())
}

pub fn show(path: Option<PathBuf>, format: OutputFormat) -> Result<()> {
	let path = resolve_path(path)?;

	if !path.exists() {
		return Err(CliError::ProfileMissing { path });
	}
	let profile = Profile::load(&path)?;

	match format {
		OutputFormat::Json => {
			let data = json!({
				"path": path,
				"profile": profile,
			});
			println!("{}", serde_json::to_string_pretty(&data)?);
		}
		OutputFormat::Text => {
			println!("profile: {}", path.display());
			println!("device: {}", profile.device_endpoint);
			match &profile.app_package {
				Some(package) => println!("app: {package}"),
				None => println!("app: (none)"),
			}
			println!("settle: {}s", profile.settle_secs);
		}
	}

	Ok(())
}
