use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use rigup::engine::sim::SimEngine;
use rigup::protocol::JobStatus;
use rigup::{ActionRegistry, SelectForceAction, SessionCoordinator, TracingSink};

use crate::error::{CliError, Result};
use crate::output::{self, OutputFormat};
use crate::profile::Profile;

pub struct RehearseOptions {
	pub profile: Option<PathBuf>,
	pub device: Option<String>,
	pub app: Option<String>,
	pub settle_secs: Option<u64>,
	pub fail_connect: bool,
	pub fail_bind: bool,
	pub no_app_capability: bool,
	pub fail_app_start: bool,
	pub check: bool,
}

pub async fn execute(options: RehearseOptions, format: OutputFormat) -> Result<()> {
	let mut profile = load_profile(options.profile.as_deref())?;

	if let Some(device) = options.device {
		profile.device_endpoint = device;
	}
	if let Some(app) = options.app {
		profile.app_package = Some(app);
	}
	if let Some(secs) = options.settle_secs {
		profile.settle_secs = secs;
	}

	let mut builder = SimEngine::builder();
	if options.fail_connect {
		builder = builder.connect_status(JobStatus::Failed);
	}
	if options.fail_bind {
		builder = builder.bind_outcome(false);
	}
	if options.no_app_capability {
		builder = builder.app_capability(false);
	}
	if options.fail_app_start {
		builder = builder.app_start_status(JobStatus::Failed);
	}
	let engine = builder.build();

	let registry = Arc::new(ActionRegistry::new());
	registry.register(
		SelectForceAction::NAME,
		Arc::new(SelectForceAction::default()),
	);

	let config = profile.session_config();
	info!(
		target: "rigup",
		device = %config.device_endpoint,
		settle = ?Duration::from_secs(profile.settle_secs),
		"rehearsing session"
	);

	let coordinator = SessionCoordinator::new(engine, Arc::new(TracingSink), config)
		.with_actions(registry);
	let report = coordinator.run().await;

	println!("{}", output::render_report(&report, format)?);

	if options.check && !report.succeeded() {
		let kind = report
			.failure
			.as_ref()
			.map(|error| error.kind())
			.unwrap_or("unknown");
		return Err(CliError::CheckFailed { kind });
	}

	Ok(())
}

fn load_profile(path: Option<&std::path::Path>) -> Result<Profile> {
	match path {
		Some(path) => {
			if !path.exists() {
				return Err(CliError::ProfileMissing {
					path: path.to_path_buf(),
				});
			}
			Profile::load(path)
		}
		None => {
			let default = Profile::default_path()?;
			if default.exists() {
				Profile::load(&default)
			} else {
				Ok(Profile::default())
			}
		}
	}
}
