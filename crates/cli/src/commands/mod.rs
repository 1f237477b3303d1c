mod profile;
mod rehearse;

use crate::cli::{Commands, ProfileAction};
use crate::error::Result;
use crate::output::OutputFormat;

pub async fn dispatch(command: Commands, format: OutputFormat) -> Result<()> {
	match command {
		Commands::Rehearse {
			profile,
			device,
			app,
			settle_secs,
			fail_connect,
			fail_bind,
			no_app_capability,
			fail_app_start,
			check,
		} => {
			rehearse::execute(
				rehearse::RehearseOptions {
					profile,
					device,
					app,
					settle_secs,
					fail_connect,
					fail_bind,
					no_app_capability,
					fail_app_start,
					check,
				},
				format,
			)
			.await
		}
		Commands::Profile { action } => match action {
			ProfileAction::Init { path, force } => profile::init(path, force, format),
			ProfileAction::Show { path } => profile::show(path, format),
		},
	}
}
