use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "rigup")]
#[command(about = "Session bring-up rehearsal for the rigup device engine")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Rehearse the full session choreography against the scripted engine
	#[command(alias = "run")]
	Rehearse {
		/// Profile file (defaults to the user config profile)
		#[arg(long, value_name = "FILE")]
		profile: Option<PathBuf>,

		/// Device endpoint override
		#[arg(long, value_name = "ENDPOINT")]
		device: Option<String>,

		/// App package override
		#[arg(long, value_name = "PACKAGE")]
		app: Option<String>,

		/// Settle delay override in seconds
		#[arg(long, value_name = "SECS")]
		settle_secs: Option<u64>,

		/// Script the device connection to fail
		#[arg(long)]
		fail_connect: bool,

		/// Script the engine to reject binding
		#[arg(long)]
		fail_bind: bool,

		/// Script a controller without the app-launch capability
		#[arg(long)]
		no_app_capability: bool,

		/// Script the app launch to fail
		#[arg(long)]
		fail_app_start: bool,

		/// Exit non-zero if the session does not come up cleanly
		#[arg(long)]
		check: bool,
	},

	/// Manage the rehearsal profile
	Profile {
		#[command(subcommand)]
		action: ProfileAction,
	},
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
	/// Write a starter profile
	Init {
		/// Target path (defaults to the user config profile)
		#[arg(value_name = "FILE")]
		path: Option<PathBuf>,

		/// Overwrite an existing profile
		#[arg(long)]
		force: bool,
	},

	/// Print the stored profile
	Show {
		/// Profile path (defaults to the user config profile)
		#[arg(value_name = "FILE")]
		path: Option<PathBuf>,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_rehearse_with_overrides() {
		let args = vec![
			"rigup",
			"rehearse",
			"--device",
			"127.0.0.1:16384",
			"--app",
			"tw.txwy.and.snqx",
			"--settle-secs",
			"0",
			"--fail-connect",
			"--check",
		];
		let cli = Cli::try_parse_from(args).unwrap();

		match cli.command {
			Commands::Rehearse {
				device,
				app,
				settle_secs,
				fail_connect,
				fail_bind,
				check,
				..
			} => {
				assert_eq!(device.as_deref(), Some("127.0.0.1:16384"));
				assert_eq!(app.as_deref(), Some("tw.txwy.and.snqx"));
				assert_eq!(settle_secs, Some(0));
				assert!(fail_connect);
				assert!(!fail_bind);
				assert!(check);
			}
			_ => panic!("Expected Rehearse command"),
		}
	}

	#[test]
	fn run_is_an_alias_for_rehearse() {
		let cli = Cli::try_parse_from(vec!["rigup", "run"]).unwrap();
		assert!(matches!(cli.command, Commands::Rehearse { .. }));
	}

	#[test]
	fn format_flag_is_global() {
		let cli = Cli::try_parse_from(vec!["rigup", "rehearse", "-f", "json"]).unwrap();
		assert_eq!(cli.format, OutputFormat::Json);

		let cli = Cli::try_parse_from(vec!["rigup", "rehearse"]).unwrap();
		assert_eq!(cli.format, OutputFormat::Text);
	}

	#[test]
	fn verbose_flag_counts() {
		let cli = Cli::try_parse_from(vec!["rigup", "-vv", "rehearse"]).unwrap();
		assert_eq!(cli.verbose, 2);
	}

	#[test]
	fn parse_profile_init_with_force() {
		let cli =
			Cli::try_parse_from(vec!["rigup", "profile", "init", "/tmp/p.json", "--force"])
				.unwrap();
		match cli.command {
			Commands::Profile {
				action: ProfileAction::Init { path, force },
			} => {
				assert_eq!(path, Some(PathBuf::from("/tmp/p.json")));
				assert!(force);
			}
			_ => panic!("Expected profile init"),
		}
	}

	#[test]
	fn invalid_command_fails() {
		assert!(Cli::try_parse_from(vec!["rigup", "teardown-only"]).is_err());
	}
}
