use clap::ValueEnum;

use rigup::session::{AppLaunchOutcome, SessionReport};

use crate::error::Result;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text (default)
	#[default]
	Text,
	/// JSON output
	Json,
}

impl std::str::FromStr for OutputFormat {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"text" => Ok(OutputFormat::Text),
			"json" => Ok(OutputFormat::Json),
			_ => Err(format!("unknown format: {s}")),
		}
	}
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Text => write!(f, "text"),
			OutputFormat::Json => write!(f, "json"),
		}
	}
}

/// Render a session report in the requested format.
pub fn render_report(report: &SessionReport, format: OutputFormat) -> Result<String> {
	match format {
		OutputFormat::Json => Ok(serde_json::to_string_pretty(&report.to_json())?),
		OutputFormat::Text => Ok(render_text(report)),
	}
}

fn render_text(report: &SessionReport) -> String {
	let mut lines = Vec::new();

	match &report.failure {
		None => lines.push("session: ok".to_string()),
		Some(err) => lines.push(format!("session: failed ({err})")),
	}

	let phases: Vec<String> = report.phases.iter().map(|p| p.to_string()).collect();
	lines.push(format!("phases: {}", phases.join(" -> ")));

	let app_line = match &report.app_launch {
		AppLaunchOutcome::Launched => "launched".to_string(),
		AppLaunchOutcome::SkippedNoPackage => "skipped (no package configured)".to_string(),
		AppLaunchOutcome::CapabilityAbsent => "skipped (capability not found)".to_string(),
		AppLaunchOutcome::Failed { status } => {
			format!("failed ({status}, code {})", status.code())
		}
		AppLaunchOutcome::NotAttempted => "not attempted".to_string(),
	};
	lines.push(format!("app launch: {app_line}"));

	if report.torn_down {
		lines.push("teardown: complete".to_string());
	}

	lines.join("\n")
}
