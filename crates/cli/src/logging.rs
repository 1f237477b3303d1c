use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Verbosity maps `-v` to info and `-vv` to debug; the default only
/// surfaces warnings. `RUST_LOG` overrides the flag entirely.
pub fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
