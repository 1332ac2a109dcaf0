use clap::Args;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Logging settings shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct Log {
	/// The default log level, overridden per target by RUST_LOG.
	#[arg(long = "log-level", env = "JWKS_LOG_LEVEL", default_value_t = Level::INFO)]
	pub level: Level,
}

impl Log {
	pub fn level(&self) -> Level {
		self.level
	}

	pub fn init(&self) {
		let filter = EnvFilter::builder()
			.with_default_directive(LevelFilter::from_level(self.level()).into())
			.from_env_lossy()
			.add_directive("hyper=warn".parse().unwrap())
			.add_directive("hyper_util=warn".parse().unwrap())
			.add_directive("reqwest=warn".parse().unwrap())
			.add_directive("h2=warn".parse().unwrap());

		tracing_subscriber::fmt()
			.with_writer(std::io::stderr)
			.with_env_filter(filter)
			.init();
	}
}
