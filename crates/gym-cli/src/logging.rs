use tracing_subscriber::EnvFilter;

/// Used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,gym_roster=info,gym_remote=info,gym_cli=info";

/// Install the log subscriber. Logs go to stderr, the
/// roster itself is printed to stdout.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
