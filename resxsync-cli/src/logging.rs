use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter, e.g. `RESXSYNC_LOG=resxsync=debug`.
pub const LOG_ENV: &str = "RESXSYNC_LOG";

/// Install the stderr log subscriber.
///
/// `RESXSYNC_LOG` wins over the verbosity flags when set.
pub fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
