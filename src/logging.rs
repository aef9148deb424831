//! Logging initialization.
//!
//! Logs go to stderr so reports written to stdout stay machine-readable.
//! `RUST_LOG` always takes precedence over the filter passed in.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// `filter` comes from the command line or config file (e.g. `"debug"`,
/// `"modlicense=trace"`); without it and without `RUST_LOG` the level is `info`.
pub fn init_logging(filter: Option<&str>) {
    let env_filter = match (std::env::var("RUST_LOG").is_ok(), filter) {
        (true, _) => EnvFilter::from_default_env(),
        (false, Some(f)) => EnvFilter::new(f),
        (false, None) => EnvFilter::new("info"),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .with(env_filter)
        .init();
}
