//! Logging setup.
//!
//! Progress is logged at `info`, skipped or failed entries at `warn`, and
//! traversal detail at `debug`. `RUST_LOG` takes precedence over the level
//! picked from the command line:
//! ```bash
//! RUST_LOG=dumpdoc::scanner=debug dumpdoc --watch
//! ```

use std::sync::Once;

use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S"))
    }
}

/// Log level selected by `--verbose` / `--quiet`
pub fn level_for(verbose: bool, quiet: bool) -> &'static str {
    match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}

/// Initialize logging to stderr. Only the first call takes effect.
pub fn init(level: &str) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(format!("warn,dumpdoc={}", level))
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(CompactTime)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(false, false), "info");
        assert_eq!(level_for(true, false), "debug");
        assert_eq!(level_for(false, true), "warn");
    }
}
