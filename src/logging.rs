//! Tracing subscriber setup for the sheetforge binary.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "sheetforge=info";
const VERBOSE_LOG_FILTER: &str = "sheetforge=debug";

/// Logging configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogConfig {
    /// Raise the default filter to `debug`.
    pub verbose: bool,
}

/// Filter used when `RUST_LOG` is unset or invalid.
pub fn default_filter(config: LogConfig) -> &'static str {
    if config.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    }
}

/// Initialize tracing with stderr output.
///
/// `RUST_LOG` takes precedence over the defaults. Calling this twice is a
/// no-op for the second call.
pub fn init_logging(config: LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(filter),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(LogConfig::default()), "sheetforge=info");
        assert_eq!(default_filter(LogConfig { verbose: true }), "sheetforge=debug");
    }
}
