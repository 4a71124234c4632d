//! Logging setup on top of `tracing-subscriber`.
//!
//! The library only emits `tracing` events; binaries decide where they go by
//! calling one of the initializers here once at startup.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the level passed to [`init_logging`].
pub const LOG_ENV_VAR: &str = "RXVERIFY_LOG";

/// Log levels, mapped onto the tracing hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    /// Level for a count of `-v` flags: none is warn, three or more is trace.
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    fn default_filter(self) -> String {
        format!(
            "rxverify={}",
            self.to_tracing_level().as_str().to_ascii_lowercase()
        )
    }
}

/// Initialize logging for rxverify at `level`.
///
/// Events go to stderr so that rendered results on stdout stay clean.
///
/// ```no_run
/// use rxverify::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Info);
/// tracing::info!("Application starting");
/// ```
///
/// Setting `RXVERIFY_LOG` takes precedence over `level`:
///
/// ```bash
/// RXVERIFY_LOG=rxverify=debug rxverify interactions "Warfarin, Ibuprofen"
/// ```
pub fn init_logging(level: LogLevel) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level.default_filter()));

    // A second call keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter)
        .try_init();

    tracing::debug!(?level, "rxverify logging initialized");
}

/// Initialize logging with an explicit filter directive string.
///
/// ```no_run
/// use rxverify::logging::init_logging_with_filter;
///
/// init_logging_with_filter("rxverify=info,rxverify::backend=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| {
        eprintln!("Invalid log filter '{}', using rxverify=info", filter);
        EnvFilter::new("rxverify=info")
    });

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(env_filter)
        .try_init();

    tracing::debug!(filter, "rxverify logging initialized with custom filter");
}
