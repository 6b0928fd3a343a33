//! Diagnostics logging.
//!
//! Reports and JSON go to stdout, so every log line is written to stderr.
//! `RUST_LOG` overrides the level chosen on the command line.

use tracing_subscriber::{fmt, EnvFilter};

/// Log level for quillgate's own diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Default: only regeneration exhaustion, fallbacks and bad inputs
    #[default]
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl From<u8> for LogLevel {
    /// Maps a `-v` count: 0 = warn, 1 = info, 2 = debug, 3+ = trace.
    fn from(verbosity: u8) -> Self {
        match verbosity {
            0 => LogLevel::Warn,
            1 => LogLevel::Info,
            2 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

/// Subscriber settings.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub with_timestamps: bool,
    /// Include the module path of each event
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            with_timestamps: false,
            with_target: false,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.with_timestamps = enabled;
        self
    }

    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Builds a config from the CLI flags. `quiet` wins over `verbosity`.
    ///
    /// Targets and timestamps are switched on from debug level upwards.
    pub fn from_flags(verbosity: u8, quiet: bool) -> Self {
        let level = if quiet {
            LogLevel::Error
        } else {
            LogLevel::from(verbosity)
        };
        let detailed = matches!(level, LogLevel::Debug | LogLevel::Trace);
        Self::default()
            .with_level(level)
            .with_timestamps(detailed)
            .with_target(detailed)
    }

    /// The filter directive used when `RUST_LOG` is unset.
    pub fn directive(&self) -> String {
        match self.level {
            LogLevel::Off => "off".to_string(),
            level => format!("quillgate={}", level.as_str()),
        }
    }
}

/// Installs the global subscriber.
///
/// Call once at startup. A second call is ignored.
///
/// # Examples
///
/// ```no_run
/// use quillgate::logging::{init_logging, LogLevel, LoggingConfig};
///
/// init_logging(LoggingConfig::new().with_level(LogLevel::Debug));
/// ```
pub fn init_logging(config: LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(config.with_target);

    // try_init so tests and embedders that already installed one are fine
    let _ = if config.with_timestamps {
        subscriber.try_init()
    } else {
        subscriber.without_time().try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_verbosity() {
        assert_eq!(LogLevel::from(0), LogLevel::Warn);
        assert_eq!(LogLevel::from(1), LogLevel::Info);
        assert_eq!(LogLevel::from(2), LogLevel::Debug);
        assert_eq!(LogLevel::from(9), LogLevel::Trace);
    }

    #[test]
    fn test_quiet_overrides_verbosity() {
        let config = LoggingConfig::from_flags(3, true);
        assert_eq!(config.level, LogLevel::Error);
        assert!(!config.with_target);
    }

    #[test]
    fn test_debug_turns_on_detail() {
        let config = LoggingConfig::from_flags(2, false);
        assert!(config.with_timestamps);
        assert!(config.with_target);
        assert_eq!(config.directive(), "quillgate=debug");
    }

    #[test]
    fn test_off_directive() {
        let config = LoggingConfig::new().with_level(LogLevel::Off);
        assert_eq!(config.directive(), "off");
    }
}
