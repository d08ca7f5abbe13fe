//! Structured logging for the terrain streamer.
//!
//! Console output with uptime timestamps and module paths, plus an optional
//! JSON file for post-mortem analysis. The filter comes from `RUST_LOG` when
//! set, otherwise from the config's `debug.log_level`.

use std::path::Path;

use loam_config::Config;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written under the log directory.
pub const LOG_FILE: &str = "loam.log";

/// Install the global tracing subscriber.
///
/// When `config.debug.log_to_file` is set and `log_dir` can be created, a
/// JSON layer writing to `log_dir/loam.log` is added. Failing to create the
/// file falls back to console output only.
///
/// # Errors
///
/// Returns an error if a global subscriber was already installed.
///
/// # Examples
///
/// ```no_run
/// use loam_config::Config;
/// use loam_log::init_logging;
///
/// init_logging(None, Some(&Config::default())).expect("logging already initialised");
/// ```
pub fn init_logging(log_dir: Option<&Path>, config: Option<&Config>) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| config_env_filter(config));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    let want_file = config.is_some_and(|c| c.debug.log_to_file);
    if want_file
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        return subscriber.with(file_layer).try_init();
    }

    subscriber.try_init()
}

/// The filter directive implied by `config`, ignoring `RUST_LOG`.
pub fn filter_directive(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.clone()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// An `EnvFilter` with the default directive.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Filter from the config's level, or the default if it does not parse.
fn config_env_filter(config: Option<&Config>) -> EnvFilter {
    let directive = filter_directive(config);
    EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("ignoring log level {directive:?}: {e}");
        default_env_filter()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = default_env_filter();
        assert!(format!("{filter}").contains("info"));
    }

    #[test]
    fn test_directive_from_config() {
        let mut config = Config::default();
        config.debug.log_level = "warn,loam_stream=debug".to_string();
        assert_eq!(filter_directive(Some(&config)), "warn,loam_stream=debug");
    }

    #[test]
    fn test_blank_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_directive(Some(&config)), DEFAULT_FILTER);
        assert_eq!(filter_directive(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_unparsable_level_uses_default() {
        let mut config = Config::default();
        config.debug.log_level = "loam_stream=loudest".to_string();
        let filter = config_env_filter(Some(&config));
        assert_eq!(format!("{filter}"), format!("{}", default_env_filter()));

        config.debug.log_level = "warn".to_string();
        assert_eq!(format!("{}", config_env_filter(Some(&config))), "warn");
    }

    #[test]
    fn test_crate_filters_parse() {
        for directive in [
            "info",
            "debug,loam_stream=trace",
            "warn,loam_terrain=debug,loam_app=info",
        ] {
            assert!(EnvFilter::try_new(directive).is_ok(), "{directive}");
        }
    }

    #[test]
    fn test_second_init_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.debug.log_to_file = true;

        // Only one global subscriber can exist per process; whichever test
        // gets here first wins, so only the second call is asserted.
        let _ = init_logging(Some(dir.path()), Some(&config));
        assert!(init_logging(None, None).is_err());
    }
}
