//! Structured logging for Orrery.
//!
//! Installs a `tracing` subscriber with console output and, in debug builds,
//! a JSON log file for post-mortem analysis. The library crates log through
//! the `log` facade; those records are forwarded into the same subscriber.

use std::path::Path;

use orrery_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info,wgpu=warn,naga=warn";

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "orrery.log";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.debug.log_level`, which wins over
/// [`DEFAULT_FILTER`]. When `debug_build` is set and `log_dir` can be created,
/// a JSON layer is added that writes to [`LOG_FILE_NAME`] in that directory.
///
/// Calling this twice is harmless: the second install attempt is ignored.
///
/// ```no_run
/// use orrery_log::init_logging;
///
/// init_logging(None, false, None);
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = config_filter(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE_NAME))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        if subscriber.with(file_layer).try_init().is_ok() {
            tracing::debug!(filter = %filter_str, dir = %log_dir.display(), "logging initialized");
        }
        return;
    }

    if subscriber.try_init().is_ok() {
        tracing::debug!(filter = %filter_str, "logging initialized");
    }
}

/// The filter string derived from the config, falling back to [`DEFAULT_FILTER`].
///
/// A bare level such as `"debug"` keeps the wgpu/naga noise suppression.
pub fn config_filter(config: Option<&Config>) -> String {
    match config.map(|c| c.debug.log_level.trim()) {
        Some(level) if !level.is_empty() && !level.contains('=') => {
            format!("{level},wgpu=warn,naga=warn")
        }
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => DEFAULT_FILTER.to_string(),
    }
}

/// An `EnvFilter` built from [`DEFAULT_FILTER`].
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        let filter_str = format!("{}", default_env_filter());
        assert!(filter_str.contains("wgpu=warn"));
        assert!(filter_str.contains("naga=warn"));
        assert!(filter_str.contains("info"));
    }

    #[test]
    fn test_no_config_uses_default_filter() {
        assert_eq!(config_filter(None), DEFAULT_FILTER);
    }

    #[test]
    fn test_bare_level_keeps_gpu_suppression() {
        let mut config = Config::default();
        config.debug.log_level = "debug".to_string();
        assert_eq!(config_filter(Some(&config)), "debug,wgpu=warn,naga=warn");
    }

    #[test]
    fn test_directives_pass_through() {
        let mut config = Config::default();
        config.debug.log_level = "warn,orrery_space=trace".to_string();
        assert_eq!(config_filter(Some(&config)), "warn,orrery_space=trace");
    }

    #[test]
    fn test_empty_level_falls_back() {
        let mut config = Config::default();
        config.debug.log_level = "  ".to_string();
        assert_eq!(config_filter(Some(&config)), DEFAULT_FILTER);
    }

    #[test]
    fn test_env_filter_parsing() {
        let valid_filters = [
            "info",
            "debug,orrery_render=trace",
            "warn,orrery_space=debug,wgpu=error",
            "error",
        ];

        for filter_str in &valid_filters {
            let result = EnvFilter::try_new(*filter_str);
            assert!(result.is_ok(), "Failed to parse filter: {}", filter_str);
        }
    }

    #[test]
    fn test_debug_build_writes_log_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let log_dir = temp_dir.path().join("logs");
        init_logging(Some(&log_dir), true, None);
        assert!(log_dir.join(LOG_FILE_NAME).is_file());
    }

    #[test]
    fn test_config_level_overrides_default() {
        let mut config = Config::default();
        assert_eq!(config_filter(Some(&config)), "info,wgpu=warn,naga=warn");

        config.debug.log_level = "trace".to_string();
        let filter = config_filter(Some(&config));
        assert_ne!(filter, DEFAULT_FILTER);
        assert!(filter.starts_with("trace,"));
        assert!(EnvFilter::try_new(&filter).is_ok());
    }
}
