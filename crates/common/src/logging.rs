//! Logging and tracing initialization.

use crate::config::LoggingConfig;

/// Targets that follow the configured level. Everything else logs at `warn`.
const STOREFRONT_TARGETS: &[&str] = &[
    "storefront",
    "storefront_cli",
    "storefront_common",
    "storefront_catalog",
    "storefront_compositor",
    "storefront_media",
    "storefront_pipeline",
];

/// Filter directives for a configured level.
///
/// A bare level (`info`, `debug`) applies to the Storefront crates only.
/// Anything containing `=` or `,` is taken as a full directive string.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    let level = if level.is_empty() { "info" } else { level };

    let mut directives = vec!["warn".to_string()];
    directives.extend(STOREFRONT_TARGETS.iter().map(|t| format!("{t}={level}")));
    directives.join(",")
}

/// Logging settings with the level raised to `debug` when `verbose` is set.
pub fn with_verbosity(config: &LoggingConfig, verbose: bool) -> LoggingConfig {
    let mut config = config.clone();
    if verbose {
        config.level = "debug".to_string();
    }
    config
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the config.
pub fn init_logging(config: &LoggingConfig) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.level)));

    let installed = if config.json {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_level_scopes_to_storefront() {
        let directives = filter_directives("debug");
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("storefront_media=debug"));
        assert!(directives.contains("storefront=debug"));
        assert!(!directives.contains("info"));
    }

    #[test]
    fn test_explicit_directives_pass_through() {
        assert_eq!(
            filter_directives("storefront_pipeline=trace,warn"),
            "storefront_pipeline=trace,warn"
        );
        assert!(filter_directives("  ").contains("storefront_catalog=info"));
    }

    #[test]
    fn test_verbose_overrides_level() {
        let config = LoggingConfig {
            level: "warn".to_string(),
            json: true,
        };
        let verbose = with_verbosity(&config, true);
        assert_eq!(verbose.level, "debug");
        assert!(verbose.json);
        assert_eq!(with_verbosity(&config, false).level, "warn");
    }
}
