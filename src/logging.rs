//! Diagnostic logging setup.
//!
//! Status output goes to stdout through [`crate::output`]; diagnostics are
//! `tracing` events written to stderr, filtered by verbosity or by the
//! `OMZ_UPDATE_LOG` environment variable.

use crate::config::Config;
use crate::constants::LOG_ENV;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Builds the filter: `OMZ_UPDATE_LOG` wins, else the verbosity default.
fn build_filter(config: &Config, env_override: Option<&str>) -> EnvFilter {
    env_override
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(config.log_level()))
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init(config: &Config) {
    let env_override = std::env::var(LOG_ENV).ok();
    let filter = build_filter(config, env_override.as_deref());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Verbosity;

    #[test]
    fn test_filter_follows_verbosity() {
        let verbose = Config {
            verbosity: Verbosity::Verbose,
            ..Config::default()
        };
        assert!(build_filter(&verbose, None).to_string().eq_ignore_ascii_case("debug"));
        assert!(build_filter(&Config::default(), None).to_string().eq_ignore_ascii_case("warn"));
    }

    #[test]
    fn test_env_override_wins() {
        let filter = build_filter(&Config::default(), Some("trace"));
        assert!(filter.to_string().eq_ignore_ascii_case("trace"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(&Config::default());
        init(&Config::default());
    }
}
