//! Tracing setup for the generator.
//!
//! `SAMPLEGEN_QUIET=1` keeps only warnings, otherwise the filter comes from
//! `SAMPLEGEN_LOG`, then `-v`, then `RUST_LOG`. `SAMPLEGEN_LOG_JSON=1` switches
//! to JSON lines. Logs always go to stderr so stdout stays machine-readable.

use tracing_subscriber::{prelude::*, EnvFilter};

pub const ENV_LOG: &str = "SAMPLEGEN_LOG";
pub const ENV_QUIET: &str = "SAMPLEGEN_QUIET";
pub const ENV_LOG_JSON: &str = "SAMPLEGEN_LOG_JSON";
pub const ENV_RUST_LOG: &str = "RUST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl LogSettings {
    /// Resolve settings from the environment; `verbose` raises the default to debug
    pub fn from_env(verbose: bool) -> Self {
        Self::resolve(verbose, |key| std::env::var(key).ok())
    }

    fn resolve(verbose: bool, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        };

        let level = if flag(ENV_QUIET) {
            "samplegen=warn,warn".to_string()
        } else if let Some(level) = lookup(ENV_LOG).filter(|v| !v.is_empty()) {
            level
        } else if verbose {
            "samplegen=debug,info".to_string()
        } else if let Some(level) = lookup(ENV_RUST_LOG).filter(|v| !v.is_empty()) {
            level
        } else {
            "info".to_string()
        };

        Self {
            level,
            json: flag(ENV_LOG_JSON),
        }
    }
}

/// Initialize tracing. Call once at process startup.
pub fn init_tracing(settings: &LogSettings) {
    let filter = EnvFilter::new(&settings.level);

    let _ = if settings.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}
