//! Structured logging initialization
//!
//! The library emits `tracing` events (`debug!` per generation phase, `info!`
//! per written file, `warn!` on overwrites). This module installs the
//! subscriber the binary uses to show them. Logs always go to stderr so that
//! they never mix with generated output or command results on stdout.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `IDLFORGE_LOG_LEVEL` | `warn` | trace/debug/info/warn/error |
//! | `IDLFORGE_LOG_FORMAT` | `compact` | compact/pretty/json |
//! | `IDLFORGE_LOG_TARGET_FILTER` | unset | comma-separated filter directives |
//! | `IDLFORGE_LOG_INCLUDE_LOCATION` | `false` | include file:line |
//!
//! `RUST_LOG`, when set, replaces the level. `--verbose` still raises the
//! default level to `debug` on top of it.

use anyhow::{Context, Result};
use std::env;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: compact lines by default, pretty for humans, JSON for tooling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated), e.g. `idlforge::generator=trace`
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
    /// Set by `--verbose`; forces `debug` even when `RUST_LOG` is set
    pub verbose: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            log_level: "warn".to_string(),
            format: LogFormat::Compact,
            target_filter: None,
            include_location: false,
            verbose: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from `IDLFORGE_LOG_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from any key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LogConfig::default();
        LogConfig {
            log_level: lookup("IDLFORGE_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("IDLFORGE_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: lookup("IDLFORGE_LOG_TARGET_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: lookup("IDLFORGE_LOG_INCLUDE_LOCATION")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.include_location),
            verbose: false,
        }
    }

    /// Raise the level to `debug` (the `--verbose` flag)
    pub fn verbose(mut self) -> Self {
        self.log_level = "debug".to_string();
        self.verbose = true;
        self
    }

    /// The configured level, `warn` when unrecognized
    pub fn level(&self) -> Level {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

/// Add the configured target directives to `filter`.
///
/// Invalid target directives are reported on stderr and skipped.
fn apply_target_filter(mut filter: EnvFilter, config: &LogConfig) -> EnvFilter {
    if let Some(target_filter) = &config.target_filter {
        for directive in target_filter.split(',') {
            let directive = directive.trim();
            if directive.is_empty() {
                continue;
            }
            match directive.parse() {
                Ok(parsed) => filter = filter.add_directive(parsed),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {}", directive),
            }
        }
    }
    filter
}

/// Layer the config's directives over `base`.
fn layer_filter(mut base: EnvFilter, config: &LogConfig) -> EnvFilter {
    if config.verbose {
        base = base.add_directive(LevelFilter::DEBUG.into());
    }
    apply_target_filter(base, config)
}

/// The filter `init_logging_with_config` installs.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    let base = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));
    layer_filter(base, config)
}

/// Initialize logging with an explicit configuration
///
/// # Example
///
/// ```no_run
/// use idlforge::logging::{init_logging_with_config, LogConfig};
///
/// let config = LogConfig::from_env().verbose();
/// init_logging_with_config(&config).expect("Failed to initialize logging");
/// ```
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;
    Ok(())
}
