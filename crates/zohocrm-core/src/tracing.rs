//! Tracing setup for the Zoho CRM bridge.
//!
//! Library crates only emit `tracing` events; the host process installs a
//! subscriber once at start-up:
//!
//! ```ignore
//! use zohocrm_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::cli())?;
//! ```
//!
//! Dependencies (`reqwest`, `hyper`, ...) stay at `WARN` whatever level is
//! chosen for the bridge's own crates. `RUST_LOG` replaces the whole filter.

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Target prefix shared by every crate in the workspace.
const TARGET_PREFIX: &str = "zohocrm";

/// Level applied to targets outside the workspace.
const DEPENDENCY_LEVEL: Level = Level::WARN;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("a global tracing subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("invalid log filter {directive:?}: {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Multi-line, for reading by eye
    Pretty,
    #[default]
    Compact,
    /// One JSON object per line, for log collectors
    Json,
}

/// What to log and how.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for the workspace crates
    pub level: Level,
    pub format: TracingOutputFormat,
    /// Show module path and file:line of each event
    pub verbose: bool,
    pub timestamps: bool,
    /// Log span open/close, useful to time a whole operation
    pub spans: bool,
    /// Filter directive that replaces the computed one
    pub directive: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::cli()
    }
}

impl TracingConfig {
    /// Quiet output for the command-line host: warnings and errors only.
    pub fn cli() -> Self {
        Self {
            level: Level::WARN,
            format: TracingOutputFormat::Compact,
            verbose: false,
            timestamps: true,
            spans: false,
            directive: None,
        }
    }

    /// Everything the bridge does, with source locations, no timestamps.
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            verbose: true,
            timestamps: false,
            ..Self::cli()
        }
    }

    /// JSON lines for a long-running host.
    pub fn service() -> Self {
        Self {
            level: Level::INFO,
            format: TracingOutputFormat::Json,
            verbose: true,
            timestamps: true,
            spans: true,
            directive: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Replaces the computed filter, e.g. `"zohocrm_providers=trace"`.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    /// Returns the filter used when neither an explicit directive nor
    /// `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        format!("{},{}={}", DEPENDENCY_LEVEL, TARGET_PREFIX, self.level)
    }

    fn filter(&self) -> Result<EnvFilter, TracingError> {
        let directive = match self.directive {
            Some(ref directive) => directive.clone(),
            None => match std::env::var(EnvFilter::DEFAULT_ENV) {
                Ok(from_env) if !from_env.trim().is_empty() => from_env,
                _ => self.default_directive(),
            },
        };

        EnvFilter::try_new(&directive)
            .map_err(|source| TracingError::InvalidFilter { directive, source })
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(self.verbose)
            .with_file(self.verbose)
            .with_line_number(self.verbose)
            .with_span_events(span_events);

        match (self.format, self.timestamps) {
            (TracingOutputFormat::Pretty, true) => layer.pretty().boxed(),
            (TracingOutputFormat::Pretty, false) => layer.pretty().without_time().boxed(),
            (TracingOutputFormat::Compact, true) => layer.compact().boxed(),
            (TracingOutputFormat::Compact, false) => layer.compact().without_time().boxed(),
            (TracingOutputFormat::Json, true) => layer.json().boxed(),
            (TracingOutputFormat::Json, false) => layer.json().without_time().boxed(),
        }
    }
}

/// Installs the global subscriber. Call once, before any provider is built.
///
/// Logs go to stderr so stdout stays free for command output.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let subscriber = tracing_subscriber::registry()
        .with(config.layer())
        .with(config.filter()?);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
