//! Log subscriber setup
//!
//! `RUST_LOG` overrides the directive chosen by the environment preset.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::Environment;

/// Line format written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, coloured, for a developer's terminal
    Pretty,
    /// Single-line human readable
    Compact,
    /// One JSON object per event, for log shippers
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub directive: String,
    pub format: LogFormat,
    /// Emit an event when a span opens and closes
    pub span_events: bool,
    /// Include file and line of the call site
    pub source_location: bool,
}

impl TracingConfig {
    /// Preset for the deployment environment
    ///
    /// Development logs the portal crates at debug with span timing.
    /// Staging stays compact at info, production ships JSON.
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                directive: "info,arogya_service=debug,arogya_api=debug,tower_http=debug".to_string(),
                format: LogFormat::Pretty,
                span_events: true,
                source_location: true,
            },
            Environment::Staging => Self {
                directive: "info".to_string(),
                format: LogFormat::Compact,
                span_events: false,
                source_location: true,
            },
            Environment::Production => Self {
                directive: "info".to_string(),
                format: LogFormat::Json,
                span_events: false,
                source_location: false,
            },
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.directive))
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let spans = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let base = fmt::layer()
            .with_span_events(spans)
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_target(true);

        match self.format {
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Compact => base.compact().boxed(),
            LogFormat::Json => base.json().with_current_span(true).boxed(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::Staging)
    }
}

/// Install the global subscriber
///
/// # Errors
/// Returns `AlreadyInitialized` when a global subscriber exists
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.layer())
        .with(config.filter())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}
