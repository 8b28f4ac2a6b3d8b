use thiserror::Error;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

const DEFAULT_FILTER: &str = "info,share_gate=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid default log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("global subscriber already installed: {0}")]
    Init(#[from] TryInitError),
}

/// Output format for log lines, chosen by `LOG_JSON`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("true") || value == "1" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Build the filter from `RUST_LOG`-style directives, falling back to
/// [`DEFAULT_FILTER`] when they are missing or do not parse.
pub fn resolve_filter(directives: Option<&str>) -> Result<EnvFilter, LoggingError> {
    if let Some(filter) = directives.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }

    Ok(EnvFilter::try_new(DEFAULT_FILTER)?)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging() -> Result<(), LoggingError> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = resolve_filter(directives.as_deref())?;
    let format = LogFormat::from_env_value(std::env::var("LOG_JSON").ok().as_deref());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?,
    }

    Ok(())
}
