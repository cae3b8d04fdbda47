//! Structured logging utilities for Arbor
//!
//! Provides enhanced logging with contextual fields and formatting options.

use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (for development)
    Pretty,
    /// Compact format without colors
    Compact,
    /// JSON format (for production)
    Json,
}

#[allow(clippy::derivable_impls)]
impl Default for LogFormat {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        {
            LogFormat::Pretty
        }
        #[cfg(not(debug_assertions))]
        {
            LogFormat::Json
        }
    }
}

/// Configuration for logging behavior
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Output format
    pub format: LogFormat,
    /// Whether to include file/line numbers
    pub include_location: bool,
    /// Whether to include target module
    pub include_target: bool,
    /// Whether to log span events (enter/exit/close)
    pub log_spans: bool,
    /// Environment filter (e.g., "info,arbor=debug")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            include_location: cfg!(debug_assertions),
            include_target: true,
            log_spans: cfg!(debug_assertions),
            filter: None,
        }
    }
}

/// Initialize structured logging with configuration
pub fn init_logging(config: LogConfig) -> anyhow::Result<()> {
    let env_filter = if let Some(filter) = config.filter {
        EnvFilter::try_new(filter)?
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,arbor=debug"))
    };

    let fmt_span = if config.log_spans {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(config.include_target)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_span_events(fmt_span);

    match config.format {
        LogFormat::Pretty => {
            subscriber
                .pretty()
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize pretty logger: {}", e))?;
        },
        LogFormat::Compact => {
            subscriber
                .compact()
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize compact logger: {}", e))?;
        },
        LogFormat::Json => {
            subscriber
                .json()
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize JSON logger: {}", e))?;
        },
    }

    tracing::info!(format = ?config.format, "Logging initialized");

    Ok(())
}

/// Helper to create a span with common authorization fields
pub fn authorization_span(user: &str, target: &str, operation: &str) -> Span {
    tracing::info_span!(
        "authorization",
        user = user,
        target = target,
        operation = operation,
        granted = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

/// Helper to create a span for hierarchy traversal
pub fn walk_span(direction: &str, start: &str) -> Span {
    tracing::debug_span!(
        "hierarchy_walk",
        direction = direction,
        start = start,
        discovered = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    )
}

/// Helper to create a span for lifecycle operations
pub fn lifecycle_span(operation: &str, kind: &str) -> Span {
    tracing::info_span!(
        "lifecycle",
        operation = operation,
        kind = kind,
        duration_ms = tracing::field::Empty,
    )
}

/// Record the outcome of an authorization decision
pub fn record_decision(span: &Span, granted: bool, duration_ms: u128) {
    span.record("granted", granted);
    span.record("duration_ms", duration_ms);
}

/// Record hierarchy walk results
pub fn record_walk_result(span: &Span, discovered: usize, duration_ms: u128) {
    span.record("discovered", discovered);
    span.record("duration_ms", duration_ms);
}
