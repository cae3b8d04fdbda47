//! # Arbor Observe
//!
//! Structured logging setup and span helpers for the Arbor access layer.

pub mod logging;

pub use logging::{
    LogConfig, LogFormat, authorization_span, init_logging, lifecycle_span, record_decision,
    record_walk_result, walk_span,
};
