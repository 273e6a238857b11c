//! Error types for logging setup

use thiserror::Error;

/// Errors raised while building or installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Log file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rolling appender error: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    #[error("Subscriber already installed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Result type for logging setup
pub type LoggingResult<T> = Result<T, LoggingError>;
