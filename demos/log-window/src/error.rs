//! Error types for the log window demo

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("Failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown log level: {0}")]
    UnknownLevel(String),
}

pub type WindowResult<T> = Result<T, WindowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WindowError::UnknownLevel("loud".to_string());
        assert!(format!("{}", err).contains("loud"));

        let err = WindowError::ReadConfig {
            path: PathBuf::from("window.toml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let message = format!("{}", err);
        assert!(message.contains("window.toml"));
        assert!(message.contains("missing"));
    }
}
