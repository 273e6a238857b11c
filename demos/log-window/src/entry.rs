//! Log entries held by the window

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WindowError;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn label(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for LogLevel {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" | "log" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            _ => Err(WindowError::UnknownLevel(s.to_string())),
        }
    }
}

/// Metadata kept index-aligned with each message in the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub level: LogLevel,
    /// Frame the message was first seen in
    pub frame: u64,
    pub first_seen: DateTime<Utc>,
    /// How many times the message arrived; 1 unless collapsed
    pub repeat: u32,
}

impl EntryMeta {
    pub fn new(level: LogLevel, frame: u64, first_seen: DateTime<Utc>) -> Self {
        Self {
            level,
            frame,
            first_seen,
            repeat: 1,
        }
    }
}

/// Render one console line for a message and its metadata
pub fn render(message: &str, meta: &EntryMeta) -> String {
    let mut line = format!(
        "{} [frame {:>4}] {:<5} {}",
        meta.first_seen.format("%H:%M:%S%.3f"),
        meta.frame,
        meta.level,
        message
    );
    if meta.repeat > 1 {
        line.push_str(&format!(" (x{})", meta.repeat));
    }
    line
}
