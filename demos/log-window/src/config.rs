//! Window configuration, loadable from TOML

use std::path::Path;

use ringlog_logging::LogConfig;
use serde::{Deserialize, Serialize};

use crate::error::{WindowError, WindowResult};

/// Configuration for a log window session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Most entries the window retains; older ones are trimmed
    pub capacity: usize,
    /// Slots allocated up front for the window buffers
    pub initial_capacity: usize,
    /// Count repeats of an identical message instead of storing it again
    pub collapse_duplicates: bool,
    /// Rendered lines kept for printing
    pub recent_lines: usize,
    /// Slots allocated up front for each frame's pending batch
    pub batch_size: usize,
    /// Frames between warnings from the producer; 0 disables them
    pub warning_every: u64,
    /// Identifier used in the material-switch message
    pub identifier: String,
    /// Name of the object the per-frame message comes from
    pub object_name: String,
    /// Logging setup for the binary
    pub log: LogConfig,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: 256,
            initial_capacity: 16,
            collapse_duplicates: true,
            recent_lines: 10,
            batch_size: 8,
            warning_every: 25,
            identifier: "Cube".to_string(),
            object_name: "DemoLogger".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl WindowConfig {
    /// Load from a TOML file; missing keys take their defaults
    pub fn load(path: &Path) -> WindowResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| WindowError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> WindowResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WindowResult<()> {
        if self.capacity == 0 {
            return Err(WindowError::InvalidConfig(
                "capacity must be at least 1".to_string(),
            ));
        }
        if self.initial_capacity > self.capacity {
            return Err(WindowError::InvalidConfig(format!(
                "initial_capacity {} exceeds capacity {}",
                self.initial_capacity, self.capacity
            )));
        }
        Ok(())
    }
}
