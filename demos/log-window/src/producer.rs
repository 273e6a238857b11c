//! Synthetic log source
//!
//! Behaves like a scripted scene object: it reports an error and a material
//! switch once when it starts, logs its own name every frame, warns every
//! few frames, and logs once more when disabled.

use crate::config::WindowConfig;
use crate::entry::LogLevel;

/// Produces the messages one scene object logs over its lifetime
#[derive(Debug, Clone)]
pub struct DemoProducer {
    identifier: String,
    object_name: String,
    warning_every: u64,
    started: bool,
}

impl DemoProducer {
    pub fn new(identifier: impl Into<String>, object_name: impl Into<String>, warning_every: u64) -> Self {
        Self {
            identifier: identifier.into(),
            object_name: object_name.into(),
            warning_every,
            started: false,
        }
    }

    pub fn from_config(config: &WindowConfig) -> Self {
        Self::new(&config.identifier, &config.object_name, config.warning_every)
    }

    /// Messages logged during `frame`
    pub fn frame(&mut self, frame: u64) -> Vec<(LogLevel, String)> {
        let mut messages = Vec::new();

        if !self.started {
            self.started = true;
            messages.push((LogLevel::Error, "This is an error log".to_string()));
            messages.push((
                LogLevel::Info,
                format!("The material gets switched on the gameObject {}", self.identifier),
            ));
        }

        messages.push((
            LogLevel::Info,
            format!(
                "This is a log with a context of the name of the GameObject where it came from: {}",
                self.object_name
            ),
        ));

        if self.warning_every > 0 && frame > 0 && frame % self.warning_every == 0 {
            messages.push((LogLevel::Warning, self.warning()));
        }

        messages
    }

    /// Message logged on demand, outside the frame schedule
    pub fn warning(&self) -> String {
        "This is a warning log".to_string()
    }

    /// Message logged when the object is disabled
    pub fn shutdown(&self) -> (LogLevel, String) {
        (
            LogLevel::Info,
            "This is a log when the object is disabled".to_string(),
        )
    }
}
