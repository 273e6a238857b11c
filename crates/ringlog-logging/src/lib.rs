//! Tracing subscriber setup for ringlog binaries
//!
//! Console output (human-readable or JSON lines) plus an optional JSON-lines
//! file with daily, hourly or no rotation, all behind one `EnvFilter`.
//!
//! # Quick Start
//!
//! ```ignore
//! use ringlog_logging::{LogConfig, SubscriberBuilder};
//!
//! // Keep the guard alive for as long as file output should be flushed
//! let _guard = SubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//!
//! tracing::info!(frames = 120, "Window ready");
//! ```
//!
//! `RUST_LOG`, when set, takes precedence over the configured default level.

pub mod config;
pub mod error;

pub use config::{ConsoleConfig, FileConfig, LogConfig, RotationStrategy};
pub use error::{LoggingError, LoggingResult};
pub use tracing_appender::non_blocking::WorkerGuard;

use std::fs::{self, File};

use tracing::Subscriber;
use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builder for configuring and installing the subscriber
pub struct SubscriberBuilder {
    config: LogConfig,
}

impl SubscriberBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default level directive
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Switch console output between human-readable and JSON lines
    pub fn with_json_console(mut self, json: bool) -> Self {
        self.config.console.pretty = !json;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// The configuration the subscriber will be built from
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Build the subscriber without installing it
    ///
    /// Useful with `tracing::subscriber::with_default` for scoped capture.
    /// The guard, if any, flushes the file writer when dropped.
    pub fn build(self) -> LoggingResult<(impl Subscriber + Send + Sync + 'static, Option<WorkerGuard>)> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.config.default_level)?,
        };

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            layers.push(console_layer(&self.config.console));
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = open_file_writer(file_config)?;
            guard = Some(file_guard);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(writer)
                    .boxed(),
            );
        }

        let subscriber = Registry::default().with(layers).with(filter);
        Ok((subscriber, guard))
    }

    /// Install the subscriber globally
    ///
    /// Fails if a global subscriber is already set. Keep the returned guard
    /// alive for the life of the program when file output is enabled.
    pub fn init(self) -> LoggingResult<Option<WorkerGuard>> {
        let (subscriber, guard) = self.build()?;
        subscriber.try_init()?;
        Ok(guard)
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn console_layer(console: &ConsoleConfig) -> BoxedLayer {
    if console.pretty {
        tracing_subscriber::fmt::layer()
            .with_ansi(console.ansi)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed()
    }
}

/// Open the non-blocking writer for file output
///
/// [`RotationStrategy::Never`] creates or truncates
/// [`FileConfig::single_file_path`]; the others append to a rolling file
/// named from the prefix and the current period.
pub fn open_file_writer(file_config: &FileConfig) -> LoggingResult<(NonBlocking, WorkerGuard)> {
    let rotation = match file_config.rotation {
        RotationStrategy::Never => {
            fs::create_dir_all(&file_config.directory)?;
            let file = File::create(file_config.single_file_path())?;
            return Ok(tracing_appender::non_blocking(file));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(&file_config.prefix)
        .build(&file_config.directory)?;
    Ok(tracing_appender::non_blocking(appender))
}

/// Install the development preset, ignoring an already-installed subscriber
pub fn init_development() {
    let _ = SubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init();
}

/// Install the testing preset, ignoring an already-installed subscriber
pub fn init_testing() {
    let _ = SubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}
