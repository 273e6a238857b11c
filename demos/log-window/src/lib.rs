//! Rolling console log window
//!
//! A scripted producer logs a few messages per frame; the window queues
//! them, merges each frame's batch, collapses repeats and keeps itself
//! within a fixed number of entries.

pub mod config;
pub mod entry;
pub mod error;
pub mod producer;
pub mod window;

pub use config::WindowConfig;
pub use entry::{EntryMeta, LogLevel};
pub use error::{WindowError, WindowResult};
pub use producer::DemoProducer;
pub use window::{LogWindow, WindowStats};

use chrono::Utc;
use ringlog_logging::SubscriberBuilder;
use tracing::{debug, info};

/// Subscriber builder for a session
///
/// Starts from the config's `[log]` table. `json` switches the console to
/// JSON lines and `verbose` lowers the level to debug; when unset, the
/// configured values are kept.
pub fn logging_builder(config: &WindowConfig, verbose: bool, json: bool) -> SubscriberBuilder {
    let mut builder = SubscriberBuilder::new().with_config(config.log.clone());
    if json {
        builder = builder.with_json_console(true);
    }
    if verbose {
        builder = builder.with_level("debug");
    }
    builder
}

/// Run the producer for `frames` frames, then disable it
///
/// Every frame's messages are flushed into the window at the end of the
/// frame. When `drop_level` is set, entries at that level are filtered out after
/// the last frame.
pub fn run_session(config: &WindowConfig, frames: u64, drop_level: Option<LogLevel>) -> LogWindow {
    let mut window = LogWindow::new(config);
    let mut producer = DemoProducer::from_config(config);

    for frame in 0..frames {
        for (level, message) in producer.frame(frame) {
            window.queue(level, message, frame, Utc::now());
        }
        let added = window.flush();
        debug!(frame, added, len = window.len(), "Frame flushed");
    }

    let (level, message) = producer.shutdown();
    window.queue(level, message, frames, Utc::now());
    window.flush();

    if let Some(level) = drop_level {
        let removed = window.drop_level(level);
        info!(%level, removed, "Dropped entries by level");
    }

    window
}
