//! Rolling window of log entries
//!
//! Messages and their metadata live in a [`SyncedRingBuffers`] so the two
//! stay index-aligned through every merge, collapse, trim and filter.
//! Incoming messages are queued in a pending pair and merged once per frame.

use chrono::{DateTime, Utc};
use ringlog_buffer::{FixedRingBuffer, SyncedRingBuffers};
use tracing::{debug, trace};

use crate::config::WindowConfig;
use crate::entry::{EntryMeta, LogLevel, render};

/// Counters for one window session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStats {
    /// Messages handed to [`LogWindow::queue`]
    pub received: u64,
    /// Messages folded into an existing entry's repeat count
    pub collapsed: u64,
    /// Entries trimmed off the front to respect the capacity
    pub evicted: u64,
    /// Entries removed by a level filter
    pub dropped: u64,
}

#[derive(Debug)]
pub struct LogWindow {
    entries: SyncedRingBuffers<String, EntryMeta>,
    pending: SyncedRingBuffers<String, EntryMeta>,
    recent: FixedRingBuffer<String>,
    capacity: usize,
    collapse_duplicates: bool,
    stats: WindowStats,
}

impl LogWindow {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            entries: SyncedRingBuffers::with_capacity(config.initial_capacity),
            pending: SyncedRingBuffers::with_capacity(config.batch_size),
            recent: FixedRingBuffer::new(config.recent_lines),
            capacity: config.capacity,
            collapse_duplicates: config.collapse_duplicates,
            stats: WindowStats::default(),
        }
    }

    /// Queue a message for the next [`flush`](Self::flush)
    pub fn queue(&mut self, level: LogLevel, message: String, frame: u64, now: DateTime<Utc>) {
        self.stats.received += 1;

        if self.collapse_duplicates {
            if let Some(index) = self.pending.primary().index_of(&message) {
                if let Ok(meta) = self.pending.meta_mut(index) {
                    meta.repeat += 1;
                    self.stats.collapsed += 1;
                    return;
                }
            }
        }

        self.pending.push_back(message, EntryMeta::new(level, frame, now));
    }

    /// Merge the pending batch into the window and trim it to capacity
    ///
    /// Returns the number of new entries added.
    pub fn flush(&mut self) -> usize {
        let Self {
            entries,
            pending,
            recent,
            capacity,
            collapse_duplicates,
            stats,
        } = self;

        if *collapse_duplicates {
            let folded = pending.remove_all(|message, meta| {
                let Some(index) = entries.primary().index_of(message) else {
                    return false;
                };
                match entries.meta_mut(index) {
                    Ok(existing) => {
                        existing.repeat += meta.repeat;
                        true
                    }
                    Err(_) => false,
                }
            });
            stats.collapsed += folded as u64;
        }

        for (message, meta) in pending.iter() {
            recent.add(render(message, meta));
        }

        let added = pending.len();
        entries.append(pending);

        let excess = entries.len().saturating_sub(*capacity);
        let evicted = entries.trim_start(excess);
        stats.evicted += evicted as u64;

        trace!(added, evicted, len = entries.len(), "Flushed pending entries");
        added
    }

    /// Remove every entry at `level`, keeping the rest in order
    pub fn drop_level(&mut self, level: LogLevel) -> usize {
        let removed = self.entries.remove_all_with(
            |_, meta| meta.level == level,
            |message, index| debug!(index, message = %message, "Entry moved"),
        );
        self.stats.dropped += removed as u64;
        removed
    }

    /// Entry at a logical index; 0 is the oldest retained entry
    pub fn get(&self, index: usize) -> Option<(&String, &EntryMeta)> {
        self.entries.get(index).ok()
    }

    /// Index and metadata of the entry holding `message`
    pub fn find(&self, message: &str) -> Option<(usize, &EntryMeta)> {
        let index = self.entries.primary().index_of(&message.to_string())?;
        let (_, meta) = self.entries.get(index).ok()?;
        Some((index, meta))
    }

    /// Number of entries at each level, as (info, warning, error)
    pub fn level_counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        self.entries.metadata().for_each(|meta| match meta.level {
            LogLevel::Info => counts.0 += 1,
            LogLevel::Warning => counts.1 += 1,
            LogLevel::Error => counts.2 += 1,
        });
        counts
    }

    /// Render every retained entry, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(message, meta)| render(message, meta))
            .collect()
    }

    /// Most recently flushed lines, oldest first
    pub fn recent(&self) -> &FixedRingBuffer<String> {
        &self.recent
    }

    pub fn stats(&self) -> WindowStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages waiting for the next flush
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop every retained and pending entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending.clear();
    }
}
