//! # Ringlog Buffer
//!
//! Ring buffers for rolling windows of records, such as the most recent log
//! entries of a running program.
//!
//! ## Key Types
//!
//! - [`FixedRingBuffer`]: fixed capacity; once full, each new element
//!   overwrites the oldest one.
//! - [`DynamicRingBuffer`]: growable and double-ended, with stable in-place
//!   compaction ([`DynamicRingBuffer::remove_all`]), bulk merge
//!   ([`DynamicRingBuffer::add_range`]), trims, search and traversal.
//! - [`SyncedRingBuffers`]: a primary buffer plus an index-aligned metadata
//!   buffer that every mutation is applied to.
//!
//! Logical index 0 is always the oldest element. Storage slot for logical
//! index `i` is `(start + i) % capacity`; [`RingLayout`] exposes that
//! mapping for inspection.
//!
//! ## Example
//!
//! ```
//! use ringlog_buffer::DynamicRingBuffer;
//!
//! let mut entries: DynamicRingBuffer<&str> = DynamicRingBuffer::new();
//! let mut repeats: DynamicRingBuffer<u32> = DynamicRingBuffer::new();
//! for (entry, count) in [("boot", 1), ("tick", 40), ("warn", 2), ("tick", 3)] {
//!     entries.add_last(entry);
//!     repeats.add_last(count);
//! }
//!
//! let removed = entries
//!     .remove_all_synchronized(|entry| *entry == "tick", &mut repeats)
//!     .unwrap();
//!
//! assert_eq!(removed, 2);
//! assert_eq!(entries.iter().copied().collect::<Vec<_>>(), ["boot", "warn"]);
//! assert_eq!(repeats.iter().copied().collect::<Vec<_>>(), [1, 2]);
//! ```
//!
//! None of the types synchronize internally; share them behind a lock if
//! more than one thread needs them.

pub mod dynamic;
pub mod error;
pub mod fixed;
pub mod iter;
pub mod layout;
pub mod synced;

// Re-export main types
pub use dynamic::{DEFAULT_CAPACITY, DynamicRingBuffer};
pub use error::{RingBufferError, RingBufferResult};
pub use fixed::FixedRingBuffer;
pub use iter::Iter;
pub use layout::{CopyRegion, RingLayout, plan_range_copy};
pub use synced::SyncedRingBuffers;
