//! Error types for ringlog-buffer

use thiserror::Error;

use crate::layout::RingLayout;

/// Errors reported by ring buffer operations
///
/// All of these are caller mistakes. Allocation failure during growth is
/// not represented here: it aborts, like any other Rust collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingBufferError {
    /// Logical index outside `[0, len)`
    #[error("Index out of range: index {index}, len {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Removal from a buffer holding no elements
    #[error("Ring buffer is empty")]
    Empty,

    /// Synchronized buffer does not share the primary's slot layout
    #[error("Synchronized buffer layout {synced} does not match primary layout {primary}")]
    Misaligned {
        primary: RingLayout,
        synced: RingLayout,
    },
}

impl RingBufferError {
    /// Create a new IndexOutOfRange error
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

/// Result type alias for ring buffer operations
pub type RingBufferResult<T> = Result<T, RingBufferError>;
