//! Slot layout and wrap-aware segment arithmetic
//!
//! A ring of `capacity` slots holds `len` live elements starting at slot
//! `start`; logical index `i` lives at slot `(start + i) % capacity`. The
//! live region is at most two contiguous slot ranges: the head segment
//! running from `start` to the end of storage, and the tail segment that
//! wrapped around to slot 0.
//!
//! Bulk operations work segment by segment instead of one modulo per
//! element, which keeps every copy a plain slice operation.

use std::fmt;
use std::ops::Range;

/// Snapshot of where a ring buffer keeps its live elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RingLayout {
    /// Number of live elements
    pub len: usize,
    /// Number of storage slots
    pub capacity: usize,
    /// Slot holding logical index 0
    pub start: usize,
}

impl RingLayout {
    /// Create a layout snapshot
    pub const fn new(len: usize, capacity: usize, start: usize) -> Self {
        Self {
            len,
            capacity,
            start,
        }
    }

    /// Storage slot of a logical index
    ///
    /// Callers must have checked `index < len`, which implies `capacity > 0`.
    #[inline]
    pub fn slot(&self, index: usize) -> usize {
        (self.start + index) % self.capacity
    }

    /// Slot one past the last live element, where the next append lands
    #[inline]
    pub fn end_slot(&self) -> usize {
        if self.capacity == 0 {
            0
        } else {
            (self.start + self.len) % self.capacity
        }
    }

    /// Number of free slots
    #[inline]
    pub fn free(&self) -> usize {
        self.capacity - self.len
    }

    /// The live region split at the wrap boundary, in logical order
    pub fn segments(&self) -> (Range<usize>, Range<usize>) {
        span_segments(self.start, self.len, self.capacity)
    }
}

impl fmt::Display for RingLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(len {}, capacity {}, start {})",
            self.len, self.capacity, self.start
        )
    }
}

/// Split `count` slots beginning at slot `from` into the run before the
/// wrap boundary and the run after it
pub(crate) fn span_segments(from: usize, count: usize, capacity: usize) -> (Range<usize>, Range<usize>) {
    let before_wrap = count.min(capacity - from);
    (from..from + before_wrap, 0..count - before_wrap)
}

/// One contiguous slot-to-slot copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyRegion {
    /// First source slot
    pub src: usize,
    /// First destination slot
    pub dst: usize,
    /// Number of slots
    pub len: usize,
}

impl CopyRegion {
    /// Create a copy region
    pub const fn new(src: usize, dst: usize, len: usize) -> Self {
        Self { src, dst, len }
    }

    /// Source slot range
    pub fn src_range(&self) -> Range<usize> {
        self.src..self.src + self.len
    }

    /// Destination slot range
    pub fn dst_range(&self) -> Range<usize> {
        self.dst..self.dst + self.len
    }

    /// Whether the region copies nothing
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Plan the copies that append every live element of `src` after the live
/// elements of `dest`, preserving order
///
/// Both the destination's free region and the source's live region may
/// wrap, so the append splits into at most three contiguous regions:
///
/// 1. from the source start into the destination insert point, up to
///    whichever side hits its storage end first;
/// 2. if the destination wrapped first, the rest of the source head
///    segment goes to destination slot 0 onward; if the source wrapped
///    first, the start of the source tail segment fills the rest of the
///    destination's unwrapped run;
/// 3. whatever remains once both sides have wrapped, tail to tail.
///
/// Regions that copy nothing have `len == 0`. `dest` must already have
/// `src.len` free slots.
pub fn plan_range_copy(dest: RingLayout, src: RingLayout) -> [CopyRegion; 3] {
    let mut plan = [CopyRegion::default(); 3];
    if src.len == 0 {
        return plan;
    }
    debug_assert!(dest.free() >= src.len, "destination must be grown first");

    let insert_start = dest.end_slot();
    let dest_segment = src.len.min(dest.capacity - insert_start);
    let src_segment = src.len.min(src.capacity - src.start);

    plan[0] = CopyRegion::new(src.start, insert_start, dest_segment.min(src_segment));

    if dest_segment < src_segment {
        // Destination wrapped first
        plan[1] = CopyRegion::new(src.start + dest_segment, 0, src_segment - dest_segment);
    } else if dest_segment > src_segment {
        // Source wrapped first
        plan[1] = CopyRegion::new(0, insert_start + src_segment, dest_segment - src_segment);
    }

    let copied = dest_segment.max(src_segment);
    if copied < src.len {
        plan[2] = CopyRegion::new(copied - src_segment, copied - dest_segment, src.len - copied);
    }

    plan
}
