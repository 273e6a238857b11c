//! Fixed-capacity ring buffer with overwrite-oldest eviction
//!
//! Keeps a bounded rolling window: once full, every new value replaces the
//! oldest one. Nothing is ever removed any other way, and the storage never
//! grows.

use std::fmt;
use std::ops::Index;

use crate::error::{RingBufferError, RingBufferResult};
use crate::iter::Iter;
use crate::layout::RingLayout;

/// A fixed-capacity ring buffer that overwrites its oldest element when full
#[derive(Clone)]
pub struct FixedRingBuffer<T> {
    slots: Vec<Option<T>>,
    start: usize,
    len: usize,
}

impl<T> FixedRingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` elements
    ///
    /// A zero-capacity buffer is valid; it discards everything added to it.
    pub fn new(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            start: 0,
            len: 0,
        }
    }

    /// Append a value, evicting the oldest element when full
    ///
    /// Returns the evicted element, if any. Eviction is the normal steady
    /// state of a full buffer, not an error.
    pub fn add(&mut self, value: T) -> Option<T> {
        let capacity = self.slots.len();
        if capacity == 0 {
            return Some(value);
        }

        if self.len < capacity {
            // start stays 0 until the first eviction
            self.slots[self.len] = Some(value);
            self.len += 1;
            None
        } else {
            let evicted = self.slots[self.start].replace(value);
            self.start += 1;
            if self.start == capacity {
                self.start = 0;
            }
            evicted
        }
    }

    /// Element at a logical index; 0 is the oldest retained element
    pub fn get(&self, index: usize) -> RingBufferResult<&T> {
        if index >= self.len {
            return Err(RingBufferError::out_of_range(index, self.len));
        }
        self.slots[self.layout().slot(index)]
            .as_ref()
            .ok_or(RingBufferError::out_of_range(index, self.len))
    }

    /// Oldest retained element
    pub fn front(&self) -> Option<&T> {
        self.get(0).ok()
    }

    /// Most recently added element
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last).ok())
    }

    /// Number of retained elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been added yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the next `add` will evict
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Maximum number of retained elements; fixed at construction
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current slot layout
    pub fn layout(&self) -> RingLayout {
        RingLayout::new(self.len, self.slots.len(), self.start)
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, T> {
        let (head, tail) = self.layout().segments();
        Iter::new(&self.slots[head], &self.slots[tail])
    }
}

impl<T> Index<usize> for FixedRingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T> IntoIterator for &'a FixedRingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for FixedRingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
