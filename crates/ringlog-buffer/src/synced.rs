//! Index-aligned pair of ring buffers

use crate::dynamic::{DEFAULT_CAPACITY, DynamicRingBuffer};
use crate::error::RingBufferResult;
use crate::iter::Iter;

/// Two dynamic ring buffers kept index-aligned: a primary sequence and
/// per-element metadata
///
/// Every mutation is applied to both halves, starting from the same
/// capacity, so the halves share one slot layout for their whole life.
/// That is what lets compaction mirror slot rewrites without checking.
#[derive(Debug, Clone)]
pub struct SyncedRingBuffers<T, M> {
    primary: DynamicRingBuffer<T>,
    metadata: DynamicRingBuffer<M>,
}

impl<T, M> SyncedRingBuffers<T, M> {
    /// Create an empty pair with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty pair with `capacity` slots per half
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            primary: DynamicRingBuffer::with_capacity(capacity),
            metadata: DynamicRingBuffer::with_capacity(capacity),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    /// Whether the pair holds no records
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Slots per half
    pub fn capacity(&self) -> usize {
        self.primary.capacity()
    }

    /// Read-only view of the primary half
    pub fn primary(&self) -> &DynamicRingBuffer<T> {
        &self.primary
    }

    /// Read-only view of the metadata half
    pub fn metadata(&self) -> &DynamicRingBuffer<M> {
        &self.metadata
    }

    pub fn push_back(&mut self, value: T, meta: M) {
        self.primary.add_last(value);
        self.metadata.add_last(meta);
    }

    pub fn push_front(&mut self, value: T, meta: M) {
        self.primary.add_first(value);
        self.metadata.add_first(meta);
    }

    pub fn pop_front(&mut self) -> RingBufferResult<(T, M)> {
        let value = self.primary.remove_first()?;
        let meta = self.metadata.remove_first()?;
        Ok((value, meta))
    }

    pub fn pop_back(&mut self) -> RingBufferResult<(T, M)> {
        let value = self.primary.remove_last()?;
        let meta = self.metadata.remove_last()?;
        Ok((value, meta))
    }

    /// Record at a logical index
    pub fn get(&self, index: usize) -> RingBufferResult<(&T, &M)> {
        Ok((self.primary.get(index)?, self.metadata.get(index)?))
    }

    /// Mutable metadata at a logical index
    ///
    /// Only the metadata half is handed out mutably; rewriting the primary
    /// value in place would bypass anything keyed on it (duplicate lookup,
    /// for example).
    pub fn meta_mut(&mut self, index: usize) -> RingBufferResult<&mut M> {
        self.metadata.get_mut(index)
    }

    /// Move every record of `other` onto the back of this pair
    pub fn append(&mut self, other: &mut SyncedRingBuffers<T, M>) {
        self.primary.append(&mut other.primary);
        self.metadata.append(&mut other.metadata);
    }

    /// Remove every record matching `should_remove`, keeping the rest in
    /// order; returns the number removed
    pub fn remove_all<P>(&mut self, should_remove: P) -> usize
    where
        P: FnMut(&T, &M) -> bool,
    {
        self.remove_all_with(should_remove, |_, _| {})
    }

    /// [`remove_all`](Self::remove_all) reporting each surviving record
    /// that moved, with its new logical index
    pub fn remove_all_with<P, F>(&mut self, mut should_remove: P, on_index_changed: F) -> usize
    where
        P: FnMut(&T, &M) -> bool,
        F: FnMut(&T, usize),
    {
        self.primary.compact(
            |value, meta| meta.is_some_and(|meta| should_remove(value, meta)),
            on_index_changed,
            Some(&mut self.metadata),
        )
    }

    /// Drop up to `count` records from the front; returns how many
    pub fn trim_start(&mut self, count: usize) -> usize {
        self.metadata.trim_start(count);
        self.primary.trim_start(count)
    }

    /// Drop up to `count` records from the back; returns how many
    pub fn trim_end(&mut self, count: usize) -> usize {
        self.metadata.trim_end(count);
        self.primary.trim_end(count)
    }

    pub fn clear(&mut self) {
        self.primary.clear();
        self.metadata.clear();
    }

    /// Iterate records oldest to newest
    pub fn iter(&self) -> std::iter::Zip<Iter<'_, T>, Iter<'_, M>> {
        self.primary.iter().zip(self.metadata.iter())
    }
}

impl<T, M> Default for SyncedRingBuffers<T, M> {
    fn default() -> Self {
        Self::new()
    }
}
