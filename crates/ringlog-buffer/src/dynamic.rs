//! Growable double-ended ring buffer
//!
//! [`DynamicRingBuffer`] stores a sequence in one contiguous block of slots
//! addressed modulo its capacity. Both ends accept insertion and removal in
//! amortized O(1); the block doubles (or grows to the minimum needed) only
//! when an insertion finds it full, and never shrinks on its own.
//!
//! Bulk operations ([`DynamicRingBuffer::add_range`],
//! [`DynamicRingBuffer::remove_all`], the trims) work on whole contiguous
//! slot runs split at the wrap boundary rather than one modulo per element.
//!
//! ## Synchronized buffers
//!
//! A second buffer with the same slot layout can ride along with a
//! compaction: every slot rewrite on the primary is repeated at the same
//! slot of the synchronized buffer, and both are trimmed together. This is
//! how per-entry metadata stays index-aligned with the entries it
//! describes. See also [`crate::SyncedRingBuffers`], which keeps the pair
//! aligned by construction.

use std::fmt;
use std::ops::{Index, IndexMut};

use tracing::trace;

use crate::error::{RingBufferError, RingBufferResult};
use crate::iter::Iter;
use crate::layout::{RingLayout, plan_range_copy, span_segments};

/// Capacity used by [`DynamicRingBuffer::new`]
pub const DEFAULT_CAPACITY: usize = 2;

/// Smallest capacity a single-element insertion grows to
const MIN_GROWTH: usize = 4;

/// A growable double-ended ring buffer
#[derive(Clone)]
pub struct DynamicRingBuffer<T> {
    slots: Vec<Option<T>>,
    start: usize,
    len: usize,
}

impl<T> DynamicRingBuffer<T> {
    /// Create an empty buffer with [`DEFAULT_CAPACITY`] slots
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer with `capacity` slots (zero is allowed)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: empty_slots(capacity),
            start: 0,
            len: 0,
        }
    }

    /// Number of live elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of storage slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current slot layout
    pub fn layout(&self) -> RingLayout {
        RingLayout::new(self.len, self.slots.len(), self.start)
    }

    // ------------------------------------------------------------------
    // Growth
    // ------------------------------------------------------------------

    /// Reallocate to `max(capacity * 2, required)` slots, unwrapping the
    /// live elements to slot 0 onward
    fn grow(&mut self, required: usize) {
        let old_capacity = self.slots.len();
        let new_capacity = old_capacity.saturating_mul(2).max(required);

        let (head, tail) = self.layout().segments();
        let mut slots = Vec::with_capacity(new_capacity);
        slots.extend(self.slots[head].iter_mut().map(Option::take));
        slots.extend(self.slots[tail].iter_mut().map(Option::take));
        slots.resize_with(new_capacity, || None);

        self.slots = slots;
        self.start = 0;

        trace!(old_capacity, new_capacity, len = self.len, "Grew ring buffer");
    }

    /// Make room for `incoming` more elements
    fn reserve_for(&mut self, incoming: usize) {
        if self.layout().free() < incoming {
            self.grow(self.len + incoming);
        }
    }

    // ------------------------------------------------------------------
    // Single-element insertion and removal
    // ------------------------------------------------------------------

    /// Insert at the front; the value becomes logical index 0
    pub fn add_first(&mut self, value: T) {
        if self.len == self.slots.len() {
            self.grow(MIN_GROWTH);
        }

        self.start = match self.start {
            0 => self.slots.len() - 1,
            start => start - 1,
        };
        self.slots[self.start] = Some(value);
        self.len += 1;
    }

    /// Append at the back
    pub fn add_last(&mut self, value: T) {
        if self.len == self.slots.len() {
            self.grow(MIN_GROWTH);
        }

        let slot = self.layout().end_slot();
        self.slots[slot] = Some(value);
        self.len += 1;
    }

    /// Append at the back; alias of [`add_last`](Self::add_last)
    pub fn add(&mut self, value: T) {
        self.add_last(value);
    }

    /// Remove and return the front (oldest) element
    pub fn remove_first(&mut self) -> RingBufferResult<T> {
        if self.len == 0 {
            return Err(RingBufferError::Empty);
        }

        let value = self.slots[self.start].take();
        self.start += 1;
        if self.start == self.slots.len() {
            self.start = 0;
        }
        self.len -= 1;

        value.ok_or(RingBufferError::Empty)
    }

    /// Remove and return the back (newest) element
    pub fn remove_last(&mut self) -> RingBufferResult<T> {
        if self.len == 0 {
            return Err(RingBufferError::Empty);
        }

        let slot = self.layout().slot(self.len - 1);
        let value = self.slots[slot].take();
        self.len -= 1;

        value.ok_or(RingBufferError::Empty)
    }

    // ------------------------------------------------------------------
    // Indexed access
    // ------------------------------------------------------------------

    /// Element at a logical index
    pub fn get(&self, index: usize) -> RingBufferResult<&T> {
        let slot = self.checked_slot(index)?;
        self.slots[slot]
            .as_ref()
            .ok_or(RingBufferError::out_of_range(index, self.len))
    }

    /// Mutable element at a logical index
    pub fn get_mut(&mut self, index: usize) -> RingBufferResult<&mut T> {
        let slot = self.checked_slot(index)?;
        let len = self.len;
        self.slots[slot]
            .as_mut()
            .ok_or(RingBufferError::out_of_range(index, len))
    }

    /// Replace the element at a logical index, returning the old one
    pub fn set(&mut self, index: usize, value: T) -> RingBufferResult<T> {
        let slot = self.checked_slot(index)?;
        self.slots[slot]
            .replace(value)
            .ok_or(RingBufferError::out_of_range(index, self.len))
    }

    /// Oldest element
    pub fn front(&self) -> Option<&T> {
        self.get(0).ok()
    }

    /// Newest element
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last).ok())
    }

    fn checked_slot(&self, index: usize) -> RingBufferResult<usize> {
        if index >= self.len {
            return Err(RingBufferError::out_of_range(index, self.len));
        }
        Ok(self.layout().slot(index))
    }

    // ------------------------------------------------------------------
    // Range merge
    // ------------------------------------------------------------------

    /// Append clones of every element of `other`, preserving its order
    ///
    /// Grows at most once, to `max(capacity * 2, len + other.len())`.
    pub fn add_range(&mut self, other: &DynamicRingBuffer<T>)
    where
        T: Clone,
    {
        if other.len == 0 {
            return;
        }
        self.reserve_for(other.len);

        for region in plan_range_copy(self.layout(), other.layout()) {
            if region.is_empty() {
                continue;
            }
            self.slots[region.dst_range()].clone_from_slice(&other.slots[region.src_range()]);
        }
        self.len += other.len;
    }

    /// Move every element of `other` onto the back of this buffer
    ///
    /// Same copy plan as [`add_range`](Self::add_range) without the `Clone`
    /// bound. `other` is left empty with its capacity intact.
    pub fn append(&mut self, other: &mut DynamicRingBuffer<T>) {
        if other.len == 0 {
            return;
        }
        self.reserve_for(other.len);

        for region in plan_range_copy(self.layout(), other.layout()) {
            if region.is_empty() {
                continue;
            }
            let src = &mut other.slots[region.src_range()];
            for (dst, src) in self.slots[region.dst_range()].iter_mut().zip(src) {
                *dst = src.take();
            }
        }
        self.len += other.len;
        other.len = 0;
        other.start = 0;
    }

    // ------------------------------------------------------------------
    // Compaction
    // ------------------------------------------------------------------

    /// Remove every element matching `should_remove`, keeping the rest in
    /// order
    ///
    /// Returns the number of removed elements.
    pub fn remove_all<P>(&mut self, mut should_remove: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        self.compact::<(), _, _>(|value, _| should_remove(value), |_, _| {}, None)
    }

    /// [`remove_all`](Self::remove_all), mirroring every slot rewrite into
    /// `synced` and trimming it by the same count
    ///
    /// `synced` must have this buffer's exact layout; otherwise nothing is
    /// touched and [`RingBufferError::Misaligned`] is returned.
    pub fn remove_all_synchronized<U, P>(
        &mut self,
        mut should_remove: P,
        synced: &mut DynamicRingBuffer<U>,
    ) -> RingBufferResult<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.check_aligned(synced)?;
        Ok(self.compact(|value, _| should_remove(value), |_, _| {}, Some(synced)))
    }

    /// [`remove_all`](Self::remove_all) reporting each survivor that moved
    ///
    /// `on_index_changed` receives the survivor and its new logical index,
    /// once per survivor whose slot changed. An optional synchronized
    /// buffer is handled as in
    /// [`remove_all_synchronized`](Self::remove_all_synchronized).
    pub fn remove_all_with<U, P, F>(
        &mut self,
        mut should_remove: P,
        on_index_changed: F,
        synced: Option<&mut DynamicRingBuffer<U>>,
    ) -> RingBufferResult<usize>
    where
        P: FnMut(&T) -> bool,
        F: FnMut(&T, usize),
    {
        if let Some(synced) = synced.as_deref() {
            self.check_aligned(synced)?;
        }
        Ok(self.compact(|value, _| should_remove(value), on_index_changed, synced))
    }

    pub(crate) fn check_aligned<U>(&self, synced: &DynamicRingBuffer<U>) -> RingBufferResult<()> {
        let (primary, synced) = (self.layout(), synced.layout());
        if primary != synced {
            return Err(RingBufferError::Misaligned { primary, synced });
        }
        Ok(())
    }

    /// Stable in-place compaction over up to three scan ranges
    ///
    /// The read cursor walks live slots in storage order. Survivors are
    /// written to the write cursor, which trails the read cursor:
    ///
    /// 1. head segment: read and write both start at `start`; a survivor
    ///    moves only once something before it was removed;
    /// 2. tail segment while the write cursor is still in the head
    ///    segment: every survivor moves;
    /// 3. rest of the tail segment after the write cursor wrapped to slot 0.
    ///
    /// The predicate sees the synchronized slot's value when there is one.
    /// The tail left behind is trimmed from both buffers.
    pub(crate) fn compact<U, P, F>(
        &mut self,
        mut should_remove: P,
        mut on_index_changed: F,
        mut synced: Option<&mut DynamicRingBuffer<U>>,
    ) -> usize
    where
        P: FnMut(&T, Option<&U>) -> bool,
        F: FnMut(&T, usize),
    {
        if self.len == 0 {
            return 0;
        }
        debug_assert!(synced.as_deref().is_none_or(|s| s.layout() == self.layout()));

        let capacity = self.slots.len();
        let start = self.start;
        let (head, tail) = self.layout().segments();
        let head_len = head.len();
        let tail_end = tail.end;

        let mut mirror: Option<&mut [Option<U>]> = synced.as_deref_mut().map(|s| &mut s.slots[..]);
        let slots = &mut self.slots[..];
        let mut removed = 0;
        let mut write = start;

        for read in head {
            if matches_at(slots, mirror.as_deref(), read, &mut should_remove) {
                removed += 1;
                continue;
            }
            if removed > 0 {
                relocate(slots, mirror.as_deref_mut(), read, write);
                report(slots, write, write - start, &mut on_index_changed);
            }
            write += 1;
        }

        let mut read = 0;
        if write < capacity {
            while read < tail_end {
                let from = read;
                read += 1;
                if matches_at(slots, mirror.as_deref(), from, &mut should_remove) {
                    removed += 1;
                    continue;
                }
                relocate(slots, mirror.as_deref_mut(), from, write);
                report(slots, write, write - start, &mut on_index_changed);
                write += 1;
                if write == capacity {
                    break;
                }
            }
        }

        if write == capacity {
            write = 0;
            while read < tail_end {
                if matches_at(slots, mirror.as_deref(), read, &mut should_remove) {
                    removed += 1;
                } else {
                    if removed > 0 {
                        relocate(slots, mirror.as_deref_mut(), read, write);
                        report(slots, write, write + head_len, &mut on_index_changed);
                    }
                    write += 1;
                }
                read += 1;
            }
        }

        self.trim_end(removed);
        if let Some(synced) = synced {
            synced.trim_end(removed);
        }

        if removed > 0 {
            trace!(removed, remaining = self.len, "Compacted ring buffer");
        }
        removed
    }

    // ------------------------------------------------------------------
    // Trimming
    // ------------------------------------------------------------------

    /// Drop up to `count` elements from the front; returns how many
    pub fn trim_start(&mut self, count: usize) -> usize {
        self.trim_start_with(count, drop)
    }

    /// Drop up to `count` elements from the back; returns how many
    pub fn trim_end(&mut self, count: usize) -> usize {
        self.trim_end_with(count, drop)
    }

    /// Remove up to `count` elements from the front, handing each one to
    /// `on_evict` oldest first
    pub fn trim_start_with<F>(&mut self, count: usize, on_evict: F) -> usize
    where
        F: FnMut(T),
    {
        let count = count.min(self.len);
        if count == 0 {
            return 0;
        }

        self.vacate(self.start, count, on_evict);
        self.start = (self.start + count) % self.slots.len();
        self.len -= count;
        count
    }

    /// Remove up to `count` elements from the back, handing each one to
    /// `on_evict` in logical order
    pub fn trim_end_with<F>(&mut self, count: usize, on_evict: F) -> usize
    where
        F: FnMut(T),
    {
        let count = count.min(self.len);
        if count == 0 {
            return 0;
        }

        let from = self.layout().slot(self.len - count);
        self.vacate(from, count, on_evict);
        self.len -= count;
        count
    }

    /// Empty the buffer, dropping every element; capacity is kept
    pub fn clear(&mut self) {
        let (head, tail) = self.layout().segments();
        self.slots[head].fill_with(|| None);
        self.slots[tail].fill_with(|| None);
        self.start = 0;
        self.len = 0;
    }

    /// Take `count` slots starting at slot `from`, in at most two runs
    fn vacate<F>(&mut self, from: usize, count: usize, mut on_evict: F)
    where
        F: FnMut(T),
    {
        let (first, second) = span_segments(from, count, self.slots.len());
        for slot in first.chain(second) {
            if let Some(value) = self.slots[slot].take() {
                on_evict(value);
            }
        }
    }

    // ------------------------------------------------------------------
    // Search and traversal
    // ------------------------------------------------------------------

    /// Logical index of the first element equal to `value`
    pub fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let (head, tail) = self.layout().segments();
        let head_len = head.len();
        let matches = |slot: &Option<T>| slot.as_ref() == Some(value);

        self.slots[head]
            .iter()
            .position(matches)
            .or_else(|| self.slots[tail].iter().position(matches).map(|i| i + head_len))
    }

    /// Whether any element equals `value`
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(value).is_some()
    }

    /// Call `action` on every element, oldest first
    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(&T),
    {
        let (head, tail) = self.layout().segments();
        for slot in self.slots[head].iter().chain(&self.slots[tail]) {
            if let Some(value) = slot {
                action(value);
            }
        }
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> Iter<'_, T> {
        let (head, tail) = self.layout().segments();
        Iter::new(&self.slots[head], &self.slots[tail])
    }
}

fn empty_slots<T>(capacity: usize) -> Vec<Option<T>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

fn matches_at<T, U, P>(slots: &[Option<T>], mirror: Option<&[Option<U>]>, slot: usize, should_remove: &mut P) -> bool
where
    P: FnMut(&T, Option<&U>) -> bool,
{
    match &slots[slot] {
        Some(value) => should_remove(value, mirror.and_then(|m| m[slot].as_ref())),
        None => false,
    }
}

fn relocate<T, U>(slots: &mut [Option<T>], mirror: Option<&mut [Option<U>]>, from: usize, to: usize) {
    slots[to] = slots[from].take();
    if let Some(mirror) = mirror {
        mirror[to] = mirror[from].take();
    }
}

fn report<T, F>(slots: &[Option<T>], slot: usize, index: usize, on_index_changed: &mut F)
where
    F: FnMut(&T, usize),
{
    if let Some(value) = &slots[slot] {
        on_index_changed(value, index);
    }
}

impl<T> Default for DynamicRingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for DynamicRingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for DynamicRingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<'a, T> IntoIterator for &'a DynamicRingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Extend<T> for DynamicRingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add_last(value);
        }
    }
}

impl<T> FromIterator<T> for DynamicRingBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut buffer = Self::new();
        buffer.extend(iter);
        buffer
    }
}

/// Equality of logical sequences; layouts may differ
impl<T: PartialEq> PartialEq for DynamicRingBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DynamicRingBuffer<T> {}

impl<T: fmt::Debug> fmt::Debug for DynamicRingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Buffer of `capacity` slots whose first element sits at slot `start`
    fn wrapped<T: Default>(capacity: usize, start: usize, values: Vec<T>) -> DynamicRingBuffer<T> {
        assert!(values.len() <= capacity);
        let mut buffer = DynamicRingBuffer::with_capacity(capacity);
        for _ in 0..start {
            buffer.add_last(T::default());
        }
        buffer.trim_start(start);
        for value in values {
            buffer.add_last(value);
        }
        assert_eq!(buffer.capacity(), capacity);
        buffer
    }

    fn contents<T: Clone>(buffer: &DynamicRingBuffer<T>) -> Vec<T> {
        buffer.iter().cloned().collect()
    }

    #[test]
    fn test_default_capacity() {
        let buffer: DynamicRingBuffer<u8> = DynamicRingBuffer::default();
        assert_eq!(buffer.capacity(), DEFAULT_CAPACITY);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_add_last_grows_when_full() {
        let mut buffer = DynamicRingBuffer::with_capacity(4);
        for c in ['a', 'b', 'c', 'd'] {
            buffer.add_last(c);
        }
        assert_eq!(buffer.capacity(), 4);

        buffer.add_last('e');
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(contents(&buffer), vec!['a', 'b', 'c', 'd', 'e']);
    }

    #[test]
    fn test_growth_unwraps_to_slot_zero() {
        let mut buffer = wrapped(4, 2, vec!['c', 'd', 'a', 'b']);
        assert_eq!(buffer.layout(), RingLayout::new(4, 4, 2));

        buffer.add_last('e');
        assert_eq!(buffer.layout(), RingLayout::new(5, 8, 0));
        assert_eq!(contents(&buffer), vec!['c', 'd', 'a', 'b', 'e']);
    }

    #[test]
    fn test_zero_capacity_grows_to_minimum() {
        let mut buffer = DynamicRingBuffer::with_capacity(0);
        buffer.add_first(1);
        assert_eq!(buffer.capacity(), 4);
        assert_eq!(buffer.front(), Some(&1));
    }

    #[test]
    fn test_add_first_wraps_start() {
        let mut buffer = DynamicRingBuffer::with_capacity(4);
        buffer.add_first(3);
        assert_eq!(buffer.layout().start, 3);
        buffer.add_first(2);
        buffer.add_last(4);
        buffer.add_first(1);

        assert_eq!(contents(&buffer), vec![1, 2, 3, 4]);
        assert_eq!(buffer.capacity(), 4);

        buffer.add_first(0);
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(contents(&buffer), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_both_ends() {
        let mut buffer: DynamicRingBuffer<i32> = (1..=5).collect();
        assert_eq!(buffer.remove_first(), Ok(1));
        assert_eq!(buffer.remove_last(), Ok(5));
        assert_eq!(contents(&buffer), vec![2, 3, 4]);
        assert_eq!(buffer.front(), Some(&2));
        assert_eq!(buffer.back(), Some(&4));
    }

    #[test]
    fn test_remove_from_empty_is_error() {
        let mut buffer: DynamicRingBuffer<i32> = DynamicRingBuffer::new();
        assert_eq!(buffer.remove_first(), Err(RingBufferError::Empty));
        assert_eq!(buffer.remove_last(), Err(RingBufferError::Empty));

        buffer.add_last(1);
        buffer.remove_last().unwrap();
        assert_eq!(buffer.remove_first(), Err(RingBufferError::Empty));
    }

    #[test]
    fn test_remove_first_wraps_start() {
        let mut buffer = wrapped(4, 3, vec![1, 2, 3]);
        assert_eq!(buffer.remove_first(), Ok(1));
        assert_eq!(buffer.layout().start, 0);
        assert_eq!(contents(&buffer), vec![2, 3]);
    }

    #[test]
    fn test_get_set_and_bounds() {
        let mut buffer = wrapped(4, 2, vec![10, 20, 30]);
        assert_eq!(buffer.get(2), Ok(&30));
        assert_eq!(buffer.set(1, 21), Ok(20));
        assert_eq!(buffer[1], 21);

        buffer[2] += 1;
        assert_eq!(buffer[2], 31);

        assert_eq!(buffer.get(3), Err(RingBufferError::out_of_range(3, 3)));
        assert_eq!(buffer.set(5, 0), Err(RingBufferError::out_of_range(5, 3)));
        assert!(buffer.get_mut(3).is_err());
    }

    #[test]
    #[should_panic(expected = "Index out of range")]
    fn test_index_panics_out_of_range() {
        let buffer: DynamicRingBuffer<u8> = DynamicRingBuffer::new();
        let _value = buffer[0];
    }

    #[test]
    fn test_add_range_without_wrap() {
        let mut buffer: DynamicRingBuffer<i32> = (1..=2).collect();
        let other: DynamicRingBuffer<i32> = (3..=4).collect();
        buffer.add_range(&other);

        assert_eq!(contents(&buffer), vec![1, 2, 3, 4]);
        assert_eq!(contents(&other), vec![3, 4]);
    }

    #[test]
    fn test_add_range_destination_wraps_first() {
        let mut buffer = wrapped(8, 4, vec![-2, -1]);
        let other = wrapped(4, 0, vec![1, 2, 3, 4]);
        buffer.add_range(&other);

        assert_eq!(buffer.capacity(), 8);
        assert_eq!(contents(&buffer), vec![-2, -1, 1, 2, 3, 4]);
    }

    #[test]
    fn test_add_range_source_wraps_first() {
        let mut buffer = wrapped(8, 0, vec![0]);
        let other = wrapped(4, 3, vec![1, 2, 3]);
        buffer.add_range(&other);

        assert_eq!(buffer.capacity(), 8);
        assert_eq!(contents(&buffer), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_add_range_both_wrap() {
        let mut buffer = wrapped(8, 4, vec![-3, -2, -1]);
        let other = wrapped(6, 3, vec![1, 2, 3, 4, 5]);
        buffer.add_range(&other);

        assert_eq!(buffer.capacity(), 8);
        assert_eq!(contents(&buffer), vec![-3, -2, -1, 1, 2, 3, 4, 5]);
        assert_eq!(buffer.layout().start, 4);
    }

    #[test]
    fn test_add_range_grows_to_required() {
        let mut buffer = wrapped(4, 2, vec!['c', 'd', 'a', 'b']);
        let other = wrapped(8, 6, vec!['w', 'x', 'y', 'z', '!']);
        buffer.add_range(&other);

        // max(4 * 2, 4 + 5)
        assert_eq!(buffer.capacity(), 9);
        assert_eq!(contents(&buffer), vec!['c', 'd', 'a', 'b', 'w', 'x', 'y', 'z', '!']);
    }

    #[test]
    fn test_add_range_empty_is_noop() {
        let mut buffer = wrapped(2, 1, vec![1, 2]);
        buffer.add_range(&DynamicRingBuffer::with_capacity(0));
        assert_eq!(buffer.layout(), RingLayout::new(2, 2, 1));
    }

    #[test]
    fn test_append_empties_source() {
        let mut buffer = wrapped(8, 4, vec![String::from("a")]);
        let mut other = wrapped(4, 2, vec![String::from("b"), String::from("c"), String::from("d")]);
        buffer.append(&mut other);

        assert_eq!(contents(&buffer), vec!["a", "b", "c", "d"]);
        assert!(other.is_empty());
        assert_eq!(other.layout(), RingLayout::new(0, 4, 0));
        assert!(other.iter().next().is_none());

        other.add_last(String::from("e"));
        assert_eq!(contents(&other), vec!["e"]);
    }

    #[test]
    fn test_remove_all_never_is_noop() {
        let mut buffer = wrapped(4, 2, vec![1, 2, 3, 4]);
        let before = buffer.layout();
        assert_eq!(buffer.remove_all(|_| false), 0);
        assert_eq!(buffer.layout(), before);
        assert_eq!(contents(&buffer), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_all_always_empties() {
        let mut buffer = wrapped(4, 2, vec![1, 2, 3, 4]);
        assert_eq!(buffer.remove_all(|_| true), 4);
        assert!(buffer.is_empty());
        assert_eq!(buffer.iter().count(), 0);
    }

    #[test]
    fn test_remove_all_wrapped_tail_element() {
        // Storage [a, b, c, d] with start 2 reads as c, d, a, b
        let mut buffer = wrapped(4, 2, vec!['c', 'd', 'a', 'b']);
        let removed = buffer.remove_all(|c| *c == 'b');

        assert_eq!(removed, 1);
        assert_eq!(buffer.len(), 3);
        assert_eq!(contents(&buffer), vec!['c', 'd', 'a']);
    }

    #[test]
    fn test_remove_all_is_stable() {
        let mut buffer = wrapped(8, 5, (0..8).collect());
        let removed = buffer.remove_all(|v| v % 3 == 0);
        assert_eq!(removed, 3);
        assert_eq!(contents(&buffer), vec![1, 2, 4, 5, 7]);
    }

    #[test]
    fn test_remove_all_reports_moved_indices() {
        // Slots 5, 6, 7 then 0..5: the write cursor wraps mid-scan
        let mut buffer = wrapped(8, 5, (0..8).collect());
        let mut moves = Vec::new();
        let removed = buffer
            .remove_all_with::<(), _, _>(|v| *v == 1 || *v == 6, |v, index| moves.push((*v, index)), None)
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(moves, vec![(2, 1), (3, 2), (4, 3), (5, 4), (7, 5)]);
        assert_eq!(contents(&buffer), vec![0, 2, 3, 4, 5, 7]);
        for (value, index) in moves {
            assert_eq!(buffer[index], value);
        }
    }

    #[test]
    fn test_remove_all_no_moves_when_only_tail_removed() {
        let mut buffer: DynamicRingBuffer<i32> = (0..6).collect();
        let mut moved = 0;
        buffer
            .remove_all_with::<(), _, _>(|v| *v >= 4, |_, _| moved += 1, None)
            .unwrap();
        assert_eq!(moved, 0);
        assert_eq!(contents(&buffer), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_remove_all_synchronized_keeps_pairing() {
        let mut entries = DynamicRingBuffer::new();
        let mut meta = DynamicRingBuffer::new();
        for i in 0..5 {
            entries.add_last(10 + i);
            meta.add_last(format!("m{i}"));
        }

        let removed = entries
            .remove_all_synchronized(|v| *v == 11 || *v == 13, &mut meta)
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(entries.len(), 3);
        assert_eq!(meta.len(), 3);
        assert_eq!(contents(&entries), vec![10, 12, 14]);
        assert_eq!(contents(&meta), vec!["m0", "m2", "m4"]);
    }

    #[test]
    fn test_remove_all_synchronized_wrapped() {
        let mut entries = wrapped(8, 5, (0..8).collect());
        let mut meta = wrapped(8, 5, (100..108).collect());

        let removed = entries
            .remove_all_synchronized(|v| v % 2 == 1, &mut meta)
            .unwrap();

        assert_eq!(removed, 4);
        assert_eq!(contents(&entries), vec![0, 2, 4, 6]);
        assert_eq!(contents(&meta), vec![100, 102, 104, 106]);
        assert_eq!(entries.layout(), meta.layout());
    }

    #[test]
    fn test_remove_all_misaligned_touches_nothing() {
        let mut entries = wrapped(4, 2, vec![1, 2, 3]);
        let mut meta = wrapped(4, 0, vec!['a', 'b', 'c']);

        let err = entries
            .remove_all_synchronized(|v| *v == 1, &mut meta)
            .unwrap_err();

        assert!(matches!(err, RingBufferError::Misaligned { .. }));
        assert_eq!(contents(&entries), vec![1, 2, 3]);
        assert_eq!(contents(&meta), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_trim_start_across_wrap() {
        let mut buffer = wrapped(4, 2, vec!['c', 'd', 'a', 'b']);
        let mut evicted = Vec::new();
        assert_eq!(buffer.trim_start_with(3, |c| evicted.push(c)), 3);

        assert_eq!(evicted, vec!['c', 'd', 'a']);
        assert_eq!(contents(&buffer), vec!['b']);
        assert_eq!(buffer.layout().start, 1);
    }

    #[test]
    fn test_trim_end_across_wrap() {
        let mut buffer = wrapped(4, 2, vec!['c', 'd', 'a', 'b']);
        let mut evicted = Vec::new();
        assert_eq!(buffer.trim_end_with(3, |c| evicted.push(c)), 3);

        assert_eq!(evicted, vec!['d', 'a', 'b']);
        assert_eq!(contents(&buffer), vec!['c']);
        assert_eq!(buffer.layout().start, 2);
    }

    #[test]
    fn test_trim_clamps_to_len() {
        let mut buffer: DynamicRingBuffer<i32> = (0..3).collect();
        assert_eq!(buffer.trim_start(0), 0);
        assert_eq!(buffer.trim_end(10), 3);
        assert!(buffer.is_empty());
        assert_eq!(buffer.trim_start(1), 0);
    }

    #[test]
    fn test_trim_releases_values() {
        use std::rc::Rc;

        let payload = Rc::new(());
        let mut buffer = DynamicRingBuffer::new();
        for _ in 0..4 {
            buffer.add_last(Rc::clone(&payload));
        }
        assert_eq!(Rc::strong_count(&payload), 5);

        buffer.trim_start(1);
        assert_eq!(Rc::strong_count(&payload), 4);

        buffer.remove_all(|_| true);
        assert_eq!(Rc::strong_count(&payload), 1);
    }

    #[test]
    fn test_trim_releases_both_runs_of_wrapped_span() {
        use std::rc::Rc;

        let payload = Rc::new(());
        let mut buffer = DynamicRingBuffer::with_capacity(4);
        buffer.add_last(Rc::clone(&payload));
        buffer.add_last(Rc::clone(&payload));
        buffer.add_first(Rc::clone(&payload));
        buffer.add_first(Rc::clone(&payload));
        assert_eq!(buffer.layout(), RingLayout::new(4, 4, 2));
        assert_eq!(Rc::strong_count(&payload), 5);

        let mut evicted = 0;
        assert_eq!(buffer.trim_end_with(3, |_| evicted += 1), 3);
        assert_eq!(evicted, 3);
        assert_eq!(Rc::strong_count(&payload), 2);
        assert_eq!(buffer.layout(), RingLayout::new(1, 4, 2));

        buffer.add_last(Rc::clone(&payload));
        buffer.add_last(Rc::clone(&payload));
        buffer.add_last(Rc::clone(&payload));
        assert_eq!(buffer.trim_start(4), 4);
        assert_eq!(Rc::strong_count(&payload), 1);
        assert!(buffer.slots.iter().all(Option::is_none));
    }

    #[test]
    fn test_clear_resets_start() {
        let mut buffer = wrapped(4, 2, vec![1, 2, 3]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.layout(), RingLayout::new(0, 4, 0));

        buffer.add_last(9);
        assert_eq!(contents(&buffer), vec![9]);
    }

    #[test]
    fn test_index_of_across_wrap() {
        let buffer = wrapped(4, 2, vec!['c', 'd', 'a', 'd']);
        assert_eq!(buffer.index_of(&'c'), Some(0));
        assert_eq!(buffer.index_of(&'d'), Some(1));
        assert_eq!(buffer.index_of(&'a'), Some(2));
        assert_eq!(buffer.index_of(&'z'), None);
        assert!(buffer.contains(&'a'));
        assert!(!buffer.contains(&'b'));
    }

    #[test]
    fn test_for_each_logical_order() {
        let buffer = wrapped(5, 3, vec![1, 2, 3, 4, 5]);
        let mut seen = Vec::new();
        buffer.for_each(|v| seen.push(*v));
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);

        let reversed: Vec<_> = buffer.iter().rev().copied().collect();
        assert_eq!(reversed, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_equality_ignores_layout() {
        let a = wrapped(4, 3, vec![1, 2, 3]);
        let b: DynamicRingBuffer<i32> = (1..=3).collect();
        assert_eq!(a, b);
        assert_ne!(a.layout(), b.layout());
        assert_eq!(format!("{:?}", a), "[1, 2, 3]");
    }
}
