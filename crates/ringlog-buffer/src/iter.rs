//! Borrowing iterator shared by both ring buffers

use std::iter::FusedIterator;
use std::slice;

/// Iterator over the live elements of a ring buffer, oldest to newest
///
/// Walks the head segment and then the wrapped tail segment, so it never
/// computes a modulo per element.
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    head: slice::Iter<'a, Option<T>>,
    tail: slice::Iter<'a, Option<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(head: &'a [Option<T>], tail: &'a [Option<T>]) -> Self {
        Self {
            head: head.iter(),
            tail: tail.iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match self.head.next() {
            Some(slot) => slot.as_ref(),
            None => self.tail.next().and_then(Option::as_ref),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.head.len() + self.tail.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self.tail.next_back() {
            Some(slot) => slot.as_ref(),
            None => self.head.next_back().and_then(Option::as_ref),
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
