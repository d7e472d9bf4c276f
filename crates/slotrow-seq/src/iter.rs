//! Iterators over a [`SlotRow`].

use std::fmt;
use std::iter::FusedIterator;

use slotrow_raw::{Global, RawAlloc, RawIntoIter};

use crate::cursor::Cursor;
use crate::row::SlotRow;

/// Borrowing iterator, driven by a pair of cursors.
pub struct Iter<'a, T, A: RawAlloc = Global> {
    front: Cursor<'a, T, A>,
    back: Cursor<'a, T, A>,
}

impl<'a, T, A: RawAlloc> Iter<'a, T, A> {
    pub(crate) fn new(front: Cursor<'a, T, A>, back: Cursor<'a, T, A>) -> Self {
        Self { front, back }
    }

    /// The values not yet yielded.
    pub fn as_slice(&self) -> &'a [T] {
        match self.front.row() {
            Some(row) => &row.as_slice()[self.front.offset()..self.back.offset()],
            None => &[],
        }
    }
}

impl<T, A: RawAlloc> Clone for Iter<'_, T, A> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T, A: RawAlloc> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let value = self.front.get();
        self.front.move_next();
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.offset() - self.front.offset();
        (remaining, Some(remaining))
    }
}

impl<'a, T, A: RawAlloc> DoubleEndedIterator for Iter<'a, T, A> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back.move_prev();
        self.back.get()
    }
}

impl<T, A: RawAlloc> ExactSizeIterator for Iter<'_, T, A> {}

impl<T, A: RawAlloc> FusedIterator for Iter<'_, T, A> {}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for Iter<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.as_slice()).finish()
    }
}

/// Owning iterator; moves each value out of the row.
pub struct IntoIter<T, A: RawAlloc = Global> {
    inner: RawIntoIter<T, A>,
}

impl<T, A: RawAlloc> IntoIter<T, A> {
    /// The values not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }
}

impl<T, A: RawAlloc> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, A: RawAlloc> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T, A: RawAlloc> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: RawAlloc> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: RawAlloc> IntoIterator for SlotRow<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(mut self) -> IntoIter<T, A> {
        IntoIter {
            inner: self.take_store().into_values(),
        }
    }
}

impl<'a, T, A: RawAlloc> IntoIterator for &'a SlotRow<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Iter<'a, T, A> {
        self.iter()
    }
}

impl<'a, T, A: RawAlloc> IntoIterator for &'a mut SlotRow<T, A> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> std::slice::IterMut<'a, T> {
        self.iter_mut()
    }
}
