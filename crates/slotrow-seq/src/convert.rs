//! Construction from, and comparison with, other sequences.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use slotrow_raw::RawAlloc;

use crate::row::SlotRow;

impl<T, A: RawAlloc> Extend<T> for SlotRow<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.append(value);
        }
    }
}

impl<'a, T: Copy + 'a, A: RawAlloc> Extend<&'a T> for SlotRow<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for SlotRow<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut row = Self::new();
        row.extend(iter);
        row
    }
}

impl<T> From<Vec<T>> for SlotRow<T> {
    fn from(values: Vec<T>) -> Self {
        let mut row = Self::with_capacity(values.len());
        row.extend(values);
        row
    }
}

impl<T: Clone> From<&[T]> for SlotRow<T> {
    fn from(values: &[T]) -> Self {
        let mut row = Self::with_capacity(values.len());
        for value in values {
            row.append_clone(value);
        }
        row
    }
}

impl<T, const N: usize> From<[T; N]> for SlotRow<T> {
    fn from(values: [T; N]) -> Self {
        let mut row = Self::with_capacity(N);
        row.extend(values);
        row
    }
}

impl<T, A: RawAlloc> From<SlotRow<T, A>> for Vec<T> {
    fn from(row: SlotRow<T, A>) -> Self {
        row.into_iter().collect()
    }
}

impl<T, U, A, B> PartialEq<SlotRow<U, B>> for SlotRow<T, A>
where
    T: PartialEq<U>,
    A: RawAlloc,
    B: RawAlloc,
{
    fn eq(&self, other: &SlotRow<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, A: RawAlloc> PartialEq<[U]> for SlotRow<T, A> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, A: RawAlloc> PartialEq<&[U]> for SlotRow<T, A> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq<U>, U, A: RawAlloc, const N: usize> PartialEq<[U; N]> for SlotRow<T, A> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, A: RawAlloc> PartialEq<Vec<U>> for SlotRow<T, A> {
    fn eq(&self, other: &Vec<U>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: RawAlloc> Eq for SlotRow<T, A> {}

impl<T: PartialOrd, A: RawAlloc> PartialOrd for SlotRow<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: RawAlloc> Ord for SlotRow<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: RawAlloc> Hash for SlotRow<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
