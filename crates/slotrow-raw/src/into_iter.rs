//! Owning iteration over a store's values.

#![allow(unsafe_code)]

use std::iter::FusedIterator;

use crate::alloc::{Global, RawAlloc};
use crate::store::RawStore;

/// Moves values out of a [`RawStore`] front to back (or back to front).
///
/// The iterator owns the slots in `[head, tail)`; the store itself counts
/// no live values. Whatever has not been yielded when the iterator is
/// dropped is destroyed, then the block is released.
pub struct RawIntoIter<T, A: RawAlloc = Global> {
    store: RawStore<T, A>,
    head: usize,
    tail: usize,
}

impl<T, A: RawAlloc> RawIntoIter<T, A> {
    /// `store` must have handed ownership of `[0, len)` to the iterator.
    pub(crate) fn new(store: RawStore<T, A>, len: usize) -> Self {
        debug_assert!(store.is_empty());
        Self {
            store,
            head: 0,
            tail: len,
        }
    }

    /// The values not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        if self.head == self.tail {
            return &[];
        }
        // SAFETY: [head, tail) are live values owned by the iterator.
        unsafe { std::slice::from_raw_parts(self.store.slot_ptr(self.head), self.tail - self.head) }
    }
}

impl<T, A: RawAlloc> Iterator for RawIntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None;
        }
        let index = self.head;
        self.head += 1;
        // SAFETY: `index` was in [head, tail) and is now excluded, so it
        // is read exactly once.
        Some(unsafe { self.store.read_slot(index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.tail - self.head;
        (remaining, Some(remaining))
    }
}

impl<T, A: RawAlloc> DoubleEndedIterator for RawIntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.head == self.tail {
            return None;
        }
        self.tail -= 1;
        // SAFETY: `tail` was the last owned slot and is now excluded.
        Some(unsafe { self.store.read_slot(self.tail) })
    }
}

impl<T, A: RawAlloc> ExactSizeIterator for RawIntoIter<T, A> {}

impl<T, A: RawAlloc> FusedIterator for RawIntoIter<T, A> {}

impl<T, A: RawAlloc> Drop for RawIntoIter<T, A> {
    fn drop(&mut self) {
        let (head, tail) = (self.head, self.tail);
        self.head = tail;
        // SAFETY: [head, tail) are owned by the iterator, never yielded,
        // and excluded from further iteration above.
        unsafe { self.store.drop_detached(head, tail) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn yields_in_order_from_both_ends() {
        let mut store = RawStore::with_capacity(4).unwrap();
        store.extend_copied(&[1u8, 2, 3, 4]);
        let mut iter = store.into_values();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.as_slice(), &[2, 3]);
        assert_eq!(iter.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn drop_destroys_unyielded_values() {
        let drops = Rc::new(Cell::new(0));
        let mut store = RawStore::with_capacity(5).unwrap();
        for _ in 0..5 {
            store.construct(DropCounter(Rc::clone(&drops)));
        }
        let mut iter = store.into_values();
        drop(iter.next());
        assert_eq!(drops.get(), 1);
        drop(iter);
        assert_eq!(drops.get(), 5);
    }

    #[test]
    fn empty_store_yields_nothing() {
        let store: RawStore<String> = RawStore::new();
        let mut iter = store.into_values();
        assert!(iter.as_slice().is_empty());
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }
}
