//! The sequence container.

use std::alloc::{handle_alloc_error, Layout};
use std::fmt;
use std::mem;
use std::ops::{Bound, Deref, DerefMut, Index, IndexMut, RangeBounds};

use log::{debug, warn};
use slotrow_core::{ConfigError, RowConfig, RowMetrics, StoreError};
use slotrow_raw::{Global, Growth, RawAlloc, RawStore};

use crate::cursor::{Cursor, CursorMut};
use crate::error::TryInsertError;
use crate::iter::Iter;

/// A growable, contiguous, index-addressable sequence.
///
/// Live values always occupy indices `[0, len)` of a single block. Every
/// insertion that finds the block full grows it by doubling (see the
/// [crate docs](crate)); removal never shrinks it.
///
/// Infallible operations ([`append`](Self::append),
/// [`insert_at`](Self::insert_at), ...) panic or abort when growth fails,
/// like `Vec`. The `try_` variants report the failure and hand the value
/// back, leaving the row unchanged.
pub struct SlotRow<T, A: RawAlloc = Global> {
    store: RawStore<T, A>,
    metrics: RowMetrics,
}

impl<T> SlotRow<T> {
    /// Create an empty row. Acquires nothing.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create an empty row with room for `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if the block size overflows; aborts via
    /// [`handle_alloc_error`] if the allocator refuses.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Global)
    }

    /// Fallible [`with_capacity`](Self::with_capacity).
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from block acquisition.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, StoreError> {
        Self::try_with_capacity_in(capacity, Global)
    }

    /// Create an empty row sized and bounded by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid or the initial block
    /// cannot be acquired.
    pub fn with_config(config: &RowConfig) -> Result<Self, ConfigError> {
        Self::with_config_in(config, Global)
    }
}

impl<T> Default for SlotRow<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: RawAlloc> SlotRow<T, A> {
    /// Create an empty row using `alloc`. Acquires nothing.
    pub fn new_in(alloc: A) -> Self {
        Self::from_store(RawStore::new_in(alloc))
    }

    /// Create an empty row with room for `capacity` values, using `alloc`.
    ///
    /// # Panics
    ///
    /// As [`SlotRow::with_capacity`].
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        match Self::try_with_capacity_in(capacity, alloc) {
            Ok(row) => row,
            Err(e) => growth_failed(e),
        }
    }

    /// Fallible [`with_capacity_in`](Self::with_capacity_in).
    ///
    /// # Errors
    ///
    /// Returns the [`StoreError`] from block acquisition.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, StoreError> {
        RawStore::with_capacity_in(capacity, alloc).map(Self::from_store)
    }

    /// Create an empty row sized and bounded by `config`, using `alloc`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` is invalid or the initial block
    /// cannot be acquired.
    pub fn with_config_in(config: &RowConfig, alloc: A) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut store = RawStore::with_capacity_in(config.initial_capacity, alloc)?;
        store.set_max_capacity(config.limit());
        Ok(Self::from_store(store))
    }

    fn from_store(store: RawStore<T, A>) -> Self {
        let mut metrics = RowMetrics::default();
        metrics.observe_capacity(store.capacity());
        Self { store, metrics }
    }

    // ── Queries ────────────────────────────────────────────────

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the row holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of values the row can hold without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Largest capacity growth may reach (`usize::MAX` when unbounded).
    pub fn max_capacity(&self) -> usize {
        self.store.max_capacity()
    }

    /// Growth counters since construction or the last
    /// [`reset_metrics`](Self::reset_metrics).
    pub fn metrics(&self) -> &RowMetrics {
        &self.metrics
    }

    /// Zero the growth counters. `peak_capacity` restarts at the current
    /// capacity.
    pub fn reset_metrics(&mut self) {
        self.metrics = RowMetrics::default();
        self.metrics.observe_capacity(self.capacity());
    }

    /// The allocation strategy handle.
    pub fn allocator(&self) -> &A {
        self.store.allocator()
    }

    /// The live values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.store.as_slice()
    }

    /// The live values as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.store.as_mut_slice()
    }

    // ── Element access ─────────────────────────────────────────

    /// The value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn at(&self, index: usize) -> &T {
        let len = self.len();
        match self.store.as_slice().get(index) {
            Some(value) => value,
            None => panic!("index {index} out of bounds for length {len}"),
        }
    }

    /// Mutable access to the value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.store.as_mut_slice().get_mut(index) {
            Some(value) => value,
            None => panic!("index {index} out of bounds for length {len}"),
        }
    }

    /// The value at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.store.as_slice().get(index)
    }

    /// Mutable access to the value at `index`, or `None` if out of bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.store.as_mut_slice().get_mut(index)
    }

    // ── Insertion ──────────────────────────────────────────────

    /// Add `value` at the end.
    ///
    /// # Panics
    ///
    /// Panics if the row is at its capacity limit; aborts via
    /// [`handle_alloc_error`] if the allocator refuses.
    pub fn append(&mut self, value: T) {
        if let Err(e) = self.reserve_one() {
            growth_failed(e);
        }
        self.store.construct(value);
    }

    /// Add `value` at the end, or hand it back if the row cannot grow.
    ///
    /// # Errors
    ///
    /// Returns [`TryInsertError`] carrying the growth error and `value`.
    /// The row is unchanged.
    pub fn try_append(&mut self, value: T) -> Result<(), TryInsertError<T>> {
        if let Err(error) = self.reserve_one() {
            return Err(TryInsertError { error, value });
        }
        self.store.construct(value);
        Ok(())
    }

    /// Add a clone of `value` at the end.
    ///
    /// Room is made before cloning; if `T::clone` panics the row keeps its
    /// values (and possibly its grown block).
    ///
    /// # Panics
    ///
    /// As [`append`](Self::append).
    pub fn append_clone(&mut self, value: &T)
    where
        T: Clone,
    {
        if let Err(e) = self.reserve_one() {
            growth_failed(e);
        }
        self.store.construct_clone(value);
    }

    /// Insert `value` at `index`, shifting `[index, len)` one place up.
    ///
    /// `index == len()` is equivalent to [`append`](Self::append). When the
    /// row is full, values are moved straight into their final slots in the
    /// new block rather than relocated and then shifted.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`, otherwise as [`append`](Self::append).
    pub fn insert_at(&mut self, index: usize, value: T) {
        if let Err(e) = self.try_insert_at(index, value) {
            growth_failed(e.error);
        }
    }

    /// Fallible [`insert_at`](Self::insert_at).
    ///
    /// # Errors
    ///
    /// Returns [`TryInsertError`] carrying the growth error and `value`.
    /// The row is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn try_insert_at(&mut self, index: usize, value: T) -> Result<(), TryInsertError<T>> {
        let len = self.len();
        assert!(
            index <= len,
            "insertion index {index} out of bounds for length {len}"
        );

        if self.store.has_free_space() {
            self.store.construct(value);
            self.store.as_mut_slice()[index..].rotate_right(1);
            return Ok(());
        }

        let mut fresh = match self.store.next_capacity().and_then(|to| self.store.sibling(to)) {
            Ok(fresh) => fresh,
            Err(error) => {
                self.note_failed_growth(&error);
                return Err(TryInsertError { error, value });
            }
        };
        fresh.relocate_inserting_from(&mut self.store, index, value);
        self.store.swap_with(&mut fresh);
        // `fresh` now holds the old, empty block and releases it on drop.
        let growth = Growth {
            from: fresh.capacity(),
            to: self.store.capacity(),
            relocated: len,
        };
        self.note_growth(growth, true);
        Ok(())
    }

    /// Reserve room for at least `additional` more values.
    ///
    /// Capacity follows the same doubling sequence repeated appends would
    /// produce, clamped to the limit.
    ///
    /// # Panics
    ///
    /// As [`append`](Self::append).
    pub fn reserve(&mut self, additional: usize) {
        if let Err(e) = self.try_reserve(additional) {
            growth_failed(e);
        }
    }

    /// Fallible [`reserve`](Self::reserve).
    ///
    /// # Errors
    ///
    /// [`StoreError::CapacityLimit`] if `len() + additional` exceeds the
    /// limit, otherwise any error from block acquisition. The row is
    /// unchanged on error.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), StoreError> {
        if self.store.free_slots() >= additional {
            return Ok(());
        }
        let result = self.grow_for(additional);
        if let Err(e) = &result {
            self.note_failed_growth(e);
        }
        result
    }

    fn grow_for(&mut self, additional: usize) -> Result<(), StoreError> {
        let limit = self.store.max_capacity();
        let needed = self
            .len()
            .checked_add(additional)
            .ok_or(StoreError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        if needed > limit {
            return Err(StoreError::CapacityLimit {
                requested: needed,
                limit,
            });
        }
        let mut to = self.capacity().max(1);
        while to < needed {
            to = to.saturating_mul(2);
        }
        let mut fresh = self.store.sibling(to.min(limit))?;
        let relocated = self.len();
        fresh.relocate_all_from(&mut self.store);
        self.store.swap_with(&mut fresh);
        let growth = Growth {
            from: fresh.capacity(),
            to: self.store.capacity(),
            relocated,
        };
        self.note_growth(growth, false);
        Ok(())
    }

    /// Append a byte copy of every value in `values`.
    ///
    /// # Panics
    ///
    /// As [`append`](Self::append).
    pub fn extend_from_copy_slice(&mut self, values: &[T])
    where
        T: Copy,
    {
        self.reserve(values.len());
        self.store.extend_copied(values);
    }

    fn reserve_one(&mut self) -> Result<(), StoreError> {
        match self.store.ensure_free_space() {
            Ok(Some(growth)) => {
                self.note_growth(growth, false);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                self.note_failed_growth(&e);
                Err(e)
            }
        }
    }

    fn note_growth(&mut self, growth: Growth, inserting: bool) {
        self.metrics.record_growth(growth.to, growth.relocated);
        debug!(
            "slot row grew {} -> {} slots, relocated {} values (inserting: {inserting})",
            growth.from, growth.to, growth.relocated
        );
    }

    fn note_failed_growth(&mut self, error: &StoreError) {
        self.metrics.record_failed_growth();
        warn!(
            "slot row growth failed at capacity {}: {error}",
            self.capacity()
        );
    }

    // ── Removal ────────────────────────────────────────────────

    /// Remove and return the value at `index`, shifting `(index, len)` one
    /// place down.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove_at(&mut self, index: usize) -> T {
        let len = self.len();
        assert!(
            index < len,
            "removal index {index} out of bounds for length {len}"
        );
        self.store.as_mut_slice()[index..].rotate_left(1);
        self.store
            .take_last()
            .expect("row is non-empty, checked above")
    }

    /// Destroy the values in `range`, shifting the values after it down to
    /// close the gap. Capacity is unchanged; an empty range does nothing.
    ///
    /// # Panics
    ///
    /// Panics if the range start exceeds its end or the end exceeds
    /// `len()`.
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let len = self.len();
        let (from, to) = resolve_range(&range, len);
        if from == to {
            return;
        }
        if to < len {
            self.store.as_mut_slice()[from..].rotate_left(to - from);
        }
        self.store.destroy_range(len - (to - from), len);
    }

    /// Remove and return the last value.
    pub fn pop(&mut self) -> Option<T> {
        self.store.take_last()
    }

    /// Destroy every value after the first `len`. No-op if the row is
    /// already that short.
    pub fn truncate(&mut self, len: usize) {
        let current = self.len();
        if len < current {
            self.store.destroy_range(len, current);
        }
    }

    /// Destroy every value. Capacity is kept.
    pub fn clear(&mut self) {
        self.store.destroy_all();
    }

    /// Keep only the values for which `keep` returns `true`, preserving
    /// their order.
    ///
    /// If `keep` panics, the values already rejected are destroyed and
    /// the unvisited tail stays after the kept prefix, in order.
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut keep: F) {
        let len = self.len();
        let mut pass = RetainPass {
            row: self,
            kept: 0,
            visited: 0,
        };
        while pass.visited < len {
            let i = pass.visited;
            let values = pass.row.store.as_mut_slice();
            let keep_it = keep(&values[i]);
            pass.visited += 1;
            if keep_it {
                values.swap(pass.kept, i);
                pass.kept += 1;
            }
        }
    }

    /// Move every value into a new row, leaving this one empty with no
    /// block. The allocation strategy, capacity limit and metrics travel
    /// with the values.
    pub fn take(&mut self) -> Self {
        let mut empty = RawStore::new_in(self.store.allocator().clone());
        empty.set_max_capacity(self.store.max_capacity());
        self.store.swap_with(&mut empty);
        let metrics = mem::take(&mut self.metrics);
        Self {
            store: empty,
            metrics,
        }
    }

    /// Exchange contents with `other` in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    // ── Cursors ────────────────────────────────────────────────

    /// Cursor at index 0.
    pub fn begin(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, 0)
    }

    /// Cursor at index `len()` (one past the last value).
    pub fn end(&self) -> Cursor<'_, T, A> {
        Cursor::new(self, self.len())
    }

    /// Cursor at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len()`.
    pub fn cursor_at(&self, offset: usize) -> Cursor<'_, T, A> {
        Cursor::new(self, offset)
    }

    /// Mutating cursor at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len()`.
    pub fn cursor_mut(&mut self, offset: usize) -> CursorMut<'_, T, A> {
        CursorMut::new(self, offset)
    }

    /// Iterate over shared references, front to back.
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter::new(self.begin(), self.end())
    }

    /// Iterate over mutable references, front to back.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.store.as_mut_slice().iter_mut()
    }

    /// Hand the store over, leaving an empty one behind for `Drop`.
    pub(crate) fn take_store(&mut self) -> RawStore<T, A> {
        let mut empty = RawStore::new_in(self.store.allocator().clone());
        self.store.swap_with(&mut empty);
        empty
    }
}

/// Resolve `range` against a live length, as `[from, to)`.
fn resolve_range<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let from = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start
            .checked_add(1)
            .unwrap_or_else(|| panic!("range start overflows usize")),
        Bound::Unbounded => 0,
    };
    let to = match range.end_bound() {
        Bound::Included(&end) => end
            .checked_add(1)
            .unwrap_or_else(|| panic!("range end overflows usize")),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    assert!(from <= to, "malformed range: {from} > {to}");
    assert!(to <= len, "range end {to} out of bounds for length {len}");
    (from, to)
}

/// Escalate a growth failure on an infallible path.
#[cold]
#[track_caller]
fn growth_failed(error: StoreError) -> ! {
    if let StoreError::AllocFailed { bytes, align } = &error {
        if let Ok(layout) = Layout::from_size_align(*bytes, *align) {
            handle_alloc_error(layout);
        }
    }
    panic!("slot row growth failed: {error}");
}

/// Progress of a [`SlotRow::retain`] pass. Kept values occupy
/// `[0, kept)` and rejected ones `[kept, visited)`; dropping the pass
/// removes the rejected range, whether the loop finished or unwound.
struct RetainPass<'a, T, A: RawAlloc> {
    row: &'a mut SlotRow<T, A>,
    kept: usize,
    visited: usize,
}

impl<T, A: RawAlloc> Drop for RetainPass<'_, T, A> {
    fn drop(&mut self) {
        self.row.remove_range(self.kept..self.visited);
    }
}

impl<T, A: RawAlloc> Drop for SlotRow<T, A> {
    fn drop(&mut self) {
        self.store.destroy_all();
    }
}

impl<T: Clone, A: RawAlloc> Clone for SlotRow<T, A> {
    /// Clones into a block of exactly `len()` slots with the same
    /// allocation strategy and capacity limit. Metrics start fresh.
    fn clone(&self) -> Self {
        let store = match self.store.sibling(self.len()) {
            Ok(store) => store,
            Err(e) => growth_failed(e),
        };
        // Owned by the row before any clone runs, so a panicking clone
        // drops what was built so far.
        let mut row = Self::from_store(store);
        for value in self.as_slice() {
            row.store.construct_clone(value);
        }
        row
    }
}

impl<T: fmt::Debug, A: RawAlloc> fmt::Debug for SlotRow<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, A: RawAlloc> Deref for SlotRow<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAlloc> DerefMut for SlotRow<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: RawAlloc> AsRef<[T]> for SlotRow<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAlloc> AsMut<[T]> for SlotRow<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: RawAlloc> Index<usize> for SlotRow<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.at(index)
    }
}

impl<T, A: RawAlloc> IndexMut<usize> for SlotRow<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.at_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_row_is_empty_without_block() {
        let row: SlotRow<i32> = SlotRow::new();
        assert!(row.is_empty());
        assert_eq!(row.capacity(), 0);
        assert_eq!(row.metrics().peak_capacity, 0);
    }

    #[test]
    fn append_doubles_capacity() {
        let mut row = SlotRow::new();
        let mut seen = Vec::new();
        for i in 0..9 {
            row.append(i);
            seen.push(row.capacity());
        }
        assert_eq!(seen, vec![1, 2, 4, 4, 8, 8, 8, 8, 16]);
        assert_eq!(row.metrics().growth_events, 5);
        assert_eq!(row.metrics().relocated_elements, 1 + 2 + 4 + 8);
    }

    #[test]
    fn insert_at_shifts_tail() {
        let mut row: SlotRow<i32> = [1, 2, 4].into();
        row.reserve(1);
        row.insert_at(2, 3);
        assert_eq!(row, [1, 2, 3, 4]);
        row.insert_at(0, 0);
        assert_eq!(row, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn insert_at_through_growth_places_value() {
        let mut row: SlotRow<i32> = SlotRow::with_capacity(3);
        row.extend_from_copy_slice(&[10, 30, 40]);
        assert_eq!(row.capacity(), 3);
        row.insert_at(1, 20);
        assert_eq!(row, [10, 20, 30, 40]);
        assert_eq!(row.capacity(), 6);
        assert_eq!(row.metrics().growth_events, 1);
        assert_eq!(row.metrics().relocated_elements, 3);
    }

    #[test]
    fn insert_at_len_matches_append() {
        let mut a: SlotRow<i32> = SlotRow::new();
        let mut b: SlotRow<i32> = SlotRow::new();
        for i in 0..10 {
            a.insert_at(a.len(), i);
            b.append(i);
            assert_eq!(a.capacity(), b.capacity());
        }
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "insertion index 4 out of bounds")]
    fn insert_past_len_panics() {
        let mut row: SlotRow<i32> = [1, 2, 3].into();
        row.insert_at(4, 0);
    }

    #[test]
    fn remove_at_returns_value_and_closes_gap() {
        let mut row: SlotRow<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(row.remove_at(1), "b");
        assert_eq!(row, ["a", "c"]);
        assert_eq!(row.capacity(), 4);
    }

    #[test]
    fn remove_range_interior_and_suffix() {
        let mut row: SlotRow<i32> = (0..10).collect();
        let cap = row.capacity();
        row.remove_range(2..5);
        assert_eq!(row, [0, 1, 5, 6, 7, 8, 9]);
        row.remove_range(4..);
        assert_eq!(row, [0, 1, 5, 6]);
        row.remove_range(1..=1);
        assert_eq!(row, [0, 5, 6]);
        row.remove_range(3..3);
        assert_eq!(row, [0, 5, 6]);
        assert_eq!(row.capacity(), cap);
    }

    #[test]
    #[should_panic(expected = "malformed range")]
    fn inverted_range_panics() {
        let mut row: SlotRow<i32> = (0..5).collect();
        #[allow(clippy::reversed_empty_ranges)]
        row.remove_range(3..1);
    }

    #[test]
    #[should_panic(expected = "range end 6 out of bounds")]
    fn range_past_len_panics() {
        let mut row: SlotRow<i32> = (0..5).collect();
        row.remove_range(2..6);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut row: SlotRow<i32> = (0..20).collect();
        let cap = row.capacity();
        row.clear();
        assert!(row.is_empty());
        assert_eq!(row.capacity(), cap);
        row.clear();
        assert!(row.is_empty());
    }

    #[test]
    fn retain_preserves_order() {
        let mut row: SlotRow<i32> = (0..10).collect();
        row.retain(|v| v % 3 != 0);
        assert_eq!(row, [1, 2, 4, 5, 7, 8]);
    }

    #[test]
    fn retain_panic_drops_rejected_and_keeps_tail() {
        let mut row: SlotRow<i32> = (0..10).collect();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            row.retain(|&v| {
                assert_ne!(v, 5, "predicate refused 5");
                v % 2 == 0
            });
        }));
        assert!(result.is_err());
        assert_eq!(row, [0, 2, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn truncate_and_pop() {
        let mut row: SlotRow<i32> = (0..6).collect();
        row.truncate(10);
        assert_eq!(row.len(), 6);
        row.truncate(3);
        assert_eq!(row.pop(), Some(2));
        assert_eq!(row, [0, 1]);
    }

    #[test]
    #[should_panic(expected = "index 3 out of bounds for length 3")]
    fn at_out_of_bounds_panics() {
        let row: SlotRow<i32> = [1, 2, 3].into();
        let _ = row.at(3);
    }

    #[test]
    fn at_mut_modifies_in_place() {
        let mut row: SlotRow<i32> = [1, 2, 3].into();
        *row.at_mut(1) = 20;
        row[2] += 1;
        assert_eq!(row, [1, 20, 4]);
        assert_eq!(row.get(3), None);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut row: SlotRow<i32> = (0..5).collect();
        let moved = row.take();
        assert_eq!(moved, [0, 1, 2, 3, 4]);
        assert!(row.is_empty());
        assert_eq!(row.capacity(), 0);
        assert_eq!(row.metrics(), &RowMetrics::default());
        row.append(7);
        assert_eq!(row, [7]);
    }

    #[test]
    fn clone_is_independent_and_tight() {
        let mut row: SlotRow<String> = SlotRow::new();
        for s in ["x", "y", "z"] {
            row.append(s.to_string());
        }
        let copy = row.clone();
        row[0].push('!');
        assert_eq!(copy, ["x", "y", "z"]);
        assert_eq!(copy.capacity(), 3);
        assert_eq!(row[0], "x!");
    }

    #[test]
    fn reserve_follows_doubling() {
        let mut row: SlotRow<u8> = SlotRow::new();
        row.reserve(5);
        assert_eq!(row.capacity(), 8);
        row.reserve(3);
        assert_eq!(row.capacity(), 8);
        row.extend_from_copy_slice(&[1; 8]);
        row.reserve(1);
        assert_eq!(row.capacity(), 16);
    }

    #[test]
    fn limit_clamps_growth_and_fails_cleanly() {
        let config = RowConfig::new().with_max_capacity(3);
        let mut row: SlotRow<i32> = SlotRow::with_config(&config).unwrap();
        row.append(1);
        row.append(2);
        row.append(3);
        assert_eq!(row.capacity(), 3);

        let err = row.try_append(4).unwrap_err();
        assert_eq!(
            err.error,
            StoreError::CapacityLimit {
                requested: 4,
                limit: 3
            }
        );
        assert_eq!(err.into_inner(), 4);

        let err = row.try_insert_at(0, 0).unwrap_err();
        assert_eq!(err.value, 0);
        assert_eq!(row, [1, 2, 3]);
        assert_eq!(row.metrics().failed_growths, 2);
        assert!(row.try_reserve(1).is_err());
        assert_eq!(row.metrics().failed_growths, 3);
    }

    #[test]
    #[should_panic(expected = "slot row growth failed: capacity limit")]
    fn append_past_limit_panics() {
        let config = RowConfig::new().with_max_capacity(1);
        let mut row: SlotRow<i32> = SlotRow::with_config(&config).unwrap();
        row.append(1);
        row.append(2);
    }

    #[test]
    fn config_presizes() {
        let config = RowConfig::new().with_initial_capacity(10);
        let row: SlotRow<u64> = SlotRow::with_config(&config).unwrap();
        assert_eq!(row.capacity(), 10);
        assert_eq!(row.max_capacity(), usize::MAX);
        assert_eq!(row.metrics().peak_capacity, 10);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RowConfig::new()
            .with_initial_capacity(8)
            .with_max_capacity(4);
        let result: Result<SlotRow<u8>, _> = SlotRow::with_config(&config);
        assert!(matches!(
            result,
            Err(ConfigError::InitialExceedsLimit {
                initial: 8,
                limit: 4
            })
        ));
    }

    #[test]
    fn reset_metrics_restarts_peak_at_capacity() {
        let mut row: SlotRow<i32> = (0..5).collect();
        row.clear();
        row.reset_metrics();
        assert_eq!(row.metrics().growth_events, 0);
        assert_eq!(row.metrics().peak_capacity, row.capacity());
    }

    #[test]
    fn zero_sized_values_still_double() {
        let mut row = SlotRow::new();
        for _ in 0..5 {
            row.append(());
        }
        assert_eq!(row.len(), 5);
        assert_eq!(row.capacity(), 8);
        row.remove_range(1..3);
        assert_eq!(row.len(), 3);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Append(u16),
            Insert(usize, u16),
            Remove(usize),
            RemoveRange(usize, usize),
            Pop,
            Clear,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => any::<u16>().prop_map(Op::Append),
                3 => (any::<usize>(), any::<u16>()).prop_map(|(i, v)| Op::Insert(i, v)),
                2 => any::<usize>().prop_map(Op::Remove),
                1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::RemoveRange(a, b)),
                1 => Just(Op::Pop),
                1 => Just(Op::Clear),
            ]
        }

        proptest! {
            #[test]
            fn matches_vec_model(ops in prop::collection::vec(op(), 0..200)) {
                let mut row: SlotRow<u16> = SlotRow::new();
                let mut model: Vec<u16> = Vec::new();
                for op in ops {
                    match op {
                        Op::Append(v) => {
                            row.append(v);
                            model.push(v);
                        }
                        Op::Insert(i, v) => {
                            let i = i % (model.len() + 1);
                            row.insert_at(i, v);
                            model.insert(i, v);
                        }
                        Op::Remove(i) if !model.is_empty() => {
                            let i = i % model.len();
                            prop_assert_eq!(row.remove_at(i), model.remove(i));
                        }
                        Op::Remove(_) => {}
                        Op::RemoveRange(a, b) => {
                            let a = a % (model.len() + 1);
                            let b = b % (model.len() + 1);
                            let (from, to) = (a.min(b), a.max(b));
                            row.remove_range(from..to);
                            model.drain(from..to);
                        }
                        Op::Pop => prop_assert_eq!(row.pop(), model.pop()),
                        Op::Clear => {
                            row.clear();
                            model.clear();
                        }
                    }
                    prop_assert_eq!(row.as_slice(), model.as_slice());
                    prop_assert!(row.len() <= row.capacity());
                }
            }

            #[test]
            fn capacity_only_grows(n in 0usize..300) {
                let mut row = SlotRow::new();
                let mut last = 0;
                for i in 0..n {
                    row.append(i);
                    prop_assert!(row.capacity() >= last);
                    prop_assert!(row.capacity() == 0 || row.capacity().is_power_of_two());
                    last = row.capacity();
                }
                row.clear();
                prop_assert_eq!(row.capacity(), last);
            }
        }
    }
}
