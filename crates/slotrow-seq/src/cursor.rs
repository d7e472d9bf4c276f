//! Index cursors.
//!
//! A cursor is a `(row, offset)` pair. Offsets range over `[0, len]`,
//! with `len` as the end position. Moving a cursor outside that range in
//! either direction invalidates it: the row binding is dropped, the
//! offset reads 0, and the cursor stays invalid from then on. Reading
//! through an invalid or end cursor yields `None`.
//!
//! [`Cursor`] borrows the row immutably and is `Copy`, so any number can
//! coexist. [`CursorMut`] borrows it exclusively and can insert and remove
//! at its position; the borrow checker rules out every other cursor while
//! it exists.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::ptr;

use slotrow_raw::{Global, RawAlloc};

use crate::error::TryInsertError;
use crate::row::SlotRow;

/// Move `offset` by `delta` within `[0, len]`, or `None` if it would leave.
fn step(offset: usize, delta: isize, len: usize) -> Option<usize> {
    offset.checked_add_signed(delta).filter(|&next| next <= len)
}

/// A read-only position in a [`SlotRow`].
pub struct Cursor<'a, T, A: RawAlloc = Global> {
    row: Option<&'a SlotRow<T, A>>,
    offset: usize,
}

impl<T, A: RawAlloc> Clone for Cursor<'_, T, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, A: RawAlloc> Copy for Cursor<'_, T, A> {}

impl<'a, T, A: RawAlloc> Cursor<'a, T, A> {
    pub(crate) fn new(row: &'a SlotRow<T, A>, offset: usize) -> Self {
        let len = row.len();
        assert!(
            offset <= len,
            "cursor offset {offset} out of bounds for length {len}"
        );
        Self {
            row: Some(row),
            offset,
        }
    }

    /// An invalid cursor, bound to no row.
    pub const fn invalid() -> Self {
        Self {
            row: None,
            offset: 0,
        }
    }

    pub(crate) fn row(&self) -> Option<&'a SlotRow<T, A>> {
        self.row
    }

    /// Current offset (0 when invalid).
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the cursor is still bound to a row.
    pub fn is_valid(&self) -> bool {
        self.row.is_some()
    }

    /// Whether the cursor is at the end position of its row.
    pub fn is_end(&self) -> bool {
        matches!(self.row, Some(row) if self.offset == row.len())
    }

    /// The value under the cursor, or `None` at the end or when invalid.
    pub fn get(&self) -> Option<&'a T> {
        self.row.and_then(|row| row.get(self.offset))
    }

    /// The value under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is invalid or at the end.
    pub fn value(&self) -> &'a T {
        match self.get() {
            Some(value) => value,
            None => panic!(
                "cursor at offset {} does not point at a value",
                self.offset
            ),
        }
    }

    /// Move by `delta` places, invalidating the cursor if the result would
    /// leave `[0, len]`. An invalid cursor stays invalid.
    pub fn advance(&mut self, delta: isize) -> &mut Self {
        if let Some(row) = self.row {
            match step(self.offset, delta, row.len()) {
                Some(next) => self.offset = next,
                None => *self = Self::invalid(),
            }
        }
        self
    }

    /// Move back by `delta` places. See [`advance`](Self::advance).
    pub fn retreat(&mut self, delta: isize) -> &mut Self {
        match delta.checked_neg() {
            Some(delta) => self.advance(delta),
            None => {
                *self = Self::invalid();
                self
            }
        }
    }

    /// Move one place forward.
    pub fn move_next(&mut self) -> &mut Self {
        self.advance(1)
    }

    /// Move one place back.
    pub fn move_prev(&mut self) -> &mut Self {
        self.advance(-1)
    }

    /// Signed distance `self.offset() - origin.offset()`.
    ///
    /// # Panics
    ///
    /// Panics unless both cursors are valid and bound to the same row.
    pub fn distance_from(&self, origin: &Self) -> isize {
        assert!(
            self.is_valid() && self.same_row(origin),
            "distance between cursors of different rows"
        );
        // Offsets are at most `len`, which fits in isize for any real block.
        self.offset as isize - origin.offset as isize
    }

    fn same_row(&self, other: &Self) -> bool {
        match (self.row, other.row) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T, A: RawAlloc> Add<isize> for Cursor<'_, T, A> {
    type Output = Self;

    fn add(mut self, delta: isize) -> Self {
        self.advance(delta);
        self
    }
}

impl<T, A: RawAlloc> Sub<isize> for Cursor<'_, T, A> {
    type Output = Self;

    fn sub(mut self, delta: isize) -> Self {
        self.retreat(delta);
        self
    }
}

impl<T, A: RawAlloc> AddAssign<isize> for Cursor<'_, T, A> {
    fn add_assign(&mut self, delta: isize) {
        self.advance(delta);
    }
}

impl<T, A: RawAlloc> SubAssign<isize> for Cursor<'_, T, A> {
    fn sub_assign(&mut self, delta: isize) {
        self.retreat(delta);
    }
}

impl<'a, T, A: RawAlloc> Sub for Cursor<'a, T, A> {
    type Output = isize;

    fn sub(self, origin: Self) -> isize {
        self.distance_from(&origin)
    }
}

/// Cursors are equal when bound to the same row at the same offset, or
/// when both are invalid.
impl<T, A: RawAlloc> PartialEq for Cursor<'_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.same_row(other) && self.offset == other.offset
    }
}

impl<T, A: RawAlloc> Eq for Cursor<'_, T, A> {}

/// Cursors of different rows are unordered.
impl<T, A: RawAlloc> PartialOrd for Cursor<'_, T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.same_row(other) {
            Some(self.offset.cmp(&other.offset))
        } else {
            None
        }
    }
}

impl<T, A: RawAlloc> fmt::Debug for Cursor<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset)
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// A position in a [`SlotRow`] that can edit the row.
///
/// Insertion places the new value at the cursor's offset, so the cursor
/// then points at it. Removal keeps the offset, so the cursor then points
/// at the value that followed the removed ones.
pub struct CursorMut<'a, T, A: RawAlloc = Global> {
    row: &'a mut SlotRow<T, A>,
    offset: usize,
    valid: bool,
}

impl<'a, T, A: RawAlloc> CursorMut<'a, T, A> {
    pub(crate) fn new(row: &'a mut SlotRow<T, A>, offset: usize) -> Self {
        let len = row.len();
        assert!(
            offset <= len,
            "cursor offset {offset} out of bounds for length {len}"
        );
        Self {
            row,
            offset,
            valid: true,
        }
    }

    /// Current offset (0 when invalid).
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the cursor is still usable.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.valid && self.offset == self.row.len()
    }

    /// The value under the cursor.
    pub fn get(&self) -> Option<&T> {
        if !self.valid {
            return None;
        }
        self.row.get(self.offset)
    }

    /// Mutable access to the value under the cursor.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if !self.valid {
            return None;
        }
        self.row.get_mut(self.offset)
    }

    /// Move by `delta` places; see [`Cursor::advance`].
    pub fn advance(&mut self, delta: isize) -> &mut Self {
        if self.valid {
            match step(self.offset, delta, self.row.len()) {
                Some(next) => self.offset = next,
                None => self.invalidate(),
            }
        }
        self
    }

    /// Move one place forward.
    pub fn move_next(&mut self) -> &mut Self {
        self.advance(1)
    }

    /// Move one place back.
    pub fn move_prev(&mut self) -> &mut Self {
        self.advance(-1)
    }

    fn invalidate(&mut self) {
        self.valid = false;
        self.offset = 0;
    }

    /// A read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, T, A> {
        if self.valid {
            Cursor::new(&*self.row, self.offset)
        } else {
            Cursor::invalid()
        }
    }

    /// Insert `value` at the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is invalid, otherwise as
    /// [`SlotRow::insert_at`].
    pub fn insert(&mut self, value: T) {
        self.assert_valid();
        self.row.insert_at(self.offset, value);
    }

    /// Fallible [`insert`](Self::insert).
    ///
    /// # Errors
    ///
    /// As [`SlotRow::try_insert_at`].
    pub fn try_insert(&mut self, value: T) -> Result<(), TryInsertError<T>> {
        self.assert_valid();
        self.row.try_insert_at(self.offset, value)
    }

    /// Remove the value under the cursor. `None` at the end or when
    /// invalid.
    pub fn remove_current(&mut self) -> Option<T> {
        if !self.valid || self.offset >= self.row.len() {
            return None;
        }
        Some(self.row.remove_at(self.offset))
    }

    /// Remove the values from the cursor up to (not including) offset
    /// `end`.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is invalid, otherwise as
    /// [`SlotRow::remove_range`].
    pub fn remove_until(&mut self, end: usize) {
        self.assert_valid();
        self.row.remove_range(self.offset..end);
    }

    fn assert_valid(&self) {
        assert!(self.valid, "edit through an invalidated cursor");
    }
}

impl<T, A: RawAlloc> fmt::Debug for CursorMut<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("offset", &self.offset)
            .field("valid", &self.valid)
            .finish()
    }
}
