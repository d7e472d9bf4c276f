//! The raw storage manager.
//!
//! [`RawStore`] separates memory acquisition from value lifetime. Slots
//! `[0, len)` hold live values; slots `[len, capacity)` are uninitialised
//! and are never read or dropped. Every operation that adds a value writes
//! exactly one slot and bumps `len` only after the write, so a panic in a
//! caller-supplied `Clone` never leaves a half-constructed slot counted
//! as live.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

use slotrow_core::StoreError;

use crate::alloc::{allocate_slots, deallocate_slots, Global, RawAlloc};
use crate::into_iter::RawIntoIter;

/// Outcome of a growth step: the block was replaced by a larger one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Growth {
    /// Capacity of the block that was released.
    pub from: usize,
    /// Capacity of the block now in use.
    pub to: usize,
    /// Number of live values moved into the new block.
    pub relocated: usize,
}

/// An owned block of element slots with a contiguous live prefix.
///
/// A store must be emptied (via [`destroy_range`](Self::destroy_range) or
/// [`destroy_all`](Self::destroy_all)) before it is dropped; dropping a
/// store that still holds live values is a programming error and panics
/// in debug builds, unless the thread is already unwinding. Otherwise the
/// stragglers are destroyed rather than leaked.
pub struct RawStore<T, A: RawAlloc = Global> {
    /// Start of the block. Dangling when nothing is allocated.
    ptr: NonNull<T>,
    /// Number of slots in the block.
    capacity: usize,
    /// Number of live values, always occupying `[0, len)`.
    len: usize,
    /// Growth ceiling in slots. Inherited by siblings.
    max_capacity: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

// SAFETY: RawStore owns its values exclusively; sending it sends the values.
unsafe impl<T: Send, A: RawAlloc + Send> Send for RawStore<T, A> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, A: RawAlloc + Sync> Sync for RawStore<T, A> {}

impl<T> RawStore<T, Global> {
    /// Create an empty store with no block, using the global allocator.
    pub const fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create a store with room for `capacity` values, using the global
    /// allocator.
    ///
    /// # Errors
    ///
    /// See [`with_capacity_in`](Self::with_capacity_in).
    pub fn with_capacity(capacity: usize) -> Result<Self, StoreError> {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<T> Default for RawStore<T, Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, A: RawAlloc> RawStore<T, A> {
    /// Create an empty store with no block. Never touches `alloc`.
    pub const fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            len: 0,
            max_capacity: usize::MAX,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Create a store with an uninitialised block of `capacity` slots.
    ///
    /// No value is constructed. `capacity == 0` acquires nothing.
    ///
    /// # Errors
    ///
    /// [`StoreError::CapacityOverflow`] if the block size is not
    /// representable, [`StoreError::AllocFailed`] if `alloc` refuses.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, StoreError> {
        let ptr = allocate_slots::<T, A>(&alloc, capacity)?;
        Ok(Self {
            ptr,
            capacity,
            len: 0,
            max_capacity: usize::MAX,
            alloc,
            _marker: PhantomData,
        })
    }

    /// Create an empty store of `capacity` slots sharing this store's
    /// allocation strategy and growth ceiling.
    ///
    /// # Errors
    ///
    /// See [`with_capacity_in`](Self::with_capacity_in).
    pub fn sibling(&self, capacity: usize) -> Result<Self, StoreError> {
        let mut store = Self::with_capacity_in(capacity, self.alloc.clone())?;
        store.max_capacity = self.max_capacity;
        Ok(store)
    }

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no slot holds a live value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the block.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of uninitialised slots after the live range.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.capacity - self.len
    }

    /// Whether at least one more value fits without growing.
    #[inline]
    pub fn has_free_space(&self) -> bool {
        self.len < self.capacity
    }

    /// Growth ceiling in slots (`usize::MAX` when unbounded).
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Set the growth ceiling.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is below the current capacity.
    pub fn set_max_capacity(&mut self, limit: usize) {
        assert!(
            limit >= self.capacity,
            "max_capacity {limit} is below current capacity {}",
            self.capacity
        );
        self.max_capacity = limit;
    }

    /// The allocation strategy handle.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Capacity the next growth step would allocate: `max(2 × capacity, 1)`,
    /// clamped to the growth ceiling.
    ///
    /// # Errors
    ///
    /// [`StoreError::CapacityLimit`] if the store is already at its
    /// ceiling, [`StoreError::CapacityOverflow`] if one more slot is not
    /// representable.
    pub fn next_capacity(&self) -> Result<usize, StoreError> {
        let needed = self
            .capacity
            .checked_add(1)
            .ok_or(StoreError::CapacityOverflow {
                requested: usize::MAX,
            })?;
        if needed > self.max_capacity {
            return Err(StoreError::CapacityLimit {
                requested: needed,
                limit: self.max_capacity,
            });
        }
        let doubled = self.capacity.saturating_mul(2).max(1);
        Ok(doubled.min(self.max_capacity))
    }

    /// Make sure at least one slot is free, growing if necessary.
    ///
    /// Growth allocates a sibling of [`next_capacity`](Self::next_capacity)
    /// slots, relocates every live value into it, swaps it in and releases
    /// the old (now empty) block. Returns `Ok(None)` when no growth was
    /// needed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`next_capacity`](Self::next_capacity) and
    /// block acquisition. On error the store is unchanged.
    pub fn ensure_free_space(&mut self) -> Result<Option<Growth>, StoreError> {
        if self.has_free_space() {
            return Ok(None);
        }
        let to = self.next_capacity()?;
        let mut fresh = self.sibling(to)?;
        let relocated = self.len;
        fresh.relocate_all_from(self);
        self.swap_with(&mut fresh);
        Ok(Some(Growth {
            from: fresh.capacity,
            to,
            relocated,
        }))
    }

    /// Address of slot `index`.
    ///
    /// The pointer may only be read through if `index < len()`, and only
    /// written through (without dropping) if `len() <= index < capacity()`.
    /// Debug builds check that the slot lies inside the owned block.
    #[inline]
    pub fn slot_ptr(&self, index: usize) -> *const T {
        let slot = self.ptr.as_ptr().wrapping_add(index);
        debug_assert!(
            index < self.capacity && self.is_owned_addr(slot),
            "slot {index} outside block of {} slots",
            self.capacity
        );
        slot
    }

    /// Mutable address of slot `index`. Same contract as
    /// [`slot_ptr`](Self::slot_ptr).
    #[inline]
    pub fn slot_ptr_mut(&mut self, index: usize) -> *mut T {
        let slot = self.ptr.as_ptr().wrapping_add(index);
        debug_assert!(
            index < self.capacity && self.is_owned_addr(slot),
            "slot {index} outside block of {} slots",
            self.capacity
        );
        slot
    }

    /// Whether `addr` points at a whole slot inside the owned block.
    pub fn is_owned_addr(&self, addr: *const T) -> bool {
        let start = self.ptr.as_ptr().addr();
        let end = start + self.capacity * mem::size_of::<T>();
        let addr = addr.addr();
        start <= addr && addr + mem::size_of::<T>() <= end
    }

    /// Move `value` into the first free slot.
    ///
    /// # Panics
    ///
    /// Panics if the store has no free slot.
    pub fn construct(&mut self, value: T) {
        assert!(self.has_free_space(), "construct into a full store");
        let slot = self.slot_ptr_mut(self.len);
        // SAFETY: slot `len` is inside the block (checked above) and
        // uninitialised, so writing does not overwrite a live value.
        unsafe { ptr::write(slot, value) };
        self.len += 1;
    }

    /// Clone `source` into the first free slot.
    ///
    /// # Panics
    ///
    /// Panics if the store has no free slot, or if `T::clone` panics (in
    /// which case the store is unchanged).
    pub fn construct_clone(&mut self, source: &T)
    where
        T: Clone,
    {
        assert!(self.has_free_space(), "construct into a full store");
        let value = source.clone();
        self.construct(value);
    }

    /// Bitwise-copy `source` into the free slots after the live range.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `source.len()` slots are free.
    pub fn extend_copied(&mut self, source: &[T])
    where
        T: Copy,
    {
        assert!(
            source.len() <= self.free_slots(),
            "{} values do not fit in {} free slots",
            source.len(),
            self.free_slots()
        );
        if source.is_empty() {
            return;
        }
        let dst = self.slot_ptr_mut(self.len);
        // SAFETY: `source.len()` slots starting at `len` are inside the
        // block and uninitialised. `source` cannot alias them because it
        // is a shared borrow while `self` is borrowed mutably. T: Copy, so
        // a byte copy is a valid construction.
        unsafe { ptr::copy_nonoverlapping(source.as_ptr(), dst, source.len()) };
        self.len += source.len();
    }

    /// Destroy the live values in `[from, to)`.
    ///
    /// The range must be a suffix of the live range (`to == len()`) so the
    /// remaining values stay contiguous. `from == to` is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `from > to`, `to > len()`, or a non-empty range does not
    /// end at `len()`.
    pub fn destroy_range(&mut self, from: usize, to: usize) {
        assert!(from <= to, "malformed range: {from} > {to}");
        assert!(to <= self.len, "range end {to} past live length {}", self.len);
        if from == to {
            return;
        }
        assert_eq!(
            to, self.len,
            "only a suffix of the live range can be destroyed"
        );
        let count = to - from;
        // Shrink first: if a destructor panics the slots are already
        // accounted as dead and are not dropped again.
        self.len = from;
        if mem::needs_drop::<T>() {
            let first = self.slot_ptr_mut(from);
            // SAFETY: [from, from + count) were live and are now outside
            // the live range, so each value is dropped exactly once.
            unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, count)) };
        }
    }

    /// Destroy every live value. Capacity is kept.
    pub fn destroy_all(&mut self) {
        self.destroy_range(0, self.len);
    }

    /// Move the last live value out of the store.
    pub fn take_last(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let slot = self.slot_ptr(self.len);
        // SAFETY: slot `len` held a live value and is now outside the live
        // range, so it is read exactly once.
        Some(unsafe { ptr::read(slot) })
    }

    /// Move every live value of `other` into this store at the same
    /// indices. `other` is left empty, with its block still allocated.
    ///
    /// # Panics
    ///
    /// Panics if this store is not empty or cannot hold `other.len()` values.
    pub fn relocate_all_from(&mut self, other: &mut Self) {
        assert!(self.is_empty(), "relocation target must be empty");
        assert!(
            other.len <= self.capacity,
            "{} values do not fit in {} slots",
            other.len,
            self.capacity
        );
        let count = other.len;
        other.len = 0;
        // SAFETY: the two blocks are distinct allocations (both borrowed
        // mutably). `count` live values are read from `other` and written
        // into uninitialised slots of `self`; `other` no longer counts
        // them, so each value has exactly one owner afterwards.
        unsafe { ptr::copy_nonoverlapping(other.ptr.as_ptr(), self.ptr.as_ptr(), count) };
        self.len = count;
    }

    /// Move every live value of `other` into this store, placing `value`
    /// at `index` and shifting `other[index..]` one slot up. Every
    /// destination slot is written exactly once.
    ///
    /// # Panics
    ///
    /// Panics if this store is not empty, `index > other.len()`, or this
    /// store cannot hold `other.len() + 1` values.
    pub fn relocate_inserting_from(&mut self, other: &mut Self, index: usize, value: T) {
        assert!(self.is_empty(), "relocation target must be empty");
        assert!(
            index <= other.len,
            "insertion index {index} past length {}",
            other.len
        );
        assert!(
            other.len < self.capacity,
            "{} values do not fit in {} slots",
            other.len + 1,
            self.capacity
        );
        let count = other.len;
        let src = other.ptr.as_ptr();
        let dst = self.ptr.as_ptr();
        other.len = 0;
        // SAFETY: distinct blocks; `src[..count]` are live and are moved
        // exactly once into `dst[..index]` and `dst[index + 1..=count]`,
        // all inside `self`'s block (count < capacity). `dst[index]` is
        // uninitialised until `value` is written.
        unsafe {
            ptr::copy_nonoverlapping(src, dst, index);
            ptr::write(dst.add(index), value);
            ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), count - index);
        }
        self.len = count + 1;
    }

    /// Exchange blocks, capacities, live counts, ceilings and allocation
    /// handles with `other`. O(1); no value is touched.
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// The live values as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) are live; ptr is non-null and aligned even when
        // dangling (len is then 0).
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The live values as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Turn the store into an iterator that moves each live value out.
    pub fn into_values(mut self) -> RawIntoIter<T, A> {
        let len = self.len;
        // The iterator takes over ownership of [0, len).
        self.len = 0;
        RawIntoIter::new(self, len)
    }

    /// Read slot `index` out, leaving it logically uninitialised.
    ///
    /// # Safety
    ///
    /// `index` must hold a live value that the caller has already removed
    /// from the store's bookkeeping, and must not be read again.
    pub(crate) unsafe fn read_slot(&self, index: usize) -> T {
        // SAFETY: forwarded caller contract.
        unsafe { ptr::read(self.slot_ptr(index)) }
    }

    /// Drop the values in `[from, to)` that the caller owns outside the
    /// store's bookkeeping.
    ///
    /// # Safety
    ///
    /// The slots must hold live values not counted in `len` and not
    /// dropped or read elsewhere.
    pub(crate) unsafe fn drop_detached(&mut self, from: usize, to: usize) {
        if from == to || !mem::needs_drop::<T>() {
            return;
        }
        let first = self.slot_ptr_mut(from);
        // SAFETY: forwarded caller contract.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(first, to - from)) };
    }

    fn release(&mut self) {
        if self.capacity == 0 {
            return;
        }
        // SAFETY: ptr/capacity came from allocate_slots on this handle (or
        // a clone, via swap) and no live value remains.
        unsafe { deallocate_slots(&self.alloc, self.ptr, self.capacity) };
        self.ptr = NonNull::dangling();
        self.capacity = 0;
    }
}

impl<T, A: RawAlloc> Drop for RawStore<T, A> {
    fn drop(&mut self) {
        // A second panic while unwinding would abort the process.
        if !std::thread::panicking() {
            debug_assert_eq!(
                self.len, 0,
                "RawStore dropped with {} live elements",
                self.len
            );
        }
        if self.len != 0 {
            self.destroy_all();
        }
        self.release();
    }
}

impl<T, A: RawAlloc> std::fmt::Debug for RawStore<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawStore")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}
