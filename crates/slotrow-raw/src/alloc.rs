//! Pluggable allocation strategy.
//!
//! [`RawAlloc`] is the single seam through which a store acquires and
//! releases memory. [`Global`] forwards to the process-wide allocator;
//! test and embedding code can supply their own handle (counting,
//! budgeted, arena-backed) without touching the storage logic.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use log::trace;
use slotrow_core::{AllocError, StoreError};

/// A handle to an allocation strategy.
///
/// Handles are cloned whenever a store spawns a sibling block during
/// growth, so they should be cheap to clone (a unit struct or a shared
/// reference to the real allocator).
///
/// # Safety
///
/// Implementors must guarantee that a successful [`allocate`] returns a
/// pointer to a block that is valid for reads and writes of
/// `layout.size()` bytes, aligned to `layout.align()`, and not aliased by
/// any other live allocation until it is passed to [`deallocate`] — on
/// this handle or any clone of it — with the same layout.
///
/// Stores never request zero-sized layouts.
///
/// [`allocate`]: RawAlloc::allocate
/// [`deallocate`]: RawAlloc::deallocate
pub unsafe trait RawAlloc: Clone {
    /// Acquire a block for `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError`] if the request cannot be satisfied. The
    /// caller treats this as a recoverable condition.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block previously returned by [`allocate`](RawAlloc::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this handle (or a
    /// clone of it) with exactly `layout`, and must not be used afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// The process-wide allocator (`std::alloc`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Global;

// SAFETY: std::alloc::alloc returns a block satisfying `layout` or null;
// null is mapped to AllocError. dealloc receives the same layout.
unsafe impl RawAlloc for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Err(AllocError);
        }
        // SAFETY: layout has a non-zero size, checked above.
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(AllocError)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees ptr came from `allocate` with `layout`.
        unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
    }
}

/// Layout of `count` slots of `T`, or `None` when the block would be empty
/// (zero slots or a zero-sized `T`) and no memory needs to be acquired.
pub(crate) fn slots_layout<T>(count: usize) -> Result<Option<Layout>, StoreError> {
    let layout = Layout::array::<T>(count)
        .map_err(|_| StoreError::CapacityOverflow { requested: count })?;
    if layout.size() == 0 {
        Ok(None)
    } else {
        Ok(Some(layout))
    }
}

/// Acquire an uninitialised block of `count` slots of `T` from `alloc`.
///
/// Empty blocks (zero slots, or a zero-sized `T`) are represented by a
/// dangling, well-aligned pointer and never reach the strategy.
///
/// # Errors
///
/// [`StoreError::CapacityOverflow`] if the byte size is not representable,
/// [`StoreError::AllocFailed`] if the strategy refuses the request.
pub fn allocate_slots<T, A: RawAlloc>(alloc: &A, count: usize) -> Result<NonNull<T>, StoreError> {
    let Some(layout) = slots_layout::<T>(count)? else {
        return Ok(NonNull::dangling());
    };
    let ptr = alloc.allocate(layout).map_err(|_| StoreError::AllocFailed {
        bytes: layout.size(),
        align: layout.align(),
    })?;
    trace!("acquired block of {count} slots ({} bytes)", layout.size());
    Ok(ptr.cast())
}

/// Release a block of `count` slots previously acquired with
/// [`allocate_slots`].
///
/// # Safety
///
/// `ptr` must have been returned by `allocate_slots::<T>` on `alloc` (or a
/// clone of it) with the same `count`, and must not be used afterwards.
/// No live values may remain in the block.
pub unsafe fn deallocate_slots<T, A: RawAlloc>(alloc: &A, ptr: NonNull<T>, count: usize) {
    // The layout was representable when the block was acquired.
    let Ok(Some(layout)) = slots_layout::<T>(count) else {
        return;
    };
    // SAFETY: forwarded caller contract; the layout matches acquisition.
    unsafe { alloc.deallocate(ptr.cast(), layout) };
    trace!("released block of {count} slots ({} bytes)", layout.size());
}
