//! Instrumented allocation strategies.

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;

use slotrow_core::AllocError;
use slotrow_raw::{Global, RawAlloc};

/// Block traffic observed by a [`CountingAlloc`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: u64,
    pub deallocations: u64,
    pub live_bytes: usize,
    pub peak_bytes: usize,
}

impl AllocStats {
    /// Blocks acquired and not yet released.
    pub fn live_blocks(&self) -> u64 {
        self.allocations - self.deallocations
    }
}

/// Forwards to [`Global`] and counts every call. Clones share counters.
#[derive(Clone, Debug, Default)]
pub struct CountingAlloc {
    stats: Rc<RefCell<AllocStats>>,
}

impl CountingAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> AllocStats {
        *self.stats.borrow()
    }
}

#[allow(unsafe_code)]
// SAFETY: every block comes from Global and is returned to it with the
// caller's layout; the counters do not touch the memory.
unsafe impl RawAlloc for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let ptr = Global.allocate(layout)?;
        let mut stats = self.stats.borrow_mut();
        stats.allocations += 1;
        stats.live_bytes += layout.size();
        stats.peak_bytes = stats.peak_bytes.max(stats.live_bytes);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract; `ptr` came from Global.
        unsafe { Global.deallocate(ptr, layout) };
        let mut stats = self.stats.borrow_mut();
        stats.deallocations += 1;
        stats.live_bytes -= layout.size();
    }
}

/// Succeeds for a fixed number of allocations, then refuses every
/// request. Clones share the budget.
#[derive(Clone, Debug)]
pub struct BudgetAlloc {
    remaining: Rc<Cell<usize>>,
    inner: CountingAlloc,
}

impl BudgetAlloc {
    /// Allow `budget` successful allocations.
    pub fn new(budget: usize) -> Self {
        Self {
            remaining: Rc::new(Cell::new(budget)),
            inner: CountingAlloc::new(),
        }
    }

    /// Allocations still allowed.
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    /// Reset the number of allocations still allowed.
    pub fn set_budget(&self, budget: usize) {
        self.remaining.set(budget);
    }

    pub fn stats(&self) -> AllocStats {
        self.inner.stats()
    }
}

#[allow(unsafe_code)]
// SAFETY: successful requests are served by CountingAlloc (hence Global)
// and released to it; refused requests hand out no pointer.
unsafe impl RawAlloc for BudgetAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let remaining = self.remaining.get();
        if remaining == 0 {
            return Err(AllocError);
        }
        let ptr = self.inner.allocate(layout)?;
        self.remaining.set(remaining - 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.deallocate(ptr, layout) };
    }
}
