//! Values that count their own lifecycle.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::IndexMap;

#[derive(Default)]
struct LedgerState {
    next_id: u64,
    constructed: u64,
    cloned: u64,
    dropped: u64,
    double_drops: u64,
    /// Live instances by id, in construction order.
    live: IndexMap<u64, i64>,
}

/// Shared record of every [`Tracked`] value created from it.
///
/// Cloning a ledger yields another handle to the same record.
#[derive(Clone, Default)]
pub struct Ledger {
    state: Rc<RefCell<LedgerState>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracked value carrying `value`.
    pub fn track(&self, value: i64) -> Tracked {
        let id = self.register(value);
        Tracked {
            id,
            value,
            ledger: self.clone(),
        }
    }

    /// Tracked values for each of `values`, in order.
    pub fn track_all(&self, values: impl IntoIterator<Item = i64>) -> Vec<Tracked> {
        values.into_iter().map(|v| self.track(v)).collect()
    }

    fn register(&self, value: i64) -> u64 {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.constructed += 1;
        state.live.insert(id, value);
        id
    }

    fn release(&self, id: u64) {
        let mut state = self.state.borrow_mut();
        state.dropped += 1;
        if state.live.shift_remove(&id).is_none() {
            state.double_drops += 1;
        }
    }

    /// Total constructions, clones included.
    pub fn constructed(&self) -> u64 {
        self.state.borrow().constructed
    }

    /// Constructions that were clones of another tracked value.
    pub fn cloned(&self) -> u64 {
        self.state.borrow().cloned
    }

    /// Total destructions.
    pub fn dropped(&self) -> u64 {
        self.state.borrow().dropped
    }

    /// Destructions of an instance that was already destroyed.
    pub fn double_drops(&self) -> u64 {
        self.state.borrow().double_drops
    }

    /// Number of instances not yet destroyed.
    pub fn live(&self) -> usize {
        self.state.borrow().live.len()
    }

    /// Payloads of the live instances, oldest first.
    pub fn live_values(&self) -> Vec<i64> {
        self.state.borrow().live.values().copied().collect()
    }

    /// Whether every constructed instance was destroyed exactly once.
    pub fn is_balanced(&self) -> bool {
        let state = self.state.borrow();
        state.double_drops == 0 && state.live.is_empty() && state.constructed == state.dropped
    }

    /// Panic with the ledger's counts unless it is balanced.
    #[track_caller]
    pub fn assert_balanced(&self) {
        assert!(self.is_balanced(), "unbalanced lifecycle: {self:?}");
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Ledger")
            .field("constructed", &state.constructed)
            .field("cloned", &state.cloned)
            .field("dropped", &state.dropped)
            .field("double_drops", &state.double_drops)
            .field("live", &state.live.len())
            .finish()
    }
}

/// An `i64` payload whose constructions and destructions are counted.
///
/// Equality, ordering and hashing look at the payload only.
pub struct Tracked {
    id: u64,
    value: i64,
    ledger: Ledger,
}

impl Tracked {
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        self.ledger.state.borrow_mut().cloned += 1;
        self.ledger.track(self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.ledger.release(self.id);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Tracked {}

impl PartialEq<i64> for Tracked {
    fn eq(&self, other: &i64) -> bool {
        self.value == *other
    }
}

impl PartialOrd for Tracked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tracked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for Tracked {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}
