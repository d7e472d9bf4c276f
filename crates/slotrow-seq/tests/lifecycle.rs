//! Integration test: value lifecycle and allocation failure.
//!
//! Every value a row constructs must be destroyed exactly once, whatever
//! sequence of operations ran. A growth step that cannot acquire its new
//! block must leave the row exactly as it was.

use slotrow_core::{RowConfig, StoreError};
use slotrow_seq::SlotRow;
use slotrow_test_utils::{BudgetAlloc, CountingAlloc, Ledger, Tracked};

#[test]
fn mixed_operations_balance() {
    let ledger = Ledger::new();
    {
        let mut row: SlotRow<Tracked> = SlotRow::new();
        for v in 0..20 {
            row.append(ledger.track(v));
        }
        row.insert_at(3, ledger.track(100));
        row.insert_at(row.len(), ledger.track(101));
        drop(row.remove_at(0));
        row.remove_range(2..7);
        row.append_clone(&ledger.track(102));
        let popped = row.pop();
        assert_eq!(popped.as_ref().map(Tracked::value), Some(102));
        row.retain(|t| t.value() % 2 == 0);

        let copy = row.clone();
        assert_eq!(copy, row);
        let moved = row.take();
        assert_eq!(moved, copy);
        row.append(ledger.track(-1));
        row.clear();
        assert_eq!(ledger.live(), moved.len() + copy.len() + 1);
    }
    assert_eq!(ledger.double_drops(), 0);
    ledger.assert_balanced();
}

#[test]
fn relocation_neither_clones_nor_drops() {
    let ledger = Ledger::new();
    let mut row: SlotRow<Tracked> = SlotRow::new();
    for v in 0..33 {
        row.append(ledger.track(v));
    }
    row.insert_at(0, ledger.track(-1));
    assert_eq!(row.metrics().growth_events, 7);
    assert_eq!(ledger.constructed(), 34);
    assert_eq!(ledger.cloned(), 0);
    assert_eq!(ledger.dropped(), 0);
    drop(row);
    ledger.assert_balanced();
}

#[test]
fn clone_constructs_each_value_once() {
    let ledger = Ledger::new();
    let row: SlotRow<Tracked> = ledger.track_all(0..5).into();
    let copy = row.clone();
    assert_eq!(ledger.cloned(), 5);
    assert_eq!(copy.capacity(), 5);
    drop(row);
    assert_eq!(ledger.live_values(), vec![0, 1, 2, 3, 4]);
    drop(copy);
    ledger.assert_balanced();
}

#[test]
fn partially_consumed_into_iter_balances() {
    let ledger = Ledger::new();
    let row: SlotRow<Tracked> = ledger.track_all(0..8).into();
    let mut iter = row.into_iter();
    let first = iter.next();
    let last = iter.next_back();
    assert_eq!(first.map(|t| t.value()), Some(0));
    assert_eq!(last.map(|t| t.value()), Some(7));
    drop(iter);
    ledger.assert_balanced();
}

#[test]
fn panicking_retain_destroys_each_value_once() {
    let ledger = Ledger::new();
    let mut row: SlotRow<Tracked> = ledger.track_all(0..10).into();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        row.retain(|t| {
            assert_ne!(t.value(), 5, "predicate refused 5");
            t.value() % 2 == 0
        });
    }));
    assert!(result.is_err());
    assert_eq!(
        row.iter().map(Tracked::value).collect::<Vec<_>>(),
        [0, 2, 4, 5, 6, 7, 8, 9]
    );
    assert_eq!(ledger.dropped(), 2);
    assert_eq!(ledger.double_drops(), 0);
    drop(row);
    ledger.assert_balanced();
}

#[test]
fn refused_growth_leaves_row_unchanged() {
    let ledger = Ledger::new();
    let alloc = BudgetAlloc::new(3);
    let mut row = SlotRow::new_in(alloc.clone());
    for v in 0..4 {
        row.append(ledger.track(v));
    }
    // Blocks of 1, 2 and 4 slots used the whole budget.
    assert_eq!(alloc.remaining(), 0);
    let before: Vec<i64> = row.iter().map(Tracked::value).collect();

    let err = row.try_append(ledger.track(4)).unwrap_err();
    assert!(matches!(err.error, StoreError::AllocFailed { .. }));
    assert_eq!(err.into_inner().value(), 4);

    let err = row.try_insert_at(1, ledger.track(5)).unwrap_err();
    assert_eq!(err.value.value(), 5);
    drop(err);

    assert!(row.try_reserve(10).is_err());
    assert_eq!(row.iter().map(Tracked::value).collect::<Vec<_>>(), before);
    assert_eq!(row.capacity(), 4);
    assert_eq!(row.metrics().failed_growths, 3);
    assert_eq!(alloc.stats().live_blocks(), 1);

    // With budget restored the same insert succeeds.
    alloc.set_budget(1);
    row.insert_at(1, ledger.track(5));
    assert_eq!(row.len(), 5);
    assert_eq!(row[1].value(), 5);

    drop(row);
    ledger.assert_balanced();
    assert_eq!(alloc.stats().live_blocks(), 0);
}

#[test]
fn capacity_limit_refuses_growth() {
    let ledger = Ledger::new();
    let config = RowConfig::new().with_max_capacity(5);
    let mut row = SlotRow::with_config(&config).unwrap();
    for v in 0..5 {
        row.append(ledger.track(v));
    }
    assert_eq!(row.capacity(), 5);
    let err = row.try_insert_at(2, ledger.track(9)).unwrap_err();
    assert_eq!(
        err.error,
        StoreError::CapacityLimit {
            requested: 6,
            limit: 5
        }
    );
    drop(err);
    assert_eq!(row.len(), 5);
    drop(row);
    ledger.assert_balanced();
}

#[test]
fn every_block_is_released() {
    let alloc = CountingAlloc::new();
    {
        let mut row = SlotRow::new_in(alloc.clone());
        for v in 0..100u64 {
            row.append(v);
        }
        let copy = row.clone();
        let mut moved = row.take();
        moved.clear();
        assert_eq!(copy.len(), 100);
        // Blocks 1, 2, 4, ..., 128 plus one exact-size copy.
        assert_eq!(alloc.stats().allocations, 9);
        assert_eq!(alloc.stats().live_blocks(), 2);
    }
    let stats = alloc.stats();
    assert_eq!(stats.live_blocks(), 0);
    assert_eq!(stats.live_bytes, 0);
    // Peak: the 128-slot block and the copy, both alive.
    assert_eq!(stats.peak_bytes, (128 + 100) * 8);
}

#[test]
fn zero_sized_values_never_allocate() {
    let alloc = CountingAlloc::new();
    let mut row = SlotRow::new_in(alloc.clone());
    for _ in 0..50 {
        row.append(());
    }
    row.insert_at(10, ());
    row.remove_range(0..25);
    assert_eq!(row.len(), 26);
    assert_eq!(row.capacity(), 64);
    assert_eq!(alloc.stats().allocations, 0);
}
