//! Growth counters for a row.
//!
//! [`RowMetrics`] records how often a row replaced its storage block and
//! how much work that cost, so callers can check whether a workload would
//! benefit from pre-sizing.

/// Counters accumulated over the lifetime of a row.
///
/// All counters are cumulative since construction or the last reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowMetrics {
    /// Number of times the storage block was replaced by a larger one.
    pub growth_events: u64,
    /// Total number of elements moved into a new block during growth.
    pub relocated_elements: u64,
    /// Largest capacity the row has held.
    pub peak_capacity: usize,
    /// Number of growth attempts that failed (allocation refused or
    /// capacity limit reached).
    pub failed_growths: u64,
}

impl RowMetrics {
    /// Record a successful growth to `to` slots that moved `relocated`
    /// elements.
    pub fn record_growth(&mut self, to: usize, relocated: usize) {
        self.growth_events += 1;
        self.relocated_elements += relocated as u64;
        self.observe_capacity(to);
    }

    /// Record a growth attempt that left the row unchanged.
    pub fn record_failed_growth(&mut self) {
        self.failed_growths += 1;
    }

    /// Raise `peak_capacity` to `capacity` if it is larger.
    pub fn observe_capacity(&mut self, capacity: usize) {
        self.peak_capacity = self.peak_capacity.max(capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RowMetrics::default();
        assert_eq!(m.growth_events, 0);
        assert_eq!(m.relocated_elements, 0);
        assert_eq!(m.peak_capacity, 0);
        assert_eq!(m.failed_growths, 0);
    }

    #[test]
    fn growth_accumulates() {
        let mut m = RowMetrics::default();
        m.record_growth(1, 0);
        m.record_growth(2, 1);
        m.record_growth(4, 2);
        assert_eq!(m.growth_events, 3);
        assert_eq!(m.relocated_elements, 3);
        assert_eq!(m.peak_capacity, 4);
    }

    #[test]
    fn peak_never_decreases() {
        let mut m = RowMetrics::default();
        m.observe_capacity(8);
        m.observe_capacity(2);
        assert_eq!(m.peak_capacity, 8);
    }
}
