use serde::{Deserialize, Serialize};

/// Geometric escalation of an engine limit across iterations.
///
/// The limit at iteration `i` is `round(start * multiplier^i)`.
///
/// ```rust
/// use mutaig_prove::prove::Escalation;
/// let mitering = Escalation::new(5000, 2.0);
/// assert_eq!(mitering.limit(0), 5000);
/// assert_eq!(mitering.limit(3), 40000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    pub start: u64,
    pub multiplier: f64,
}

impl Escalation {
    pub fn new(start: u64, multiplier: f64) -> Self {
        Escalation { start, multiplier }
    }

    /// The limit granted at `iteration` (starting at 0). Never negative, saturates at `u64::MAX`.
    pub fn limit(&self, iteration: u32) -> u64 {
        let limit = self.start as f64 * self.multiplier.powf(f64::from(iteration));
        if limit.is_nan() || limit <= 0.0 {
            0
        } else {
            // `as` saturates on overflow
            limit.round() as u64
        }
    }
}

/// Effort reported by one engine invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub conflicts: u64,
    pub inspects: u64,
    /// Equivalence proofs the engine gave up on (fraiging only).
    pub sat_fails: u64,
}

/// Cumulative effort of one proof attempt, checked against the global limits.
///
/// A limit of 0 means no limit. Counters never decrease.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLedger {
    backtrack_limit: u64,
    inspect_limit: u64,
    backtracks_made: u64,
    inspects_made: u64,
    sat_fails: u64,
}

impl ResourceLedger {
    pub fn new(backtrack_limit: u64, inspect_limit: u64) -> Self {
        ResourceLedger {
            backtrack_limit,
            inspect_limit,
            ..ResourceLedger::default()
        }
    }

    /// Accounts for one engine invocation. Call it exactly once per invocation.
    pub fn charge(&mut self, usage: Usage) {
        self.backtracks_made = self.backtracks_made.saturating_add(usage.conflicts);
        self.inspects_made = self.inspects_made.saturating_add(usage.inspects);
        self.sat_fails = self.sat_fails.saturating_add(usage.sat_fails);
    }

    /// True once a configured global limit has been reached or exceeded.
    pub fn exhausted(&self) -> bool {
        (self.backtrack_limit != 0 && self.backtracks_made >= self.backtrack_limit)
            || (self.inspect_limit != 0 && self.inspects_made >= self.inspect_limit)
    }

    /// Inspects left before the global limit, or `None` if inspects are not limited.
    pub fn remaining_inspects(&self) -> Option<u64> {
        (self.inspect_limit != 0).then(|| self.inspect_limit.saturating_sub(self.inspects_made))
    }

    pub fn backtracks_made(&self) -> u64 {
        self.backtracks_made
    }

    pub fn inspects_made(&self) -> u64 {
        self.inspects_made
    }

    pub fn sat_fails(&self) -> u64 {
        self.sat_fails
    }
}
