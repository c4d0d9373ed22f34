use serde::{Deserialize, Serialize};

use super::{CollapseLimits, Escalation};

/// Parameters of one proof attempt.
///
/// Conflict limits of 0 mean "no limit", as do global limits of 0.
/// Missing fields take their default value when deserializing, so a configuration file only
/// needs to mention what it overrides:
///
/// ```rust
/// use mutaig_prove::ProveParams;
/// let params: ProveParams = serde_json::from_str(r#"{ "iterations": 2 }"#).unwrap();
/// assert_eq!(params.iterations, 2);
/// assert!(params.use_fraiging);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProveParams {
    /// Number of escalation rounds before falling back to BDDs and a last SAT call.
    pub iterations: u32,
    pub use_rewriting: bool,
    pub use_fraiging: bool,
    pub use_bdds: bool,
    /// Conflict limit of the SAT call of each round.
    pub mitering: Escalation,
    /// Number of structural passes of each round.
    pub rewriting: Escalation,
    /// Backtrack limit of the fraiging of each round.
    pub fraiging: Escalation,
    /// Conflict limit of the last resort SAT call.
    pub mitering_last: u64,
    /// Conflicts allowed across the whole attempt.
    pub total_backtrack_limit: u64,
    /// Inspects allowed across the whole attempt.
    pub total_inspect_limit: u64,
    pub bdd_size_limit: usize,
    pub bdd_reorder: bool,
    /// Report every phase at `info` level instead of `debug`.
    pub verbose: bool,
}

impl Default for ProveParams {
    fn default() -> Self {
        ProveParams {
            iterations: 6,
            use_rewriting: true,
            use_fraiging: true,
            use_bdds: false,
            mitering: Escalation::new(5000, 2.0),
            rewriting: Escalation::new(3, 1.0),
            fraiging: Escalation::new(2, 8.0),
            mitering_last: 0,
            total_backtrack_limit: 0,
            total_inspect_limit: 0,
            bdd_size_limit: 1_000_000,
            bdd_reorder: true,
            verbose: false,
        }
    }
}

impl ProveParams {
    pub fn collapse_limits(&self) -> CollapseLimits {
        CollapseLimits {
            size_limit: self.bdd_size_limit,
            reorder: self.bdd_reorder,
        }
    }
}
