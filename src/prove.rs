//! Budgeted proof of single-output miters.
//!
//! [`MiterProver`] decides whether a miter is unsatisfiable (the compared circuits are equivalent),
//! satisfiable (a counterexample is attached to the returned network), or gives up once its
//! resource limits are exhausted. It never searches by itself: it sequences external engines
//! plugged in through the traits of [`engine`]:
//! - a [`SatEngine`] for brute-force SAT, mandatory
//! - a [`Rewriter`] for structural rewriting, refactoring and balancing
//! - a [`FraigEngine`] building functionally reduced AIGs
//! - a [`CollapseEngine`] collapsing the miter into a BDD as a last resort.
//!
//! Each escalation round runs SAT, then structural simplification, then fraiging, with limits
//! growing geometrically (see [`Escalation`]). Global limits on conflicts and inspects are
//! tracked by a [`ResourceLedger`] across the whole attempt.
//!
//! ```rust
//! use mutaig_prove::{Aig, Disposition, MiterProver, ProveParams, miter::Miter};
//! use mutaig_prove::prove::{SatEngine, SatStatus, SolveLimits, SolveOutcome};
//!
//! /// A solver only able to decide constant miters.
//! struct ConstantsOnly;
//!
//! impl SatEngine<Aig> for ConstantsOnly {
//!     fn solve(&mut self, miter: &Aig, _: SolveLimits) -> SolveOutcome {
//!         let status = match miter.constant_output() {
//!             Some(false) => SatStatus::Unsat,
//!             Some(true) => SatStatus::Sat(vec![false; miter.input_count()]),
//!             None => SatStatus::Timeout,
//!         };
//!         SolveOutcome { status, conflicts: 0, inspects: 0 }
//!     }
//! }
//!
//! let half_adder = "aag 7 2 0 2 3\n2\n4\n6\n12\n6 13 15\n12 2 4\n14 3 5\n";
//! let a = Aig::from_ascii(half_adder.as_bytes()).unwrap();
//! let miter = Miter::new(&a, &a).unwrap().into_aig();
//!
//! let params = ProveParams { use_fraiging: false, ..ProveParams::default() };
//! let proof = MiterProver::new(params, ConstantsOnly).prove(miter).unwrap();
//! assert_eq!(proof.disposition, Disposition::Unsatisfiable);
//! assert_eq!(proof.disposition.code(), 1);
//! ```

mod collapse;
pub mod engine;
mod fraig;
mod ledger;
mod orchestrator;
mod params;
mod phase;
mod report;
mod sat;
mod structural;
#[cfg(test)]
mod testing;

use thiserror::Error;

pub use collapse::CollapseFallback;
pub use engine::{
    CollapseEngine, CollapseLimits, FraigEngine, FraigParams, FraigRun, Network, Rewriter,
    SatEngine, SatStatus, SolveLimits, SolveOutcome,
};
pub use fraig::{FraigPhase, simulation_patterns, simulation_words};
pub use ledger::{Escalation, ResourceLedger, Usage};
pub use orchestrator::{Disposition, MiterProver, Proof};
pub use params::ProveParams;
pub use phase::{Attempt, Phase, Verdict};
pub use sat::SatPhase;
pub use structural::StructuralPhase;

/// Error returned when a network cannot be handed to the prover.
///
/// Running out of resources is not an error: it is reported as [`Disposition::Unknown`].
#[derive(Debug, Error)]
pub enum ProveError {
    /// The prover only handles miters with exactly one output.
    #[error("expected a miter with exactly one output, got {0}")]
    NotSingleOutput(usize),

    /// The network failed its structural integrity check.
    #[error("the network is not a valid structural AIG")]
    NotStructural,
}
