//! Interfaces of the engines sequenced by [`crate::MiterProver`].
//!
//! The prover owns the network it works on and moves it through the engines: every engine that
//! transforms the network consumes it and hands back its replacement.

use std::time::Duration;

use crate::Aig;

use super::Verdict;

/// A combinational network the prover can work on.
pub trait Network {
    /// Number of internal (AND) nodes.
    fn node_count(&self) -> usize;
    fn input_count(&self) -> usize;
    fn output_count(&self) -> usize;
    /// Number of logic levels between the inputs and the outputs.
    fn level_count(&self) -> usize;
    /// True if the network is a well-formed structural AIG.
    fn is_structural(&self) -> bool;
    /// Value of the sole output if it is driven by a constant.
    fn constant_output(&self) -> Option<bool>;
    /// Counterexample attached to the network, one value per input.
    fn model(&self) -> Option<&[bool]>;
    fn set_model(&mut self, model: Vec<bool>);
    fn clear_model(&mut self);
}

impl Network for Aig {
    fn node_count(&self) -> usize {
        self.and_count()
    }

    fn input_count(&self) -> usize {
        Aig::input_count(self)
    }

    fn output_count(&self) -> usize {
        Aig::output_count(self)
    }

    fn level_count(&self) -> usize {
        // A cyclic graph is rejected before any level is reported.
        Aig::level_count(self).unwrap_or(0)
    }

    fn is_structural(&self) -> bool {
        self.check_integrity().is_ok()
    }

    fn constant_output(&self) -> Option<bool> {
        Aig::constant_output(self)
    }

    fn model(&self) -> Option<&[bool]> {
        Aig::model(self)
    }

    fn set_model(&mut self, model: Vec<bool>) {
        Aig::set_model(self, model)
    }

    fn clear_model(&mut self) {
        Aig::clear_model(self)
    }
}

/// Answer of a bounded SAT call on a miter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SatStatus {
    /// The miter output can be true, with one value per input.
    Sat(Vec<bool>),
    Unsat,
    /// A limit was reached first.
    Timeout,
}

impl SatStatus {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            SatStatus::Sat(_) => Some(Verdict::Satisfiable),
            SatStatus::Unsat => Some(Verdict::Unsatisfiable),
            SatStatus::Timeout => None,
        }
    }
}

/// Limits of one SAT call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolveLimits {
    /// Conflict limit, 0 for none.
    pub conflicts: u64,
    /// Inspect limit, `None` for none.
    pub inspects: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub status: SatStatus,
    /// Conflicts spent by the call.
    pub conflicts: u64,
    /// Inspects spent by the call.
    pub inspects: u64,
}

/// Brute-force SAT solving of a single-output miter.
pub trait SatEngine<N> {
    fn solve(&mut self, network: &N, limits: SolveLimits) -> SolveOutcome;
}

/// Structural transformations. None of them may change the function of the network.
pub trait Rewriter<N> {
    fn rewrite(&mut self, network: N) -> N;
    fn refactor(&mut self, network: N) -> N;
    fn balance(&mut self, network: N) -> N;
}

/// Configuration of one fraiging run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FraigParams {
    /// Patterns of random simulation.
    pub pats_rand: usize,
    /// Patterns of dynamic simulation.
    pub pats_dyna: usize,
    /// Conflict limit of every equivalence proof, 0 for none.
    pub bt_limit: u64,
    /// Inspect limit of the whole run, `None` for none.
    pub inspect_limit: Option<u64>,
    pub time_limit: Option<Duration>,
    /// Try to prove the miter output once the network is reduced.
    pub try_prove: bool,
    /// Look for sparse functions during simulation.
    pub do_sparse: bool,
    pub verbose: bool,
}

/// Result of one fraiging run.
#[derive(Debug)]
pub struct FraigRun<N> {
    /// The reduced network.
    pub network: N,
    /// [`SatStatus::Timeout`] if the miter output was not decided. A model refers to the inputs
    /// of the reduced network.
    pub status: SatStatus,
    /// Equivalence proofs given up on.
    pub sat_fails: u64,
    pub conflicts: u64,
    pub inspects: u64,
}

/// Construction of functionally reduced AIGs.
pub trait FraigEngine<N> {
    fn fraig(&mut self, network: N, params: &FraigParams) -> FraigRun<N>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseLimits {
    /// Maximum number of BDD nodes.
    pub size_limit: usize,
    /// Reorder variables during construction.
    pub reorder: bool,
}

/// Collapse of a network into the BDD of its output.
pub trait CollapseEngine<N> {
    /// Returns the collapsed network, or `None` if the BDD grew beyond the size limit.
    fn collapse(&mut self, network: &N, limits: &CollapseLimits) -> Option<N>;

    /// True if the function of the sole node of a collapsed network is constant false.
    fn is_logic_zero(&self, network: &N) -> bool;
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AigEdge, AigNode};

    #[test]
    fn sat_status_verdict_test() {
        assert_eq!(
            SatStatus::Sat(vec![true]).verdict(),
            Some(Verdict::Satisfiable)
        );
        assert_eq!(SatStatus::Unsat.verdict(), Some(Verdict::Unsatisfiable));
        assert_eq!(SatStatus::Timeout.verdict(), None);
    }

    #[test]
    fn aig_network_test() {
        let mut aig = Aig::new();
        let i1 = aig.add_node(AigNode::Input(1)).unwrap();
        let i2 = aig.add_node(AigNode::Input(2)).unwrap();
        let a3 = aig
            .new_and(3, AigEdge::new(i1.clone(), false), AigEdge::new(i2, true))
            .unwrap();
        aig.new_and(4, AigEdge::new(a3, false), AigEdge::new(i1, false))
            .unwrap();
        aig.add_output(4, true).unwrap();
        aig.update();

        assert_eq!(Network::node_count(&aig), 2);
        assert_eq!(Network::input_count(&aig), 2);
        assert_eq!(Network::output_count(&aig), 1);
        assert_eq!(Network::level_count(&aig), 2);
        assert!(aig.is_structural());
        assert_eq!(Network::constant_output(&aig), None);

        assert_eq!(Network::model(&aig), None);
        Network::set_model(&mut aig, vec![true, false]);
        assert_eq!(Network::model(&aig), Some(&[true, false][..]));
        Network::clear_model(&mut aig);
        assert_eq!(Network::model(&aig), None);
    }
}
