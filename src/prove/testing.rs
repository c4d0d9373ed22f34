//! Scripted engines recording their calls, for the prover tests.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use crate::{Aig, AigEdge, AigNode};

use super::{
    CollapseEngine, CollapseLimits, FraigEngine, FraigParams, FraigRun, Rewriter, SatEngine,
    SatStatus, SolveLimits, SolveOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Sat {
        conflicts: u64,
        inspects: Option<u64>,
    },
    Rewrite,
    Refactor,
    Balance,
    Fraig {
        bt_limit: u64,
        inspect_limit: Option<u64>,
        pats_rand: usize,
    },
    Collapse,
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// `out = i1 & !i2`, a satisfiable miter with 2 inputs and 1 AND gate.
pub fn single_and() -> Aig {
    let mut aig = Aig::new();
    let i1 = aig.add_node(AigNode::Input(1)).unwrap();
    let i2 = aig.add_node(AigNode::Input(2)).unwrap();
    aig.new_and(3, AigEdge::new(i1, false), AigEdge::new(i2, true))
        .unwrap();
    aig.add_output(3, false).unwrap();
    aig.update();
    aig
}

fn make_constant(mut aig: Aig, value: bool) -> Aig {
    aig.replace_output(0, 0, value).unwrap();
    aig.update();
    aig
}

/// Replays its outcomes in order, then times out.
pub struct ScriptedSolver {
    log: CallLog,
    outcomes: VecDeque<SolveOutcome>,
}

impl ScriptedSolver {
    pub fn new(log: &CallLog, outcomes: impl IntoIterator<Item = SolveOutcome>) -> Self {
        ScriptedSolver {
            log: log.clone(),
            outcomes: outcomes.into_iter().collect(),
        }
    }

    pub fn outcome(status: SatStatus, conflicts: u64, inspects: u64) -> SolveOutcome {
        SolveOutcome {
            status,
            conflicts,
            inspects,
        }
    }
}

impl SatEngine<Aig> for ScriptedSolver {
    fn solve(&mut self, _: &Aig, limits: SolveLimits) -> SolveOutcome {
        self.log.borrow_mut().push(Call::Sat {
            conflicts: limits.conflicts,
            inspects: limits.inspects,
        });
        self.outcomes
            .pop_front()
            .unwrap_or(ScriptedSolver::outcome(SatStatus::Timeout, 0, 0))
    }
}

/// Leaves the network untouched, except that its output becomes constant after a given number of passes.
pub struct ScriptedRewriter {
    log: CallLog,
    passes: usize,
    constant_after: Option<(usize, bool)>,
}

impl ScriptedRewriter {
    pub fn new(log: &CallLog) -> Self {
        ScriptedRewriter {
            log: log.clone(),
            passes: 0,
            constant_after: None,
        }
    }

    pub fn constant_after(mut self, passes: usize, value: bool) -> Self {
        self.constant_after = Some((passes, value));
        self
    }

    fn pass(&mut self, call: Call, aig: Aig) -> Aig {
        self.log.borrow_mut().push(call);
        self.passes += 1;
        match self.constant_after {
            Some((passes, value)) if self.passes >= passes => make_constant(aig, value),
            _ => aig,
        }
    }
}

impl Rewriter<Aig> for ScriptedRewriter {
    fn rewrite(&mut self, network: Aig) -> Aig {
        self.pass(Call::Rewrite, network)
    }

    fn refactor(&mut self, network: Aig) -> Aig {
        self.pass(Call::Refactor, network)
    }

    fn balance(&mut self, network: Aig) -> Aig {
        self.pass(Call::Balance, network)
    }
}

/// Scripted result of one fraiging run.
#[derive(Debug, Clone)]
pub struct FraigScript {
    pub status: SatStatus,
    pub sat_fails: u64,
    pub conflicts: u64,
    pub inspects: u64,
}

impl FraigScript {
    pub fn inconclusive(conflicts: u64, inspects: u64) -> Self {
        FraigScript {
            status: SatStatus::Timeout,
            sat_fails: 0,
            conflicts,
            inspects,
        }
    }
}

/// Replays its runs in order, then reports nothing. The network is handed back unchanged.
pub struct ScriptedFraig {
    log: CallLog,
    runs: VecDeque<FraigScript>,
}

impl ScriptedFraig {
    pub fn new(log: &CallLog, runs: impl IntoIterator<Item = FraigScript>) -> Self {
        ScriptedFraig {
            log: log.clone(),
            runs: runs.into_iter().collect(),
        }
    }
}

impl FraigEngine<Aig> for ScriptedFraig {
    fn fraig(&mut self, network: Aig, params: &FraigParams) -> FraigRun<Aig> {
        self.log.borrow_mut().push(Call::Fraig {
            bt_limit: params.bt_limit,
            inspect_limit: params.inspect_limit,
            pats_rand: params.pats_rand,
        });
        let script = self
            .runs
            .pop_front()
            .unwrap_or(FraigScript::inconclusive(0, 0));
        FraigRun {
            network,
            status: script.status,
            sat_fails: script.sat_fails,
            conflicts: script.conflicts,
            inspects: script.inspects,
        }
    }
}

/// Either overflows or collapses to a single node, whose function is scripted.
pub struct ScriptedCollapse {
    log: CallLog,
    overflow: bool,
    logic_zero: bool,
}

impl ScriptedCollapse {
    pub fn new(log: &CallLog, overflow: bool, logic_zero: bool) -> Self {
        ScriptedCollapse {
            log: log.clone(),
            overflow,
            logic_zero,
        }
    }
}

impl CollapseEngine<Aig> for ScriptedCollapse {
    fn collapse(&mut self, _: &Aig, _: &CollapseLimits) -> Option<Aig> {
        self.log.borrow_mut().push(Call::Collapse);
        if self.overflow {
            return None;
        }
        // out = i1 & !i1
        let mut aig = Aig::new();
        let i1 = aig.add_node(AigNode::Input(1)).unwrap();
        aig.new_and(2, AigEdge::new(i1.clone(), false), AigEdge::new(i1, true))
            .unwrap();
        aig.add_output(2, false).unwrap();
        aig.update();
        Some(aig)
    }

    fn is_logic_zero(&self, _: &Aig) -> bool {
        self.logic_zero
    }
}
