use std::time::Instant;

use crate::Result;

use super::{
    CollapseEngine, CollapseFallback, FraigEngine, FraigPhase, Network, Phase, ProveError,
    ProveParams, ResourceLedger, Rewriter, SatEngine, SatPhase, SolveLimits, StructuralPhase,
    Verdict, report,
};

/// Final answer of a proof attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The compared circuits are equivalent.
    Unsatisfiable,
    /// The compared circuits differ, a counterexample is attached to the network.
    Satisfiable,
    /// Every engine gave up, or a global limit was reached.
    Unknown,
}

impl Disposition {
    /// Integer code of the disposition: `1` for UNSAT, `0` for SAT and `-1` when undecided.
    pub fn code(self) -> i32 {
        match self {
            Disposition::Unsatisfiable => 1,
            Disposition::Satisfiable => 0,
            Disposition::Unknown => -1,
        }
    }

    pub fn is_definitive(self) -> bool {
        self != Disposition::Unknown
    }
}

impl From<Verdict> for Disposition {
    fn from(value: Verdict) -> Self {
        match value {
            Verdict::Unsatisfiable => Disposition::Unsatisfiable,
            Verdict::Satisfiable => Disposition::Satisfiable,
        }
    }
}

/// Outcome of [`MiterProver::prove`].
#[derive(Debug)]
pub struct Proof<N> {
    /// The last network obtained, carrying the counterexample when satisfiable.
    pub network: N,
    pub disposition: Disposition,
    /// Effort spent by the whole attempt.
    pub ledger: ResourceLedger,
    /// Escalation rounds started.
    pub iterations: u32,
}

/// Proves or disproves a single-output miter within resource limits.
///
/// The SAT engine is mandatory, the other engines are optional: an engine takes part in the
/// attempt only if it was provided *and* enabled in [`ProveParams`].
pub struct MiterProver<'e, N> {
    params: ProveParams,
    sat: SatPhase<'e, N>,
    structural: Option<StructuralPhase<'e, N>>,
    fraig: Option<FraigPhase<'e, N>>,
    collapse: Option<CollapseFallback<'e, N>>,
}

impl<'e, N: Network> MiterProver<'e, N> {
    pub fn new(params: ProveParams, solver: impl SatEngine<N> + 'e) -> Self {
        let sat = SatPhase::new(solver, params.mitering);
        MiterProver {
            params,
            sat,
            structural: None,
            fraig: None,
            collapse: None,
        }
    }

    pub fn with_rewriter(mut self, rewriter: impl Rewriter<N> + 'e) -> Self {
        self.structural = Some(StructuralPhase::new(rewriter, self.params.rewriting));
        self
    }

    pub fn with_fraig(mut self, engine: impl FraigEngine<N> + 'e) -> Self {
        self.fraig = Some(FraigPhase::new(engine, self.params.fraiging));
        self
    }

    pub fn with_collapse(mut self, engine: impl CollapseEngine<N> + 'e) -> Self {
        self.collapse = Some(CollapseFallback::new(engine, self.params.collapse_limits()));
        self
    }

    pub fn params(&self) -> &ProveParams {
        &self.params
    }

    /// Runs the whole attempt on `network`, which is handed back in the [`Proof`].
    ///
    /// Errors only if `network` is not a single-output structural network. Running out of
    /// resources gives [`Disposition::Unknown`].
    pub fn prove(&mut self, mut network: N) -> Result<Proof<N>> {
        if network.output_count() != 1 {
            return Err(ProveError::NotSingleOutput(network.output_count()).into());
        }
        if !network.is_structural() {
            return Err(ProveError::NotStructural.into());
        }
        // Only a counterexample found by this attempt is reported.
        network.clear_model();

        let verbose = self.params.verbose;
        let mut ledger = ResourceLedger::new(
            self.params.total_backtrack_limit,
            self.params.total_inspect_limit,
        );
        report::limits(verbose, &self.params);

        let use_structural = self.params.use_rewriting && self.structural.is_some();
        let use_fraig = self.params.use_fraiging && self.fraig.is_some();

        if !use_structural && !use_fraig {
            let start = Instant::now();
            let limits = SolveLimits {
                conflicts: self.params.mitering_last,
                inspects: None,
            };
            let attempt = self.sat.solve(network, limits);
            report::phase_done(verbose, self.sat.name(), &attempt.network, start);
            return Ok(assemble(attempt.network, attempt.verdict, ledger, 0));
        }

        let mut verdict = None;
        let mut iterations = 0;

        let mut phases: Vec<&mut dyn Phase<N>> = Vec::new();
        phases.push(&mut self.sat);
        if let Some(structural) = self.structural.as_mut().filter(|_| use_structural) {
            phases.push(structural);
        }
        if let Some(fraig) = self.fraig.as_mut().filter(|_| use_fraig) {
            phases.push(fraig);
        }

        'escalate: for iteration in 0..self.params.iterations {
            iterations = iteration + 1;
            report::iteration(verbose, iteration, &ledger);

            for phase in phases.iter_mut() {
                let start = Instant::now();
                let attempt = phase.attempt(network, iteration, ledger.remaining_inspects());
                network = attempt.network;
                report::phase_done(verbose, phase.name(), &network, start);

                if let Some(usage) = attempt.usage {
                    ledger.charge(usage);
                }
                if attempt.verdict.is_some() {
                    verdict = attempt.verdict;
                    break 'escalate;
                }
                if ledger.exhausted() {
                    report::limit_reached(&ledger);
                    return Ok(Proof {
                        network,
                        disposition: Disposition::Unknown,
                        ledger,
                        iterations,
                    });
                }
            }
        }
        drop(phases);

        if verdict.is_none() && self.params.use_bdds {
            if let Some(fallback) = self.collapse.as_mut() {
                let start = Instant::now();
                let attempt = fallback.attempt(network);
                network = attempt.network;
                report::phase_done(verbose, fallback.name(), &network, start);
                verdict = attempt.verdict;
            }
        }

        if verdict.is_none() {
            let start = Instant::now();
            let limits = SolveLimits {
                conflicts: self.params.mitering_last,
                inspects: ledger.remaining_inspects(),
            };
            let attempt = self.sat.solve(network, limits);
            network = attempt.network;
            report::phase_done(verbose, "Final SAT solving", &network, start);
            if let Some(usage) = attempt.usage {
                ledger.charge(usage);
            }
            verdict = attempt.verdict;
        }

        Ok(assemble(network, verdict, ledger, iterations))
    }
}

/// A satisfiable miter always carries a model. So does a miter decided by its constant output,
/// even without a counterexample from an engine: the all-false assignment.
fn assemble<N: Network>(
    mut network: N,
    verdict: Option<Verdict>,
    ledger: ResourceLedger,
    iterations: u32,
) -> Proof<N> {
    let disposition = verdict.map_or(Disposition::Unknown, Disposition::from);
    let needs_witness = disposition == Disposition::Satisfiable
        || (disposition.is_definitive() && network.constant_output().is_some());
    if needs_witness && network.model().is_none() {
        network.set_model(vec![false; network.input_count()]);
    }
    Proof {
        network,
        disposition,
        ledger,
        iterations,
    }
}
