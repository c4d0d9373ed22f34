use super::{
    Attempt, Escalation, Network, Phase, SatEngine, SatStatus, SolveLimits, Usage,
};

/// Brute-force SAT on the whole miter, with an escalating conflict limit.
pub struct SatPhase<'e, N> {
    solver: Box<dyn SatEngine<N> + 'e>,
    schedule: Escalation,
}

impl<'e, N: Network> SatPhase<'e, N> {
    pub fn new(solver: impl SatEngine<N> + 'e, schedule: Escalation) -> Self {
        SatPhase {
            solver: Box::new(solver),
            schedule,
        }
    }

    /// One SAT call. On SAT the model is attached to the returned network.
    pub fn solve(&mut self, mut network: N, limits: SolveLimits) -> Attempt<N> {
        let outcome = self.solver.solve(&network, limits);
        let verdict = outcome.status.verdict();
        if let SatStatus::Sat(model) = outcome.status {
            debug_assert_eq!(model.len(), network.input_count(), "model size");
            network.set_model(model);
        }
        Attempt {
            network,
            verdict,
            usage: Some(Usage {
                conflicts: outcome.conflicts,
                inspects: outcome.inspects,
                sat_fails: 0,
            }),
        }
    }
}

impl<N: Network> Phase<N> for SatPhase<'_, N> {
    fn name(&self) -> &'static str {
        "SAT solving"
    }

    fn attempt(&mut self, network: N, iteration: u32, inspects: Option<u64>) -> Attempt<N> {
        let limits = SolveLimits {
            conflicts: self.schedule.limit(iteration),
            inspects,
        };
        self.solve(network, limits)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::prove::{
        Verdict,
        testing::{Call, ScriptedSolver, call_log, single_and},
    };

    #[test]
    fn escalating_limits_test() {
        let log = call_log();
        let solver = ScriptedSolver::new(&log, []);
        let mut phase = SatPhase::new(solver, Escalation::new(5000, 2.0));

        let attempt = phase.attempt(single_and(), 0, None);
        assert_eq!(attempt.verdict, None);
        let attempt = phase.attempt(attempt.network, 2, Some(42));
        assert_eq!(attempt.verdict, None);
        assert_eq!(attempt.usage, Some(Usage::default()));

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Sat {
                    conflicts: 5000,
                    inspects: None
                },
                Call::Sat {
                    conflicts: 20000,
                    inspects: Some(42)
                },
            ]
        );
    }

    #[test]
    fn model_is_attached_test() {
        let log = call_log();
        let solver = ScriptedSolver::new(
            &log,
            [ScriptedSolver::outcome(SatStatus::Sat(vec![true, true]), 7, 3)],
        );
        let mut phase = SatPhase::new(solver, Escalation::new(10, 1.0));

        let attempt = phase.attempt(single_and(), 0, None);
        assert_eq!(attempt.verdict, Some(Verdict::Satisfiable));
        assert_eq!(attempt.network.model(), Some(&[true, true][..]));
        assert_eq!(
            attempt.usage,
            Some(Usage {
                conflicts: 7,
                inspects: 3,
                sat_fails: 0
            })
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "model size")]
    fn model_of_wrong_size_test() {
        let log = call_log();
        let solver = ScriptedSolver::new(
            &log,
            [ScriptedSolver::outcome(SatStatus::Sat(vec![true]), 0, 0)],
        );
        let mut phase = SatPhase::new(solver, Escalation::new(10, 1.0));
        phase.attempt(single_and(), 0, None);
    }
}
