use tracing::trace;

use super::{Attempt, Escalation, Network, Phase, Rewriter, Verdict};

#[derive(Debug, Clone, Copy)]
enum Pass {
    Rewrite,
    Refactor,
    Balance,
}

const PASSES: [Pass; 3] = [Pass::Rewrite, Pass::Refactor, Pass::Balance];

/// Cheap structural simplification, looking for a constant miter output between passes.
///
/// The budget of an iteration is a number of passes. Passes cycle through rewriting, refactoring
/// and balancing, and each one costs the same.
pub struct StructuralPhase<'e, N> {
    rewriter: Box<dyn Rewriter<N> + 'e>,
    schedule: Escalation,
}

impl<'e, N: Network> StructuralPhase<'e, N> {
    pub fn new(rewriter: impl Rewriter<N> + 'e, schedule: Escalation) -> Self {
        StructuralPhase {
            rewriter: Box::new(rewriter),
            schedule,
        }
    }

    /// Runs up to `budget` passes, stopping early once the output is a constant.
    pub fn simplify(&mut self, mut network: N, budget: u64) -> Attempt<N> {
        for (done, pass) in PASSES.iter().cycle().enumerate() {
            if done as u64 >= budget {
                break;
            }
            network = match pass {
                Pass::Rewrite => self.rewriter.rewrite(network),
                Pass::Refactor => self.rewriter.refactor(network),
                Pass::Balance => self.rewriter.balance(network),
            };
            trace!(?pass, nodes = network.node_count(), "structural pass");

            if let Some(value) = network.constant_output() {
                return Attempt {
                    network,
                    verdict: Some(Verdict::from_constant(value)),
                    usage: None,
                };
            }
        }
        Attempt::inconclusive(network)
    }
}

impl<N: Network> Phase<N> for StructuralPhase<'_, N> {
    fn name(&self) -> &'static str {
        "Rewriting"
    }

    fn attempt(&mut self, network: N, iteration: u32, _: Option<u64>) -> Attempt<N> {
        let budget = self.schedule.limit(iteration);
        self.simplify(network, budget)
    }
}
