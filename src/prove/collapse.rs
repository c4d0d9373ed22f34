use tracing::debug;

use super::{Attempt, CollapseEngine, CollapseLimits, Network, Verdict};

/// Last resort before the final SAT call: collapse the miter into a BDD.
///
/// Only a collapse to constant false proves the miter: either an output driven by the constant
/// node, or a single node whose function is false. Anything else (size overflow included) leaves
/// the network as it was before the collapse.
pub struct CollapseFallback<'e, N> {
    engine: Box<dyn CollapseEngine<N> + 'e>,
    limits: CollapseLimits,
}

impl<'e, N: Network> CollapseFallback<'e, N> {
    pub fn new(engine: impl CollapseEngine<N> + 'e, limits: CollapseLimits) -> Self {
        CollapseFallback {
            engine: Box::new(engine),
            limits,
        }
    }

    pub fn name(&self) -> &'static str {
        "Collapsing"
    }

    pub fn attempt(&mut self, network: N) -> Attempt<N> {
        let Some(collapsed) = self.engine.collapse(&network, &self.limits) else {
            debug!(size_limit = self.limits.size_limit, "BDD size limit exceeded");
            return Attempt::inconclusive(network);
        };

        let proved = collapsed.constant_output() == Some(false)
            || (collapsed.node_count() == 1 && self.engine.is_logic_zero(&collapsed));
        if proved {
            return Attempt {
                network: collapsed,
                verdict: Some(Verdict::Unsatisfiable),
                usage: None,
            };
        }

        debug!(
            nodes = collapsed.node_count(),
            "collapsed miter is not constant false"
        );
        Attempt::inconclusive(network)
    }
}
