use super::{
    Attempt, Escalation, FraigEngine, FraigParams, Network, Phase, SatStatus, Usage,
};

/// Simulation words per node: 32 at most, and few enough that the simulation of the whole
/// network stays within 2^27 words.
pub fn simulation_words(nodes: usize, inputs: usize) -> usize {
    let objects = nodes.saturating_add(inputs).max(1);
    ((1usize << 27) / objects).min(32)
}

/// Patterns of random simulation, and of dynamic simulation, for a network of this size.
pub fn simulation_patterns(nodes: usize, inputs: usize) -> usize {
    simulation_words(nodes, inputs) * 32
}

impl FraigParams {
    /// Parameters of a fraiging run on `network`, simulation sized after the network.
    pub fn for_network<N: Network>(network: &N, bt_limit: u64, inspect_limit: Option<u64>) -> Self {
        let patterns = simulation_patterns(network.node_count(), network.input_count());
        FraigParams {
            pats_rand: patterns,
            pats_dyna: patterns,
            bt_limit,
            inspect_limit,
            time_limit: None,
            try_prove: false,
            do_sparse: true,
            verbose: false,
        }
    }
}

/// Functional reduction of the miter, with an escalating backtrack limit.
pub struct FraigPhase<'e, N> {
    engine: Box<dyn FraigEngine<N> + 'e>,
    schedule: Escalation,
}

impl<'e, N: Network> FraigPhase<'e, N> {
    pub fn new(engine: impl FraigEngine<N> + 'e, schedule: Escalation) -> Self {
        FraigPhase {
            engine: Box::new(engine),
            schedule,
        }
    }

    /// One fraiging run. On SAT the model is attached to the reduced network.
    pub fn run(&mut self, network: N, bt_limit: u64, inspects: Option<u64>) -> Attempt<N> {
        let params = FraigParams::for_network(&network, bt_limit, inspects);
        let run = self.engine.fraig(network, &params);

        let mut network = run.network;
        let verdict = run.status.verdict();
        if let SatStatus::Sat(model) = run.status {
            debug_assert_eq!(model.len(), network.input_count(), "model size");
            network.set_model(model);
        }
        Attempt {
            network,
            verdict,
            usage: Some(Usage {
                conflicts: run.conflicts,
                inspects: run.inspects,
                sat_fails: run.sat_fails,
            }),
        }
    }
}

impl<N: Network> Phase<N> for FraigPhase<'_, N> {
    fn name(&self) -> &'static str {
        "Fraiging"
    }

    fn attempt(&mut self, network: N, iteration: u32, inspects: Option<u64>) -> Attempt<N> {
        let bt_limit = self.schedule.limit(iteration);
        self.run(network, bt_limit, inspects)
    }
}
