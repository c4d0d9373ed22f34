use super::Usage;

/// Definitive answer about a miter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The miter output is never true: the compared circuits are equivalent.
    Unsatisfiable,
    /// Some input assignment sets the miter output.
    Satisfiable,
}

impl Verdict {
    /// Verdict of a miter whose output is the constant `value`.
    pub fn from_constant(value: bool) -> Self {
        if value {
            Verdict::Satisfiable
        } else {
            Verdict::Unsatisfiable
        }
    }
}

/// What a phase hands back to the prover.
#[derive(Debug)]
pub struct Attempt<N> {
    /// The network the next phase works on.
    pub network: N,
    pub verdict: Option<Verdict>,
    /// Solver effort to charge, `None` for phases that do not search.
    pub usage: Option<Usage>,
}

impl<N> Attempt<N> {
    pub fn inconclusive(network: N) -> Self {
        Attempt {
            network,
            verdict: None,
            usage: None,
        }
    }
}

/// One step of an escalation round.
///
/// A phase takes the current network and returns its replacement, possibly with a verdict.
/// `iteration` selects the phase's own limit, `inspects` is what is left of the global inspect
/// budget (`None` if unlimited).
pub trait Phase<N> {
    fn name(&self) -> &'static str;

    fn attempt(&mut self, network: N, iteration: u32, inspects: Option<u64>) -> Attempt<N>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verdict_from_constant_test() {
        assert_eq!(Verdict::from_constant(false), Verdict::Unsatisfiable);
        assert_eq!(Verdict::from_constant(true), Verdict::Satisfiable);
    }
}
