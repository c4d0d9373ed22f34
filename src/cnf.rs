//! Tseitin encoding of a single-output miter, for SAT engine adapters.
//!
//! A [`crate::prove::SatEngine`] backed by an external solver typically:
//! - extracts the CNF of the miter with [`Cnf::from_miter`]
//! - feeds the clauses (or their [DIMACS rendering](Cnf::to_dimacs)) to the solver
//! - maps a satisfying assignment back to one value per input with [`MiterCnf::decode_model`].
//!
//! If the resulting CNF is SAT, the two circuits of the miter are **not equivalent**.

use std::{
    collections::{HashMap, HashSet},
    fmt::Write,
    ops::{Deref, Not},
};

use crate::{Aig, AigEdge, AigNode, NodeId, Result, miter::MiterError, prove::ProveError};

/// A SAT literal.
///
/// Note that all AIG nodes do not correspond to a SAT literal.
/// For example, [`AigNode::False`] node do not map to any literal, but rather is omitted
/// as false boolean variables can be removed from a clause without changing the problem.
/// Clauses that contain a true boolean variable (ie a complemented edge to [`AigNode::False`] node)
/// are obviously true and don't need to be emitted.
///
/// These cases are handled by the internal `LitRes` data structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(i64);

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self::Output {
        Lit(-self.0)
    }
}

impl From<i64> for Lit {
    fn from(value: i64) -> Self {
        if value == 0 {
            panic!("Tried to create a Lit from 0. 0 is not a valid literal in DIMACS format.");
        }
        Lit(value)
    }
}

impl TryFrom<NodeId> for Lit {
    type Error = MiterError;

    fn try_from(value: NodeId) -> std::result::Result<Self, Self::Error> {
        Ok(Lit::from(i64::try_from(value)?))
    }
}

impl Lit {
    /// The literal as a signed DIMACS integer.
    pub fn to_dimacs(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LitRes {
    False,
    True,
    Lit(Lit),
}

impl Not for LitRes {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            LitRes::False => LitRes::True,
            LitRes::True => LitRes::False,
            LitRes::Lit(lit) => LitRes::Lit(!lit),
        }
    }
}

impl From<Lit> for LitRes {
    fn from(value: Lit) -> Self {
        LitRes::Lit(value)
    }
}

/// A SAT clause. The empty clause is unsatisfiable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause(Vec<Lit>);

impl Clause {
    /// Returns the true SAT clause once we got rid of `True` and `False` literals.
    /// If there is a `True`, then the Clause is obviously satisfied, so we return None.
    /// `False` literals are omitted, so a clause made of `False` only is the empty clause.
    fn from_lit_res(lits: Vec<LitRes>) -> Option<Clause> {
        let mut literals = Vec::new();

        for lit_res in lits {
            match lit_res {
                LitRes::True => return None,
                LitRes::False => (),
                LitRes::Lit(lit) => literals.push(lit),
            }
        }

        Some(Clause(literals))
    }

    pub fn get_lits(&self) -> &[Lit] {
        &self.0
    }
}

impl From<Vec<Lit>> for Clause {
    fn from(value: Vec<Lit>) -> Self {
        Clause(value)
    }
}

/// A SAT CNF that can be passed to a SAT solver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf(Vec<Clause>);

/// The CNF of a miter, together with the literal of every input.
#[derive(Debug, Clone)]
pub struct MiterCnf {
    pub cnf: Cnf,
    /// Inputs by increasing id, the order of models.
    pub inputs: Vec<(NodeId, Lit)>,
    /// Highest variable index used.
    pub num_vars: i64,
}

impl Cnf {
    /// A new empty CNF.
    pub fn new() -> Self {
        Cnf(Vec::new())
    }

    /// Add the given clause to the CNF.
    pub fn add_clause(&mut self, clause: Clause) {
        self.0.push(clause);
    }

    /// Add the given clause to the CNF, else does nothing.
    pub fn add_clause_if(&mut self, clause: Option<Clause>) {
        if let Some(c) = clause {
            self.add_clause(c);
        }
    }

    pub fn get_clauses(&self) -> &[Clause] {
        &self.0
    }

    /// Add clauses induced by the node, `z = AND(a, b)`.
    fn add_clauses_node(&mut self, node: &AigNode, litmap: &HashMap<NodeId, Lit>) -> Result<()> {
        if let AigNode::And { id, fanin0, fanin1 } = node {
            let a = get_literal_res(fanin0, litmap)?;
            let b = get_literal_res(fanin1, litmap)?;
            let z = LitRes::from(*litmap.get(id).ok_or(MiterError::UnmappedNodeToLit(*id))?);

            self.add_clause_if(Clause::from_lit_res(vec![a, !z]));
            self.add_clause_if(Clause::from_lit_res(vec![b, !z]));
            self.add_clause_if(Clause::from_lit_res(vec![!a, !b, z]));
        }
        Ok(())
    }

    /// Encodes the cone of the single output of `miter` and asserts the output.
    ///
    /// Input `i` is mapped to the variable `i`, AND gates get fresh variables after the
    /// highest input id. A constant false output produces the empty clause.
    pub fn from_miter(miter: &Aig) -> Result<MiterCnf> {
        let outputs = miter.get_outputs();
        let [output] = outputs.as_slice() else {
            return Err(ProveError::NotSingleOutput(outputs.len()).into());
        };

        let mut litmap: HashMap<NodeId, Lit> = HashMap::new();
        let mut inputs = Vec::new();
        for id in miter.get_inputs_id_sorted() {
            let lit = Lit::try_from(id)?;
            litmap.insert(id, lit);
            inputs.push((id, lit));
        }
        let mut num_vars = inputs.last().map(|(_, lit)| lit.0).unwrap_or(0);

        let mut cnf = Cnf::new();
        for node in miter.get_topological_sort()? {
            let node = node.borrow();
            if node.is_and() {
                num_vars += 1;
                litmap.insert(node.get_id(), Lit::from(num_vars));
                cnf.add_clauses_node(node.deref(), &litmap)?;
            }
        }

        cnf.add_clause_if(Clause::from_lit_res(vec![get_literal_res(output, &litmap)?]));

        Ok(MiterCnf {
            cnf,
            inputs,
            num_vars,
        })
    }

    /// Renders the CNF in DIMACS format.
    pub fn to_dimacs(&self, num_vars: i64) -> String {
        let mut out = format!("p cnf {} {}\n", num_vars, self.0.len());
        for clause in &self.0 {
            for lit in &clause.0 {
                let _ = write!(out, "{} ", lit.0);
            }
            out.push_str("0\n");
        }
        out
    }
}

impl MiterCnf {
    /// Maps a solver assignment (DIMACS literals, positive means true) back to one value per input.
    /// Variables missing from the assignment are read as false.
    pub fn decode_model(&self, assignment: &[i64]) -> Vec<bool> {
        let positive: HashSet<i64> = assignment.iter().copied().filter(|&l| l > 0).collect();
        self.inputs
            .iter()
            .map(|(_, lit)| positive.contains(&lit.0))
            .collect()
    }

    pub fn to_dimacs(&self) -> String {
        self.cnf.to_dimacs(self.num_vars)
    }
}

fn get_literal_res(edge: &AigEdge, litmap: &HashMap<NodeId, Lit>) -> Result<LitRes> {
    let lit = if edge.get_node_id() == 0 {
        LitRes::False
    } else {
        let id = edge.get_node_id();
        LitRes::from(*litmap.get(&id).ok_or(MiterError::UnmappedNodeToLit(id))?)
    };
    Ok(if edge.get_complement() { !lit } else { lit })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::miter::Miter;

    const HALF_ADDER: &str = "aag 7 2 0 2 3\n2\n4\n6\n12\n6 13 15\n12 2 4\n14 3 5\n";

    #[test]
    fn not_lit_test() {
        let l1 = Lit(1);
        assert_eq!(!l1, Lit(-1));
        assert_eq!((!l1).to_dimacs(), -1);
    }

    #[test]
    fn not_lit_res_test() {
        assert_eq!(!LitRes::False, LitRes::True);
        assert_eq!(!LitRes::Lit(Lit(1)), LitRes::Lit(!Lit(1)));
    }

    #[test]
    fn clause_from_lit_res_test() {
        let l1 = Lit(1);
        let l2 = Lit(2);

        assert_eq!(
            Clause::from_lit_res(vec![LitRes::False, LitRes::False]).unwrap(),
            Clause(vec![])
        );
        assert!(Clause::from_lit_res(vec![LitRes::False, LitRes::True, l1.into()]).is_none());
        assert_eq!(
            Clause::from_lit_res(vec![l1.into(), LitRes::False, l2.into()]).unwrap(),
            Clause(vec![l1, l2])
        );
    }

    #[test]
    #[should_panic]
    fn invalid_lit_from_test() {
        _ = Lit::from(0);
    }

    #[test]
    fn from_miter_rejects_multiple_outputs() {
        let aig = Aig::from_ascii(HALF_ADDER.as_bytes()).unwrap();
        assert!(Cnf::from_miter(&aig).is_err());
    }

    #[test]
    fn constant_false_miter_is_empty_clause() {
        let a = Aig::from_ascii(HALF_ADDER.as_bytes()).unwrap();
        let miter = Miter::new(&a, &a).unwrap().into_aig();
        let cnf = Cnf::from_miter(&miter).unwrap();
        assert_eq!(cnf.cnf.get_clauses(), &[Clause(vec![])]);
        assert_eq!(cnf.to_dimacs(), "p cnf 2 1\n0\n");
    }

    #[test]
    fn and_gate_encoding() {
        // out = i1 & !i2
        let mut aig = Aig::new();
        let i1 = aig.add_node(AigNode::Input(1)).unwrap();
        let i2 = aig.add_node(AigNode::Input(2)).unwrap();
        aig.new_and(3, AigEdge::new(i1, false), AigEdge::new(i2, true))
            .unwrap();
        aig.add_output(3, false).unwrap();

        let cnf = Cnf::from_miter(&aig).unwrap();
        assert_eq!(cnf.num_vars, 3);
        assert_eq!(cnf.inputs, vec![(1, Lit(1)), (2, Lit(2))]);
        assert_eq!(
            cnf.cnf.get_clauses(),
            &[
                Clause(vec![Lit(1), Lit(-3)]),
                Clause(vec![Lit(-2), Lit(-3)]),
                Clause(vec![Lit(-1), Lit(2), Lit(3)]),
                Clause(vec![Lit(3)]),
            ]
        );
        assert_eq!(
            cnf.to_dimacs(),
            "p cnf 3 4\n1 -3 0\n-2 -3 0\n-1 2 3 0\n3 0\n"
        );
        assert_eq!(cnf.decode_model(&[1, -2, 3]), vec![true, false]);
        assert_eq!(cnf.decode_model(&[]), vec![false, false]);
    }
}
