use std::{
    collections::{HashMap, HashSet},
    num::TryFromIntError,
    ops::Deref,
};

use thiserror::Error;

use crate::{Aig, AigEdge, AigError, AigNode, NodeId, Result};

/// Error returned when an operation related to the miter fails
/// (creation, CNF extraction, ...).
#[derive(Debug, Error)]
pub enum MiterError {
    /// Creation of a miter failed because the two AIGs have different inputs.
    /// We are just checking for the inputs id, they should correspond.
    #[error("AIGs have different inputs : {0:?} vs {1:?}")]
    MiterDifferentInputs(HashSet<NodeId>, HashSet<NodeId>),

    /// Creation of a miter failed because the two AIGs have a different number of outputs.
    #[error("trying to construct a miter between AIGs with {0} and {1} outputs")]
    MiterDifferentOutputs(usize, usize),

    /// A node was not mapped to any SAT literal.
    #[error("node id {0} is not mapped to any literal")]
    UnmappedNodeToLit(NodeId),

    /// Conversion from a NodeId to a SAT literal failed.
    /// Inputs are assigned their own index as SAT literals.
    /// However, an input id is represented as a `u64`, and a SAT literal is a `i64`
    /// so the conversion might fail.
    #[error("conversion from NodeId to Lit failed because of {0}")]
    NodeIdToLit(#[from] TryFromIntError),
}

/// A single-output miter between two AIGs.
///
/// For background on what is a miter, please check
/// [Verification of large synthesized designs](https://doi.org/10.1109/ICCAD.1993.580110) by D. Brand.
///
/// The two circuits share their inputs (matched by id), and their outputs are paired by position.
/// The miter output is the OR of the XOR of every pair of outputs: it is satisfiable
/// iff some input assignment makes the two circuits disagree.
///
/// Both cones are copied with *structural hashing*: an AND gate is only created if no gate with
/// the same fanins exists, and trivial gates (`x & 0`, `x & 1`, `x & x`, `x & !x`) are folded.
/// Comparing a circuit with an untouched copy of itself yields a constant false miter.
/// For more information on strashing, check the following paper:
/// FRAIGs: A Unifying Representation for Logic Synthesis and Verification
/// by Alan Mishchenko, Satrajit Chatterjee, Roland Jiang, Robert Brayton.
///
/// ```rust
/// use mutaig_prove::{Aig, miter::Miter};
/// let half_adder = "aag 7 2 0 2 3\n2\n4\n6\n12\n6 13 15\n12 2 4\n14 3 5\n";
/// let a = Aig::from_ascii(half_adder.as_bytes()).unwrap();
/// let b = Aig::from_ascii(half_adder.as_bytes()).unwrap();
/// let miter = Miter::new(&a, &b).unwrap();
/// assert_eq!(miter.get_aig().constant_output(), Some(false));
/// ```
pub struct Miter {
    aig: Aig,
    pairs: usize,
}

impl Miter {
    /// Create miter between two AIGs.
    ///
    /// This will fail if:
    /// - the given AIGs have different inputs (ie inputs with different ids)
    /// - or they have a different number of outputs.
    pub fn new(a: &Aig, b: &Aig) -> Result<Self> {
        if a.get_inputs_id() != b.get_inputs_id() {
            return Err(
                MiterError::MiterDifferentInputs(a.get_inputs_id(), b.get_inputs_id()).into(),
            );
        }
        if a.output_count() != b.output_count() {
            return Err(MiterError::MiterDifferentOutputs(a.output_count(), b.output_count()).into());
        }

        let mut builder = StrashBuilder::new(a.get_inputs_id_sorted())?;
        let outputs_a = builder.copy_cone(a)?;
        let outputs_b = builder.copy_cone(b)?;

        let mut miter_output = builder.constant(false);
        for (out_a, out_b) in outputs_a.into_iter().zip(outputs_b) {
            let diff = builder.xor(out_a, out_b)?;
            miter_output = builder.or(miter_output, diff)?;
        }

        let mut aig = builder.aig;
        aig.add_output(miter_output.get_node_id(), miter_output.get_complement())?;
        aig.update();

        Ok(Miter {
            aig,
            pairs: a.output_count(),
        })
    }

    pub fn get_aig(&self) -> &Aig {
        &self.aig
    }

    /// Number of output pairs compared by this miter.
    pub fn get_output_pairs(&self) -> usize {
        self.pairs
    }

    /// Hands over the miter AIG, eg. to [`crate::prove::MiterProver::prove`].
    pub fn into_aig(self) -> Aig {
        self.aig
    }
}

type EdgeKey = (NodeId, bool);

struct StrashBuilder {
    aig: Aig,
    table: HashMap<(EdgeKey, EdgeKey), NodeId>,
    next_id: NodeId,
}

impl StrashBuilder {
    fn new(inputs: Vec<NodeId>) -> Result<Self> {
        let mut aig = Aig::new();
        let next_id = inputs.iter().max().copied().unwrap_or(0) + 1;
        for id in inputs {
            aig.add_node(AigNode::Input(id))?;
        }
        Ok(StrashBuilder {
            aig,
            table: HashMap::new(),
            next_id,
        })
    }

    fn constant(&self, value: bool) -> AigEdge {
        self.aig.constant(value)
    }

    fn and(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        if a.is_cst_false() || b.is_cst_false() || a.is_complement_of(&b) {
            return Ok(self.constant(false));
        }
        if a.is_cst_true() {
            return Ok(b);
        }
        if b.is_cst_true() || a == b {
            return Ok(a);
        }

        let (ka, kb): (EdgeKey, EdgeKey) = ((&a).into(), (&b).into());
        let key = if ka <= kb { (ka, kb) } else { (kb, ka) };
        if let Some(&id) = self.table.get(&key) {
            let node = self.aig.get_node(id).ok_or(AigError::NodeDoesNotExist(id))?;
            return Ok(AigEdge::new(node, false));
        }

        let id = self.next_id;
        self.next_id += 1;
        let node = self.aig.new_and(id, a, b)?;
        self.table.insert(key, id);
        Ok(AigEdge::new(node, false))
    }

    fn or(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        Ok(!self.and(!a, !b)?)
    }

    fn xor(&mut self, a: AigEdge, b: AigEdge) -> Result<AigEdge> {
        let left = self.and(a.clone(), !b.clone())?;
        let right = self.and(!a, b)?;
        self.or(left, right)
    }

    /// Copies the cone of every output of `source`, returning the copied output edges.
    fn copy_cone(&mut self, source: &Aig) -> Result<Vec<AigEdge>> {
        let mut map: HashMap<NodeId, AigEdge> = HashMap::new();
        map.insert(0, self.constant(false));
        for id in source.get_inputs_id_sorted() {
            let node = self.aig.get_node(id).ok_or(AigError::NodeDoesNotExist(id))?;
            map.insert(id, AigEdge::new(node, false));
        }

        let translate = |map: &HashMap<NodeId, AigEdge>, edge: &AigEdge| -> Result<AigEdge> {
            let id = edge.get_node_id();
            let copied = map.get(&id).cloned().ok_or(AigError::NodeDoesNotExist(id))?;
            Ok(if edge.get_complement() { !copied } else { copied })
        };

        for node in source.get_topological_sort()? {
            if let AigNode::And { id, fanin0, fanin1 } = node.borrow().deref() {
                let f0 = translate(&map, fanin0)?;
                let f1 = translate(&map, fanin1)?;
                let copied = self.and(f0, f1)?;
                map.insert(*id, copied);
            }
        }

        source
            .get_outputs()
            .iter()
            .map(|output| translate(&map, output))
            .collect()
    }
}
