//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`AigEdge`] and some others relevant structs.
//!
//! To build a miter between two circuits, check [`crate::miter::Miter`]. To prove it, check
//! [`crate::prove::MiterProver`].

pub mod dfs;
pub mod edge;
pub mod error;
pub mod node;
mod parser;

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    ops::Deref,
    rc::Rc,
};

pub use edge::AigEdge;
pub use error::{AigError, ParserError, Result};
pub(crate) use node::AigNodeWeak;
pub use node::{AigNode, AigNodeRef, NodeId};

use dfs::Dfs;

/// A whole combinational AIG.
///
/// Nodes are kept alive artificially to allow rewrites of the structure.
/// Once you are done with rewriting (ie, your AIG should now be in a relevant state), you can
/// call the [`.update()`] method to remove all unused nodes.
///
/// For example, if you just created a node using [`.new_and(id, fanin0, fanin1)`], this node isn't used as a fanin to any
/// other node for now. It won't be deleted directly. But if after finishing your rewrite you
/// call [`.update()`] and the node still is not used by any other node nor output, then, it will get deleted.
///
/// [`.update()`]: Aig::update
/// [`.new_and(id, fanin0, fanin1)`]: Aig::new_and
///
/// An AIG can also carry a *model*: one boolean per input (inputs ordered by increasing id),
/// set by the prover when a counterexample has been found for a miter.
///
/// Note that [`Aig::clone`] will perform a shallow copy of the AIG (the nodes won't be copied).
#[derive(Debug, Clone)]
pub struct Aig {
    /// Weak references to every node, indexed by id.
    nodes: HashMap<NodeId, AigNodeWeak>,
    /// Inputs are kept alive even if no output depends on them.
    inputs: HashMap<NodeId, AigNodeRef>,
    outputs: Vec<AigEdge>,
    keep_nodes_alive: Vec<AigNodeRef>,
    // Keep alive node false.
    node_false: AigNodeRef,
    model: Option<Vec<bool>>,
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new()
    }
}

impl Aig {
    /// Create a brand new AIG (constant node [`AigNode::False`] included).
    pub fn new() -> Self {
        let node_false = Rc::new(RefCell::new(AigNode::False));
        let nodes = HashMap::from([(0, Rc::downgrade(&node_false))]);
        Aig {
            nodes,
            inputs: HashMap::new(),
            outputs: Vec::new(),
            keep_nodes_alive: Vec::new(),
            node_false,
            model: None,
        }
    }

    /// Retrieves a node from its id.
    pub fn get_node(&self, id: NodeId) -> Option<AigNodeRef> {
        self.nodes.get(&id)?.upgrade()
    }

    /// Call this function when you are done with your rewrite.
    /// All nodes that are not part of the AIG anymore (ie not reachable from an output) will be deleted.
    pub fn update(&mut self) {
        self.keep_nodes_alive.clear();
        self.nodes.retain(|_, weak_node| weak_node.upgrade().is_some());
    }

    /// An edge to the constant node, complemented if `value` is true.
    pub fn constant(&self, value: bool) -> AigEdge {
        AigEdge::new(self.node_false.clone(), value)
    }

    /// Retrieves inputs id.
    pub fn get_inputs_id(&self) -> HashSet<NodeId> {
        self.inputs.keys().copied().collect()
    }

    /// Retrieves inputs id by increasing order, which is the order used by models and [`Aig::eval`].
    pub fn get_inputs_id_sorted(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.inputs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Retrieves outputs reference.
    pub fn get_outputs(&self) -> Vec<AigEdge> {
        self.outputs.clone()
    }

    fn check_valid_node_to_add(&self, node: &AigNode) -> Result<()> {
        match node {
            AigNode::False => Ok(()),
            AigNode::Input(id) => {
                if *id == 0 {
                    Err(AigError::IdZeroButNotFalse)
                } else {
                    Ok(())
                }
            }
            AigNode::And {
                id, fanin0, fanin1, ..
            } => {
                if *id == 0 {
                    return Err(AigError::IdZeroButNotFalse);
                }
                for fanin_id in [fanin0.get_node_id(), fanin1.get_node_id()] {
                    if self.get_node(fanin_id).is_none() {
                        return Err(AigError::NodeDoesNotExist(fanin_id));
                    }
                }
                Ok(())
            }
        }
    }

    /// Create a new (or retrieve existing) node within the AIG.
    /// This will fail if a different node with the same id already exists in the AIG,
    /// or if a node uses id 0 (reserved for constant node [`AigNode::False`]).
    ///
    /// ```rust
    /// use mutaig_prove::{Aig, AigEdge, AigNode};
    /// let mut aig = Aig::new();
    /// let i1 = aig.add_node(AigNode::Input(1)).unwrap();
    /// let i1_ = aig.add_node(AigNode::Input(1)).unwrap(); // will simply retrieve the existing node
    /// assert_eq!(i1, i1_);
    ///
    /// // Some stuff we cannot do
    /// assert!(aig.add_node(AigNode::Input(0)).is_err());
    /// assert!(
    ///     aig.add_node(AigNode::and(
    ///         1,
    ///         AigEdge::new(i1.clone(), false),
    ///         AigEdge::new(i1.clone(), false)
    ///     ))
    ///     .is_err()
    /// );
    /// ```
    pub fn add_node(&mut self, node: AigNode) -> Result<AigNodeRef> {
        self.check_valid_node_to_add(&node)?;

        let id = node.get_id();
        match self.get_node(id) {
            None => {
                let n: AigNodeRef = Rc::new(RefCell::new(node));
                self.nodes.insert(id, Rc::downgrade(&n));
                self.keep_nodes_alive.push(n.clone());
                if n.borrow().is_input() {
                    self.inputs.insert(id, n.clone());
                }
                Ok(n)
            }
            // A node was found, maybe it is just the one we're trying to create
            Some(n) => {
                if *n.borrow() == node {
                    Ok(n)
                } else {
                    Err(AigError::DuplicateId(id))
                }
            }
        }
    }

    /// Create a new and node (or retrieve it if the exact same node already exists).
    /// Unlike [`AigNode::and`], id 0 is reported as an error.
    pub fn new_and(&mut self, id: NodeId, fanin0: AigEdge, fanin1: AigEdge) -> Result<AigNodeRef> {
        self.add_node(AigNode::And { id, fanin0, fanin1 })
    }

    /// Mark an existing node as an output.
    pub fn add_output(&mut self, id: NodeId, complement: bool) -> Result<()> {
        let node = self.get_node(id).ok_or(AigError::NodeDoesNotExist(id))?;
        self.outputs.push(AigEdge::new(node, complement));
        Ok(())
    }

    /// Redirect the output at position `index` to another existing node.
    pub fn replace_output(&mut self, index: usize, id: NodeId, complement: bool) -> Result<()> {
        let node = self.get_node(id).ok_or(AigError::NodeDoesNotExist(id))?;
        let output = self.outputs.get_mut(index).ok_or(AigError::InvalidState(format!(
            "no output at position {}",
            index
        )))?;
        *output = AigEdge::new(node, complement);
        Ok(())
    }

    /// Remove a fanin from the outputs. Do not error if node refered by fanin does not exist
    /// or if fanin was not an output, simply returns None instead of the node.
    pub fn remove_output(&mut self, id: NodeId, complement: bool) -> Option<AigNodeRef> {
        let node = self.get_node(id)?;
        let output = AigEdge::new(node.clone(), complement);
        let len_before = self.outputs.len();
        self.outputs.retain(|out| *out != output);
        (self.outputs.len() < len_before).then_some(node)
    }

    /// Number of AND gates reachable from the outputs.
    pub fn and_count(&self) -> usize {
        let mut count = 0;
        let mut dfs = Dfs::from_outputs(self);
        while let Some(n) = dfs.next(self) {
            if n.borrow().is_and() {
                count += 1;
            }
        }
        count
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Length of the longest path from an input to an output, counted in AND gates.
    pub fn level_count(&self) -> Result<usize> {
        let mut levels: HashMap<NodeId, usize> = HashMap::new();
        for node in self.get_topological_sort()? {
            let node = node.borrow();
            let level = node
                .get_fanins()
                .iter()
                .map(|fanin| levels.get(&fanin.get_node_id()).copied().unwrap_or(0) + 1)
                .max()
                .unwrap_or(0);
            levels.insert(node.get_id(), level);
        }
        Ok(self
            .outputs
            .iter()
            .filter_map(|output| levels.get(&output.get_node_id()))
            .copied()
            .max()
            .unwrap_or(0))
    }

    /// Value of the output if the AIG has a single output pointing at the constant node.
    pub fn constant_output(&self) -> Option<bool> {
        match self.outputs.as_slice() {
            [output] => output.constant_value(),
            _ => None,
        }
    }

    /// The counterexample carried by this AIG, if any.
    pub fn model(&self) -> Option<&[bool]> {
        self.model.as_deref()
    }

    /// Attach a counterexample to this AIG, replacing the previous one.
    pub fn set_model(&mut self, model: Vec<bool>) {
        self.model = Some(model);
    }

    /// Drops the counterexample carried by this AIG.
    pub fn clear_model(&mut self) {
        self.model = None;
    }

    /// Simulates the AIG: `assignment[k]` is the value of the k-th input by increasing id.
    /// Returns the value of each output.
    pub fn eval(&self, assignment: &[bool]) -> Result<Vec<bool>> {
        let ids = self.get_inputs_id_sorted();
        if ids.len() != assignment.len() {
            return Err(AigError::InputCountMismatch {
                expected: ids.len(),
                got: assignment.len(),
            });
        }

        let mut values: HashMap<NodeId, bool> =
            ids.into_iter().zip(assignment.iter().copied()).collect();
        values.insert(0, false);

        for node in self.get_topological_sort()? {
            if let AigNode::And { id, fanin0, fanin1 } = node.borrow().deref() {
                let value = edge_value(fanin0, &values)? && edge_value(fanin1, &values)?;
                values.insert(*id, value);
            }
        }

        self.outputs
            .iter()
            .map(|output| edge_value(output, &values))
            .collect()
    }

    /// Returns a topological sort of the nodes reachable from the outputs
    /// (fanins always come before their fanouts), will error if a cycle is detected.
    pub fn get_topological_sort(&self) -> Result<Vec<AigNodeRef>> {
        let mut sort = Vec::new();
        let mut done = HashSet::new();
        let mut on_path = HashSet::new();

        for output in &self.outputs {
            let mut stack: Vec<(AigNodeRef, bool)> = vec![(output.get_node(), false)];

            while let Some((node, expanded)) = stack.pop() {
                let id = node.borrow().get_id();

                // Post order
                if expanded {
                    on_path.remove(&id);
                    done.insert(id);
                    sort.push(node);
                    continue;
                }

                if done.contains(&id) {
                    continue;
                }
                if !on_path.insert(id) {
                    return Err(AigError::InvalidState("found a cycle".to_string()));
                }

                stack.push((node.clone(), true));
                for fanin in node.borrow().get_fanins() {
                    let fanin_id = fanin.get_node_id();
                    if on_path.contains(&fanin_id) {
                        return Err(AigError::InvalidState("found a cycle".to_string()));
                    }
                    if !done.contains(&fanin_id) {
                        stack.push((fanin.get_node(), false));
                    }
                }
            }
        }

        Ok(sort)
    }

    /// Checking if the AIG structure is correct:
    /// - every live node is registered under its own id
    /// - only `False` has id 0
    /// - every edge (fanins and outputs) points at a node of this AIG
    /// - the graph is acyclic.
    pub fn check_integrity(&self) -> Result<()> {
        for (&id, weak_node) in &self.nodes {
            let Some(node) = weak_node.upgrade() else {
                continue;
            };
            let node = node.borrow();
            if node.get_id() != id {
                return Err(AigError::InvalidState("incoherent node id".to_string()));
            }
            if id == 0 && !node.is_false() {
                return Err(AigError::IdZeroButNotFalse);
            }
            for fanin in node.get_fanins() {
                self.check_edge_integrity(&fanin)?;
            }
        }

        for output in &self.outputs {
            self.check_edge_integrity(output)?;
        }

        self.get_topological_sort()?;

        Ok(())
    }

    fn check_edge_integrity(&self, edge: &AigEdge) -> Result<()> {
        let id = edge.get_node_id();
        match self.get_node(id) {
            Some(node) if Rc::ptr_eq(&node, &edge.node) => Ok(()),
            _ => Err(AigError::InvalidState(format!(
                "edge pointing at node {} which is not in the AIG anymore",
                id
            ))),
        }
    }
}

fn edge_value(edge: &AigEdge, values: &HashMap<NodeId, bool>) -> Result<bool> {
    let id = edge.get_node_id();
    values
        .get(&id)
        .map(|value| value ^ edge.get_complement())
        .ok_or(AigError::NodeDoesNotExist(id))
}

impl PartialEq for Aig {
    /// Compares the two AIGs. They are equal iff:
    /// - their inputs are equal (in terms of set)
    /// - their outputs are equal
    /// - their valid nodes are equal.
    ///
    /// Models are not compared.
    fn eq(&self, other: &Self) -> bool {
        let live = |aig: &Aig| {
            aig.nodes
                .iter()
                .filter_map(|(&id, weak)| Some((id, weak.upgrade()?)))
                .collect::<HashMap<NodeId, AigNodeRef>>()
        };
        self.outputs == other.outputs && self.inputs == other.inputs && live(self) == live(other)
    }
}
