//! Provides a DFS visitor to allow simple AIG traversal.
//!
//! See [`Dfs`] for details.

use std::collections::HashSet;

use crate::{Aig, AigNodeRef, NodeId};

/// A simple DFS visitor.
///
/// Nodes are yielded in preorder. You can:
/// - start a DFS from a node using [`from_node`]
/// - or visit the whole cone of the outputs using [`from_outputs`].
///
/// The visitor only stores ids, so the AIG can still be borrowed mutably between two calls
/// to [`next`]. Ids that no longer resolve to a live node are skipped.
///
/// [`from_node`]: Dfs::from_node
/// [`from_outputs`]: Dfs::from_outputs
/// [`next`]: Dfs::next
///
/// ```rust
/// use mutaig_prove::{Aig, dfs::Dfs};
/// let aig = Aig::new();
/// let mut dfs = Dfs::from_outputs(&aig);
/// while let Some(noderef) = dfs.next(&aig) {
///     // ...
/// }
/// ```
pub struct Dfs {
    /// Every id on the stack is already in `seen` and has not been yielded yet.
    stack: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl Dfs {
    /// Create a DFS browsing the fanin cone of `start`.
    pub fn from_node(start: AigNodeRef) -> Self {
        let start_id = start.borrow().get_id();
        Dfs {
            stack: vec![start_id],
            seen: HashSet::from([start_id]),
        }
    }

    /// Create a DFS from the outputs of the given AIG.
    /// Outputs are started in reverse declaration order, so the cone of the first output comes first.
    pub fn from_outputs(aig: &Aig) -> Self {
        let mut dfs = Dfs {
            stack: Vec::new(),
            seen: HashSet::new(),
        };
        for output in aig.get_outputs().iter().rev() {
            let id = output.get_node_id();
            if dfs.seen.insert(id) {
                dfs.stack.push(id);
            }
        }
        dfs
    }

    /// Yield the next node of the DFS, or None if it is done.
    pub fn next(&mut self, aig: &Aig) -> Option<AigNodeRef> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = aig.get_node(id) else {
                continue;
            };
            for child in node.borrow().get_fanins() {
                let child_id = child.get_node_id();
                if self.seen.insert(child_id) {
                    self.stack.push(child_id);
                }
            }
            return Some(node);
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AigEdge, AigNode};

    #[test]
    fn from_node_test() {
        let mut aig = Aig::new();
        let n0 = aig.add_node(AigNode::False).unwrap();
        let n1 = aig.add_node(AigNode::Input(1)).unwrap();
        let n2 = aig
            .new_and(
                2,
                AigEdge::new(n0.clone(), false),
                AigEdge::new(n1.clone(), false),
            )
            .unwrap();

        let mut dfs = Dfs::from_node(n2.clone());
        assert_eq!(dfs.next(&aig).unwrap(), n2);
        let mut rest = vec![
            dfs.next(&aig).unwrap().borrow().get_id(),
            dfs.next(&aig).unwrap().borrow().get_id(),
        ];
        rest.sort();
        assert_eq!(rest, vec![0, 1]);
        assert!(dfs.next(&aig).is_none());
        assert!(dfs.next(&aig).is_none());
    }

    #[test]
    fn from_outputs_visits_shared_nodes_once() {
        //   A3  A4
        //  / \ / \
        // I1  I2  I1
        let mut aig = Aig::new();
        let i1 = aig.add_node(AigNode::Input(1)).unwrap();
        let i2 = aig.add_node(AigNode::Input(2)).unwrap();
        aig.new_and(3, AigEdge::new(i1.clone(), false), AigEdge::new(i2.clone(), false))
            .unwrap();
        aig.new_and(4, AigEdge::new(i2.clone(), true), AigEdge::new(i1.clone(), true))
            .unwrap();
        aig.add_output(3, false).unwrap();
        aig.add_output(4, true).unwrap();

        let mut dfs = Dfs::from_outputs(&aig);
        let mut ids = Vec::new();
        while let Some(n) = dfs.next(&aig) {
            ids.push(n.borrow().get_id());
        }
        assert_eq!(ids[0], 3);
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn repeated_node() {
        let mut aig = Aig::new();
        let n0 = aig.add_node(AigNode::Input(1)).unwrap();
        let n1 = aig.add_node(AigNode::Input(1)).unwrap();
        let n2 = aig
            .new_and(2, AigEdge::new(n0.clone(), false), AigEdge::new(n1.clone(), true))
            .unwrap();
        let mut dfs = Dfs::from_node(n2.clone());
        assert_eq!(dfs.next(&aig).unwrap(), n2);
        assert_eq!(dfs.next(&aig).unwrap(), n1);
        assert!(dfs.next(&aig).is_none());
    }
}
