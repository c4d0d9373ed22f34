pub mod aig;
pub mod cnf;
pub mod miter;
pub mod prove;

// Re-exporting symbols and modules.
pub use aig::dfs;
pub use aig::{Aig, AigEdge, AigError, AigNode, AigNodeRef, NodeId, Result};
pub use prove::{Disposition, MiterProver, Proof, ProveParams};
