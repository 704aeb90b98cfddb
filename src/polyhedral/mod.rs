//! The polyhedra engine: constraint systems with symbolic right-hand
//! sides, loop nests, and the orthogonalizing change of basis.

pub mod loops;
pub mod orthogonalize;
pub mod polyhedron;
pub mod poset;

pub use loops::{AffineLoopNest, ArrayReference};
pub use orthogonalize::orthogonalize_references;
pub use polyhedron::{BoundValue, IntegerPolyhedron, Polyhedron, SymbolicPolyhedron};
pub use poset::{IntOracle, Order, PartiallyOrderedSet, SignOracle, ValueRange};
