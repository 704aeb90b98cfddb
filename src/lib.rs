//! # PolyKern - Exact Polyhedral Analysis Kernel
//!
//! The constraint-system engine behind a loop-optimizing compiler:
//! exact integer/rational linear algebra, symbolic polynomial algebra,
//! and polyhedra whose right-hand sides are polynomials in program
//! parameters. Given affine loop nests, subscript relations, and
//! schedule data, it answers the questions an optimizer must settle
//! before transforming code:
//!
//! - is a polyhedron empty or redundant, and what is its minimal
//!   description?
//! - can a unimodular change of loop basis orthogonalize array
//!   subscripts so each loop indexes a distinct stride?
//! - given two scheduled accesses, are they fused, and through how many
//!   levels?
//!
//! ## Architecture
//!
//! ```text
//! num (gcd, Rational) -> linalg (matrices, normal forms)
//!                     -> symbolic (monomials, polynomials, GCD)
//!                     -> polyhedral (Fourier-Motzkin, pruning, orthogonalize)
//! ```
//!
//! Each layer depends only on those below it. All arithmetic is exact;
//! operations that can overflow the machine word return an
//! [`error::ExactResult`] instead of truncating.
//!
//! ## Example
//!
//! ```rust
//! use polykern::prelude::*;
//!
//! // { (i, j) : 0 <= i <= 9, 0 <= j <= i }
//! let a = IntMatrix::from_rows(vec![
//!     vec![-1, 0],
//!     vec![1, 0],
//!     vec![0, -1],
//!     vec![-1, 1],
//! ]);
//! let mut p = IntegerPolyhedron::new(a, vec![0, 9, 0, 0]);
//! assert!(!p.is_empty().unwrap());
//! p.remove_variable(1).unwrap();   // project out j
//! p.prune_bounds().unwrap();
//! assert_eq!(p.num_vars(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod linalg;
pub mod num;
pub mod polyhedral;
pub mod schedule;
pub mod symbolic;
pub mod var;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::error::{ArithmeticOverflow, ExactResult};
    pub use crate::linalg::{IntMatrix, Matrix, MatrixRef, SmallSparseMatrix};
    pub use crate::num::Rational;
    pub use crate::polyhedral::{
        orthogonalize_references, AffineLoopNest, ArrayReference, IntegerPolyhedron,
        PartiallyOrderedSet, Polyhedron, SignOracle, SymbolicPolyhedron, ValueRange,
    };
    pub use crate::schedule::{MemoryAccess, Schedule};
    pub use crate::symbolic::{Coefficient, MPoly, Monomial, Term, Terms, Uninomial};
    pub use crate::var::{VarId, VarKind};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
