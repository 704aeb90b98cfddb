//! Affine loop nests and the array references that index into them.
//!
//! A nest's constraint matrix has one row per bound, laid out as
//! `[constant | symbols | loop variables]`, each row read as
//! `c0 + sum_j a_j*s_j + sum_k c_k*i_k >= 0`. Nests are shared between
//! the array references of one loop through an atomic refcount and are
//! immutable once shared.

use crate::error::ExactResult;
use crate::linalg::IntMatrix;
use crate::polyhedral::polyhedron::SymbolicPolyhedron;
use crate::polyhedral::poset::PartiallyOrderedSet;
use crate::symbolic::{MPoly, Term};
use crate::var::VarId;
use std::sync::Arc;

/// An affine loop nest: integer bound rows over a symbol prefix and a
/// loop-variable suffix, with column 0 holding the literal constant.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineLoopNest {
    a: IntMatrix,
    symbols: Vec<VarId>,
}

impl AffineLoopNest {
    /// Build a nest from its constraint matrix and symbol table. The
    /// matrix must have a column for the constant, one per symbol, and
    /// at least the remaining columns as loop variables.
    pub fn new(a: IntMatrix, symbols: Vec<VarId>) -> Self {
        assert!(a.num_cols() >= 1 + symbols.len(), "missing loop columns");
        Self { a, symbols }
    }

    /// The constraint matrix.
    pub fn constraint_matrix(&self) -> &IntMatrix {
        &self.a
    }

    /// The symbol table for the symbol columns.
    pub fn symbols(&self) -> &[VarId] {
        &self.symbols
    }

    /// Number of program-parameter symbols.
    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Number of loop induction variables.
    pub fn num_loops(&self) -> usize {
        self.a.num_cols() - 1 - self.symbols.len()
    }

    /// Column index where the loop-variable block starts.
    pub fn loop_block_offset(&self) -> usize {
        1 + self.symbols.len()
    }

    /// Number of bound rows.
    pub fn num_bounds(&self) -> usize {
        self.a.num_rows()
    }

    /// Lower the bounds into a polyhedron over the loop variables, with
    /// the constant and symbol columns folded into polynomial
    /// right-hand sides (symbol column `j` becomes polynomial variable
    /// `j`).
    pub fn bounds_polyhedron(
        &self,
        poset: PartiallyOrderedSet,
    ) -> ExactResult<SymbolicPolyhedron> {
        let num_loops = self.num_loops();
        let off = self.loop_block_offset();
        let m = self.a.num_rows();
        let mut ineq = IntMatrix::zeros(m, num_loops);
        let mut bounds = Vec::with_capacity(m);
        for r in 0..m {
            for k in 0..num_loops {
                ineq[(r, k)] = -self.a[(r, off + k)];
            }
            let mut b = MPoly::constant(self.a[(r, 0)]);
            for j in 0..self.symbols.len() {
                let c = self.a[(r, 1 + j)];
                if c != 0 {
                    b.add_term(Term::new(c, crate::symbolic::Monomial::var(j as u32)))?;
                }
            }
            bounds.push(b);
        }
        Ok(SymbolicPolyhedron::new(ineq, bounds, poset))
    }

    /// Drop bound rows that the remaining rows already imply, using the
    /// symbol partial order. Returns whether anything was removed.
    pub fn prune_bounds(&mut self, poset: &PartiallyOrderedSet) -> ExactResult<bool> {
        let mut polyhedron = self.bounds_polyhedron(poset.clone())?;
        let removed = polyhedron.prune_bounds_returning_removed()?;
        for &r in removed.iter().rev() {
            self.a.erase_row(r);
        }
        Ok(!removed.is_empty())
    }

    /// Share the nest. Mutation after this point is forbidden; clone
    /// first instead.
    pub fn shared(self) -> Arc<AffineLoopNest> {
        Arc::new(self)
    }
}

/// One array reference inside a loop nest: a shared nest plus an index
/// matrix whose columns are the per-dimension loop coefficients.
#[derive(Debug, Clone)]
pub struct ArrayReference {
    array: VarId,
    loop_nest: Arc<AffineLoopNest>,
    index_matrix: IntMatrix,
}

impl ArrayReference {
    /// Build a reference. The index matrix is `num_loops x array_dim`.
    pub fn new(array: VarId, loop_nest: Arc<AffineLoopNest>, index_matrix: IntMatrix) -> Self {
        assert_eq!(index_matrix.num_rows(), loop_nest.num_loops());
        Self {
            array,
            loop_nest,
            index_matrix,
        }
    }

    /// The identifier of the array being indexed.
    pub fn array(&self) -> VarId {
        self.array
    }

    /// The shared loop nest.
    pub fn loop_nest(&self) -> &Arc<AffineLoopNest> {
        &self.loop_nest
    }

    /// The index (subscript) matrix.
    pub fn index_matrix(&self) -> &IntMatrix {
        &self.index_matrix
    }

    /// Number of array dimensions.
    pub fn array_dim(&self) -> usize {
        self.index_matrix.num_cols()
    }

    /// Number of loops in the shared nest.
    pub fn num_loops(&self) -> usize {
        self.loop_nest.num_loops()
    }
}
