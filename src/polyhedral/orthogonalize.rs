//! Orthogonalizing change of loop basis for array references.
//!
//! Given references sharing one nest, choose a unimodular integer
//! transform of the loop variables so the composite subscript matrix
//! gets one stride per loop, rewrite the nest's bounds through the
//! transform, and prune the result.

use crate::error::ExactResult;
use crate::linalg::{matmul, matmul_nt, orthogonalize_with_pivots, IntMatrix};
use crate::polyhedral::loops::{AffineLoopNest, ArrayReference};
use crate::polyhedral::poset::PartiallyOrderedSet;
use std::sync::Arc;

/// Attempt a unimodular change of loop basis that orthogonalizes the
/// subscripts of `refs` (all sharing one nest).
///
/// Returns `None` when the composite subscript matrix was already
/// orthogonal or could not be improved; a no-op, not a failure.
/// Otherwise the new nest has its loop block right-multiplied by the
/// transform's transpose (and its bounds pruned), and every reference's
/// subscript matrix is rewritten as `K * S_i`.
pub fn orthogonalize_references(
    refs: &[ArrayReference],
    poset: &PartiallyOrderedSet,
) -> ExactResult<Option<Vec<ArrayReference>>> {
    assert!(!refs.is_empty(), "no references to orthogonalize");
    let nest = refs[0].loop_nest();
    for r in refs {
        assert!(
            Arc::ptr_eq(nest, r.loop_nest()),
            "references must share a loop nest"
        );
    }
    let num_loops = nest.num_loops();
    let total_dim: usize = refs.iter().map(ArrayReference::array_dim).sum();
    // S = [S_1 | S_2 | ...]
    let mut s = IntMatrix::zeros(num_loops, total_dim);
    let mut off = 0;
    for r in refs {
        s.submatrix_mut(0..num_loops, off..off + r.array_dim())
            .copy_from(&r.index_matrix().view());
        off += r.array_dim();
    }
    let (k, included) = orthogonalize_with_pivots(&s);
    if included.is_empty() {
        return Ok(None);
    }
    // With L = K'*J the bounds A*L <= b become (A*K')*J <= b: replace the
    // loop block of the constraint matrix by its product with K'.
    let a = nest.constraint_matrix();
    let rows = a.num_rows();
    let off_loops = nest.loop_block_offset();
    let mut ak = a.clone();
    let product = matmul_nt(&a.submatrix(0..rows, off_loops..a.num_cols()), &k);
    ak.submatrix_mut(0..rows, off_loops..a.num_cols())
        .copy_from(&product.view());
    let mut new_nest = AffineLoopNest::new(ak, nest.symbols().to_vec());
    new_nest.prune_bounds(poset)?;
    let shared = new_nest.shared();
    // S'*L = (K*S)'*J: each reference picks up its block of K*S.
    let ks = matmul(&k, &s);
    let mut out = Vec::with_capacity(refs.len());
    let mut off = 0;
    for r in refs {
        let dim = r.array_dim();
        let index = ks.submatrix(0..num_loops, off..off + dim).to_owned();
        out.push(ArrayReference::new(r.array(), shared.clone(), index));
        off += dim;
    }
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyhedral::poset::ValueRange;
    use crate::var::{VarId, VarKind};

    fn poset_nonneg() -> PartiallyOrderedSet {
        let mut poset = PartiallyOrderedSet::new();
        poset.assume_range(0, ValueRange::non_negative());
        poset
    }

    /// 0 <= i <= N-1, 0 <= j <= N-1.
    fn square_nest() -> Arc<AffineLoopNest> {
        let a = IntMatrix::from_rows(vec![
            vec![0, 0, 1, 0],
            vec![-1, 1, -1, 0],
            vec![0, 0, 0, 1],
            vec![-1, 1, 0, -1],
        ]);
        AffineLoopNest::new(a, vec![VarId::new(VarKind::Constant, 0)]).shared()
    }

    #[test]
    fn test_skewed_subscripts_get_rebased() {
        // C[i + j, j]: subscript columns (1, 1) and (0, 1).
        let nest = square_nest();
        let r = ArrayReference::new(
            VarId::new(VarKind::Memory, 0),
            nest,
            IntMatrix::from_rows(vec![vec![1, 0], vec![1, 1]]),
        );
        let out = orthogonalize_references(&[r], &poset_nonneg())
            .unwrap()
            .expect("skewed basis should improve");
        assert_eq!(out.len(), 1);
        let idx = out[0].index_matrix();
        // every subscript column now has a single stride
        for c in 0..idx.num_cols() {
            let nz = (0..idx.num_rows()).filter(|&r| idx[(r, c)] != 0).count();
            assert_eq!(nz, 1);
        }
        // the rewritten nest still has two loops and the same symbol table
        let new_nest = out[0].loop_nest();
        assert_eq!(new_nest.num_loops(), 2);
        assert_eq!(new_nest.num_symbols(), 1);
        assert!(new_nest.num_bounds() >= 4);
    }

    #[test]
    fn test_orthogonal_subscripts_are_a_noop() {
        let nest = square_nest();
        let r = ArrayReference::new(
            VarId::new(VarKind::Memory, 0),
            nest,
            IntMatrix::identity(2),
        );
        let out = orthogonalize_references(&[r], &poset_nonneg()).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn test_two_references_share_new_nest() {
        let nest = square_nest();
        let r1 = ArrayReference::new(
            VarId::new(VarKind::Memory, 0),
            nest.clone(),
            IntMatrix::from_rows(vec![vec![1, 0], vec![1, 1]]),
        );
        let r2 = ArrayReference::new(
            VarId::new(VarKind::Memory, 1),
            nest,
            IntMatrix::from_rows(vec![vec![1], vec![1]]),
        );
        let out = orthogonalize_references(&[r1, r2], &poset_nonneg())
            .unwrap()
            .expect("skewed basis should improve");
        assert_eq!(out.len(), 2);
        assert!(Arc::ptr_eq(out[0].loop_nest(), out[1].loop_nest()));
        assert_eq!(out[0].array_dim(), 2);
        assert_eq!(out[1].array_dim(), 1);
    }
}
