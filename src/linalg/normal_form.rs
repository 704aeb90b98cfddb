//! Integer normal forms: Hermite reduction, null spaces, and
//! orthogonalizing bases.
//!
//! Everything here is exact. Eliminations are fraction-free (gcd-scaled
//! row combinations) so coefficients stay in ℤ; the Gram–Schmidt pass
//! runs on checked rationals and clears denominators at the end.

use crate::error::ExactResult;
use crate::linalg::{vector_gcd, IntMatrix};
use crate::num::{gcd, lcm, Rational};

/// Hermite normal form. Returns `(H, U)` with `H = U * A`, `U`
/// unimodular, pivots positive, and entries above each pivot reduced
/// modulo it.
pub fn hermite_normal_form(a: &IntMatrix) -> (IntMatrix, IntMatrix) {
    let m = a.num_rows();
    let n = a.num_cols();
    let mut h = a.clone();
    let mut u = IntMatrix::identity(m);
    let mut row = 0;
    for col in 0..n {
        if row == m {
            break;
        }
        // Euclid on the rows at or below `row` until one non-zero remains.
        loop {
            let mut pivot = None;
            let mut live = 0;
            for r in row..m {
                if h[(r, col)] != 0 {
                    live += 1;
                    if pivot.map_or(true, |p: usize| h[(r, col)].abs() < h[(p, col)].abs()) {
                        pivot = Some(r);
                    }
                }
            }
            let Some(p) = pivot else { break };
            if live == 1 {
                h.swap_rows(p, row);
                u.swap_rows(p, row);
                break;
            }
            for r in row..m {
                if r != p && h[(r, col)] != 0 {
                    let q = h[(r, col)] / h[(p, col)];
                    row_sub_scaled(&mut h, r, p, q);
                    row_sub_scaled(&mut u, r, p, q);
                }
            }
        }
        if h[(row, col)] == 0 {
            continue;
        }
        if h[(row, col)] < 0 {
            row_negate(&mut h, row);
            row_negate(&mut u, row);
        }
        // Reduce the entries above the pivot into [0, pivot).
        let piv = h[(row, col)];
        for r in 0..row {
            let q = h[(r, col)].div_euclid(piv);
            if q != 0 {
                row_sub_scaled(&mut h, r, row, q);
                row_sub_scaled(&mut u, r, row, q);
            }
        }
        row += 1;
    }
    (h, u)
}

/// Determinant of a square integer matrix, by fraction-free (Bareiss)
/// elimination.
pub fn determinant(a: &IntMatrix) -> i64 {
    let n = a.num_rows();
    assert_eq!(n, a.num_cols(), "determinant of non-square matrix");
    if n == 0 {
        return 1;
    }
    let mut m = a.clone();
    let mut sign = 1i64;
    let mut prev = 1i64;
    for k in 0..n - 1 {
        if m[(k, k)] == 0 {
            let Some(p) = (k + 1..n).find(|&r| m[(r, k)] != 0) else {
                return 0;
            };
            m.swap_rows(k, p);
            sign = -sign;
        }
        for i in k + 1..n {
            for j in k + 1..n {
                m[(i, j)] = (m[(i, j)] * m[(k, k)] - m[(i, k)] * m[(k, j)]) / prev;
            }
            m[(i, k)] = 0;
        }
        prev = m[(k, k)];
    }
    sign * m[(n - 1, n - 1)]
}

/// Whether a square integer matrix has determinant `±1`.
pub fn is_unimodular(a: &IntMatrix) -> bool {
    determinant(a).abs() == 1
}

/// Rows spanning the right kernel of `A` over ℚ, with integer entries.
///
/// Computed by gcd-scaled row reduction of `[Aᵀ | I]`: rows whose left
/// block vanishes carry kernel vectors in the right block. Each returned
/// row satisfies `A * vᵀ = 0` and has unit content.
pub fn null_space(a: &IntMatrix) -> IntMatrix {
    let n = a.num_cols();
    let m = a.num_rows();
    let mut b = a.transpose();
    let mut w = IntMatrix::identity(n);
    let mut rank = 0;
    for col in 0..m {
        if rank == n {
            break;
        }
        let Some(p) = (rank..n).find(|&r| b[(r, col)] != 0) else {
            continue;
        };
        b.swap_rows(p, rank);
        w.swap_rows(p, rank);
        let piv = b[(rank, col)];
        for i in rank + 1..n {
            let c = b[(i, col)];
            if c == 0 {
                continue;
            }
            let g = gcd(piv, c);
            let (mi, mr) = (piv / g, c / g);
            for j in 0..m {
                b[(i, j)] = mi * b[(i, j)] - mr * b[(rank, j)];
            }
            for j in 0..n {
                w[(i, j)] = mi * w[(i, j)] - mr * w[(rank, j)];
            }
            let g2 = gcd(vector_gcd(b.row(i)), vector_gcd(w.row(i)));
            if g2 > 1 {
                for x in b.row_mut(i) {
                    *x /= g2;
                }
                for x in w.row_mut(i) {
                    *x /= g2;
                }
            }
        }
        rank += 1;
    }
    let mut out = IntMatrix::zeros(n - rank, n);
    for (i, r) in (rank..n).enumerate() {
        out.row_mut(i).copy_from_slice(w.row(r));
        crate::linalg::normalize_by_gcd(out.row_mut(i));
    }
    out
}

/// Gram–Schmidt over ℚ with denominators cleared per row. Row 0 is
/// gcd-normalized; distinct result rows are mutually ℚ-orthogonal.
pub fn orthogonalize(mut a: IntMatrix) -> ExactResult<IntMatrix> {
    if a.num_cols() < 2 || a.num_rows() == 0 {
        return Ok(a);
    }
    crate::linalg::normalize_by_gcd(a.row_mut(0));
    if a.num_rows() == 1 {
        return Ok(a);
    }
    let ncol = a.num_cols();
    let mut buff = vec![Rational::zero(); ncol];
    for i in 1..a.num_rows() {
        for (k, slot) in buff.iter_mut().enumerate() {
            *slot = Rational::from(a[(i, k)]);
        }
        for j in 0..i {
            let mut n = 0i64;
            let mut d = 0i64;
            for k in 0..ncol {
                n += a[(i, k)] * a[(j, k)];
                d += a[(j, k)] * a[(j, k)];
            }
            if d == 0 {
                continue;
            }
            for (k, slot) in buff.iter_mut().enumerate() {
                *slot = slot.checked_sub(Rational::new(a[(j, k)] * n, d))?;
            }
        }
        let mut lm = 1i64;
        for slot in &buff {
            lm = lcm(lm, slot.denom());
        }
        for (k, slot) in buff.iter().enumerate() {
            a[(i, k)] = slot.numer() * (lm / slot.denom());
        }
    }
    Ok(a)
}

/// Unimodular column pivoting. Returns `(K, included)` where `K` is a
/// square unimodular matrix over the row space of `s` and `included`
/// lists the columns of `K * s` that were reduced to a single non-zero
/// entry, each in a distinct row.
///
/// An empty `included` means the basis could not be improved (in
/// particular, `K` stayed the identity); callers treat that as a no-op.
pub fn orthogonalize_with_pivots(s: &IntMatrix) -> (IntMatrix, Vec<usize>) {
    let n = s.num_rows();
    let mut a = s.clone();
    let mut k = IntMatrix::identity(n);
    let mut used = vec![false; n];
    let mut included = Vec::new();
    for j in 0..s.num_cols() {
        // Euclid among the unused rows until column j has one survivor.
        let pivot = loop {
            let mut pivot = None;
            let mut live = 0;
            for r in 0..n {
                if !used[r] && a[(r, j)] != 0 {
                    live += 1;
                    if pivot.map_or(true, |p: usize| a[(r, j)].abs() < a[(p, j)].abs()) {
                        pivot = Some(r);
                    }
                }
            }
            let Some(p) = pivot else { break None };
            if live == 1 {
                break Some(p);
            }
            for r in 0..n {
                if r != p && !used[r] && a[(r, j)] != 0 {
                    let q = a[(r, j)] / a[(p, j)];
                    row_sub_scaled(&mut a, r, p, q);
                    row_sub_scaled(&mut k, r, p, q);
                }
            }
        };
        let Some(p) = pivot else { continue };
        // Entries in already-pivoted rows must divide out exactly, or the
        // column cannot get its own stride.
        let piv = a[(p, j)];
        if (0..n).any(|u| used[u] && a[(u, j)] % piv != 0) {
            continue;
        }
        for u in 0..n {
            if used[u] && a[(u, j)] != 0 {
                let q = a[(u, j)] / piv;
                row_sub_scaled(&mut a, u, p, q);
                row_sub_scaled(&mut k, u, p, q);
            }
        }
        used[p] = true;
        included.push(j);
    }
    if k == IntMatrix::identity(n) {
        return (k, Vec::new());
    }
    (k, included)
}

/// Solve `A x = b` over the integers via the Hermite normal form.
/// Returns `None` when no integer solution exists. Free variables are
/// fixed at zero.
pub fn solve_diophantine(a: &IntMatrix, b: &[i64]) -> Option<Vec<i64>> {
    let m = a.num_rows();
    let n = a.num_cols();
    assert_eq!(m, b.len());
    let (h, u) = hermite_normal_form(a);
    // c = U * b
    let mut c = vec![0i64; m];
    for (r, slot) in c.iter_mut().enumerate() {
        *slot = (0..m).map(|j| u[(r, j)] * b[j]).sum();
    }
    // Pivot column of each echelon row.
    let pivots: Vec<Option<usize>> = (0..m)
        .map(|r| (0..n).find(|&j| h[(r, j)] != 0))
        .collect();
    let mut x = vec![0i64; n];
    for r in (0..m).rev() {
        match pivots[r] {
            None => {
                if c[r] != 0 {
                    return None;
                }
            }
            Some(jp) => {
                let mut rhs = c[r];
                for j in jp + 1..n {
                    rhs -= h[(r, j)] * x[j];
                }
                if rhs % h[(r, jp)] != 0 {
                    return None;
                }
                x[jp] = rhs / h[(r, jp)];
            }
        }
    }
    Some(x)
}

fn row_sub_scaled(m: &mut IntMatrix, dst: usize, src: usize, q: i64) {
    for j in 0..m.num_cols() {
        m[(dst, j)] -= q * m[(src, j)];
    }
}

fn row_negate(m: &mut IntMatrix, r: usize) {
    for x in m.row_mut(r) {
        *x = -*x;
    }
}
