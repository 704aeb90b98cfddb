//! Polyhedra with integer coefficient matrices and exact (integer or
//! polynomial) right-hand sides.
//!
//! A polyhedron is the set `{ x : A*x <= b, E*x = q }`. Variables are
//! eliminated by Fourier–Motzkin (or a Gaussian step when an equality
//! covers the column), redundant rows are pruned by testing the negated
//! row for emptiness, and all sign questions go through the injected
//! [`SignOracle`].

use crate::error::{ArithmeticOverflow, ExactResult};
use crate::linalg::{vector_gcd, IntMatrix};
use crate::num::gcd;
use crate::polyhedral::poset::{IntOracle, PartiallyOrderedSet, SignOracle};
use crate::symbolic::{MPoly, Term};
use std::fmt;

/// A right-hand-side value: a machine integer or a polynomial in the
/// program parameters.
pub trait BoundValue: Clone + PartialEq + fmt::Debug {
    /// Lift an integer constant.
    fn from_int(v: i64) -> Self;
    /// Whether the value is zero.
    fn is_zero(&self) -> bool;
    /// Checked addition.
    fn checked_add(&self, rhs: &Self) -> ExactResult<Self>;
    /// Checked subtraction.
    fn checked_sub(&self, rhs: &Self) -> ExactResult<Self>;
    /// Checked scaling by an integer.
    fn checked_mul_int(&self, k: i64) -> ExactResult<Self>;
    /// Checked addition of an integer constant.
    fn add_int(&self, k: i64) -> ExactResult<Self>;
    /// Division by a positive integer when the row content is divided
    /// out: floor for integers (a valid integer tightening), exact or
    /// nothing for polynomials.
    fn div_int(&self, g: i64) -> Option<Self>;
    /// In-place negation.
    fn negate(&mut self);
}

impl BoundValue for i64 {
    fn from_int(v: i64) -> Self {
        v
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn checked_add(&self, rhs: &Self) -> ExactResult<Self> {
        i64::checked_add(*self, *rhs).ok_or(ArithmeticOverflow)
    }

    fn checked_sub(&self, rhs: &Self) -> ExactResult<Self> {
        i64::checked_sub(*self, *rhs).ok_or(ArithmeticOverflow)
    }

    fn checked_mul_int(&self, k: i64) -> ExactResult<Self> {
        i64::checked_mul(*self, k).ok_or(ArithmeticOverflow)
    }

    fn add_int(&self, k: i64) -> ExactResult<Self> {
        i64::checked_add(*self, k).ok_or(ArithmeticOverflow)
    }

    fn div_int(&self, g: i64) -> Option<Self> {
        Some(self.div_euclid(g))
    }

    fn negate(&mut self) {
        *self = -*self;
    }
}

impl BoundValue for MPoly {
    fn from_int(v: i64) -> Self {
        MPoly::constant(v)
    }

    fn is_zero(&self) -> bool {
        MPoly::is_zero(self)
    }

    fn checked_add(&self, rhs: &Self) -> ExactResult<Self> {
        MPoly::checked_add(self, rhs)
    }

    fn checked_sub(&self, rhs: &Self) -> ExactResult<Self> {
        MPoly::checked_sub(self, rhs)
    }

    fn checked_mul_int(&self, k: i64) -> ExactResult<Self> {
        self.mul_coef(&k)
    }

    fn add_int(&self, k: i64) -> ExactResult<Self> {
        let mut out = self.clone();
        out.add_term(Term::constant(k))?;
        Ok(out)
    }

    fn div_int(&self, g: i64) -> Option<Self> {
        if self.terms().iter().any(|t| t.coefficient % g != 0) {
            return None;
        }
        // exact by the check above
        self.div_coef_exact(&g).ok()
    }

    fn negate(&mut self) {
        MPoly::negate(self);
    }
}

/// A conjunction of inequalities `A*x <= b` and equalities `E*x = q`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron<C, O> {
    a: IntMatrix,
    b: Vec<C>,
    e: IntMatrix,
    q: Vec<C>,
    oracle: O,
}

/// A polyhedron with concrete integer bounds.
pub type IntegerPolyhedron = Polyhedron<i64, IntOracle>;
/// A polyhedron whose bounds are polynomials in program parameters,
/// with sign queries deferred to a [`PartiallyOrderedSet`].
pub type SymbolicPolyhedron = Polyhedron<MPoly, PartiallyOrderedSet>;

impl IntegerPolyhedron {
    /// `{ x : A*x <= b }` over integer bounds.
    pub fn new(a: IntMatrix, b: Vec<i64>) -> Self {
        Self::with_oracle(a, b, IntOracle)
    }

    /// `{ x : A*x <= b, E*x = q }` over integer bounds.
    pub fn new_with_equalities(a: IntMatrix, b: Vec<i64>, e: IntMatrix, q: Vec<i64>) -> Self {
        Self::with_oracle_eq(a, b, e, q, IntOracle)
    }

    /// Whether an integer point satisfies every constraint.
    pub fn contains(&self, x: &[i64]) -> bool {
        assert_eq!(x.len(), self.num_vars());
        let dot = |row: &[i64]| -> i64 { row.iter().zip(x).map(|(a, v)| a * v).sum() };
        (0..self.a.num_rows()).all(|r| dot(self.a.row(r)) <= self.b[r])
            && (0..self.e.num_rows()).all(|r| dot(self.e.row(r)) == self.q[r])
    }
}

impl SymbolicPolyhedron {
    /// `{ x : A*x <= b }` with symbolic bounds ordered by `poset`.
    pub fn new(a: IntMatrix, b: Vec<MPoly>, poset: PartiallyOrderedSet) -> Self {
        Self::with_oracle(a, b, poset)
    }

    /// `{ x : A*x <= b, E*x = q }` with symbolic bounds.
    pub fn new_with_equalities(
        a: IntMatrix,
        b: Vec<MPoly>,
        e: IntMatrix,
        q: Vec<MPoly>,
        poset: PartiallyOrderedSet,
    ) -> Self {
        Self::with_oracle_eq(a, b, e, q, poset)
    }
}

impl<C: BoundValue, O: SignOracle<C> + Clone> Polyhedron<C, O> {
    /// Build an inequality-only polyhedron around an oracle.
    pub fn with_oracle(a: IntMatrix, b: Vec<C>, oracle: O) -> Self {
        assert_eq!(a.num_rows(), b.len());
        let n = a.num_cols();
        Self {
            a,
            b,
            e: IntMatrix::zeros(0, n),
            q: Vec::new(),
            oracle,
        }
    }

    /// Build a polyhedron with equalities around an oracle.
    pub fn with_oracle_eq(a: IntMatrix, b: Vec<C>, e: IntMatrix, q: Vec<C>, oracle: O) -> Self {
        assert_eq!(a.num_rows(), b.len());
        assert_eq!(e.num_rows(), q.len());
        assert_eq!(a.num_cols(), e.num_cols());
        Self { a, b, e, q, oracle }
    }

    /// Number of variables (columns).
    pub fn num_vars(&self) -> usize {
        self.a.num_cols()
    }

    /// Number of inequality rows.
    pub fn num_inequalities(&self) -> usize {
        self.a.num_rows()
    }

    /// Number of equality rows.
    pub fn num_equalities(&self) -> usize {
        self.e.num_rows()
    }

    /// The inequality coefficient matrix.
    pub fn inequality_matrix(&self) -> &IntMatrix {
        &self.a
    }

    /// The inequality bounds.
    pub fn bounds(&self) -> &[C] {
        &self.b
    }

    /// The equality coefficient matrix.
    pub fn equality_matrix(&self) -> &IntMatrix {
        &self.e
    }

    /// The equality right-hand sides.
    pub fn equality_bounds(&self) -> &[C] {
        &self.q
    }

    /// Eliminate coordinate `i`, projecting onto the rest.
    ///
    /// When an equality row covers the column it substitutes the
    /// variable out (a Gaussian step with gcd scaling); otherwise the
    /// inequalities are combined pairwise by Fourier–Motzkin.
    pub fn remove_variable(&mut self, i: usize) -> ExactResult<()> {
        assert!(i < self.num_vars());
        if let Some(r) = (0..self.e.num_rows()).find(|&r| self.e[(r, i)] != 0) {
            self.substitute_equality(r, i)?;
        } else {
            self.fourier_motzkin(i)?;
        }
        self.a.erase_col(i);
        self.e.erase_col(i);
        Ok(())
    }

    fn substitute_equality(&mut self, r: usize, i: usize) -> ExactResult<()> {
        let n = self.num_vars();
        let piv = self.e[(r, i)];
        let piv_abs = piv.abs();
        let piv_sign = piv.signum();
        for k in 0..self.a.num_rows() {
            let c = self.a[(k, i)];
            if c == 0 {
                continue;
            }
            let g = gcd(piv, c);
            let mk = piv_abs / g;
            let mr = (c / g) * piv_sign;
            for j in 0..n {
                self.a[(k, j)] = mk * self.a[(k, j)] - mr * self.e[(r, j)];
            }
            debug_assert_eq!(self.a[(k, i)], 0);
            let scaled_q = self.q[r].checked_mul_int(mr)?;
            self.b[k] = self.b[k].checked_mul_int(mk)?.checked_sub(&scaled_q)?;
            self.normalize_inequality(k);
        }
        for k in 0..self.e.num_rows() {
            if k == r {
                continue;
            }
            let c = self.e[(k, i)];
            if c == 0 {
                continue;
            }
            let g = gcd(piv, c);
            let mk = piv_abs / g;
            let mr = (c / g) * piv_sign;
            for j in 0..n {
                self.e[(k, j)] = mk * self.e[(k, j)] - mr * self.e[(r, j)];
            }
            let scaled_q = self.q[r].checked_mul_int(mr)?;
            self.q[k] = self.q[k].checked_mul_int(mk)?.checked_sub(&scaled_q)?;
        }
        self.e.erase_row(r);
        self.q.remove(r);
        Ok(())
    }

    fn fourier_motzkin(&mut self, i: usize) -> ExactResult<()> {
        let n = self.num_vars();
        let mut pos = Vec::new();
        let mut neg = Vec::new();
        let mut zero = Vec::new();
        for k in 0..self.a.num_rows() {
            match self.a[(k, i)].signum() {
                1 => pos.push(k),
                -1 => neg.push(k),
                _ => zero.push(k),
            }
        }
        let mut rows: Vec<Vec<i64>> = Vec::with_capacity(zero.len() + pos.len() * neg.len());
        let mut bounds: Vec<C> = Vec::with_capacity(rows.capacity());
        for &k in &zero {
            rows.push(self.a.row(k).to_vec());
            bounds.push(self.b[k].clone());
        }
        for &p in &pos {
            for &ng in &neg {
                let cp = self.a[(p, i)];
                let cn = self.a[(ng, i)];
                let g = gcd(cp, cn);
                let mp = (-cn) / g;
                let mn = cp / g;
                let mut row = vec![0i64; n];
                for (j, slot) in row.iter_mut().enumerate() {
                    *slot = mp * self.a[(p, j)] + mn * self.a[(ng, j)];
                }
                debug_assert_eq!(row[i], 0);
                let mut bound = self.b[p]
                    .checked_mul_int(mp)?
                    .checked_add(&self.b[ng].checked_mul_int(mn)?)?;
                let g = vector_gcd(&row);
                if g > 1 {
                    if let Some(nb) = bound.div_int(g) {
                        for x in &mut row {
                            *x /= g;
                        }
                        bound = nb;
                    }
                }
                rows.push(row);
                bounds.push(bound);
            }
        }
        let mut a = IntMatrix::zeros(rows.len(), n);
        for (k, row) in rows.iter().enumerate() {
            a.row_mut(k).copy_from_slice(row);
        }
        self.a = a;
        self.b = bounds;
        Ok(())
    }

    fn normalize_inequality(&mut self, k: usize) {
        let g = vector_gcd(self.a.row(k));
        if g > 1 {
            if let Some(nb) = self.b[k].div_int(g) {
                for x in self.a.row_mut(k) {
                    *x /= g;
                }
                self.b[k] = nb;
            }
        }
    }

    /// Whether the polyhedron provably contains no integer point.
    /// Conservative: `false` when the oracle cannot decide.
    pub fn is_empty(&self) -> ExactResult<bool> {
        if self.check_trivially_infeasible()? {
            return Ok(true);
        }
        let mut p = self.clone();
        while p.num_vars() > 0 {
            p.remove_variable(0)?;
            if p.check_trivially_infeasible()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn check_trivially_infeasible(&self) -> ExactResult<bool> {
        for k in 0..self.a.num_rows() {
            if self.a.row(k).iter().all(|&x| x == 0) {
                // 0 <= b is violated iff b <= -1, i.e. b + 1 <= 0.
                let b1 = self.b[k].add_int(1)?;
                if self.oracle.known_le_zero(&b1) {
                    return Ok(true);
                }
            }
        }
        for k in 0..self.e.num_rows() {
            if self.e.row(k).iter().all(|&x| x == 0) && !self.q[k].is_zero() {
                // 0 = q is violated iff q >= 1 or q <= -1 provably.
                let hi = self.q[k].add_int(-1)?;
                let lo = self.q[k].add_int(1)?;
                if self.oracle.known_ge_zero(&hi) || self.oracle.known_le_zero(&lo) {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Remove inequality rows already implied by the rest of the
    /// system. Rows whose redundancy the oracle cannot decide stay.
    /// Returns whether anything was removed.
    pub fn prune_bounds(&mut self) -> ExactResult<bool> {
        Ok(!self.prune_bounds_returning_removed()?.is_empty())
    }

    /// As [`Polyhedron::prune_bounds`], reporting the removed row
    /// indices (relative to the row order before the call).
    pub fn prune_bounds_returning_removed(&mut self) -> ExactResult<Vec<usize>> {
        let mut removed = Vec::new();
        let mut k = self.a.num_rows();
        while k > 0 {
            k -= 1;
            if self.is_redundant(k)? {
                self.a.erase_row(k);
                self.b.remove(k);
                removed.push(k);
            }
        }
        removed.reverse();
        Ok(removed)
    }

    /// A row is redundant iff the rest of the system together with its
    /// negation (`row*x >= b + 1`) is empty.
    fn is_redundant(&self, k: usize) -> ExactResult<bool> {
        let n = self.num_vars();
        let m = self.a.num_rows();
        let mut a = IntMatrix::zeros(m, n);
        let mut b = Vec::with_capacity(m);
        let mut out = 0;
        for r in 0..m {
            if r == k {
                continue;
            }
            a.row_mut(out).copy_from_slice(self.a.row(r));
            b.push(self.b[r].clone());
            out += 1;
        }
        for (j, &x) in self.a.row(k).iter().enumerate() {
            a[(out, j)] = -x;
        }
        let mut nb = self.b[k].add_int(1)?;
        nb.negate();
        b.push(nb);
        let test = Polyhedron {
            a,
            b,
            e: self.e.clone(),
            q: self.q.clone(),
            oracle: self.oracle.clone(),
        };
        test.is_empty()
    }
}

fn fmt_row(f: &mut fmt::Formatter<'_>, row: &[i64]) -> fmt::Result {
    let mut wrote = false;
    for (j, &c) in row.iter().enumerate() {
        if c == 0 {
            continue;
        }
        if wrote {
            write!(f, " {} ", if c < 0 { "-" } else { "+" })?;
        } else if c < 0 {
            write!(f, "-")?;
        }
        if c.abs() != 1 {
            write!(f, "{}*", c.abs())?;
        }
        write!(f, "x{}", j)?;
        wrote = true;
    }
    if !wrote {
        write!(f, "0")?;
    }
    Ok(())
}

impl<C, O> fmt::Display for Polyhedron<C, O>
where
    C: BoundValue + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for k in 0..self.a.num_rows() {
            fmt_row(f, self.a.row(k))?;
            writeln!(f, " <= {}", self.b[k])?;
        }
        for k in 0..self.e.num_rows() {
            fmt_row(f, self.e.row(k))?;
            writeln!(f, " == {}", self.q[k])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyhedral::poset::ValueRange;
    use crate::symbolic::MPoly;

    fn rows(r: Vec<Vec<i64>>) -> IntMatrix {
        IntMatrix::from_rows(r)
    }

    /// 0 <= i <= 9, 0 <= j <= i
    fn triangle() -> IntegerPolyhedron {
        IntegerPolyhedron::new(
            rows(vec![vec![-1, 0], vec![1, 0], vec![0, -1], vec![-1, 1]]),
            vec![0, 9, 0, 0],
        )
    }

    #[test]
    fn test_contains() {
        let p = triangle();
        assert!(p.contains(&[0, 0]));
        assert!(p.contains(&[9, 9]));
        assert!(p.contains(&[5, 3]));
        assert!(!p.contains(&[3, 5]));
        assert!(!p.contains(&[10, 0]));
        assert!(!p.contains(&[-1, 0]));
    }

    #[test]
    fn test_remove_variable_projects() {
        let mut p = triangle();
        p.remove_variable(1).unwrap();
        // projection of the triangle onto i is 0 <= i <= 9
        assert_eq!(p.num_vars(), 1);
        for i in 0..=9 {
            assert!(p.contains(&[i]));
        }
        assert!(!p.contains(&[-1]));
        assert!(!p.contains(&[10]));
    }

    #[test]
    fn test_is_empty() {
        // i >= 1 and i <= 0 simultaneously
        let p = IntegerPolyhedron::new(rows(vec![vec![-1], vec![1]]), vec![-1, 0]);
        assert!(p.is_empty().unwrap());
        let q = IntegerPolyhedron::new(rows(vec![vec![-1], vec![1]]), vec![0, 5]);
        assert!(!q.is_empty().unwrap());
    }

    #[test]
    fn test_is_empty_monotone_in_rows() {
        // adding a row can only shrink the set
        let feasible = IntegerPolyhedron::new(rows(vec![vec![1]]), vec![10]);
        assert!(!feasible.is_empty().unwrap());
        let narrowed = IntegerPolyhedron::new(rows(vec![vec![1], vec![-1]]), vec![10, -11]);
        assert!(narrowed.is_empty().unwrap());
    }

    #[test]
    fn test_equality_substitution() {
        // i + j = 4, 0 <= i <= 3, 0 <= j; eliminate j via the equality
        let mut p = IntegerPolyhedron::new_with_equalities(
            rows(vec![vec![-1, 0], vec![1, 0], vec![0, -1]]),
            vec![0, 3, 0],
            rows(vec![vec![1, 1]]),
            vec![4],
        );
        p.remove_variable(1).unwrap();
        assert_eq!(p.num_vars(), 1);
        assert_eq!(p.num_equalities(), 0);
        // j = 4 - i >= 0 forces i <= 4; with i <= 3 the set is 0..=3
        for i in 0..=3 {
            assert!(p.contains(&[i]));
        }
        assert!(!p.contains(&[4]));
        assert!(!p.contains(&[-1]));
    }

    #[test]
    fn test_inconsistent_equalities_empty() {
        // i = 0 and i = 1
        let p = IntegerPolyhedron::new_with_equalities(
            IntMatrix::zeros(0, 1),
            vec![],
            rows(vec![vec![1], vec![1]]),
            vec![0, 1],
        );
        assert!(p.is_empty().unwrap());
    }

    #[test]
    fn test_prune_removes_redundant_row() {
        // i <= 9 twice, and a slack i <= 20
        let mut p = IntegerPolyhedron::new(
            rows(vec![vec![-1], vec![1], vec![1]]),
            vec![0, 9, 20],
        );
        let removed = p.prune_bounds().unwrap();
        assert!(removed);
        assert_eq!(p.num_inequalities(), 2);
        for i in 0..=9 {
            assert!(p.contains(&[i]));
        }
        assert!(!p.contains(&[10]));
        // idempotent
        assert!(!p.prune_bounds().unwrap());
    }

    #[test]
    fn test_prune_keeps_tight_rows() {
        let mut p = triangle();
        assert!(!p.prune_bounds().unwrap());
        assert_eq!(p.num_inequalities(), 4);
    }

    #[test]
    fn test_symbolic_prune_with_poset() {
        // 0 <= i <= N, 0 <= j <= i, plus the redundant j <= N.
        // Redundancy of j <= N requires knowing N >= 0.
        let mut poset = PartiallyOrderedSet::new();
        poset.assume_range(0, ValueRange::non_negative());
        let n = MPoly::var(0);
        let zero = MPoly::zero();
        let mut p = SymbolicPolyhedron::new(
            rows(vec![
                vec![-1, 0],
                vec![1, 0],
                vec![0, -1],
                vec![-1, 1],
                vec![0, 1],
            ]),
            vec![zero.clone(), n.clone(), zero.clone(), zero.clone(), n.clone()],
            poset,
        );
        let removed = p.prune_bounds().unwrap();
        assert!(removed);
        assert_eq!(p.num_inequalities(), 4);
    }

    #[test]
    fn test_symbolic_prune_conservative_without_facts() {
        // without N >= 0 the slack row j <= N cannot be proven redundant
        let poset = PartiallyOrderedSet::new();
        let n = MPoly::var(0);
        let zero = MPoly::zero();
        let mut p = SymbolicPolyhedron::new(
            rows(vec![
                vec![-1, 0],
                vec![1, 0],
                vec![0, -1],
                vec![-1, 1],
                vec![0, 1],
            ]),
            vec![zero.clone(), n.clone(), zero.clone(), zero.clone(), n.clone()],
            poset,
        );
        p.prune_bounds().unwrap();
        assert_eq!(p.num_inequalities(), 5);
    }

    #[test]
    fn test_symbolic_elimination() {
        // 0 <= i <= N, 0 <= j <= i: eliminating j keeps 0 <= i <= N
        let mut poset = PartiallyOrderedSet::new();
        poset.assume_range(0, ValueRange::non_negative());
        let n = MPoly::var(0);
        let zero = MPoly::zero();
        let mut p = SymbolicPolyhedron::new(
            rows(vec![vec![-1, 0], vec![1, 0], vec![0, -1], vec![-1, 1]]),
            vec![zero.clone(), n.clone(), zero.clone(), zero],
            poset,
        );
        p.remove_variable(1).unwrap();
        p.prune_bounds().unwrap();
        assert_eq!(p.num_vars(), 1);
        assert_eq!(p.num_inequalities(), 2);
        assert!(!p.is_empty().unwrap());
    }
}
