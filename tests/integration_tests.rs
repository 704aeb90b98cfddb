//! End-to-end scenarios across the kernel layers.

use polykern::linalg::{
    hermite_normal_form, is_unimodular, matmul, null_space, orthogonalize, solve_diophantine,
};
use polykern::num::{gcd, gcdx, lcm};
use polykern::prelude::*;
use polykern::symbolic::gcd_multivariate;
use std::sync::Arc;

fn x(id: u32) -> MPoly {
    MPoly::var(id)
}

fn int(v: i64) -> MPoly {
    MPoly::constant(v)
}

#[test]
fn scenario_integer_primitives() {
    assert_eq!(gcd(1001, 777), 7);
    assert_eq!(lcm(6, 10), 30);
    let (g, s, t) = gcdx(240, 46);
    assert_eq!((g, s, t), (2, -9, 47));
    assert_eq!(s * 240 + t * 46, g);
}

#[test]
fn scenario_rational_canonicalization() {
    let r = Rational::new(2, -4);
    assert_eq!((r.numer(), r.denom()), (-1, 2));
    let s = Rational::new(6, 9)
        .checked_add(Rational::new(-4, 6))
        .unwrap();
    assert_eq!((s.numer(), s.denom()), (0, 1));
}

#[test]
fn scenario_monomial_arithmetic() {
    use polykern::symbolic::Exponents;
    let a = Monomial::from_ids(vec![1, 3]);
    let b = Monomial::from_ids(vec![1, 2, 3]);
    assert_eq!(
        Exponents::mul(&a, &b),
        Monomial::from_ids(vec![1, 1, 2, 3, 3])
    );
    assert_eq!(Monomial::from_ids(vec![1, 1, 2, 3, 3]).try_div(&a), Some(b));
    assert_eq!(
        Monomial::from_ids(vec![1, 2]).try_div(&Monomial::from_ids(vec![3])),
        None
    );
}

#[test]
fn scenario_polynomial_product_ordering() {
    // (x0*x1 + 2)(x0 - 1) = x0^2*x1 - x0*x1 + 2*x0 - 2
    let lhs = x(0)
        .checked_mul(&x(1))
        .unwrap()
        .checked_add(&int(2))
        .unwrap();
    let rhs = x(0).checked_sub(&int(1)).unwrap();
    let p = lhs.checked_mul(&rhs).unwrap();
    let degrees: Vec<u32> = p.terms().iter().map(|t| t.degree()).collect();
    assert_eq!(degrees, vec![3, 2, 1, 0]);
    let coeffs: Vec<i64> = p.terms().iter().map(|t| t.coefficient).collect();
    assert_eq!(coeffs, vec![1, -1, 2, -2]);
}

#[test]
fn scenario_gcd_difference_of_squares() {
    let x2 = x(0).checked_mul(&x(0)).unwrap();
    let y2 = x(1).checked_mul(&x(1)).unwrap();
    let f = x2.checked_sub(&y2).unwrap();
    let d = x(0).checked_sub(&x(1)).unwrap();
    assert_eq!(gcd_multivariate(&f, &d).unwrap(), d);
}

#[test]
fn scenario_triangle_projection() {
    // 0 <= i <= N, 0 <= j <= i over symbol N >= 0; eliminating j and
    // pruning leaves exactly 0 <= i <= N.
    let mut poset = PartiallyOrderedSet::new();
    poset.assume_range(0, ValueRange::non_negative());
    let n = x(0);
    let zero = MPoly::zero();
    let a = IntMatrix::from_rows(vec![vec![-1, 0], vec![1, 0], vec![0, -1], vec![-1, 1]]);
    let mut p =
        SymbolicPolyhedron::new(a, vec![zero.clone(), n.clone(), zero.clone(), zero], poset);
    p.remove_variable(1).unwrap();
    p.prune_bounds().unwrap();
    assert_eq!(p.num_vars(), 1);
    assert_eq!(p.num_inequalities(), 2);
    assert!(!p.is_empty().unwrap());

    // integer instance of the same shape shares the projection
    let a = IntMatrix::from_rows(vec![vec![-1, 0], vec![1, 0], vec![0, -1], vec![-1, 1]]);
    let mut q = IntegerPolyhedron::new(a, vec![0, 10, 0, 0]);
    q.remove_variable(1).unwrap();
    q.prune_bounds().unwrap();
    for i in 0..=10 {
        assert!(q.contains(&[i]));
    }
    assert!(!q.contains(&[11]));
    assert!(!q.contains(&[-1]));
}

#[test]
fn scenario_projection_matches_point_set() {
    // project_j of the triangle contains i iff some j completes it
    let a = IntMatrix::from_rows(vec![vec![-1, 0], vec![1, 0], vec![0, -1], vec![-1, 1]]);
    let full = IntegerPolyhedron::new(a.clone(), vec![0, 6, 0, 0]);
    let mut projected = IntegerPolyhedron::new(a, vec![0, 6, 0, 0]);
    projected.remove_variable(1).unwrap();
    for i in -2..=8 {
        let witness = (0..=8).any(|j| full.contains(&[i, j]));
        assert_eq!(projected.contains(&[i]), witness, "i = {i}");
    }
}

#[test]
fn scenario_hermite_and_diophantine() {
    let a = IntMatrix::from_rows(vec![vec![2, 4], vec![6, 8]]);
    let (h, u) = hermite_normal_form(&a);
    assert!(is_unimodular(&u));
    assert_eq!(matmul(&u, &a), h);
    // 2x + 4y = 10, 6x + 8y = 26 -> x = 3, y = 1
    let sol = solve_diophantine(&a, &[10, 26]).unwrap();
    assert_eq!(sol, vec![3, 1]);
}

#[test]
fn scenario_null_space_and_orthogonalize() {
    let a = IntMatrix::from_rows(vec![vec![1, 1, 0], vec![0, 1, 1]]);
    let ns = null_space(&a);
    assert_eq!(ns.num_rows(), 1);
    let v = ns.row(0);
    for r in 0..a.num_rows() {
        let dot: i64 = a.row(r).iter().zip(v).map(|(x, y)| x * y).sum();
        assert_eq!(dot, 0);
    }
    let o = orthogonalize(IntMatrix::from_rows(vec![vec![3, 0], vec![1, 1]])).unwrap();
    let dot: i64 = o.row(0).iter().zip(o.row(1)).map(|(x, y)| x * y).sum();
    assert_eq!(dot, 0);
}

#[test]
fn scenario_orthogonalize_references_end_to_end() {
    // square nest 0 <= i, j <= N-1; two references C[i+j, j] and A[i+j]
    let a = IntMatrix::from_rows(vec![
        vec![0, 0, 1, 0],
        vec![-1, 1, -1, 0],
        vec![0, 0, 0, 1],
        vec![-1, 1, 0, -1],
    ]);
    let nest = AffineLoopNest::new(a, vec![VarId::new(VarKind::Constant, 0)]).shared();
    let c_ref = ArrayReference::new(
        VarId::new(VarKind::Memory, 0),
        nest.clone(),
        IntMatrix::from_rows(vec![vec![1, 0], vec![1, 1]]),
    );
    let a_ref = ArrayReference::new(
        VarId::new(VarKind::Memory, 1),
        nest,
        IntMatrix::from_rows(vec![vec![1], vec![1]]),
    );
    let mut poset = PartiallyOrderedSet::new();
    poset.assume_range(0, ValueRange::non_negative());
    let out = orthogonalize_references(&[c_ref, a_ref], &poset)
        .unwrap()
        .expect("skewed subscripts should improve");
    assert_eq!(out.len(), 2);
    assert!(Arc::ptr_eq(out[0].loop_nest(), out[1].loop_nest()));
    for r in &out {
        let idx = r.index_matrix();
        for c in 0..idx.num_cols() {
            let nz = (0..idx.num_rows())
                .filter(|&row| idx[(row, c)] != 0)
                .count();
            assert_eq!(nz, 1, "each subscript column gets a single stride");
        }
    }
}

#[test]
fn scenario_schedules_and_accesses() {
    // 0 <= i <= 5, 0 <= j (shape only)
    let a = IntMatrix::from_rows(vec![vec![0, 1, 0], vec![5, -1, 0], vec![0, 0, 1]]);
    let nest = AffineLoopNest::new(a, vec![]).shared();
    let r = ArrayReference::new(VarId::new(VarKind::Memory, 0), nest, IntMatrix::identity(2));
    let load = MemoryAccess::new(r.clone(), true, Schedule::new(2));
    let mut store = MemoryAccess::new(r, false, Schedule::new(2));
    assert!(load.fused_through(&store));
    store.schedule.omega_mut()[2] = 1;
    assert!(load.schedule.fused_through(&store.schedule, 1));
    assert!(!load.schedule.fused_through(&store.schedule, 2));
    store.add_edge_in(0);
    assert_eq!(store.edges_in(), &[0]);
}
