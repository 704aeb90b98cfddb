//! Polynomial GCDs: pseudo-remainder, content extraction, the
//! subresultant univariate scheme, and multivariate reduction.
//!
//! The multivariate GCD lifts each operand to a univariate polynomial
//! over multivariate coefficients (in the smallest shared symbol) and
//! recurses; the univariate loop keeps its intermediate coefficients
//! bounded with the classical `g`/`h` subresultant invariants.

use crate::error::ExactResult;
use crate::symbolic::monomial::{Exponents, Monomial, Uninomial};
use crate::symbolic::poly::{Term, Terms};
use crate::symbolic::{Coefficient, Multivariate, Univariate};

/// Pseudo-remainder of `p` by `d` (`d` non-zero): the remainder of
/// `lc(d)^k * p` by `d` for the smallest `k` that avoids fractions,
/// `k <= deg(p) - deg(d) + 1`. The result's degree is strictly below
/// `deg(d)`.
pub fn pseudorem<C: Coefficient>(
    p: &Univariate<C>,
    d: &Univariate<C>,
) -> ExactResult<Univariate<C>> {
    assert!(!d.is_zero(), "pseudo-remainder by zero");
    if p.degree() < d.degree() {
        return Ok(p.clone());
    }
    let mut k = 1 + p.degree() - d.degree();
    let l = d.leading_coefficient().clone();
    let mut pp = p.clone();
    while !pp.is_zero() && pp.degree() >= d.degree() {
        let shift = pp.degree() - d.degree();
        let t = Term::new(pp.leading_coefficient().clone(), Uninomial::new(shift));
        let dd = d.mul_term(&t)?;
        pp = pp.mul_coef(&l)?;
        pp = pp.checked_sub(&dd)?;
        k -= 1;
    }
    if k > 0 {
        pp = pp.mul_coef(&l.checked_pow(k)?)?;
    }
    Ok(pp)
}

/// GCD of all coefficients; `1` for the zero polynomial, the sole
/// coefficient for a single term.
pub fn content<C: Coefficient, M: Exponents>(a: &Terms<C, M>) -> ExactResult<C> {
    let ts = a.terms();
    match ts.len() {
        0 => Ok(C::one()),
        1 => Ok(ts[0].coefficient.clone()),
        _ => {
            let mut g = ts[0].coefficient.gcd(&ts[1].coefficient)?;
            for t in &ts[2..] {
                g = g.gcd(&t.coefficient)?;
            }
            Ok(g)
        }
    }
}

/// `p` divided by its content.
pub fn prim_part<C: Coefficient, M: Exponents>(p: &Terms<C, M>) -> ExactResult<Terms<C, M>> {
    let c = content(p)?;
    p.div_coef_exact(&c)
}

/// Content and primitive part in one call.
pub fn cont_prim<C: Coefficient, M: Exponents>(
    p: &Terms<C, M>,
) -> ExactResult<(C, Terms<C, M>)> {
    let c = content(p)?;
    let pp = p.div_coef_exact(&c)?;
    Ok((c, pp))
}

/// Univariate GCD by the subresultant pseudo-remainder sequence.
pub fn gcd_univariate<C: Coefficient>(
    x: &Univariate<C>,
    y: &Univariate<C>,
) -> ExactResult<Univariate<C>> {
    if x.degree() < y.degree() {
        return gcd_univariate(y, x);
    }
    if y.is_zero() {
        return Ok(x.clone());
    }
    if y.is_one() {
        return Ok(y.clone());
    }
    let (c1, mut xx) = cont_prim(x)?;
    let (c2, mut yy) = cont_prim(y)?;
    let c = c1.gcd(&c2)?;
    let mut g = C::one();
    let mut h = C::one();
    loop {
        let d = xx.degree() - yy.degree();
        let r = pseudorem(&xx, &yy)?;
        if r.is_zero() {
            break;
        }
        if r.degree() == 0 {
            // Primitive parts are coprime; only the content survives.
            return Ok(Univariate::constant(c));
        }
        let divisor = g.checked_mul(&h.checked_pow(d)?)?;
        let r = r.div_coef_exact(&divisor)?;
        xx = std::mem::replace(&mut yy, r);
        g = xx.leading_coefficient().clone();
        h = match d {
            0 => h,
            1 => g.clone(),
            _ => g.checked_pow(d)?.exact_div(&h.checked_pow(d - 1)?)?,
        };
    }
    prim_part(&yy)?.mul_coef(&c)
}

/// Lift a multivariate polynomial to a univariate polynomial in `v`
/// whose coefficients are multivariate polynomials free of `v`.
pub fn multivariate_to_univariate<C: Coefficient>(
    p: &Multivariate<C>,
    v: u32,
) -> ExactResult<Univariate<Multivariate<C>>> {
    let mut buckets: Vec<(u32, Multivariate<C>)> = Vec::new();
    for t in p.terms() {
        let deg = t.exponent.degree_of(v);
        let stripped = Term::new(t.coefficient.clone(), t.exponent.strip(v));
        match buckets.iter_mut().find(|(d, _)| *d == deg) {
            Some((_, coef)) => coef.add_term(stripped)?,
            None => buckets.push((deg, Multivariate::from_term(stripped))),
        }
    }
    buckets.sort_by(|a, b| b.0.cmp(&a.0));
    let mut out = Univariate::zero();
    for (deg, coef) in buckets {
        out.add_term(Term::new(coef, Uninomial::new(deg)))?;
    }
    Ok(out)
}

/// Undo [`multivariate_to_univariate`]: multiply each coefficient back
/// by `v^degree` and flatten.
pub fn univariate_to_multivariate<C: Coefficient>(
    u: &Univariate<Multivariate<C>>,
    v: u32,
) -> ExactResult<Multivariate<C>> {
    let mut out = Multivariate::zero();
    for t in u.terms() {
        let e = t.exponent.exponent();
        for inner in t.coefficient.terms() {
            let mut mono = inner.exponent.clone();
            for _ in 0..e {
                mono.push_symbol(v);
            }
            out.add_term(Term::new(inner.coefficient.clone(), mono))?;
        }
    }
    Ok(out)
}

fn coef_content<C: Coefficient>(p: &Multivariate<C>) -> ExactResult<C> {
    let mut g = C::zero();
    for t in p.terms() {
        g = g.gcd(&t.coefficient)?;
    }
    Ok(g)
}

/// Multivariate GCD by recursive reduction to the univariate scheme.
///
/// Picks the smallest symbol appearing in either operand; when it is
/// shared, both sides lift to univariate polynomials over multivariate
/// coefficients, and the subresultant GCD of those converts back.
/// When it appears on one side only, that side collapses to the content
/// of its lift and the recursion strips one variable per level.
pub fn gcd_multivariate<C: Coefficient>(
    x: &Multivariate<C>,
    y: &Multivariate<C>,
) -> ExactResult<Multivariate<C>> {
    if x.is_zero() || y.is_one() {
        return Ok(y.clone());
    }
    if y.is_zero() || x.is_one() || x == y {
        return Ok(x.clone());
    }
    match (x.min_symbol(), y.min_symbol()) {
        (None, None) => {
            let g = x.leading_coefficient().gcd(y.leading_coefficient())?;
            Ok(Multivariate::constant(g))
        }
        (Some(_), None) => {
            let g = coef_content(x)?.gcd(y.leading_coefficient())?;
            Ok(Multivariate::constant(g))
        }
        (None, Some(_)) => {
            let g = coef_content(y)?.gcd(x.leading_coefficient())?;
            Ok(Multivariate::constant(g))
        }
        (Some(a), Some(b)) => {
            if a == b {
                let px = multivariate_to_univariate(x, a)?;
                let py = multivariate_to_univariate(y, a)?;
                let g = gcd_univariate(&px, &py)?;
                univariate_to_multivariate(&g, a)
            } else if a < b {
                let px = multivariate_to_univariate(x, a)?;
                let cont = content(&px)?;
                gcd_multivariate(&cont, y)
            } else {
                let py = multivariate_to_univariate(y, b)?;
                let cont = content(&py)?;
                gcd_multivariate(x, &cont)
            }
        }
    }
}

/// Multivariate polynomials are themselves coefficients: the lifted
/// univariate polynomials in the GCD recursion are `Terms` over `Terms`.
impl<C: Coefficient> Coefficient for Terms<C, Monomial> {
    fn zero() -> Self {
        Terms::zero()
    }

    fn one() -> Self {
        Terms::constant(C::one())
    }

    fn is_zero(&self) -> bool {
        Terms::is_zero(self)
    }

    fn is_one(&self) -> bool {
        Terms::is_one(self)
    }

    fn checked_add(&self, rhs: &Self) -> ExactResult<Self> {
        Terms::checked_add(self, rhs)
    }

    fn checked_sub(&self, rhs: &Self) -> ExactResult<Self> {
        Terms::checked_sub(self, rhs)
    }

    fn checked_mul(&self, rhs: &Self) -> ExactResult<Self> {
        Terms::checked_mul(self, rhs)
    }

    fn exact_div(&self, rhs: &Self) -> ExactResult<Self> {
        let (q, r) = self.div_rem(rhs)?;
        debug_assert!(r.is_zero(), "exact_div with non-zero remainder");
        Ok(q)
    }

    fn try_div(&self, rhs: &Self) -> ExactResult<Option<Self>> {
        let (q, r) = self.div_rem(rhs)?;
        Ok(r.is_zero().then_some(q))
    }

    fn gcd(&self, rhs: &Self) -> ExactResult<Self> {
        gcd_multivariate(self, rhs)
    }

    fn negate(&mut self) {
        Terms::negate(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::MPoly;

    fn x(id: u32) -> MPoly {
        MPoly::var(id)
    }

    fn int(v: i64) -> MPoly {
        MPoly::constant(v)
    }

    /// x^2 - y^2 and x - y as multivariate polynomials over i64.
    fn diff_of_squares() -> (MPoly, MPoly) {
        let x2 = x(0).checked_mul(&x(0)).unwrap();
        let y2 = x(1).checked_mul(&x(1)).unwrap();
        let f = x2.checked_sub(&y2).unwrap();
        let d = x(0).checked_sub(&x(1)).unwrap();
        (f, d)
    }

    #[test]
    fn test_pseudorem_degree_drops() {
        // p = T^3 + 2T + 1, d = 2T^2 + 1 over i64
        let mut p = Univariate::<i64>::zero();
        p.add_term(Term::new(1, Uninomial::new(3))).unwrap();
        p.add_term(Term::new(2, Uninomial::new(1))).unwrap();
        p.add_term(Term::new(1, Uninomial::new(0))).unwrap();
        let mut d = Univariate::<i64>::zero();
        d.add_term(Term::new(2, Uninomial::new(2))).unwrap();
        d.add_term(Term::new(1, Uninomial::new(0))).unwrap();
        let r = pseudorem(&p, &d).unwrap();
        assert!(r.degree() < d.degree());
        assert!(!r.is_zero());
    }

    #[test]
    fn test_pseudorem_low_degree_passthrough() {
        let mut p = Univariate::<i64>::zero();
        p.add_term(Term::new(3, Uninomial::new(1))).unwrap();
        let mut d = Univariate::<i64>::zero();
        d.add_term(Term::new(1, Uninomial::new(2))).unwrap();
        assert_eq!(pseudorem(&p, &d).unwrap(), p);
    }

    #[test]
    fn test_content_prim_part() {
        // 6T^2 + 9 -> content 3, primitive 2T^2 + 3
        let mut p = Univariate::<i64>::zero();
        p.add_term(Term::new(6, Uninomial::new(2))).unwrap();
        p.add_term(Term::new(9, Uninomial::new(0))).unwrap();
        let (c, pp) = cont_prim(&p).unwrap();
        assert_eq!(c, 3);
        assert_eq!(pp.terms()[0].coefficient, 2);
        assert_eq!(pp.terms()[1].coefficient, 3);
        assert_eq!(content(&Univariate::<i64>::zero()).unwrap(), 1);
    }

    #[test]
    fn test_gcd_difference_of_squares() {
        let (f, d) = diff_of_squares();
        let g = gcd_multivariate(&f, &d).unwrap();
        assert_eq!(g, d);
    }

    #[test]
    fn test_gcd_divides_both() {
        // f = (x + y)(x + 2), g = (x + y)(y + 3)
        let s = x(0).checked_add(&x(1)).unwrap();
        let f = s.checked_mul(&x(0).checked_add(&int(2)).unwrap()).unwrap();
        let gp = s.checked_mul(&x(1).checked_add(&int(3)).unwrap()).unwrap();
        let g = gcd_multivariate(&f, &gp).unwrap();
        let (qf, rf) = f.div_rem(&g).unwrap();
        let (qg, rg) = gp.div_rem(&g).unwrap();
        assert!(rf.is_zero());
        assert!(rg.is_zero());
        assert_eq!(qf.checked_mul(&g).unwrap(), f);
        assert_eq!(qg.checked_mul(&g).unwrap(), gp);
    }

    #[test]
    fn test_gcd_edge_cases() {
        let p = x(0).checked_add(&int(1)).unwrap();
        assert_eq!(gcd_multivariate(&p, &MPoly::zero()).unwrap(), p);
        assert_eq!(gcd_multivariate(&MPoly::zero(), &p).unwrap(), p);
        assert!(gcd_multivariate(&p, &MPoly::constant(1)).unwrap().is_one());
        assert_eq!(gcd_multivariate(&p, &p).unwrap(), p);
    }

    #[test]
    fn test_gcd_constants() {
        let g = gcd_multivariate(&int(12), &int(18)).unwrap();
        assert_eq!(g, int(6));
        // polynomial vs constant: content comes out
        let p = x(0).checked_mul(&int(4)).unwrap().checked_add(&int(6)).unwrap();
        assert_eq!(gcd_multivariate(&p, &int(10)).unwrap(), int(2));
    }

    #[test]
    fn test_lift_roundtrip() {
        let (f, _) = diff_of_squares();
        let u = multivariate_to_univariate(&f, 0).unwrap();
        assert_eq!(u.degree(), 2);
        let back = univariate_to_multivariate(&u, 0).unwrap();
        assert_eq!(back, f);
    }

    #[test]
    fn test_disjoint_variables() {
        // gcd(2x, 4y) = 2
        let f = x(0).mul_coef(&2).unwrap();
        let g = x(1).mul_coef(&4).unwrap();
        assert_eq!(gcd_multivariate(&f, &g).unwrap(), int(2));
    }
}
