//! Polynomials as sorted term lists.
//!
//! A [`Terms`] value keeps its invariants at every step: monomials are
//! unique, terms are ordered leading-first (total degree, then symbol
//! position), and no stored coefficient is zero.

use crate::error::ExactResult;
use crate::symbolic::monomial::{Exponents, Monomial};
use crate::symbolic::Coefficient;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single coefficient/exponent pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term<C, M> {
    /// The coefficient; non-zero whenever the term sits in a [`Terms`].
    pub coefficient: C,
    /// The exponent structure.
    pub exponent: M,
}

impl<C: Coefficient, M: Exponents> Term<C, M> {
    /// A term from its parts.
    pub fn new(coefficient: C, exponent: M) -> Self {
        Self {
            coefficient,
            exponent,
        }
    }

    /// A constant term.
    pub fn constant(coefficient: C) -> Self {
        Self {
            coefficient,
            exponent: M::one(),
        }
    }

    /// Whether the coefficient is zero.
    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Whether this term is the constant one.
    pub fn is_one(&self) -> bool {
        self.coefficient.is_one() && self.exponent.is_one()
    }

    /// Total degree of the exponent.
    pub fn degree(&self) -> u32 {
        self.exponent.degree()
    }

    /// Negate the coefficient in place.
    pub fn negate(&mut self) {
        self.coefficient.negate();
    }

    /// Checked term product.
    pub fn checked_mul(&self, rhs: &Self) -> ExactResult<Self> {
        Ok(Self {
            coefficient: self.coefficient.checked_mul(&rhs.coefficient)?,
            exponent: self.exponent.mul(&rhs.exponent),
        })
    }

    /// Term quotient; `None` when the exponents or coefficients do not
    /// divide exactly.
    pub fn try_div(&self, rhs: &Self) -> ExactResult<Option<Self>> {
        let Some(exponent) = self.exponent.try_div(&rhs.exponent) else {
            return Ok(None);
        };
        let Some(coefficient) = self.coefficient.try_div(&rhs.coefficient)? else {
            return Ok(None);
        };
        Ok(Some(Self {
            coefficient,
            exponent,
        }))
    }
}

/// A polynomial: an ordered sequence of reduced terms with unique,
/// lex-ordered exponents (leading term first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terms<C, M> {
    terms: Vec<Term<C, M>>,
}

impl<C: Coefficient, M: Exponents> Default for Terms<C, M> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<C: Coefficient, M: Exponents> Terms<C, M> {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { terms: Vec::new() }
    }

    /// The constant polynomial `c` (zero when `c` is zero).
    pub fn constant(c: C) -> Self {
        if c.is_zero() {
            Self::zero()
        } else {
            Self {
                terms: vec![Term::constant(c)],
            }
        }
    }

    /// A polynomial holding one (non-zero) term.
    pub fn from_term(t: Term<C, M>) -> Self {
        if t.is_zero() {
            Self::zero()
        } else {
            Self { terms: vec![t] }
        }
    }

    /// The term list, leading term first.
    pub fn terms(&self) -> &[Term<C, M>] {
        &self.terms
    }

    /// Whether this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether this is the constant one.
    pub fn is_one(&self) -> bool {
        self.terms.len() == 1 && self.terms[0].is_one()
    }

    /// Whether this polynomial is a constant (including zero).
    pub fn is_constant(&self) -> bool {
        self.terms.len() <= 1 && self.terms.iter().all(|t| t.exponent.is_one())
    }

    /// Total degree of the leading term (0 for the zero polynomial).
    pub fn degree(&self) -> u32 {
        self.terms.first().map_or(0, Term::degree)
    }

    /// The leading (first) term. The polynomial must be non-zero.
    pub fn leading_term(&self) -> &Term<C, M> {
        assert!(!self.terms.is_empty(), "leading term of zero polynomial");
        &self.terms[0]
    }

    /// The leading coefficient. The polynomial must be non-zero.
    pub fn leading_coefficient(&self) -> &C {
        &self.leading_term().coefficient
    }

    /// Remove and return the leading term.
    pub fn remove_leading_term(&mut self) -> Term<C, M> {
        assert!(!self.terms.is_empty(), "leading term of zero polynomial");
        self.terms.remove(0)
    }

    /// Fold a term in, keeping the sorted-unique-reduced invariant. A
    /// term whose exponent is already present adds coefficients (and
    /// disappears when the sum cancels).
    pub fn add_term(&mut self, t: Term<C, M>) -> ExactResult<()> {
        if t.is_zero() {
            return Ok(());
        }
        for i in 0..self.terms.len() {
            if self.terms[i].exponent == t.exponent {
                let sum = self.terms[i].coefficient.checked_add(&t.coefficient)?;
                if sum.is_zero() {
                    self.terms.remove(i);
                } else {
                    self.terms[i].coefficient = sum;
                }
                return Ok(());
            } else if t.exponent.lex_greater(&self.terms[i].exponent) {
                self.terms.insert(i, t);
                return Ok(());
            }
        }
        self.terms.push(t);
        Ok(())
    }

    /// Fold the negation of a term in; mirrors [`Terms::add_term`].
    pub fn sub_term(&mut self, mut t: Term<C, M>) -> ExactResult<()> {
        if t.is_zero() {
            return Ok(());
        }
        for i in 0..self.terms.len() {
            if self.terms[i].exponent == t.exponent {
                let diff = self.terms[i].coefficient.checked_sub(&t.coefficient)?;
                if diff.is_zero() {
                    self.terms.remove(i);
                } else {
                    self.terms[i].coefficient = diff;
                }
                return Ok(());
            } else if t.exponent.lex_greater(&self.terms[i].exponent) {
                t.negate();
                self.terms.insert(i, t);
                return Ok(());
            }
        }
        t.negate();
        self.terms.push(t);
        Ok(())
    }

    /// Checked polynomial sum.
    pub fn checked_add(&self, rhs: &Self) -> ExactResult<Self> {
        let mut out = self.clone();
        for t in rhs.terms() {
            out.add_term(t.clone())?;
        }
        Ok(out)
    }

    /// Checked polynomial difference.
    pub fn checked_sub(&self, rhs: &Self) -> ExactResult<Self> {
        let mut out = self.clone();
        for t in rhs.terms() {
            out.sub_term(t.clone())?;
        }
        Ok(out)
    }

    /// Checked schoolbook product; accumulation through
    /// [`Terms::add_term`] keeps the result canonical.
    pub fn checked_mul(&self, rhs: &Self) -> ExactResult<Self> {
        let mut out = Self::zero();
        for a in self.terms() {
            for b in rhs.terms() {
                out.add_term(a.checked_mul(b)?)?;
            }
        }
        Ok(out)
    }

    /// Multiply every term by `t`.
    pub fn mul_term(&self, t: &Term<C, M>) -> ExactResult<Self> {
        if t.is_zero() {
            return Ok(Self::zero());
        }
        let mut terms = Vec::with_capacity(self.terms.len());
        for a in self.terms() {
            terms.push(a.checked_mul(t)?);
        }
        Ok(Self { terms })
    }

    /// Scale every coefficient by `c`.
    pub fn mul_coef(&self, c: &C) -> ExactResult<Self> {
        if c.is_zero() {
            return Ok(Self::zero());
        }
        let mut terms = Vec::with_capacity(self.terms.len());
        for a in self.terms() {
            terms.push(Term::new(a.coefficient.checked_mul(c)?, a.exponent.clone()));
        }
        Ok(Self { terms })
    }

    /// Divide every coefficient exactly by `c`.
    pub fn div_coef_exact(&self, c: &C) -> ExactResult<Self> {
        let mut terms = Vec::with_capacity(self.terms.len());
        for a in self.terms() {
            terms.push(Term::new(a.coefficient.exact_div(c)?, a.exponent.clone()));
        }
        Ok(Self { terms })
    }

    /// Negate in place.
    pub fn negate(&mut self) {
        for t in &mut self.terms {
            t.negate();
        }
    }

    /// Quotient and remainder. Repeatedly divides the leading term of
    /// the dividend by the divisor's leading term; a failed term
    /// division moves that term to the remainder. `f == q*d + r`, and
    /// no remainder leading term is divisible by `d`'s leading term.
    pub fn div_rem(&self, d: &Self) -> ExactResult<(Self, Self)> {
        assert!(!d.is_zero(), "polynomial division by zero");
        let mut q = Self::zero();
        let mut r = Self::zero();
        let mut p = self.clone();
        while !p.is_zero() {
            match p.leading_term().try_div(d.leading_term())? {
                None => {
                    let t = p.remove_leading_term();
                    r.add_term(t)?;
                }
                Some(nx) => {
                    let prod = d.mul_term(&nx)?;
                    p = p.checked_sub(&prod)?;
                    q.add_term(nx)?;
                }
            }
        }
        Ok((q, r))
    }

    /// Checked exponentiation by squaring.
    pub fn checked_pow(&self, e: u32) -> ExactResult<Self> {
        match e {
            0 => Ok(Self::constant(C::one())),
            1 => Ok(self.clone()),
            _ => {
                let mut acc = Self::constant(C::one());
                let mut base = self.clone();
                let mut e = e;
                while e > 0 {
                    if e & 1 == 1 {
                        acc = acc.checked_mul(&base)?;
                    }
                    e >>= 1;
                    if e > 0 {
                        base = base.checked_mul(&base)?;
                    }
                }
                Ok(acc)
            }
        }
    }
}

impl<C: Coefficient> Terms<C, Monomial> {
    /// The polynomial `x_id`.
    pub fn var(id: u32) -> Self {
        Self::from_term(Term::new(C::one(), Monomial::var(id)))
    }

    /// The smallest symbol id appearing in any term, if one does.
    pub fn min_symbol(&self) -> Option<u32> {
        self.terms
            .iter()
            .filter_map(|t| t.exponent.min_symbol())
            .min()
    }
}

impl<C, M> fmt::Display for Terms<C, M>
where
    C: Coefficient + fmt::Display,
    M: Exponents + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, t) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if t.exponent.is_one() {
                write!(f, "{}", t.coefficient)?;
            } else if t.coefficient.is_one() {
                write!(f, "{}", t.exponent)?;
            } else {
                write!(f, "{} {}", t.coefficient, t.exponent)?;
            }
        }
        Ok(())
    }
}
