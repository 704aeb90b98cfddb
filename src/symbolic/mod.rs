//! Symbolic polynomial algebra over exact coefficients.
//!
//! Polynomials are sorted term lists ([`poly::Terms`]) generic over a
//! coefficient ring ([`Coefficient`]) and an exponent structure
//! ([`monomial::Exponents`]). Coefficient arithmetic is overflow-checked
//! throughout; every operation that combines coefficients returns an
//! [`ExactResult`].

pub mod gcd;
pub mod monomial;
pub mod poly;

pub use gcd::{gcd_multivariate, gcd_univariate, pseudorem};
pub use monomial::{Exponents, Monomial, Uninomial};
pub use poly::{Term, Terms};

use crate::error::{ArithmeticOverflow, ExactResult};
use crate::num::{self, Rational};
use std::fmt;

/// A univariate polynomial over `C`.
pub type Univariate<C> = Terms<C, Uninomial>;
/// A multivariate polynomial over `C`.
pub type Multivariate<C> = Terms<C, Monomial>;
/// The multivariate integer polynomial used for symbolic bounds.
pub type MPoly = Multivariate<i64>;

/// The ring operations a polynomial coefficient must supply.
///
/// This is the trait rendering of the source's recurring-template
/// sharing: `i64`, [`Rational`], and multivariate polynomials themselves
/// (as coefficients of lifted univariate polynomials) all implement it.
pub trait Coefficient: Clone + PartialEq + fmt::Debug {
    /// Additive identity.
    fn zero() -> Self;
    /// Multiplicative identity.
    fn one() -> Self;
    /// Whether this is the additive identity.
    fn is_zero(&self) -> bool;
    /// Whether this is the multiplicative identity.
    fn is_one(&self) -> bool;
    /// Checked addition.
    fn checked_add(&self, rhs: &Self) -> ExactResult<Self>;
    /// Checked subtraction.
    fn checked_sub(&self, rhs: &Self) -> ExactResult<Self>;
    /// Checked multiplication.
    fn checked_mul(&self, rhs: &Self) -> ExactResult<Self>;
    /// Division that must be exact; the divisor is known to divide.
    fn exact_div(&self, rhs: &Self) -> ExactResult<Self>;
    /// Division returning `None` when `rhs` does not divide exactly.
    fn try_div(&self, rhs: &Self) -> ExactResult<Option<Self>>;
    /// Greatest common divisor.
    fn gcd(&self, rhs: &Self) -> ExactResult<Self>;
    /// In-place negation.
    fn negate(&mut self);

    /// Checked exponentiation by squaring.
    fn checked_pow(&self, e: u32) -> ExactResult<Self> {
        match e {
            0 => Ok(Self::one()),
            1 => Ok(self.clone()),
            2 => self.checked_mul(self),
            _ => {
                let mut acc = Self::one();
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

impl Coefficient for i64 {
    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }

    fn is_one(&self) -> bool {
        *self == 1
    }

    fn checked_add(&self, rhs: &Self) -> ExactResult<Self> {
        i64::checked_add(*self, *rhs).ok_or(ArithmeticOverflow)
    }

    fn checked_sub(&self, rhs: &Self) -> ExactResult<Self> {
        i64::checked_sub(*self, *rhs).ok_or(ArithmeticOverflow)
    }

    fn checked_mul(&self, rhs: &Self) -> ExactResult<Self> {
        i64::checked_mul(*self, *rhs).ok_or(ArithmeticOverflow)
    }

    fn exact_div(&self, rhs: &Self) -> ExactResult<Self> {
        debug_assert!(*rhs != 0);
        Ok(num::div_exact(*self, *rhs))
    }

    fn try_div(&self, rhs: &Self) -> ExactResult<Option<Self>> {
        if *rhs == 0 {
            return Err(ArithmeticOverflow);
        }
        Ok((*self % *rhs == 0).then(|| *self / *rhs))
    }

    fn gcd(&self, rhs: &Self) -> ExactResult<Self> {
        Ok(num::gcd(*self, *rhs))
    }

    fn negate(&mut self) {
        *self = -*self;
    }
}

impl Coefficient for Rational {
    fn zero() -> Self {
        Rational::zero()
    }

    fn one() -> Self {
        Rational::one()
    }

    fn is_zero(&self) -> bool {
        Rational::is_zero(self)
    }

    fn is_one(&self) -> bool {
        Rational::is_one(self)
    }

    fn checked_add(&self, rhs: &Self) -> ExactResult<Self> {
        Rational::checked_add(self, *rhs)
    }

    fn checked_sub(&self, rhs: &Self) -> ExactResult<Self> {
        Rational::checked_sub(self, *rhs)
    }

    fn checked_mul(&self, rhs: &Self) -> ExactResult<Self> {
        Rational::checked_mul(self, *rhs)
    }

    fn exact_div(&self, rhs: &Self) -> ExactResult<Self> {
        Rational::checked_div(self, *rhs)
    }

    fn try_div(&self, rhs: &Self) -> ExactResult<Option<Self>> {
        if rhs.is_zero() {
            return Err(ArithmeticOverflow);
        }
        Ok(Some(Rational::checked_div(self, *rhs)?))
    }

    fn gcd(&self, rhs: &Self) -> ExactResult<Self> {
        // gcd over the rationals normalizes content extraction:
        // gcd(a/b, c/d) = gcd(a, c) / lcm(b, d).
        if self.is_zero() {
            return Ok(*rhs);
        }
        if rhs.is_zero() {
            return Ok(*self);
        }
        let n = num::gcd(self.numer(), rhs.numer());
        let d = num::lcm(self.denom(), rhs.denom());
        Ok(Rational::new(n, d))
    }

    fn negate(&mut self) {
        Rational::negate(self);
    }
}
