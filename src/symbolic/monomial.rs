//! Monomials: the exponent structure of polynomial terms.
//!
//! A [`Monomial`] is a sorted, non-decreasing sequence of symbol ids;
//! repetition encodes exponents, and the empty sequence is `1`. A
//! [`Uninomial`] is a single exponent `x^e`. Both implement
//! [`Exponents`], the capability [`super::poly::Terms`] is generic over.

use num_traits::One;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::ops::Mul;

/// Exponent structure shared by uninomials and monomials.
pub trait Exponents: Clone + Eq + fmt::Debug {
    /// The multiplicative identity (`x^0` / the empty product).
    fn one() -> Self;
    /// Whether this is the multiplicative identity.
    fn is_one(&self) -> bool;
    /// Total degree.
    fn degree(&self) -> u32;
    /// Product of two exponent structures.
    fn mul(&self, other: &Self) -> Self;
    /// Quotient, or `None` when `other` does not divide `self`.
    fn try_div(&self, other: &Self) -> Option<Self>;
    /// Whether `self` sorts before `other` (leading term first): higher
    /// total degree wins, then lower symbol id at the first difference.
    fn lex_greater(&self, other: &Self) -> bool;
}

/// `x^e` over a single anonymous symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uninomial {
    exponent: u32,
}

impl Uninomial {
    /// The uninomial `x^e`.
    pub fn new(exponent: u32) -> Self {
        Self { exponent }
    }

    /// The exponent.
    pub fn exponent(&self) -> u32 {
        self.exponent
    }

    /// `(self)^i`.
    pub fn pow(&self, i: u32) -> Self {
        Self {
            exponent: self.exponent * i,
        }
    }
}

impl Exponents for Uninomial {
    fn one() -> Self {
        Self { exponent: 0 }
    }

    fn is_one(&self) -> bool {
        self.exponent == 0
    }

    fn degree(&self) -> u32 {
        self.exponent
    }

    fn mul(&self, other: &Self) -> Self {
        Self {
            exponent: self.exponent + other.exponent,
        }
    }

    fn try_div(&self, other: &Self) -> Option<Self> {
        (self.exponent >= other.exponent).then(|| Self {
            exponent: self.exponent - other.exponent,
        })
    }

    fn lex_greater(&self, other: &Self) -> bool {
        self.exponent > other.exponent
    }
}

/// A sorted product of symbols, e.g. `[1, 1, 3]` for `x1^2 * x3`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Monomial {
    ids: SmallVec<[u32; 4]>,
}

impl Monomial {
    /// The empty product.
    pub fn one() -> Self {
        Self::default()
    }

    /// The single symbol `x_id`.
    pub fn var(id: u32) -> Self {
        Self {
            ids: smallvec::smallvec![id],
        }
    }

    /// Build from a list of symbol ids; the list is sorted.
    pub fn from_ids(mut ids: Vec<u32>) -> Self {
        ids.sort_unstable();
        Self { ids: ids.into() }
    }

    /// The sorted symbol-id sequence.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// The exponent of symbol `id`.
    pub fn degree_of(&self, id: u32) -> u32 {
        self.ids.iter().filter(|&&x| x == id).count() as u32
    }

    /// The smallest symbol id appearing, if any.
    pub fn min_symbol(&self) -> Option<u32> {
        self.ids.first().copied()
    }

    /// Multiply in one more symbol, keeping the sequence sorted.
    pub fn push_symbol(&mut self, id: u32) {
        let pos = self.ids.partition_point(|&x| x <= id);
        self.ids.insert(pos, id);
    }

    /// This monomial with every occurrence of `id` removed.
    pub fn strip(&self, id: u32) -> Self {
        Self {
            ids: self.ids.iter().copied().filter(|&x| x != id).collect(),
        }
    }

    /// Sorted-intersection gcd of two monomials.
    pub fn gcd(&self, other: &Self) -> Self {
        let (g, _, _) = self.gcdd(other);
        g
    }

    /// One-pass gcd with cofactors: returns `(g, self/g, other/g)`.
    pub fn gcdd(&self, other: &Self) -> (Self, Self, Self) {
        let mut g = Self::one();
        let mut a = Self::one();
        let mut b = Self::one();
        let mut i = 0;
        let mut j = 0;
        while i < self.ids.len() || j < other.ids.len() {
            let xk = self.ids.get(i).copied().unwrap_or(u32::MAX);
            let yk = other.ids.get(j).copied().unwrap_or(u32::MAX);
            match xk.cmp(&yk) {
                std::cmp::Ordering::Less => {
                    a.ids.push(xk);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    b.ids.push(yk);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    g.ids.push(xk);
                    i += 1;
                    j += 1;
                }
            }
        }
        (g, a, b)
    }

    /// `(self)^i` by squaring.
    pub fn pow(&self, i: u32) -> Self {
        crate::num::pow_by_square(self.clone(), i as usize)
    }
}

impl Exponents for Monomial {
    fn one() -> Self {
        Self::default()
    }

    fn is_one(&self) -> bool {
        self.ids.is_empty()
    }

    fn degree(&self) -> u32 {
        self.ids.len() as u32
    }

    /// Merge two sorted sequences in linear time.
    fn mul(&self, other: &Self) -> Self {
        let mut out = SmallVec::with_capacity(self.ids.len() + other.ids.len());
        let mut i = 0;
        let mut j = 0;
        while i < self.ids.len() && j < other.ids.len() {
            if self.ids[i] <= other.ids[j] {
                out.push(self.ids[i]);
                i += 1;
            } else {
                out.push(other.ids[j]);
                j += 1;
            }
        }
        out.extend_from_slice(&self.ids[i..]);
        out.extend_from_slice(&other.ids[j..]);
        Self { ids: out }
    }

    /// Submultiset division; fails when `other` is not contained.
    fn try_div(&self, other: &Self) -> Option<Self> {
        let mut out = SmallVec::new();
        let mut i = 0;
        let mut j = 0;
        while i < self.ids.len() || j < other.ids.len() {
            let a = self.ids.get(i).copied().unwrap_or(u32::MAX);
            let b = other.ids.get(j).copied().unwrap_or(u32::MAX);
            match a.cmp(&b) {
                std::cmp::Ordering::Less => {
                    out.push(a);
                    i += 1;
                }
                std::cmp::Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
                std::cmp::Ordering::Greater => return None,
            }
        }
        Some(Self { ids: out })
    }

    fn lex_greater(&self, other: &Self) -> bool {
        let d = self.degree();
        if d != other.degree() {
            return d > other.degree();
        }
        for (a, b) in self.ids.iter().zip(other.ids.iter()) {
            if a != b {
                return a < b;
            }
        }
        false
    }
}

impl Mul for Monomial {
    type Output = Monomial;

    fn mul(self, rhs: Monomial) -> Monomial {
        Exponents::mul(&self, &rhs)
    }
}

impl One for Monomial {
    fn one() -> Self {
        Monomial::default()
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ids.is_empty() {
            return write!(f, "1");
        }
        for (k, id) in self.ids.iter().enumerate() {
            if k > 0 {
                write!(f, " ")?;
            }
            write!(f, "x{}", id)?;
        }
        Ok(())
    }
}
