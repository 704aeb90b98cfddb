//! Error types for the analysis kernel.
//!
//! Exactly one error kind crosses the library boundary: an exact integer
//! computation overflowed the machine word. "Undecided sign" is not an
//! error; the partial-order oracle answers `false` and callers keep the
//! affected constraint.

use thiserror::Error;

/// An exact integer operation exceeded the range of `i64`.
///
/// Rational arithmetic, polynomial coefficient arithmetic, and constraint
/// combination all surface this instead of truncating. The kernel never
/// attempts recovery; retry with wider integers.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("arithmetic overflow in exact integer computation")]
pub struct ArithmeticOverflow;

/// Result type for exact (overflow-checked) computations.
pub type ExactResult<T> = Result<T, ArithmeticOverflow>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let s = format!("{}", ArithmeticOverflow);
        assert!(s.contains("overflow"));
    }
}
