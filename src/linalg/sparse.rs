//! A compressed store for narrow, mostly-zero matrices.
//!
//! Each row is a single `u32`: the low 24 bits are a column-presence
//! mask, the high 8 bits count the non-zeros of all earlier rows. The
//! non-zero values themselves live in one flat buffer, so `get` is a
//! popcount and `insert` is a (rare) shift.

use crate::linalg::Matrix;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Maximum column count the 24-bit row masks can describe.
pub const MAX_SPARSE_COLS: usize = 24;

const MASK: u32 = 0x00ff_ffff;

/// A sparse matrix at most [`MAX_SPARSE_COLS`] columns wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmallSparseMatrix<T> {
    non_zeros: SmallVec<[T; 8]>,
    rows: SmallVec<[u32; 8]>,
    cols: usize,
}

impl<T: Copy + Default> SmallSparseMatrix<T> {
    /// An all-zero `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(cols <= MAX_SPARSE_COLS);
        Self {
            non_zeros: SmallVec::new(),
            rows: smallvec::smallvec![0; rows],
            cols,
        }
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Number of stored non-zeros.
    pub fn num_non_zeros(&self) -> usize {
        self.non_zeros.len()
    }

    /// Element at `(i, j)`; zero unless explicitly inserted.
    pub fn get(&self, i: usize, j: usize) -> T {
        assert!(j < self.cols);
        let r = self.rows[i];
        let jshift = 1u32 << j;
        if r & jshift != 0 {
            let prev_row_offset = r >> MAX_SPARSE_COLS;
            let row_offset = (r & (jshift - 1)).count_ones();
            self.non_zeros[(prev_row_offset + row_offset) as usize]
        } else {
            T::default()
        }
    }

    /// Store `x` at `(i, j)`, either overwriting an existing non-zero or
    /// shifting later non-zeros by one and re-bumping the running offsets
    /// of every later row.
    pub fn insert(&mut self, x: T, i: usize, j: usize) {
        assert!(j < self.cols);
        let r = self.rows[i];
        let jshift = 1u32 << j;
        let prev_row_offset = r >> MAX_SPARSE_COLS;
        let row_offset = (r & (jshift - 1)).count_ones();
        let k = (prev_row_offset + row_offset) as usize;
        if r & jshift != 0 {
            self.non_zeros[k] = x;
        } else {
            self.non_zeros.insert(k, x);
            self.rows[i] = r | jshift;
            for row in &mut self.rows[i + 1..] {
                *row += 1 << MAX_SPARSE_COLS;
            }
        }
    }

    /// Materialize as a dense matrix.
    pub fn to_dense(&self) -> Matrix<T> {
        let mut out = Matrix::zeros(self.num_rows(), self.cols);
        let mut k = 0;
        for (i, &r) in self.rows.iter().enumerate() {
            let mut m = r & MASK;
            let mut j = 0;
            while m != 0 {
                let tz = m.trailing_zeros();
                m >>= tz + 1;
                j += tz as usize;
                out[(i, j)] = self.non_zeros[k];
                j += 1;
                k += 1;
            }
        }
        debug_assert_eq!(k, self.non_zeros.len());
        out
    }
}

impl<T: Copy + Default> From<SmallSparseMatrix<T>> for Matrix<T> {
    fn from(sparse: SmallSparseMatrix<T>) -> Self {
        sparse.to_dense()
    }
}
