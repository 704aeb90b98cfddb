//! Dense integer matrix and vector algebra.
//!
//! Owned matrices are row-major with a row stride that may exceed the
//! logical column count, so sub-views alias the parent buffer without
//! copying. Owned and borrowed forms share one set of operations through
//! the [`MatrixRef`] capability.

pub mod normal_form;
pub mod sparse;

pub use normal_form::{
    determinant, hermite_normal_form, is_unimodular, null_space, orthogonalize,
    orthogonalize_with_pivots, solve_diophantine,
};
pub use sparse::SmallSparseMatrix;

use crate::num::gcd;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut, Range};

/// Read access shared by owned matrices and borrowed views.
pub trait MatrixRef<T: Copy> {
    /// Number of logical rows.
    fn rows(&self) -> usize;
    /// Number of logical columns.
    fn cols(&self) -> usize;
    /// Element at `(r, c)`.
    fn at(&self, r: usize, c: usize) -> T;
}

impl<T: Copy, M: MatrixRef<T>> MatrixRef<T> for &M {
    fn rows(&self) -> usize {
        (**self).rows()
    }
    fn cols(&self) -> usize {
        (**self).cols()
    }
    fn at(&self, r: usize, c: usize) -> T {
        (**self).at(r, c)
    }
}

/// A dense row-major matrix with logical shape `(rows, cols)` and a row
/// stride `>= cols`. Element `(r, c)` lives at `r * stride + c`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
    stride: usize,
}

/// The workhorse integer matrix.
pub type IntMatrix = Matrix<i64>;

impl<T: Copy + Default> Matrix<T> {
    /// A `rows x cols` matrix of default (zero) entries.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::default(); rows * cols],
            rows,
            cols,
            stride: cols,
        }
    }

    /// Build from nested row vectors. All rows must share a length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in &rows {
            assert_eq!(row.len(), ncols, "ragged rows");
            data.extend_from_slice(row);
        }
        Self {
            data,
            rows: nrows,
            cols: ncols,
            stride: ncols,
        }
    }

    /// Grow or shrink to `rows x cols`, zero-filling new entries. The
    /// buffer is repacked to a tight stride.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        let mut next = Self::zeros(rows, cols);
        for r in 0..rows.min(self.rows) {
            for c in 0..cols.min(self.cols) {
                next[(r, c)] = self[(r, c)];
            }
        }
        *self = next;
    }

    /// Drop all storage and reset the shape to `0 x 0`.
    pub fn clear(&mut self) {
        self.data = Vec::new();
        self.rows = 0;
        self.cols = 0;
        self.stride = 0;
    }

    /// Remove row `i`, shifting later rows up.
    pub fn erase_row(&mut self, i: usize) {
        assert!(i < self.rows);
        let start = i * self.stride;
        self.data.drain(start..start + self.stride);
        self.rows -= 1;
    }

    /// Remove column `j`, repacking the buffer to a tight stride.
    pub fn erase_col(&mut self, j: usize) {
        assert!(j < self.cols);
        let mut next = Self::zeros(self.rows, self.cols - 1);
        for r in 0..self.rows {
            for c in 0..self.cols - 1 {
                next[(r, c)] = self[(r, if c < j { c } else { c + 1 })];
            }
        }
        *self = next;
    }

    /// Keep only the first `n` rows.
    pub fn truncate_rows(&mut self, n: usize) {
        assert!(n <= self.rows);
        self.rows = n;
    }

    /// The transpose as a new owned matrix.
    pub fn transpose(&self) -> Self {
        let mut out = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                out[(c, r)] = self[(r, c)];
            }
        }
        out
    }
}

impl<T: Copy + Default + One> Matrix<T> {
    /// The `n x n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }
}

impl<T> Matrix<T> {
    /// Number of logical rows.
    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Number of logical columns.
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// Row stride of the underlying buffer.
    pub fn row_stride(&self) -> usize {
        self.stride
    }

    /// Row `r` as a contiguous slice.
    pub fn row(&self, r: usize) -> &[T] {
        assert!(r < self.rows);
        &self.data[r * self.stride..r * self.stride + self.cols]
    }

    /// Row `r` as a mutable contiguous slice.
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        assert!(r < self.rows);
        let start = r * self.stride;
        &mut self.data[start..start + self.cols]
    }

    /// Swap rows `i` and `j`; no-op when `i == j`. O(cols).
    pub fn swap_rows(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        assert!(i < self.rows && j < self.rows);
        for c in 0..self.cols {
            self.data.swap(i * self.stride + c, j * self.stride + c);
        }
    }

    /// Swap columns `i` and `j`; no-op when `i == j`. O(rows).
    pub fn swap_cols(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        assert!(i < self.cols && j < self.cols);
        for r in 0..self.rows {
            self.data.swap(r * self.stride + i, r * self.stride + j);
        }
    }

    /// Borrow the whole matrix as a view.
    pub fn view(&self) -> MatrixView<'_, T> {
        MatrixView {
            data: &self.data,
            rows: self.rows,
            cols: self.cols,
            stride: self.stride,
        }
    }

    /// Borrow a rectangular sub-block as a view.
    pub fn submatrix(&self, rows: Range<usize>, cols: Range<usize>) -> MatrixView<'_, T> {
        assert!(rows.end <= self.rows && cols.end <= self.cols);
        assert!(rows.start <= rows.end && cols.start <= cols.end);
        MatrixView {
            data: &self.data[rows.start * self.stride + cols.start..],
            rows: rows.end - rows.start,
            cols: cols.end - cols.start,
            stride: self.stride,
        }
    }

    /// Borrow a rectangular sub-block mutably.
    pub fn submatrix_mut(&mut self, rows: Range<usize>, cols: Range<usize>) -> MatrixViewMut<'_, T> {
        assert!(rows.end <= self.rows && cols.end <= self.cols);
        assert!(rows.start <= rows.end && cols.start <= cols.end);
        let stride = self.stride;
        MatrixViewMut {
            data: &mut self.data[rows.start * stride + cols.start..],
            rows: rows.end - rows.start,
            cols: cols.end - cols.start,
            stride,
        }
    }
}

impl<T: Copy> MatrixRef<T> for Matrix<T> {
    fn rows(&self) -> usize {
        self.rows
    }
    fn cols(&self) -> usize {
        self.cols
    }
    fn at(&self, r: usize, c: usize) -> T {
        self[(r, c)]
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (r, c): (usize, usize)) -> &T {
        assert!(r < self.rows && c < self.cols);
        &self.data[r * self.stride + c]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        assert!(r < self.rows && c < self.cols);
        &mut self.data[r * self.stride + c]
    }
}

impl<T: Copy + PartialEq> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        (0..self.rows).all(|r| self.row(r) == other.row(r))
    }
}

impl<T: Copy + Eq> Eq for Matrix<T> {}

/// A non-owning view of a matrix block. Lifetime-bound to its owner.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a, T> {
    data: &'a [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a, T: Copy> MatrixView<'a, T> {
    /// View a raw slice as a `rows x cols` matrix with the given stride.
    pub fn new(data: &'a [T], rows: usize, cols: usize, stride: usize) -> Self {
        assert!(stride >= cols);
        assert!(rows == 0 || (rows - 1) * stride + cols <= data.len());
        Self {
            data,
            rows,
            cols,
            stride,
        }
    }

    /// Row `r` of the viewed block as a slice.
    pub fn row(&self, r: usize) -> &'a [T] {
        assert!(r < self.rows);
        &self.data[r * self.stride..r * self.stride + self.cols]
    }

    /// A sub-view of this view.
    pub fn subview(&self, rows: Range<usize>, cols: Range<usize>) -> MatrixView<'a, T> {
        assert!(rows.end <= self.rows && cols.end <= self.cols);
        MatrixView {
            data: &self.data[rows.start * self.stride + cols.start..],
            rows: rows.end - rows.start,
            cols: cols.end - cols.start,
            stride: self.stride,
        }
    }

    /// Materialize the viewed block as an owned matrix.
    pub fn to_owned(&self) -> Matrix<T>
    where
        T: Default,
    {
        let mut out = Matrix::zeros(self.rows, self.cols);
        for r in 0..self.rows {
            out.row_mut(r).copy_from_slice(self.row(r));
        }
        out
    }
}

impl<'a, T: Copy> MatrixRef<T> for MatrixView<'a, T> {
    fn rows(&self) -> usize {
        self.rows
    }
    fn cols(&self) -> usize {
        self.cols
    }
    fn at(&self, r: usize, c: usize) -> T {
        assert!(r < self.rows && c < self.cols);
        self.data[r * self.stride + c]
    }
}

/// A mutable non-owning view of a matrix block.
#[derive(Debug)]
pub struct MatrixViewMut<'a, T> {
    data: &'a mut [T],
    rows: usize,
    cols: usize,
    stride: usize,
}

impl<'a, T: Copy> MatrixViewMut<'a, T> {
    /// View a raw mutable slice as a `rows x cols` matrix with the given
    /// stride.
    pub fn new(data: &'a mut [T], rows: usize, cols: usize, stride: usize) -> Self {
        assert!(stride >= cols);
        assert!(rows == 0 || (rows - 1) * stride + cols <= data.len());
        Self {
            data,
            rows,
            cols,
            stride,
        }
    }

    /// Row `r` as a mutable slice.
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        assert!(r < self.rows);
        let start = r * self.stride;
        &mut self.data[start..start + self.cols]
    }

    /// Overwrite the viewed block from any matrix of the same shape.
    pub fn copy_from(&mut self, src: &impl MatrixRef<T>) {
        assert_eq!(self.rows, src.rows());
        assert_eq!(self.cols, src.cols());
        for r in 0..self.rows {
            for c in 0..self.cols {
                self.data[r * self.stride + c] = src.at(r, c);
            }
        }
    }
}

impl<'a, T: Copy> MatrixRef<T> for MatrixViewMut<'a, T> {
    fn rows(&self) -> usize {
        self.rows
    }
    fn cols(&self) -> usize {
        self.cols
    }
    fn at(&self, r: usize, c: usize) -> T {
        assert!(r < self.rows && c < self.cols);
        self.data[r * self.stride + c]
    }
}

/// `C = A * B`, overwriting `C`.
pub fn matmul_into(c: &mut IntMatrix, a: &impl MatrixRef<i64>, b: &impl MatrixRef<i64>) {
    let (m, k, n) = (a.rows(), a.cols(), b.cols());
    assert_eq!(k, b.rows());
    assert_eq!(m, c.num_rows());
    assert_eq!(n, c.num_cols());
    for r in 0..m {
        for cc in 0..n {
            c[(r, cc)] = 0;
        }
        for kk in 0..k {
            let av = a.at(r, kk);
            for cc in 0..n {
                c[(r, cc)] += av * b.at(kk, cc);
            }
        }
    }
}

/// `A * B` as a new matrix.
pub fn matmul(a: &impl MatrixRef<i64>, b: &impl MatrixRef<i64>) -> IntMatrix {
    let mut c = IntMatrix::zeros(a.rows(), b.cols());
    matmul_into(&mut c, a, b);
    c
}

/// `C = A * B'`, overwriting `C`.
pub fn matmul_nt_into(c: &mut IntMatrix, a: &impl MatrixRef<i64>, b: &impl MatrixRef<i64>) {
    let (m, k, n) = (a.rows(), a.cols(), b.rows());
    assert_eq!(k, b.cols());
    assert_eq!(m, c.num_rows());
    assert_eq!(n, c.num_cols());
    for r in 0..m {
        for cc in 0..n {
            let mut s = 0;
            for kk in 0..k {
                s += a.at(r, kk) * b.at(cc, kk);
            }
            c[(r, cc)] = s;
        }
    }
}

/// `A * B'` as a new matrix.
pub fn matmul_nt(a: &impl MatrixRef<i64>, b: &impl MatrixRef<i64>) -> IntMatrix {
    let mut c = IntMatrix::zeros(a.rows(), b.rows());
    matmul_nt_into(&mut c, a, b);
    c
}

/// `C = A' * B`, overwriting `C`.
pub fn matmul_tn_into(c: &mut IntMatrix, a: &impl MatrixRef<i64>, b: &impl MatrixRef<i64>) {
    let (m, k, n) = (a.cols(), a.rows(), b.cols());
    assert_eq!(k, b.rows());
    assert_eq!(m, c.num_rows());
    assert_eq!(n, c.num_cols());
    for r in 0..m {
        for cc in 0..n {
            let mut s = 0;
            for kk in 0..k {
                s += a.at(kk, r) * b.at(kk, cc);
            }
            c[(r, cc)] = s;
        }
    }
}

/// `A' * B` as a new matrix.
pub fn matmul_tn(a: &impl MatrixRef<i64>, b: &impl MatrixRef<i64>) -> IntMatrix {
    let mut c = IntMatrix::zeros(a.cols(), b.cols());
    matmul_tn_into(&mut c, a, b);
    c
}

/// `C = A' * B'`, overwriting `C`.
pub fn matmul_tt_into(c: &mut IntMatrix, a: &impl MatrixRef<i64>, b: &impl MatrixRef<i64>) {
    let (m, k, n) = (a.cols(), a.rows(), b.rows());
    assert_eq!(k, b.cols());
    assert_eq!(m, c.num_rows());
    assert_eq!(n, c.num_cols());
    for r in 0..m {
        for cc in 0..n {
            let mut s = 0;
            for kk in 0..k {
                s += a.at(kk, r) * b.at(cc, kk);
            }
            c[(r, cc)] = s;
        }
    }
}

/// `A' * B'` as a new matrix.
pub fn matmul_tt(a: &impl MatrixRef<i64>, b: &impl MatrixRef<i64>) -> IntMatrix {
    let mut c = IntMatrix::zeros(a.cols(), b.rows());
    matmul_tt_into(&mut c, a, b);
    c
}

/// Divide a row by the gcd of its entries so it has unit content.
/// A zero row is left unchanged; a single-entry row becomes `1`.
pub fn normalize_by_gcd(row: &mut [i64]) {
    if row.iter().all(|&x| x == 0) {
        return;
    }
    if row.len() == 1 {
        row[0] = 1;
        return;
    }
    let mut g = gcd(row[0], row[1]);
    for &x in &row[2..] {
        if g == 1 {
            break;
        }
        g = gcd(g, x);
    }
    if g > 1 {
        for x in row.iter_mut() {
            *x /= g;
        }
    }
}

/// GCD of a slice of integers (0 for the empty slice).
pub fn vector_gcd(v: &[i64]) -> i64 {
    v.iter().fold(0, |acc, &x| gcd(acc, x))
}

impl fmt::Display for IntMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            write!(f, "{}", if r == 0 { "[ " } else { "  " })?;
            for c in 0..self.cols {
                let v = self[(r, c)];
                if v >= 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", v)?;
                if c + 1 != self.cols {
                    write!(f, " ")?;
                }
            }
            if r + 1 != self.rows {
                writeln!(f)?;
            }
        }
        write!(f, " ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_index() {
        let m = IntMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(m.num_rows(), 2);
        assert_eq!(m.num_cols(), 3);
        assert_eq!(m[(1, 2)], 6);
        assert_eq!(m.row(0), &[1, 2, 3]);
    }

    #[test]
    fn test_matmul_identity() {
        let a = IntMatrix::from_rows(vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        let i2 = IntMatrix::identity(2);
        let i3 = IntMatrix::identity(3);
        assert_eq!(matmul(&a, &i2), a);
        assert_eq!(matmul(&i3, &a), a);
    }

    #[test]
    fn test_matmul() {
        let a = IntMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let b = IntMatrix::from_rows(vec![vec![5, 6], vec![7, 8]]);
        let c = matmul(&a, &b);
        assert_eq!(c, IntMatrix::from_rows(vec![vec![19, 22], vec![43, 50]]));
    }

    #[test]
    fn test_matmul_transposed_variants() {
        let a = IntMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let b = IntMatrix::from_rows(vec![vec![5, 6], vec![7, 8]]);
        assert_eq!(matmul_nt(&a, &b.transpose()), matmul(&a, &b));
        assert_eq!(matmul_tn(&a.transpose(), &b), matmul(&a, &b));
        assert_eq!(matmul_tt(&a.transpose(), &b.transpose()), matmul(&a, &b));
    }

    #[test]
    fn test_swap_rows_involution() {
        let orig = IntMatrix::from_rows(vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
        let mut m = orig.clone();
        m.swap_rows(0, 2);
        assert_ne!(m, orig);
        m.swap_rows(0, 2);
        assert_eq!(m, orig);
        m.swap_rows(1, 1);
        assert_eq!(m, orig);
    }

    #[test]
    fn test_swap_cols() {
        let mut m = IntMatrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        m.swap_cols(0, 1);
        assert_eq!(m, IntMatrix::from_rows(vec![vec![2, 1], vec![4, 3]]));
    }

    #[test]
    fn test_normalize_by_gcd() {
        let mut r = [4i64, -6, 8];
        normalize_by_gcd(&mut r);
        assert_eq!(r, [2, -3, 4]);
        let mut z = [0i64, 0];
        normalize_by_gcd(&mut z);
        assert_eq!(z, [0, 0]);
        let mut s = [-7i64];
        normalize_by_gcd(&mut s);
        assert_eq!(s, [1]);
    }

    #[test]
    fn test_erase_row_col() {
        let mut m = IntMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
        m.erase_row(1);
        assert_eq!(m, IntMatrix::from_rows(vec![vec![1, 2, 3], vec![7, 8, 9]]));
        m.erase_col(0);
        assert_eq!(m, IntMatrix::from_rows(vec![vec![2, 3], vec![8, 9]]));
    }

    #[test]
    fn test_submatrix_view_aliases_owner() {
        let m = IntMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
        let v = m.submatrix(1..3, 1..3);
        assert_eq!(v.rows(), 2);
        assert_eq!(v.cols(), 2);
        assert_eq!(v.at(0, 0), 5);
        assert_eq!(v.at(1, 1), 9);
        let vv = v.subview(1..2, 0..2);
        assert_eq!(vv.row(0), &[8, 9]);
        assert_eq!(vv.to_owned(), IntMatrix::from_rows(vec![vec![8, 9]]));
    }

    #[test]
    fn test_submatrix_mut_writes_through() {
        let mut m = IntMatrix::zeros(2, 4);
        let mut v = m.submatrix_mut(0..2, 2..4);
        v.row_mut(1)[0] = 7;
        assert_eq!(m[(1, 2)], 7);
    }

    #[test]
    fn test_transpose() {
        let m = IntMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let t = m.transpose();
        assert_eq!(t, IntMatrix::from_rows(vec![vec![1, 4], vec![2, 5], vec![3, 6]]));
    }
}
