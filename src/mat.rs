//! Dense matrix container with row major storage.

use crate::assert;
use core::fmt;
use core::ops::{Index, IndexMut, Range};

/// Heap allocated, resizable matrix of `f64` values in row major order.
///
/// The backing storage only ever grows. [`Mat::reshape`] keeps the allocation whenever the new
/// dimensions fit in it, which lets a single `Mat` be cycled through many problem sizes without
/// reallocating. Routines that hold long lived scratch matrices rely on this.
pub struct Mat {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl Mat {
    /// Returns an empty matrix of dimension `0×0`, without allocating.
    #[inline]
    pub fn new() -> Self {
        Self {
            nrows: 0,
            ncols: 0,
            data: Vec::new(),
        }
    }

    /// Returns an empty matrix of dimension `0×0`, with storage reserved for an
    /// `nrows×ncols` matrix.
    #[inline]
    pub fn with_capacity(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows: 0,
            ncols: 0,
            data: Vec::with_capacity(nrows * ncols),
        }
    }

    /// Returns a matrix of dimension `nrows×ncols`, filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![0.0; nrows * ncols],
        }
    }

    /// Returns a matrix of dimension `nrows×ncols`, with ones on the main diagonal and zeros
    /// elsewhere.
    pub fn identity(nrows: usize, ncols: usize) -> Self {
        let mut out = Self::zeros(nrows, ncols);
        for i in 0..Ord::min(nrows, ncols) {
            out.data[i * ncols + i] = 1.0;
        }
        out
    }

    /// Returns a matrix of dimension `nrows×ncols`, with the element at position `(i, j)`
    /// set to `f(i, j)`.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut f = f;
        let mut data = Vec::with_capacity(nrows * ncols);
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { nrows, ncols, data }
    }

    /// Returns the number of rows of the matrix.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Returns the number of columns of the matrix.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Sets the dimensions of the matrix to `nrows×ncols`.
    ///
    /// The storage grows when the new element count exceeds the current allocation and is
    /// reused otherwise, so shrinking and growing back never moves the buffer. Element values
    /// after a reshape are unspecified: callers are expected to overwrite the matrix.
    pub fn reshape(&mut self, nrows: usize, ncols: usize) {
        let len = nrows * ncols;
        if self.data.len() < len {
            self.data.resize(len, 0.0);
        }
        self.nrows = nrows;
        self.ncols = ncols;
    }

    /// Fills every element of the matrix with `value`.
    pub fn fill(&mut self, value: f64) {
        self.as_mut_slice().fill(value);
    }

    /// Copies the transpose of `src` into `self`, reshaping `self` to `src.ncols()×src.nrows()`.
    pub fn transpose_from(&mut self, src: &Mat) {
        self.reshape(src.ncols, src.nrows);
        for i in 0..src.nrows {
            for j in 0..src.ncols {
                self.data[j * self.ncols + i] = src.data[i * src.ncols + j];
            }
        }
    }

    /// Returns the elements of the matrix as a flat slice, row by row.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data[..self.nrows * self.ncols]
    }

    /// Returns the elements of the matrix as a flat mutable slice, row by row.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data[..self.nrows * self.ncols]
    }

    /// Returns a pointer to the backing storage.
    #[inline]
    pub fn as_ptr(&self) -> *const f64 {
        self.data.as_ptr()
    }

    /// Returns row `i` of the matrix as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.nrows()`.
    #[track_caller]
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.nrows);
        &self.data[i * self.ncols..][..self.ncols]
    }

    /// Returns row `i` of the matrix as a mutable slice.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.nrows()`.
    #[track_caller]
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        assert!(i < self.nrows);
        &mut self.data[i * self.ncols..][..self.ncols]
    }
}

impl Default for Mat {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Mat {
    fn clone(&self) -> Self {
        Self {
            nrows: self.nrows,
            ncols: self.ncols,
            data: self.as_slice().to_vec(),
        }
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    #[track_caller]
    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(all(row < self.nrows, col < self.ncols));
        &self.data[row * self.ncols + col]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    #[track_caller]
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(all(row < self.nrows, col < self.ncols));
        &mut self.data[row * self.ncols + col]
    }
}

impl fmt::Debug for Mat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[\n")?;
        for i in 0..self.nrows {
            f.debug_list().entries(self.row(i).iter()).finish()?;
            f.write_str(",\n")?;
        }
        f.write_str("]")
    }
}

/// Copies the block of `src` spanned by `src_rows` and `src_cols` into `dst`, with its top left
/// corner landing at `(dst_row, dst_col)`.
///
/// # Panics
///
/// Panics if the source ranges fall outside `src`, or if the destination block falls outside
/// `dst`.
#[track_caller]
pub fn extract(
    src: &Mat,
    src_rows: Range<usize>,
    src_cols: Range<usize>,
    dst: &mut Mat,
    dst_row: usize,
    dst_col: usize,
) {
    assert!(all(
        src_rows.start <= src_rows.end,
        src_cols.start <= src_cols.end,
        src_rows.end <= src.nrows(),
        src_cols.end <= src.ncols(),
        dst_row + (src_rows.end - src_rows.start) <= dst.nrows(),
        dst_col + (src_cols.end - src_cols.start) <= dst.ncols()
    ));

    let width = src_cols.end - src_cols.start;
    for (offset, i) in src_rows.enumerate() {
        let s = &src.row(i)[src_cols.clone()];
        let d = &mut dst.row_mut(dst_row + offset)[dst_col..dst_col + width];
        d.copy_from_slice(s);
    }
}
