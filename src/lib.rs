//! `nullspace-qr` is a dense linear algebra crate built around one task: extracting an
//! orthonormal basis of the null space of a tall matrix, the way it is done at the core of
//! homography and fundamental-matrix estimation.
//!
//! The crate provides:
//!
//! - [`Mat`]: a dense row major `f64` matrix whose storage only ever grows, so buffers can be
//!   cycled through many problem sizes without reallocating;
//! - [`TranQr`]: a Householder QR decomposition engine that keeps the matrix being factored
//!   in transposed storage, and can either copy its input or take over its buffer as the
//!   workspace ([`AliasPolicy`]);
//! - [`NullspaceQr`]: a solver that factors the transpose of its input in place and reads the
//!   null-space basis off the trailing columns of the orthogonal factor.
//!
//! # Example
//!
//! ```
//! use nullspace_qr::{mat, Mat, NullspaceQr};
//!
//! // Rank one system: every row is a multiple of (1, 2).
//! let mut a = mat![
//!     [1.0, 2.0],
//!     [2.0, 4.0],
//!     [3.0, 6.0],
//! ];
//! let a0 = a.clone();
//!
//! let mut solver = NullspaceQr::new();
//! let mut nullspace = Mat::new();
//! solver.process(&mut a, 1, &mut nullspace);
//!
//! // One basis vector, annihilated by the original matrix.
//! assert_eq!(nullspace.nrows(), 2);
//! assert_eq!(nullspace.ncols(), 1);
//! for i in 0..3 {
//!     let r = a0[(i, 0)] * nullspace[(0, 0)] + a0[(i, 1)] * nullspace[(1, 0)];
//!     assert!(r.abs() < 1e-12);
//! }
//! ```

use equator::{assert, debug_assert};

pub mod linalg;
pub mod mat;

pub use crate::linalg::qr::{AliasPolicy, TranQr};
pub use crate::linalg::solvers::NullspaceQr;
pub use crate::linalg::{Decomposition, QrDecomposition};
pub use crate::mat::{extract, Mat};

/// Creates a [`Mat`] containing the arguments, row by row.
///
/// ```
/// use nullspace_qr::mat;
///
/// let matrix = mat![
///     [1.0, 2.0, 3.0],
///     [4.0, 5.0, 6.0],
/// ];
///
/// assert_eq!(matrix.nrows(), 2);
/// assert_eq!(matrix.ncols(), 3);
/// assert_eq!(matrix[(1, 0)], 4.0);
/// assert_eq!(matrix[(1, 2)], 6.0);
/// ```
#[macro_export]
macro_rules! mat {
    () => {
        compile_error!("number of columns in the matrix is ambiguous");
    };

    ($([$($v: expr),* $(,)?]),* $(,)?) => {{
        let rows = [$([$($v,)*],)*];
        let nrows = rows.len();
        let ncols = rows[0].len();
        $crate::Mat::from_fn(nrows, ncols, |i, j| rows[i][j])
    }};
}
