//! Linear algebra module.
//!
//! Contains the Householder reflection kernels, the QR decomposition built on them, and the
//! high level solvers.

use crate::Mat;

pub mod householder;
pub mod qr;
pub mod solvers;

/// Matrix decomposition that factors once and is queried afterwards.
///
/// Implementations own their workspace and scratch buffers, which only ever grow, so one
/// value can decompose a stream of matrices without reallocating.
pub trait Decomposition {
    /// Factors `a`, returning `false` when the decomposition broke down numerically. The
    /// factors remain queryable either way.
    fn decompose(&mut self, a: &mut Mat) -> bool;

    /// Returns `true` when [`decompose`](Self::decompose) consumes or overwrites its input
    /// rather than copying it.
    fn input_modified(&self) -> bool;
}

/// QR decomposition whose orthogonal and triangular factors can be rebuilt after
/// [`Decomposition::decompose`].
pub trait QrDecomposition: Decomposition {
    /// Reconstructs the orthogonal factor into `out`: the factor of the matrix in transposed
    /// storage when `transposed` is set, and its transpose otherwise.
    fn q(&mut self, out: &mut Mat, transposed: bool);

    /// Copies the triangular factor into `out`, trimmed to its nonzero rows when `compact`
    /// is set.
    fn r(&self, out: &mut Mat, compact: bool);
}
