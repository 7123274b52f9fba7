//! The QR decomposition factors a matrix $A$ into the product $$A = QR,$$ where $Q$ is an
//! orthogonal matrix and $R$ is an upper trapezoidal matrix.
//!
//! The routines in this module keep the matrix being factored in transposed storage, so that
//! the reflections that build $Q$ sweep along contiguous rows of the workspace. The packed
//! factorization overwrites that workspace: the upper part of the triangular factor lands on
//! and above the storage diagonal, and the reflection vectors fill the space below it.

/// Computing the decomposition.
pub mod compute;
/// Reconstructing the orthogonal and triangular factors from the decomposition.
pub mod reconstruct;

pub use compute::{AliasPolicy, TranQr};
