//! High level null-space solver.

use crate::assert;
use crate::linalg::qr::{AliasPolicy, TranQr};
use crate::mat::{extract, Mat};

/// Extracts an orthonormal basis of the null space of a tall matrix, using the QR
/// decomposition of its transpose.
///
/// For a matrix $A$ with $A^\top = QR$, the columns of $Q$ matching the vanished rows of $R$
/// are orthogonal to every row of $A$. The solver factors the transpose and returns the last
/// `num_singular_values` columns of $Q$: for an input with exactly that many negligible
/// singular values, these form an orthonormal basis of its null space. The decomposition is
/// unpivoted, so the accuracy of the basis is bounded by the conditioning of the input; the
/// caller chooses the null-space dimension, the solver does not estimate rank.
///
/// The engine and the square orthogonal factor are owned by the solver and reused across
/// calls, growing to the largest problem seen.
pub struct NullspaceQr {
    decomp: TranQr,
    q: Mat,
}

impl NullspaceQr {
    /// Returns a solver with empty scratch buffers.
    pub fn new() -> Self {
        Self {
            decomp: TranQr::with_policy(AliasPolicy::Alias),
            q: Mat::new(),
        }
    }

    /// Computes the null-space basis of `a` into `nullspace`, reshaped to
    /// `a.ncols()×num_singular_values`.
    ///
    /// `a` doubles as the factorization workspace: on return it has the same dimensions and
    /// allocation, but holds the packed factorization instead of its original values. Returns
    /// `false` when the factorization broke down on a vanished column, in which case the
    /// basis is still extracted from the reflections that did succeed.
    ///
    /// # Panics
    ///
    /// Panics if `num_singular_values > a.ncols()`, or if `a` has fewer rows than columns.
    #[track_caller]
    pub fn process(&mut self, a: &mut Mat, num_singular_values: usize, nullspace: &mut Mat) -> bool {
        assert!(num_singular_values <= a.ncols());

        let n = a.ncols();
        let ok = self.decomp.decompose(a);

        self.decomp.q(&mut self.q, true);
        nullspace.reshape(n, num_singular_values);
        extract(&self.q, 0..n, n - num_singular_values..n, nullspace, 0, 0);

        *a = self.decomp.take_qr();
        ok
    }
}

impl Default for NullspaceQr {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mat;
    use assert_approx_eq::assert_approx_eq;
    use core::cell::RefCell;
    use equator::assert;
    use rand::prelude::*;

    thread_local! {
        static RNG: RefCell<StdRng> = RefCell::new(StdRng::seed_from_u64(0));
    }

    fn random_value() -> f64 {
        RNG.with(|rng| {
            let mut rng = rng.borrow_mut();
            let rng = &mut *rng;
            rng.gen()
        })
    }

    fn mul(a: &Mat, b: &Mat) -> Mat {
        assert_eq!(a.ncols(), b.nrows());
        Mat::from_fn(a.nrows(), b.ncols(), |i, j| {
            let mut acc = 0.0;
            for k in 0..a.ncols() {
                acc += a[(i, k)] * b[(k, j)];
            }
            acc
        })
    }

    // Random m×n matrix of rank n - k.
    fn rank_deficient(m: usize, n: usize, k: usize) -> Mat {
        let left = Mat::from_fn(m, n - k, |_, _| random_value());
        let right = Mat::from_fn(n - k, n, |_, _| random_value());
        mul(&left, &right)
    }

    fn assert_annihilates(a: &Mat, nullspace: &Mat) {
        let mut scale = 0.0;
        for &x in a.as_slice() {
            scale = f64::max(scale, x.abs());
        }
        let tol = 1e-10 * (1.0 + scale) * a.ncols() as f64;

        let product = mul(a, nullspace);
        for &x in product.as_slice() {
            assert!(x.abs() < tol);
        }
    }

    fn assert_orthonormal_columns(m: &Mat) {
        for i in 0..m.ncols() {
            for j in 0..m.ncols() {
                let mut dot = 0.0;
                for k in 0..m.nrows() {
                    dot += m[(k, i)] * m[(k, j)];
                }
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_approx_eq!(dot, expected, 1e-10);
            }
        }
    }

    #[test]
    fn test_full_rank_with_empty_basis() {
        let mut a = mat![
            [1.0, 0.0], //
            [0.0, 1.0],
            [0.0, 0.0],
        ];
        let a0 = a.clone();
        let ptr = a.as_ptr();

        let mut solver = NullspaceQr::new();
        let mut nullspace = Mat::new();
        assert!(solver.process(&mut a, 0, &mut nullspace));

        assert_eq!(nullspace.nrows(), 2);
        assert_eq!(nullspace.ncols(), 0);

        // The input buffer comes back as factorization scratch: same allocation and
        // dimensions, different values.
        assert_eq!(a.as_ptr(), ptr);
        assert_eq!(a.nrows(), 3);
        assert_eq!(a.ncols(), 2);
        assert!(a.as_slice() != a0.as_slice());
    }

    #[test]
    fn test_single_null_direction() {
        let mut a = mat![
            [1.0, 0.0], //
            [0.0, 0.0],
            [0.0, 0.0],
        ];
        let a0 = a.clone();

        let mut solver = NullspaceQr::new();
        let mut nullspace = Mat::new();
        let ok = solver.process(&mut a, 1, &mut nullspace);

        // The second column vanishes during factorization.
        assert!(!ok);

        assert_eq!(nullspace.nrows(), 2);
        assert_eq!(nullspace.ncols(), 1);
        assert_approx_eq!(nullspace[(0, 0)], 0.0);
        assert_approx_eq!(nullspace[(1, 0)].abs(), 1.0);
        assert_annihilates(&a0, &nullspace);
    }

    #[test]
    fn test_output_reshaped_to_contract() {
        let mut a = rank_deficient(5, 3, 1);
        let mut solver = NullspaceQr::new();
        let mut nullspace = Mat::zeros(7, 9);
        solver.process(&mut a, 1, &mut nullspace);

        assert_eq!(nullspace.nrows(), 3);
        assert_eq!(nullspace.ncols(), 1);
    }

    #[test]
    fn test_full_width_basis_is_whole_q() {
        let mut a = Mat::from_fn(5, 3, |_, _| random_value());

        let mut solver = NullspaceQr::new();
        let mut nullspace = Mat::new();
        assert!(solver.process(&mut a, 3, &mut nullspace));

        // Asking for as many directions as there are columns returns the full orthogonal
        // factor.
        assert_eq!(nullspace.nrows(), 3);
        assert_eq!(nullspace.ncols(), 3);
        assert_orthonormal_columns(&nullspace);
        assert_eq!(nullspace.as_slice(), solver.q.as_slice());
    }

    #[test]
    fn test_random_rank_deficient() {
        for (m, n, k) in [(8, 5, 1), (9, 6, 2), (6, 4, 1)] {
            let a0 = rank_deficient(m, n, k);
            let mut a = a0.clone();

            let mut solver = NullspaceQr::new();
            let mut nullspace = Mat::new();
            solver.process(&mut a, k, &mut nullspace);

            assert_eq!(nullspace.nrows(), n);
            assert_eq!(nullspace.ncols(), k);
            assert_orthonormal_columns(&nullspace);
            assert_annihilates(&a0, &nullspace);
        }
    }

    #[test]
    fn test_solver_reuse_across_sizes() {
        let mut solver = NullspaceQr::new();
        let mut nullspace = Mat::new();

        // Sizes shrink and grow again so the scratch buffers get reused both ways.
        for (m, n) in [(3, 2), (6, 4), (4, 3), (7, 5)] {
            let a0 = rank_deficient(m, n, 1);
            let mut a = a0.clone();
            solver.process(&mut a, 1, &mut nullspace);

            assert_eq!(nullspace.nrows(), n);
            assert_eq!(nullspace.ncols(), 1);
            assert_annihilates(&a0, &nullspace);
        }
    }

    #[test]
    #[should_panic]
    fn test_basis_larger_than_column_count_panics() {
        let mut a = Mat::zeros(3, 2);
        let mut solver = NullspaceQr::new();
        let mut nullspace = Mat::new();
        solver.process(&mut a, 3, &mut nullspace);
    }

    #[test]
    #[should_panic]
    fn test_wide_input_panics() {
        let mut a = Mat::zeros(2, 4);
        let mut solver = NullspaceQr::new();
        let mut nullspace = Mat::new();
        solver.process(&mut a, 1, &mut nullspace);
    }
}
