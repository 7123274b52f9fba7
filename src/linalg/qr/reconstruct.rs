//! Reconstructing the factors of the QR decomposition.

use crate::assert;
use crate::linalg::householder;
use crate::Mat;

/// Accumulates the orthogonal factor from the packed decomposition into `dst`, reshaping it to
/// the square dimension of the factor.
///
/// `qr_factors` holds the factored matrix in transposed storage: storage row `j` packs the
/// `j`-th reflection below the diagonal of the triangular factor. With `transposed == true`
/// the reflections are accumulated in reverse order, which yields the factor $Q$ of the
/// factored matrix and lets each step skip the columns that are still untouched identity.
/// With `transposed == false` they are accumulated in forward order over the full width,
/// yielding $Q^\top$.
///
/// Reflections recorded with a zero scaling factor contribute the identity.
///
/// # Panics
///
/// Panics if `gammas` holds fewer scaling factors than the decomposition has reflections, or
/// if `work` is shorter than the square dimension of the factor.
#[track_caller]
pub fn accumulate_q(
    dst: &mut Mat,
    qr_factors: &Mat,
    gammas: &[f64],
    transposed: bool,
    work: &mut [f64],
) {
    let side = qr_factors.ncols();
    let min_len = Ord::min(qr_factors.nrows(), qr_factors.ncols());
    assert!(all(gammas.len() >= min_len, work.len() >= side));

    dst.reshape(side, side);
    dst.fill(0.0);
    for i in 0..side {
        dst[(i, i)] = 1.0;
    }

    if transposed {
        for j in (0..min_len).rev() {
            let gamma = gammas[j];
            if gamma != 0.0 {
                let tail = &qr_factors.row(j)[j + 1..];
                householder::apply_reflector_on_the_left(dst, tail, gamma, j, j, work);
            }
        }
    } else {
        for j in 0..min_len {
            let gamma = gammas[j];
            if gamma != 0.0 {
                let tail = &qr_factors.row(j)[j + 1..];
                householder::apply_reflector_on_the_left(dst, tail, gamma, j, 0, work);
            }
        }
    }
}

/// Copies the triangular factor out of the packed decomposition into `dst`.
///
/// `ncols` is the column count of the factored matrix, which also selects how many storage
/// rows of `qr_factors` participate. With `compact == true` the factor is trimmed to
/// `min_len×ncols`, otherwise it keeps the full `nrows×ncols` shape with explicit zero rows
/// at the bottom.
///
/// # Panics
///
/// Panics if `ncols` exceeds the number of storage rows of `qr_factors`.
#[track_caller]
pub fn copy_r(dst: &mut Mat, qr_factors: &Mat, ncols: usize, compact: bool) {
    let nrows = qr_factors.ncols();
    let min_len = Ord::min(nrows, ncols);
    assert!(ncols <= qr_factors.nrows());

    let rows = if compact { min_len } else { nrows };
    dst.reshape(rows, ncols);
    dst.fill(0.0);
    for i in 0..min_len {
        for j in i..ncols {
            dst[(i, j)] = qr_factors.row(j)[i];
        }
    }
}
