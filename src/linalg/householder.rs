//! Block Householder reflections.
//!
//! A Householder reflection is an orthogonal transformation of the form $$H = I - \gamma v
//! v^\top,$$ where $\gamma$ is a scaling factor and $v$ is a vector normalized so that its
//! first element is $1$. Since the leading element is implicit, only the tail of $v$ is
//! stored, packed into the memory the reflection zeroed out.
//!
//! The kernels in this module scale by the largest absolute value of the input before
//! accumulating the norm, so that reflections of badly scaled columns neither overflow nor
//! underflow.

use crate::debug_assert;
use crate::Mat;

/// Returns the largest absolute value in `column`, or `0.0` if `column` is empty.
#[inline]
pub fn find_max_abs(column: &[f64]) -> f64 {
    let mut max = 0.0;
    for &e in column {
        let e = e.abs();
        if e > max {
            max = e;
        }
    }
    max
}

/// Divides every element of `column` by `max`, then returns the norm of the rescaled column,
/// negated when the leading element is negative.
pub fn compute_tau_and_divide(column: &mut [f64], max: f64) -> f64 {
    let mut tau = 0.0;
    for e in column.iter_mut() {
        *e /= max;
        tau += *e * *e;
    }
    let mut tau = tau.sqrt();
    if column[0] < 0.0 {
        tau = -tau;
    }
    tau
}

/// Overwrites `column` with the reflection that zeroes out all but its leading element.
///
/// On return, `column[0]` holds the value the reflection maps the column to (the negated
/// signed norm of the input), and `column[1..]` holds the tail of the reflection vector, whose
/// leading element is an implicit `1`. Returns the scaling factor `gamma`, or `None` when the
/// column is identically zero and no reflection exists.
pub fn make_reflector_in_place(column: &mut [f64]) -> Option<f64> {
    let max = find_max_abs(column);
    if max == 0.0 {
        return None;
    }

    let tau = compute_tau_and_divide(column, max);
    let u0 = column[0] + tau;
    for e in &mut column[1..] {
        *e /= u0;
    }
    let gamma = u0 / tau;
    column[0] = -tau * max;

    Some(gamma)
}

/// Applies the reflection `(tail, gamma)` to a single row segment.
///
/// `row[0]` lines up with the implicit unit element of the reflection vector, and
/// `row[1..]` with `tail`.
pub fn apply_reflector_to_row(tail: &[f64], gamma: f64, row: &mut [f64]) {
    debug_assert!(row.len() == tail.len() + 1);

    let mut dot = row[0];
    for (u, x) in tail.iter().zip(&row[1..]) {
        dot += u * x;
    }
    let k = gamma * dot;

    row[0] -= k;
    for (u, x) in tail.iter().zip(&mut row[1..]) {
        *x -= u * k;
    }
}

/// Multiplies `q` in place by the reflection `(tail, gamma)` on the left, touching only the
/// columns at and after `start_col`.
///
/// The reflection vector has its implicit unit element at row `head` of `q` and `tail` below
/// it. `work` is scratch for one row of `q`.
pub fn apply_reflector_on_the_left(
    q: &mut Mat,
    tail: &[f64],
    gamma: f64,
    head: usize,
    start_col: usize,
    work: &mut [f64],
) {
    let ncols = q.ncols();
    debug_assert!(all(
        head + 1 + tail.len() == q.nrows(),
        start_col <= ncols,
        work.len() >= ncols
    ));

    let stride = ncols;
    let data = q.as_mut_slice();

    // work = gamma * u^T q, over the active columns
    work[start_col..ncols].copy_from_slice(&data[head * stride + start_col..head * stride + ncols]);
    for (i, &u) in tail.iter().enumerate() {
        let row = &data[(head + 1 + i) * stride..][..ncols];
        for c in start_col..ncols {
            work[c] += u * row[c];
        }
    }
    for w in &mut work[start_col..ncols] {
        *w *= gamma;
    }

    // q -= u * work
    let head_row = &mut data[head * stride..][..ncols];
    for c in start_col..ncols {
        head_row[c] -= work[c];
    }
    for (i, &u) in tail.iter().enumerate() {
        let row = &mut data[(head + 1 + i) * stride..][..ncols];
        for c in start_col..ncols {
            row[c] -= u * work[c];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Mat;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_make_reflector_known_column() {
        let mut column = [3.0, 4.0, 0.0];
        let gamma = make_reflector_in_place(&mut column).unwrap();

        assert_approx_eq!(gamma, 1.6);
        assert_approx_eq!(column[0], -5.0);
        assert_approx_eq!(column[1], 0.5);
        assert_approx_eq!(column[2], 0.0);
    }

    #[test]
    fn test_make_reflector_negative_lead() {
        let mut column = [-3.0, 4.0, 0.0];
        let gamma = make_reflector_in_place(&mut column).unwrap();

        // The reflection maps the column onto +norm when the lead is negative.
        assert_approx_eq!(column[0], 5.0);
        assert!(gamma > 0.0);
    }

    #[test]
    fn test_make_reflector_zero_column() {
        let mut column = [0.0, 0.0, 0.0];
        assert!(make_reflector_in_place(&mut column).is_none());
    }

    #[test]
    fn test_apply_reflector_annihilates_source_column() {
        let mut column = [3.0, 4.0, 0.0];
        let gamma = make_reflector_in_place(&mut column).unwrap();
        let tail = [column[1], column[2]];

        // The reflection maps the original column onto (-5, 0, 0).
        let mut row = [3.0, 4.0, 0.0];
        apply_reflector_to_row(&tail, gamma, &mut row);
        assert_approx_eq!(row[0], -5.0);
        assert_approx_eq!(row[1], 0.0);
        assert_approx_eq!(row[2], 0.0);
    }

    #[test]
    fn test_apply_reflector_on_the_left_builds_reflection() {
        let mut h = Mat::identity(3, 3);
        let mut work = [0.0; 3];
        apply_reflector_on_the_left(&mut h, &[0.5, 0.0], 1.6, 0, 0, &mut work);

        let expected = [
            [-0.6, -0.8, 0.0], //
            [-0.8, 0.6, 0.0],
            [0.0, 0.0, 1.0],
        ];
        for i in 0..3 {
            for j in 0..3 {
                assert_approx_eq!(h[(i, j)], expected[i][j]);
            }
        }
    }

    #[test]
    fn test_apply_reflector_on_the_left_skips_leading_columns() {
        let mut h = Mat::identity(3, 3);
        let mut work = [0.0; 3];
        apply_reflector_on_the_left(&mut h, &[2.0], 0.5, 1, 1, &mut work);

        // Column 0 is left alone.
        assert_eq!(h[(0, 0)], 1.0);
        assert_eq!(h[(1, 0)], 0.0);
        assert_eq!(h[(2, 0)], 0.0);
        // Columns 1.. carry the reflection.
        assert_approx_eq!(h[(1, 1)], 0.5);
        assert_approx_eq!(h[(2, 1)], -1.0);
        assert_approx_eq!(h[(1, 2)], -1.0);
        assert_approx_eq!(h[(2, 2)], -1.0);
    }
}
