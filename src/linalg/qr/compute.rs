//! Computing the QR decomposition in transposed storage.

use core::mem;

use crate::assert;
use crate::linalg::{householder, qr::reconstruct, Decomposition, QrDecomposition};
use crate::Mat;

/// Selects how [`TranQr::decompose`] acquires its workspace.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AliasPolicy {
    /// The input already holds the transpose of the matrix to factor, and its buffer is taken
    /// over as the workspace. No copy is made, and the input is left empty until
    /// [`TranQr::take_qr`] hands the buffer back.
    Alias,
    /// The input is the matrix to factor. Its transpose is copied into an internal workspace
    /// and the input is left untouched.
    Copy,
}

/// Householder QR decomposition engine working on the transpose of the matrix being factored.
///
/// Keeping the factored matrix transposed makes every column of it contiguous in memory, so
/// the reflection kernels run along slices instead of strided columns, and the triangular
/// factor accumulates along rows of the workspace. One engine can factor a stream of matrices:
/// its scratch buffers only ever grow, and reconstruction buffers are reused across calls.
///
/// ```
/// use nullspace_qr::{mat, Mat, TranQr};
///
/// let mut a = mat![
///     [2.0, 1.0],
///     [0.0, 3.0],
///     [2.0, 4.0],
/// ];
/// let a0 = a.clone();
///
/// let mut qr = TranQr::new();
/// assert!(qr.decompose(&mut a));
///
/// let (mut q, mut r) = (Mat::new(), Mat::new());
/// qr.q(&mut q, true);
/// qr.r(&mut r, false);
///
/// // q * r reproduces the input.
/// for i in 0..3 {
///     for j in 0..2 {
///         let mut x = 0.0;
///         for k in 0..3 {
///             x += q[(i, k)] * r[(k, j)];
///         }
///         assert!((x - a0[(i, j)]).abs() < 1e-12);
///     }
/// }
/// ```
pub struct TranQr {
    qr: Mat,
    gammas: Vec<f64>,
    v: Vec<f64>,
    nrows: usize,
    ncols: usize,
    min_len: usize,
    failed: bool,
    policy: AliasPolicy,
}

impl TranQr {
    /// Returns an engine that copies its input, leaving it untouched.
    pub fn new() -> Self {
        Self::with_policy(AliasPolicy::Copy)
    }

    /// Returns an engine with the given workspace policy.
    pub fn with_policy(policy: AliasPolicy) -> Self {
        Self {
            qr: Mat::new(),
            gammas: Vec::new(),
            v: Vec::new(),
            nrows: 0,
            ncols: 0,
            min_len: 0,
            failed: false,
            policy,
        }
    }

    /// Records the dimensions of the matrix to factor and grows the scratch buffers to fit
    /// them. Buffers never shrink; a call with smaller or equal dimensions leaves them alone.
    pub fn reserve(&mut self, nrows: usize, ncols: usize) {
        self.nrows = nrows;
        self.ncols = ncols;
        self.min_len = Ord::min(nrows, ncols);

        let max_len = Ord::max(nrows, ncols);
        if self.v.len() < max_len {
            self.v = vec![0.0; max_len];
        }
        if self.gammas.len() < self.min_len {
            self.gammas = vec![0.0; self.min_len];
        }
    }

    /// Factors the matrix held in `a`, returning `false` when a column of the working region
    /// vanished and its reflection had to be skipped.
    ///
    /// Under [`AliasPolicy::Copy`], `a` is the matrix to factor and is left untouched. Under
    /// [`AliasPolicy::Alias`], `a` holds the transpose of the matrix to factor, its buffer is
    /// taken over as the workspace (leaving `a` empty), and only the leading
    /// `a.ncols()×a.ncols()` region of it is ever read or written: the factorization of the
    /// transpose needs `a.ncols()` reflections, none of which reference the rows past that
    /// point, so the updates that would only feed the discarded right part of the triangular
    /// factor are skipped along with the memory traffic they would cost.
    ///
    /// A vanished column contributes the identity (its scaling factor is recorded as zero) and
    /// the remaining columns are still processed, so the orthogonal factor stays orthogonal
    /// either way.
    ///
    /// # Panics
    ///
    /// Under [`AliasPolicy::Alias`], panics if `a` has fewer rows than columns.
    #[track_caller]
    pub fn decompose(&mut self, a: &mut Mat) -> bool {
        match self.policy {
            AliasPolicy::Alias => {
                assert!(a.nrows() >= a.ncols());
                let size = a.ncols();
                self.reserve(size, size);
                self.qr = mem::take(a);
            }
            AliasPolicy::Copy => {
                self.reserve(a.nrows(), a.ncols());
                self.qr.transpose_from(a);
            }
        }
        self.factor()
    }

    fn factor(&mut self) -> bool {
        self.failed = false;

        let stride = self.nrows;
        // Working region: exactly the first `ncols` storage rows. Under the aliasing policy
        // this is the leading square block of a taller buffer.
        let data = &mut self.qr.as_mut_slice()[..self.ncols * stride];

        for j in 0..self.min_len {
            let start = j * stride + j;
            let end = j * stride + stride;

            match householder::make_reflector_in_place(&mut data[start..end]) {
                Some(gamma) => {
                    self.gammas[j] = gamma;

                    let (done, rest) = data.split_at_mut((j + 1) * stride);
                    let tail = &done[start + 1..end];
                    for row in rest.chunks_exact_mut(stride) {
                        householder::apply_reflector_to_row(tail, gamma, &mut row[j..]);
                    }
                }
                None => {
                    self.gammas[j] = 0.0;
                    self.failed = true;
                }
            }
        }

        !self.failed
    }

    /// Reconstructs the orthogonal factor into `out`, reshaping it to the square dimension of
    /// the factor.
    ///
    /// With `transposed == true` this is the factor $Q$ of the matrix held in transposed
    /// storage; with `transposed == false` it is $Q^\top$, the orientation matching the
    /// untransposed system.
    pub fn q(&mut self, out: &mut Mat, transposed: bool) {
        reconstruct::accumulate_q(out, &self.qr, &self.gammas, transposed, &mut self.v);
    }

    /// Copies the triangular factor into `out`, trimmed to its leading rows when `compact` is
    /// set.
    pub fn r(&self, out: &mut Mat, compact: bool) {
        reconstruct::copy_r(out, &self.qr, self.ncols, compact);
    }

    /// Moves the factored workspace out of the engine. Under [`AliasPolicy::Alias`] this is
    /// the buffer of the matrix that was decomposed, handed back to its owner.
    ///
    /// The engine is left empty; reconstructing factors requires a fresh
    /// [`decompose`](Self::decompose) call.
    pub fn take_qr(&mut self) -> Mat {
        self.nrows = 0;
        self.ncols = 0;
        self.min_len = 0;
        mem::take(&mut self.qr)
    }
}

impl Default for TranQr {
    fn default() -> Self {
        Self::new()
    }
}

impl Decomposition for TranQr {
    #[track_caller]
    fn decompose(&mut self, a: &mut Mat) -> bool {
        TranQr::decompose(self, a)
    }

    fn input_modified(&self) -> bool {
        self.policy == AliasPolicy::Alias
    }
}

impl QrDecomposition for TranQr {
    fn q(&mut self, out: &mut Mat, transposed: bool) {
        TranQr::q(self, out, transposed);
    }

    fn r(&self, out: &mut Mat, compact: bool) {
        TranQr::r(self, out, compact);
    }
}
