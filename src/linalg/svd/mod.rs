mod accumulate;
mod bidiag;
mod diagonalize;
mod sort;


use crate::linalg::SvdError;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

pub(crate) use accumulate::{accumulate_left, accumulate_right};
pub(crate) use bidiag::bidiagonalize;
pub(crate) use diagonalize::diagonalize;
pub(crate) use sort::sort_descending;

/// Settings for [`decompose`].
#[derive(Debug, Clone, Copy)]
pub struct SvdSettings<T> {
    /// Maximum number of implicit QR sweeps allowed per singular value.
    pub max_iter: usize,
    /// Magnitudes at or below this are treated as zero when deciding whether
    /// a reflection or rotation is applied.
    pub epsilon: T,
}

impl Default for SvdSettings<f64> {
    fn default() -> Self {
        Self {
            max_iter: 150,
            epsilon: 1e-300,
        }
    }
}

impl Default for SvdSettings<f32> {
    fn default() -> Self {
        Self {
            max_iter: 150,
            epsilon: f32::MIN_POSITIVE,
        }
    }
}

/// Singular value decomposition `A = U · diag(S) · Vᵀ` of an M×N matrix (M ≥ N).
///
/// All outputs are caller-owned and fully overwritten:
/// - `u` (M×N) receives the left singular vectors as orthonormal columns
/// - `s` (length N) receives the singular values, non-negative and sorted descending
/// - `v` (N×N) receives the right singular vectors as orthonormal columns
/// - `tmp` (length N) is scratch space
///
/// The stages run in a fixed order, each with exclusive access to the buffers
/// it mutates: bidiagonalization, accumulation of V, accumulation of U,
/// diagonalization of the bidiagonal, and the descending sort.
///
/// # Errors
///
/// Returns [`SvdError::NonConvergence`] if a singular value needs more than
/// `settings.max_iter` QR sweeps. The remaining values are still processed
/// and sorted, so the buffers hold the partially converged factors.
///
/// Returns [`SvdError::Numerical`] if a guarded division or square root
/// would break down. The buffers are left mid-computation.
///
/// # Panics
///
/// Panics if `M < N` or any buffer has the wrong shape.
///
/// # Example
///
/// ```
/// use hhsvd::{DynMatrix, DynVector};
/// use hhsvd::linalg::{decompose, SvdSettings};
///
/// let a = DynMatrix::from_rows(3, 2, &[
///     3.0_f64, 0.0,
///     0.0, -4.0,
///     0.0, 0.0,
/// ]);
/// let mut u = DynMatrix::zeros(3, 2, 0.0);
/// let mut s = DynVector::zeros(2, 0.0);
/// let mut v = DynMatrix::zeros(2, 2, 0.0);
/// let mut tmp = DynVector::zeros(2, 0.0);
///
/// decompose(
///     &a,
///     &mut u,
///     s.as_mut_slice(),
///     &mut v,
///     tmp.as_mut_slice(),
///     &SvdSettings::default(),
/// )
/// .unwrap();
/// assert!((s[0] - 4.0).abs() < 1e-12);
/// assert!((s[1] - 3.0).abs() < 1e-12);
/// ```
pub fn decompose<T: FloatScalar>(
    a: &impl MatrixRef<T>,
    u: &mut impl MatrixMut<T>,
    s: &mut [T],
    v: &mut impl MatrixMut<T>,
    tmp: &mut [T],
    settings: &SvdSettings<T>,
) -> Result<(), SvdError> {
    let m = a.nrows();
    let n = a.ncols();
    assert!(m >= n, "SVD requires M >= N; got {}x{}", m, n);
    assert!(
        u.nrows() == m && u.ncols() == n,
        "U must be {}x{}, got {}x{}",
        m,
        n,
        u.nrows(),
        u.ncols()
    );
    assert!(
        v.nrows() == n && v.ncols() == n,
        "V must be {}x{}, got {}x{}",
        n,
        n,
        v.nrows(),
        v.ncols()
    );
    assert_eq!(s.len(), n, "singular value buffer length mismatch");
    assert_eq!(tmp.len(), n, "workspace length mismatch");

    log::debug!(
        target: "hhsvd",
        "decomposing {}x{} matrix (max_iter = {}, epsilon = {:?})",
        m,
        n,
        settings.max_iter,
        settings.epsilon
    );

    for j in 0..n {
        for i in 0..m {
            *u.get_mut(i, j) = *a.get(i, j);
        }
    }

    let result = run_stages(u, s, v, tmp, settings);
    if let Err(SvdError::Numerical(kind)) = result {
        log::warn!(target: "hhsvd", "SVD aborted: {} (code {})", kind, kind.code());
    }
    result
}

fn run_stages<T: FloatScalar>(
    u: &mut impl MatrixMut<T>,
    s: &mut [T],
    v: &mut impl MatrixMut<T>,
    tmp: &mut [T],
    settings: &SvdSettings<T>,
) -> Result<(), SvdError> {
    let eps = settings.epsilon;

    bidiagonalize(u, s, tmp, eps)?;
    accumulate_right(&*u, v, tmp, eps)?;
    accumulate_left(u, s, eps)?;
    let unconverged = diagonalize(u, s, v, tmp, settings)?;
    sort_descending(s, u, v);

    match unconverged {
        Some(index) => Err(SvdError::NonConvergence {
            index,
            max_iter: settings.max_iter,
        }),
        None => Ok(()),
    }
}

/// Map the outcome of [`decompose`] to its legacy integer code:
/// `0` on success, `-2` on non-convergence, `-3..=-13` on numerical failure.
///
/// ```
/// use hhsvd::linalg::{svd_result_code, SvdError};
/// assert_eq!(svd_result_code(&Ok(())), 0);
/// let err = SvdError::NonConvergence { index: 0, max_iter: 1 };
/// assert_eq!(svd_result_code(&Err(err)), -2);
/// ```
pub fn svd_result_code(result: &Result<(), SvdError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}
