use crate::linalg::{decompose, SvdError, SvdSettings};
use crate::traits::FloatScalar;

use super::vector::DynVector;
use super::DynMatrix;

// ── DynSvd ─────────────────────────────────────────────────────────

/// Singular value decomposition of a dynamically-sized tall matrix.
///
/// Holds thin U (M×N), singular values σ (length N, non-negative, sorted
/// descending) and square V (N×N) such that `A = U · diag(σ) · Vᵀ`.
///
/// Requires M ≥ N. For a wide matrix decompose its transpose and swap the
/// roles of U and V.
///
/// # Example
///
/// ```
/// use hhsvd::DynMatrix;
///
/// let a = DynMatrix::from_rows(3, 2, &[
///     1.0_f64, 0.0,
///     0.0, 1.0,
///     0.0, 0.0,
/// ]);
/// let svd = a.svd().unwrap();
/// assert_eq!(svd.u().nrows(), 3);  // M
/// assert_eq!(svd.u().ncols(), 2);  // N
/// assert_eq!(svd.v().nrows(), 2);  // N
/// assert!((svd.singular_values()[0] - 1.0).abs() < 1e-10);
/// assert!((svd.singular_values()[1] - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct DynSvd<T> {
    u: DynMatrix<T>,
    singular_values: DynVector<T>,
    v: DynMatrix<T>,
}

impl<T: FloatScalar> DynSvd<T> {
    /// Compute the SVD with default settings.
    ///
    /// # Panics
    ///
    /// Panics if `a` has fewer rows than columns.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, SvdError>
    where
        SvdSettings<T>: Default,
    {
        Self::with_settings(a, &SvdSettings::default())
    }

    /// Compute the SVD with explicit sweep budget and epsilon.
    ///
    /// On non-convergence the partially converged factors are discarded; call
    /// [`decompose`] directly to keep them.
    ///
    /// # Panics
    ///
    /// Panics if `a` has fewer rows than columns.
    pub fn with_settings(a: &DynMatrix<T>, settings: &SvdSettings<T>) -> Result<Self, SvdError> {
        let m = a.nrows();
        let n = a.ncols();
        let zero = T::zero();

        let mut u = DynMatrix::zeros(m, n, zero);
        let mut singular_values = DynVector::zeros(n, zero);
        let mut v = DynMatrix::zeros(n, n, zero);
        let mut tmp = DynVector::zeros(n, zero);

        decompose(
            a,
            &mut u,
            singular_values.as_mut_slice(),
            &mut v,
            tmp.as_mut_slice(),
            settings,
        )?;

        Ok(Self {
            u,
            singular_values,
            v,
        })
    }

    /// The singular values, sorted descending.
    #[inline]
    pub fn singular_values(&self) -> &[T] {
        self.singular_values.as_slice()
    }

    /// The left singular vectors U (M×N). Columns are orthonormal.
    #[inline]
    pub fn u(&self) -> &DynMatrix<T> {
        &self.u
    }

    /// The right singular vectors V (N×N). Columns are orthonormal.
    #[inline]
    pub fn v(&self) -> &DynMatrix<T> {
        &self.v
    }

    /// Vᵀ (N×N). Rows are the right singular vectors.
    pub fn vt(&self) -> DynMatrix<T> {
        self.v.transpose()
    }

    /// Numerical rank: number of singular values above `tol`.
    pub fn rank(&self, tol: T) -> usize {
        self.singular_values().iter().filter(|&&s| s > tol).count()
    }

    /// Condition number: σ_max / σ_min.
    ///
    /// Returns infinity if the smallest singular value is zero, and one for
    /// an empty decomposition.
    pub fn condition_number(&self) -> T {
        let sv = self.singular_values();
        match (sv.first(), sv.last()) {
            (Some(&s_max), Some(&s_min)) => {
                if s_min == T::zero() {
                    T::infinity()
                } else {
                    s_max / s_min
                }
            }
            _ => T::one(),
        }
    }

    /// Rebuild `U · diag(σ) · Vᵀ`.
    ///
    /// ```
    /// use hhsvd::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 2.0, 2.0, 3.0]);
    /// let b = a.svd().unwrap().reconstruct();
    /// assert!((&a - &b).frobenius_norm() < 1e-12);
    /// ```
    pub fn reconstruct(&self) -> DynMatrix<T> {
        let sv = self.singular_values();
        let scaled = DynMatrix::from_fn(self.u.nrows(), self.u.ncols(), |i, k| {
            self.u[(i, k)] * sv[k]
        });
        &scaled * &self.v.transpose()
    }
}

// ── Convenience methods on DynMatrix ────────────────────────────────

impl<T: FloatScalar> DynMatrix<T> {
    /// Singular value decomposition with default settings.
    ///
    /// ```
    /// use hhsvd::DynMatrix;
    /// let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 0.0, 0.0, 4.0]);
    /// let svd = a.svd().unwrap();
    /// assert!((svd.singular_values()[0] - 4.0).abs() < 1e-10);
    /// assert!((svd.singular_values()[1] - 3.0).abs() < 1e-10);
    /// ```
    pub fn svd(&self) -> Result<DynSvd<T>, SvdError>
    where
        SvdSettings<T>: Default,
    {
        DynSvd::new(self)
    }

    /// Singular value decomposition with explicit settings.
    pub fn svd_with(&self, settings: &SvdSettings<T>) -> Result<DynSvd<T>, SvdError> {
        DynSvd::with_settings(self, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn svd_3x3_reconstruction() {
        let a = DynMatrix::from_rows(3, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 0.0]);
        let svd = a.svd().unwrap();
        let u = svd.u();
        let vt = svd.vt();
        let sv = svd.singular_values();

        for i in 0..3 {
            for j in 0..3 {
                let mut sum = 0.0;
                for k in 0..3 {
                    sum += u[(i, k)] * sv[k] * vt[(k, j)];
                }
                assert!(
                    (sum - a[(i, j)]).abs() < 1e-9,
                    "UΣVᵀ[({},{})] = {}, expected {}",
                    i,
                    j,
                    sum,
                    a[(i, j)]
                );
            }
        }
        assert!((&svd.reconstruct() - &a).frobenius_norm() < 1e-9);
    }

    #[test]
    fn svd_tall_4x2() {
        let a = DynMatrix::from_rows(4, 2, &[1.0_f64, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
        let svd = a.svd().unwrap();

        assert_eq!(svd.singular_values().len(), 2);
        assert_eq!(svd.u().nrows(), 4);
        assert_eq!(svd.u().ncols(), 2);
        assert_eq!(svd.v().nrows(), 2);
        assert_eq!(svd.v().ncols(), 2);

        // AᵀA = [[2, 1], [1, 2]], eigenvalues 3 and 1
        assert!((svd.singular_values()[0] - 3.0_f64.sqrt()).abs() < 1e-12);
        assert!((svd.singular_values()[1] - 1.0).abs() < 1e-12);
        assert!((&svd.reconstruct() - &a).frobenius_norm() < 1e-12);
    }

    #[test]
    fn svd_10x5() {
        let data: Vec<f64> = (0..50).map(|i| (i as f64 + 1.0) * 0.1).collect();
        let mut a = DynMatrix::from_vec(10, 5, data);
        for i in 0..5 {
            a[(i, i)] = a[(i, i)] + 10.0;
        }

        let svd = a.svd().unwrap();
        let sv = svd.singular_values();
        assert_eq!(sv.len(), 5);
        assert!((&svd.reconstruct() - &a).frobenius_norm() < 1e-8);
        for i in 0..4 {
            assert!(sv[i] >= sv[i + 1]);
        }
    }

    #[test]
    fn svd_rank_and_condition() {
        let a = DynMatrix::from_rows(3, 3, &[1.0_f64, 2.0, 3.0, 2.0, 4.0, 6.0, 3.0, 6.0, 9.0]);
        let svd = a.svd().unwrap();
        assert_eq!(svd.rank(1e-9), 1);
        assert!(svd.condition_number() > 1e10);
    }

    #[test]
    fn condition_number_edges() {
        let zero = DynMatrix::zeros(3, 2, 0.0_f64).svd().unwrap();
        assert_eq!(zero.rank(0.0), 0);
        assert!(zero.condition_number().is_infinite());

        let empty = DynMatrix::zeros(2, 0, 0.0_f64).svd().unwrap();
        assert_eq!(empty.condition_number(), 1.0);
        assert!(empty.singular_values().is_empty());

        let diag = DynMatrix::from_rows(2, 2, &[4.0_f64, 0.0, 0.0, -2.0]).svd().unwrap();
        assert!((diag.condition_number() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn svd_with_settings_propagates_error() {
        let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 2.0, 2.0, 3.0]);
        let settings = SvdSettings {
            max_iter: 0,
            ..SvdSettings::default()
        };
        let err = a.svd_with(&settings).unwrap_err();
        assert_eq!(
            err,
            SvdError::NonConvergence {
                index: 1,
                max_iter: 0
            }
        );
    }

    #[test]
    fn svd_f32() {
        let a = DynMatrix::from_rows(3, 2, &[2.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0]);
        let svd = a.svd().unwrap();
        assert!((svd.singular_values()[0] - 2.0).abs() < 1e-6);
        assert!((svd.singular_values()[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "M >= N")]
    fn svd_wide_panics() {
        let a = DynMatrix::zeros(2, 4, 0.0_f64);
        let _ = a.svd();
    }
}
