//! Singular value decomposition by Householder bidiagonalization followed by
//! implicit-shift QR on the bidiagonal (Golub-Kahan-Reinsch).
//!
//! The free function [`decompose`] works on caller-owned storage through the
//! [`MatrixRef`](crate::traits::MatrixRef) / [`MatrixMut`](crate::traits::MatrixMut)
//! traits. [`DynSvd`](crate::DynSvd) wraps it with owned, heap-allocated factors.

pub(crate) mod svd;

pub use svd::{decompose, svd_result_code, SvdSettings};

use crate::traits::FloatScalar;

/// Numerical breakdown inside the decomposition.
///
/// Each variant names one guarded site where the algorithm would otherwise
/// take the square root of a negative number or divide by an exact zero.
/// None of them occur for well-formed finite input; seeing one means an
/// internal invariant was violated (typically by non-finite input or an
/// `epsilon` far below the working precision).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericalFailure {
    /// Negative sum of squares in a left (column) reflection.
    LeftNormNegative,
    /// Zero scale factor `h` in a left (column) reflection.
    LeftScaleZero,
    /// Negative sum of squares in a right (row) reflection.
    RightNormNegative,
    /// Zero scale factor `h` in a right (row) reflection.
    RightScaleZero,
    /// Zero pivot while building V from the right reflections.
    RightPivotZero,
    /// Zero pivot while building U from the left reflections.
    LeftPivotZero,
    /// Zero hypotenuse while cancelling a super-diagonal entry.
    CancellationHypotZero,
    /// Zero trailing super-diagonal or diagonal entry in the shift.
    ShiftPivotZero,
    /// Zero leading diagonal entry in the shift.
    ShiftLeadZero,
    /// Zero denominator in the shift formula.
    ShiftDenominatorZero,
    /// Zero hypotenuse while chasing the bulge.
    RotationHypotZero,
}

impl NumericalFailure {
    /// Legacy integer result code (`-3` through `-13`).
    pub fn code(self) -> i32 {
        match self {
            NumericalFailure::LeftNormNegative => -3,
            NumericalFailure::LeftScaleZero => -4,
            NumericalFailure::RightNormNegative => -5,
            NumericalFailure::RightScaleZero => -6,
            NumericalFailure::RightPivotZero => -7,
            NumericalFailure::LeftPivotZero => -8,
            NumericalFailure::CancellationHypotZero => -9,
            NumericalFailure::ShiftPivotZero => -10,
            NumericalFailure::ShiftLeadZero => -11,
            NumericalFailure::ShiftDenominatorZero => -12,
            NumericalFailure::RotationHypotZero => -13,
        }
    }
}

impl core::fmt::Display for NumericalFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let what = match self {
            NumericalFailure::LeftNormNegative => "negative sum of squares in left reflection",
            NumericalFailure::LeftScaleZero => "zero scale factor in left reflection",
            NumericalFailure::RightNormNegative => "negative sum of squares in right reflection",
            NumericalFailure::RightScaleZero => "zero scale factor in right reflection",
            NumericalFailure::RightPivotZero => "zero pivot while accumulating V",
            NumericalFailure::LeftPivotZero => "zero pivot while accumulating U",
            NumericalFailure::CancellationHypotZero => "zero hypotenuse during cancellation",
            NumericalFailure::ShiftPivotZero => "zero trailing entry in shift computation",
            NumericalFailure::ShiftLeadZero => "zero leading diagonal in shift computation",
            NumericalFailure::ShiftDenominatorZero => "zero denominator in shift computation",
            NumericalFailure::RotationHypotZero => "zero hypotenuse during QR sweep",
        };
        f.write_str(what)
    }
}

/// Errors from [`decompose`] and [`DynSvd`](crate::DynSvd).
///
/// ```
/// use hhsvd::DynMatrix;
/// use hhsvd::linalg::{SvdError, SvdSettings};
///
/// let a = DynMatrix::from_rows(2, 2, &[3.0_f64, 2.0, 2.0, 3.0]);
/// let settings = SvdSettings { max_iter: 0, ..SvdSettings::<f64>::default() };
/// let err = a.svd_with(&settings).unwrap_err();
/// assert!(matches!(err, SvdError::NonConvergence { .. }));
/// assert_eq!(err.code(), -2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvdError {
    /// A singular value did not converge within `max_iter` QR sweeps.
    ///
    /// The output buffers still hold the partially converged factors.
    NonConvergence {
        /// Highest singular value index that failed to converge.
        index: usize,
        /// Sweep budget that was exhausted.
        max_iter: usize,
    },
    /// An intermediate quantity broke a numerical invariant.
    Numerical(NumericalFailure),
}

impl SvdError {
    /// Legacy integer result code: `-2` for non-convergence, `-3..=-13` for
    /// numerical failures.
    pub fn code(&self) -> i32 {
        match self {
            SvdError::NonConvergence { .. } => -2,
            SvdError::Numerical(kind) => kind.code(),
        }
    }
}

impl From<NumericalFailure> for SvdError {
    fn from(kind: NumericalFailure) -> Self {
        SvdError::Numerical(kind)
    }
}

impl core::fmt::Display for SvdError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SvdError::NonConvergence { index, max_iter } => write!(
                f,
                "singular value {} did not converge in {} iterations",
                index, max_iter
            ),
            SvdError::Numerical(kind) => write!(f, "numerical failure: {}", kind),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NumericalFailure {}

#[cfg(feature = "std")]
impl std::error::Error for SvdError {}

/// `sqrt(a² + b²)` without destructive overflow or underflow.
///
/// The larger magnitude is factored out before squaring. Returns exactly
/// zero when both arguments are zero.
///
/// ```
/// use hhsvd::linalg::pythag;
/// assert_eq!(pythag(3.0_f64, 4.0), 5.0);
/// assert_eq!(pythag(0.0_f64, 0.0), 0.0);
/// assert!((pythag(3e200_f64, 4e200) - 5e200).abs() < 1e188);
/// ```
#[inline]
pub fn pythag<T: FloatScalar>(a: T, b: T) -> T {
    let at = a.abs();
    let bt = b.abs();
    if at > bt {
        let ct = bt / at;
        at * (T::one() + ct * ct).sqrt()
    } else if bt == T::zero() {
        T::zero()
    } else {
        let ct = at / bt;
        bt * (T::one() + ct * ct).sqrt()
    }
}

/// `|target|` carrying the sign of `source`.
///
/// Unlike `f64::copysign`, a source of `-0.0` counts as non-negative.
#[inline]
pub fn copy_sign<T: FloatScalar>(target: T, source: T) -> T {
    if source >= T::zero() {
        target.abs()
    } else {
        -target.abs()
    }
}
