use crate::linalg::NumericalFailure;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};

/// Build V (N×N) from the right Householder vectors packed in the rows of `u`.
///
/// Columns are processed from N-1 down to 0. The reflection for column `i`
/// uses the super-diagonal `tmp[i + 1]` as its scale; a scale at or below
/// `eps` means no reflection was applied and the block stays identity.
pub(crate) fn accumulate_right<T: FloatScalar>(
    u: &impl MatrixRef<T>,
    v: &mut impl MatrixMut<T>,
    tmp: &[T],
    eps: T,
) -> Result<(), NumericalFailure> {
    let n = v.ncols();
    let zero = T::zero();

    for i in (0..n).rev() {
        let ppi = i + 1;
        if ppi < n {
            let g = tmp[ppi];
            if g.abs() > eps {
                let pivot = *u.get(i, ppi);
                if pivot == zero {
                    return Err(NumericalFailure::RightPivotZero);
                }
                for j in ppi..n {
                    *v.get_mut(j, i) = (*u.get(i, j) / pivot) / g;
                }
                for j in ppi..n {
                    let mut dot = zero;
                    for k in ppi..n {
                        dot = dot + *u.get(i, k) * *v.get(k, j);
                    }
                    for k in ppi..n {
                        let val = *v.get(k, j) + dot * *v.get(k, i);
                        *v.get_mut(k, j) = val;
                    }
                }
            }
            for j in ppi..n {
                *v.get_mut(i, j) = zero;
                *v.get_mut(j, i) = zero;
            }
        }
        *v.get_mut(i, i) = T::one();
    }

    Ok(())
}

/// Turn the left Householder vectors stored in the columns of `u` into the
/// explicit M×N factor U, in place.
///
/// Indices are processed from N-1 down to 0 with `s[i]` as the reflection
/// scale. A scale at or below `eps` degenerates to the identity column.
pub(crate) fn accumulate_left<T: FloatScalar>(
    u: &mut impl MatrixMut<T>,
    s: &[T],
    eps: T,
) -> Result<(), NumericalFailure> {
    let m = u.nrows();
    let n = u.ncols();
    let zero = T::zero();

    for i in (0..m.min(n)).rev() {
        let ppi = i + 1;
        let g = s[i];
        for j in ppi..n {
            *u.get_mut(i, j) = zero;
        }
        if g.abs() > eps {
            let g = T::one() / g;
            for j in ppi..n {
                let mut dot = zero;
                for k in ppi..m {
                    dot = dot + *u.get(k, i) * *u.get(k, j);
                }
                let pivot = *u.get(i, i);
                if pivot == zero {
                    return Err(NumericalFailure::LeftPivotZero);
                }
                let factor = (dot / pivot) * g;
                for k in i..m {
                    let val = *u.get(k, j) + factor * *u.get(k, i);
                    *u.get_mut(k, j) = val;
                }
            }
            for j in i..m {
                let val = *u.get(j, i) * g;
                *u.get_mut(j, i) = val;
            }
        } else {
            for j in i..m {
                *u.get_mut(j, i) = zero;
            }
        }
        let diag = *u.get(i, i) + T::one();
        *u.get_mut(i, i) = diag;
    }

    Ok(())
}
