use crate::linalg::{copy_sign, NumericalFailure};
use crate::traits::{FloatScalar, MatrixMut};

/// Householder reduction of `u` (holding A, M×N with M ≥ N) to upper
/// bidiagonal form.
///
/// On return:
/// - `s[i]` holds the bidiagonal diagonal (possibly negative)
/// - `tmp[i]` holds the super-diagonal entry coupling columns `i-1` and `i`;
///   `tmp[0]` is always zero
/// - column `i` of `u` from row `i` down holds the left Householder vector
/// - row `i` of `u` from column `i+1` on holds the right Householder vector
///
/// Each column/row segment is scaled by the reciprocal of its L1 norm before
/// its Euclidean norm is taken; segments whose L1 norm does not exceed `eps`
/// are left untouched and contribute a zero diagonal/super-diagonal entry.
pub(crate) fn bidiagonalize<T: FloatScalar>(
    u: &mut impl MatrixMut<T>,
    s: &mut [T],
    tmp: &mut [T],
    eps: T,
) -> Result<(), NumericalFailure> {
    let m = u.nrows();
    let n = u.ncols();
    let zero = T::zero();

    // Super-diagonal value produced by the previous row's right reflection.
    let mut carry = zero;

    for i in 0..n {
        let ppi = i + 1;
        tmp[i] = carry;
        carry = zero;

        // ── Left reflection: zero u[i+1.., i] ──
        let mut g = zero;
        let mut scale = zero;
        for k in i..m {
            scale = scale + (*u.get(k, i)).abs();
        }
        if scale.abs() > eps {
            let mut sum_sq = zero;
            for k in i..m {
                let val = *u.get(k, i) / scale;
                *u.get_mut(k, i) = val;
                sum_sq = sum_sq + val * val;
            }
            let f = *u.get(i, i);
            if sum_sq < zero {
                return Err(NumericalFailure::LeftNormNegative);
            }
            g = -copy_sign(sum_sq.sqrt(), f);
            let h = f * g - sum_sq;
            *u.get_mut(i, i) = f - g;

            for j in ppi..n {
                let mut dot = zero;
                for k in i..m {
                    dot = dot + *u.get(k, i) * *u.get(k, j);
                }
                if h == zero {
                    return Err(NumericalFailure::LeftScaleZero);
                }
                let factor = dot / h;
                for k in i..m {
                    let val = *u.get(k, j) + factor * *u.get(k, i);
                    *u.get_mut(k, j) = val;
                }
            }
            for k in i..m {
                let val = *u.get(k, i) * scale;
                *u.get_mut(k, i) = val;
            }
        }
        s[i] = scale * g;

        // ── Right reflection: zero u[i, i+2..] ──
        if ppi == n {
            continue;
        }
        let mut scale = zero;
        for k in ppi..n {
            scale = scale + (*u.get(i, k)).abs();
        }
        if scale.abs() > eps {
            let mut sum_sq = zero;
            for k in ppi..n {
                let val = *u.get(i, k) / scale;
                *u.get_mut(i, k) = val;
                sum_sq = sum_sq + val * val;
            }
            let f = *u.get(i, ppi);
            if sum_sq < zero {
                return Err(NumericalFailure::RightNormNegative);
            }
            let g = -copy_sign(sum_sq.sqrt(), f);
            let h = f * g - sum_sq;
            *u.get_mut(i, ppi) = f - g;
            if h == zero {
                return Err(NumericalFailure::RightScaleZero);
            }

            // tmp[ppi..] is free until later iterations publish their carry.
            for k in ppi..n {
                tmp[k] = *u.get(i, k) / h;
            }
            for j in ppi..m {
                let mut dot = zero;
                for k in ppi..n {
                    dot = dot + *u.get(j, k) * *u.get(i, k);
                }
                for k in ppi..n {
                    let val = *u.get(j, k) + dot * tmp[k];
                    *u.get_mut(j, k) = val;
                }
            }
            for k in ppi..n {
                let val = *u.get(i, k) * scale;
                *u.get_mut(i, k) = val;
            }
            carry = scale * g;
        }
    }

    Ok(())
}
