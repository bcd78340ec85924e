use crate::linalg::{copy_sign, pythag, NumericalFailure, SvdSettings};
use crate::traits::{FloatScalar, MatrixMut};

/// Apply the plane rotation `(c, s)` to columns `a` and `b` of `m`:
/// `m[:, a] ← c·m[:, a] + s·m[:, b]`, `m[:, b] ← c·m[:, b] − s·m[:, a]`.
#[inline]
fn rotate_cols<T: FloatScalar>(m: &mut impl MatrixMut<T>, a: usize, b: usize, c: T, s: T) {
    for row in 0..m.nrows() {
        let x = *m.get(row, a);
        let z = *m.get(row, b);
        *m.get_mut(row, a) = x * c + z * s;
        *m.get_mut(row, b) = z * c - x * s;
    }
}

/// Drive the bidiagonal (diagonal `s`, super-diagonal `tmp[1..]`) to diagonal
/// form with implicit-shift QR sweeps, rotating the columns of `u` and `v`
/// along with it.
///
/// An off-diagonal or diagonal entry counts as zero in the split test once it
/// is negligible against the bidiagonal norm `max_i(|s[i]| + |tmp[i]|)`.
///
/// Singular values are finalized from index N-1 down to 0. Each gets at most
/// `settings.max_iter` sweeps; on convergence a negative value is negated
/// together with its column of `v`.
///
/// Returns `Ok(None)` when every value converged, `Ok(Some(k))` with the
/// highest index that exhausted its sweep budget otherwise. Values below a
/// failed index are still processed.
pub(crate) fn diagonalize<T: FloatScalar>(
    u: &mut impl MatrixMut<T>,
    s: &mut [T],
    v: &mut impl MatrixMut<T>,
    tmp: &mut [T],
    settings: &SvdSettings<T>,
) -> Result<Option<usize>, NumericalFailure> {
    let n = s.len();
    let zero = T::zero();
    let one = T::one();
    let two = one + one;
    let eps = settings.epsilon;
    let mut unconverged = None;

    let anorm = s
        .iter()
        .zip(tmp.iter())
        .fold(zero, |acc, (&d, &e)| acc.max(d.abs() + e.abs()));
    let negligible = |x: T| x.abs() + anorm == anorm;

    for k in (0..n).rev() {
        let mut converged = false;

        for sweep in 1..=settings.max_iter {
            // ── Split test ──
            // `l` ends on the first negligible super-diagonal at or above k
            // (tmp[0] is always zero), or just below a negligible diagonal entry.
            let mut l = k;
            let mut cancel = true;
            loop {
                if l == 0 || negligible(tmp[l]) {
                    cancel = false;
                    break;
                }
                if negligible(s[l - 1]) {
                    break;
                }
                l -= 1;
            }

            // ── Cancellation of tmp[l] when s[l-1] is negligible ──
            if cancel {
                let nm = l - 1;
                let mut c = zero;
                let mut sn = one;
                for i in l..=k {
                    let f = sn * tmp[i];
                    tmp[i] = c * tmp[i];
                    if negligible(f) {
                        break;
                    }
                    let g = s[i];
                    let h = pythag(f, g);
                    s[i] = h;
                    if h == zero {
                        return Err(NumericalFailure::CancellationHypotZero);
                    }
                    let h = one / h;
                    c = g * h;
                    sn = -f * h;
                    rotate_cols(u, nm, i, c, sn);
                }
            }

            let z = s[k];

            // ── Convergence ──
            if l == k {
                if z < zero {
                    s[k] = -z;
                    for row in 0..v.nrows() {
                        let val = -*v.get(row, k);
                        *v.get_mut(row, k) = val;
                    }
                }
                log::trace!(target: "hhsvd", "singular value {} converged after {} sweeps", k, sweep);
                converged = true;
                break;
            }

            // ── Wilkinson shift from the trailing 2×2 ──
            let mut x = s[l];
            let nm = k - 1;
            let y = s[nm];
            let g = tmp[nm];
            let h = tmp[k];
            // The split test leaves h and y non-negligible whenever l < k.
            if h == zero || y == zero {
                return Err(NumericalFailure::ShiftPivotZero);
            }
            let mut f = ((y - z) * (y + z) + (g - h) * (g + h)) / (two * h * y);
            let g = pythag(f, one);
            if x == zero {
                return Err(NumericalFailure::ShiftLeadZero);
            }
            let denom = f + copy_sign(g, f);
            if denom == zero {
                return Err(NumericalFailure::ShiftDenominatorZero);
            }
            f = ((x - z) * (x + z) + h * ((y / denom) - h)) / x;

            // ── Chase the bulge from l to k ──
            let mut c = one;
            let mut sn = one;
            for j in l..=nm {
                let i = j + 1;
                let mut g = tmp[i];
                let mut y = s[i];
                let mut h = sn * g;
                g = c * g;
                let z = pythag(f, h);
                tmp[j] = z;
                if z == zero {
                    return Err(NumericalFailure::RotationHypotZero);
                }
                c = f / z;
                sn = h / z;
                f = x * c + g * sn;
                g = g * c - x * sn;
                h = y * sn;
                y = y * c;
                rotate_cols(v, j, i, c, sn);

                let z = pythag(f, h);
                s[j] = z;
                // A vanishing hypotenuse keeps the previous rotation.
                if z.abs() > eps {
                    let z = one / z;
                    c = f * z;
                    sn = h * z;
                }
                f = c * g + sn * y;
                x = c * y - sn * g;
                rotate_cols(u, j, i, c, sn);
            }
            tmp[l] = zero;
            tmp[k] = f;
            s[k] = x;
        }

        if !converged {
            log::warn!(
                target: "hhsvd",
                "singular value {} did not converge in {} sweeps",
                k,
                settings.max_iter
            );
            unconverged.get_or_insert(k);
        }
    }

    Ok(unconverged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DynMatrix;
    use alloc::vec;

    fn settings(max_iter: usize) -> SvdSettings<f64> {
        SvdSettings {
            max_iter,
            ..SvdSettings::default()
        }
    }

    #[test]
    fn rotate_cols_is_orthogonal() {
        let mut m = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        let (c, s) = (0.6, 0.8);
        rotate_cols(&mut m, 0, 1, c, s);
        assert!((m[(0, 0)] - (0.6 + 1.6)).abs() < 1e-15);
        assert!((m[(0, 1)] - (1.2 - 0.8)).abs() < 1e-15);
        // Column norms are preserved in aggregate.
        let before = 1.0 + 4.0 + 9.0 + 16.0;
        assert!((m.frobenius_norm().powi(2) - before).abs() < 1e-12);
    }

    #[test]
    fn already_diagonal_converges_immediately() {
        let mut s = vec![2.0_f64, -3.0];
        let mut tmp = vec![0.0, 0.0];
        let mut u = DynMatrix::eye(2, 0.0);
        let mut v = DynMatrix::eye(2, 0.0);
        let unconverged = diagonalize(&mut u, &mut s, &mut v, &mut tmp, &settings(1)).unwrap();
        assert_eq!(unconverged, None);
        assert_eq!(s, vec![2.0, 3.0]);
        // Negated value flips the matching V column only.
        assert_eq!(v[(1, 1)], -1.0);
        assert_eq!(v[(0, 0)], 1.0);
        assert_eq!(u, DynMatrix::eye(2, 0.0));
    }

    #[test]
    fn two_by_two_bidiagonal() {
        // B = [[3, 1], [0, 2]]: σ² are the eigenvalues of BᵀB = [[9, 3], [3, 5]].
        let mut s = vec![3.0_f64, 2.0];
        let mut tmp = vec![0.0, 1.0];
        let mut u = DynMatrix::eye(2, 0.0);
        let mut v = DynMatrix::eye(2, 0.0);
        let unconverged = diagonalize(&mut u, &mut s, &mut v, &mut tmp, &settings(150)).unwrap();
        assert_eq!(unconverged, None);
        let (hi, lo) = if s[0] > s[1] { (s[0], s[1]) } else { (s[1], s[0]) };
        let disc = (4.0_f64 + 9.0).sqrt();
        assert!((hi * hi - (7.0 + disc)).abs() < 1e-10);
        assert!((lo * lo - (7.0 - disc)).abs() < 1e-10);
        assert!((hi * lo - 6.0).abs() < 1e-10);
    }

    #[test]
    fn zero_diagonal_triggers_cancellation() {
        // B = [[0, 1], [0, 1]] has singular values √2 and 0.
        let mut s = vec![0.0_f64, 1.0];
        let mut tmp = vec![0.0, 1.0];
        let mut u = DynMatrix::eye(2, 0.0);
        let mut v = DynMatrix::eye(2, 0.0);
        let unconverged = diagonalize(&mut u, &mut s, &mut v, &mut tmp, &settings(150)).unwrap();
        assert_eq!(unconverged, None);
        assert!((s[1] - 2.0_f64.sqrt()).abs() < 1e-14);
        assert_eq!(s[0], 0.0);
    }

    #[test]
    fn negligible_super_diagonal_splits() {
        // 1e-300 vanishes against ‖B‖ = 2, so each value is final at once.
        let mut s = vec![1.0_f64, 1.0];
        let mut tmp = vec![0.0, 1e-300];
        let mut u = DynMatrix::eye(2, 0.0);
        let mut v = DynMatrix::eye(2, 0.0);
        let unconverged = diagonalize(&mut u, &mut s, &mut v, &mut tmp, &settings(1)).unwrap();
        assert_eq!(unconverged, None);
        assert_eq!(s, vec![1.0, 1.0]);
        assert_eq!(v, DynMatrix::eye(2, 0.0));
    }

    #[test]
    fn graded_bidiagonal_converges() {
        let mut s = vec![1.0_f64, 1e-3, 1e-6, 1e-9];
        let mut tmp = vec![0.0, 0.5, 1e-4, 1e-7];
        let mut u = DynMatrix::eye(4, 0.0);
        let mut v = DynMatrix::eye(4, 0.0);
        let unconverged = diagonalize(&mut u, &mut s, &mut v, &mut tmp, &settings(150)).unwrap();
        assert_eq!(unconverged, None);
        assert!(s.iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn exhausted_budget_reports_highest_index() {
        let mut s = vec![3.0_f64, 2.0, 1.0];
        let mut tmp = vec![0.0, 1.0, 1.0];
        let mut u = DynMatrix::eye(3, 0.0);
        let mut v = DynMatrix::eye(3, 0.0);
        let unconverged = diagonalize(&mut u, &mut s, &mut v, &mut tmp, &settings(0)).unwrap();
        assert_eq!(unconverged, Some(2));
    }
}
