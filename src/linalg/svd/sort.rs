use crate::traits::{FloatScalar, MatrixMut};

#[inline]
fn swap_cols<T: Copy>(m: &mut impl MatrixMut<T>, a: usize, b: usize) {
    for row in 0..m.nrows() {
        let tmp = *m.get(row, a);
        *m.get_mut(row, a) = *m.get(row, b);
        *m.get_mut(row, b) = tmp;
    }
}

/// Selection sort of `s` into descending order, permuting the columns of
/// `u` and `v` in lock-step so `U · diag(S) · Vᵀ` is unchanged.
///
/// Ties keep their relative order.
pub(crate) fn sort_descending<T: FloatScalar>(
    s: &mut [T],
    u: &mut impl MatrixMut<T>,
    v: &mut impl MatrixMut<T>,
) {
    let n = s.len();
    for i in 0..n {
        let mut max_idx = i;
        for j in (i + 1)..n {
            if s[j] > s[max_idx] {
                max_idx = j;
            }
        }
        if max_idx != i {
            s.swap(i, max_idx);
            swap_cols(u, i, max_idx);
            swap_cols(v, i, max_idx);
        }
    }
}
