use hhsvd::DynMatrix;
use proptest::prelude::*;

prop_compose! {
    fn tall_matrix()(n in 1usize..6, extra in 0usize..4,
                     values in prop::collection::vec(-10f64..10f64, 1..=64))
                     -> DynMatrix<f64> {
        let m = n + extra;
        let data = values.into_iter().cycle().take(m * n).collect::<Vec<_>>();
        DynMatrix::from_vec(m, n, data)
    }
}

fn gram_error(q: &DynMatrix<f64>) -> f64 {
    let qtq = &q.transpose() * q;
    (&qtq - &DynMatrix::eye(q.ncols(), 0.0)).frobenius_norm()
}

proptest! {
    #[test]
    fn reconstructs_input(a in tall_matrix()) {
        let svd = a.svd().expect("svd");
        let err = (&svd.reconstruct() - &a).frobenius_norm();
        prop_assert!(err <= 1e-10 * a.frobenius_norm().max(1.0), "error {}", err);
    }

    #[test]
    fn factors_are_orthonormal(a in tall_matrix()) {
        let svd = a.svd().expect("svd");
        prop_assert!(gram_error(svd.u()) < 1e-10);
        prop_assert!(gram_error(svd.v()) < 1e-10);
    }

    #[test]
    fn values_sorted_and_non_negative(a in tall_matrix()) {
        let svd = a.svd().expect("svd");
        let s = svd.singular_values();
        prop_assert!(s.iter().all(|&x| x >= 0.0));
        prop_assert!(s.windows(2).all(|w| w[0] >= w[1]));
        // ‖A‖_F² = Σσ²
        let sum_sq: f64 = s.iter().map(|x| x * x).sum();
        let fro = a.frobenius_norm();
        prop_assert!((sum_sq.sqrt() - fro).abs() <= 1e-10 * fro.max(1.0));
    }

    #[test]
    fn scaling_scales_values(a in tall_matrix(), alpha in 0.1f64..10.0) {
        let scaled = DynMatrix::from_fn(a.nrows(), a.ncols(), |i, j| alpha * a[(i, j)]);
        let s1 = a.svd().expect("svd");
        let s2 = scaled.svd().expect("svd");
        for (x, y) in s1.singular_values().iter().zip(s2.singular_values()) {
            prop_assert!((alpha * x - y).abs() <= 1e-9 * (1.0 + alpha * x));
        }
    }
}
