//! Property tests: retraction output is always SPD and KL is a divergence.

use doxa_core::{kl_gaussian, retract_spd_cholesky};
use doxa_data::Gaussian;
use nalgebra::{Cholesky, DMatrix, DVector};
use proptest::prelude::*;

fn symmetric_matrix_3() -> impl Strategy<Value = DMatrix<f64>> {
    // Six independent entries of a symmetric 3x3 matrix.
    prop::collection::vec(-10.0f64..10.0, 6).prop_map(|v| {
        DMatrix::from_row_slice(
            3,
            3,
            &[
                v[0], v[1], v[2], //
                v[1], v[3], v[4], //
                v[2], v[4], v[5],
            ],
        )
    })
}

fn spd_matrix_3() -> impl Strategy<Value = DMatrix<f64>> {
    // A A^T + I is SPD for any A.
    prop::collection::vec(-3.0f64..3.0, 9).prop_map(|v| {
        let a = DMatrix::from_row_slice(3, 3, &v);
        &a * a.transpose() + DMatrix::identity(3, 3)
    })
}

fn gaussian_3() -> impl Strategy<Value = Gaussian> {
    (prop::collection::vec(-5.0f64..5.0, 3), spd_matrix_3())
        .prop_map(|(mean, cov)| Gaussian::new(DVector::from_vec(mean), cov).unwrap())
}

proptest! {
    #[test]
    fn retraction_always_yields_spd(m in symmetric_matrix_3()) {
        let out = retract_spd_cholesky(&m, 1e-8).unwrap();
        prop_assert!(Cholesky::new(out).is_some());
    }

    #[test]
    fn retraction_fixes_spd_inputs(m in spd_matrix_3()) {
        let out = retract_spd_cholesky(&m, 1e-8).unwrap();
        prop_assert!((&out - &m).amax() < 1e-12);
    }

    #[test]
    fn kl_is_non_negative(a in gaussian_3(), b in gaussian_3()) {
        let kl = kl_gaussian(&a, &b).unwrap();
        prop_assert!(kl >= 0.0);
        prop_assert!(kl.is_finite());
    }

    #[test]
    fn kl_of_identical_gaussians_is_zero(a in gaussian_3()) {
        let kl = kl_gaussian(&a, &a).unwrap();
        prop_assert!(kl < 1e-8, "KL(a || a) = {kl}");
    }
}
