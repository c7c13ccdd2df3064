// Allow doc-style comments in proptest blocks once (avoid duplicate attributes)
#![allow(unused_doc_comments)]
use pmdiff_core::{diffusivity_function, Diffusivity, DiffusivityParams, Error};
use proptest::prelude::*;

fn any_diffusivity() -> impl Strategy<Value = Diffusivity> {
    prop::sample::select(Diffusivity::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256, .. ProptestConfig::default()
    })]

    /// g(0, kappa, alpha) == 1 for every family.
    #[test]
    fn unit_weight_at_zero_gradient(
        g in any_diffusivity(),
        kappa in 1e-3f64..100.0,
        alpha in 0.1f64..30.0,
    ) {
        prop_assert_eq!(g.evaluate(0.0, kappa, alpha).unwrap(), 1.0);
    }

    /// g is non-increasing in the gradient magnitude.
    #[test]
    fn non_increasing_in_magnitude(
        g in any_diffusivity(),
        kappa in 1e-2f64..100.0,
        alpha in 0.1f64..30.0,
        mut magnitudes in prop::collection::vec(0.0f64..1e3, 2..32),
    ) {
        let params = DiffusivityParams::new(kappa, alpha).unwrap();
        magnitudes.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let weights: Vec<f64> = magnitudes.iter().map(|s| g.weight(*s, &params)).collect();
        for pair in weights.windows(2) {
            prop_assert!(pair[1] <= pair[0] + 1e-15, "{}: {:?}", g, pair);
        }
    }

    /// Weights stay in [0, 1] and finite.
    #[test]
    fn bounded_weights(
        g in any_diffusivity(),
        s in 0.0f64..1e6,
        kappa in 1e-3f64..100.0,
        alpha in 0.1f64..30.0,
    ) {
        let w = g.evaluate(s, kappa, alpha).unwrap();
        prop_assert!(w.is_finite());
        prop_assert!((0.0..=1.0).contains(&w));
    }

    /// Non-positive kappa never reaches the formula.
    #[test]
    fn non_positive_kappa_is_invalid(
        g in any_diffusivity(),
        s in 0.0f64..10.0,
        kappa in -10.0f64..=0.0,
    ) {
        let is_invalid = matches!(
            g.evaluate(s, kappa, 1.0),
            Err(Error::InvalidParameter { name: "kappa", .. })
        );
        prop_assert!(is_invalid);
    }
}

#[test]
fn perona_malik_scenario() {
    let pm = diffusivity_function("PeronaMalik").unwrap();
    assert_eq!(pm.evaluate(0.0, 0.1, 1.0).unwrap(), 1.0);
    let far = pm.evaluate(1e4, 0.1, 1.0).unwrap();
    assert!(far > 0.0 && far < 1e-9);
}

#[test]
fn every_family_rejects_zero_kappa() {
    for g in Diffusivity::ALL {
        assert!(matches!(
            g.evaluate(1.0, 0.0, 1.0),
            Err(Error::InvalidParameter { name: "kappa", .. })
        ));
    }
}
