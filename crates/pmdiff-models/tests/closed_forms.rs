use approx::assert_relative_eq;
use pmdiff_core::{integrate_scalar, Scheme, TimeGrid};
use pmdiff_models::{ClosedForm, DecayingForcing, ExponentialDecay, LogisticGrowth};

#[test]
fn forcing_scenario_from_minus_one() {
    let problem = DecayingForcing;
    let grid = TimeGrid::span(0.0, 2.0, 0.1).unwrap();
    let exact = problem.exact(0.0, -1.0, 2.0);
    assert_relative_eq!(exact, -(-2.0f64).exp(), max_relative = 1e-15);

    for scheme in Scheme::ALL {
        let trajectory = integrate_scalar(scheme, &problem, &grid, -1.0).unwrap();
        let err = trajectory.error_at_end(|t| problem.exact(0.0, -1.0, t)).unwrap();
        assert!(err < 1e-4, "{}: error {:.3e}", scheme, err);
    }
}

#[test]
fn logistic_growth_is_tracked_by_every_scheme() {
    let problem = LogisticGrowth::new(1.5, 10.0);
    let grid = TimeGrid::span(0.0, 4.0, 0.05).unwrap();

    for scheme in Scheme::ALL {
        let trajectory = integrate_scalar(scheme, &problem, &grid, 0.5).unwrap();
        let max_err = trajectory.max_abs_error(|t| problem.exact(0.0, 0.5, t));
        println!("{:>6}: max error {:.3e}", scheme, max_err);
        assert!(max_err < 1e-3, "{}: max error {:.3e}", scheme, max_err);
    }
}

#[test]
fn decay_closed_form_is_consistent() {
    let problem = ExponentialDecay::new(0.7);
    let s1 = problem.exact(0.0, 2.0, 1.0);
    let s2 = problem.exact(1.0, s1, 3.0);
    assert_relative_eq!(s2, problem.exact(0.0, 2.0, 3.0), max_relative = 1e-14);
    assert_relative_eq!(problem.stiffness(0.5), 0.35, max_relative = 1e-12);
}
