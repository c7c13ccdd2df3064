use pmdiff_core::{
    integrate_scalar, AdamsMoulton4, Error, FixedPointSolver, NewtonSolver, ScalarIntegrator,
    Scheme, Sdirk3, SolverConfig, TimeGrid,
};
use approx::assert_abs_diff_eq;

fn decay(_t: f64, s: f64) -> f64 {
    -s
}

fn end_error(scheme: Scheme, h: f64) -> f64 {
    let grid = TimeGrid::span(0.0, 2.0, h).unwrap();
    let trajectory = integrate_scalar(scheme, &decay, &grid, 1.0).unwrap();
    trajectory.error_at_end(|t| (-t).exp()).unwrap()
}

#[test]
fn error_shrinks_at_theoretical_order() {
    for scheme in Scheme::ALL {
        let coarse = end_error(scheme, 0.05);
        let fine = end_error(scheme, 0.025);
        let observed = (coarse / fine).log2();

        println!("{:>6}: e(h)={:.3e} e(h/2)={:.3e} order={:.2}", scheme, coarse, fine, observed);
        assert!(
            (observed - scheme.order() as f64).abs() < 0.35,
            "{} observed order {:.2}, expected {}",
            scheme,
            observed,
            scheme.order()
        );
    }
}

#[test]
fn forced_decay_matches_exact_solution() {
    // ds/dt = e^{-t}, s(0) = -1  =>  s(t) = -e^{-t}
    let f = |t: f64, _s: f64| (-t).exp();
    let grid = TimeGrid::span(0.0, 2.0, 0.1).unwrap();
    let h4 = 0.1f64.powi(4);

    for scheme in Scheme::ALL {
        let trajectory = integrate_scalar(scheme, &f, &grid, -1.0).unwrap();
        assert_eq!(trajectory.len(), 21);
        assert_eq!(trajectory.initial_value(), Some(-1.0));
        assert_abs_diff_eq!(trajectory.final_value().unwrap(), -0.1353, epsilon = 1e-4);
        assert!(trajectory.max_abs_error(|t| -(-t).exp()) < h4, "{}", scheme);
    }

    let rk4 = integrate_scalar(Scheme::Rk4, &f, &grid, -1.0).unwrap();
    assert_abs_diff_eq!(rk4.final_value().unwrap(), -(-2.0f64).exp(), epsilon = 1e-7);
}

#[test]
fn short_grids_are_rejected_before_stepping() {
    let calls = std::cell::Cell::new(0usize);
    let counting = |_t: f64, s: f64| {
        calls.set(calls.get() + 1);
        -s
    };

    for scheme in [Scheme::Ab4, Scheme::Abm4, Scheme::Sdirk3] {
        let grid = TimeGrid::uniform(0.0, 0.1, scheme.warmup_states() - 1).unwrap();
        let err = integrate_scalar(scheme, &counting, &grid, 1.0).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientHistory {
                scheme: scheme.name(),
                required: scheme.warmup_states(),
                available: scheme.warmup_states() - 1,
            }
        );
    }
    assert_eq!(calls.get(), 0);

    let empty = TimeGrid::uniform(0.0, 0.1, 0).unwrap();
    assert!(matches!(
        integrate_scalar(Scheme::Rk4, &decay, &empty, 1.0),
        Err(Error::InsufficientHistory { .. })
    ));
}

#[test]
fn warm_up_only_grid_returns_rk4_values() {
    let grid = TimeGrid::uniform(0.0, 0.1, 4).unwrap();
    let rk4 = integrate_scalar(Scheme::Rk4, &decay, &grid, 1.0).unwrap();
    let ab4 = integrate_scalar(Scheme::Ab4, &decay, &grid, 1.0).unwrap();
    assert_eq!(rk4, ab4);
}

#[test]
fn predictor_is_kept_apart_from_accepted_values() {
    let grid = TimeGrid::span(0.0, 1.0, 0.1).unwrap();
    let (corrected, predicted) = AdamsMoulton4.predict_correct(&decay, &grid, 1.0).unwrap();

    assert_eq!(predicted.len(), corrected.len());
    assert_eq!(&predicted[..4], &corrected.values[..4]);
    for i in 4..predicted.len() {
        assert_ne!(predicted[i], corrected.values[i]);
    }
    for (p, c) in predicted.iter().zip(corrected.values.iter()) {
        assert_abs_diff_eq!(*p, *c, epsilon = 1e-5);
    }
}

#[test]
fn sdirk3_solver_is_pluggable() {
    let grid = TimeGrid::span(0.0, 1.0, 0.05).unwrap();
    let config = SolverConfig {
        tolerance: 1e-13,
        max_iterations: 200,
    };
    let newton = Sdirk3::with_solver(NewtonSolver::new(config))
        .integrate(&decay, &grid, 1.0)
        .unwrap();
    let picard = Sdirk3::with_solver(FixedPointSolver::new(config))
        .integrate(&decay, &grid, 1.0)
        .unwrap();

    for (a, b) in newton.values.iter().zip(picard.values.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-11);
    }
}

#[test]
fn sdirk3_surfaces_non_convergence() {
    let grid = TimeGrid::span(0.0, 1.0, 0.1).unwrap();
    let starved = Sdirk3::with_solver(NewtonSolver::new(SolverConfig {
        tolerance: 1e-12,
        max_iterations: 0,
    }));
    match starved.integrate(&decay, &grid, 1.0) {
        Err(Error::NonConvergence { iterations, residual }) => {
            assert_eq!(iterations, 0);
            assert!(residual > 1e-12);
        }
        other => panic!("expected NonConvergence, got {:?}", other),
    }
}

#[test]
fn sdirk3_is_stable_on_stiff_decay() {
    // L-stability: a step far beyond the explicit limit still decays.
    let stiff = |_t: f64, s: f64| -50.0 * s;
    let grid = TimeGrid::span(0.0, 2.0, 0.1).unwrap();
    let trajectory = Sdirk3::<NewtonSolver>::default()
        .integrate(&stiff, &grid, 1.0)
        .unwrap_or_else(|e| panic!("{e}"));
    // The two RK4 warm-up steps blow up; the implicit steps damp them again.
    assert!(trajectory.values[2].abs() > 100.0);
    assert!(trajectory.final_value().unwrap().abs() < 1e-6);
}
