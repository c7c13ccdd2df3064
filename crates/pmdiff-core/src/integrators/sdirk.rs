use super::helpers::{require_states, warm_up, SDIRK3_A, SDIRK3_B, SDIRK3_C};
use super::ScalarIntegrator;
use crate::error::Result;
use crate::path::{TimeGrid, Trajectory};
use crate::rhs::ScalarRhs;
use crate::solver::{ImplicitStageSolver, NewtonSolver};
use nalgebra::Vector3;

/// Three-stage, third-order, L-stable diagonally implicit Runge-Kutta.
///
/// The stage equations of every step are handed to the configured
/// [`ImplicitStageSolver`], seeded with the last three accepted values.
/// Two RK4 steps provide those values for the first implicit step.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sdirk3<S = NewtonSolver> {
    pub solver: S,
}

impl<S: ImplicitStageSolver> Sdirk3<S> {
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }
}

/// Residual of the three stage equations `k_j - f(t + c_j h, s + h sum_l a_jl k_l)`.
pub fn stage_residual(
    f: &impl ScalarRhs,
    t: f64,
    s: f64,
    h: f64,
    k: &Vector3<f64>,
) -> Vector3<f64> {
    Vector3::from_fn(|j, _| {
        let partial: f64 = (0..=j).map(|l| SDIRK3_A[j][l] * k[l]).sum();
        k[j] - f.rate(t + SDIRK3_C[j] * h, s + h * partial)
    })
}

impl<S: ImplicitStageSolver> ScalarIntegrator for Sdirk3<S> {
    fn name(&self) -> &'static str {
        "sdirk3"
    }

    fn warmup_states(&self) -> usize {
        3
    }

    fn integrate(&self, f: &impl ScalarRhs, grid: &TimeGrid, s0: f64) -> Result<Trajectory> {
        require_states(self.name(), self.warmup_states(), grid.len())?;
        let h = grid.step();
        let weights = Vector3::from(SDIRK3_B);

        let mut s = warm_up(f, grid, s0, self.warmup_states());
        for i in 2..grid.len() - 1 {
            let (t, si) = (grid[i], s[i]);
            let equations = |k: &Vector3<f64>| stage_residual(f, t, si, h, k);
            let guess = Vector3::new(s[i - 2], s[i - 1], s[i]);
            let k = self.solver.solve(&equations, guess)?;
            s.push(si + h * weights.dot(&k));
        }

        Ok(Trajectory::new(grid.points().to_vec(), s))
    }
}
