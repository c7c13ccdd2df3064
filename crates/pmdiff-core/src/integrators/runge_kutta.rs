use super::helpers::{require_states, warm_up};
use super::ScalarIntegrator;
use crate::error::Result;
use crate::path::{TimeGrid, Trajectory};
use crate::rhs::ScalarRhs;
use crate::Time;

/// One classical fourth-order Runge-Kutta step from `(t, s)`.
#[inline]
pub fn rk4_step(f: &impl ScalarRhs, t: Time, s: f64, h: f64) -> f64 {
    let k1 = f.rate(t, s);
    let k2 = f.rate(t + h / 2.0, s + h * k1 / 2.0);
    let k3 = f.rate(t + h / 2.0, s + h * k2 / 2.0);
    let k4 = f.rate(t + h, s + h * k3);
    s + h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4)
}

/// Explicit four-stage Runge-Kutta. Self-starting.
#[derive(Clone, Copy, Debug, Default)]
pub struct RungeKutta4;

impl ScalarIntegrator for RungeKutta4 {
    fn name(&self) -> &'static str {
        "rk4"
    }

    fn warmup_states(&self) -> usize {
        1
    }

    fn integrate(&self, f: &impl ScalarRhs, grid: &TimeGrid, s0: f64) -> Result<Trajectory> {
        require_states(self.name(), self.warmup_states(), grid.len())?;
        let values = warm_up(f, grid, s0, grid.len());
        Ok(Trajectory::new(grid.points().to_vec(), values))
    }
}
