use super::helpers::{require_states, warm_up, weighted_sum, ADAMS_BASHFORTH, ADAMS_DENOMINATOR};
use super::ScalarIntegrator;
use crate::error::Result;
use crate::path::{TimeGrid, Trajectory};
use crate::rhs::ScalarRhs;

/// Fourth-order Adams-Bashforth, started from three RK4 steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdamsBashforth4;

impl ScalarIntegrator for AdamsBashforth4 {
    fn name(&self) -> &'static str {
        "ab4"
    }

    fn warmup_states(&self) -> usize {
        4
    }

    fn integrate(&self, f: &impl ScalarRhs, grid: &TimeGrid, s0: f64) -> Result<Trajectory> {
        require_states(self.name(), self.warmup_states(), grid.len())?;
        let h = grid.step();
        let n = grid.len();

        let mut s = warm_up(f, grid, s0, self.warmup_states());
        let mut rates: Vec<f64> = (0..s.len()).map(|j| f.rate(grid[j], s[j])).collect();

        for i in 3..n - 1 {
            let history = [rates[i], rates[i - 1], rates[i - 2], rates[i - 3]];
            let next = s[i] + h / ADAMS_DENOMINATOR * weighted_sum(&ADAMS_BASHFORTH, history);
            s.push(next);
            if i + 2 < n {
                rates.push(f.rate(grid[i + 1], next));
            }
        }

        log::debug!("ab4: {} steps after warm-up", n.saturating_sub(self.warmup_states()));
        Ok(Trajectory::new(grid.points().to_vec(), s))
    }
}
