use super::helpers::{
    require_states, warm_up, weighted_sum, ADAMS_BASHFORTH, ADAMS_DENOMINATOR, ADAMS_MOULTON,
};
use super::ScalarIntegrator;
use crate::error::Result;
use crate::path::{TimeGrid, Trajectory};
use crate::rhs::ScalarRhs;

/// Adams-Bashforth-Moulton predictor-corrector of fourth order.
///
/// The AB4 predictor is only used for the newest right-hand-side evaluation
/// of the Adams-Moulton corrector; all older evaluations use accepted values.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdamsMoulton4;

impl AdamsMoulton4 {
    /// Accepted (corrected) trajectory together with the predictor values.
    ///
    /// The two buffers have the same length; they agree on the warm-up values.
    pub fn predict_correct(
        &self,
        f: &impl ScalarRhs,
        grid: &TimeGrid,
        s0: f64,
    ) -> Result<(Trajectory, Vec<f64>)> {
        require_states(self.name(), self.warmup_states(), grid.len())?;
        let h = grid.step();
        let n = grid.len();

        let mut s = warm_up(f, grid, s0, self.warmup_states());
        let mut predicted = s.clone();
        predicted.reserve(n - s.len());
        let mut rates: Vec<f64> = (0..s.len()).map(|j| f.rate(grid[j], s[j])).collect();

        for i in 3..n - 1 {
            let explicit = [rates[i], rates[i - 1], rates[i - 2], rates[i - 3]];
            let guess = s[i] + h / ADAMS_DENOMINATOR * weighted_sum(&ADAMS_BASHFORTH, explicit);
            predicted.push(guess);

            let implicit = [f.rate(grid[i + 1], guess), rates[i], rates[i - 1], rates[i - 2]];
            let next = s[i] + h / ADAMS_DENOMINATOR * weighted_sum(&ADAMS_MOULTON, implicit);
            s.push(next);
            if i + 2 < n {
                rates.push(f.rate(grid[i + 1], next));
            }
        }

        Ok((Trajectory::new(grid.points().to_vec(), s), predicted))
    }
}

impl ScalarIntegrator for AdamsMoulton4 {
    fn name(&self) -> &'static str {
        "abm4"
    }

    fn warmup_states(&self) -> usize {
        4
    }

    fn integrate(&self, f: &impl ScalarRhs, grid: &TimeGrid, s0: f64) -> Result<Trajectory> {
        self.predict_correct(f, grid, s0).map(|(trajectory, _)| trajectory)
    }
}
