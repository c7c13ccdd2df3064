use super::runge_kutta::rk4_step;
use crate::error::{Error, Result};
use crate::path::TimeGrid;
use crate::rhs::ScalarRhs;

/// Adams-Bashforth weights for `f_i, f_{i-1}, f_{i-2}, f_{i-3}`, over [`ADAMS_DENOMINATOR`].
pub const ADAMS_BASHFORTH: [f64; 4] = [55.0, -59.0, 37.0, -9.0];
/// Adams-Moulton weights for `f_{i+1}, f_i, f_{i-1}, f_{i-2}`, over [`ADAMS_DENOMINATOR`].
pub const ADAMS_MOULTON: [f64; 4] = [9.0, 19.0, -5.0, 1.0];
pub const ADAMS_DENOMINATOR: f64 = 24.0;

/// Root of `6x^3 - 18x^2 + 9x - 1` giving the L-stable three-stage SDIRK.
pub const SDIRK3_X: f64 = 0.4358665215;
const X: f64 = SDIRK3_X;
const B1: f64 = -1.5 * X * X + 4.0 * X - 0.25;
const B2: f64 = 1.5 * X * X - 5.0 * X + 1.25;

pub const SDIRK3_C: [f64; 3] = [X, (1.0 + X) / 2.0, 1.0];
pub const SDIRK3_B: [f64; 3] = [B1, B2, X];
pub const SDIRK3_A: [[f64; 3]; 3] = [
    [X, 0.0, 0.0],
    [(1.0 - X) / 2.0, X, 0.0],
    [B1, B2, X],
];

/// `sum_j weights[j] * rates[j]`, newest rate first.
#[inline]
pub fn weighted_sum(weights: &[f64; 4], rates: [f64; 4]) -> f64 {
    weights
        .iter()
        .zip(rates.iter())
        .fold(0.0, |acc, (w, r)| acc + w * r)
}

pub fn require_states(scheme: &'static str, required: usize, available: usize) -> Result<()> {
    if available < required {
        return Err(Error::InsufficientHistory {
            scheme,
            required,
            available,
        });
    }
    Ok(())
}

/// First `n` trajectory values, produced by RK4 over the head of the grid.
pub fn warm_up(f: &impl ScalarRhs, grid: &TimeGrid, s0: f64, n: usize) -> Vec<f64> {
    let h = grid.step();
    let mut s = Vec::with_capacity(grid.len());
    s.push(s0);
    for i in 0..n.min(grid.len()).saturating_sub(1) {
        s.push(rk4_step(f, grid[i], s[i], h));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn adams_weights_are_consistent() {
        assert_eq!(ADAMS_BASHFORTH.iter().sum::<f64>(), ADAMS_DENOMINATOR);
        assert_eq!(ADAMS_MOULTON.iter().sum::<f64>(), ADAMS_DENOMINATOR);
    }

    #[test]
    fn sdirk3_tableau_rows_match_nodes() {
        assert_abs_diff_eq!(SDIRK3_B.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for (row, c) in SDIRK3_A.iter().zip(SDIRK3_C.iter()) {
            assert_abs_diff_eq!(row.iter().sum::<f64>(), *c, epsilon = 1e-9);
        }
    }

    #[test]
    fn sdirk3_x_is_root_of_cubic() {
        let x = SDIRK3_X;
        assert_abs_diff_eq!(6.0 * x.powi(3) - 18.0 * x * x + 9.0 * x - 1.0, 0.0, epsilon = 1e-9);
    }
}
