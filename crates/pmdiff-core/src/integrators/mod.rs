pub mod adams_bashforth;
pub mod adams_moulton;
pub mod helpers;
pub mod runge_kutta;
pub mod sdirk;

use crate::error::{Error, Result};
use crate::path::{TimeGrid, Trajectory};
use crate::rhs::ScalarRhs;
use crate::solver::NewtonSolver;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use adams_bashforth::AdamsBashforth4;
pub use adams_moulton::AdamsMoulton4;
pub use runge_kutta::RungeKutta4;
pub use sdirk::Sdirk3;

/// The closed set of time-stepping schemes, shared by the scalar and field integrators.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheme {
    Rk4,
    Ab4,
    Abm4,
    Sdirk3,
}

impl Scheme {
    pub const ALL: [Scheme; 4] = [Scheme::Rk4, Scheme::Ab4, Scheme::Abm4, Scheme::Sdirk3];

    pub fn name(self) -> &'static str {
        match self {
            Scheme::Rk4 => "rk4",
            Scheme::Ab4 => "ab4",
            Scheme::Abm4 => "abm4",
            Scheme::Sdirk3 => "sdirk3",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Scheme::Rk4 => "Runge Kutta 4",
            Scheme::Ab4 => "Adams Bashforth",
            Scheme::Abm4 => "Adams Moulton",
            Scheme::Sdirk3 => "Three Stage Diagonally Implicit Runge Kutta",
        }
    }

    /// States, the initial one included, that exist before the scheme's own formula runs.
    pub fn warmup_states(self) -> usize {
        match self {
            Scheme::Rk4 => 1,
            Scheme::Ab4 | Scheme::Abm4 => 4,
            Scheme::Sdirk3 => 3,
        }
    }

    /// Theoretical global order of accuracy.
    pub fn order(self) -> u32 {
        match self {
            Scheme::Sdirk3 => 3,
            _ => 4,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "rk4" | "runge-kutta" => Ok(Scheme::Rk4),
            "ab4" | "adams-bashforth" => Ok(Scheme::Ab4),
            "abm4" | "adams-moulton" | "predictor-corrector" => Ok(Scheme::Abm4),
            "sdirk3" | "dirk3" => Ok(Scheme::Sdirk3),
            _ => Err(Error::InvalidParameter {
                name: "scheme",
                value: f64::NAN,
                reason: "expected one of rk4, ab4, abm4, sdirk3",
            }),
        }
    }
}

/// A one-dimensional ODE time stepper producing the full trajectory.
pub trait ScalarIntegrator {
    fn name(&self) -> &'static str;

    fn warmup_states(&self) -> usize;

    /// Integrates `ds/dt = f(t, s)` over `grid` from `s(grid[0]) = s0`.
    ///
    /// Fails with [`Error::InsufficientHistory`] before taking any step when
    /// the grid is shorter than the warm-up.
    fn integrate(&self, f: &impl ScalarRhs, grid: &TimeGrid, s0: f64) -> Result<Trajectory>;
}

/// Scalar entry point dispatching on [`Scheme`].
pub fn integrate_scalar(
    scheme: Scheme,
    f: &impl ScalarRhs,
    grid: &TimeGrid,
    s0: f64,
) -> Result<Trajectory> {
    log::debug!(
        "integrating scalar ODE with {} over {} points (h = {})",
        scheme,
        grid.len(),
        grid.step()
    );
    match scheme {
        Scheme::Rk4 => RungeKutta4.integrate(f, grid, s0),
        Scheme::Ab4 => AdamsBashforth4.integrate(f, grid, s0),
        Scheme::Abm4 => AdamsMoulton4.integrate(f, grid, s0),
        Scheme::Sdirk3 => Sdirk3::<NewtonSolver>::default().integrate(f, grid, s0),
    }
}
