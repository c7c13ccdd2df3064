//! Root finders for the three coupled stage equations of an implicit RK step.

use crate::error::{Error, Result};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Stopping rule shared by every stage solver.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Euclidean norm of the residual at which the iteration stops.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 50,
        }
    }
}

/// Finds `k` with `equations(k) = 0`.
///
/// Implementations are deterministic and either reach the configured
/// tolerance or fail with [`Error::NonConvergence`].
pub trait ImplicitStageSolver {
    fn solve(
        &self,
        equations: &impl Fn(&Vector3<f64>) -> Vector3<f64>,
        initial_guess: Vector3<f64>,
    ) -> Result<Vector3<f64>>;

    fn config(&self) -> SolverConfig;
}

/// Newton's method with a forward-difference Jacobian.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonSolver {
    pub config: SolverConfig,
    /// Relative perturbation used for the Jacobian columns.
    pub fd_scale: f64,
}

impl NewtonSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            fd_scale: f64::EPSILON.sqrt(),
        }
    }

    fn jacobian(
        &self,
        equations: &impl Fn(&Vector3<f64>) -> Vector3<f64>,
        k: &Vector3<f64>,
        residual: &Vector3<f64>,
    ) -> Matrix3<f64> {
        let mut jac = Matrix3::zeros();
        for j in 0..3 {
            let h = self.fd_scale * k[j].abs().max(1.0);
            let mut shifted = *k;
            shifted[j] += h;
            let column = (equations(&shifted) - residual) / h;
            jac.set_column(j, &column);
        }
        jac
    }
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl ImplicitStageSolver for NewtonSolver {
    fn solve(
        &self,
        equations: &impl Fn(&Vector3<f64>) -> Vector3<f64>,
        initial_guess: Vector3<f64>,
    ) -> Result<Vector3<f64>> {
        let mut k = initial_guess;
        let mut residual = equations(&k);

        for iter in 0..self.config.max_iterations {
            let norm = residual.norm();
            log::trace!("Newton iter {}: residual = {:.6e}", iter, norm);
            if !norm.is_finite() {
                return Err(Error::NonConvergence {
                    iterations: iter,
                    residual: norm,
                });
            }
            if norm <= self.config.tolerance {
                return Ok(k);
            }

            let jac = self.jacobian(equations, &k, &residual);
            let delta = jac.lu().solve(&residual).ok_or(Error::NonConvergence {
                iterations: iter + 1,
                residual: norm,
            })?;
            k -= delta;
            residual = equations(&k);
        }

        let norm = residual.norm();
        if norm <= self.config.tolerance {
            Ok(k)
        } else {
            log::debug!(
                "Newton stopped after {} iterations with residual {:.3e}",
                self.config.max_iterations,
                norm
            );
            Err(Error::NonConvergence {
                iterations: self.config.max_iterations,
                residual: norm,
            })
        }
    }

    fn config(&self) -> SolverConfig {
        self.config
    }
}

/// Plain fixed-point iteration `k <- k - equations(k)`.
///
/// Converges when the map `k - equations(k)` is a contraction, i.e. for
/// non-stiff right-hand sides and small steps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FixedPointSolver {
    pub config: SolverConfig,
}

impl FixedPointSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl ImplicitStageSolver for FixedPointSolver {
    fn solve(
        &self,
        equations: &impl Fn(&Vector3<f64>) -> Vector3<f64>,
        initial_guess: Vector3<f64>,
    ) -> Result<Vector3<f64>> {
        let mut k = initial_guess;
        let mut norm = f64::INFINITY;

        for iter in 0..=self.config.max_iterations {
            let residual = equations(&k);
            norm = residual.norm();
            log::trace!("fixed-point iter {}: residual = {:.6e}", iter, norm);
            if !norm.is_finite() {
                break;
            }
            if norm <= self.config.tolerance {
                return Ok(k);
            }
            k -= residual;
        }

        Err(Error::NonConvergence {
            iterations: self.config.max_iterations,
            residual: norm,
        })
    }

    fn config(&self) -> SolverConfig {
        self.config
    }
}
