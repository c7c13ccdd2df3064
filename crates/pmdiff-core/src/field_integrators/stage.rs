//! Solvers for one diagonal stage `k = L(base + gamma·k)` of a field SDIRK step.

use crate::diffusion::DiffusionRhs;
use crate::error::{Error, Result};
use crate::solver::SolverConfig;
use crate::state::Field;
use nalgebra::{DMatrix, DVector};

/// Finds the stage slope `k` with `k = rhs(base + gamma·k)`.
///
/// Convergence is measured by the largest pixel-wise residual
/// `|k - rhs(base + gamma·k)|`. Implementations are deterministic and either
/// reach the configured tolerance or fail with [`Error::NonConvergence`].
pub trait FieldStageSolver {
    fn solve_stage(
        &self,
        rhs: &DiffusionRhs,
        base: &Field,
        gamma: f64,
        seed: &Field,
    ) -> Result<Field>;

    fn config(&self) -> SolverConfig;
}

fn stage_state(base: &Field, gamma: f64, k: &Field) -> Field {
    Field(&base.0 + &k.0 * gamma)
}

/// Picard iteration `k <- rhs(base + gamma·k)`.
///
/// Only converges while `gamma` times the Lipschitz constant of the
/// right-hand side stays below one, i.e. for small steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedPointStageSolver {
    pub config: SolverConfig,
}

impl FixedPointStageSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl Default for FixedPointStageSolver {
    fn default() -> Self {
        Self::new(SolverConfig {
            tolerance: 1e-9,
            max_iterations: 200,
        })
    }
}

impl FieldStageSolver for FixedPointStageSolver {
    fn solve_stage(
        &self,
        rhs: &DiffusionRhs,
        base: &Field,
        gamma: f64,
        seed: &Field,
    ) -> Result<Field> {
        let mut k = seed.clone();
        let mut change = f64::INFINITY;
        for iter in 0..self.config.max_iterations {
            let next = rhs.eval(&stage_state(base, gamma, &k));
            change = (&next.0 - &k.0).amax();
            k = next;
            log::trace!("fixed-point stage iter {}: max change = {:.6e}", iter, change);
            if !change.is_finite() {
                break;
            }
            if change <= self.config.tolerance {
                return Ok(k);
            }
        }
        Err(Error::NonConvergence {
            iterations: self.config.max_iterations,
            residual: change,
        })
    }

    fn config(&self) -> SolverConfig {
        self.config
    }
}

/// Jacobian-free Newton-Krylov.
///
/// Each Newton update solves `J δ = -R(k)` for `R(k) = k - rhs(base + gamma·k)`
/// with restarted GMRES, where `J v` is a forward difference of the
/// right-hand side along `v`. Converges at steps well beyond the
/// fixed-point limit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewtonKrylovStageSolver {
    /// Newton iterations and max-abs residual tolerance.
    pub config: SolverConfig,
    /// Krylov basis size before GMRES restarts.
    pub restart: usize,
    pub max_restarts: usize,
    /// GMRES stops once the linear residual drops by this factor.
    pub linear_rtol: f64,
    /// Relative perturbation of the directional derivative.
    pub fd_scale: f64,
}

impl Default for NewtonKrylovStageSolver {
    fn default() -> Self {
        Self {
            config: SolverConfig {
                tolerance: 1e-9,
                max_iterations: 20,
            },
            restart: 30,
            max_restarts: 10,
            linear_rtol: 1e-6,
            fd_scale: f64::EPSILON.sqrt(),
        }
    }
}

impl FieldStageSolver for NewtonKrylovStageSolver {
    fn solve_stage(
        &self,
        rhs: &DiffusionRhs,
        base: &Field,
        gamma: f64,
        seed: &Field,
    ) -> Result<Field> {
        let mut k = seed.clone();
        let mut y = stage_state(base, gamma, &k);
        let mut ly = rhs.eval(&y);
        let mut residual = &k.0 - &ly.0;

        for iter in 0..self.config.max_iterations {
            let norm = residual.amax();
            log::trace!("Newton-Krylov stage iter {}: residual = {:.6e}", iter, norm);
            if !norm.is_finite() {
                return Err(Error::NonConvergence {
                    iterations: iter,
                    residual: norm,
                });
            }
            if norm <= self.config.tolerance {
                return Ok(k);
            }

            let y_norm = y.norm();
            let jacobian_times = |v: &DMatrix<f64>| -> DMatrix<f64> {
                let v_norm = v.norm();
                if v_norm == 0.0 {
                    return v.clone();
                }
                let eps = self.fd_scale * (1.0 + y_norm) / v_norm;
                let shifted = rhs.eval(&Field(&y.0 + v * eps));
                v - (&shifted.0 - &ly.0) * (gamma / eps)
            };
            let target = -&residual;
            let delta = gmres(
                &jacobian_times,
                &target,
                self.restart,
                self.max_restarts,
                self.linear_rtol * residual.norm(),
            );

            k.0 += delta;
            y = stage_state(base, gamma, &k);
            ly = rhs.eval(&y);
            residual = &k.0 - &ly.0;
        }

        let norm = residual.amax();
        if norm <= self.config.tolerance {
            Ok(k)
        } else {
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

/// Restarted GMRES for `apply(x) = b`, matrices treated as flat vectors.
///
/// Stops once the residual 2-norm is at most `tol` or the restarts run out,
/// returning the best iterate either way.
fn gmres(
    apply: &impl Fn(&DMatrix<f64>) -> DMatrix<f64>,
    b: &DMatrix<f64>,
    restart: usize,
    max_restarts: usize,
    tol: f64,
) -> DMatrix<f64> {
    let m = restart.max(1);
    let mut x = DMatrix::zeros(b.nrows(), b.ncols());

    for _ in 0..max_restarts.max(1) {
        let r = b - apply(&x);
        let beta = r.norm();
        if !(beta > tol) {
            break;
        }

        let mut basis: Vec<DMatrix<f64>> = Vec::with_capacity(m + 1);
        basis.push(r / beta);
        let mut h = DMatrix::<f64>::zeros(m + 1, m);
        let mut g = DVector::<f64>::zeros(m + 1);
        g[0] = beta;
        let mut rotations: Vec<(f64, f64)> = Vec::with_capacity(m);
        let mut cols = 0;

        for j in 0..m {
            // Arnoldi with modified Gram-Schmidt
            let mut w = apply(&basis[j]);
            for (i, v) in basis.iter().enumerate() {
                h[(i, j)] = w.dot(v);
                w -= v * h[(i, j)];
            }
            let w_norm = w.norm();
            h[(j + 1, j)] = w_norm;

            for (i, &(c, s)) in rotations.iter().enumerate() {
                let (upper, lower) = (h[(i, j)], h[(i + 1, j)]);
                h[(i, j)] = c * upper + s * lower;
                h[(i + 1, j)] = -s * upper + c * lower;
            }
            let (upper, lower) = (h[(j, j)], h[(j + 1, j)]);
            let d = upper.hypot(lower);
            let (c, s) = if d > 0.0 { (upper / d, lower / d) } else { (1.0, 0.0) };
            rotations.push((c, s));
            h[(j, j)] = d;
            h[(j + 1, j)] = 0.0;
            g[j + 1] = -s * g[j];
            g[j] *= c;
            cols = j + 1;

            if g[j + 1].abs() <= tol || w_norm == 0.0 {
                break;
            }
            basis.push(w / w_norm);
        }

        let mut coeffs = vec![0.0; cols];
        for i in (0..cols).rev() {
            let mut acc = g[i];
            for l in i + 1..cols {
                acc -= h[(i, l)] * coeffs[l];
            }
            coeffs[i] = if h[(i, i)] != 0.0 { acc / h[(i, i)] } else { 0.0 };
        }
        for (v, c) in basis.iter().zip(coeffs.iter()) {
            x += v * *c;
        }
        if g[cols].abs() <= tol {
            break;
        }
    }
    x
}
