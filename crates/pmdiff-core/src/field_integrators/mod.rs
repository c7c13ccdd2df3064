//! The four time-stepping schemes applied to `∂u/∂t = div(g(|∇u|) ∇u)`.
//!
//! `iterations` always counts time steps from the initial field. The warm-up
//! states of a scheme are the initial field plus `warmup_states() - 1`
//! field-RK4 steps; every later state comes from the scheme's own formula.
//! Each step writes a fresh field before it is appended to the history, so
//! no stage ever reads a partially updated buffer.

pub mod adams;
pub mod runge_kutta;
pub mod sdirk;
pub mod stage;

use crate::diffusion::DiffusionRhs;
use crate::diffusivity::{diffusivity_function, DiffusivityParams};
use crate::error::{Error, Result};
use crate::integrators::helpers::require_states;
use crate::integrators::Scheme;
use crate::state::{Field, FieldHistory};
use serde::{Deserialize, Serialize};

pub use adams::{FieldAb4, FieldAbm4};
pub use runge_kutta::{rk4_field_step, FieldRk4};
pub use sdirk::FieldSdirk3;
pub use stage::{FieldStageSolver, FixedPointStageSolver, NewtonKrylovStageSolver};

/// Step size and iteration budget of a field run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldRunSpec {
    pub dt: f64,
    pub iterations: usize,
}

impl FieldRunSpec {
    pub fn new(dt: f64, iterations: usize) -> Result<Self> {
        if !(dt > 0.0) || !dt.is_finite() {
            return Err(Error::invalid("dt", dt, "must be finite and positive"));
        }
        Ok(Self { dt, iterations })
    }

    pub fn final_time(&self) -> f64 {
        self.dt * self.iterations as f64
    }
}

/// Every accepted field of a run, initial field first.
#[derive(Clone, Debug)]
pub struct FieldRun {
    pub scheme: Scheme,
    pub spec: FieldRunSpec,
    pub history: FieldHistory,
}

impl FieldRun {
    pub fn final_field(&self) -> &Field {
        // A run always holds at least the initial field.
        &self.history[self.history.len() - 1]
    }

    pub fn into_final_field(self) -> Field {
        let mut fields = self.history.into_fields();
        fields.swap_remove(fields.len() - 1)
    }

    /// Steps taken with the scheme's own formula, warm-up excluded.
    pub fn scheme_steps(&self) -> usize {
        self.history.len() - self.scheme.warmup_states()
    }
}

pub trait FieldIntegrator {
    fn scheme(&self) -> Scheme;

    /// Runs `spec.iterations` steps from `initial`.
    ///
    /// The multistep and implicit schemes fail with
    /// [`Error::InsufficientHistory`] before stepping when the budget does not
    /// cover their warm-up plus one step of their own. RK4 starts from the
    /// initial field alone and accepts any budget, zero included.
    fn integrate(&self, rhs: &DiffusionRhs, initial: &Field, spec: &FieldRunSpec)
        -> Result<FieldRun>;
}

pub(crate) fn check_budget(scheme: Scheme, spec: &FieldRunSpec) -> Result<()> {
    require_states(scheme.name(), scheme.warmup_states(), spec.iterations)
}

/// Initial field followed by `n_states - 1` field-RK4 steps.
pub(crate) fn warm_up(
    rhs: &DiffusionRhs,
    initial: &Field,
    dt: f64,
    n_states: usize,
    capacity: usize,
) -> Result<FieldHistory> {
    let mut history = FieldHistory::with_capacity(initial.clone(), capacity);
    for _ in 1..n_states {
        let next = match history.latest() {
            Some(u) => rk4_field_step(rhs, u, dt),
            None => break,
        };
        history.push(next)?;
    }
    Ok(history)
}

/// `base + scale * sum_j weights[j] * rates[j]`, summed in index order.
pub(crate) fn linear_combination<const N: usize>(
    base: &Field,
    scale: f64,
    weights: &[f64; N],
    rates: [&Field; N],
) -> Result<Field> {
    let shape = base.shape();
    let mut acc = Field::zeros(shape.0, shape.1);
    for (w, r) in weights.iter().zip(rates.iter()) {
        r.ensure_shape(shape)?;
        acc.0 += &r.0 * *w;
    }
    Ok(Field(&base.0 + acc.0 * scale))
}

/// Field entry point: `integrate(scheme, diffusivity, field, dt, iterations, kappa, alpha)`.
pub fn integrate_field(
    scheme: Scheme,
    diffusivity_name: &str,
    field: &Field,
    dt: f64,
    iterations: usize,
    kappa: f64,
    alpha: f64,
) -> Result<FieldRun> {
    let diffusivity = diffusivity_function(diffusivity_name)?;
    let rhs = DiffusionRhs::new(diffusivity, DiffusivityParams::new(kappa, alpha)?)?;
    let spec = FieldRunSpec::new(dt, iterations)?;
    run_scheme(scheme, &rhs, field, &spec)
}

/// Dispatches a prepared run to the integrator for `scheme`.
pub fn run_scheme(
    scheme: Scheme,
    rhs: &DiffusionRhs,
    field: &Field,
    spec: &FieldRunSpec,
) -> Result<FieldRun> {
    log::debug!(
        "field run: {} with {} on {:?}, dt = {}, iterations = {}",
        scheme,
        rhs.diffusivity(),
        field.shape(),
        spec.dt,
        spec.iterations
    );
    let run = match scheme {
        Scheme::Rk4 => FieldRk4.integrate(rhs, field, spec),
        Scheme::Ab4 => FieldAb4.integrate(rhs, field, spec),
        Scheme::Abm4 => FieldAbm4.integrate(rhs, field, spec),
        Scheme::Sdirk3 => {
            FieldSdirk3::<NewtonKrylovStageSolver>::default().integrate(rhs, field, spec)
        }
    }?;
    log::debug!("field run finished with {} stored fields", run.history.len());
    Ok(run)
}
