use super::stage::{FieldStageSolver, NewtonKrylovStageSolver};
use super::{check_budget, warm_up, FieldIntegrator, FieldRun, FieldRunSpec};
use crate::diffusion::DiffusionRhs;
use crate::error::Result;
use crate::integrators::helpers::{SDIRK3_A, SDIRK3_B};
use crate::integrators::Scheme;
use crate::state::Field;

/// Three-stage SDIRK on the field.
///
/// The stages are lower triangular, so each one is solved on its own as
/// `k_j = L(u + dt·sum_{l<j} a_jl k_l + dt·a_jj k_j)` by the configured
/// [`FieldStageSolver`]. Stage `j` is seeded with the right-hand side of the
/// `(3 - j)`-th most recent accepted field.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldSdirk3<S = NewtonKrylovStageSolver> {
    pub solver: S,
}

impl<S: FieldStageSolver> FieldSdirk3<S> {
    pub fn with_solver(solver: S) -> Self {
        Self { solver }
    }
}

impl<S: FieldStageSolver> FieldIntegrator for FieldSdirk3<S> {
    fn scheme(&self) -> Scheme {
        Scheme::Sdirk3
    }

    fn integrate(
        &self,
        rhs: &DiffusionRhs,
        initial: &Field,
        spec: &FieldRunSpec,
    ) -> Result<FieldRun> {
        let scheme = self.scheme();
        check_budget(scheme, spec)?;
        let dt = spec.dt;
        let mut history = warm_up(rhs, initial, dt, scheme.warmup_states(), spec.iterations + 1)?;
        let mut seeds: Vec<Field> = history.iter().map(|u| rhs.eval(u)).collect();

        for step in scheme.warmup_states() - 1..spec.iterations {
            let next = {
                let u = history.back(0).unwrap_or(initial);
                let mut stages: Vec<Field> = Vec::with_capacity(3);
                for j in 0..3 {
                    let mut base = u.0.clone();
                    for (l, k) in stages.iter().enumerate() {
                        base += &k.0 * (dt * SDIRK3_A[j][l]);
                    }
                    let stage = self
                        .solver
                        .solve_stage(rhs, &Field(base), dt * SDIRK3_A[j][j], &seeds[j])?;
                    stages.push(stage);
                }
                let mut increment = &stages[0].0 * SDIRK3_B[0];
                increment += &stages[1].0 * SDIRK3_B[1];
                increment += &stages[2].0 * SDIRK3_B[2];
                Field(&u.0 + increment * dt)
            };
            if step + 1 < spec.iterations {
                seeds.remove(0);
                seeds.push(rhs.eval(&next));
            }
            history.push(next)?;
        }

        Ok(FieldRun {
            scheme,
            spec: *spec,
            history,
        })
    }
}
