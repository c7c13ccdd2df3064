use super::{check_budget, linear_combination, warm_up, FieldIntegrator, FieldRun, FieldRunSpec};
use crate::diffusion::DiffusionRhs;
use crate::error::Result;
use crate::integrators::helpers::{ADAMS_BASHFORTH, ADAMS_DENOMINATOR, ADAMS_MOULTON};
use crate::integrators::Scheme;
use crate::state::Field;
use std::collections::VecDeque;

/// Right-hand sides of the most recent accepted fields, newest first.
///
/// Every accepted field is evaluated exactly once; the window drops the
/// oldest evaluation once it holds four.
struct RateWindow {
    rates: VecDeque<Field>,
}

impl RateWindow {
    fn new(rhs: &DiffusionRhs, fields: &[&Field]) -> Self {
        let mut rates = VecDeque::with_capacity(4);
        for field in fields {
            rates.push_front(rhs.eval(field));
        }
        Self { rates }
    }

    fn push(&mut self, rate: Field) {
        self.rates.push_front(rate);
        self.rates.truncate(4);
    }

    fn newest(&self) -> [&Field; 4] {
        [&self.rates[0], &self.rates[1], &self.rates[2], &self.rates[3]]
    }
}

/// Runs the shared AB4/ABM4 loop; `correct` turns the predictor into the accepted field.
fn run_adams(
    scheme: Scheme,
    rhs: &DiffusionRhs,
    initial: &Field,
    spec: &FieldRunSpec,
    correct: impl Fn(&Field, Field, &RateWindow) -> Result<Field>,
) -> Result<FieldRun> {
    check_budget(scheme, spec)?;
    let scale = spec.dt / ADAMS_DENOMINATOR;
    let mut history = warm_up(rhs, initial, spec.dt, scheme.warmup_states(), spec.iterations + 1)?;

    let warm: Vec<&Field> = history.iter().collect();
    let mut window = RateWindow::new(rhs, &warm);

    for step in scheme.warmup_states() - 1..spec.iterations {
        let next = {
            let u = history.back(0).unwrap_or(initial);
            let predicted = linear_combination(u, scale, &ADAMS_BASHFORTH, window.newest())?;
            correct(u, predicted, &window)?
        };
        if step + 1 < spec.iterations {
            window.push(rhs.eval(&next));
        }
        history.push(next)?;
    }

    Ok(FieldRun {
        scheme,
        spec: *spec,
        history,
    })
}

/// Fourth-order Adams-Bashforth on the field, warmed up with three field-RK4 steps.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldAb4;

impl FieldIntegrator for FieldAb4 {
    fn scheme(&self) -> Scheme {
        Scheme::Ab4
    }

    fn integrate(
        &self,
        rhs: &DiffusionRhs,
        initial: &Field,
        spec: &FieldRunSpec,
    ) -> Result<FieldRun> {
        run_adams(self.scheme(), rhs, initial, spec, |_, predicted, _| Ok(predicted))
    }
}

/// AB4 predictor followed by one Adams-Moulton corrector pass per step.
#[derive(Clone, Copy, Debug, Default)]
pub struct FieldAbm4;

impl FieldIntegrator for FieldAbm4 {
    fn scheme(&self) -> Scheme {
        Scheme::Abm4
    }

    fn integrate(
        &self,
        rhs: &DiffusionRhs,
        initial: &Field,
        spec: &FieldRunSpec,
    ) -> Result<FieldRun> {
        let scale = spec.dt / ADAMS_DENOMINATOR;
        run_adams(self.scheme(), rhs, initial, spec, |u, predicted, window| {
            let predicted_rate = rhs.eval(&predicted);
            let [r0, r1, r2, _] = window.newest();
            linear_combination(u, scale, &ADAMS_MOULTON, [&predicted_rate, r0, r1, r2])
        })
    }
}
