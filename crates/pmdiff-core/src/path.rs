use crate::error::{Error, Result};
use crate::Time;
use serde::{Deserialize, Serialize};

/// Relative tolerance used when checking that explicit points are evenly spaced.
const SPACING_RTOL: f64 = 1e-9;

/// Uniformly spaced, strictly increasing time points `t[0..n]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    points: Vec<Time>,
    step: f64,
}

impl TimeGrid {
    /// `n_points` points starting at `t0` spaced by `step`.
    pub fn uniform(t0: Time, step: f64, n_points: usize) -> Result<Self> {
        if !t0.is_finite() {
            return Err(Error::invalid("t0", t0, "must be finite"));
        }
        if !(step > 0.0) || !step.is_finite() {
            return Err(Error::invalid("step", step, "must be finite and positive"));
        }
        let points = (0..n_points).map(|i| t0 + i as f64 * step).collect();
        Ok(Self { points, step })
    }

    /// Points `t0, t0 + step, ...` up to the first one at or past `t_end`.
    ///
    /// The grid always covers `[t0, t_end]`: when `step` does not divide the
    /// window the last point overshoots `t_end` by less than one step. A
    /// window that is a whole number of steps up to a relative `1e-9` ends
    /// exactly there.
    pub fn span(t0: Time, t_end: Time, step: f64) -> Result<Self> {
        if !t0.is_finite() {
            return Err(Error::invalid("t0", t0, "must be finite"));
        }
        if !t_end.is_finite() {
            return Err(Error::invalid("t_end", t_end, "must be finite"));
        }
        if !(t_end >= t0) {
            return Err(Error::invalid("t_end", t_end, "must not precede t0"));
        }
        if !(step > 0.0) || !step.is_finite() {
            return Err(Error::invalid("step", step, "must be finite and positive"));
        }
        let ratio = (t_end - t0) / step;
        let n_steps = (ratio - SPACING_RTOL * ratio.max(1.0)).ceil().max(0.0);
        if !(n_steps < usize::MAX as f64) {
            return Err(Error::invalid("step", step, "too small for the time window"));
        }
        let n_points = (n_steps as usize)
            .checked_add(1)
            .ok_or(Error::invalid("step", step, "too small for the time window"))?;
        Self::uniform(t0, step, n_points)
    }

    pub fn from_points(points: Vec<Time>) -> Result<Self> {
        if points.len() < 2 {
            return Err(Error::invalid(
                "points",
                points.len() as f64,
                "need at least two points to infer the step",
            ));
        }
        let step = points[1] - points[0];
        if !(step > 0.0) {
            return Err(Error::invalid("step", step, "points must be strictly increasing"));
        }
        for pair in points.windows(2) {
            let h = pair[1] - pair[0];
            if (h - step).abs() > SPACING_RTOL * step.abs().max(1.0) {
                return Err(Error::invalid("step", h, "points must be uniformly spaced"));
            }
        }
        Ok(Self { points, step })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Time] {
        &self.points
    }

    pub fn start(&self) -> Option<Time> {
        self.points.first().copied()
    }

    pub fn final_time(&self) -> Option<Time> {
        self.points.last().copied()
    }

    /// Leading `n` points of the grid, used to generate warm-up values.
    pub fn head(&self, n: usize) -> Self {
        Self {
            points: self.points[..n.min(self.points.len())].to_vec(),
            step: self.step,
        }
    }
}

impl std::ops::Index<usize> for TimeGrid {
    type Output = Time;

    fn index(&self, i: usize) -> &Time {
        &self.points[i]
    }
}

/// Scalar solution values paired with the time points they belong to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub times: Vec<Time>,
    pub values: Vec<f64>,
}

impl Trajectory {
    pub fn new(times: Vec<Time>, values: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self { times, values }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn initial_value(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn final_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn final_time(&self) -> Option<Time> {
        self.times.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Time, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }

    /// Absolute error against a closed-form solution at the last time point.
    pub fn error_at_end(&self, exact: impl Fn(Time) -> f64) -> Option<f64> {
        let (t, s) = (self.final_time()?, self.final_value()?);
        Some((s - exact(t)).abs())
    }

    /// Largest absolute deviation from a closed-form solution over the whole run.
    pub fn max_abs_error(&self, exact: impl Fn(Time) -> f64) -> f64 {
        self.iter()
            .map(|(t, s)| (s - exact(t)).abs())
            .fold(0.0, f64::max)
    }
}
