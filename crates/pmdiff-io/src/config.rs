//! JSON-configurable settings for the `smooth` and `ode` commands.

use pmdiff_core::{DiffusivityParams, FieldRunSpec, Field};
use pmdiff_models::{disk, ramp, step_edge, NoiseKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Synthetic input field used in place of a loaded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    StepEdge,
    Disk,
    Ramp,
}

/// Settings of a field smoothing run.
///
/// Every key is optional in the JSON file; missing keys take the values of
/// [`SmoothConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothConfig {
    pub kappa: f64,
    pub alpha: f64,
    pub dt: f64,
    pub iterations: usize,
    pub rows: usize,
    pub cols: usize,
    pub pattern: Pattern,
    pub noise: Option<NoiseKind>,
    pub seed: u64,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            kappa: 0.1,
            alpha: 0.1,
            dt: 0.3,
            iterations: 10,
            rows: 64,
            cols: 64,
            pattern: Pattern::Disk,
            noise: Some(NoiseKind::Gaussian { sigma: 0.1 }),
            seed: 42,
        }
    }
}

impl SmoothConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn params(&self) -> pmdiff_core::Result<DiffusivityParams> {
        DiffusivityParams::new(self.kappa, self.alpha)
    }

    pub fn run_spec(&self) -> pmdiff_core::Result<FieldRunSpec> {
        FieldRunSpec::new(self.dt, self.iterations)
    }

    /// The noise-free field on a `[0, 1]` intensity scale.
    pub fn clean_field(&self) -> Field {
        let (rows, cols) = (self.rows, self.cols);
        match self.pattern {
            Pattern::StepEdge => step_edge(rows, cols, 0.0, 1.0),
            Pattern::Disk => disk(rows, cols, rows.min(cols) as f64 / 4.0, 1.0, 0.0),
            Pattern::Ramp => ramp(rows, cols, 0.0, 1.0),
        }
    }
}

/// Time window and initial value of a scalar run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OdeConfig {
    pub t0: f64,
    pub t_end: f64,
    pub step: f64,
    pub s0: f64,
}

impl Default for OdeConfig {
    fn default() -> Self {
        Self {
            t0: 0.0,
            t_end: 2.0,
            step: 0.1,
            s0: -1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SmoothConfig =
            serde_json::from_str(r#"{ "kappa": 2.5, "pattern": "step_edge" }"#).unwrap();
        assert_eq!(config.kappa, 2.5);
        assert_eq!(config.pattern, Pattern::StepEdge);
        assert_eq!(config.iterations, 10);
        assert_eq!(config.dt, 0.3);
    }

    #[test]
    fn noise_is_tagged() {
        let config: SmoothConfig = serde_json::from_str(
            r#"{ "noise": { "kind": "salt_and_pepper", "fraction": 0.05 } }"#,
        )
        .unwrap();
        assert_eq!(config.noise, Some(NoiseKind::SaltAndPepper { fraction: 0.05 }));

        let quiet: SmoothConfig = serde_json::from_str(r#"{ "noise": null }"#).unwrap();
        assert!(quiet.noise.is_none());
    }

    #[test]
    fn clean_field_has_configured_shape() {
        let config = SmoothConfig {
            rows: 12,
            cols: 20,
            ..SmoothConfig::default()
        };
        for pattern in [Pattern::StepEdge, Pattern::Disk, Pattern::Ramp] {
            let field = SmoothConfig { pattern, ..config.clone() }.clean_field();
            assert_eq!(field.shape(), (12, 20));
            assert!(field.min() >= 0.0 && field.max() <= 1.0);
        }
    }
}
