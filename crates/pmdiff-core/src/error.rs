//! Error taxonomy shared by every integrator and operator in the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The time grid or iteration budget cannot even hold the warm-up states.
    #[error("{scheme} needs at least {required} states, got {available}")]
    InsufficientHistory {
        scheme: &'static str,
        required: usize,
        available: usize,
    },

    #[error("unknown diffusivity function: {0:?}")]
    UnknownDiffusivity(String),

    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("stage solver did not converge after {iterations} iterations (residual norm {residual:.3e})")]
    NonConvergence { iterations: usize, residual: f64 },

    #[error("shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Error::InvalidParameter { name, value, reason }
    }
}
