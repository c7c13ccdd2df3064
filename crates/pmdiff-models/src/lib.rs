pub mod decay;
pub mod fields;
pub mod forcing;
pub mod logistic;
pub mod noise;

pub use decay::ExponentialDecay;
pub use fields::{disk, ramp, step_edge};
pub use forcing::DecayingForcing;
pub use logistic::LogisticGrowth;
pub use noise::{NoiseGenerator, NoiseKind};

use pmdiff_core::Time;

/// A scalar test problem with a known solution.
pub trait ClosedForm {
    /// Value at `t` of the solution through `(t0, s0)`.
    fn exact(&self, t0: Time, s0: f64, t: Time) -> f64;
}
