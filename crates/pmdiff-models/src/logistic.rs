use crate::ClosedForm;
use pmdiff_core::{ScalarRhs, Time};

/// Logistic growth: ds/dt = r s (1 - s/K)
#[derive(Clone, Debug)]
pub struct LogisticGrowth {
    pub growth: f64,   // r
    pub capacity: f64, // K
}

impl LogisticGrowth {
    pub fn new(growth: f64, capacity: f64) -> Self {
        assert!(capacity > 0.0, "Carrying capacity must be positive");
        Self { growth, capacity }
    }
}

impl ScalarRhs for LogisticGrowth {
    fn rate(&self, _t: Time, s: f64) -> f64 {
        self.growth * s * (1.0 - s / self.capacity)
    }
}

impl ClosedForm for LogisticGrowth {
    fn exact(&self, t0: Time, s0: f64, t: Time) -> f64 {
        let e = (self.growth * (t - t0)).exp();
        self.capacity * s0 * e / (self.capacity + s0 * (e - 1.0))
    }
}
