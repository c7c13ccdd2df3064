use crate::ClosedForm;
use pmdiff_core::{ScalarRhs, Time};

/// Exponential decay: ds/dt = -λ s
#[derive(Clone, Debug)]
pub struct ExponentialDecay {
    pub lambda: f64,
}

impl ExponentialDecay {
    pub fn new(rate: f64) -> Self {
        Self { lambda: rate }
    }

    /// ds/dt = -s
    pub fn unit() -> Self {
        Self::new(1.0)
    }

    /// |λ h|, the quantity that decides explicit stability
    pub fn stiffness(&self, h: f64) -> f64 {
        (self.lambda * h).abs()
    }
}

impl ScalarRhs for ExponentialDecay {
    fn rate(&self, _t: Time, s: f64) -> f64 {
        -self.lambda * s
    }
}

impl ClosedForm for ExponentialDecay {
    fn exact(&self, t0: Time, s0: f64, t: Time) -> f64 {
        s0 * (-self.lambda * (t - t0)).exp()
    }
}
