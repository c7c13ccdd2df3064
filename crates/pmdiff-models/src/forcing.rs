use crate::ClosedForm;
use pmdiff_core::{ScalarRhs, Time};

/// Decaying forcing independent of the state: ds/dt = e^{-t}
///
/// With `s(0) = -1` the solution is `s(t) = -e^{-t}`.
#[derive(Clone, Debug, Default)]
pub struct DecayingForcing;

impl ScalarRhs for DecayingForcing {
    fn rate(&self, t: Time, _s: f64) -> f64 {
        (-t).exp()
    }
}

impl ClosedForm for DecayingForcing {
    fn exact(&self, t0: Time, s0: f64, t: Time) -> f64 {
        s0 + (-t0).exp() - (-t).exp()
    }
}
