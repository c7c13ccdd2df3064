use crate::Time;

/// Right-hand side `f(t, s) = ds/dt` of a scalar ODE.
pub trait ScalarRhs {
    fn rate(&self, t: Time, s: f64) -> f64;
}

impl<F> ScalarRhs for F
where
    F: Fn(Time, f64) -> f64,
{
    fn rate(&self, t: Time, s: f64) -> f64 {
        self(t, s)
    }
}
