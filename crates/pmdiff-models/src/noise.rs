use pmdiff_core::Field;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseKind {
    /// Additive zero-mean Gaussian noise with standard deviation `sigma`.
    Gaussian { sigma: f64 },
    /// `fraction` of the pixels (drawn with replacement) set to the field's min or max.
    SaltAndPepper { fraction: f64 },
}

/// Seeded noise source, so that a noisy input can be regenerated exactly.
pub struct NoiseGenerator {
    rng: ChaCha20Rng,
}

impl NoiseGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn apply(&mut self, field: &Field, kind: NoiseKind) -> Field {
        match kind {
            NoiseKind::Gaussian { sigma } => self.gaussian(field, sigma),
            NoiseKind::SaltAndPepper { fraction } => self.salt_and_pepper(field, fraction),
        }
    }

    pub fn gaussian(&mut self, field: &Field, sigma: f64) -> Field {
        Field(field.map(|v| {
            let sample: f64 = StandardNormal.sample(&mut self.rng);
            v + sigma * sample
        }))
    }

    pub fn salt_and_pepper(&mut self, field: &Field, fraction: f64) -> Field {
        let mut noisy = field.clone();
        let n = noisy.len();
        if n == 0 {
            return noisy;
        }
        let (low, high) = (field.min(), field.max());
        let hits = (fraction.clamp(0.0, 1.0) * n as f64) as usize;
        for _ in 0..hits {
            let idx = self.rng.gen_range(0..n);
            noisy[idx] = if self.rng.gen_bool(0.5) { low } else { high };
        }
        noisy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::step_edge;

    #[test]
    fn same_seed_same_noise() {
        let clean = step_edge(8, 8, 0.0, 1.0);
        let a = NoiseGenerator::new(9).gaussian(&clean, 0.1);
        let b = NoiseGenerator::new(9).gaussian(&clean, 0.1);
        assert_eq!(a, b);
        assert_ne!(a, clean);
    }

    #[test]
    fn salt_and_pepper_uses_extremes() {
        let clean = step_edge(10, 10, 0.2, 0.8);
        let noisy = NoiseGenerator::new(3).salt_and_pepper(&clean, 0.3);
        assert!(noisy.iter().all(|v| *v == 0.2 || *v == 0.8));
        assert_ne!(noisy, clean);
    }

    #[test]
    fn zero_fraction_is_identity() {
        let clean = step_edge(4, 4, 0.0, 1.0);
        let noisy = NoiseGenerator::new(1).apply(&clean, NoiseKind::SaltAndPepper { fraction: 0.0 });
        assert_eq!(noisy, clean);
    }
}
