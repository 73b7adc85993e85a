#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gaussian noise stage applied to ideal user counts.

use load_shape_core::ConfigError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Noise level shared by every shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    percent: f64,
}

impl Config {
    /// Creates a noise configuration. Zero or negative percentages disable noise.
    pub fn new(percent: f64) -> Result<Self, ConfigError> {
        if !percent.is_finite() {
            return Err(ConfigError::InvalidNoise(percent));
        }
        Ok(Self { percent })
    }

    /// Configuration that leaves every count untouched.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { percent: 0.0 }
    }

    /// Standard deviation of the perturbation, as a percentage of the ideal count.
    #[must_use]
    pub const fn percent(&self) -> f64 {
        self.percent
    }

    /// Reports whether applying this configuration draws from the random source.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.percent > 0.0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Perturbs `ideal` with `Normal(0, ideal * noise_percent / 100)` and rounds the result.
///
/// Consumes one normal sample from `rng` when `noise_percent` is positive and
/// leaves the generator untouched otherwise. The result never drops below zero.
pub fn perturb<R: Rng + ?Sized>(ideal: u32, noise_percent: f64, rng: &mut R) -> u32 {
    if noise_percent.is_nan() || noise_percent <= 0.0 {
        return ideal;
    }

    let mean = f64::from(ideal);
    let deviation = mean * noise_percent / 100.0;
    let Ok(normal) = Normal::new(0.0, deviation) else {
        return ideal;
    };

    let noisy = (mean + normal.sample(rng)).round();
    if noisy <= 0.0 {
        return 0;
    }
    // saturating: values beyond u32::MAX clamp to the maximum
    noisy as u32
}

/// Noise stage owning its random source.
///
/// The generator is injected at construction so runs can be replayed exactly
/// from a seed.
#[derive(Clone, Debug)]
pub struct NoiseInjector {
    config: Config,
    rng: ChaCha8Rng,
}

impl NoiseInjector {
    /// Creates an injector whose random source is derived from `seed`.
    #[must_use]
    pub fn seeded(config: Config, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates an injector seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy(config: Config) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Creates an injector around an already constructed generator.
    #[must_use]
    pub fn with_rng(config: Config, rng: ChaCha8Rng) -> Self {
        Self { config, rng }
    }

    /// Injector that passes every count through unchanged.
    #[must_use]
    pub fn disabled() -> Self {
        Self::seeded(Config::disabled(), 0)
    }

    /// Configuration applied by this injector.
    #[must_use]
    pub const fn config(&self) -> Config {
        self.config
    }

    /// Applies the configured noise to an ideal count.
    pub fn apply(&mut self, ideal: u32) -> u32 {
        perturb(ideal, self.config.percent, &mut self.rng)
    }
}
