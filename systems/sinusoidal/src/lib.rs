#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Smooth sinusoidal oscillation between two user bounds.

use std::f64::consts::TAU;

use load_shape_core::{clamp_users, ensure_duration, ConfigError, LoadTarget, RunTime, TickResult};

/// Spawn rate reported on every active tick.
pub const SPAWN_RATE: f64 = 10.0;

/// Validated parameters of a sinusoidal wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    min_users: i64,
    max_users: i64,
    period_secs: f64,
    phase_offset: f64,
    duration_secs: f64,
}

impl Config {
    /// Validates wave parameters. A `duration_secs` of zero leaves the wave unbounded.
    pub fn new(
        min_users: i64,
        max_users: i64,
        period_secs: f64,
        phase_offset: f64,
        duration_secs: f64,
    ) -> Result<Self, ConfigError> {
        if !(period_secs.is_finite() && period_secs > 0.0) {
            return Err(ConfigError::NonPositivePeriod(period_secs));
        }
        if !phase_offset.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "phase_offset".to_owned(),
                value: phase_offset.to_string(),
                reason: "phase offset must be finite".to_owned(),
            });
        }

        Ok(Self {
            min_users,
            max_users,
            period_secs,
            phase_offset,
            duration_secs: ensure_duration("duration_sec", duration_secs)?,
        })
    }

    /// Trough of the wave.
    #[must_use]
    pub const fn min_users(&self) -> i64 {
        self.min_users
    }

    /// Crest of the wave.
    #[must_use]
    pub const fn max_users(&self) -> i64 {
        self.max_users
    }

    /// Seconds per full oscillation.
    #[must_use]
    pub const fn period_secs(&self) -> f64 {
        self.period_secs
    }

    /// Phase shift in radians.
    #[must_use]
    pub const fn phase_offset(&self) -> f64 {
        self.phase_offset
    }

    /// Total run length; zero means unbounded.
    #[must_use]
    pub const fn duration_secs(&self) -> f64 {
        self.duration_secs
    }
}

/// Pure waveform producing the sinusoidal profile.
#[derive(Clone, Debug)]
pub struct Sinusoidal {
    config: Config,
}

impl Sinusoidal {
    /// Creates the waveform.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parameters this wave was built from.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Computes the ideal target at `run_time`.
    #[must_use]
    pub fn evaluate(&self, run_time: RunTime) -> TickResult {
        let rt = run_time.as_secs();
        let config = &self.config;
        if config.duration_secs > 0.0 && rt > config.duration_secs {
            return TickResult::Terminated;
        }

        let min = config.min_users as f64;
        let max = config.max_users as f64;
        let amplitude = (max - min) / 2.0;
        let offset = min + amplitude;
        let angle = TAU * rt / config.period_secs + config.phase_offset;
        let users = (offset + amplitude * angle.sin()) as i64;

        let low = config.min_users.min(config.max_users);
        let high = config.min_users.max(config.max_users);
        let users = clamp_users(users.clamp(low, high));
        TickResult::Active(LoadTarget::new(users, SPAWN_RATE))
    }
}
