#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Monotonic staircase that adds a fixed increment every interval.

use load_shape_core::{
    clamp_users, ensure_duration, ensure_spawn_rate, ConfigError, LoadTarget, RunTime,
    ShapeKind, TickResult,
};

/// Validated parameters of a step profile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    starting_users: i64,
    step_load_increment: i64,
    step_time_secs: f64,
    max_users: i64,
    spawn_rate: f64,
    duration_secs: f64,
}

impl Config {
    /// Validates step parameters.
    ///
    /// A `max_users` of zero (or less) disables the cap and a `duration_secs`
    /// of zero leaves the profile unbounded.
    pub fn new(
        starting_users: i64,
        step_load_increment: i64,
        step_time_secs: f64,
        max_users: i64,
        spawn_rate: f64,
        duration_secs: f64,
    ) -> Result<Self, ConfigError> {
        if !(step_time_secs.is_finite() && step_time_secs > 0.0) {
            return Err(ConfigError::NonPositiveStepTime(step_time_secs));
        }

        Ok(Self {
            starting_users,
            step_load_increment,
            step_time_secs,
            max_users,
            spawn_rate: ensure_spawn_rate(ShapeKind::Step, spawn_rate)?,
            duration_secs: ensure_duration("duration_sec", duration_secs)?,
        })
    }

    /// Users at step zero.
    #[must_use]
    pub const fn starting_users(&self) -> i64 {
        self.starting_users
    }

    /// Users added per step.
    #[must_use]
    pub const fn step_load_increment(&self) -> i64 {
        self.step_load_increment
    }

    /// Seconds between steps.
    #[must_use]
    pub const fn step_time_secs(&self) -> f64 {
        self.step_time_secs
    }

    /// Cap on the user count, if any.
    #[must_use]
    pub const fn max_users(&self) -> Option<i64> {
        if self.max_users > 0 {
            Some(self.max_users)
        } else {
            None
        }
    }

    /// Spawn rate reported on every active tick.
    #[must_use]
    pub const fn spawn_rate(&self) -> f64 {
        self.spawn_rate
    }

    /// Total run length; zero means unbounded.
    #[must_use]
    pub const fn duration_secs(&self) -> f64 {
        self.duration_secs
    }
}

/// Pure waveform producing the staircase profile.
#[derive(Clone, Debug)]
pub struct Step {
    config: Config,
}

impl Step {
    /// Creates the waveform.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parameters this staircase was built from.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Zero-based index of the step active at `run_time`.
    #[must_use]
    pub fn step_index(&self, run_time: RunTime) -> u64 {
        // saturating float-to-int cast
        (run_time.as_secs() / self.config.step_time_secs).floor() as u64
    }

    /// Computes the ideal target at `run_time`.
    #[must_use]
    pub fn evaluate(&self, run_time: RunTime) -> TickResult {
        let config = &self.config;
        if config.duration_secs > 0.0 && run_time.as_secs() > config.duration_secs {
            return TickResult::Terminated;
        }

        let step = i64::try_from(self.step_index(run_time)).unwrap_or(i64::MAX);
        let mut users = config
            .starting_users
            .saturating_add(step.saturating_mul(config.step_load_increment));
        if let Some(cap) = config.max_users() {
            users = users.min(cap);
        }

        TickResult::Active(LoadTarget::new(clamp_users(users), config.spawn_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use load_shape_core::ConfigError;

    #[test]
    fn rejects_non_positive_step_time() {
        assert_eq!(
            Config::new(10, 10, 0.0, 0, 10.0, 0.0),
            Err(ConfigError::NonPositiveStepTime(0.0))
        );
    }

    #[test]
    fn rejects_non_positive_spawn_rate() {
        assert!(matches!(
            Config::new(10, 10, 30.0, 0, -1.0, 0.0),
            Err(ConfigError::NonPositiveSpawnRate { .. })
        ));
    }

    #[test]
    fn zero_max_users_means_uncapped() {
        let config = Config::new(10, 10, 30.0, 0, 10.0, 0.0).expect("valid config");
        assert_eq!(config.max_users(), None);
    }
}
