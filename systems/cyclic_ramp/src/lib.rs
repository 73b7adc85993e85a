#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cyclic triangular ramp with optional plateaus at both extremes.
//!
//! One cycle rises from `min_users` to `max_users` at `spawn_rate` users per
//! second, holds at the maximum, falls back at the same rate, and holds at the
//! minimum before repeating:
//!
//! ```text
//!  max ┤    ┌──────┐
//!      │   /        \
//!  min ┼──/          \────┐
//!      └ t_up hold_max t_down hold_min
//! ```

use load_shape_core::{
    clamp_users, ensure_duration, ensure_spawn_rate, ConfigError, LoadTarget, RunTime,
    ShapeKind, TickResult,
};

/// Validated parameters of a cyclic ramp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    min_users: i64,
    max_users: i64,
    spawn_rate: f64,
    hold_max_secs: f64,
    hold_min_secs: f64,
    duration_secs: f64,
}

impl Config {
    /// Validates ramp parameters.
    ///
    /// Negative `min_users` are raised to zero before `max_users` is compared
    /// against them. A `duration_secs` of zero leaves the ramp unbounded.
    pub fn new(
        min_users: i64,
        max_users: i64,
        spawn_rate: f64,
        hold_max_secs: f64,
        hold_min_secs: f64,
        duration_secs: f64,
    ) -> Result<Self, ConfigError> {
        let spawn_rate = ensure_spawn_rate(ShapeKind::CyclicRamp, spawn_rate)?;
        let min_users = min_users.max(0);
        if max_users < min_users {
            return Err(ConfigError::MaxBelowMin {
                min: min_users,
                max: max_users,
            });
        }

        Ok(Self {
            min_users,
            max_users,
            spawn_rate,
            hold_max_secs: ensure_duration("hold_max_sec", hold_max_secs)?,
            hold_min_secs: ensure_duration("hold_min_sec", hold_min_secs)?,
            duration_secs: ensure_duration("duration_sec", duration_secs)?,
        })
    }

    /// Lower user bound.
    #[must_use]
    pub const fn min_users(&self) -> i64 {
        self.min_users
    }

    /// Upper user bound.
    #[must_use]
    pub const fn max_users(&self) -> i64 {
        self.max_users
    }

    /// Ramp slope in users per second, also reported as the spawn rate.
    #[must_use]
    pub const fn spawn_rate(&self) -> f64 {
        self.spawn_rate
    }

    /// Plateau length at the maximum.
    #[must_use]
    pub const fn hold_max_secs(&self) -> f64 {
        self.hold_max_secs
    }

    /// Plateau length at the minimum.
    #[must_use]
    pub const fn hold_min_secs(&self) -> f64 {
        self.hold_min_secs
    }

    /// Total run length; zero means unbounded.
    #[must_use]
    pub const fn duration_secs(&self) -> f64 {
        self.duration_secs
    }
}

/// Pure waveform producing the cyclic ramp profile.
#[derive(Clone, Debug)]
pub struct CyclicRamp {
    config: Config,
    ramp_secs: f64,
    cycle_secs: f64,
}

impl CyclicRamp {
    /// Derives ramp and cycle lengths from the configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let delta = config.max_users - config.min_users;
        let ramp_secs = if delta > 0 {
            delta as f64 / config.spawn_rate
        } else {
            0.0
        };
        let cycle_secs = ramp_secs + config.hold_max_secs + ramp_secs + config.hold_min_secs;

        Self {
            config,
            ramp_secs,
            cycle_secs,
        }
    }

    /// Parameters this ramp was built from.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Seconds spent on each of the rising and falling edges.
    #[must_use]
    pub const fn ramp_secs(&self) -> f64 {
        self.ramp_secs
    }

    /// Length of one full cycle including both plateaus.
    #[must_use]
    pub const fn cycle_secs(&self) -> f64 {
        self.cycle_secs
    }

    /// Computes the ideal target at `run_time`.
    #[must_use]
    pub fn evaluate(&self, run_time: RunTime) -> TickResult {
        let rt = run_time.as_secs();
        let config = &self.config;
        if config.duration_secs > 0.0 && rt > config.duration_secs {
            return TickResult::Terminated;
        }

        if self.cycle_secs == 0.0 {
            return TickResult::Active(LoadTarget::new(
                clamp_users(config.min_users),
                config.spawn_rate,
            ));
        }

        let min = config.min_users as f64;
        let max = config.max_users as f64;
        let rise_end = self.ramp_secs;
        let hold_end = rise_end + config.hold_max_secs;
        let fall_end = hold_end + self.ramp_secs;

        let t = rt % self.cycle_secs;
        let users = if t < rise_end {
            min + config.spawn_rate * t
        } else if t < hold_end {
            max
        } else if t < fall_end {
            max - config.spawn_rate * (t - hold_end)
        } else {
            min
        };

        let users = users.clamp(min, max) as i64;
        TickResult::Active(LoadTarget::new(clamp_users(users), config.spawn_rate))
    }
}
