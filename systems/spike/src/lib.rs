#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Baseline load interrupted by a single burst.

use load_shape_core::{clamp_users, LoadTarget, RunTime, TickResult};

/// Spawn rate used while the spike is in progress.
pub const SPIKE_SPAWN_RATE: f64 = 50.0;
/// Spawn rate used at the baseline.
pub const NORMAL_SPAWN_RATE: f64 = 10.0;

/// Parameters of a spike profile.
///
/// No validation is performed: an empty or negative window simply never
/// spikes, and a zero `total_duration_secs` leaves the profile unbounded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Baseline user count.
    pub normal_users: i64,
    /// User count at the peak.
    pub spike_users: i64,
    /// Run time at which the spike begins.
    pub spike_start_secs: f64,
    /// Length of the spike window.
    pub spike_duration_secs: f64,
    /// Total run length; zero means unbounded.
    pub total_duration_secs: f64,
}

/// Pure waveform producing the spike profile.
#[derive(Clone, Debug)]
pub struct Spike {
    config: Config,
}

impl Spike {
    /// Creates the waveform.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parameters this spike was built from.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Reports whether `run_time` falls inside the half-open spike window.
    #[must_use]
    pub fn is_spiking(&self, run_time: RunTime) -> bool {
        let rt = run_time.as_secs();
        let start = self.config.spike_start_secs;
        start <= rt && rt < start + self.config.spike_duration_secs
    }

    /// Computes the ideal target at `run_time`.
    #[must_use]
    pub fn evaluate(&self, run_time: RunTime) -> TickResult {
        let config = &self.config;
        if config.total_duration_secs > 0.0 && run_time.as_secs() > config.total_duration_secs {
            return TickResult::Terminated;
        }

        let target = if self.is_spiking(run_time) {
            LoadTarget::new(clamp_users(config.spike_users), SPIKE_SPAWN_RATE)
        } else {
            LoadTarget::new(clamp_users(config.normal_users), NORMAL_SPAWN_RATE)
        };
        TickResult::Active(target)
    }
}
