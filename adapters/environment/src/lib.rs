#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Environment-variable configuration surface for the load shape engine.
//!
//! The configuration service writes a flat set of string variables and
//! restarts the process; this adapter reads them once at startup, applies the
//! documented defaults, and hands validated records to the engine. Nothing
//! here is consulted after the engine has been built.

use std::{collections::BTreeMap, ffi::OsString, fmt, str::FromStr};

use load_shape_core::{ConfigError, ShapeKind};
use load_shape_engine::{EngineConfig, ShapeConfig};
use load_shape_system_cyclic_ramp as cyclic_ramp;
use load_shape_system_noise as noise;
use load_shape_system_sinusoidal as sinusoidal;
use load_shape_system_spike as spike;
use load_shape_system_stages as stages;
use load_shape_system_step as step;
use serde::Serialize;
use tracing::debug;

mod catalog;

pub use catalog::{catalog, describe, ParameterSchema, ParameterType, ShapeDescriptor};

/// Names of every recognised environment variable.
pub mod keys {
    /// Selects the active shape.
    pub const SHAPE_SELECTOR: &str = "LOAD_SHAPE_TYPE";
    /// Noise level shared by every shape.
    pub const NOISE_PERCENT: &str = "NOISE_PERCENT";
    /// Optional seed making noise reproducible.
    pub const NOISE_SEED: &str = "NOISE_SEED";

    /// Cyclic ramp lower bound.
    pub const RAMP_MIN_USERS: &str = "SHAPE_RAMP_MIN_USERS";
    /// Cyclic ramp upper bound.
    pub const RAMP_MAX_USERS: &str = "SHAPE_RAMP_MAX_USERS";
    /// Cyclic ramp slope.
    pub const RAMP_SPAWN_RATE: &str = "SHAPE_RAMP_SPAWN_RATE";
    /// Cyclic ramp plateau at the maximum.
    pub const RAMP_HOLD_MAX_SEC: &str = "SHAPE_RAMP_HOLD_MAX_SEC";
    /// Cyclic ramp plateau at the minimum.
    pub const RAMP_HOLD_MIN_SEC: &str = "SHAPE_RAMP_HOLD_MIN_SEC";
    /// Cyclic ramp total duration.
    pub const RAMP_DURATION_SEC: &str = "SHAPE_RAMP_DURATION_SEC";

    /// Sinusoidal trough.
    pub const SINE_MIN_USERS: &str = "SINE_MIN_USERS";
    /// Sinusoidal crest.
    pub const SINE_MAX_USERS: &str = "SINE_MAX_USERS";
    /// Sinusoidal period.
    pub const SINE_PERIOD_SEC: &str = "SINE_PERIOD_SEC";
    /// Sinusoidal phase offset in radians.
    pub const SINE_PHASE_OFFSET: &str = "SINE_PHASE_OFFSET";
    /// Sinusoidal total duration.
    pub const SINE_DURATION_SEC: &str = "SINE_DURATION_SEC";

    /// Spike baseline.
    pub const SPIKE_NORMAL_USERS: &str = "SPIKE_NORMAL_USERS";
    /// Spike peak.
    pub const SPIKE_MAX_USERS: &str = "SPIKE_MAX_USERS";
    /// Spike start.
    pub const SPIKE_START_SEC: &str = "SPIKE_START_SEC";
    /// Spike length.
    pub const SPIKE_DURATION_SEC: &str = "SPIKE_DURATION_SEC";
    /// Spike total duration.
    pub const SPIKE_TOTAL_DURATION_SEC: &str = "SPIKE_TOTAL_DURATION_SEC";

    /// JSON stage list.
    pub const STAGES_JSON: &str = "STAGES_JSON";

    /// Staircase starting point.
    pub const STEP_STARTING_USERS: &str = "STEP_STARTING_USERS";
    /// Staircase increment.
    pub const STEP_LOAD_INCREMENT: &str = "STEP_LOAD_INCREMENT";
    /// Staircase interval.
    pub const STEP_TIME_SEC: &str = "STEP_TIME_SEC";
    /// Staircase cap.
    pub const STEP_MAX_USERS: &str = "STEP_MAX_USERS";
    /// Staircase spawn rate.
    pub const STEP_SPAWN_RATE: &str = "STEP_SPAWN_RATE";
    /// Staircase total duration.
    pub const STEP_DURATION_SEC: &str = "STEP_DURATION_SEC";

    /// Variables that apply regardless of the selected shape.
    pub const GLOBAL: [&str; 3] = [SHAPE_SELECTOR, NOISE_PERCENT, NOISE_SEED];
}

/// Snapshot of a string-keyed configuration source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Captures the current process environment, skipping non-UTF-8 entries.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_os_pairs(std::env::vars_os())
    }

    /// Captures an explicit set of variables.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    fn from_os_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_pairs(pairs.into_iter().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    /// Returns a copy of this environment with `overrides` replacing existing values.
    #[must_use]
    pub fn with_overrides<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut vars = self.vars.clone();
        vars.extend(
            overrides
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        Self { vars }
    }

    /// Raw value of `key`; empty values count as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Shape chosen by the selector variable, defaulting to the cyclic ramp.
    pub fn shape_kind(&self) -> Result<ShapeKind, ConfigError> {
        self.get(keys::SHAPE_SELECTOR)
            .map_or(Ok(ShapeKind::CyclicRamp), str::parse)
    }

    /// Noise configuration shared by every shape.
    pub fn noise_config(&self) -> Result<noise::Config, ConfigError> {
        noise::Config::new(self.parse_or(keys::NOISE_PERCENT, 0.0)?)
    }

    /// Seed for the noise generator, if one was configured.
    pub fn noise_seed(&self) -> Result<Option<u64>, ConfigError> {
        self.get(keys::NOISE_SEED)
            .map(|raw| parse_value(keys::NOISE_SEED, raw))
            .transpose()
    }

    /// Validated parameters for `kind`.
    pub fn shape_config(&self, kind: ShapeKind) -> Result<ShapeConfig, ConfigError> {
        let config = match kind {
            ShapeKind::CyclicRamp => ShapeConfig::CyclicRamp(cyclic_ramp::Config::new(
                self.parse_or(keys::RAMP_MIN_USERS, 10)?,
                self.parse_or(keys::RAMP_MAX_USERS, 100)?,
                self.parse_or(keys::RAMP_SPAWN_RATE, 5.0)?,
                self.parse_or(keys::RAMP_HOLD_MAX_SEC, 0.0)?,
                self.parse_or(keys::RAMP_HOLD_MIN_SEC, 0.0)?,
                self.parse_or(keys::RAMP_DURATION_SEC, 0.0)?,
            )?),
            ShapeKind::Sinusoidal => ShapeConfig::Sinusoidal(sinusoidal::Config::new(
                self.parse_or(keys::SINE_MIN_USERS, 10)?,
                self.parse_or(keys::SINE_MAX_USERS, 100)?,
                self.parse_or(keys::SINE_PERIOD_SEC, 300.0)?,
                self.parse_or(keys::SINE_PHASE_OFFSET, 0.0)?,
                self.parse_or(keys::SINE_DURATION_SEC, 0.0)?,
            )?),
            ShapeKind::Spike => ShapeConfig::Spike(spike::Config {
                normal_users: self.parse_or(keys::SPIKE_NORMAL_USERS, 10)?,
                spike_users: self.parse_or(keys::SPIKE_MAX_USERS, 100)?,
                spike_start_secs: self.parse_or(keys::SPIKE_START_SEC, 180.0)?,
                spike_duration_secs: self.parse_or(keys::SPIKE_DURATION_SEC, 60.0)?,
                total_duration_secs: self.parse_or(keys::SPIKE_TOTAL_DURATION_SEC, 600.0)?,
            }),
            ShapeKind::Stages => ShapeConfig::Stages(stages::Config::from_json(
                self.get(keys::STAGES_JSON).unwrap_or(stages::DEFAULT_STAGES_JSON),
            )?),
            ShapeKind::Step => ShapeConfig::Step(step::Config::new(
                self.parse_or(keys::STEP_STARTING_USERS, 10)?,
                self.parse_or(keys::STEP_LOAD_INCREMENT, 10)?,
                self.parse_or(keys::STEP_TIME_SEC, 30.0)?,
                self.parse_or(keys::STEP_MAX_USERS, 0)?,
                self.parse_or(keys::STEP_SPAWN_RATE, 10.0)?,
                self.parse_or(keys::STEP_DURATION_SEC, 600.0)?,
            )?),
        };
        Ok(config)
    }

    /// Resolves the selected shape and the noise stage into an engine configuration.
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let kind = self.shape_kind()?;
        let config = EngineConfig {
            shape: self.shape_config(kind)?,
            noise: self.noise_config()?,
        };
        debug!(
            shape = %kind,
            noise_percent = config.noise.percent(),
            "resolved load shape configuration"
        );
        Ok(config)
    }

    /// Recognised variables currently set, for display by configuration tooling.
    #[must_use]
    pub fn snapshot(&self) -> EnvironmentSnapshot {
        let recognised: Vec<&str> = catalog()
            .iter()
            .flat_map(|shape| shape.parameters.iter().map(|parameter| parameter.name))
            .chain(keys::GLOBAL)
            .collect();

        let config = self
            .vars
            .iter()
            .filter(|(key, _)| recognised.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        EnvironmentSnapshot {
            current_shape: self
                .get(keys::SHAPE_SELECTOR)
                .unwrap_or(ShapeKind::CyclicRamp.selector())
                .to_owned(),
            config,
        }
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.get(key).map_or(Ok(default), |raw| parse_value(key, raw))
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse().map_err(|error: T::Err| ConfigError::InvalidValue {
        key: key.to_owned(),
        value: raw.to_owned(),
        reason: error.to_string(),
    })
}

/// Current parameter set as seen by configuration tooling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnvironmentSnapshot {
    /// Raw selector value, `cyclic` when unset.
    pub current_shape: String,
    /// Recognised variables that are set, keyed by name.
    pub config: BTreeMap<String, String>,
}
