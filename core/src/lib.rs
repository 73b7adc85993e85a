#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the load shape engine.
//!
//! This crate defines the vocabulary that connects the waveform systems, the
//! tick orchestrator, and the configuration adapters. A harness supplies a
//! [`RunTime`] on every scheduling interval, a waveform answers with a
//! [`TickResult`], and the orchestrator reports each decision to a
//! [`TickSink`] as a [`TickRecord`]. Configuration records are validated once
//! and rejected with a [`ConfigError`].

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Elapsed seconds since the load test began.
///
/// The value is always finite and non-negative. Harnesses are expected to
/// supply monotonically non-decreasing values to a given engine instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RunTime(f64);

impl RunTime {
    /// Start of the run.
    pub const ZERO: Self = Self(0.0);

    /// Creates a run time from elapsed seconds.
    ///
    /// Negative and NaN inputs clamp to zero; positive infinity clamps to the
    /// largest finite value.
    #[must_use]
    pub fn from_secs(secs: f64) -> Self {
        if secs.is_nan() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self(secs.min(f64::MAX))
    }

    /// Elapsed seconds represented by this run time.
    #[must_use]
    pub const fn as_secs(self) -> f64 {
        self.0
    }
}

impl From<Duration> for RunTime {
    fn from(elapsed: Duration) -> Self {
        Self::from_secs(elapsed.as_secs_f64())
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

/// Target population the harness should converge towards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoadTarget {
    users: u32,
    spawn_rate: f64,
}

impl LoadTarget {
    /// Creates a new load target.
    #[must_use]
    pub const fn new(users: u32, spawn_rate: f64) -> Self {
        Self { users, spawn_rate }
    }

    /// Number of concurrent virtual users requested.
    #[must_use]
    pub const fn users(&self) -> u32 {
        self.users
    }

    /// Users per second the harness should add or remove to reach the target.
    #[must_use]
    pub const fn spawn_rate(&self) -> f64 {
        self.spawn_rate
    }

    /// Returns a copy of the target with the user count replaced.
    #[must_use]
    pub const fn with_users(self, users: u32) -> Self {
        Self {
            users,
            spawn_rate: self.spawn_rate,
        }
    }
}

/// Outcome of evaluating a load shape at a given run time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TickResult {
    /// Load applies; the harness should steer towards the contained target.
    Active(LoadTarget),
    /// The shape has finished and no further load applies.
    Terminated,
}

impl TickResult {
    /// Returns the active target, or `None` once the shape has terminated.
    #[must_use]
    pub const fn target(self) -> Option<LoadTarget> {
        match self {
            Self::Active(target) => Some(target),
            Self::Terminated => None,
        }
    }

    /// Reports whether the shape has terminated.
    #[must_use]
    pub const fn is_terminated(self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl From<Option<LoadTarget>> for TickResult {
    fn from(target: Option<LoadTarget>) -> Self {
        target.map_or(Self::Terminated, Self::Active)
    }
}

/// Closed set of waveform strategies understood by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Triangular ramp between two bounds with optional plateaus.
    #[serde(rename = "cyclic")]
    CyclicRamp,
    /// Smooth oscillation between two bounds.
    #[serde(rename = "sinusoidal")]
    Sinusoidal,
    /// Baseline load with a single burst.
    #[serde(rename = "spike")]
    Spike,
    /// Ordered list of fixed plateaus.
    #[serde(rename = "stages")]
    Stages,
    /// Monotonic staircase.
    #[serde(rename = "step")]
    Step,
}

impl ShapeKind {
    /// Every shape in catalog order.
    pub const ALL: [Self; 5] = [
        Self::CyclicRamp,
        Self::Stages,
        Self::Spike,
        Self::Sinusoidal,
        Self::Step,
    ];

    /// Selector value used by configuration sources to choose this shape.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::CyclicRamp => "cyclic",
            Self::Sinusoidal => "sinusoidal",
            Self::Spike => "spike",
            Self::Stages => "stages",
            Self::Step => "step",
        }
    }

    /// Name reported in tick records.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CyclicRamp => "CyclicRamp",
            Self::Sinusoidal => "Sinusoidal",
            Self::Spike => "Spike",
            Self::Stages => "Stages",
            Self::Step => "Step",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.selector().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigError::UnknownShape(trimmed.to_owned()))
    }
}

/// Structured observation emitted once per active tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Shape that produced the target.
    pub shape: ShapeKind,
    /// User count computed by the waveform before noise.
    pub ideal_users: u32,
    /// User count handed to the harness after noise.
    pub noisy_users: u32,
    /// Run time the tick was evaluated at.
    pub run_time: RunTime,
}

/// Receiver for per-tick observations.
///
/// Sinks are a side channel; they never influence computed targets.
pub trait TickSink {
    /// Records a single tick observation.
    fn record(&mut self, record: TickRecord);
}

impl TickSink for Vec<TickRecord> {
    fn record(&mut self, record: TickRecord) {
        self.push(record);
    }
}

impl<S: TickSink + ?Sized> TickSink for &mut S {
    fn record(&mut self, record: TickRecord) {
        (**self).record(record);
    }
}

/// Sink that discards every observation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TickSink for NullSink {
    fn record(&mut self, _record: TickRecord) {}
}

/// Fatal configuration problems detected while constructing a shape.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A spawn rate was zero or negative.
    #[error("{shape} spawn rate must be positive, got {value}")]
    NonPositiveSpawnRate {
        /// Shape whose configuration was rejected.
        shape: ShapeKind,
        /// Rejected spawn rate.
        value: f64,
    },
    /// The upper user bound was below the lower bound.
    #[error("max users ({max}) must be >= min users ({min})")]
    MaxBelowMin {
        /// Lower bound after clamping.
        min: i64,
        /// Rejected upper bound.
        max: i64,
    },
    /// A sinusoidal period was zero or negative.
    #[error("period must be positive, got {0}")]
    NonPositivePeriod(f64),
    /// A step interval was zero or negative.
    #[error("step time must be positive, got {0}")]
    NonPositiveStepTime(f64),
    /// A duration-like parameter was negative or not finite.
    #[error("{field} must be a finite, non-negative number of seconds, got {value}")]
    NegativeDuration {
        /// Parameter that was rejected.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A stage definition omitted a required field.
    #[error("stage {index} is missing required field `{field}`")]
    MissingStageField {
        /// Position of the offending stage.
        index: usize,
        /// Name of the absent field.
        field: &'static str,
    },
    /// A stage list was well-formed JSON but not a list of stages.
    #[error("invalid stages: {0}")]
    InvalidStages(String),
    /// A raw configuration value could not be interpreted.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Configuration key that carried the value.
        key: String,
        /// Raw value as supplied.
        value: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// The shape selector named no known shape.
    #[error("unknown load shape {0:?}")]
    UnknownShape(String),
    /// The noise percentage was not finite.
    #[error("noise percent must be finite, got {0}")]
    InvalidNoise(f64),
}

/// Rejects negative or non-finite durations, naming the offending parameter.
pub fn ensure_duration(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NegativeDuration { field, value })
    }
}

/// Rejects spawn rates that are not strictly positive.
pub fn ensure_spawn_rate(shape: ShapeKind, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveSpawnRate { shape, value })
    }
}

/// Saturating conversion of a signed user count into the non-negative target domain.
#[must_use]
pub fn clamp_users(users: i64) -> u32 {
    u32::try_from(users.max(0)).unwrap_or(u32::MAX)
}
