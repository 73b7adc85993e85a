use load_shape_core::{RunTime, ShapeKind, TickResult};
use load_shape_system_cyclic_ramp::{self as cyclic_ramp, CyclicRamp};
use load_shape_system_sinusoidal::{self as sinusoidal, Sinusoidal};
use load_shape_system_spike::{self as spike, Spike};
use load_shape_system_stages::{self as stages, Stages};
use load_shape_system_step::{self as step, Step};

/// Validated configuration for exactly one shape.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeConfig {
    /// Parameters of a cyclic ramp.
    CyclicRamp(cyclic_ramp::Config),
    /// Parameters of a sinusoidal wave.
    Sinusoidal(sinusoidal::Config),
    /// Parameters of a spike.
    Spike(spike::Config),
    /// Parameters of a staged profile.
    Stages(stages::Config),
    /// Parameters of a staircase.
    Step(step::Config),
}

impl ShapeConfig {
    /// Shape these parameters describe.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::CyclicRamp(_) => ShapeKind::CyclicRamp,
            Self::Sinusoidal(_) => ShapeKind::Sinusoidal,
            Self::Spike(_) => ShapeKind::Spike,
            Self::Stages(_) => ShapeKind::Stages,
            Self::Step(_) => ShapeKind::Step,
        }
    }
}

/// The active waveform strategy.
#[derive(Clone, Debug)]
pub enum Waveform {
    /// Triangular ramp with plateaus.
    CyclicRamp(CyclicRamp),
    /// Sinusoidal oscillation.
    Sinusoidal(Sinusoidal),
    /// Baseline with a burst.
    Spike(Spike),
    /// Ordered plateaus.
    Stages(Stages),
    /// Staircase.
    Step(Step),
}

impl Waveform {
    /// Shape implemented by this waveform.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::CyclicRamp(_) => ShapeKind::CyclicRamp,
            Self::Sinusoidal(_) => ShapeKind::Sinusoidal,
            Self::Spike(_) => ShapeKind::Spike,
            Self::Stages(_) => ShapeKind::Stages,
            Self::Step(_) => ShapeKind::Step,
        }
    }

    /// Computes the noise-free target at `run_time`.
    #[must_use]
    pub fn evaluate(&self, run_time: RunTime) -> TickResult {
        match self {
            Self::CyclicRamp(shape) => shape.evaluate(run_time),
            Self::Sinusoidal(shape) => shape.evaluate(run_time),
            Self::Spike(shape) => shape.evaluate(run_time),
            Self::Stages(shape) => shape.evaluate(run_time),
            Self::Step(shape) => shape.evaluate(run_time),
        }
    }
}

impl From<ShapeConfig> for Waveform {
    fn from(config: ShapeConfig) -> Self {
        match config {
            ShapeConfig::CyclicRamp(config) => Self::CyclicRamp(CyclicRamp::new(config)),
            ShapeConfig::Sinusoidal(config) => Self::Sinusoidal(Sinusoidal::new(config)),
            ShapeConfig::Spike(config) => Self::Spike(Spike::new(config)),
            ShapeConfig::Stages(config) => Self::Stages(Stages::new(config)),
            ShapeConfig::Step(config) => Self::Step(Step::new(config)),
        }
    }
}
