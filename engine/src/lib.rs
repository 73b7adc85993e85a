#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestrator for the load shape engine.
//!
//! A [`ShapeEngine`] owns exactly one [`Waveform`], the noise stage, and an
//! observability sink. The load-driving harness calls [`ShapeEngine::tick`]
//! once per scheduling interval with the elapsed run time and applies the
//! returned target to its virtual-user population until the engine reports
//! [`TickResult::Terminated`]. Engines are never reconfigured: a new run
//! requires a new engine.

use std::time::Duration;

use load_shape_core::{LoadTarget, RunTime, ShapeKind, TickRecord, TickResult, TickSink};
use load_shape_system_noise::{self as noise, NoiseInjector};
use serde::Serialize;
use tracing::{debug, warn};

mod sink;
mod waveform;

pub use sink::TracingSink;
pub use waveform::{ShapeConfig, Waveform};

/// Largest number of points a single [`ShapeEngine::preview`] call returns.
pub const MAX_PREVIEW_POINTS: usize = 100_000;

/// Everything required to build an engine, independent of where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Parameters of the selected shape.
    pub shape: ShapeConfig,
    /// Noise applied to every ideal count.
    pub noise: noise::Config,
}

/// One point of a previewed profile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProfilePoint {
    /// Run time the target was computed for.
    pub run_time: RunTime,
    /// Target handed to the harness.
    pub target: LoadTarget,
}

/// Drives a single waveform through successive ticks.
#[derive(Debug)]
pub struct ShapeEngine<S = TracingSink> {
    waveform: Waveform,
    noise: NoiseInjector,
    sink: S,
    last_run_time: Option<RunTime>,
    terminated: bool,
}

impl<S: TickSink> ShapeEngine<S> {
    /// Assembles an engine from an already constructed waveform and noise stage.
    #[must_use]
    pub fn new(waveform: Waveform, noise: NoiseInjector, sink: S) -> Self {
        Self {
            waveform,
            noise,
            sink,
            last_run_time: None,
            terminated: false,
        }
    }

    /// Builds an engine from validated configuration.
    ///
    /// Noise is seeded from `seed` when provided so the run can be replayed,
    /// and from operating system entropy otherwise.
    #[must_use]
    pub fn from_config(config: EngineConfig, seed: Option<u64>, sink: S) -> Self {
        let noise = match seed {
            Some(seed) => NoiseInjector::seeded(config.noise, seed),
            None => NoiseInjector::from_entropy(config.noise),
        };
        Self::new(Waveform::from(config.shape), noise, sink)
    }

    /// Shape driven by this engine.
    #[must_use]
    pub const fn kind(&self) -> ShapeKind {
        self.waveform.kind()
    }

    /// Waveform driven by this engine.
    #[must_use]
    pub const fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    /// Reports whether a previous tick terminated the run.
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Observability sink receiving tick records.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the engine and returns its sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Computes the noisy target for `run_time`.
    ///
    /// Once a tick has terminated, every later tick terminates as well without
    /// consulting the waveform, drawing noise, or emitting a record.
    pub fn tick(&mut self, run_time: RunTime) -> TickResult {
        if self.terminated {
            return TickResult::Terminated;
        }

        if let Some(last) = self.last_run_time {
            if run_time < last {
                warn!(
                    shape = %self.kind(),
                    previous = last.as_secs(),
                    current = run_time.as_secs(),
                    "run time moved backwards"
                );
            }
        }
        self.last_run_time = Some(run_time);

        let ideal = match self.waveform.evaluate(run_time) {
            TickResult::Active(target) => target,
            TickResult::Terminated => {
                debug!(shape = %self.kind(), run_time = run_time.as_secs(), "load shape finished");
                self.terminated = true;
                return TickResult::Terminated;
            }
        };

        let noisy_users = self.noise.apply(ideal.users());
        self.sink.record(TickRecord {
            shape: self.kind(),
            ideal_users: ideal.users(),
            noisy_users,
            run_time,
        });

        TickResult::Active(ideal.with_users(noisy_users))
    }

    /// Ticks at a fixed `cadence` from the start of the run until the shape
    /// terminates or `horizon` is exceeded, returning every active target.
    ///
    /// A zero cadence evaluates the start of the run only. At most
    /// [`MAX_PREVIEW_POINTS`] points are produced.
    pub fn preview(&mut self, cadence: Duration, horizon: Duration) -> Vec<ProfilePoint> {
        let mut points = Vec::new();
        let step = cadence.as_secs_f64();
        let limit = horizon.as_secs_f64();

        let mut index: u32 = 0;
        loop {
            let secs = step * f64::from(index);
            if secs > limit {
                break;
            }

            let run_time = RunTime::from_secs(secs);
            match self.tick(run_time) {
                TickResult::Active(target) => points.push(ProfilePoint { run_time, target }),
                TickResult::Terminated => break,
            }

            if cadence.is_zero() || points.len() >= MAX_PREVIEW_POINTS {
                break;
            }
            index += 1;
        }

        points
    }
}
