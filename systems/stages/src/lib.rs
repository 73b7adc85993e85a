#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Piecewise profile made of fixed plateaus, K6 style.
//!
//! Stage durations are absolute thresholds measured from the start of the
//! run, not per-stage lengths: the first stage whose `duration` exceeds the
//! current run time is active, and the profile terminates once every threshold
//! has elapsed.

use load_shape_core::{clamp_users, ConfigError, LoadTarget, RunTime, TickResult};
use serde_json::{Map, Value};
use tracing::warn;

/// Stage list used when no configuration is supplied or the supplied one cannot be parsed.
pub const DEFAULT_STAGES_JSON: &str = r#"[{"duration": 60, "users": 10, "spawn_rate": 10}]"#;

/// A single plateau.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    /// Run time, in seconds from the start, until which this stage applies.
    pub duration: f64,
    /// User count held during the stage.
    pub users: u32,
    /// Spawn rate reported during the stage.
    pub spawn_rate: f64,
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            duration: 60.0,
            users: 10,
            spawn_rate: 10.0,
        }
    }
}

/// Ordered stage list.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    stages: Vec<Stage>,
    recovered: bool,
}

impl Config {
    /// Wraps an already validated stage list.
    #[must_use]
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            recovered: false,
        }
    }

    /// Parses a JSON array of `{duration, users, spawn_rate}` objects.
    ///
    /// Text that is not valid JSON at all is replaced by the default single
    /// stage and a warning is logged; deployed configurations rely on this.
    /// Any JSON number is accepted for every field, with `users` truncated
    /// toward zero and clamped at zero. A document that is not an array of
    /// objects, a missing field, or a non-numeric field is rejected.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let document: Value = match serde_json::from_str(json) {
            Ok(document) => document,
            Err(error) => {
                warn!(%error, input = json, "malformed stages JSON, using the default stage");
                return Ok(Self {
                    stages: vec![Stage::default()],
                    recovered: true,
                });
            }
        };

        let Value::Array(entries) = document else {
            return Err(ConfigError::InvalidStages("expected a JSON array of stages".to_owned()));
        };

        let stages = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| parse_stage(index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(stages))
    }

    /// Stages in evaluation order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Reports whether the default stage was substituted for unparsable input.
    #[must_use]
    pub const fn recovered_from_malformed_input(&self) -> bool {
        self.recovered
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(vec![Stage::default()])
    }
}

fn parse_stage(index: usize, entry: &Value) -> Result<Stage, ConfigError> {
    let Value::Object(fields) = entry else {
        return Err(ConfigError::InvalidStages(format!("stage {index} is not an object")));
    };

    let duration = require(fields, index, "duration")?;
    let users = require(fields, index, "users")?;
    let spawn_rate = require(fields, index, "spawn_rate")?;

    Ok(Stage {
        duration: number(duration, index, "duration")?,
        // saturating float to int cast, then clamped into the target domain
        users: clamp_users(number(users, index, "users")?.trunc() as i64),
        spawn_rate: number(spawn_rate, index, "spawn_rate")?,
    })
}

fn require<'a>(
    fields: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a Value, ConfigError> {
    fields
        .get(field)
        .ok_or(ConfigError::MissingStageField { index, field })
}

fn number(value: &Value, index: usize, field: &'static str) -> Result<f64, ConfigError> {
    value.as_f64().ok_or_else(|| {
        ConfigError::InvalidStages(format!("stage {index} field `{field}` must be a number"))
    })
}

/// Pure waveform producing the staged profile.
#[derive(Clone, Debug)]
pub struct Stages {
    config: Config,
}

impl Stages {
    /// Creates the waveform.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Parameters this profile was built from.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the index and definition of the stage active at `run_time`.
    #[must_use]
    pub fn active_stage(&self, run_time: RunTime) -> Option<(usize, &Stage)> {
        let rt = run_time.as_secs();
        self.config
            .stages
            .iter()
            .enumerate()
            .find(|(_, stage)| rt < stage.duration)
    }

    /// Computes the ideal target at `run_time`.
    #[must_use]
    pub fn evaluate(&self, run_time: RunTime) -> TickResult {
        self.active_stage(run_time)
            .map(|(_, stage)| LoadTarget::new(stage.users, stage.spawn_rate))
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Stage, DEFAULT_STAGES_JSON};
    use load_shape_core::ConfigError;

    #[test]
    fn default_json_matches_default_stage() {
        let config = Config::from_json(DEFAULT_STAGES_JSON).expect("default parses");
        assert_eq!(config, Config::default());
        assert!(!config.recovered_from_malformed_input());
    }

    #[test]
    fn syntax_errors_fall_back_to_default_stage() {
        let config = Config::from_json("[{duration: 30").expect("recovers");
        assert_eq!(config.stages(), &[Stage::default()]);
        assert!(config.recovered_from_malformed_input());
    }

    #[test]
    fn missing_fields_are_fatal() {
        let error = Config::from_json(
            r#"[{"duration": 30, "users": 5, "spawn_rate": 1}, {"duration": 60, "spawn_rate": 1}]"#,
        )
        .expect_err("second stage lacks users");
        assert_eq!(
            error,
            ConfigError::MissingStageField {
                index: 1,
                field: "users"
            }
        );
    }

    #[test]
    fn non_array_documents_are_rejected() {
        assert!(matches!(
            Config::from_json(r#"{"duration": 30}"#),
            Err(ConfigError::InvalidStages(_))
        ));
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        assert!(matches!(
            Config::from_json(r#"[{"duration": "long", "users": 5, "spawn_rate": 1}]"#),
            Err(ConfigError::InvalidStages(_))
        ));
        assert!(matches!(
            Config::from_json(r#"[{"duration": 30, "users": "many", "spawn_rate": 1}]"#),
            Err(ConfigError::InvalidStages(_))
        ));
    }

    #[test]
    fn any_json_number_is_accepted_for_users() {
        let config = Config::from_json(
            r#"[{"duration": 10, "users": 10.0, "spawn_rate": 1},
                {"duration": 20, "users": 1e2, "spawn_rate": 1},
                {"duration": 30, "users": 7.9, "spawn_rate": 1},
                {"duration": 40, "users": -5, "spawn_rate": 1}]"#,
        )
        .expect("numeric user counts are trusted");
        let users: Vec<u32> = config.stages().iter().map(|stage| stage.users).collect();
        assert_eq!(users, vec![10, 100, 7, 0]);
    }
}
