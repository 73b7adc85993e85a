use load_shape_core::ShapeKind;
use serde::Serialize;
use serde_json::{json, Value};

use crate::keys;

/// Value type accepted by a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Whole number.
    Int,
    /// Decimal number.
    Float,
    /// JSON document.
    Json,
}

/// Schema of one configuration parameter, as shown to configuration editors.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParameterSchema {
    /// Environment variable carrying the parameter.
    pub name: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: ParameterType,
    /// Value used when the variable is absent.
    pub default: Value,
    /// Smallest value an editor should offer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Increment an editor should use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Human readable label.
    pub label: &'static str,
    /// Longer explanation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl ParameterSchema {
    fn int(name: &'static str, default: i64, min: i64, label: &'static str) -> Self {
        Self {
            name,
            kind: ParameterType::Int,
            default: json!(default),
            min: Some(min as f64),
            step: None,
            label,
            description: None,
        }
    }

    fn float(name: &'static str, default: f64, label: &'static str) -> Self {
        Self {
            name,
            kind: ParameterType::Float,
            default: json!(default),
            min: None,
            step: None,
            label,
            description: None,
        }
    }

    fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }
}

/// Catalog entry describing one shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShapeDescriptor {
    /// Selector value choosing this shape.
    pub id: ShapeKind,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Parameters read when the shape is selected.
    pub parameters: Vec<ParameterSchema>,
}

/// Lists every shape with its parameter schema, in catalog order.
#[must_use]
pub fn catalog() -> Vec<ShapeDescriptor> {
    ShapeKind::ALL.into_iter().map(describe).collect()
}

/// Describes a single shape.
#[must_use]
pub fn describe(kind: ShapeKind) -> ShapeDescriptor {
    match kind {
        ShapeKind::CyclicRamp => ShapeDescriptor {
            id: kind,
            name: "Cyclic Ramp (Triangular)",
            description: "Linear ramp up and down between min/max users with configurable plateaus",
            parameters: vec![
                ParameterSchema::int(keys::RAMP_MIN_USERS, 10, 0, "Minimum Users"),
                ParameterSchema::int(keys::RAMP_MAX_USERS, 100, 1, "Maximum Users"),
                ParameterSchema::float(keys::RAMP_SPAWN_RATE, 5.0, "Spawn Rate (users/sec)")
                    .with_min(0.01)
                    .with_step(0.01),
                ParameterSchema::int(keys::RAMP_HOLD_MAX_SEC, 0, 0, "Hold at Max (seconds)"),
                ParameterSchema::int(keys::RAMP_HOLD_MIN_SEC, 0, 0, "Hold at Min (seconds)"),
                ParameterSchema::int(
                    keys::RAMP_DURATION_SEC,
                    0,
                    0,
                    "Total Duration (0=infinite)",
                ),
            ],
        },
        ShapeKind::Stages => ShapeDescriptor {
            id: kind,
            name: "Stages (K6-style)",
            description: "Pre-defined stages with specific user counts, durations, and spawn rates",
            parameters: vec![ParameterSchema {
                name: keys::STAGES_JSON,
                kind: ParameterType::Json,
                default: json!([
                    {"duration": 60, "users": 10, "spawn_rate": 10},
                    {"duration": 120, "users": 50, "spawn_rate": 10},
                    {"duration": 180, "users": 100, "spawn_rate": 10},
                    {"duration": 240, "users": 30, "spawn_rate": 10},
                ]),
                min: None,
                step: None,
                label: "Stages Configuration",
                description: Some("Array of stages: [{duration, users, spawn_rate}, ...]"),
            }],
        },
        ShapeKind::Spike => ShapeDescriptor {
            id: kind,
            name: "Spike Testing",
            description: "Sudden dramatic increase in users, then back to baseline",
            parameters: vec![
                ParameterSchema::int(keys::SPIKE_NORMAL_USERS, 10, 0, "Normal Users (baseline)"),
                ParameterSchema::int(keys::SPIKE_MAX_USERS, 100, 1, "Spike Users (peak)"),
                ParameterSchema::int(keys::SPIKE_START_SEC, 180, 0, "Spike Start (seconds)"),
                ParameterSchema::int(keys::SPIKE_DURATION_SEC, 60, 1, "Spike Duration (seconds)"),
                ParameterSchema::int(
                    keys::SPIKE_TOTAL_DURATION_SEC,
                    600,
                    0,
                    "Total Duration (0=infinite)",
                ),
            ],
        },
        ShapeKind::Sinusoidal => ShapeDescriptor {
            id: kind,
            name: "Sinusoidal Wave",
            description: "Smooth sinusoidal oscillation for realistic traffic variations",
            parameters: vec![
                ParameterSchema::int(keys::SINE_MIN_USERS, 10, 0, "Minimum Users"),
                ParameterSchema::int(keys::SINE_MAX_USERS, 100, 1, "Maximum Users"),
                ParameterSchema::int(keys::SINE_PERIOD_SEC, 300, 1, "Period (seconds)"),
                ParameterSchema::float(keys::SINE_PHASE_OFFSET, 0.0, "Phase Offset (radians)")
                    .with_step(0.1),
                ParameterSchema::int(keys::SINE_DURATION_SEC, 0, 0, "Total Duration (0=infinite)"),
            ],
        },
        ShapeKind::Step => ShapeDescriptor {
            id: kind,
            name: "Step Load",
            description: "Gradual increase in fixed increments at regular intervals",
            parameters: vec![
                ParameterSchema::int(keys::STEP_STARTING_USERS, 10, 0, "Starting Users"),
                ParameterSchema::int(keys::STEP_LOAD_INCREMENT, 10, 1, "User Increment per Step"),
                ParameterSchema::int(keys::STEP_TIME_SEC, 30, 1, "Time Between Steps (seconds)"),
                ParameterSchema::int(keys::STEP_MAX_USERS, 0, 0, "Max Users (0=no limit)"),
                ParameterSchema::float(keys::STEP_SPAWN_RATE, 10.0, "Spawn Rate")
                    .with_min(0.1)
                    .with_step(0.1),
                ParameterSchema::int(
                    keys::STEP_DURATION_SEC,
                    600,
                    0,
                    "Total Duration (0=infinite)",
                ),
            ],
        },
    }
}
