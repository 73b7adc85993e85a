use load_shape_core::{ConfigError, RunTime, ShapeKind, TickResult};
use load_shape_engine::{ShapeConfig, ShapeEngine};
use load_shape_environment::{catalog, describe, keys, Environment, ParameterType};
use load_shape_system_cyclic_ramp as cyclic_ramp;
use load_shape_system_sinusoidal as sinusoidal;
use load_shape_system_spike as spike;
use load_shape_system_stages as stages;
use load_shape_system_step as step;
use serde_json::Value;

fn empty() -> Environment {
    Environment::from_pairs(Vec::<(String, String)>::new())
}

fn catalog_defaults(kind: ShapeKind) -> Environment {
    Environment::from_pairs(
        describe(kind)
            .parameters
            .into_iter()
            .filter(|parameter| parameter.kind != ParameterType::Json)
            .map(|parameter| (parameter.name, parameter.default.to_string())),
    )
}

fn users_at(engine: &mut ShapeEngine<Vec<load_shape_core::TickRecord>>, secs: f64) -> Option<u32> {
    engine
        .tick(RunTime::from_secs(secs))
        .target()
        .map(|target| target.users())
}

#[test]
fn empty_environment_selects_the_documented_defaults() {
    let env = empty();
    assert_eq!(env.shape_kind(), Ok(ShapeKind::CyclicRamp));

    assert_eq!(
        env.shape_config(ShapeKind::CyclicRamp),
        Ok(ShapeConfig::CyclicRamp(
            cyclic_ramp::Config::new(10, 100, 5.0, 0.0, 0.0, 0.0).expect("valid")
        ))
    );
    assert_eq!(
        env.shape_config(ShapeKind::Sinusoidal),
        Ok(ShapeConfig::Sinusoidal(
            sinusoidal::Config::new(10, 100, 300.0, 0.0, 0.0).expect("valid")
        ))
    );
    assert_eq!(
        env.shape_config(ShapeKind::Spike),
        Ok(ShapeConfig::Spike(spike::Config {
            normal_users: 10,
            spike_users: 100,
            spike_start_secs: 180.0,
            spike_duration_secs: 60.0,
            total_duration_secs: 600.0,
        }))
    );
    assert_eq!(
        env.shape_config(ShapeKind::Stages),
        Ok(ShapeConfig::Stages(stages::Config::default()))
    );
    assert_eq!(
        env.shape_config(ShapeKind::Step),
        Ok(ShapeConfig::Step(
            step::Config::new(10, 10, 30.0, 0, 10.0, 600.0).expect("valid")
        ))
    );

    let noise = env.noise_config().expect("default noise");
    assert!(!noise.is_enabled());
    assert_eq!(env.noise_seed(), Ok(None));
}

#[test]
fn catalog_defaults_agree_with_loader_defaults() {
    for kind in ShapeKind::ALL {
        assert_eq!(
            catalog_defaults(kind).shape_config(kind),
            empty().shape_config(kind),
            "{kind} catalog defaults drifted from the loader"
        );
    }
}

#[test]
fn catalog_lists_every_shape_once() {
    let ids: Vec<ShapeKind> = catalog().iter().map(|shape| shape.id).collect();
    assert_eq!(ids, ShapeKind::ALL.to_vec());

    let document = serde_json::to_value(catalog()).expect("catalog serializes");
    assert_eq!(document[0]["id"], Value::from("cyclic"));
    assert_eq!(document[0]["parameters"][0]["type"], Value::from("int"));
    assert_eq!(document[1]["parameters"][0]["type"], Value::from("json"));
}

#[test]
fn selector_accepts_any_case_and_rejects_unknown_shapes() {
    let env = Environment::from_pairs([(keys::SHAPE_SELECTOR, "Sinusoidal")]);
    assert_eq!(env.shape_kind(), Ok(ShapeKind::Sinusoidal));

    let env = Environment::from_pairs([(keys::SHAPE_SELECTOR, "sawtooth")]);
    assert!(matches!(env.shape_kind(), Err(ConfigError::UnknownShape(_))));
    assert!(env.engine_config().is_err());
}

#[test]
fn invalid_values_are_reported_with_their_key() {
    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "sinusoidal"),
        (keys::SINE_PERIOD_SEC, "soon"),
    ]);
    let error = env.engine_config().expect_err("period is not a number");
    assert!(matches!(
        error,
        ConfigError::InvalidValue { ref key, .. } if key == keys::SINE_PERIOD_SEC
    ));

    let env = Environment::from_pairs([(keys::NOISE_SEED, "-3")]);
    assert!(env.noise_seed().is_err());
}

#[test]
fn validation_errors_propagate_from_the_shapes() {
    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "cyclic"),
        (keys::RAMP_SPAWN_RATE, "0"),
    ]);
    assert!(matches!(
        env.engine_config(),
        Err(ConfigError::NonPositiveSpawnRate { .. })
    ));

    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "step"),
        (keys::STEP_TIME_SEC, "0"),
    ]);
    assert!(matches!(
        env.engine_config(),
        Err(ConfigError::NonPositiveStepTime(_))
    ));

    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "stages"),
        (keys::STAGES_JSON, r#"[{"duration": 60, "users": 10}]"#),
    ]);
    assert_eq!(
        env.engine_config(),
        Err(ConfigError::MissingStageField {
            index: 0,
            field: "spawn_rate"
        })
    );
}

#[test]
fn malformed_stages_json_falls_back_to_the_default_stage() {
    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "stages"),
        (keys::STAGES_JSON, "[{duration: 60"),
    ]);
    let Ok(ShapeConfig::Stages(config)) = env.shape_config(ShapeKind::Stages) else {
        panic!("malformed stages should recover");
    };
    assert!(config.recovered_from_malformed_input());
    assert_eq!(config.stages(), &[stages::Stage::default()]);
}

#[test]
fn step_profile_configured_through_variables() {
    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "step"),
        (keys::STEP_STARTING_USERS, "10"),
        (keys::STEP_LOAD_INCREMENT, "10"),
        (keys::STEP_TIME_SEC, "30"),
        (keys::STEP_DURATION_SEC, "90"),
    ]);
    let config = env.engine_config().expect("valid step config");
    let mut engine = ShapeEngine::from_config(config, Some(7), Vec::new());

    assert_eq!(users_at(&mut engine, 0.0), Some(10));
    assert_eq!(users_at(&mut engine, 30.0), Some(20));
    assert_eq!(users_at(&mut engine, 60.0), Some(30));
    assert_eq!(users_at(&mut engine, 90.0), Some(40));
    assert_eq!(engine.tick(RunTime::from_secs(91.0)), TickResult::Terminated);
}

#[test]
fn staged_profile_configured_through_variables() {
    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "stages"),
        (
            keys::STAGES_JSON,
            r#"[{"duration": 60, "users": 10, "spawn_rate": 10},
                {"duration": 120, "users": 50, "spawn_rate": 5}]"#,
        ),
    ]);
    let config = env.engine_config().expect("valid stages config");
    let mut engine = ShapeEngine::from_config(config, None, Vec::new());

    assert_eq!(users_at(&mut engine, 30.0), Some(10));
    let target = engine
        .tick(RunTime::from_secs(90.0))
        .target()
        .expect("second stage is active");
    assert_eq!(target.users(), 50);
    assert!((target.spawn_rate() - 5.0).abs() < f64::EPSILON);
    assert!(engine.tick(RunTime::from_secs(120.0)).is_terminated());
}

#[test]
fn seeded_noise_replays_identically() {
    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "spike"),
        (keys::NOISE_PERCENT, "20"),
        (keys::NOISE_SEED, "42"),
    ]);
    let seed = env.noise_seed().expect("valid seed");
    assert_eq!(seed, Some(42));

    let run = || {
        let config = env.engine_config().expect("valid spike config");
        let mut engine = ShapeEngine::from_config(config, seed, Vec::new());
        (0..300)
            .map(|secs| users_at(&mut engine, f64::from(secs)))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn snapshot_reports_recognised_variables_only() {
    let env = Environment::from_pairs([
        (keys::SHAPE_SELECTOR, "spike"),
        (keys::SPIKE_MAX_USERS, "250"),
        (keys::NOISE_PERCENT, "5"),
        ("HOME", "/root"),
    ]);
    let snapshot = env.snapshot();
    assert_eq!(snapshot.current_shape, "spike");
    assert_eq!(
        snapshot.config.keys().map(String::as_str).collect::<Vec<_>>(),
        vec![keys::SHAPE_SELECTOR, keys::NOISE_PERCENT, keys::SPIKE_MAX_USERS]
    );

    assert_eq!(empty().snapshot().current_shape, "cyclic");
}
