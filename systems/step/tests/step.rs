use load_shape_core::{LoadTarget, RunTime, TickResult};
use load_shape_system_step::{Config, Step};
use proptest::prelude::*;

fn ideal_users(shape: &Step, secs: f64) -> u32 {
    match shape.evaluate(RunTime::from_secs(secs)) {
        TickResult::Active(target) => target.users(),
        TickResult::Terminated => panic!("staircase terminated at {secs}s"),
    }
}

#[test]
fn climbs_one_increment_per_interval() {
    let shape = Step::new(Config::new(10, 10, 30.0, 0, 10.0, 90.0).expect("valid config"));

    assert_eq!(ideal_users(&shape, 0.0), 10);
    assert_eq!(ideal_users(&shape, 29.9), 10);
    assert_eq!(ideal_users(&shape, 31.0), 20);
    assert_eq!(ideal_users(&shape, 61.0), 30);
    assert_eq!(ideal_users(&shape, 90.0), 40);
    assert_eq!(shape.evaluate(RunTime::from_secs(91.0)), TickResult::Terminated);
}

#[test]
fn cap_limits_the_staircase() {
    let shape = Step::new(Config::new(10, 25, 10.0, 50, 4.0, 0.0).expect("valid config"));

    assert_eq!(ideal_users(&shape, 15.0), 35);
    assert_eq!(
        shape.evaluate(RunTime::from_secs(25.0)),
        TickResult::Active(LoadTarget::new(50, 4.0))
    );
    assert_eq!(ideal_users(&shape, 10_000.0), 50);
}

#[test]
fn negative_increments_bottom_out_at_zero() {
    let shape = Step::new(Config::new(30, -10, 10.0, 0, 1.0, 0.0).expect("valid config"));
    assert_eq!(ideal_users(&shape, 15.0), 20);
    assert_eq!(ideal_users(&shape, 45.0), 0);
}

proptest! {
    #[test]
    fn staircase_is_monotonic_for_positive_increments(
        start in 0_i64..1_000,
        increment in 0_i64..100,
        step_time in 0.5_f64..600.0,
        earlier in 0.0_f64..50_000.0,
        delta in 0.0_f64..50_000.0,
    ) {
        let config = Config::new(start, increment, step_time, 0, 10.0, 0.0)
            .expect("generated config is valid");
        let shape = Step::new(config);
        prop_assert!(ideal_users(&shape, earlier) <= ideal_users(&shape, earlier + delta));
    }
}
