use load_shape_core::{LoadTarget, RunTime, TickResult};
use load_shape_system_spike::{Config, Spike, NORMAL_SPAWN_RATE, SPIKE_SPAWN_RATE};
use proptest::prelude::*;

fn spike(total_duration_secs: f64) -> Spike {
    Spike::new(Config {
        normal_users: 10,
        spike_users: 100,
        spike_start_secs: 10.0,
        spike_duration_secs: 5.0,
        total_duration_secs,
    })
}

#[test]
fn baseline_spike_baseline_then_terminate() {
    let shape = spike(20.0);

    assert_eq!(
        shape.evaluate(RunTime::from_secs(5.0)),
        TickResult::Active(LoadTarget::new(10, NORMAL_SPAWN_RATE))
    );
    assert_eq!(
        shape.evaluate(RunTime::from_secs(12.0)),
        TickResult::Active(LoadTarget::new(100, SPIKE_SPAWN_RATE))
    );
    assert_eq!(
        shape.evaluate(RunTime::from_secs(17.0)),
        TickResult::Active(LoadTarget::new(10, NORMAL_SPAWN_RATE))
    );
    assert_eq!(shape.evaluate(RunTime::from_secs(21.0)), TickResult::Terminated);
}

#[test]
fn spike_window_is_half_open() {
    let shape = spike(0.0);
    assert!(!shape.is_spiking(RunTime::from_secs(9.999)));
    assert!(shape.is_spiking(RunTime::from_secs(10.0)));
    assert!(shape.is_spiking(RunTime::from_secs(14.999)));
    assert!(!shape.is_spiking(RunTime::from_secs(15.0)));
}

#[test]
fn zero_total_duration_never_terminates() {
    let shape = spike(0.0);
    assert!(!shape.evaluate(RunTime::from_secs(1.0e9)).is_terminated());
}

#[test]
fn empty_window_never_spikes() {
    let shape = Spike::new(Config {
        normal_users: 10,
        spike_users: 100,
        spike_start_secs: 10.0,
        spike_duration_secs: 0.0,
        total_duration_secs: 0.0,
    });
    assert!(!shape.is_spiking(RunTime::from_secs(10.0)));
}

proptest! {
    #[test]
    fn users_are_never_negative(
        normal in -1_000_i64..1_000,
        peak in -1_000_i64..1_000,
        secs in 0.0_f64..1_000.0,
    ) {
        let shape = Spike::new(Config {
            normal_users: normal,
            spike_users: peak,
            spike_start_secs: 100.0,
            spike_duration_secs: 50.0,
            total_duration_secs: 0.0,
        });
        let target = shape
            .evaluate(RunTime::from_secs(secs))
            .target()
            .expect("unbounded spike stays active");
        let expected = if (100.0..150.0).contains(&secs) { peak } else { normal };
        prop_assert_eq!(i64::from(target.users()), expected.max(0));
    }
}
