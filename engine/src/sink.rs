use load_shape_core::{TickRecord, TickSink};
use tracing::info;

/// Sink that forwards every observation as a structured `tracing` event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TickSink for TracingSink {
    fn record(&mut self, record: TickRecord) {
        info!(
            shape = %record.shape,
            ideal = record.ideal_users,
            noisy = record.noisy_users,
            run_time = record.run_time.as_secs(),
            "load shape tick"
        );
    }
}
