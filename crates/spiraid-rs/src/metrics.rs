use std::sync::{Arc, OnceLock};

use crate::layout::mapping::RaidMode;
use crate::retention::Access;

/// ChannelOp is one finished channel command sequence.
#[derive(Copy, Clone, Debug)]
pub struct ChannelOp {
    pub channel: usize,
    pub op: Access,
    pub bytes: u64,
    pub ticks: u64,
    pub error: bool,
}

/// RaidOp is one finished transaction as seen by the host.
#[derive(Copy, Clone, Debug)]
pub struct RaidOp {
    pub op: Access,
    pub mode: RaidMode,
    pub bytes: u64,
    pub ticks: u64,
    pub error: bool,
    pub integrity_fault: bool,
}

pub trait MetricsSink: Send + Sync + 'static {
    fn record_channel_op(&self, op: ChannelOp);
    fn record_raid_op(&self, op: RaidOp);
}

static METRICS_SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

/// Installs the process-wide sink. Returns false if one is already installed.
pub fn install_metrics_sink(sink: Arc<dyn MetricsSink>) -> bool {
    METRICS_SINK.set(sink).is_ok()
}

pub fn is_enabled() -> bool {
    METRICS_SINK.get().is_some()
}

pub fn record_channel_op(op: ChannelOp) {
    if let Some(sink) = METRICS_SINK.get() {
        sink.record_channel_op(op);
    }
}

pub fn record_raid_op(op: RaidOp) {
    if let Some(sink) = METRICS_SINK.get() {
        sink.record_raid_op(op);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct TestSink {
        channel_ops: Mutex<Vec<ChannelOp>>,
        raid_ops: Mutex<Vec<RaidOp>>,
    }

    impl MetricsSink for TestSink {
        fn record_channel_op(&self, op: ChannelOp) {
            self.channel_ops.lock().unwrap().push(op);
        }

        fn record_raid_op(&self, op: RaidOp) {
            self.raid_ops.lock().unwrap().push(op);
        }
    }

    // Other tests in this binary also record, so look for our own entries only.
    #[test]
    fn metrics_sink_records_ops_when_enabled() {
        let sink = Arc::new(TestSink {
            channel_ops: Mutex::new(Vec::new()),
            raid_ops: Mutex::new(Vec::new()),
        });

        assert!(install_metrics_sink(sink.clone()));
        assert!(is_enabled());

        record_channel_op(ChannelOp {
            channel: 99,
            op: Access::Write,
            bytes: 4,
            ticks: 184,
            error: false,
        });
        record_raid_op(RaidOp {
            op: Access::Read,
            mode: RaidMode::StripeParity,
            bytes: 4,
            ticks: 987_654,
            error: true,
            integrity_fault: false,
        });

        let channel_ops = sink.channel_ops.lock().unwrap();
        let ours = channel_ops.iter().find(|op| op.channel == 99).unwrap();
        assert_eq!(ours.ticks, 184);
        assert!(!ours.error);

        let raid_ops = sink.raid_ops.lock().unwrap();
        let ours = raid_ops.iter().find(|op| op.ticks == 987_654).unwrap();
        assert_eq!(ours.mode, RaidMode::StripeParity);
        assert!(ours.error);
    }
}
