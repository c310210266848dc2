use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use spiraid_rs::layout::mapping::RaidMode;
use spiraid_rs::metrics::{ChannelOp, MetricsSink, RaidOp};
use spiraid_rs::retention::Access;

#[derive(Clone, Debug)]
pub enum MetricsEvent {
    ChannelOp(ChannelOp),
    RaidOp(RaidOp),
}

/// MetricsEmitter forwards library metrics to the summary task without blocking.
pub struct MetricsEmitter {
    tx: mpsc::Sender<MetricsEvent>,
}

impl MetricsEmitter {
    pub fn new(tx: mpsc::Sender<MetricsEvent>) -> Arc<Self> {
        Arc::new(Self { tx })
    }
}

impl MetricsSink for MetricsEmitter {
    fn record_channel_op(&self, op: ChannelOp) {
        let _ = self.tx.try_send(MetricsEvent::ChannelOp(op));
    }

    fn record_raid_op(&self, op: RaidOp) {
        let _ = self.tx.try_send(MetricsEvent::RaidOp(op));
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeStats {
    pub reads: u64,
    pub writes: u64,
    pub errors: u64,
    pub integrity_faults: u64,
    pub ticks: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub per_mode: HashMap<RaidMode, ModeStats>,
    pub channel_ops: [u64; 4],
    pub channel_errors: [u64; 4],
    pub channel_ticks: [u64; 4],
}

impl Summary {
    pub fn record(&mut self, event: &MetricsEvent) {
        match event {
            MetricsEvent::ChannelOp(op) => {
                if let Some(slot) = self.channel_ops.get_mut(op.channel) {
                    *slot += 1;
                    self.channel_ticks[op.channel] += op.ticks;
                    if op.error {
                        self.channel_errors[op.channel] += 1;
                    }
                }
            }
            MetricsEvent::RaidOp(op) => {
                let stats = self.per_mode.entry(op.mode).or_default();
                match op.op {
                    Access::Read => stats.reads += 1,
                    Access::Write => stats.writes += 1,
                }
                stats.errors += u64::from(op.error);
                stats.integrity_faults += u64::from(op.integrity_fault);
                stats.ticks += op.ticks;
            }
        }
    }

    pub fn transactions(&self) -> u64 {
        self.per_mode.values().map(|s| s.reads + s.writes).sum()
    }

    pub fn log(&self) {
        for mode in RaidMode::ALL {
            if let Some(s) = self.per_mode.get(&mode) {
                let ops = s.reads + s.writes;
                let avg = if ops == 0 { 0 } else { s.ticks / ops };
                info!(
                    "{mode}: reads={}, writes={}, errors={}, integrity_faults={}, avg_ticks={avg}",
                    s.reads, s.writes, s.errors, s.integrity_faults
                );
            }
        }
        for (i, ops) in self.channel_ops.iter().enumerate() {
            if *ops > 0 {
                info!(
                    "channel {i}: ops={ops}, errors={}, busy_ticks={}",
                    self.channel_errors[i], self.channel_ticks[i]
                );
            }
        }
    }
}

/// Aggregates metrics events until shutdown, then drains what is still queued.
pub async fn run_summary_loop(
    mut rx: mpsc::Receiver<MetricsEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> Summary {
    let mut summary = Summary::default();
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => summary.record(&event),
                None => break,
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            },
        }
    }
    while let Ok(event) = rx.try_recv() {
        summary.record(&event);
    }
    if summary.transactions() == 0 {
        warn!("metrics: no transactions recorded");
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raid_op(mode: RaidMode, op: Access, error: bool) -> RaidOp {
        RaidOp {
            op,
            mode,
            bytes: 4,
            ticks: 48,
            error,
            integrity_fault: false,
        }
    }

    #[tokio::test]
    async fn summary_loop_drains_queue_on_shutdown() {
        let (tx, rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let emitter = MetricsEmitter::new(tx);

        emitter.record_raid_op(raid_op(RaidMode::Stripe, Access::Write, false));
        emitter.record_channel_op(ChannelOp {
            channel: 2,
            op: Access::Write,
            bytes: 1,
            ticks: 46,
            error: true,
        });

        let task = tokio::spawn(run_summary_loop(rx, shutdown_rx));
        shutdown_tx.send(true).unwrap();
        let summary = task.await.unwrap();

        assert_eq!(summary.transactions(), 1);
        assert_eq!(summary.per_mode[&RaidMode::Stripe].writes, 1);
        assert_eq!(summary.channel_ops, [0, 0, 1, 0]);
        assert_eq!(summary.channel_errors[2], 1);
    }

    #[test]
    fn summary_ignores_unknown_channels() {
        let mut summary = Summary::default();
        summary.record(&MetricsEvent::ChannelOp(ChannelOp {
            channel: 9,
            op: Access::Read,
            bytes: 1,
            ticks: 35,
            error: false,
        }));
        summary.record(&MetricsEvent::RaidOp(raid_op(RaidMode::Mirror, Access::Read, true)));
        assert_eq!(summary.channel_ops, [0; 4]);
        assert_eq!(summary.per_mode[&RaidMode::Mirror].errors, 1);
    }
}
