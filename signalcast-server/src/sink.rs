//! Channel-backed SignalSink — the pipeline side of the task boundary.

use tokio::sync::mpsc;
use tracing::warn;

use signalcast_core::domain::Signal;
use signalcast_core::engine::SignalSink;

/// Publishes each newly appended signal into the distribution actor's
/// channel. Sending never blocks the pipeline; if the service is gone the
/// signal is dropped with a warning (it stays in the pipeline's log).
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Signal>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<Signal>) -> Self {
        Self { tx }
    }
}

impl SignalSink for ChannelSink {
    fn publish(&mut self, signal: Signal) {
        if self.tx.send(signal).is_err() {
            warn!("distribution service unavailable; push dropped");
        }
    }
}
