//! Pipeline — the strictly sequential per-bar engine.
//!
//! One bar at a time, in ascending timestamp order: update the indicator
//! bank, evaluate the detector, advance the position state machine, then
//! append each candidate to the log. Newly appended signals (and only
//! those) are published to the sink — the single handoff to the
//! distribution side.

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::StrategyConfig;
use crate::domain::{Bar, PositionState, Signal};
use crate::indicators::IndicatorBank;
use crate::log::SignalLog;
use crate::position::PositionTracker;
use crate::signals::SignalDetector;

/// Errors from per-bar processing. Nothing here is fatal to the engine;
/// callers log and drop the offending bar.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bar timestamp {got} does not advance past {last}")]
    OutOfOrderBar {
        last: NaiveDateTime,
        got: NaiveDateTime,
    },
}

/// Receives each newly appended signal, exactly once.
///
/// The distribution service provides a channel-backed implementation; tests
/// record into a vec.
pub trait SignalSink: Send {
    fn publish(&mut self, signal: Signal);
}

/// Sink that drops everything. Used by offline runs that only want the
/// pipeline's return values.
#[derive(Debug, Default)]
pub struct NullSink;

impl SignalSink for NullSink {
    fn publish(&mut self, _signal: Signal) {}
}

/// Owns every stage of the signal engine plus the log.
pub struct Pipeline {
    config: StrategyConfig,
    bank: IndicatorBank,
    detector: SignalDetector,
    tracker: PositionTracker,
    log: SignalLog,
    sink: Box<dyn SignalSink>,
    last_timestamp: Option<NaiveDateTime>,
}

impl Pipeline {
    pub fn new(config: StrategyConfig, sink: Box<dyn SignalSink>) -> Self {
        Self {
            bank: IndicatorBank::new(&config),
            detector: SignalDetector::new(),
            tracker: PositionTracker::new(),
            log: SignalLog::new(),
            sink,
            last_timestamp: None,
            config,
        }
    }

    pub fn log(&self) -> &SignalLog {
        &self.log
    }

    pub fn position_state(&self) -> PositionState {
        self.tracker.state()
    }

    /// Process one bar; returns the signals newly appended for it.
    pub fn process_bar(&mut self, bar: &Bar) -> Result<Vec<Signal>, EngineError> {
        if let Some(last) = self.last_timestamp {
            if bar.timestamp <= last {
                return Err(EngineError::OutOfOrderBar {
                    last,
                    got: bar.timestamp,
                });
            }
        }
        self.last_timestamp = Some(bar.timestamp);

        let snapshot = self.bank.update(bar);
        let flags = self.detector.evaluate(&snapshot, &self.config);
        let candidates = self.tracker.on_bar(bar, flags, &self.config);

        let mut emitted = Vec::new();
        for candidate in candidates {
            if !self.log.append(candidate.clone()) {
                debug!(kind = %candidate.kind, "duplicate signal rejected");
                continue;
            }
            info!(
                kind = %candidate.kind,
                price = candidate.price,
                timestamp = %candidate.timestamp,
                "signal emitted"
            );
            self.sink.publish(candidate.clone());
            emitted.push(candidate);
        }
        Ok(emitted)
    }

    /// Fold a whole feed through the pipeline, dropping bad bars with a
    /// warning. Returns everything emitted.
    pub fn process_bars(&mut self, bars: &[Bar]) -> Vec<Signal> {
        let mut emitted = Vec::new();
        for bar in bars {
            match self.process_bar(bar) {
                Ok(signals) => emitted.extend(signals),
                Err(err) => warn!(%err, "dropping bar"),
            }
        }
        emitted
    }
}
