//! PositionTracker — the flat/long/short state machine.
//!
//! Owns the single implied position. Entries arm percentage stop-loss and
//! take-profit bounds off the entry close; every later bar checks the close
//! against them and a breach closes the position back to flat, re-armed for
//! a future entry.

use crate::config::StrategyConfig;
use crate::domain::{Bar, OpenPosition, PositionState, Signal, SignalKind};
use crate::signals::SignalFlags;

/// State machine over the implied directional position.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    state: Option<(PositionState, OpenPosition)>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PositionState {
        match &self.state {
            Some((state, _)) => *state,
            None => PositionState::Flat,
        }
    }

    pub fn open_position(&self) -> Option<&OpenPosition> {
        self.state.as_ref().map(|(_, open)| open)
    }

    /// Apply one bar's candidate flags and exit checks, in order:
    /// buy entry, sell entry, then stop/target breach. A position opened on
    /// this bar is not breach-checked until the next bar.
    pub fn on_bar(
        &mut self,
        bar: &Bar,
        flags: SignalFlags,
        config: &StrategyConfig,
    ) -> Vec<Signal> {
        let mut events = Vec::new();
        let mut entered_this_bar = false;

        if flags.buy
            && config.enable_long_strategy
            && self.state() != PositionState::Long
        {
            self.enter(PositionState::Long, bar);
            entered_this_bar = true;
            events.push(Signal::new(SignalKind::Buy, bar.close, bar.timestamp));
        }

        if flags.sell
            && config.enable_short_strategy
            && self.state() != PositionState::Short
        {
            self.enter(PositionState::Short, bar);
            entered_this_bar = true;
            events.push(Signal::new(SignalKind::Sell, bar.close, bar.timestamp));
        }

        if !entered_this_bar {
            if let Some(exit) = self.check_exit(bar, config) {
                self.state = None;
                events.push(exit);
            }
        }

        events
    }

    fn enter(&mut self, state: PositionState, bar: &Bar) {
        self.state = Some((
            state,
            OpenPosition {
                entry_price: bar.close,
                entry_time: bar.timestamp,
            },
        ));
    }

    /// Stop-loss is checked before take-profit. For a given direction the
    /// two bounds bracket the entry price, so at most one can be breached.
    fn check_exit(&self, bar: &Bar, config: &StrategyConfig) -> Option<Signal> {
        let (state, open) = self.state.as_ref()?;
        let entry = open.entry_price;
        let (stop_hit, target_hit) = match state {
            PositionState::Long => {
                let stop = entry * (1.0 - config.long_stoploss / 100.0);
                let target = entry * (1.0 + config.long_takeprofit / 100.0);
                (bar.close < stop, bar.close > target)
            }
            PositionState::Short => {
                let stop = entry * (1.0 + config.short_stoploss / 100.0);
                let target = entry * (1.0 - config.short_takeprofit / 100.0);
                (bar.close > stop, bar.close < target)
            }
            PositionState::Flat => return None,
        };

        if stop_hit {
            Some(Signal::new(SignalKind::StopLoss, bar.close, bar.timestamp))
        } else if target_hit {
            Some(Signal::new(SignalKind::TakeProfit, bar.close, bar.timestamp))
        } else {
            None
        }
    }
}
