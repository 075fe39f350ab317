//! IndicatorBank — every indicator the strategy tracks, updated per bar.

use std::collections::BTreeMap;

use crate::config::StrategyConfig;
use crate::domain::Bar;

use super::{Ema, Macd, MacdOutput, Rsi};

/// One bar's indicator readings. `None` means the indicator is still in
/// warm-up and must not feed signal detection.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<MacdOutput>,
    /// period → value, for the informational EMA set.
    pub emas: BTreeMap<usize, Option<f64>>,
}

impl IndicatorSnapshot {
    /// True once the detection inputs (RSI and MACD) are both ready.
    pub fn detection_ready(&self) -> bool {
        self.rsi.is_some() && self.macd.is_some()
    }
}

/// Owns the strategy's indicator set and advances it one bar at a time.
#[derive(Debug)]
pub struct IndicatorBank {
    rsi: Rsi,
    macd: Macd,
    emas: BTreeMap<usize, Ema>,
}

impl IndicatorBank {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            rsi: Rsi::new(config.rsi_period),
            macd: Macd::new(config.macd_fast, config.macd_slow, config.macd_signal),
            emas: config
                .ema_periods
                .iter()
                .map(|&p| (p, Ema::new(p)))
                .collect(),
        }
    }

    /// Feed one bar into every indicator and snapshot the results.
    pub fn update(&mut self, bar: &Bar) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: self.rsi.update(bar.close),
            macd: self.macd.update(bar.close),
            emas: self
                .emas
                .iter_mut()
                .map(|(&p, ema)| (p, ema.update(bar.close)))
                .collect(),
        }
    }
}
