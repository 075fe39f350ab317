//! Bars-since counters for RSI threshold events.

use serde::{Deserialize, Serialize};

/// Tracks how many bars have elapsed since RSI last hit each threshold.
///
/// Each counter is `None` until its threshold first triggers, then resets to
/// 0 on every qualifying bar and increments by exactly 1 otherwise —
/// monotonically non-decreasing between resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdCounters {
    pub bars_since_oversold: Option<u32>,
    pub bars_since_overbought: Option<u32>,
}

impl ThresholdCounters {
    /// Advance both counters for one bar's RSI reading.
    ///
    /// Only call with a ready RSI value; warm-up bars must not advance the
    /// counters.
    pub fn observe(&mut self, rsi: f64, oversold: f64, overbought: f64) {
        if rsi <= oversold {
            self.bars_since_oversold = Some(0);
        } else if let Some(n) = self.bars_since_oversold {
            self.bars_since_oversold = Some(n + 1);
        }

        if rsi >= overbought {
            self.bars_since_overbought = Some(0);
        } else if let Some(n) = self.bars_since_overbought {
            self.bars_since_overbought = Some(n + 1);
        }
    }

    /// True when an oversold trigger is at most `lookback_bars` bars stale.
    pub fn was_oversold(&self, lookback_bars: u32) -> bool {
        self.bars_since_oversold.is_some_and(|n| n <= lookback_bars)
    }

    /// True when an overbought trigger is at most `lookback_bars` bars stale.
    pub fn was_overbought(&self, lookback_bars: u32) -> bool {
        self.bars_since_overbought
            .is_some_and(|n| n <= lookback_bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_before_first_trigger() {
        let mut counters = ThresholdCounters::default();
        counters.observe(50.0, 30.0, 70.0);
        counters.observe(45.0, 30.0, 70.0);
        assert_eq!(counters.bars_since_oversold, None);
        assert_eq!(counters.bars_since_overbought, None);
        assert!(!counters.was_oversold(100));
    }

    #[test]
    fn resets_on_threshold_and_increments_after() {
        let mut counters = ThresholdCounters::default();
        counters.observe(25.0, 30.0, 70.0); // at threshold
        assert_eq!(counters.bars_since_oversold, Some(0));
        counters.observe(40.0, 30.0, 70.0);
        counters.observe(50.0, 30.0, 70.0);
        assert_eq!(counters.bars_since_oversold, Some(2));
        counters.observe(30.0, 30.0, 70.0); // boundary counts (<=)
        assert_eq!(counters.bars_since_oversold, Some(0));
    }

    #[test]
    fn counters_are_independent() {
        let mut counters = ThresholdCounters::default();
        counters.observe(25.0, 30.0, 70.0);
        counters.observe(75.0, 30.0, 70.0);
        assert_eq!(counters.bars_since_oversold, Some(1));
        assert_eq!(counters.bars_since_overbought, Some(0));
    }

    #[test]
    fn lookback_staleness_boundary() {
        let mut counters = ThresholdCounters::default();
        counters.observe(25.0, 30.0, 70.0);
        for _ in 0..3 {
            counters.observe(50.0, 30.0, 70.0);
        }
        assert!(counters.was_oversold(3));
        assert!(!counters.was_oversold(2));
    }

    proptest! {
        /// Reference-model check: reset to 0 exactly on qualifying bars,
        /// otherwise +1 from the prior value; absent before the first trigger.
        #[test]
        fn counter_follows_reset_increment_model(rsis in prop::collection::vec(0.0f64..100.0, 1..80)) {
            let mut counters = ThresholdCounters::default();
            let mut model: Option<u32> = None;
            for rsi in rsis {
                counters.observe(rsi, 30.0, 70.0);
                model = if rsi <= 30.0 {
                    Some(0)
                } else {
                    model.map(|n| n + 1)
                };
                prop_assert_eq!(counters.bars_since_oversold, model);
            }
        }
    }
}
