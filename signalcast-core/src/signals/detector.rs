//! SignalDetector — derives raw buy/sell candidates from indicator readings.

use serde::{Deserialize, Serialize};

use crate::config::StrategyConfig;
use crate::indicators::IndicatorSnapshot;

use super::ThresholdCounters;

/// Raw candidate flags for one bar. Entry gating and exit logic live in the
/// position tracker, not here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFlags {
    pub buy: bool,
    pub sell: bool,
}

impl SignalFlags {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Stateful detector: owns the bars-since counters and applies the
/// oversold-recency × MACD-crossover rule.
///
/// The crossover condition is level-triggered on purpose: `buy` holds on
/// every bar the MACD line sits above its signal line while the oversold
/// trigger is fresh, not only on the crossing bar. Downstream entry gating
/// and log dedup keep that from producing duplicate entries.
#[derive(Debug, Clone, Default)]
pub struct SignalDetector {
    counters: ThresholdCounters,
}

impl SignalDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> &ThresholdCounters {
        &self.counters
    }

    /// Advance the counters and evaluate the rule for one bar.
    ///
    /// A not-ready indicator degrades to "no signal": RSI warm-up bars do
    /// not advance the counters, and MACD warm-up bars produce no flags.
    pub fn evaluate(&mut self, snapshot: &IndicatorSnapshot, config: &StrategyConfig) -> SignalFlags {
        let Some(rsi) = snapshot.rsi else {
            return SignalFlags::none();
        };
        self.counters
            .observe(rsi, config.rsi_oversold, config.rsi_overbought);

        let Some(macd) = snapshot.macd else {
            return SignalFlags::none();
        };
        let crossover_bull = macd.macd > macd.signal;
        let crossover_bear = macd.macd < macd.signal;

        SignalFlags {
            buy: self.counters.was_oversold(config.lookback_bars) && crossover_bull,
            sell: self.counters.was_overbought(config.lookback_bars) && crossover_bear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::MacdOutput;
    use std::collections::BTreeMap;

    fn snapshot(rsi: Option<f64>, macd: Option<(f64, f64)>) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi,
            macd: macd.map(|(macd, signal)| MacdOutput { macd, signal }),
            emas: BTreeMap::new(),
        }
    }

    fn config(lookback_bars: u32) -> StrategyConfig {
        StrategyConfig {
            lookback_bars,
            ..StrategyConfig::default()
        }
    }

    #[test]
    fn no_flags_while_indicators_warm_up() {
        let mut detector = SignalDetector::new();
        let config = config(55);
        assert_eq!(
            detector.evaluate(&snapshot(None, None), &config),
            SignalFlags::none()
        );
        // RSI oversold but MACD not ready: counters advance, no flags.
        assert_eq!(
            detector.evaluate(&snapshot(Some(20.0), None), &config),
            SignalFlags::none()
        );
        assert_eq!(detector.counters().bars_since_oversold, Some(0));
    }

    #[test]
    fn rsi_warmup_does_not_advance_counters() {
        let mut detector = SignalDetector::new();
        let config = config(55);
        detector.evaluate(&snapshot(Some(20.0), None), &config);
        detector.evaluate(&snapshot(None, Some((1.0, 0.0))), &config);
        // Counter untouched by the RSI-less bar.
        assert_eq!(detector.counters().bars_since_oversold, Some(0));
    }

    #[test]
    fn buy_requires_fresh_oversold_and_bull_cross() {
        let mut detector = SignalDetector::new();
        let config = config(55);
        // Oversold with a bearish MACD: no buy yet.
        let flags = detector.evaluate(&snapshot(Some(25.0), Some((-1.0, 0.5))), &config);
        assert!(!flags.buy);
        // MACD flips above its signal line while the trigger is fresh.
        let flags = detector.evaluate(&snapshot(Some(45.0), Some((1.0, 0.5))), &config);
        assert!(flags.buy);
        assert!(!flags.sell);
    }

    #[test]
    fn sell_is_symmetric() {
        let mut detector = SignalDetector::new();
        let config = config(55);
        detector.evaluate(&snapshot(Some(75.0), Some((1.0, 0.5))), &config);
        let flags = detector.evaluate(&snapshot(Some(60.0), Some((-1.0, 0.5))), &config);
        assert!(flags.sell);
        assert!(!flags.buy);
    }

    #[test]
    fn buy_fires_iff_cross_within_lookback() {
        // Oversold at bar N, bullish cross at bar N+k: buy iff k <= lookback.
        let lookback = 3u32;
        for k in 1..=lookback + 1 {
            let mut detector = SignalDetector::new();
            let config = config(lookback);
            detector.evaluate(&snapshot(Some(25.0), Some((-1.0, 0.0))), &config);
            let mut flags = SignalFlags::none();
            for i in 1..=k {
                let macd = if i == k { (1.0, 0.0) } else { (-1.0, 0.0) };
                flags = detector.evaluate(&snapshot(Some(50.0), Some(macd)), &config);
            }
            assert_eq!(flags.buy, k <= lookback, "k={k}");
        }
    }

    #[test]
    fn level_triggered_cross_keeps_firing() {
        let mut detector = SignalDetector::new();
        let config = config(55);
        detector.evaluate(&snapshot(Some(25.0), Some((1.0, 0.0))), &config);
        for _ in 0..3 {
            let flags = detector.evaluate(&snapshot(Some(50.0), Some((1.0, 0.0))), &config);
            assert!(flags.buy, "buy holds on every bar the line stays above");
        }
    }
}
