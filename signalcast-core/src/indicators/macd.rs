//! Moving Average Convergence Divergence (MACD), incremental.
//!
//! MACD line = fast EMA - slow EMA; signal line = EMA(signal period) of the
//! MACD line, seeded by the simple average of its first `signal` values.
//! Output appears only once both lines are ready.

use super::ema::Ema;

/// One bar's MACD line and signal line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
}

impl MacdOutput {
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

/// Incremental MACD over a close series.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast < slow, "MACD fast period must be below slow period");
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
        }
    }

    /// Feed one close; returns both lines once warm-up has elapsed.
    ///
    /// The MACD line exists from the bar the slow EMA seeds; the signal EMA
    /// starts seeding from that bar, so full output lags a further
    /// `signal - 1` bars.
    pub fn update(&mut self, close: f64) -> Option<MacdOutput> {
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);
        let (Some(fast), Some(slow)) = (fast, slow) else {
            return None;
        };
        let macd = fast - slow;
        self.signal
            .update(macd)
            .map(|signal| MacdOutput { macd, signal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn macd_known_values() {
        // fast=1 (EMA equals close), slow=2 (alpha=2/3), signal=2.
        // Closes: 100, 90, 80, 85, 95
        //   slow: seeds avg(100,90)=95, then 2/3*80+1/3*95=85, 85, 91.666...
        //   line: 90-95=-5, 80-85=-5, 85-85=0, 95-91.666=3.333...
        //   signal: seeds avg(-5,-5)=-5, then 2/3*0+1/3*(-5)=-1.666...,
        //           2/3*3.333+1/3*(-1.666)=1.666...
        let mut macd = Macd::new(1, 2, 2);
        assert_eq!(macd.update(100.0), None); // slow not seeded
        assert_eq!(macd.update(90.0), None); // line exists, signal seeding
        let out = macd.update(80.0).unwrap();
        assert_approx(out.macd, -5.0, DEFAULT_EPSILON);
        assert_approx(out.signal, -5.0, DEFAULT_EPSILON);

        let out = macd.update(85.0).unwrap();
        assert_approx(out.macd, 0.0, DEFAULT_EPSILON);
        assert_approx(out.signal, -5.0 / 3.0, 1e-9);
        assert!(out.macd > out.signal);

        let out = macd.update(95.0).unwrap();
        assert_approx(out.macd, 95.0 - (2.0 / 3.0 * 85.0 + 85.0 / 3.0), 1e-9);
        assert_approx(out.histogram(), out.macd - out.signal, DEFAULT_EPSILON);
    }

    #[test]
    fn macd_flat_series_has_zero_lines() {
        let mut macd = Macd::new(2, 3, 2);
        let mut last = None;
        for _ in 0..10 {
            last = macd.update(50.0);
        }
        let out = last.unwrap();
        assert_approx(out.macd, 0.0, DEFAULT_EPSILON);
        assert_approx(out.signal, 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn macd_warmup_with_default_periods() {
        // slow=26 seeds at bar 26; signal=9 needs 9 line values.
        let mut macd = Macd::new(12, 26, 9);
        let mut first_ready = None;
        for i in 0..40 {
            if macd.update(100.0 + (i % 5) as f64).is_some() && first_ready.is_none() {
                first_ready = Some(i);
            }
        }
        assert_eq!(first_ready, Some(33)); // 26 + 9 - 1 bars, zero-indexed
    }
}
