//! Exponential Moving Average (EMA), incremental.
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1]
//! Seed: simple average of the first `period` closes.
//! Ready from the `period`-th bar onward.

/// Incremental EMA over a close series.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    alpha: f64,
    seed_buf: Vec<f64>,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            alpha: 2.0 / (period as f64 + 1.0),
            seed_buf: Vec::with_capacity(period),
            value: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Current value, `None` until the seed window has filled.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Feed one close; returns the EMA value once warm-up has elapsed.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        let next = match self.value {
            Some(prev) => self.alpha * close + (1.0 - self.alpha) * prev,
            None => {
                self.seed_buf.push(close);
                if self.seed_buf.len() < self.period {
                    return None;
                }
                let seed = self.seed_buf.iter().sum::<f64>() / self.period as f64;
                self.seed_buf.clear();
                seed
            }
        };
        self.value = Some(next);
        self.value
    }
}
