//! Relative Strength Index (RSI), incremental.
//!
//! Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Seed: plain averages over the first `period` price changes, so warm-up
//! is `period + 1` bars.
//! Edge case: avg_loss == 0 → RSI = 100 (defined, not an error).

/// Incremental RSI over a close series.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev_close: Option<f64>,
    seed_gain: f64,
    seed_loss: f64,
    seed_count: usize,
    averages: Option<(f64, f64)>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            prev_close: None,
            seed_gain: 0.0,
            seed_loss: 0.0,
            seed_count: 0,
            averages: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Current value, `None` until `period + 1` bars have been seen.
    pub fn value(&self) -> Option<f64> {
        self.averages.map(|(g, l)| rsi_from_averages(g, l))
    }

    /// Feed one close; returns the RSI value once warm-up has elapsed.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        let prev = match self.prev_close.replace(close) {
            Some(prev) => prev,
            None => return None,
        };
        let change = close - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        let (avg_gain, avg_loss) = match self.averages {
            Some((avg_gain, avg_loss)) => {
                // Wilder smoothing with alpha = 1/period
                let alpha = 1.0 / self.period as f64;
                (
                    alpha * gain + (1.0 - alpha) * avg_gain,
                    alpha * loss + (1.0 - alpha) * avg_loss,
                )
            }
            None => {
                self.seed_gain += gain;
                self.seed_loss += loss;
                self.seed_count += 1;
                if self.seed_count < self.period {
                    return None;
                }
                (
                    self.seed_gain / self.period as f64,
                    self.seed_loss / self.period as f64,
                )
            }
        };
        self.averages = Some((avg_gain, avg_loss));
        Some(rsi_from_averages(avg_gain, avg_loss))
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
