//! Signal detection — RSI threshold recency crossed with MACD direction.

pub mod counters;
pub mod detector;

pub use counters::ThresholdCounters;
pub use detector::{SignalDetector, SignalFlags};
