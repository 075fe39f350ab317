//! Signal — an immutable trading event.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The four event kinds the engine can emit.
///
/// Serialized in `snake_case` on the wire (`buy`, `sell`, `stop_loss`,
/// `take_profit`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Buy,
    Sell,
    StopLoss,
    TakeProfit,
}

impl SignalKind {
    /// Wire name of the kind (same spelling serde uses).
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::Buy => "buy",
            SignalKind::Sell => "sell",
            SignalKind::StopLoss => "stop_loss",
            SignalKind::TakeProfit => "take_profit",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An emitted trading event: what fired, at what price, on which bar.
///
/// Immutable once created. Equality is structural (all fields) and governs
/// deduplication in the signal log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub price: f64,
    pub timestamp: NaiveDateTime,
}

impl Signal {
    pub fn new(kind: SignalKind, price: f64, timestamp: NaiveDateTime) -> Self {
        Self {
            kind,
            price,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn kind_wire_names() {
        assert_eq!(SignalKind::Buy.as_str(), "buy");
        assert_eq!(SignalKind::StopLoss.as_str(), "stop_loss");
        assert_eq!(
            serde_json::to_string(&SignalKind::TakeProfit).unwrap(),
            "\"take_profit\""
        );
    }

    #[test]
    fn equality_is_structural() {
        let a = Signal::new(SignalKind::Buy, 100.0, ts());
        let b = Signal::new(SignalKind::Buy, 100.0, ts());
        let c = Signal::new(SignalKind::Buy, 100.5, ts());
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
