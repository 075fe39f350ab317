//! Position state — the single implied directional position.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Directional bias of the engine: flat, long, or short.
///
/// At most one position is open at a time; entering is only legal from
/// `Flat` or the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

impl PositionState {
    pub fn is_open(&self) -> bool {
        !matches!(self, PositionState::Flat)
    }
}

/// Entry details of the currently open position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
}
