//! Domain types for Signalcast.

pub mod bar;
pub mod position;
pub mod signal;

pub use bar::Bar;
pub use position::{OpenPosition, PositionState};
pub use signal::{Signal, SignalKind};
