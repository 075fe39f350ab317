//! Position lifecycle — entries, armed exit bounds, breach detection.

pub mod tracker;

pub use tracker::PositionTracker;
