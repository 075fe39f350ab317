//! Signalcast Core — the signal engine.
//!
//! This crate contains the deterministic heart of the system:
//! - Domain types (bars, signals, position state)
//! - Incremental indicators (RSI, MACD, EMA) with warm-up gating
//! - Signal detection (bars-since counters × MACD crossover)
//! - Position lifecycle state machine with percent stop/target bounds
//! - The append-only deduplicated signal log
//! - The per-bar pipeline and the `SignalSink` seam to the distribution side
//!
//! No async runtime and no I/O live here; the server crate owns those.

pub mod config;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod log;
pub mod position;
pub mod signals;
