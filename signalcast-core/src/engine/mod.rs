//! Bar-processing pipeline: indicators → detection → position lifecycle →
//! signal log → sink.

pub mod pipeline;

pub use pipeline::{EngineError, NullSink, Pipeline, SignalSink};
