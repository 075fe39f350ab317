//! Signalcast Server — the event distribution service.
//!
//! A single distribution actor owns the subscriber registry and the replay
//! history, fed exclusively by the pipeline's signal channel. WebSocket
//! connections register a bounded outbox each; pushes are fire-and-forget
//! per subscriber and a stalled or closed subscriber is evicted without
//! delaying the others.

pub mod protocol;
pub mod registry;
pub mod service;
pub mod sink;
pub mod ws;

pub use protocol::{parse_request, Request, SignalMessage, WIRE_DATETIME_FORMAT};
pub use registry::{SubscriberId, SubscriberRegistry, OUTBOX_CAPACITY};
pub use service::{DistributionHandle, DistributionService, ServerError};
pub use sink::ChannelSink;
