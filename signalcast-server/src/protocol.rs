//! Wire protocol for subscribers.
//!
//! Outbound objects are `{signal, price, datetime}` with the datetime
//! formatted `YYYY-MM-DD HH:MM:SS`. Inbound requests are bare text:
//! `get_signals` (full history) and `get_last_signal` (most recent only).
//! Anything else is ignored and the connection stays open.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use signalcast_core::domain::{Signal, SignalKind};
use thiserror::Error;

/// Textual timestamp format used on the wire.
pub const WIRE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("bad datetime '{text}': {source}")]
    BadDatetime {
        text: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One signal as subscribers see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMessage {
    pub signal: SignalKind,
    pub price: f64,
    pub datetime: String,
}

impl SignalMessage {
    pub fn from_signal(signal: &Signal) -> Self {
        Self {
            signal: signal.kind,
            price: signal.price,
            datetime: signal.timestamp.format(WIRE_DATETIME_FORMAT).to_string(),
        }
    }

    /// Parse back into the domain type. Exact round-trip at second precision.
    pub fn to_signal(&self) -> Result<Signal, ProtocolError> {
        let timestamp = NaiveDateTime::parse_from_str(&self.datetime, WIRE_DATETIME_FORMAT)
            .map_err(|source| ProtocolError::BadDatetime {
                text: self.datetime.clone(),
                source,
            })?;
        Ok(Signal::new(self.signal, self.price, timestamp))
    }
}

/// A recognized subscriber request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// `get_signals` — full ordered history.
    History,
    /// `get_last_signal` — most recent signal, or no reply if none exist.
    Latest,
}

/// Parse an inbound text frame. `None` means "malformed, ignore".
pub fn parse_request(text: &str) -> Option<Request> {
    match text.trim() {
        "get_signals" => Some(Request::History),
        "get_last_signal" => Some(Request::Latest),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_signal() -> Signal {
        Signal::new(
            SignalKind::StopLoss,
            431.25,
            NaiveDate::from_ymd_opt(2024, 12, 1)
                .unwrap()
                .and_hms_opt(13, 42, 7)
                .unwrap(),
        )
    }

    #[test]
    fn wire_shape_matches_protocol() {
        let msg = SignalMessage::from_signal(&sample_signal());
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r#"{"signal":"stop_loss","price":431.25,"datetime":"2024-12-01 13:42:07"}"#
        );
    }

    #[test]
    fn roundtrip_preserves_all_fields() {
        let original = sample_signal();
        let msg = SignalMessage::from_signal(&original);
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: SignalMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.to_signal().unwrap(), original);
    }

    #[test]
    fn bad_datetime_is_an_error() {
        let msg = SignalMessage {
            signal: SignalKind::Buy,
            price: 1.0,
            datetime: "yesterday-ish".into(),
        };
        assert!(matches!(
            msg.to_signal(),
            Err(ProtocolError::BadDatetime { .. })
        ));
    }

    #[test]
    fn request_parsing() {
        assert_eq!(parse_request("get_signals"), Some(Request::History));
        assert_eq!(parse_request("get_last_signal"), Some(Request::Latest));
        assert_eq!(parse_request("  get_signals\n"), Some(Request::History));
        assert_eq!(parse_request("gimme"), None);
        assert_eq!(parse_request(""), None);
    }
}
