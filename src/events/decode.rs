//! Bus payload decoding.
//!
//! # Responsibilities
//! - Inspect the `eventType` discriminator
//! - Deserialize the matching event struct
//! - Classify unknown discriminators without failing
//!
//! # Design Decisions
//! - Discriminator matching is case-insensitive (mirrors upstream producers)
//! - Malformed JSON or mistyped fields is a hard decode error; the message
//!   will never become well-formed and is dropped, not retried

use serde_json::Value;
use thiserror::Error;

use crate::events::types::{EscalationEvent, Event, NudgeEvent};

/// Decoding failure for a bus payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("malformed {event_type} event: {source}")]
    MalformedEvent {
        event_type: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a raw payload into a typed event.
pub fn decode_event(payload: &[u8]) -> Result<Event, DecodeError> {
    let root: Value = serde_json::from_slice(payload).map_err(DecodeError::InvalidJson)?;

    let event_type = root
        .get("eventType")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_uppercase();

    match event_type.as_str() {
        "NUDGE" => {
            let event: NudgeEvent =
                serde_json::from_value(root).map_err(|source| DecodeError::MalformedEvent {
                    event_type: "NUDGE",
                    source,
                })?;
            Ok(Event::Nudge(event))
        }
        "ESCALATION" => {
            let event: EscalationEvent =
                serde_json::from_value(root).map_err(|source| DecodeError::MalformedEvent {
                    event_type: "ESCALATION",
                    source,
                })?;
            Ok(Event::Escalation(event))
        }
        _ => Ok(Event::Unknown { event_type }),
    }
}
