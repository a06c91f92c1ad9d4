//! Delivery attempt outcomes and target types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Delivery channel tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Webhook,
    Email,
    WhatsApp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Webhook => "WEBHOOK",
            Channel::Email => "EMAIL",
            Channel::WhatsApp => "WHATSAPP",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete delivery: who to reach, through which channel, with what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTarget {
    /// Channel-specific address: phone number, email address, webhook URL.
    pub recipient: String,

    /// Subject line (used by the email and webhook channels).
    pub subject: String,

    /// Message body, rendered upstream.
    pub body: String,

    /// Channel to deliver through.
    pub channel: Channel,
}

/// Result of one delivery attempt through a channel transport.
///
/// Ordinary delivery failures are values, never errors; only contract
/// violations (`MalformedTarget`) propagate separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The transport accepted the message.
    Delivered,
    /// The attempt failed but a retry may succeed (timeouts, 5xx, I/O).
    TransientFailure(String),
    /// The attempt failed and retrying cannot help (4xx, bad config).
    PermanentFailure(String),
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// Contract violation: the target cannot be dispatched at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed delivery target for {channel}: {reason}")]
pub struct MalformedTarget {
    pub channel: Channel,
    pub reason: String,
}

/// Map an HTTP response status to a dispatch outcome.
///
/// 2xx is delivered; 408, 429 and 5xx are worth retrying; any other 4xx is
/// a permanent rejection of this payload.
pub fn outcome_from_status(status: u16) -> DispatchOutcome {
    match status {
        200..=299 => DispatchOutcome::Delivered,
        408 | 429 | 500..=599 => {
            DispatchOutcome::TransientFailure(format!("http status {}", status))
        }
        _ => DispatchOutcome::PermanentFailure(format!("http status {}", status)),
    }
}
