//! Notification delivery records.
//!
//! # States
//! - Pending: created, no terminal outcome yet
//! - Sent: transport accepted the message (terminal)
//! - Failed: permanent failure or retry budget exhausted (terminal)
//!
//! # State Transitions
//! ```text
//! Pending → Sent   (on Delivered; sent_at stamped exactly once)
//! Pending → Failed (on PermanentFailure or retry exhaustion)
//! ```
//! No transition leaves Sent or Failed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dispatch::outcome::{Channel, DeliveryTarget};
use crate::tenant::context::TenantId;

/// Delivery status of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, NotificationStatus::Pending)
    }
}

/// One delivery attempt, owned by the store once created.
///
/// `channel` and `recipient` never change after creation; only `status`,
/// `sent_at` and `failure_reason` mutate, and only through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub channel: Channel,
    pub status: NotificationStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Create a fresh pending record for one delivery target.
    pub(crate) fn pending(tenant_id: TenantId, target: &DeliveryTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            recipient: target.recipient.clone(),
            subject: target.subject.clone(),
            body: target.body.clone(),
            channel: target.channel,
            status: NotificationStatus::Pending,
            sent_at: None,
            failure_reason: None,
            created_at: Utc::now(),
        }
    }

    /// Transition to Sent. A no-op when the record is already terminal.
    pub(crate) fn mark_sent(&mut self) -> NotificationStatus {
        if self.status == NotificationStatus::Pending {
            self.status = NotificationStatus::Sent;
            self.sent_at = Some(Utc::now());
        }
        self.status
    }

    /// Transition to Failed. A no-op when the record is already terminal.
    pub(crate) fn mark_failed(&mut self, reason: &str) -> NotificationStatus {
        if self.status == NotificationStatus::Pending {
            self.status = NotificationStatus::Failed;
            self.failure_reason = Some(reason.to_string());
        }
        self.status
    }
}
