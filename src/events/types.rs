//! Domain event types consumed from the bus.

use serde::{Deserialize, Serialize};

/// One operator entry in an escalation event's pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorEscalationDetail {
    /// Operator display name.
    #[serde(default)]
    pub name: String,

    /// Operator phone number.
    pub phone_number: String,

    /// Escalation tier this operator belongs to (1-indexed).
    pub tier: i32,
}

/// A multi-operator alert: notify the officer and every operator whose
/// tier falls within the escalation level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationEvent {
    /// Severity tier controlling how many operator tiers are notified.
    pub escalation_level: i32,

    /// Top-tier contact phone, always notified.
    pub officer_phone: String,

    /// Top-tier contact name.
    #[serde(default = "default_officer_name")]
    pub officer_name: String,

    /// Operator pool, in notification order.
    #[serde(default)]
    pub operators: Vec<OperatorEscalationDetail>,
}

fn default_officer_name() -> String {
    "Officer".to_string()
}

/// A single-recipient reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeEvent {
    /// Phone number of the operator to remind.
    pub recipient_phone: String,

    /// Operator display name.
    #[serde(default = "default_operator_name")]
    pub operator_name: String,

    /// Scheme the reminder refers to.
    #[serde(default)]
    pub scheme_id: String,

    /// Tenant partition the nudge belongs to.
    pub tenant_id: u32,

    /// Requested rendering language.
    #[serde(default)]
    pub language_id: u32,
}

fn default_operator_name() -> String {
    "Operator".to_string()
}

/// Typed view of one bus message, discriminated by `eventType`.
///
/// Unknown discriminators are preserved rather than rejected so the bus
/// format stays forward-compatible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Escalation(EscalationEvent),
    Nudge(NudgeEvent),
    Unknown { event_type: String },
}
