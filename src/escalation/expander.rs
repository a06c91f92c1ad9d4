//! Escalation expansion logic.
//!
//! # Responsibilities
//! - Turn one escalation event into concrete delivery targets
//! - Enforce tier cutoff, ordering and per-recipient dedup
//!
//! # Design Decisions
//! - The officer always comes first, over the fastest channel (WhatsApp)
//! - Operators keep their input order; tiers above the level are dropped
//! - Each physical phone number is notified at most once per event

use std::collections::HashSet;

use crate::dispatch::outcome::{Channel, DeliveryTarget};
use crate::events::types::EscalationEvent;

/// Expand an escalation event into its delivery targets.
///
/// The officer is emitted first, then every operator whose tier is within
/// the escalation level, in input order. Duplicate phone numbers are
/// skipped. A level of zero or below yields the officer alone.
pub fn expand(event: &EscalationEvent) -> Vec<DeliveryTarget> {
    let subject = format!("Escalation Level {}", event.escalation_level);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut targets = Vec::with_capacity(event.operators.len() + 1);

    seen.insert(event.officer_phone.as_str());
    targets.push(DeliveryTarget {
        recipient: event.officer_phone.clone(),
        subject: subject.clone(),
        body: format!(
            "{}: escalation raised to level {}.",
            event.officer_name, event.escalation_level
        ),
        channel: Channel::WhatsApp,
    });

    for operator in &event.operators {
        if operator.tier > event.escalation_level {
            continue;
        }
        if !seen.insert(operator.phone_number.as_str()) {
            continue;
        }
        targets.push(DeliveryTarget {
            recipient: operator.phone_number.clone(),
            subject: subject.clone(),
            body: format!(
                "{}: escalation raised to level {}.",
                operator.name, event.escalation_level
            ),
            channel: Channel::WhatsApp,
        });
    }

    targets
}
