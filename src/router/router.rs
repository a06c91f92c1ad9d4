//! Event routing orchestration.
//!
//! # Responsibilities
//! - Decode bus messages and classify their event type
//! - Bind the tenant for the unit of work, clear it on every exit path
//! - Fan deliveries out to channel dispatchers with retry and timeout
//! - Record every outcome in the notification store
//!
//! # Design Decisions
//! - Delivery failure is not a routing failure: a FAILED record with a
//!   successful route() is the expected shape of a bad day
//! - Duplicate bus deliveries are detected by message id and routed to
//!   a no-op before any record is created

use futures_util::stream::{self, StreamExt};
use uuid::Uuid;

use crate::bus::message::BusMessage;
use crate::config::schema::RouterConfig;
use crate::dispatch::outcome::{Channel, DeliveryTarget, DispatchOutcome};
use crate::dispatch::registry::DispatcherRegistry;
use crate::escalation::expander;
use crate::events::decode::decode_event;
use crate::events::types::{Event, NudgeEvent};
use crate::observability::metrics;
use crate::resilience::backoff::RetryPolicy;
use crate::router::error::RouteError;
use crate::store::record::NotificationStatus;
use crate::store::store::NotificationStore;
use crate::tenant::context::{TenantContext, TenantId, TenantNotBound};
use crate::tenant::language::LanguageCatalog;

/// Why a well-formed message produced no deliveries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Forward-compatible unknown discriminator.
    UnknownEventType(String),
    /// The event named no usable recipient.
    BlankRecipient,
}

/// Result of routing one bus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// Deliveries were attempted; counts are per terminal record status.
    Completed { sent: usize, failed: usize },
    /// Nothing to deliver; no record created.
    Skipped(SkipReason),
    /// This message id was routed before; no record created.
    Duplicate,
}

/// The orchestrator: consumes raw bus messages end to end.
pub struct EventRouter {
    store: NotificationStore,
    registry: DispatcherRegistry,
    languages: LanguageCatalog,
    policy: RetryPolicy,
    fanout_limit: usize,
}

impl EventRouter {
    pub fn new(
        config: &RouterConfig,
        store: NotificationStore,
        registry: DispatcherRegistry,
    ) -> Self {
        Self {
            store,
            registry,
            languages: LanguageCatalog::from_config(&config.tenants),
            policy: RetryPolicy::from_config(&config.retry),
            fanout_limit: config.fanout.max_concurrency.max(1),
        }
    }

    /// Shared store handle, for ops queries.
    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    /// Route one bus message.
    ///
    /// The tenant context is cleared before returning on every path,
    /// including errors.
    pub async fn route(
        &self,
        ctx: &mut TenantContext,
        message: &BusMessage,
    ) -> Result<RouteOutcome, RouteError> {
        let result = self.route_inner(ctx, message).await;
        ctx.clear();
        result
    }

    async fn route_inner(
        &self,
        ctx: &mut TenantContext,
        message: &BusMessage,
    ) -> Result<RouteOutcome, RouteError> {
        let event = decode_event(&message.payload)?;
        metrics::record_message_routed();

        match event {
            Event::Unknown { event_type } => {
                metrics::record_message_skipped("unknown_event_type");
                tracing::warn!(
                    message = %message.id,
                    event_type = %event_type,
                    "unknown eventType, ignoring message"
                );
                Ok(RouteOutcome::Skipped(SkipReason::UnknownEventType(event_type)))
            }
            Event::Nudge(nudge) => self.route_nudge(ctx, message, nudge).await,
            Event::Escalation(event) => {
                if event.officer_phone.trim().is_empty() {
                    metrics::record_message_skipped("blank_recipient");
                    tracing::warn!(message = %message.id, "escalation officerPhone is blank, skipping");
                    return Ok(RouteOutcome::Skipped(SkipReason::BlankRecipient));
                }

                // Escalation events carry no tenant field; the transport
                // layer must attach it as metadata.
                let tenant = message
                    .tenant_header()
                    .map(TenantId)
                    .ok_or(TenantNotBound)?;
                ctx.bind(tenant);

                if !self.store.begin_message(&message.id) {
                    tracing::debug!(message = %message.id, "duplicate delivery, already routed");
                    return Ok(RouteOutcome::Duplicate);
                }

                let targets = expander::expand(&event);
                tracing::info!(
                    message = %message.id,
                    tenant = %tenant,
                    level = event.escalation_level,
                    targets = targets.len(),
                    "routing escalation"
                );
                self.deliver_all(ctx, message, targets).await
            }
        }
    }

    async fn route_nudge(
        &self,
        ctx: &mut TenantContext,
        message: &BusMessage,
        nudge: NudgeEvent,
    ) -> Result<RouteOutcome, RouteError> {
        if nudge.recipient_phone.trim().is_empty() {
            metrics::record_message_skipped("blank_recipient");
            tracing::warn!(message = %message.id, "nudge recipientPhone is blank, skipping");
            return Ok(RouteOutcome::Skipped(SkipReason::BlankRecipient));
        }

        let tenant = TenantId(nudge.tenant_id);
        ctx.bind(tenant);

        if !self.store.begin_message(&message.id) {
            tracing::debug!(message = %message.id, "duplicate delivery, already routed");
            return Ok(RouteOutcome::Duplicate);
        }

        // Locale selection honors the tenant's preference order; the
        // rendered content itself comes from upstream templates.
        let locale = self
            .languages
            .get(tenant)
            .and_then(|config| config.resolve_locale(nudge.language_id))
            .unwrap_or("en");

        tracing::info!(
            message = %message.id,
            tenant = %tenant,
            recipient = %nudge.recipient_phone,
            locale = %locale,
            "routing nudge"
        );

        let target = DeliveryTarget {
            recipient: nudge.recipient_phone.clone(),
            subject: format!("Scheme {} reminder", nudge.scheme_id),
            body: format!(
                "{}, please record today's reading for scheme {}.",
                nudge.operator_name, nudge.scheme_id
            ),
            channel: Channel::WhatsApp,
        };

        self.deliver_all(ctx, message, vec![target]).await
    }

    /// Create a pending record per target, then dispatch with bounded
    /// concurrency. Targets are independent; no ordering between them.
    async fn deliver_all(
        &self,
        ctx: &TenantContext,
        message: &BusMessage,
        targets: Vec<DeliveryTarget>,
    ) -> Result<RouteOutcome, RouteError> {
        let mut record_ids = Vec::with_capacity(targets.len());
        for target in &targets {
            let id = self.store.create(ctx, target)?;
            self.store.attach_to_message(&message.id, id);
            record_ids.push(id);
        }

        let statuses: Vec<NotificationStatus> = stream::iter(record_ids)
            .map(|id| self.dispatch_record(id))
            .buffer_unordered(self.fanout_limit)
            .collect()
            .await;

        let sent = statuses
            .iter()
            .filter(|s| **s == NotificationStatus::Sent)
            .count();
        let failed = statuses.len() - sent;

        Ok(RouteOutcome::Completed { sent, failed })
    }

    /// Drive one record to a terminal status: claim, attempt with timeout,
    /// retry transient failures with backoff, record the outcome.
    async fn dispatch_record(&self, record_id: Uuid) -> NotificationStatus {
        let claim = match self.store.claim(record_id) {
            Ok(claim) => claim,
            Err(e) => {
                // Another worker owns this record; abort without touching it.
                tracing::warn!(record = %record_id, error = %e, "skipping dispatch");
                return self
                    .store
                    .get(record_id)
                    .map(|r| r.status)
                    .unwrap_or(NotificationStatus::Failed);
            }
        };

        if claim.status().is_terminal() {
            return claim.status();
        }

        let record = match self.store.get(record_id) {
            Some(record) => record,
            None => return NotificationStatus::Failed,
        };

        let dispatcher = match self.registry.get(record.channel) {
            Some(dispatcher) => dispatcher,
            None => {
                tracing::error!(channel = %record.channel, "no dispatcher registered");
                let status = claim.complete(&DispatchOutcome::PermanentFailure(format!(
                    "no dispatcher registered for channel {}",
                    record.channel
                )));
                metrics::record_delivery(record.channel.as_str(), "failed");
                return status;
            }
        };

        let target = DeliveryTarget {
            recipient: record.recipient.clone(),
            subject: record.subject.clone(),
            body: record.body.clone(),
            channel: record.channel,
        };

        let mut final_outcome = DispatchOutcome::TransientFailure("no attempt made".into());

        for attempt in 1..=self.policy.max_attempts {
            let outcome =
                match tokio::time::timeout(self.policy.attempt_timeout, dispatcher.send(&target))
                    .await
                {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(malformed)) => {
                        // Contract violation, surfaced loudly; the record
                        // still reaches a terminal state.
                        tracing::error!(record = %record_id, error = %malformed, "malformed delivery target");
                        DispatchOutcome::PermanentFailure(malformed.to_string())
                    }
                    Err(_) => DispatchOutcome::TransientFailure("timeout".into()),
                };

            match outcome {
                DispatchOutcome::TransientFailure(ref reason)
                    if attempt < self.policy.max_attempts =>
                {
                    metrics::record_delivery_retry(record.channel.as_str());
                    tracing::warn!(
                        record = %record_id,
                        attempt,
                        reason = %reason,
                        "transient delivery failure, backing off"
                    );
                    tokio::time::sleep(self.policy.delay_before(attempt)).await;
                }
                outcome => {
                    final_outcome = outcome;
                    break;
                }
            }
        }

        let status = claim.complete(&final_outcome);
        match status {
            NotificationStatus::Sent => {
                metrics::record_delivery(record.channel.as_str(), "sent");
                tracing::info!(record = %record_id, channel = %record.channel, "delivery SENT");
            }
            _ => {
                metrics::record_delivery(record.channel.as_str(), "failed");
                tracing::warn!(
                    record = %record_id,
                    channel = %record.channel,
                    outcome = ?final_outcome,
                    "delivery FAILED"
                );
            }
        }
        status
    }
}
