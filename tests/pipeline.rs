//! End-to-end tests for the notification routing pipeline.

use std::sync::Arc;
use std::time::Duration;

use notify_router::bus::{self, BusMessage, ConsumerLoop, TENANT_HEADER};
use notify_router::dispatch::{Channel, DispatchOutcome};
use notify_router::lifecycle::Shutdown;
use notify_router::router::{EventRouter, RouteError, RouteOutcome, SkipReason};
use notify_router::store::{NotificationStatus, NotificationStore};
use notify_router::tenant::{TenantContext, TenantId};

mod common;

use common::{escalation_payload, nudge_payload, test_config, whatsapp_registry, ScriptedDispatcher};

fn router_with(dispatcher: Arc<ScriptedDispatcher>) -> EventRouter {
    EventRouter::new(
        &test_config(),
        NotificationStore::new(),
        whatsapp_registry(dispatcher),
    )
}

#[tokio::test]
async fn test_nudge_delivered_end_to_end() {
    let dispatcher = ScriptedDispatcher::delivering(Channel::WhatsApp);
    let router = router_with(dispatcher.clone());
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", nudge_payload());
    let outcome = router.route(&mut ctx, &message).await.unwrap();

    assert_eq!(outcome, RouteOutcome::Completed { sent: 1, failed: 0 });
    assert!(!ctx.is_bound(), "context must be cleared after route()");

    let records = router.store().records_for_message("m1");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.status, NotificationStatus::Sent);
    assert_eq!(record.channel, Channel::WhatsApp);
    assert_eq!(record.recipient, "+911234");
    assert_eq!(record.tenant_id, TenantId(7));
    assert!(record.sent_at.is_some());
}

#[tokio::test]
async fn test_escalation_expands_and_excludes_higher_tiers() {
    let dispatcher = ScriptedDispatcher::delivering(Channel::WhatsApp);
    let router = router_with(dispatcher.clone());
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", escalation_payload()).with_header(TENANT_HEADER, "7");
    let outcome = router.route(&mut ctx, &message).await.unwrap();

    assert_eq!(outcome, RouteOutcome::Completed { sent: 3, failed: 0 });

    let mut recipients = dispatcher.recipients();
    recipients.sort();
    assert_eq!(recipients, vec!["+900", "+901", "+902"]);

    let records = router.store().records_for_message("m1");
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.status == NotificationStatus::Sent));
    assert!(records.iter().all(|r| r.subject == "Escalation Level 2"));
}

#[tokio::test]
async fn test_escalation_without_tenant_header_is_retryable() {
    let dispatcher = ScriptedDispatcher::delivering(Channel::WhatsApp);
    let router = router_with(dispatcher.clone());
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", escalation_payload());
    let err = router.route(&mut ctx, &message).await.unwrap_err();

    assert!(matches!(err, RouteError::TenantNotBound(_)));
    assert!(err.is_retryable());
    assert!(!ctx.is_bound(), "context must be cleared on error paths");
    assert_eq!(dispatcher.call_count(), 0);
    assert!(router.store().records_for_message("m1").is_empty());
}

#[tokio::test]
async fn test_transient_failures_exhaust_retry_budget() {
    let dispatcher = ScriptedDispatcher::with_script(
        Channel::WhatsApp,
        vec![
            DispatchOutcome::TransientFailure("503".into()),
            DispatchOutcome::TransientFailure("503".into()),
            DispatchOutcome::TransientFailure("503".into()),
        ],
    );
    let router = router_with(dispatcher.clone());
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", nudge_payload());
    let outcome = router.route(&mut ctx, &message).await.unwrap();

    // Routing succeeded; delivery did not.
    assert_eq!(outcome, RouteOutcome::Completed { sent: 0, failed: 1 });
    assert_eq!(dispatcher.call_count(), 3, "no fourth attempt after exhaustion");

    let record = &router.store().records_for_message("m1")[0];
    assert_eq!(record.status, NotificationStatus::Failed);
    assert!(record.sent_at.is_none());
}

#[tokio::test]
async fn test_permanent_failure_fails_immediately() {
    let dispatcher = ScriptedDispatcher::with_script(
        Channel::WhatsApp,
        vec![DispatchOutcome::PermanentFailure("rejected".into())],
    );
    let router = router_with(dispatcher.clone());
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", nudge_payload());
    let outcome = router.route(&mut ctx, &message).await.unwrap();

    assert_eq!(outcome, RouteOutcome::Completed { sent: 0, failed: 1 });
    assert_eq!(dispatcher.call_count(), 1, "permanent failures are not retried");
}

#[tokio::test]
async fn test_attempt_timeout_counts_as_transient() {
    let dispatcher = ScriptedDispatcher::stalling(Channel::WhatsApp, Duration::from_secs(5));
    let router = router_with(dispatcher.clone());
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", nudge_payload());
    let outcome = router.route(&mut ctx, &message).await.unwrap();

    assert_eq!(outcome, RouteOutcome::Completed { sent: 0, failed: 1 });
    assert_eq!(dispatcher.call_count(), 3, "timeouts consume the retry budget");
}

#[tokio::test]
async fn test_unknown_event_type_is_skipped() {
    let dispatcher = ScriptedDispatcher::delivering(Channel::WhatsApp);
    let router = router_with(dispatcher.clone());
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", br#"{ "eventType": "PROVISIONED" }"#.to_vec());
    let outcome = router.route(&mut ctx, &message).await.unwrap();

    assert_eq!(
        outcome,
        RouteOutcome::Skipped(SkipReason::UnknownEventType("PROVISIONED".into()))
    );
    assert_eq!(dispatcher.call_count(), 0);
    assert!(router.store().records_for_message("m1").is_empty());
}

#[tokio::test]
async fn test_malformed_payload_is_a_decode_error() {
    let dispatcher = ScriptedDispatcher::delivering(Channel::WhatsApp);
    let router = router_with(dispatcher);
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", b"{ not json".to_vec());
    let err = router.route(&mut ctx, &message).await.unwrap_err();

    assert!(matches!(err, RouteError::Deserialization(_)));
    assert!(!err.is_retryable());
    assert!(!ctx.is_bound());
}

#[tokio::test]
async fn test_duplicate_delivery_is_idempotent() {
    let dispatcher = ScriptedDispatcher::delivering(Channel::WhatsApp);
    let router = router_with(dispatcher.clone());
    let mut ctx = TenantContext::new();

    let message = BusMessage::new("m1", nudge_payload());
    let first = router.route(&mut ctx, &message).await.unwrap();
    assert_eq!(first, RouteOutcome::Completed { sent: 1, failed: 0 });

    // Simulated at-least-once redelivery of the same message.
    let second = router.route(&mut ctx, &message.clone().redelivered()).await.unwrap();
    assert_eq!(second, RouteOutcome::Duplicate);

    let records = router.store().records_for_message("m1");
    let sent = records
        .iter()
        .filter(|r| r.status == NotificationStatus::Sent)
        .count();
    assert_eq!(sent, 1, "never two SENT records for one delivery intent");
    assert_eq!(dispatcher.call_count(), 1);
}

#[tokio::test]
async fn test_concurrent_units_of_work_keep_tenants_isolated() {
    let dispatcher = ScriptedDispatcher::delivering(Channel::WhatsApp);
    let router = Arc::new(router_with(dispatcher));

    let mut handles = Vec::new();
    for tenant in [1u32, 2, 3, 4] {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            let payload = format!(
                r#"{{
                    "eventType": "NUDGE",
                    "recipientPhone": "+91{tenant}",
                    "tenantId": {tenant}
                }}"#
            );
            let message = BusMessage::new(format!("m-{tenant}"), payload.into_bytes());
            let mut ctx = TenantContext::new();
            let outcome = router.route(&mut ctx, &message).await.unwrap();
            assert!(!ctx.is_bound());
            (tenant, outcome)
        }));
    }

    for handle in handles {
        let (tenant, outcome) = handle.await.unwrap();
        assert_eq!(outcome, RouteOutcome::Completed { sent: 1, failed: 0 });
        let records = router.store().records_for_message(&format!("m-{tenant}"));
        assert_eq!(records[0].tenant_id, TenantId(tenant));
    }
}

#[tokio::test]
async fn test_consumer_drains_on_shutdown() {
    let dispatcher = ScriptedDispatcher::delivering(Channel::WhatsApp);
    let config = test_config();
    let router = Arc::new(EventRouter::new(
        &config,
        NotificationStore::new(),
        whatsapp_registry(dispatcher.clone()),
    ));

    let (producer, rx) = bus::channel(&config.bus);
    let consumer = ConsumerLoop::new(router.clone(), producer.clone(), config.bus.clone());

    let shutdown = Shutdown::new();
    let consumer_shutdown = shutdown.subscribe();
    let consumer_task = tokio::spawn(async move {
        consumer.run(rx, consumer_shutdown).await;
    });

    assert!(producer.publish(BusMessage::new("m1", nudge_payload())).await);
    tokio::time::sleep(Duration::from_millis(200)).await;

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), consumer_task)
        .await
        .expect("consumer must drain promptly")
        .unwrap();

    let records = router.store().records_for_message("m1");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, NotificationStatus::Sent);
}
