//! Shared utilities for integration testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use notify_router::config::schema::{LanguageConfig, TenantConfig};
use notify_router::config::RouterConfig;
use notify_router::dispatch::{
    Channel, ChannelDispatcher, DeliveryTarget, DispatchOutcome, DispatcherRegistry,
    MalformedTarget,
};

/// A dispatcher that replays a scripted sequence of outcomes.
///
/// Once the script is exhausted every further send is Delivered. Calls
/// and recipients are recorded for assertions.
pub struct ScriptedDispatcher {
    channel: Channel,
    script: Mutex<VecDeque<DispatchOutcome>>,
    calls: AtomicUsize,
    recipients: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedDispatcher {
    pub fn delivering(channel: Channel) -> Arc<Self> {
        Self::with_script(channel, vec![])
    }

    pub fn with_script(channel: Channel, script: Vec<DispatchOutcome>) -> Arc<Self> {
        Arc::new(Self {
            channel,
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
            recipients: Mutex::new(Vec::new()),
            delay: None,
        })
    }

    /// A dispatcher that stalls longer than any per-attempt timeout.
    pub fn stalling(channel: Channel, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            channel,
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            recipients: Mutex::new(Vec::new()),
            delay: Some(delay),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recipients(&self) -> Vec<String> {
        self.recipients.lock().unwrap().clone()
    }
}

impl ChannelDispatcher for ScriptedDispatcher {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn send<'a>(
        &'a self,
        target: &'a DeliveryTarget,
    ) -> BoxFuture<'a, Result<DispatchOutcome, MalformedTarget>> {
        async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.recipients.lock().unwrap().push(target.recipient.clone());

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            let outcome = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(DispatchOutcome::Delivered);
            Ok(outcome)
        }
        .boxed()
    }
}

/// Test configuration with fast retries and a known tenant.
pub fn test_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.retry.max_attempts = 3;
    config.retry.base_delay_ms = 1;
    config.retry.max_delay_ms = 5;
    config.retry.attempt_timeout_ms = 200;
    config.tenants.push(TenantConfig {
        id: 7,
        languages: vec![
            LanguageConfig { id: 1, code: "en".into(), preference: 0 },
            LanguageConfig { id: 2, code: "hi".into(), preference: 1 },
        ],
    });
    config
}

/// Registry with one scripted WhatsApp dispatcher (the default channel).
pub fn whatsapp_registry(dispatcher: Arc<ScriptedDispatcher>) -> DispatcherRegistry {
    DispatcherRegistry::new().register(dispatcher)
}

/// A well-formed nudge payload for tenant 7.
pub fn nudge_payload() -> Vec<u8> {
    br#"{
        "eventType": "NUDGE",
        "recipientPhone": "+911234",
        "operatorName": "Asha",
        "schemeId": "S1",
        "tenantId": 7,
        "languageId": 1
    }"#
    .to_vec()
}

/// A well-formed escalation payload (level 2, tiers 1-3).
pub fn escalation_payload() -> Vec<u8> {
    br#"{
        "eventType": "ESCALATION",
        "escalationLevel": 2,
        "officerPhone": "+900",
        "officerName": "DM",
        "operators": [
            { "name": "A", "phoneNumber": "+901", "tier": 1 },
            { "name": "B", "phoneNumber": "+902", "tier": 2 },
            { "name": "C", "phoneNumber": "+903", "tier": 3 }
        ]
    }"#
    .to_vec()
}
