//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the notification router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Bus consumer settings.
    pub bus: BusConfig,

    /// Retry and timeout policy for delivery attempts.
    pub retry: RetryConfig,

    /// Fan-out settings for multi-target events.
    pub fanout: FanoutConfig,

    /// Per-channel transport settings.
    pub channels: ChannelsConfig,

    /// Tenant definitions (language preferences).
    pub tenants: Vec<TenantConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Bus consumer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BusConfig {
    /// Topic the router consumes from.
    pub topic: String,

    /// Consumer group identifier, for logging.
    pub group_id: String,

    /// In-flight buffer between the bus adapter and the workers.
    pub buffer_size: usize,

    /// Maximum bus redeliveries of one message before it is dropped.
    pub max_redeliveries: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            topic: "common-topic".to_string(),
            group_id: "notify-router".to_string(),
            buffer_size: 256,
            max_redeliveries: 5,
        }
    }
}

/// Retry policy for transient dispatch failures.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum delivery attempts per record (first attempt included).
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,

    /// Per-attempt transport timeout in milliseconds.
    pub attempt_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 5_000,
            attempt_timeout_ms: 10_000,
        }
    }
}

/// Fan-out configuration for escalation events.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FanoutConfig {
    /// Maximum concurrent dispatches within one event.
    pub max_concurrency: usize,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self { max_concurrency: 8 }
    }
}

/// Transport settings for all delivery channels.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChannelsConfig {
    pub webhook: WebhookConfig,
    pub email: EmailConfig,
    pub whatsapp: WhatsAppConfig,
}

/// Webhook (push notification) channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WebhookConfig {
    /// Default endpoint used when a target carries no URL of its own.
    pub default_url: String,

    /// Shared secret sent in the `X-Webhook-Secret` header.
    pub secret: String,
}

/// Email channel configuration (SendGrid v3 mail-send API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SendGrid API key; delivery is skipped when empty.
    pub api_key: String,

    /// Sender address.
    pub from_address: String,

    /// Sender display name.
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            from_address: "noreply@example.com".to_string(),
            from_name: "Water Management Platform".to_string(),
        }
    }
}

/// WhatsApp provider API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Provider endpoint for template message sends.
    pub api_url: String,

    /// Bearer token for the provider API.
    pub api_token: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_token: String::new(),
        }
    }
}

/// Per-tenant configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TenantConfig {
    /// Tenant identifier (partition key).
    pub id: u32,

    /// Ordered language preferences for template rendering.
    #[serde(default)]
    pub languages: Vec<LanguageConfig>,
}

/// One language entry in a tenant's preference list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LanguageConfig {
    /// Language identifier as used by upstream events.
    pub id: u32,

    /// Locale code handed to template rendering (e.g. "en", "hi").
    pub code: String,

    /// Preference rank (lower = preferred).
    #[serde(default)]
    pub preference: u32,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
