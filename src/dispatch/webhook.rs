//! Webhook (push notification) channel.
//!
//! Sends an HTTP POST to the target URL (or the configured default) with
//! the notification payload as JSON and a shared secret header.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::json;

use crate::config::schema::WebhookConfig;
use crate::dispatch::outcome::{
    outcome_from_status, Channel, DeliveryTarget, DispatchOutcome, MalformedTarget,
};
use crate::dispatch::registry::ChannelDispatcher;

const SECRET_HEADER: &str = "X-Webhook-Secret";

pub struct WebhookDispatcher {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookDispatcher {
    pub fn new(client: reqwest::Client, config: WebhookConfig) -> Self {
        Self { client, config }
    }

    /// The endpoint for a target: its own recipient URL wins, otherwise the
    /// configured default.
    fn target_url<'a>(&'a self, target: &'a DeliveryTarget) -> Option<&'a str> {
        if !target.recipient.trim().is_empty() {
            Some(target.recipient.as_str())
        } else if !self.config.default_url.is_empty() {
            Some(self.config.default_url.as_str())
        } else {
            None
        }
    }
}

impl ChannelDispatcher for WebhookDispatcher {
    fn channel(&self) -> Channel {
        Channel::Webhook
    }

    fn send<'a>(
        &'a self,
        target: &'a DeliveryTarget,
    ) -> BoxFuture<'a, Result<DispatchOutcome, MalformedTarget>> {
        async move {
            let url = match self.target_url(target) {
                Some(url) => url,
                None => {
                    tracing::warn!("no webhook URL on target and none configured, skipping");
                    return Ok(DispatchOutcome::PermanentFailure(
                        "no webhook url configured".into(),
                    ));
                }
            };

            if url::Url::parse(url).is_err() {
                return Err(MalformedTarget {
                    channel: Channel::Webhook,
                    reason: format!("invalid webhook URL '{}'", url),
                });
            }

            tracing::debug!(url = %url, "sending webhook notification");

            let payload = json!({
                "subject": target.subject,
                "body": target.body,
            });

            let response = self
                .client
                .post(url)
                .header(SECRET_HEADER, &self.config.secret)
                .json(&payload)
                .send()
                .await;

            match response {
                Ok(response) => Ok(outcome_from_status(response.status().as_u16())),
                Err(e) => Ok(DispatchOutcome::TransientFailure(e.to_string())),
            }
        }
        .boxed()
    }
}
