//! WhatsApp channel via the messaging provider's HTTP API.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::json;

use crate::config::schema::WhatsAppConfig;
use crate::dispatch::outcome::{
    outcome_from_status, Channel, DeliveryTarget, DispatchOutcome, MalformedTarget,
};
use crate::dispatch::registry::ChannelDispatcher;

pub struct WhatsAppDispatcher {
    client: reqwest::Client,
    config: WhatsAppConfig,
}

impl WhatsAppDispatcher {
    pub fn new(client: reqwest::Client, config: WhatsAppConfig) -> Self {
        Self { client, config }
    }
}

impl ChannelDispatcher for WhatsAppDispatcher {
    fn channel(&self) -> Channel {
        Channel::WhatsApp
    }

    fn send<'a>(
        &'a self,
        target: &'a DeliveryTarget,
    ) -> BoxFuture<'a, Result<DispatchOutcome, MalformedTarget>> {
        async move {
            if target.recipient.trim().is_empty() {
                return Err(MalformedTarget {
                    channel: Channel::WhatsApp,
                    reason: "recipient phone is blank".into(),
                });
            }

            if self.config.api_url.is_empty() {
                tracing::warn!("WhatsApp provider URL not configured, skipping delivery");
                return Ok(DispatchOutcome::PermanentFailure(
                    "whatsapp provider not configured".into(),
                ));
            }

            tracing::debug!(recipient = %target.recipient, "sending WhatsApp message");

            let payload = json!({
                "to": target.recipient,
                "subject": target.subject,
                "body": target.body,
            });

            let response = self
                .client
                .post(&self.config.api_url)
                .bearer_auth(&self.config.api_token)
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
