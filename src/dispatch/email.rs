//! Email channel powered by SendGrid.
//!
//! Uses the SendGrid v3 Mail Send API. Delivery is a permanent failure
//! when no API key is configured; retrying cannot fix configuration.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::json;

use crate::config::schema::EmailConfig;
use crate::dispatch::outcome::{
    outcome_from_status, Channel, DeliveryTarget, DispatchOutcome, MalformedTarget,
};
use crate::dispatch::registry::ChannelDispatcher;

const SENDGRID_API_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct EmailDispatcher {
    client: reqwest::Client,
    config: EmailConfig,
}

impl EmailDispatcher {
    pub fn new(client: reqwest::Client, config: EmailConfig) -> Self {
        Self { client, config }
    }
}

impl ChannelDispatcher for EmailDispatcher {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn send<'a>(
        &'a self,
        target: &'a DeliveryTarget,
    ) -> BoxFuture<'a, Result<DispatchOutcome, MalformedTarget>> {
        async move {
            if target.recipient.trim().is_empty() {
                return Err(MalformedTarget {
                    channel: Channel::Email,
                    reason: "recipient address is blank".into(),
                });
            }

            if self.config.api_key.is_empty() {
                tracing::warn!("SendGrid API key not configured, skipping email delivery");
                return Ok(DispatchOutcome::PermanentFailure(
                    "sendgrid api key not configured".into(),
                ));
            }

            tracing::debug!(recipient = %target.recipient, "sending email via SendGrid");

            let payload = json!({
                "personalizations": [
                    { "to": [ { "email": target.recipient } ] }
                ],
                "from": {
                    "email": self.config.from_address,
                    "name": self.config.from_name,
                },
                "subject": if target.subject.is_empty() { "(no subject)" } else { target.subject.as_str() },
                "content": [
                    { "type": "text/plain", "value": target.body }
                ],
            });

            let response = self
                .client
                .post(SENDGRID_API_URL)
                .bearer_auth(&self.config.api_key)
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
