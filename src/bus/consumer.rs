//! Bus consumer loop.
//!
//! # Responsibilities
//! - Pull messages from the bus adapter and hand them to the router
//! - Republish messages that failed with retryable errors (bounded)
//! - Drain in-flight work on shutdown
//!
//! # Design Decisions
//! - One unit of work per message, each with its own TenantContext
//! - Malformed messages are dropped, never redelivered
//! - Graceful drain: the loop stops accepting on shutdown and awaits
//!   in-flight routing before returning

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;

use crate::bus::message::BusMessage;
use crate::config::schema::BusConfig;
use crate::observability::metrics;
use crate::router::{EventRouter, RouteError};
use crate::tenant::context::TenantContext;

/// Producer handle onto the bus, used for redelivery.
///
/// Stands in for the external bus's own retry mechanism; the contract is
/// publish-only and intentionally narrow.
#[derive(Clone)]
pub struct BusProducer {
    tx: mpsc::Sender<BusMessage>,
}

impl BusProducer {
    pub async fn publish(&self, message: BusMessage) -> bool {
        self.tx.send(message).await.is_ok()
    }
}

/// Create a connected producer/consumer pair for one topic.
pub fn channel(config: &BusConfig) -> (BusProducer, mpsc::Receiver<BusMessage>) {
    let (tx, rx) = mpsc::channel(config.buffer_size);
    (BusProducer { tx }, rx)
}

/// Consumes bus messages and drives the router.
pub struct ConsumerLoop {
    router: Arc<EventRouter>,
    producer: BusProducer,
    config: BusConfig,
}

impl ConsumerLoop {
    pub fn new(router: Arc<EventRouter>, producer: BusProducer, config: BusConfig) -> Self {
        Self {
            router,
            producer,
            config,
        }
    }

    /// Run until the bus closes or shutdown is signalled, then drain.
    pub async fn run(
        self,
        mut rx: mpsc::Receiver<BusMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!(
            topic = %self.config.topic,
            group = %self.config.group_id,
            "bus consumer starting"
        );

        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                message = rx.recv() => {
                    match message {
                        Some(message) => {
                            let router = self.router.clone();
                            let producer = self.producer.clone();
                            let max_redeliveries = self.config.max_redeliveries;
                            in_flight.spawn(async move {
                                handle_message(router, producer, message, max_redeliveries).await;
                            });
                        }
                        None => {
                            tracing::info!("bus channel closed, draining consumer");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("consumer received shutdown signal, draining");
                    break;
                }
            }
        }

        // Graceful drain: in-flight units of work finish or time out on
        // their own per-attempt deadlines.
        while in_flight.join_next().await.is_some() {}

        tracing::info!("bus consumer drained");
    }
}

async fn handle_message(
    router: Arc<EventRouter>,
    producer: BusProducer,
    message: BusMessage,
    max_redeliveries: u32,
) {
    let message_id = message.id.clone();
    let mut ctx = TenantContext::new();

    match router.route(&mut ctx, &message).await {
        Ok(outcome) => {
            tracing::debug!(message = %message_id, outcome = ?outcome, "message routed");
        }
        Err(RouteError::Deserialization(e)) => {
            // Malformed payloads never become well-formed; drop them.
            metrics::record_message_dropped("malformed");
            tracing::error!(message = %message_id, error = %e, "dropping malformed message");
        }
        Err(e) => {
            // Retryable: tenant metadata was missing from the envelope.
            if message.redelivery_count() < max_redeliveries {
                let redelivered = message.redelivered();
                tracing::warn!(
                    message = %message_id,
                    error = %e,
                    attempt = redelivered.redelivery_count(),
                    "routing failed, republishing for redelivery"
                );
                if !producer.publish(redelivered).await {
                    metrics::record_message_dropped("bus_closed");
                    tracing::error!(message = %message_id, "bus closed, message lost");
                }
            } else {
                metrics::record_message_dropped("redeliveries_exhausted");
                tracing::error!(
                    message = %message_id,
                    error = %e,
                    "redelivery budget exhausted, dropping message"
                );
            }
        }
    }
}
