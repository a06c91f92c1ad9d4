//! Multi-tenant notification router.
//!
//! Consumes domain events from the shared bus and drives them to delivery.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                NOTIFICATION ROUTER                │
//!                    │                                                   │
//!   Bus message      │  ┌─────────┐   ┌────────┐   ┌─────────────────┐  │
//!   ─────────────────┼─▶│   bus   │──▶│ events │──▶│     router      │  │
//!                    │  │consumer │   │ decode │   │  (tenant bind)  │  │
//!                    │  └─────────┘   └────────┘   └───────┬─────────┘  │
//!                    │                                      │            │
//!                    │                     ┌────────────────┴───┐       │
//!                    │                     ▼                    ▼       │
//!                    │             ┌──────────────┐    ┌──────────────┐ │
//!                    │             │  escalation  │    │ direct nudge │ │
//!                    │             │   expander   │    │   handling   │ │
//!                    │             └──────┬───────┘    └──────┬───────┘ │
//!                    │                    └────────┬──────────┘         │
//!                    │                             ▼                    │
//!   Channel APIs     │  ┌─────────┐   ┌──────────────────┐              │
//!   ◀────────────────┼──│dispatch │◀──│ store (PENDING → │              │
//!                    │  │ w/e/wa  │   │  SENT | FAILED)  │              │
//!                    │  └─────────┘   └──────────────────┘              │
//!                    │                                                   │
//!                    │  cross-cutting: config, tenant, resilience,       │
//!                    │                 lifecycle, observability          │
//!                    └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notify_router::bus::{self, ConsumerLoop};
use notify_router::config::loader::load_config;
use notify_router::config::RouterConfig;
use notify_router::dispatch::{
    DispatcherRegistry, EmailDispatcher, WebhookDispatcher, WhatsAppDispatcher,
};
use notify_router::lifecycle::{signals, Shutdown};
use notify_router::observability::metrics;
use notify_router::router::EventRouter;
use notify_router::store::NotificationStore;

#[derive(Debug, Parser)]
#[command(name = "notify-router", about = "Multi-tenant notification event router")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notify_router=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("notify-router v0.1.0 starting");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    tracing::info!(
        topic = %config.bus.topic,
        max_attempts = config.retry.max_attempts,
        tenants = config.tenants.len(),
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "failed to parse metrics address"
            );
        }
    }

    let client = reqwest::Client::new();
    let registry = DispatcherRegistry::new()
        .register(Arc::new(WebhookDispatcher::new(
            client.clone(),
            config.channels.webhook.clone(),
        )))
        .register(Arc::new(EmailDispatcher::new(
            client.clone(),
            config.channels.email.clone(),
        )))
        .register(Arc::new(WhatsAppDispatcher::new(
            client,
            config.channels.whatsapp.clone(),
        )));

    tracing::info!(channels = ?registry.channels(), "registered notification channels");

    let store = NotificationStore::new();
    let router = Arc::new(EventRouter::new(&config, store, registry));

    let (producer, rx) = bus::channel(&config.bus);
    let consumer = ConsumerLoop::new(router, producer, config.bus.clone());

    let shutdown = Shutdown::new();
    let consumer_shutdown = shutdown.subscribe();
    let consumer_task = tokio::spawn(async move {
        consumer.run(rx, consumer_shutdown).await;
    });

    signals::watch_signals(&shutdown).await;

    consumer_task.await?;
    tracing::info!("shutdown complete");
    Ok(())
}
