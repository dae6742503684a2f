// Copyright (c) 2025 - Cowboy AI, Inc.
//! Equipment Notification Listener
//!
//! Subscribes to every equipment change notification published by the
//! utility network service and logs it.
//!
//! Run with: cargo run --bin equipment-notification-listener
//!
//! Prerequisites:
//! 1. NATS server running (default: localhost:4222, override with NATS_URL)
//! 2. UTILITY_NETWORK_SUBJECT_PREFIX matching the publishing service

use anyhow::{Context, Result};
use async_trait::async_trait;
use cim_utility_network::{
    events::RouteNetworkElementContainedEquipmentUpdated, subjects::subjects, InfrastructureResult,
    MessageHandler, MessageProcessor, NatsClient, UtilityNetworkConfig,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Logs each notification it receives
struct NotificationLogger {
    subject: String,
    received: AtomicU64,
}

#[async_trait]
impl MessageHandler for NotificationLogger {
    type Message = RouteNetworkElementContainedEquipmentUpdated;

    async fn handle(&self, subject: &str, message: Self::Message) -> InfrastructureResult<()> {
        let count = self.received.fetch_add(1, Ordering::Relaxed) + 1;

        info!(
            %subject,
            category = %message.category,
            application = %message.application_name,
            changed = message.changed_id_count(),
            affected_elements = message.affected_route_network_element_ids.len(),
            "📨 Equipment change notification"
        );

        for change_set in &message.id_change_sets {
            debug!(
                entity_type = %change_set.entity_type,
                change_type = ?change_set.change_type,
                ids = ?change_set.id_list,
                "  change set"
            );
        }

        if count % 100 == 0 {
            info!("📊 Notifications received: {}", count);
        }
        Ok(())
    }

    fn subject(&self) -> &str {
        &self.subject
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("🚀 Starting Equipment Notification Listener");

    let config = UtilityNetworkConfig::from_env().context("Failed to load configuration")?;
    info!("📋 Configuration loaded:");
    info!("  - NATS servers: {:?}", config.nats.servers);
    info!("  - Subject prefix: {}", config.notification_subject_prefix);

    let client = NatsClient::new(&config.nats)
        .await
        .context("Failed to connect to NATS")?;

    let logger = Arc::new(NotificationLogger {
        subject: subjects::all_notifications(&config.notification_subject_prefix),
        received: AtomicU64::new(0),
    });

    info!("🎧 Listening on {}", logger.subject());
    let processor = MessageProcessor::new(client);
    let task = processor
        .run_handler(logger.clone())
        .await
        .context("Failed to subscribe to notifications")?;

    tokio::select! {
        result = task => {
            if let Err(e) = result {
                warn!("Listener task ended abnormally: {}", e);
            } else {
                warn!("Notification subscription closed");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Shutting down");
        }
    }

    info!(
        "✅ Received {} notifications",
        logger.received.load(Ordering::Relaxed)
    );
    Ok(())
}
