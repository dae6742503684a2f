// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS client abstraction for equipment change notifications
//!
//! Notifications go out as JSON with headers carrying the event id,
//! category and publishing application, so subscribers can filter or
//! deduplicate without decoding the payload.

use async_nats::{Client, ConnectOptions, HeaderMap, Subscriber};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::NatsConfig;
use crate::errors::{InfrastructureError, InfrastructureResult};
use crate::events::RouteNetworkElementContainedEquipmentUpdated;

/// Header names set on every published notification
pub mod headers {
    /// JetStream-compatible deduplication id
    pub const MSG_ID: &str = "Nats-Msg-Id";
    pub const CATEGORY: &str = "Cim-Category";
    pub const APPLICATION: &str = "Cim-Application";
}

/// NATS connection used by the notifier and the notification listener
#[derive(Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect with the given configuration
    pub async fn new(config: &NatsConfig) -> InfrastructureResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&config.name)
            .connection_timeout(config.connect_timeout)
            .request_timeout(Some(config.request_timeout));

        let client = async_nats::connect_with_options(config.servers.join(","), connect_options)
            .await
            .map_err(|e| InfrastructureError::NatsConnection(e.to_string()))?;

        info!(servers = ?config.servers, name = %config.name, "Connected to NATS");

        Ok(Self { client })
    }

    /// Publish a notification with its identifying headers
    pub async fn publish_notification(
        &self,
        subject: &str,
        notification: &RouteNetworkElementContainedEquipmentUpdated,
    ) -> InfrastructureResult<()> {
        let payload = serde_json::to_vec(notification)?;

        let mut header_map = HeaderMap::new();
        header_map.insert(headers::MSG_ID, notification.event_id.to_string().as_str());
        header_map.insert(headers::CATEGORY, notification.category.as_str());
        header_map.insert(headers::APPLICATION, notification.application_name.as_str());

        self.client
            .publish_with_headers(subject.to_string(), header_map, payload.into())
            .await
            .map_err(|e| InfrastructureError::NatsPublish(e.to_string()))?;

        debug!(%subject, event_id = %notification.event_id, "Published notification");
        Ok(())
    }

    pub async fn subscribe(&self, subject: &str) -> InfrastructureResult<Subscriber> {
        let subscriber = self
            .client
            .subscribe(subject.to_string())
            .await
            .map_err(|e| InfrastructureError::NatsSubscribe(e.to_string()))?;

        info!(%subject, "Subscribed");
        Ok(subscriber)
    }
}

/// Handles decoded messages from one subscription
#[async_trait::async_trait]
pub trait MessageHandler: Send + Sync {
    type Message: DeserializeOwned + Send;

    /// Handle a message received on `subject`
    async fn handle(&self, subject: &str, message: Self::Message) -> InfrastructureResult<()>;

    /// Subject (possibly a wildcard) to subscribe to
    fn subject(&self) -> &str;
}

/// Runs a handler over a subscription on a background task
pub struct MessageProcessor {
    client: NatsClient,
}

impl MessageProcessor {
    pub fn new(client: NatsClient) -> Self {
        Self { client }
    }

    /// Subscribe and feed every message to `handler`
    ///
    /// Undecodable payloads and handler failures are logged and skipped.
    /// The returned task ends when the subscription closes.
    pub async fn run_handler<H>(&self, handler: Arc<H>) -> InfrastructureResult<JoinHandle<()>>
    where
        H: MessageHandler + 'static,
    {
        let subject = handler.subject().to_string();
        let mut subscriber = self.client.subscribe(&subject).await?;

        let task = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let message_id = msg
                    .headers
                    .as_ref()
                    .and_then(|h| h.get(headers::MSG_ID))
                    .map(|v| v.to_string());

                let message = match serde_json::from_slice::<H::Message>(&msg.payload) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!(subject = %msg.subject, ?message_id, error = %e, "Skipping undecodable message");
                        continue;
                    }
                };

                if let Err(e) = handler.handle(msg.subject.as_str(), message).await {
                    warn!(subject = %msg.subject, ?message_id, error = %e, "Handler failed");
                }
            }
            debug!(%subject, "Subscription closed");
        });

        Ok(task)
    }
}
