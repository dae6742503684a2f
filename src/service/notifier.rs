// Copyright (c) 2025 - Cowboy AI, Inc.
//! Equipment change notification
//!
//! After a command has been committed the service describes what changed
//! as an [`EquipmentChange`] and hands the resulting
//! [`RouteNetworkElementContainedEquipmentUpdated`] to an
//! [`EquipmentChangeNotifier`]. Notification is not part of the
//! consistency boundary: the service only logs a failed publish.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::errors::InfrastructureResult;
use crate::events::{ChangeTypeEnum, IdChangeSet, RouteNetworkElementContainedEquipmentUpdated};
use crate::nats::NatsClient;
use crate::subjects::subjects;

/// Category tags carried by notifications
pub mod categories {
    pub const PLACED: &str = "EquipmentModification.Placed";
    pub const AFFIXED_TO_CONTAINER: &str = "EquipmentModification.AffixedToContainer";
    pub const DETACHED_FROM_CONTAINER: &str = "EquipmentModification.DetachedFromContainer";
    pub const AFFIXED_TO_PARENT: &str = "EquipmentModification.AffixedToParent";
    pub const DETACHED_FROM_PARENT: &str = "EquipmentModification.DetachedFromParent";
    pub const MOVED: &str = "EquipmentModification.Moved";
    pub const MERGE: &str = "EquipmentModification.Merge";
    pub const STRUCTURES_ADDED: &str = "EquipmentModification.StructuresAdded";
    pub const STRUCTURE_REMOVED: &str = "EquipmentModification.StructureRemoved";
    pub const SPECIFICATION_CHANGED: &str = "EquipmentModification.SpecificationChanged";
    pub const PROPERTIES_UPDATED: &str = "EquipmentModification.PropertiesUpdated";
    pub const CONNECT: &str = "EquipmentConnectivityModification.Connect";
    pub const DISCONNECT: &str = "EquipmentConnectivityModification.Disconnect";
    pub const CUT: &str = "EquipmentConnectivityModification.Cut";
    pub const REVERT_CUT: &str = "EquipmentConnectivityModification.RevertCut";
    pub const DELETION: &str = "EquipmentDeletion";
    pub const NODE_CONTAINER_PLACED: &str = "NodeContainerModification.Placed";
    pub const RACK_ADDED: &str = "NodeContainerModification.RackAdded";
    pub const NODE_CONTAINER_REMOVED: &str = "NodeContainerModification.Removed";
    pub const TERMINAL_EQUIPMENT_PLACED: &str = "TerminalEquipmentModification.Placed";
    pub const TERMINAL_STRUCTURES_ADDED: &str = "TerminalEquipmentModification.StructuresAdded";
    pub const TERMINAL_STRUCTURE_REMOVED: &str = "TerminalEquipmentModification.StructureRemoved";
    pub const TERMINAL_EQUIPMENT_PROPERTIES_UPDATED: &str = "TerminalEquipmentModification.PropertiesUpdated";
    pub const SPECIFICATION_ADDED: &str = "SpecificationModification.Added";
}

/// Entity type names used in id change sets
pub mod entity_types {
    pub const SPAN_EQUIPMENT: &str = "SpanEquipment";
    pub const NODE_CONTAINER: &str = "NodeContainer";
    pub const TERMINAL_EQUIPMENT: &str = "TerminalEquipment";
    pub const SPECIFICATION: &str = "Specification";
}

/// What one committed command changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentChange {
    category: &'static str,
    id_change_sets: Vec<IdChangeSet>,
    affected_route_network_element_ids: Vec<Uuid>,
}

impl EquipmentChange {
    pub fn new(category: &'static str) -> Self {
        Self {
            category,
            id_change_sets: Vec::new(),
            affected_route_network_element_ids: Vec::new(),
        }
    }

    pub fn category(&self) -> &'static str {
        self.category
    }

    pub fn added(self, entity_type: &str, ids: Vec<Uuid>) -> Self {
        self.with_change(entity_type, ChangeTypeEnum::Addition, ids)
    }

    pub fn modified(self, entity_type: &str, ids: Vec<Uuid>) -> Self {
        self.with_change(entity_type, ChangeTypeEnum::Modification, ids)
    }

    pub fn deleted(self, entity_type: &str, ids: Vec<Uuid>) -> Self {
        self.with_change(entity_type, ChangeTypeEnum::Deletion, ids)
    }

    fn with_change(mut self, entity_type: &str, change_type: ChangeTypeEnum, ids: Vec<Uuid>) -> Self {
        if !ids.is_empty() {
            self.id_change_sets.push(IdChangeSet::new(entity_type, change_type, ids));
        }
        self
    }

    /// Route network elements whose contained equipment changed
    pub fn affecting(mut self, element_ids: impl IntoIterator<Item = Uuid>) -> Self {
        for id in element_ids {
            if !self.affected_route_network_element_ids.contains(&id) {
                self.affected_route_network_element_ids.push(id);
            }
        }
        self
    }

    pub fn into_notification(
        self,
        application_name: &str,
        timestamp: DateTime<Utc>,
    ) -> RouteNetworkElementContainedEquipmentUpdated {
        RouteNetworkElementContainedEquipmentUpdated {
            event_id: Uuid::now_v7(),
            timestamp,
            application_name: application_name.to_string(),
            category: self.category.to_string(),
            id_change_sets: self.id_change_sets,
            affected_route_network_element_ids: self.affected_route_network_element_ids,
        }
    }
}

/// Outbound channel for change notifications
#[async_trait]
pub trait EquipmentChangeNotifier: Send + Sync {
    async fn notify(&self, notification: &RouteNetworkElementContainedEquipmentUpdated) -> InfrastructureResult<()>;
}

/// Publishes notifications on NATS, one subject per category
#[derive(Clone)]
pub struct NatsEquipmentNotifier {
    client: NatsClient,
    subject_prefix: String,
}

impl NatsEquipmentNotifier {
    pub fn new(client: NatsClient, subject_prefix: impl Into<String>) -> Self {
        Self {
            client,
            subject_prefix: subject_prefix.into(),
        }
    }
}

#[async_trait]
impl EquipmentChangeNotifier for NatsEquipmentNotifier {
    async fn notify(&self, notification: &RouteNetworkElementContainedEquipmentUpdated) -> InfrastructureResult<()> {
        let subject = subjects::notification(&self.subject_prefix, &notification.category);
        self.client.publish_notification(&subject, notification).await?;

        debug!(
            %subject,
            changed = notification.changed_id_count(),
            "Published equipment change notification"
        );
        Ok(())
    }
}

/// Keeps notifications in memory, for tests and embedded use
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    published: Mutex<Vec<RouteNetworkElementContainedEquipmentUpdated>>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications in publish order
    pub async fn published(&self) -> Vec<RouteNetworkElementContainedEquipmentUpdated> {
        self.published.lock().await.clone()
    }

    pub async fn last(&self) -> Option<RouteNetworkElementContainedEquipmentUpdated> {
        self.published.lock().await.last().cloned()
    }
}

#[async_trait]
impl EquipmentChangeNotifier for InMemoryNotifier {
    async fn notify(&self, notification: &RouteNetworkElementContainedEquipmentUpdated) -> InfrastructureResult<()> {
        self.published.lock().await.push(notification.clone());
        Ok(())
    }
}
