// Copyright (c) 2025 - Cowboy AI, Inc.
//! Outbound Change Notification
//!
//! After every successful command one [`RouteNetworkElementContainedEquipmentUpdated`]
//! is published so that other bounded contexts (map tiles, search, route
//! network caches) can refresh whatever touches the affected elements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of change applied to a set of entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeTypeEnum {
    Addition,
    Modification,
    Deletion,
}

/// Entity ids of one type that changed in the same way
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdChangeSet {
    pub entity_type: String,
    pub change_type: ChangeTypeEnum,
    pub id_list: Vec<Uuid>,
}

impl IdChangeSet {
    pub fn new(entity_type: impl Into<String>, change_type: ChangeTypeEnum, id_list: Vec<Uuid>) -> Self {
        Self {
            entity_type: entity_type.into(),
            change_type,
            id_list,
        }
    }
}

/// Notification published after a successful mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNetworkElementContainedEquipmentUpdated {
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub application_name: String,
    /// Operation tag, e.g. `EquipmentConnectivityModification.Cut`
    pub category: String,
    pub id_change_sets: Vec<IdChangeSet>,
    pub affected_route_network_element_ids: Vec<Uuid>,
}

impl RouteNetworkElementContainedEquipmentUpdated {
    /// Total number of entity ids mentioned
    pub fn changed_id_count(&self) -> usize {
        self.id_change_sets.iter().map(|s| s.id_list.len()).sum()
    }
}
