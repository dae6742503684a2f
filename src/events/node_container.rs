// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Container Domain Events

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventHeader;
use crate::domain::{NodeContainer, Rack, SubrackMount};

/// Node Container Domain Events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeContainerEvent {
    /// Container was placed at a route node
    PlacedInRouteNetwork(NodeContainerPlacedInRouteNetwork),

    /// Rack was added
    RackAdded(NodeContainerRackAdded),

    /// Terminal equipment was placed directly in the container
    TerminalEquipmentAdded(NodeContainerTerminalEquipmentAdded),

    /// Terminal equipment was mounted in a rack
    TerminalEquipmentMountedInRack(NodeContainerTerminalEquipmentMountedInRack),

    /// Container deleted
    Removed(NodeContainerRemoved),
}

impl NodeContainerEvent {
    pub fn header(&self) -> &EventHeader {
        use NodeContainerEvent::*;

        match self {
            PlacedInRouteNetwork(e) => &e.header,
            RackAdded(e) => &e.header,
            TerminalEquipmentAdded(e) => &e.header,
            TerminalEquipmentMountedInRack(e) => &e.header,
            Removed(e) => &e.header,
        }
    }

    pub fn event_type_name(&self) -> &'static str {
        use NodeContainerEvent::*;

        match self {
            PlacedInRouteNetwork(_) => "NodeContainerPlacedInRouteNetwork",
            RackAdded(_) => "NodeContainerRackAdded",
            TerminalEquipmentAdded(_) => "NodeContainerTerminalEquipmentAdded",
            TerminalEquipmentMountedInRack(_) => "NodeContainerTerminalEquipmentMountedInRack",
            Removed(_) => "NodeContainerRemoved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerPlacedInRouteNetwork {
    #[serde(flatten)]
    pub header: EventHeader,
    pub container: NodeContainer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerRackAdded {
    #[serde(flatten)]
    pub header: EventHeader,
    pub rack: Rack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerTerminalEquipmentAdded {
    #[serde(flatten)]
    pub header: EventHeader,
    pub terminal_equipment_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerTerminalEquipmentMountedInRack {
    #[serde(flatten)]
    pub header: EventHeader,
    pub rack_id: Uuid,
    pub mount: SubrackMount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerRemoved {
    #[serde(flatten)]
    pub header: EventHeader,
}
