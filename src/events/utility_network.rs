// Copyright (c) 2025 - Cowboy AI, Inc.
//! Utility Network Event Envelope
//!
//! Top-level event envelope for all aggregates of the utility network.
//! The event store and the projection only ever see this type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::node_container::NodeContainerEvent;
use super::span_equipment::SpanEquipmentEvent;
use super::specification::SpecificationEvent;
use super::terminal_equipment::TerminalEquipmentEvent;
use super::EventHeader;

/// Utility Network Domain Events
///
/// Polymorphic envelope; each variant holds the events of one aggregate type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "aggregate_type", content = "event", rename_all = "snake_case")]
pub enum UtilityNetworkEvent {
    /// Events from the SpanEquipment aggregate
    SpanEquipment(SpanEquipmentEvent),

    /// Events from the NodeContainer aggregate
    NodeContainer(NodeContainerEvent),

    /// Events from the TerminalEquipment aggregate
    TerminalEquipment(TerminalEquipmentEvent),

    /// Events from the specification catalogue
    Specification(SpecificationEvent),
}

impl UtilityNetworkEvent {
    pub fn header(&self) -> &EventHeader {
        match self {
            UtilityNetworkEvent::SpanEquipment(e) => e.header(),
            UtilityNetworkEvent::NodeContainer(e) => e.header(),
            UtilityNetworkEvent::TerminalEquipment(e) => e.header(),
            UtilityNetworkEvent::Specification(e) => e.header(),
        }
    }

    /// Extract aggregate ID from any event type
    pub fn aggregate_id(&self) -> Uuid {
        self.header().aggregate_id
    }

    pub fn event_id(&self) -> Uuid {
        self.header().event_id
    }

    /// Extract event timestamp from any event type
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.header().timestamp
    }

    /// Extract correlation ID from any event type
    pub fn correlation_id(&self) -> Uuid {
        self.header().correlation_id
    }

    /// Extract causation ID from any event type
    pub fn causation_id(&self) -> Option<Uuid> {
        self.header().causation_id
    }

    pub fn event_version(&self) -> u32 {
        self.header().event_version
    }

    /// Get human-readable event type name
    pub fn event_type_name(&self) -> &'static str {
        match self {
            UtilityNetworkEvent::SpanEquipment(e) => e.event_type_name(),
            UtilityNetworkEvent::NodeContainer(e) => e.event_type_name(),
            UtilityNetworkEvent::TerminalEquipment(e) => e.event_type_name(),
            UtilityNetworkEvent::Specification(e) => e.event_type_name(),
        }
    }
}

impl From<SpanEquipmentEvent> for UtilityNetworkEvent {
    fn from(event: SpanEquipmentEvent) -> Self {
        UtilityNetworkEvent::SpanEquipment(event)
    }
}

impl From<NodeContainerEvent> for UtilityNetworkEvent {
    fn from(event: NodeContainerEvent) -> Self {
        UtilityNetworkEvent::NodeContainer(event)
    }
}

impl From<TerminalEquipmentEvent> for UtilityNetworkEvent {
    fn from(event: TerminalEquipmentEvent) -> Self {
        UtilityNetworkEvent::TerminalEquipment(event)
    }
}

impl From<SpecificationEvent> for UtilityNetworkEvent {
    fn from(event: SpecificationEvent) -> Self {
        UtilityNetworkEvent::Specification(event)
    }
}
