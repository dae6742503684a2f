// Copyright (c) 2025 - Cowboy AI, Inc.
//! Utility Network Domain Events
//!
//! Immutable facts representing state changes of the utility network
//! aggregates.
//!
//! # Event Sourcing Principles
//!
//! 1. **Events are immutable**: Once created, events never change
//! 2. **Events are past tense**: Named for what happened (Cut, not Cut-request)
//! 3. **Events include metadata**: every event carries an [`EventHeader`]
//! 4. **Events are versioned**: `event_version` field for schema evolution
//!
//! # Event Flow
//!
//! ```text
//! Command → Aggregate → Event → EventStore → UtilityNetworkProjection
//!                                    ↓
//!                     RouteNetworkElementContainedEquipmentUpdated
//! ```
//!
//! # Correlation
//!
//! A cable cut touches two aggregates (the shrunk cable and the new
//! remainder). All events of one command share its `correlation_id`.
//!
//! # Module Organization
//!
//! - [`utility_network`] - Top-level polymorphic event envelope
//! - [`span_equipment`] - conduit and cable events
//! - [`node_container`] - node container events
//! - [`terminal_equipment`] - terminal equipment events
//! - [`specification`] - catalogue events
//! - [`notification`] - outbound change notification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod node_container;
pub mod notification;
pub mod span_equipment;
pub mod specification;
pub mod terminal_equipment;
pub mod utility_network;

pub use node_container::NodeContainerEvent;
pub use notification::{ChangeTypeEnum, IdChangeSet, RouteNetworkElementContainedEquipmentUpdated};
pub use span_equipment::SpanEquipmentEvent;
pub use specification::SpecificationEvent;
pub use terminal_equipment::TerminalEquipmentEvent;
pub use utility_network::UtilityNetworkEvent;

/// Metadata carried by every event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventHeader {
    /// Event version for schema evolution
    pub event_version: u32,

    /// Unique event identifier (UUID v7 for time ordering)
    pub event_id: Uuid,

    /// Aggregate the event belongs to
    pub aggregate_id: Uuid,

    /// When this event occurred
    pub timestamp: DateTime<Utc>,

    /// Correlation ID for request tracing
    pub correlation_id: Uuid,

    /// Causation ID (event that caused this event)
    pub causation_id: Option<Uuid>,

    /// User who issued the command
    pub user_name: Option<String>,
}

impl EventHeader {
    /// Header for a new version 1 event
    pub fn new(
        aggregate_id: Uuid,
        timestamp: DateTime<Utc>,
        correlation_id: Uuid,
        user_name: Option<String>,
    ) -> Self {
        Self {
            event_version: 1,
            event_id: Uuid::now_v7(),
            aggregate_id,
            timestamp,
            correlation_id,
            causation_id: None,
            user_name,
        }
    }

    pub fn caused_by(mut self, event_id: Uuid) -> Self {
        self.causation_id = Some(event_id);
        self
    }
}
