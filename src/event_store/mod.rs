// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Abstraction
//!
//! Storage interface for the utility network event log.
//!
//! # Architecture
//!
//! ```text
//! Command → Aggregate → Events → EventStore → Global Log
//!                                    ↓
//!                        UtilityNetworkProjection
//! ```
//!
//! # Event Store Requirements
//!
//! 1. **Append-Only**: Events are never updated or deleted
//! 2. **Ordered**: Events keep their sequence within an aggregate stream and
//!    their position in the global log
//! 3. **Correlation**: Events of one command share a correlation id
//! 4. **Optimistic concurrency**: Appends state the version they were
//!    computed against
//! 5. **Replay**: The projection is rebuilt from [`EventStore::read_all`]
//!
//! # Example
//!
//! ```rust,no_run
//! use cim_utility_network::event_store::{EventStore, InMemoryEventStore};
//!
//! # async fn run(event: cim_utility_network::events::UtilityNetworkEvent)
//! #     -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryEventStore::new();
//! let aggregate_id = event.aggregate_id();
//!
//! // First event of a new aggregate
//! store.append(aggregate_id, vec![event], Some(0)).await?;
//!
//! let events = store.read_events(aggregate_id).await?;
//! assert_eq!(events.len(), 1);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::InfrastructureResult;
use crate::events::UtilityNetworkEvent;

pub mod memory;

pub use memory::InMemoryEventStore;

/// Stored event envelope
///
/// Wraps a domain event with its place in the aggregate stream and in the
/// global log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent<E> {
    /// Unique event ID (UUID v7 for time-ordering)
    pub event_id: Uuid,

    /// Aggregate ID this event belongs to
    pub aggregate_id: Uuid,

    /// Sequence number within aggregate stream (1-based)
    pub sequence: u64,

    /// Position in the global log (1-based, commit order)
    pub position: u64,

    /// Event timestamp (when it occurred)
    pub timestamp: DateTime<Utc>,

    /// Correlation ID (tracks related events across aggregates)
    pub correlation_id: Uuid,

    /// Causation ID (immediate cause of this event)
    pub causation_id: Option<Uuid>,

    /// Event type name
    pub event_type: String,

    /// The actual domain event data
    pub data: E,

    /// Optional metadata (e.g., user context)
    pub metadata: Option<serde_json::Value>,
}

impl<E> StoredEvent<E> {
    /// Add metadata to the event
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl StoredEvent<UtilityNetworkEvent> {
    /// Envelope for an event at the given stream sequence and log position
    ///
    /// Ids and time are taken from the event header; the store never reads
    /// the clock.
    pub fn from_event(event: UtilityNetworkEvent, sequence: u64, position: u64) -> Self {
        let header = event.header();
        let metadata = header
            .user_name
            .as_ref()
            .map(|user| serde_json::json!({ "user_name": user }));

        Self {
            event_id: header.event_id,
            aggregate_id: header.aggregate_id,
            sequence,
            position,
            timestamp: header.timestamp,
            correlation_id: header.correlation_id,
            causation_id: header.causation_id,
            event_type: event.event_type_name().to_string(),
            metadata,
            data: event,
        }
    }
}

/// Event Store trait for persisting and retrieving utility network events
///
/// Implementations must ensure:
///
/// - **Atomicity**: Appending events succeeds or fails as a unit
/// - **Consistency**: Stream and global ordering are maintained
/// - **Replay**: Events can be read back in order
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append events to an aggregate's event stream
    ///
    /// `expected_version` is the stream version the events were computed
    /// against: `Some(0)` for a new aggregate, `None` to skip the check.
    ///
    /// # Returns
    ///
    /// The new version after appending events
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if expected_version doesn't match actual version
    async fn append(
        &self,
        aggregate_id: Uuid,
        events: Vec<UtilityNetworkEvent>,
        expected_version: Option<u64>,
    ) -> InfrastructureResult<u64>;

    /// Read all events for an aggregate, in stream order
    async fn read_events(
        &self,
        aggregate_id: Uuid,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>>;

    /// Read events for an aggregate from a specific version (inclusive)
    async fn read_events_from(
        &self,
        aggregate_id: Uuid,
        from_version: u64,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>>;

    /// Read all events in a correlation chain
    ///
    /// A cable cut, for example, spans the shrunk cable and the new remainder.
    async fn read_by_correlation(
        &self,
        correlation_id: Uuid,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>>;

    /// Current version of an aggregate, or None if it has no events
    async fn get_version(&self, aggregate_id: Uuid) -> InfrastructureResult<Option<u64>>;

    /// Read events of an aggregate within a time range (inclusive)
    async fn read_events_by_time_range(
        &self,
        aggregate_id: Uuid,
        from_time: DateTime<Utc>,
        to_time: DateTime<Utc>,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>>;

    /// Read the global log from a position (inclusive), in commit order
    async fn read_all(
        &self,
        from_position: u64,
    ) -> InfrastructureResult<Vec<StoredEvent<UtilityNetworkEvent>>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NamingInfo;
    use crate::events::span_equipment::{SpanEquipmentEvent, SpanEquipmentNamingInfoChanged};
    use crate::events::EventHeader;

    #[test]
    fn test_stored_event_takes_header_fields() {
        let aggregate_id = Uuid::now_v7();
        let correlation_id = Uuid::now_v7();
        let timestamp: DateTime<Utc> = "2025-03-01T10:00:00Z".parse().unwrap();

        let event = UtilityNetworkEvent::SpanEquipment(SpanEquipmentEvent::NamingInfoChanged(
            SpanEquipmentNamingInfoChanged {
                header: EventHeader::new(aggregate_id, timestamp, correlation_id, Some("alice".into())),
                naming_info: Some(NamingInfo::named("K1")),
            },
        ));
        let event_id = event.event_id();

        let stored = StoredEvent::from_event(event, 3, 17);

        assert_eq!(stored.event_id, event_id);
        assert_eq!(stored.aggregate_id, aggregate_id);
        assert_eq!(stored.sequence, 3);
        assert_eq!(stored.position, 17);
        assert_eq!(stored.timestamp, timestamp);
        assert_eq!(stored.correlation_id, correlation_id);
        assert_eq!(stored.event_type, "SpanEquipmentNamingInfoChanged");
        assert_eq!(stored.metadata, Some(serde_json::json!({"user_name": "alice"})));
    }
}
