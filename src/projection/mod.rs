// Copyright (c) 2025 - Cowboy AI, Inc.

//! Projection Adapter - Functor F: Events → Read Model
//!
//! Projects the utility network event log into the in-memory
//! [`UtilityGraph`] the command handlers and tracers query.
//!
//! # Functoriality Properties
//!
//! 1. **Identity**: an empty event stream produces no change
//! 2. **Composition**: applying events one by one equals applying the
//!    sequence as a batch
//!
//! # Versioned Snapshots
//!
//! ```text
//! UtilityNetworkProjection
//!   └── RwLock<Arc<UtilityGraph>>   ← snapshot() hands out the Arc
//!                                      apply() swaps in a new version
//! ```
//!
//! A tracer or command handler takes one snapshot at the start and reads
//! only from it, so a commit landing meanwhile cannot produce a half-old,
//! half-new view.

pub mod graph;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::event_store::{EventStore, StoredEvent};
use crate::events::UtilityNetworkEvent;

pub use graph::{
    GraphElement, ProjectedEquipment, SpanSegmentRef, TerminalConnection, TerminalRef,
    UtilityGraph,
};

/// Projection Adapter trait
///
/// Implementations must preserve:
/// - **Event order**: Events applied in sequence
/// - **Idempotency**: Re-applying same event produces same state
/// - **Consistency**: Read model reflects event history
///
/// Adapters are shared between the command side and readers, so every
/// operation takes `&self` and the adapter synchronises internally.
#[async_trait]
pub trait ProjectionAdapter: Send + Sync {
    /// The event type this projection handles
    type Event: Send + Sync;

    /// Error type for projection operations
    type Error: std::error::Error + Send + Sync;

    /// Project an event into the read model
    ///
    /// Calling `project` with the same event multiple times must be safe.
    async fn project(&self, event: Self::Event) -> Result<(), Self::Error>;

    /// Initialize the projection target
    async fn initialize(&self) -> Result<(), Self::Error>;

    /// Verify the projection target is ready
    async fn health_check(&self) -> Result<(), Self::Error>;

    /// Reset the projection (clear all projected state)
    ///
    /// WARNING: This is destructive! Use only for rebuilding projections.
    async fn reset(&self) -> Result<(), Self::Error>;

    /// Get the name of this projection adapter
    fn name(&self) -> &str;
}

/// Errors that can occur during projection
#[derive(Debug, Clone, Error)]
pub enum ProjectionError {
    /// Reading the event log failed during a rebuild
    #[error("Event store error: {0}")]
    EventStore(String),
}

/// The utility network read model
pub struct UtilityNetworkProjection {
    current: RwLock<Arc<UtilityGraph>>,
}

impl Default for UtilityNetworkProjection {
    fn default() -> Self {
        Self::new()
    }
}

impl UtilityNetworkProjection {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(UtilityGraph::new())),
        }
    }

    /// The graph at the latest committed version
    pub async fn snapshot(&self) -> Arc<UtilityGraph> {
        self.current.read().await.clone()
    }

    pub async fn version(&self) -> u64 {
        self.current.read().await.version()
    }

    /// Fold committed events in commit order
    ///
    /// Readers holding an older snapshot keep it; the new version is
    /// published once all events are folded.
    pub async fn apply(&self, events: &[UtilityNetworkEvent]) {
        if events.is_empty() {
            return;
        }

        let mut current = self.current.write().await;
        let graph = Arc::make_mut(&mut current);
        let applied = events.iter().filter(|e| graph.apply(e)).count();

        debug!(
            applied,
            skipped = events.len() - applied,
            version = graph.version(),
            "Projected events"
        );
    }

    /// Replace the read model with one folded from the whole event log
    pub async fn rebuild(&self, store: &dyn EventStore) -> Result<u64, ProjectionError> {
        let events = store
            .read_all(1)
            .await
            .map_err(|e| ProjectionError::EventStore(e.to_string()))?;

        let mut graph = UtilityGraph::new();
        for stored in &events {
            graph.apply(&stored.data);
        }

        let version = graph.version();
        *self.current.write().await = Arc::new(graph);

        info!(version, "Rebuilt utility network projection");
        Ok(version)
    }
}

#[async_trait]
impl ProjectionAdapter for UtilityNetworkProjection {
    type Event = StoredEvent<UtilityNetworkEvent>;
    type Error = ProjectionError;

    async fn project(&self, event: Self::Event) -> Result<(), Self::Error> {
        self.apply(std::slice::from_ref(&event.data)).await;
        Ok(())
    }

    async fn initialize(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn health_check(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn reset(&self) -> Result<(), Self::Error> {
        *self.current.write().await = Arc::new(UtilityGraph::new());
        Ok(())
    }

    fn name(&self) -> &str {
        "utility-network-graph"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::span_equipment::{handle_affix_to_parent, handle_place_in_route_network};
    use crate::aggregate::{CommandContext, SpanEquipmentProperties, SpanEquipmentState, UserContext};
    use crate::domain::{
        RouteNetworkWalk, SpanEquipmentAffixDirection, SpanEquipmentSpecification,
        SpanStructureTemplate, UtilityNetworkHop, UtilityNetworkHopParentAffix,
        ValidatedRouteNetworkWalk,
    };
    use crate::event_store::InMemoryEventStore;
    use crate::events::SpanEquipmentEvent;
    use std::collections::HashSet;
    use uuid::Uuid;

    const A: Uuid = Uuid::from_u128(0xA);
    const B: Uuid = Uuid::from_u128(0xB);
    const S1: Uuid = Uuid::from_u128(0x51);

    fn ctx() -> CommandContext {
        CommandContext::new(
            Uuid::from_u128(0xC0),
            UserContext::new("test-user"),
            "2025-03-01T10:00:00Z".parse().unwrap(),
        )
    }

    fn walk() -> ValidatedRouteNetworkWalk {
        ValidatedRouteNetworkWalk::from_validated(RouteNetworkWalk::new(vec![A, S1, B]).unwrap())
    }

    fn spec(is_cable: bool) -> SpanEquipmentSpecification {
        SpanEquipmentSpecification {
            id: Uuid::from_u128(if is_cable { 0x2002 } else { 0x2001 }),
            category: "Test".to_string(),
            name: "test".to_string(),
            is_cable,
            root_template: SpanStructureTemplate::leaf(Uuid::from_u128(0x1001), 1, 1),
            manufacturer_refs: vec![],
        }
    }

    fn place(id: Uuid, is_cable: bool) -> (SpanEquipmentState, SpanEquipmentEvent) {
        let state = SpanEquipmentState::default_for(id);
        let event = handle_place_in_route_network(
            &state,
            &ctx(),
            &spec(is_cable),
            Uuid::now_v7(),
            &walk(),
            SpanEquipmentProperties::default(),
        )
        .unwrap();
        (crate::aggregate::span_equipment::apply_event(state, &event), event)
    }

    #[tokio::test]
    async fn test_apply_indexes_segments_and_cables() {
        let projection = UtilityNetworkProjection::new();
        let conduit_id = Uuid::now_v7();
        let cable_id = Uuid::now_v7();

        let (conduit, placed_conduit) = place(conduit_id, false);
        let (cable, placed_cable) = place(cable_id, true);
        let conduit_segment = conduit.equipment().unwrap().span_structures[0].span_segments[0].id;

        let affixed = handle_affix_to_parent(
            &cable,
            &ctx(),
            &walk(),
            UtilityNetworkHop {
                from_node_id: A,
                to_node_id: B,
                parent_affixes: vec![UtilityNetworkHopParentAffix {
                    span_segment_id: conduit_segment,
                    direction: SpanEquipmentAffixDirection::Forward,
                }],
            },
            &HashSet::new(),
        )
        .unwrap();

        let before = projection.snapshot().await;

        projection
            .apply(&[
                UtilityNetworkEvent::SpanEquipment(placed_conduit),
                UtilityNetworkEvent::SpanEquipment(placed_cable),
                UtilityNetworkEvent::SpanEquipment(affixed),
            ])
            .await;

        let graph = projection.snapshot().await;
        assert_eq!(graph.version(), 3);
        assert_eq!(before.version(), 0);

        let element = graph.try_get_span_segment_ref(conduit_segment).unwrap();
        assert_eq!(element.span_equipment_id, conduit_id);
        assert_eq!(element.structure_index, 0);

        assert!(graph.check_if_conduit_segment_contains_cables(conduit_segment));
        assert_eq!(graph.related_cables_by_conduit_segment_id(conduit_segment), &[cable_id]);
        assert_eq!(
            graph.occupied_parent_segment_ids([conduit_segment]),
            [conduit_segment].into_iter().collect()
        );
    }

    #[tokio::test]
    async fn test_duplicate_events_are_skipped() {
        let projection = UtilityNetworkProjection::new();
        let (_, placed) = place(Uuid::now_v7(), false);
        let event = UtilityNetworkEvent::SpanEquipment(placed);

        projection.apply(&[event.clone()]).await;
        projection.apply(&[event]).await;

        assert_eq!(projection.version().await, 1);
    }

    #[tokio::test]
    async fn test_rebuild_from_store_matches_incremental() {
        let store = InMemoryEventStore::new();
        let incremental = UtilityNetworkProjection::new();
        let id = Uuid::now_v7();
        let (_, placed) = place(id, false);
        let event = UtilityNetworkEvent::SpanEquipment(placed);

        store.append(id, vec![event.clone()], Some(0)).await.unwrap();
        incremental.apply(&[event]).await;

        let rebuilt = UtilityNetworkProjection::new();
        let version = rebuilt.rebuild(&store).await.unwrap();

        assert_eq!(version, 1);
        let graph = rebuilt.snapshot().await;
        assert_eq!(
            graph.try_get_span_equipment(id),
            incremental.snapshot().await.try_get_span_equipment(id)
        );
    }

    #[tokio::test]
    async fn test_reset_clears_graph() {
        let projection = UtilityNetworkProjection::new();
        let (_, placed) = place(Uuid::now_v7(), false);
        projection
            .project(StoredEvent::from_event(UtilityNetworkEvent::SpanEquipment(placed), 1, 1))
            .await
            .unwrap();
        assert_eq!(projection.snapshot().await.span_equipment_count(), 1);

        projection.reset().await.unwrap();
        assert_eq!(projection.snapshot().await.span_equipment_count(), 0);
        assert_eq!(projection.name(), "utility-network-graph");
    }
}
