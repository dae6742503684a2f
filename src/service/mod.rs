// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for the Utility Network
//!
//! Orchestrates the pure aggregates, the route network gateway, the event
//! store and the projection. Every command runs the same way:
//!
//! ```text
//! Command
//!   ↓  resolve ids against one projection snapshot (fail fast)
//!   ↓  query / validate walks through the RouteNetworkGateway
//!   ↓  handle_*(state, ctx, …) on every touched aggregate (pure)
//!   ↓  UnitOfWork: append events, then apply interest changes
//!   ↓  fold committed events into the projection
//!   ↓  notify RouteNetworkElementContainedEquipmentUpdated (fire and forget)
//! ```
//!
//! # Transaction Semantics
//!
//! Each aggregate stream is the unit of optimistic concurrency. A command
//! touching several aggregates (cut, merge, move with child cables) checks
//! every expected version before writing anything; once its first write
//! succeeded, a later failure is a bug and panics. No compensation is
//! attempted.
//!
//! # Example
//!
//! ```rust,ignore
//! use cim_utility_network::service::{InMemoryNotifier, UtilityNetworkService};
//!
//! let service = UtilityNetworkService::new(store, gateway, notifier, "UtilityNetworkService");
//! service
//!     .place_span_equipment_in_route_network(&ctx, conduit_id, spec_id, &[a, s1, b], Default::default())
//!     .await?;
//! ```

pub mod connectivity;
pub mod node_container;
pub mod notifier;
pub mod span_equipment;
pub mod specification;
pub mod terminal_equipment;
pub mod unit_of_work;

use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::aggregate::{
    CommandContext, ErrorCode, NodeContainerError, NodeContainerState, SpanEquipmentError,
    SpanEquipmentState, SpecificationError, SpecificationsState, TerminalEquipmentError,
    TerminalEquipmentState,
};
use crate::errors::InfrastructureError;
use crate::event_store::EventStore;
use crate::events::{
    NodeContainerEvent, SpanEquipmentEvent, SpecificationEvent, TerminalEquipmentEvent,
    UtilityNetworkEvent,
};
use crate::projection::{ProjectionError, UtilityGraph, UtilityNetworkProjection};
use crate::route_network::{GatewayError, RouteNetworkGateway};
use crate::trace::TraceError;

pub use notifier::{
    categories, entity_types, EquipmentChange, EquipmentChangeNotifier, InMemoryNotifier,
    NatsEquipmentNotifier,
};
pub use unit_of_work::{InterestChange, UnitOfWork};

/// Service layer result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Kind of entity a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    SpanEquipment,
    SpanSegment,
    NodeContainer,
    TerminalEquipment,
    Specification,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::SpanEquipment => write!(f, "Span equipment"),
            EntityKind::SpanSegment => write!(f, "Span segment"),
            EntityKind::NodeContainer => write!(f, "Node container"),
            EntityKind::TerminalEquipment => write!(f, "Terminal equipment"),
            EntityKind::Specification => write!(f, "Specification"),
        }
    }
}

/// Service layer errors
///
/// Everything a caller can correct and retry. Invariant violations inside
/// the service are not represented here; they panic.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    SpanEquipment(#[from] SpanEquipmentError),

    #[error(transparent)]
    NodeContainer(#[from] NodeContainerError),

    #[error(transparent)]
    TerminalEquipment(#[from] TerminalEquipmentError),

    #[error(transparent)]
    Specification(#[from] SpecificationError),

    #[error(transparent)]
    RouteNetwork(#[from] GatewayError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Selected {left} span segments on one side and {right} on the other")]
    MismatchedSegmentCounts { left: usize, right: usize },

    #[error("Cannot connect outer span segment {outer} to inner span segment {inner}")]
    CannotConnectInnerToOuter { outer: Uuid, inner: Uuid },

    #[error("Connecting both segments at the same end at route node {0} is a u-turn")]
    UTurnNotAllowed(Uuid),

    #[error("Only one cable can be cut at a time")]
    CannotCutMultipleCables,

    #[error("Terminal {0} is already connected")]
    TerminalAlreadyConnected(Uuid),

    #[error("Terminal {0} not found")]
    TerminalNotFound(Uuid),

    #[error("Concurrency conflict on {aggregate_id}: expected version {expected}, got {actual}")]
    ConcurrencyConflict {
        aggregate_id: Uuid,
        expected: u64,
        actual: u64,
    },

    #[error("Event store error: {0}")]
    EventStore(String),
}

impl ServiceError {
    pub(crate) fn not_found(kind: EntityKind, id: Uuid) -> Self {
        ServiceError::NotFound { kind, id }
    }

    /// Stable code for the `(ErrorCode, Message)` pair returned to callers
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::SpanEquipment(e) => e.code(),
            ServiceError::NodeContainer(e) => e.code(),
            ServiceError::TerminalEquipment(e) => e.code(),
            ServiceError::Specification(e) => e.code(),
            ServiceError::RouteNetwork(e) => e.code(),
            ServiceError::Trace(e) => e.code(),
            ServiceError::NotFound { kind, .. } => match kind {
                EntityKind::SpanEquipment => ErrorCode::SpanEquipmentNotFound,
                EntityKind::SpanSegment => ErrorCode::SpanSegmentNotFound,
                EntityKind::NodeContainer => ErrorCode::NodeContainerNotFound,
                EntityKind::TerminalEquipment => ErrorCode::TerminalEquipmentNotFound,
                EntityKind::Specification => ErrorCode::SpecificationNotFound,
            },
            ServiceError::InvalidCommand(_) => ErrorCode::InvalidCommand,
            ServiceError::MismatchedSegmentCounts { .. } => ErrorCode::MismatchedSegmentCounts,
            ServiceError::CannotConnectInnerToOuter { .. } => ErrorCode::CannotConnectInnerToOuter,
            ServiceError::UTurnNotAllowed(_) => ErrorCode::UTurnNotAllowed,
            ServiceError::CannotCutMultipleCables => ErrorCode::CannotCutMultipleCables,
            ServiceError::TerminalAlreadyConnected(_) => ErrorCode::TerminalAlreadyConnected,
            ServiceError::TerminalNotFound(_) => ErrorCode::TerminalNotFound,
            ServiceError::ConcurrencyConflict { .. } => ErrorCode::ConcurrencyConflict,
            ServiceError::EventStore(_) => ErrorCode::EventStoreUnavailable,
        }
    }
}

impl From<InfrastructureError> for ServiceError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual,
            } => ServiceError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual,
            },
            other => ServiceError::EventStore(other.to_string()),
        }
    }
}

/// Aggregate state together with the stream version it was folded from
#[derive(Debug, Clone)]
pub(crate) struct Loaded<S> {
    pub state: S,
    pub version: u64,
}

/// Aggregate states the service can fold from the shared event log
pub(crate) trait AggregateStream: Sized {
    type Event;
    const KIND: EntityKind;

    fn pick(event: UtilityNetworkEvent) -> Option<Self::Event>;
    fn fold(id: Uuid, events: &[Self::Event]) -> Self;
    fn exists(&self) -> bool;
}

impl AggregateStream for SpanEquipmentState {
    type Event = SpanEquipmentEvent;
    const KIND: EntityKind = EntityKind::SpanEquipment;

    fn pick(event: UtilityNetworkEvent) -> Option<Self::Event> {
        match event {
            UtilityNetworkEvent::SpanEquipment(e) => Some(e),
            _ => None,
        }
    }

    fn fold(id: Uuid, events: &[Self::Event]) -> Self {
        SpanEquipmentState::from_events(id, events)
    }

    fn exists(&self) -> bool {
        self.is_initialized()
    }
}

impl AggregateStream for NodeContainerState {
    type Event = NodeContainerEvent;
    const KIND: EntityKind = EntityKind::NodeContainer;

    fn pick(event: UtilityNetworkEvent) -> Option<Self::Event> {
        match event {
            UtilityNetworkEvent::NodeContainer(e) => Some(e),
            _ => None,
        }
    }

    fn fold(id: Uuid, events: &[Self::Event]) -> Self {
        NodeContainerState::from_events(id, events)
    }

    fn exists(&self) -> bool {
        self.is_initialized()
    }
}

impl AggregateStream for TerminalEquipmentState {
    type Event = TerminalEquipmentEvent;
    const KIND: EntityKind = EntityKind::TerminalEquipment;

    fn pick(event: UtilityNetworkEvent) -> Option<Self::Event> {
        match event {
            UtilityNetworkEvent::TerminalEquipment(e) => Some(e),
            _ => None,
        }
    }

    fn fold(id: Uuid, events: &[Self::Event]) -> Self {
        TerminalEquipmentState::from_events(id, events)
    }

    fn exists(&self) -> bool {
        self.is_initialized()
    }
}

impl AggregateStream for SpecificationsState {
    type Event = SpecificationEvent;
    const KIND: EntityKind = EntityKind::Specification;

    fn pick(event: UtilityNetworkEvent) -> Option<Self::Event> {
        match event {
            UtilityNetworkEvent::Specification(e) => Some(e),
            _ => None,
        }
    }

    fn fold(_id: Uuid, events: &[Self::Event]) -> Self {
        SpecificationsState::from_events(events)
    }

    fn exists(&self) -> bool {
        true
    }
}

/// Command side of the utility network
///
/// Cheap to share behind an `Arc`; all state lives in the event store, the
/// projection and the route network.
pub struct UtilityNetworkService {
    store: Arc<dyn EventStore>,
    gateway: Arc<dyn RouteNetworkGateway>,
    projection: Arc<UtilityNetworkProjection>,
    notifier: Arc<dyn EquipmentChangeNotifier>,
    application_name: String,
}

impl UtilityNetworkService {
    /// Create a service with an empty projection
    ///
    /// Call [`rebuild_projection`](Self::rebuild_projection) when the store
    /// already holds events.
    pub fn new(
        store: Arc<dyn EventStore>,
        gateway: Arc<dyn RouteNetworkGateway>,
        notifier: Arc<dyn EquipmentChangeNotifier>,
        application_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            projection: Arc::new(UtilityNetworkProjection::new()),
            notifier,
            application_name: application_name.into(),
        }
    }

    /// The read model commands are validated against
    pub fn projection(&self) -> Arc<UtilityNetworkProjection> {
        self.projection.clone()
    }

    /// Current projection snapshot
    pub async fn graph(&self) -> Arc<UtilityGraph> {
        self.projection.snapshot().await
    }

    pub async fn rebuild_projection(&self) -> Result<u64, ProjectionError> {
        self.projection.rebuild(self.store.as_ref()).await
    }

    pub(crate) fn gateway(&self) -> &dyn RouteNetworkGateway {
        self.gateway.as_ref()
    }

    /// Fold an aggregate stream, whether or not it has been created yet
    pub(crate) async fn load<S: AggregateStream>(&self, id: Uuid) -> ServiceResult<Loaded<S>> {
        let stored = self.store.read_events(id).await?;
        let version = stored.last().map(|e| e.sequence).unwrap_or(0);

        let events: Vec<S::Event> = stored.into_iter().filter_map(|e| S::pick(e.data)).collect();

        Ok(Loaded {
            state: S::fold(id, &events),
            version,
        })
    }

    /// Fold an aggregate stream that must already exist
    pub(crate) async fn load_existing<S: AggregateStream>(&self, id: Uuid) -> ServiceResult<Loaded<S>> {
        let loaded = self.load::<S>(id).await?;
        if !loaded.state.exists() {
            return Err(ServiceError::not_found(S::KIND, id));
        }
        Ok(loaded)
    }

    /// Run a unit of work, project its events and notify
    pub(crate) async fn commit(
        &self,
        ctx: &CommandContext,
        work: UnitOfWork,
        change: EquipmentChange,
    ) -> ServiceResult<()> {
        let events = work.execute(self.store.as_ref(), self.gateway.as_ref()).await?;
        self.projection.apply(&events).await;

        info!(
            correlation_id = %ctx.correlation_id,
            category = change.category(),
            events = events.len(),
            "Command committed"
        );

        let notification = change.into_notification(&self.application_name, ctx.timestamp);
        if let Err(e) = self.notifier.notify(&notification).await {
            warn!(
                correlation_id = %ctx.correlation_id,
                category = %notification.category,
                error = %e,
                "Failed to publish equipment change notification"
            );
        }

        Ok(())
    }
}
