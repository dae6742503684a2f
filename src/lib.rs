// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-sourced fiber utility network for the Composable Information Machine
//!
//! Conduits and cables (span equipment) occupy walks in an external route
//! network. Each piece of equipment is an event-sourced aggregate; a
//! rebuildable projection indexes segments, terminals and the cables riding
//! through conduits; the tracer follows connected segments across the
//! graph; the service orchestrates commands touching several aggregates.
//!
//! ```text
//! Command ─→ UtilityNetworkService ─→ aggregate::handle_* ─→ EventStore
//!                 │        ↑                                     │
//!                 │   RouteNetworkGateway                        ↓
//!                 └──────── UtilityGraph (projection) ←── events
//!                                  │
//!                               trace::*
//! ```

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod errors;
pub mod event_store;
pub mod events;
pub mod nats;
pub mod projection;
pub mod route_network;
pub mod service;
pub mod subjects;
pub mod trace;

// Re-export commonly used types
pub use aggregate::{CommandContext, SpanEquipmentProperties, UserContext};
pub use config::{NatsConfig, UtilityNetworkConfig};
pub use errors::{InfrastructureError, InfrastructureResult};
pub use event_store::{EventStore, InMemoryEventStore};
pub use nats::{MessageHandler, MessageProcessor, NatsClient};
pub use projection::{UtilityGraph, UtilityNetworkProjection};
pub use route_network::{InMemoryRouteNetwork, RouteNetworkGateway};
pub use service::{ServiceError, ServiceResult, UtilityNetworkService};
pub use trace::{SpanSegmentTrace, SpanSegmentTracer};
