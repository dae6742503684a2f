// Copyright (c) 2025 - Cowboy AI, Inc.
//! Route Network Gateway
//!
//! The route network (nodes, segments, interests) belongs to another bounded
//! context. The utility network only talks to it through
//! [`RouteNetworkGateway`]: it asks for walks to be validated, for shortest
//! paths, and registers the walks and nodes its equipment occupies.
//!
//! ```text
//! UtilityNetworkService ──validate / register──> RouteNetworkGateway
//!                       <──ValidatedRouteNetworkWalk──
//! ```
//!
//! [`InMemoryRouteNetwork`] is a petgraph-backed implementation for tests
//! and embedded use.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::aggregate::ErrorCode;
use crate::domain::{
    RouteNetworkElementKind, RouteNetworkInterest, RouteNetworkWalk, RouteNetworkWalkError,
    ValidatedRouteNetworkWalk,
};

pub mod memory;

pub use memory::InMemoryRouteNetwork;

/// Route network gateway failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Route network element {0} not found")]
    UnknownElement(Uuid),

    #[error("Invalid walk: {0}")]
    InvalidWalk(String),

    #[error("No path between route nodes {from} and {to}")]
    NoPath { from: Uuid, to: Uuid },

    #[error("Interest {0} not found")]
    InterestNotFound(Uuid),

    #[error("Interest {0} already exists")]
    InterestAlreadyExists(Uuid),
}

impl GatewayError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::InvalidWalk(_) | GatewayError::NoPath { .. } => ErrorCode::InvalidWalk,
            _ => ErrorCode::RouteNetworkError,
        }
    }
}

impl From<RouteNetworkWalkError> for GatewayError {
    fn from(err: RouteNetworkWalkError) -> Self {
        GatewayError::InvalidWalk(err.to_string())
    }
}

/// Which interests to return with route network details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelatedInterestFilter {
    None,
    /// Interests referencing any of the requested elements
    ReferencingElements,
}

/// A route node or segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNetworkElement {
    pub id: Uuid,
    pub kind: RouteNetworkElementKind,
}

/// Answer to [`RouteNetworkGateway::get_route_network_details`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNetworkDetails {
    pub elements: Vec<RouteNetworkElement>,
    pub interests: Vec<RouteNetworkInterest>,
}

/// Queries and interest commands consumed from the route network
#[async_trait]
pub trait RouteNetworkGateway: Send + Sync {
    /// Look up elements and, optionally, the interests referencing them
    async fn get_route_network_details(
        &self,
        element_ids: &[Uuid],
        filter: RelatedInterestFilter,
    ) -> Result<RouteNetworkDetails, GatewayError>;

    /// Order the given element ids into one connected, acyclic walk
    ///
    /// Segment ids decide the walk; node ids are optional and, when the
    /// first id is an end node, fix the walk's direction.
    async fn validate_walk_of_interest(
        &self,
        element_ids: &[Uuid],
    ) -> Result<ValidatedRouteNetworkWalk, GatewayError>;

    async fn shortest_path_between_route_nodes(
        &self,
        from_node_id: Uuid,
        to_node_id: Uuid,
    ) -> Result<RouteNetworkWalk, GatewayError>;

    async fn register_walk_of_interest(
        &self,
        interest_id: Uuid,
        walk: &ValidatedRouteNetworkWalk,
    ) -> Result<RouteNetworkInterest, GatewayError>;

    async fn register_node_of_interest(
        &self,
        interest_id: Uuid,
        route_node_id: Uuid,
    ) -> Result<RouteNetworkInterest, GatewayError>;

    async fn update_walk_of_interest(
        &self,
        interest_id: Uuid,
        walk: &ValidatedRouteNetworkWalk,
    ) -> Result<RouteNetworkInterest, GatewayError>;

    async fn unregister_interest(&self, interest_id: Uuid) -> Result<(), GatewayError>;

    async fn get_walk_of_interest(
        &self,
        interest_id: Uuid,
    ) -> Result<ValidatedRouteNetworkWalk, GatewayError>;
}
