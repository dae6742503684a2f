// Copyright (c) 2025 - Cowboy AI, Inc.
//! Route Network Value Objects
//!
//! The route network (nodes and segments) is owned by another bounded
//! context. This side only ever sees ordered id sequences:
//!
//! ```text
//! node ── segment ── node ── segment ── node
//!  0        1         2        3         4
//! ```
//!
//! A [`RouteNetworkWalk`] is any such alternating sequence. A
//! [`ValidatedRouteNetworkWalk`] is one the route network gateway has
//! confirmed to be connected and acyclic, and is the only shape span
//! equipment is allowed to occupy.

use serde::{Deserialize, Serialize};
use std::ops::Deref;
use thiserror::Error;
use uuid::Uuid;

/// Structural walk error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteNetworkWalkError {
    #[error("A walk must contain at least one segment between two nodes")]
    TooShort,

    #[error("A walk must alternate node/segment and end on a node (got {0} elements)")]
    EvenLength(usize),
}

/// Kind of a route network element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteNetworkElementKind {
    RouteNode,
    RouteSegment,
}

/// Kind of interest registered in the route network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteNetworkInterestKind {
    WalkOfInterest,
    NodeOfInterest,
}

/// An interest registered against the route network
///
/// Span equipment holds a walk of interest; node containers hold a node of
/// interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNetworkInterest {
    pub id: Uuid,
    pub kind: RouteNetworkInterestKind,
    pub route_network_element_refs: Vec<Uuid>,
}

/// An alternating node/segment id sequence starting and ending on a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteNetworkWalk {
    element_ids: Vec<Uuid>,
}

impl RouteNetworkWalk {
    /// Create a walk, checking only its shape (odd length, at least 3)
    pub fn new(element_ids: Vec<Uuid>) -> Result<Self, RouteNetworkWalkError> {
        if element_ids.len() < 3 {
            return Err(RouteNetworkWalkError::TooShort);
        }
        if element_ids.len() % 2 == 0 {
            return Err(RouteNetworkWalkError::EvenLength(element_ids.len()));
        }
        Ok(Self { element_ids })
    }

    /// All element ids in walk order
    pub fn element_ids(&self) -> &[Uuid] {
        &self.element_ids
    }

    /// First node of the walk
    pub fn from_node_id(&self) -> Uuid {
        self.element_ids[0]
    }

    /// Last node of the walk
    pub fn to_node_id(&self) -> Uuid {
        self.element_ids[self.element_ids.len() - 1]
    }

    /// Node ids in walk order
    pub fn node_ids(&self) -> Vec<Uuid> {
        self.element_ids.iter().step_by(2).copied().collect()
    }

    /// Segment ids in walk order
    pub fn segment_ids(&self) -> Vec<Uuid> {
        self.element_ids.iter().skip(1).step_by(2).copied().collect()
    }

    /// Whether the node lies on the walk
    pub fn contains_node(&self, node_id: Uuid) -> bool {
        self.element_position(node_id)
            .map(|pos| pos % 2 == 0)
            .unwrap_or(false)
    }

    /// Position of a node among the walk's nodes (0 = from node)
    pub fn node_position(&self, node_id: Uuid) -> Option<usize> {
        self.element_position(node_id)
            .filter(|pos| pos % 2 == 0)
            .map(|pos| pos / 2)
    }

    fn element_position(&self, id: Uuid) -> Option<usize> {
        self.element_ids.iter().position(|e| *e == id)
    }

    /// Number of route segments walked
    pub fn segment_count(&self) -> usize {
        self.element_ids.len() / 2
    }

    /// The same walk in opposite direction
    pub fn reversed(&self) -> Self {
        let mut element_ids = self.element_ids.clone();
        element_ids.reverse();
        Self { element_ids }
    }

    /// The part of the walk between two nodes, oriented `from_node → to_node`
    ///
    /// Returns `None` if either node is not on the walk or both are the same.
    pub fn section(&self, from_node_id: Uuid, to_node_id: Uuid) -> Option<Self> {
        let from = self.element_position(from_node_id).filter(|p| p % 2 == 0)?;
        let to = self.element_position(to_node_id).filter(|p| p % 2 == 0)?;

        if from == to {
            return None;
        }

        if from < to {
            Some(Self {
                element_ids: self.element_ids[from..=to].to_vec(),
            })
        } else {
            let mut element_ids = self.element_ids[to..=from].to_vec();
            element_ids.reverse();
            Some(Self { element_ids })
        }
    }

    /// Append `other` to this walk; `other` must start where this one ends
    pub fn concat(&self, other: &RouteNetworkWalk) -> Option<Self> {
        if self.to_node_id() != other.from_node_id() {
            return None;
        }
        let mut element_ids = self.element_ids.clone();
        element_ids.extend_from_slice(&other.element_ids[1..]);
        Some(Self { element_ids })
    }

    /// Replace the section between two nodes with `replacement`
    ///
    /// `replacement` must run between the same two nodes, in either direction.
    pub fn replace_section(&self, replacement: &RouteNetworkWalk) -> Option<Self> {
        let a = self.element_position(replacement.from_node_id())?;
        let b = self.element_position(replacement.to_node_id())?;

        let (start, end, oriented) = if a < b {
            (a, b, replacement.clone())
        } else {
            (b, a, replacement.reversed())
        };

        let mut element_ids = self.element_ids[..start].to_vec();
        element_ids.extend_from_slice(&oriented.element_ids);
        element_ids.extend_from_slice(&self.element_ids[end + 1..]);
        Some(Self { element_ids })
    }

    /// Whether `other` appears as a contiguous part of this walk, in either direction
    pub fn contains_walk(&self, other: &RouteNetworkWalk) -> bool {
        match self.section(other.from_node_id(), other.to_node_id()) {
            Some(section) => section == *other,
            None => false,
        }
    }
}

/// A walk the route network gateway has confirmed connected and acyclic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedRouteNetworkWalk {
    walk: RouteNetworkWalk,
}

impl ValidatedRouteNetworkWalk {
    /// Wrap a walk the gateway has validated
    ///
    /// Only gateway implementations should call this.
    pub fn from_validated(walk: RouteNetworkWalk) -> Self {
        Self { walk }
    }

    /// Unwrap into the plain walk
    pub fn into_walk(self) -> RouteNetworkWalk {
        self.walk
    }

    /// Opposite direction; still valid
    pub fn reversed(&self) -> Self {
        Self {
            walk: self.walk.reversed(),
        }
    }

    /// Sub-walk between two nodes; a section of a valid walk is valid
    pub fn section(&self, from_node_id: Uuid, to_node_id: Uuid) -> Option<Self> {
        self.walk
            .section(from_node_id, to_node_id)
            .map(|walk| Self { walk })
    }
}

impl Deref for ValidatedRouteNetworkWalk {
    type Target = RouteNetworkWalk;

    fn deref(&self) -> &Self::Target {
        &self.walk
    }
}
