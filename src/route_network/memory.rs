// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory route network
//!
//! Topology is an undirected petgraph graph: route nodes are graph nodes,
//! route segments are edges weighted by length. Interests live in a map
//! behind a tokio lock.

use async_trait::async_trait;
use petgraph::algo::astar;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{
    GatewayError, RelatedInterestFilter, RouteNetworkDetails, RouteNetworkElement,
    RouteNetworkGateway,
};
use crate::domain::{
    RouteNetworkElementKind, RouteNetworkInterest, RouteNetworkInterestKind, RouteNetworkWalk,
    ValidatedRouteNetworkWalk,
};

#[derive(Debug, Clone, Copy)]
struct RouteSegment {
    id: Uuid,
    length: f64,
}

/// Route network held in process memory
#[derive(Default)]
pub struct InMemoryRouteNetwork {
    graph: UnGraph<Uuid, RouteSegment>,
    nodes: HashMap<Uuid, NodeIndex>,
    segments: HashMap<Uuid, EdgeIndex>,
    interests: RwLock<HashMap<Uuid, RouteNetworkInterest>>,
}

impl InMemoryRouteNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route node; adding an existing node is a no-op
    pub fn add_route_node(&mut self, route_node_id: Uuid) {
        if !self.nodes.contains_key(&route_node_id) {
            let index = self.graph.add_node(route_node_id);
            self.nodes.insert(route_node_id, index);
        }
    }

    /// Add a route segment between two nodes, creating the nodes if needed
    pub fn add_route_segment(
        &mut self,
        route_segment_id: Uuid,
        from_node_id: Uuid,
        to_node_id: Uuid,
        length: f64,
    ) -> Result<(), GatewayError> {
        if self.segments.contains_key(&route_segment_id) || self.nodes.contains_key(&route_segment_id) {
            return Err(GatewayError::InvalidWalk(format!(
                "route element {} already exists",
                route_segment_id
            )));
        }
        if from_node_id == to_node_id {
            return Err(GatewayError::InvalidWalk(format!(
                "route segment {} starts and ends at the same node",
                route_segment_id
            )));
        }

        self.add_route_node(from_node_id);
        self.add_route_node(to_node_id);

        let edge = self.graph.add_edge(
            self.nodes[&from_node_id],
            self.nodes[&to_node_id],
            RouteSegment {
                id: route_segment_id,
                length,
            },
        );
        self.segments.insert(route_segment_id, edge);
        Ok(())
    }

    /// Build a network from `(segment, from, to)` triples of unit length
    pub fn from_segments(segments: &[(Uuid, Uuid, Uuid)]) -> Result<Self, GatewayError> {
        let mut network = Self::new();
        for (segment, from, to) in segments {
            network.add_route_segment(*segment, *from, *to, 1.0)?;
        }
        Ok(network)
    }

    fn segment_ends(&self, route_segment_id: Uuid) -> Option<(Uuid, Uuid)> {
        let edge = *self.segments.get(&route_segment_id)?;
        let (a, b) = self.graph.edge_endpoints(edge)?;
        Some((self.graph[a], self.graph[b]))
    }

    fn element_kind(&self, id: Uuid) -> Option<RouteNetworkElementKind> {
        if self.nodes.contains_key(&id) {
            Some(RouteNetworkElementKind::RouteNode)
        } else if self.segments.contains_key(&id) {
            Some(RouteNetworkElementKind::RouteSegment)
        } else {
            None
        }
    }

    /// Order segment ids into one open path
    fn order_walk(&self, element_ids: &[Uuid]) -> Result<RouteNetworkWalk, GatewayError> {
        let mut segment_ids: Vec<Uuid> = Vec::new();
        let mut node_ids: Vec<Uuid> = Vec::new();

        for id in element_ids {
            match self.element_kind(*id) {
                Some(RouteNetworkElementKind::RouteSegment) => {
                    if segment_ids.contains(id) {
                        return Err(GatewayError::InvalidWalk(format!("route segment {} appears twice", id)));
                    }
                    segment_ids.push(*id);
                }
                Some(RouteNetworkElementKind::RouteNode) => node_ids.push(*id),
                None => return Err(GatewayError::UnknownElement(*id)),
            }
        }

        if segment_ids.is_empty() {
            return Err(GatewayError::InvalidWalk("no route segments given".to_string()));
        }

        let mut ends_by_segment = HashMap::new();
        let mut degree: HashMap<Uuid, usize> = HashMap::new();
        for segment_id in &segment_ids {
            let (a, b) = self
                .segment_ends(*segment_id)
                .ok_or(GatewayError::UnknownElement(*segment_id))?;
            ends_by_segment.insert(*segment_id, (a, b));
            *degree.entry(a).or_default() += 1;
            *degree.entry(b).or_default() += 1;
        }

        if let Some((node, _)) = degree.iter().find(|(_, d)| **d > 2) {
            return Err(GatewayError::InvalidWalk(format!("walk branches at route node {}", node)));
        }

        if let Some(node) = node_ids.iter().find(|n| !degree.contains_key(n)) {
            return Err(GatewayError::InvalidWalk(format!("route node {} is not on the walk", node)));
        }

        let mut ends: Vec<Uuid> = degree
            .iter()
            .filter(|(_, d)| **d == 1)
            .map(|(n, _)| *n)
            .collect();
        ends.sort();

        if ends.len() != 2 {
            return Err(GatewayError::InvalidWalk("segments do not form one open path".to_string()));
        }

        let first_segment_ends = ends_by_segment[&segment_ids[0]];
        let start = match element_ids.first() {
            Some(first) if ends.contains(first) => *first,
            _ if ends.contains(&first_segment_ends.0) => first_segment_ends.0,
            _ if ends.contains(&first_segment_ends.1) => first_segment_ends.1,
            _ => ends[0],
        };

        let mut walk = vec![start];
        let mut used: HashSet<Uuid> = HashSet::new();
        let mut current = start;

        while let Some((segment_id, next)) = segment_ids.iter().find_map(|s| {
            if used.contains(s) {
                return None;
            }
            let (a, b) = ends_by_segment[s];
            if a == current {
                Some((*s, b))
            } else if b == current {
                Some((*s, a))
            } else {
                None
            }
        }) {
            used.insert(segment_id);
            walk.push(segment_id);
            walk.push(next);
            current = next;
        }

        if used.len() != segment_ids.len() {
            return Err(GatewayError::InvalidWalk("segments are not connected".to_string()));
        }

        Ok(RouteNetworkWalk::new(walk)?)
    }
}

#[async_trait]
impl RouteNetworkGateway for InMemoryRouteNetwork {
    async fn get_route_network_details(
        &self,
        element_ids: &[Uuid],
        filter: RelatedInterestFilter,
    ) -> Result<RouteNetworkDetails, GatewayError> {
        let elements = element_ids
            .iter()
            .map(|id| {
                self.element_kind(*id)
                    .map(|kind| RouteNetworkElement { id: *id, kind })
                    .ok_or(GatewayError::UnknownElement(*id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let interests = match filter {
            RelatedInterestFilter::None => Vec::new(),
            RelatedInterestFilter::ReferencingElements => {
                let interests = self.interests.read().await;
                let mut related: Vec<RouteNetworkInterest> = interests
                    .values()
                    .filter(|i| i.route_network_element_refs.iter().any(|r| element_ids.contains(r)))
                    .cloned()
                    .collect();
                related.sort_by_key(|i| i.id);
                related
            }
        };

        Ok(RouteNetworkDetails { elements, interests })
    }

    async fn validate_walk_of_interest(
        &self,
        element_ids: &[Uuid],
    ) -> Result<ValidatedRouteNetworkWalk, GatewayError> {
        let walk = self.order_walk(element_ids)?;
        Ok(ValidatedRouteNetworkWalk::from_validated(walk))
    }

    async fn shortest_path_between_route_nodes(
        &self,
        from_node_id: Uuid,
        to_node_id: Uuid,
    ) -> Result<RouteNetworkWalk, GatewayError> {
        let from = *self
            .nodes
            .get(&from_node_id)
            .ok_or(GatewayError::UnknownElement(from_node_id))?;
        let to = *self
            .nodes
            .get(&to_node_id)
            .ok_or(GatewayError::UnknownElement(to_node_id))?;

        let (_, path) = astar(&self.graph, from, |n| n == to, |e| e.weight().length, |_| 0.0)
            .ok_or(GatewayError::NoPath {
                from: from_node_id,
                to: to_node_id,
            })?;

        let mut element_ids = vec![self.graph[path[0]]];
        for pair in path.windows(2) {
            let segment = self
                .graph
                .edges_connecting(pair[0], pair[1])
                .min_by(|a, b| a.weight().length.total_cmp(&b.weight().length))
                .ok_or(GatewayError::NoPath {
                    from: from_node_id,
                    to: to_node_id,
                })?;
            element_ids.push(segment.weight().id);
            element_ids.push(self.graph[pair[1]]);
        }

        Ok(RouteNetworkWalk::new(element_ids)?)
    }

    async fn register_walk_of_interest(
        &self,
        interest_id: Uuid,
        walk: &ValidatedRouteNetworkWalk,
    ) -> Result<RouteNetworkInterest, GatewayError> {
        let mut interests = self.interests.write().await;
        if interests.contains_key(&interest_id) {
            return Err(GatewayError::InterestAlreadyExists(interest_id));
        }

        let interest = RouteNetworkInterest {
            id: interest_id,
            kind: RouteNetworkInterestKind::WalkOfInterest,
            route_network_element_refs: walk.element_ids().to_vec(),
        };
        interests.insert(interest_id, interest.clone());

        debug!(interest_id = %interest_id, segments = walk.segment_count(), "Registered walk of interest");
        Ok(interest)
    }

    async fn register_node_of_interest(
        &self,
        interest_id: Uuid,
        route_node_id: Uuid,
    ) -> Result<RouteNetworkInterest, GatewayError> {
        if !self.nodes.contains_key(&route_node_id) {
            return Err(GatewayError::UnknownElement(route_node_id));
        }

        let mut interests = self.interests.write().await;
        if interests.contains_key(&interest_id) {
            return Err(GatewayError::InterestAlreadyExists(interest_id));
        }

        let interest = RouteNetworkInterest {
            id: interest_id,
            kind: RouteNetworkInterestKind::NodeOfInterest,
            route_network_element_refs: vec![route_node_id],
        };
        interests.insert(interest_id, interest.clone());
        Ok(interest)
    }

    async fn update_walk_of_interest(
        &self,
        interest_id: Uuid,
        walk: &ValidatedRouteNetworkWalk,
    ) -> Result<RouteNetworkInterest, GatewayError> {
        let mut interests = self.interests.write().await;
        let interest = interests
            .get_mut(&interest_id)
            .filter(|i| i.kind == RouteNetworkInterestKind::WalkOfInterest)
            .ok_or(GatewayError::InterestNotFound(interest_id))?;

        interest.route_network_element_refs = walk.element_ids().to_vec();

        debug!(interest_id = %interest_id, segments = walk.segment_count(), "Updated walk of interest");
        Ok(interest.clone())
    }

    async fn unregister_interest(&self, interest_id: Uuid) -> Result<(), GatewayError> {
        self.interests
            .write()
            .await
            .remove(&interest_id)
            .map(|_| ())
            .ok_or(GatewayError::InterestNotFound(interest_id))
    }

    async fn get_walk_of_interest(
        &self,
        interest_id: Uuid,
    ) -> Result<ValidatedRouteNetworkWalk, GatewayError> {
        let interests = self.interests.read().await;
        let interest = interests
            .get(&interest_id)
            .filter(|i| i.kind == RouteNetworkInterestKind::WalkOfInterest)
            .ok_or(GatewayError::InterestNotFound(interest_id))?;

        let walk = RouteNetworkWalk::new(interest.route_network_element_refs.clone())?;
        Ok(ValidatedRouteNetworkWalk::from_validated(walk))
    }
}
