// Copyright (c) 2025 - Cowboy AI, Inc.
//! Route walks and hops from traces
//!
//! A trace knows which span segments it passed and between which route
//! nodes. The route network segments in between come from each
//! equipment's walk of interest:
//!
//! ```text
//! trace:  [X: A→B] [Y: B→C]
//! walks:  X = A─s1─B      Y = C─s2─B
//! route:  A─s1─B─s2─C     (Y's walk sectioned and reversed)
//! ```
//!
//! A routing plan strings together plain route network walks and passages
//! through conduits into one walk plus the hops a cable needs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::{SpanSegmentTrace, SpanSegmentTracer, TraceError};
use crate::domain::{
    RouteNetworkWalk, UtilityNetworkHop, UtilityNetworkHopParentAffix, ValidatedRouteNetworkWalk,
};
use crate::projection::UtilityGraph;
use crate::route_network::RouteNetworkGateway;

/// Concatenate the walk sections covered by each traced segment
///
/// `walks` maps walk of interest id to the walk the equipment occupies.
pub fn assemble_route_walk(
    trace: &SpanSegmentTrace,
    walks: &HashMap<Uuid, RouteNetworkWalk>,
) -> Result<RouteNetworkWalk, TraceError> {
    let mut assembled: Option<RouteNetworkWalk> = None;

    for segment in trace.segments() {
        let walk = walks
            .get(&segment.walk_of_interest_id)
            .ok_or(TraceError::WalkOfInterestNotFound(segment.walk_of_interest_id))?;

        let section = walk.section(segment.from_node_id, segment.to_node_id).ok_or(
            TraceError::RouteNodeNotOnTrace {
                route_node_id: segment.from_node_id,
                span_segment_id: segment.span_segment_id,
            },
        )?;

        assembled = Some(match assembled {
            None => section,
            Some(walk) => walk.concat(&section).ok_or(TraceError::NotContinuous {
                route_node_id: section.from_node_id(),
            })?,
        });
    }

    assembled.ok_or(TraceError::EmptyRoutingPlan)
}

/// Fetch the walks a trace passes and assemble its route walk
pub async fn trace_route_walk(
    gateway: &dyn RouteNetworkGateway,
    trace: &SpanSegmentTrace,
) -> Result<RouteNetworkWalk, TraceError> {
    let mut walks = HashMap::new();
    for segment in trace.segments() {
        if !walks.contains_key(&segment.walk_of_interest_id) {
            let walk = gateway
                .get_walk_of_interest(segment.walk_of_interest_id)
                .await?
                .into_walk();
            walks.insert(segment.walk_of_interest_id, walk);
        }
    }

    assemble_route_walk(trace, &walks)
}

/// Hop riding through every segment of the trace, in trace direction
pub fn hop_from_trace(trace: &SpanSegmentTrace) -> UtilityNetworkHop {
    UtilityNetworkHop {
        from_node_id: trace.from_node_id(),
        to_node_id: trace.to_node_id(),
        parent_affixes: trace
            .segments()
            .iter()
            .map(|s| UtilityNetworkHopParentAffix {
                span_segment_id: s.span_segment_id,
                direction: s.direction,
            })
            .collect(),
    }
}

/// One leg of a cable route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingHop {
    /// Directly through the route network
    RouteNetwork { element_ids: Vec<Uuid> },
    /// Through the conduit a span segment belongs to, entered at a route node
    ThroughConduit {
        start_route_node_id: Uuid,
        span_segment_id: Uuid,
    },
}

/// Walk and hops for placing a cable in the utility network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingPlan {
    pub walk: ValidatedRouteNetworkWalk,
    pub hops: Vec<UtilityNetworkHop>,
}

/// Resolve routing hops into one validated walk
///
/// Each leg must start where the previous one ended. Conduit legs are
/// traced against `graph` and become utility network hops.
pub async fn build_routing_plan(
    graph: &UtilityGraph,
    gateway: &dyn RouteNetworkGateway,
    routing_hops: &[RoutingHop],
) -> Result<RoutingPlan, TraceError> {
    let tracer = SpanSegmentTracer::new(graph);
    let mut assembled: Option<RouteNetworkWalk> = None;
    let mut hops = Vec::new();

    for routing_hop in routing_hops {
        let leg = match routing_hop {
            RoutingHop::RouteNetwork { element_ids } => {
                let walk = gateway.validate_walk_of_interest(element_ids).await?.into_walk();
                match &assembled {
                    Some(so_far) if walk.to_node_id() == so_far.to_node_id() => walk.reversed(),
                    _ => walk,
                }
            }
            RoutingHop::ThroughConduit {
                start_route_node_id,
                span_segment_id,
            } => {
                let trace = tracer
                    .trace_conduit(*span_segment_id)?
                    .starting_at(*start_route_node_id)
                    .ok_or(TraceError::RouteNodeNotOnTrace {
                        route_node_id: *start_route_node_id,
                        span_segment_id: *span_segment_id,
                    })?;

                let walk = trace_route_walk(gateway, &trace).await?;
                hops.push(hop_from_trace(&trace));
                walk
            }
        };

        assembled = Some(match assembled {
            None => leg,
            Some(so_far) => so_far.concat(&leg).ok_or(TraceError::NotContinuous {
                route_node_id: so_far.to_node_id(),
            })?,
        });
    }

    let assembled = assembled.ok_or(TraceError::EmptyRoutingPlan)?;
    let walk = gateway
        .validate_walk_of_interest(assembled.element_ids())
        .await?;

    Ok(RoutingPlan { walk, hops })
}
