// Copyright (c) 2025 - Cowboy AI, Inc.
//! Span Segment Tracing
//!
//! Follows span segments through the junctions that connect them:
//!
//! ```text
//! segment ──to end──> junction ──> next segment ──> junction ──> ...
//! ```
//!
//! A trace stops at an unconnected end, at a terminal of terminal equipment,
//! at a junction with more than one onward neighbour, or when it would
//! revisit a segment.
//!
//! The tracer reads one [`UtilityGraph`] snapshot. It never touches the
//! route network; [`routing`] turns traces into route network walks and
//! utility network hops.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::aggregate::ErrorCode;
use crate::domain::{SpanEquipmentAffixDirection, SpanSegmentEnd};
use crate::projection::UtilityGraph;
use crate::route_network::GatewayError;

pub mod routing;

pub use routing::{
    assemble_route_walk, build_routing_plan, hop_from_trace, trace_route_walk, RoutingHop,
    RoutingPlan,
};

/// Tracing failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    #[error("Span segment {0} not found")]
    SpanSegmentNotFound(Uuid),

    #[error("Span segment {0} does not belong to a conduit")]
    NotAConduit(Uuid),

    #[error("Walk of interest {0} not available")]
    WalkOfInterestNotFound(Uuid),

    #[error("Route node {route_node_id} is not an end of the trace through span segment {span_segment_id}")]
    RouteNodeNotOnTrace {
        route_node_id: Uuid,
        span_segment_id: Uuid,
    },

    #[error("Walk is not continuous at route node {route_node_id}")]
    NotContinuous { route_node_id: Uuid },

    #[error("Routing plan contains no hops")]
    EmptyRoutingPlan,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl TraceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TraceError::SpanSegmentNotFound(_) => ErrorCode::SpanSegmentNotFound,
            TraceError::NotAConduit(_) => ErrorCode::ExpectedConduit,
            TraceError::Gateway(e) => e.code(),
            _ => ErrorCode::TraceFailed,
        }
    }
}

/// One span segment as passed by a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TracedSegment {
    pub span_equipment_id: Uuid,
    pub span_segment_id: Uuid,
    pub structure_index: usize,
    pub walk_of_interest_id: Uuid,
    /// Route node the trace enters the segment at
    pub from_node_id: Uuid,
    /// Route node the trace leaves the segment at
    pub to_node_id: Uuid,
    /// `Forward` when the trace runs with the segment's own from → to
    pub direction: SpanEquipmentAffixDirection,
}

impl TracedSegment {
    pub fn reversed(&self) -> Self {
        Self {
            from_node_id: self.to_node_id,
            to_node_id: self.from_node_id,
            direction: self.direction.reversed(),
            ..*self
        }
    }

    fn exit_end(&self) -> SpanSegmentEnd {
        match self.direction {
            SpanEquipmentAffixDirection::Forward => SpanSegmentEnd::To,
            SpanEquipmentAffixDirection::Backward => SpanSegmentEnd::From,
        }
    }
}

/// Ordered span segments from one end of a trace to the other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentTrace {
    segments: Vec<TracedSegment>,
}

impl SpanSegmentTrace {
    pub fn segments(&self) -> &[TracedSegment] {
        &self.segments
    }

    pub fn span_segment_ids(&self) -> Vec<Uuid> {
        self.segments.iter().map(|s| s.span_segment_id).collect()
    }

    pub fn from_node_id(&self) -> Uuid {
        self.segments[0].from_node_id
    }

    pub fn to_node_id(&self) -> Uuid {
        self.segments[self.segments.len() - 1].to_node_id
    }

    /// Route nodes passed, in trace order
    pub fn route_node_ids(&self) -> Vec<Uuid> {
        let mut nodes = vec![self.from_node_id()];
        nodes.extend(self.segments.iter().map(|s| s.to_node_id));
        nodes
    }

    pub fn reversed(&self) -> Self {
        Self {
            segments: self.segments.iter().rev().map(TracedSegment::reversed).collect(),
        }
    }

    /// The trace running `from_node_id → to_node_id`
    ///
    /// The flag is `true` when the trace had to be reversed.
    pub fn oriented(&self, from_node_id: Uuid, to_node_id: Uuid) -> Option<(Self, bool)> {
        if self.from_node_id() == from_node_id && self.to_node_id() == to_node_id {
            Some((self.clone(), false))
        } else if self.from_node_id() == to_node_id && self.to_node_id() == from_node_id {
            Some((self.reversed(), true))
        } else {
            None
        }
    }

    /// The trace starting at the given end node
    pub fn starting_at(&self, route_node_id: Uuid) -> Option<Self> {
        if self.from_node_id() == route_node_id {
            Some(self.clone())
        } else if self.to_node_id() == route_node_id {
            Some(self.reversed())
        } else {
            None
        }
    }
}

/// Tracer over one graph snapshot
pub struct SpanSegmentTracer<'g> {
    graph: &'g UtilityGraph,
}

impl<'g> SpanSegmentTracer<'g> {
    pub fn new(graph: &'g UtilityGraph) -> Self {
        Self { graph }
    }

    /// Trace in both directions from a span segment
    ///
    /// The result is oriented along the starting segment's own direction.
    pub fn trace(&self, span_segment_id: Uuid) -> Result<SpanSegmentTrace, TraceError> {
        let start = self.traced(span_segment_id, SpanEquipmentAffixDirection::Forward)?;
        let mut visited = HashSet::from([span_segment_id]);

        let downstream = self.follow(start, &mut visited)?;
        let upstream = self.follow(start.reversed(), &mut visited)?;

        let mut segments: Vec<TracedSegment> =
            upstream.iter().rev().map(TracedSegment::reversed).collect();
        segments.push(start);
        segments.extend(downstream);

        Ok(SpanSegmentTrace { segments })
    }

    /// Trace a conduit segment end to end
    ///
    /// Used to find the route network span a conduit currently covers
    /// before a cable is affixed to it.
    pub fn trace_conduit(&self, span_segment_id: Uuid) -> Result<SpanSegmentTrace, TraceError> {
        let equipment = self
            .graph
            .try_get_span_segment_ref(span_segment_id)
            .and_then(|r| r.span_equipment(self.graph))
            .ok_or(TraceError::SpanSegmentNotFound(span_segment_id))?;

        if equipment.is_cable {
            return Err(TraceError::NotAConduit(span_segment_id));
        }

        self.trace(span_segment_id)
    }

    /// Trace several seeds against the same snapshot
    pub fn trace_many(&self, span_segment_ids: &[Uuid]) -> Result<Vec<SpanSegmentTrace>, TraceError> {
        span_segment_ids.iter().map(|id| self.trace(*id)).collect()
    }

    fn traced(
        &self,
        span_segment_id: Uuid,
        direction: SpanEquipmentAffixDirection,
    ) -> Result<TracedSegment, TraceError> {
        let segment_ref = self
            .graph
            .try_get_span_segment_ref(span_segment_id)
            .ok_or(TraceError::SpanSegmentNotFound(span_segment_id))?;
        let equipment = segment_ref
            .span_equipment(self.graph)
            .ok_or(TraceError::SpanSegmentNotFound(span_segment_id))?;
        let segment = segment_ref
            .span_segment(self.graph)
            .ok_or(TraceError::SpanSegmentNotFound(span_segment_id))?;

        let from_node_id = equipment.segment_node_id(segment, SpanSegmentEnd::From);
        let to_node_id = equipment.segment_node_id(segment, SpanSegmentEnd::To);

        let traced = TracedSegment {
            span_equipment_id: equipment.id,
            span_segment_id,
            structure_index: segment_ref.structure_index,
            walk_of_interest_id: equipment.walk_of_interest_id,
            from_node_id,
            to_node_id,
            direction: SpanEquipmentAffixDirection::Forward,
        };

        Ok(match direction {
            SpanEquipmentAffixDirection::Forward => traced,
            SpanEquipmentAffixDirection::Backward => traced.reversed(),
        })
    }

    fn follow(
        &self,
        mut current: TracedSegment,
        visited: &mut HashSet<Uuid>,
    ) -> Result<Vec<TracedSegment>, TraceError> {
        let mut passed = Vec::new();

        loop {
            let segment = self
                .graph
                .try_get_span_segment_ref(current.span_segment_id)
                .and_then(|r| r.span_segment(self.graph))
                .ok_or(TraceError::SpanSegmentNotFound(current.span_segment_id))?;

            let Some(terminal_id) = segment.terminal_id(current.exit_end()) else {
                break;
            };

            match self.graph.try_get_terminal_ref(terminal_id) {
                Some(terminal) if terminal.is_dummy_end() => {}
                _ => break,
            }

            let mut onward = self
                .graph
                .terminal_connections(terminal_id)
                .iter()
                .filter(|c| c.span_segment_id != current.span_segment_id);

            let (Some(next), None) = (onward.next(), onward.next()) else {
                break;
            };

            if !visited.insert(next.span_segment_id) {
                break;
            }

            let direction = match next.end {
                SpanSegmentEnd::From => SpanEquipmentAffixDirection::Forward,
                SpanSegmentEnd::To => SpanEquipmentAffixDirection::Backward,
            };

            current = self.traced(next.span_segment_id, direction)?;
            passed.push(current);
        }

        Ok(passed)
    }
}
