// Copyright (c) 2025 - Cowboy AI, Inc.
//! Span Equipment Value Objects
//!
//! A span equipment is a conduit or a cable occupying a walk in the route
//! network. It is a small tree:
//!
//! ```text
//! SpanEquipment
//!  ├── node_of_interest_ids   [A, C, D]        route nodes, walk order
//!  └── span_structures
//!       ├── [0] outer         segments: (0→1) (1→2)
//!       ├── [1] inner tube    segments: (0→2)
//!       └── [2] inner tube    segments: (0→1) (1→2)
//! ```
//!
//! Segments reference positions in `node_of_interest_ids`, never route
//! node ids directly, so cutting at a new node only shifts indices.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::properties::{AddressInfo, MarkingInfo, NamingInfo};

/// One end of a span segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanSegmentEnd {
    From,
    To,
}

impl SpanSegmentEnd {
    pub fn opposite(self) -> Self {
        match self {
            SpanSegmentEnd::From => SpanSegmentEnd::To,
            SpanSegmentEnd::To => SpanSegmentEnd::From,
        }
    }
}

/// Direction of a segment/terminal connection
///
/// A segment flowing *into* a terminal is connected at its to-end, a segment
/// flowing *out of* a terminal at its from-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanSegmentToTerminalConnectionDirection {
    FromSpanSegmentToTerminal,
    FromTerminalToSpanSegment,
}

impl SpanSegmentToTerminalConnectionDirection {
    /// Direction for a connection made at the given segment end
    pub fn for_end(end: SpanSegmentEnd) -> Self {
        match end {
            SpanSegmentEnd::To => Self::FromSpanSegmentToTerminal,
            SpanSegmentEnd::From => Self::FromTerminalToSpanSegment,
        }
    }

    /// Segment end the connection is made at
    pub fn segment_end(self) -> SpanSegmentEnd {
        match self {
            Self::FromSpanSegmentToTerminal => SpanSegmentEnd::To,
            Self::FromTerminalToSpanSegment => SpanSegmentEnd::From,
        }
    }
}

/// Direction of a child relative to the parent segment it rides through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpanEquipmentAffixDirection {
    Forward,
    Backward,
}

impl SpanEquipmentAffixDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Side of a node container an equipment enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeContainerSide {
    North,
    East,
    South,
    West,
}

/// Atomic graph edge of a span structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegment {
    pub id: Uuid,
    pub structure_index: usize,
    pub sequence_number: usize,
    pub from_node_of_interest_index: usize,
    pub to_node_of_interest_index: usize,
    pub from_terminal_id: Option<Uuid>,
    pub to_terminal_id: Option<Uuid>,
}

impl SpanSegment {
    /// A segment with no terminal connections
    pub fn new(id: Uuid, structure_index: usize, sequence_number: usize, from: usize, to: usize) -> Self {
        Self {
            id,
            structure_index,
            sequence_number,
            from_node_of_interest_index: from,
            to_node_of_interest_index: to,
            from_terminal_id: None,
            to_terminal_id: None,
        }
    }

    pub fn node_of_interest_index(&self, end: SpanSegmentEnd) -> usize {
        match end {
            SpanSegmentEnd::From => self.from_node_of_interest_index,
            SpanSegmentEnd::To => self.to_node_of_interest_index,
        }
    }

    pub fn terminal_id(&self, end: SpanSegmentEnd) -> Option<Uuid> {
        match end {
            SpanSegmentEnd::From => self.from_terminal_id,
            SpanSegmentEnd::To => self.to_terminal_id,
        }
    }

    pub fn set_terminal_id(&mut self, end: SpanSegmentEnd, terminal_id: Option<Uuid>) {
        match end {
            SpanSegmentEnd::From => self.from_terminal_id = terminal_id,
            SpanSegmentEnd::To => self.to_terminal_id = terminal_id,
        }
    }

    /// End of this segment connected to the given terminal, if any
    pub fn end_connected_to(&self, terminal_id: Uuid) -> Option<SpanSegmentEnd> {
        if self.from_terminal_id == Some(terminal_id) {
            Some(SpanSegmentEnd::From)
        } else if self.to_terminal_id == Some(terminal_id) {
            Some(SpanSegmentEnd::To)
        } else {
            None
        }
    }

    pub fn is_connected(&self) -> bool {
        self.from_terminal_id.is_some() || self.to_terminal_id.is_some()
    }
}

/// One tube / fiber-group level of a span equipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanStructure {
    pub id: Uuid,
    pub specification_id: Uuid,
    pub level: u32,
    pub position: u32,
    pub parent_position: u32,
    pub span_segments: Vec<SpanSegment>,
    pub deleted: bool,
}

/// A sub-range of a child's walk threaded through parent segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityNetworkHop {
    pub from_node_id: Uuid,
    pub to_node_id: Uuid,
    pub parent_affixes: Vec<UtilityNetworkHopParentAffix>,
}

impl UtilityNetworkHop {
    pub fn contains_parent_segment(&self, span_segment_id: Uuid) -> bool {
        self.parent_affixes
            .iter()
            .any(|a| a.span_segment_id == span_segment_id)
    }

    /// Same hop seen from the other end of the child
    pub fn reversed(&self) -> Self {
        Self {
            from_node_id: self.to_node_id,
            to_node_id: self.from_node_id,
            parent_affixes: self
                .parent_affixes
                .iter()
                .rev()
                .map(|a| UtilityNetworkHopParentAffix {
                    span_segment_id: a.span_segment_id,
                    direction: a.direction.reversed(),
                })
                .collect(),
        }
    }
}

/// One parent segment a hop rides through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilityNetworkHopParentAffix {
    pub span_segment_id: Uuid,
    pub direction: SpanEquipmentAffixDirection,
}

/// Termination of a span equipment inside a node container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerAffix {
    pub route_node_id: Uuid,
    pub node_container_id: Uuid,
    pub ingoing_side: NodeContainerSide,
}

/// Position of a segment inside its equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanSegmentLocation {
    pub structure_index: usize,
    pub segment_index: usize,
}

/// A conduit or cable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipment {
    pub id: Uuid,
    pub specification_id: Uuid,
    pub walk_of_interest_id: Uuid,
    pub node_of_interest_ids: Vec<Uuid>,
    pub span_structures: Vec<SpanStructure>,
    pub is_cable: bool,
    pub is_multi_level: bool,
    pub utility_network_hops: Vec<UtilityNetworkHop>,
    pub node_container_affixes: Vec<NodeContainerAffix>,
    pub naming_info: Option<NamingInfo>,
    pub marking_info: Option<MarkingInfo>,
    pub address_info: Option<AddressInfo>,
    pub manufacturer_id: Option<Uuid>,
}

impl SpanEquipment {
    pub fn from_node_id(&self) -> Uuid {
        self.node_of_interest_ids[0]
    }

    pub fn to_node_id(&self) -> Uuid {
        self.node_of_interest_ids[self.node_of_interest_ids.len() - 1]
    }

    pub fn node_of_interest_index(&self, route_node_id: Uuid) -> Option<usize> {
        self.node_of_interest_ids
            .iter()
            .position(|id| *id == route_node_id)
    }

    /// Whether the route node is the first or last node of the walk
    pub fn is_end_node(&self, route_node_id: Uuid) -> bool {
        self.from_node_id() == route_node_id || self.to_node_id() == route_node_id
    }

    pub fn locate_segment(&self, span_segment_id: Uuid) -> Option<SpanSegmentLocation> {
        self.span_structures
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.deleted)
            .find_map(|(structure_index, structure)| {
                structure
                    .span_segments
                    .iter()
                    .position(|seg| seg.id == span_segment_id)
                    .map(|segment_index| SpanSegmentLocation {
                        structure_index,
                        segment_index,
                    })
            })
    }

    pub fn span_segment(&self, span_segment_id: Uuid) -> Option<&SpanSegment> {
        self.locate_segment(span_segment_id).map(|loc| {
            &self.span_structures[loc.structure_index].span_segments[loc.segment_index]
        })
    }

    pub fn span_segment_mut(&mut self, span_segment_id: Uuid) -> Option<&mut SpanSegment> {
        let loc = self.locate_segment(span_segment_id)?;
        Some(&mut self.span_structures[loc.structure_index].span_segments[loc.segment_index])
    }

    /// Route node id at a segment end
    pub fn segment_node_id(&self, segment: &SpanSegment, end: SpanSegmentEnd) -> Uuid {
        self.node_of_interest_ids[segment.node_of_interest_index(end)]
    }

    /// Which end of the segment touches the route node, if any
    pub fn segment_end_at_node(&self, segment: &SpanSegment, route_node_id: Uuid) -> Option<SpanSegmentEnd> {
        let index = self.node_of_interest_index(route_node_id)?;
        if segment.from_node_of_interest_index == index {
            Some(SpanSegmentEnd::From)
        } else if segment.to_node_of_interest_index == index {
            Some(SpanSegmentEnd::To)
        } else {
            None
        }
    }

    /// Structures that have not been removed, with their index
    pub fn active_structures(&self) -> impl Iterator<Item = (usize, &SpanStructure)> {
        self.span_structures
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.deleted)
    }

    /// Every live segment of the equipment
    pub fn all_segments(&self) -> impl Iterator<Item = &SpanSegment> {
        self.active_structures()
            .flat_map(|(_, s)| s.span_segments.iter())
    }

    pub fn is_affixed_to_container_at(&self, route_node_id: Uuid) -> bool {
        self.node_container_affixes
            .iter()
            .any(|a| a.route_node_id == route_node_id)
    }

    /// Whether any hop rides through the given parent segment
    pub fn rides_through(&self, parent_span_segment_id: Uuid) -> bool {
        self.utility_network_hops
            .iter()
            .any(|h| h.contains_parent_segment(parent_span_segment_id))
    }
}
