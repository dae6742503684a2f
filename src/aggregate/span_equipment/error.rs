// Copyright (c) 2025 - Cowboy AI, Inc.
//! Span equipment business errors

use uuid::Uuid;

use crate::aggregate::error_code::ErrorCode;

/// Command validation error of the span equipment aggregate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanEquipmentError {
    #[error("Span equipment {0} has not been placed")]
    NotPlaced(Uuid),

    #[error("Span equipment {0} already exists")]
    AlreadyPlaced(Uuid),

    #[error("Span equipment {0} has been removed")]
    Removed(Uuid),

    #[error("Walk of interest must contain at least one route segment")]
    EmptyWalk,

    #[error("Manufacturer {0} is not listed by the specification")]
    ManufacturerNotInSpecification(Uuid),

    #[error("Span segment {0} not found in span equipment")]
    SpanSegmentNotFound(Uuid),

    #[error("Structure index {0} is out of bounds")]
    StructureIndexOutOfBounds(usize),

    #[error("Span segment {span_segment_id} does not start or end at route node {route_node_id}")]
    SpanSegmentNotAtRouteNode {
        span_segment_id: Uuid,
        route_node_id: Uuid,
    },

    #[error("Span segment {0} is already connected at that end")]
    SpanSegmentAlreadyConnected(Uuid),

    #[error("Span segment {span_segment_id} is not connected to terminal {terminal_id}")]
    NotConnectedToTerminal {
        span_segment_id: Uuid,
        terminal_id: Uuid,
    },

    #[error("Span segment {0} contains a cable")]
    SpanSegmentContainsCable(Uuid),

    #[error("Conduit segment {0} already contains a cable")]
    ConduitAlreadyContainsCable(Uuid),

    #[error("Cable is already affixed to conduit segment {0}")]
    CableAlreadyAffixed(Uuid),

    #[error("No hop rides through parent segment {0}")]
    HopNotFound(Uuid),

    #[error("Operation requires a cable")]
    ExpectedCable,

    #[error("Operation requires a conduit")]
    ExpectedConduit,

    #[error("Span equipment is already affixed at route node {0}")]
    AlreadyAffixedToNodeContainer(Uuid),

    #[error("Span equipment is not affixed to node container {0}")]
    NotAffixedToNodeContainer(Uuid),

    #[error("Route node {0} is not on the walk of the span equipment")]
    RouteNodeNotOnWalk(Uuid),

    #[error("Route node {route_node_id} is not strictly inside span segment {span_segment_id}")]
    CutNodeNotInterior {
        span_segment_id: Uuid,
        route_node_id: Uuid,
    },

    #[error("No span segments selected")]
    NoSpanSegmentsSelected,

    #[error("Hop through parent segment {0} crosses the cut route node")]
    HopCrossesCutNode(Uuid),

    #[error("Segments are connected at route node {0}")]
    SegmentsConnectedAtRouteNode(Uuid),

    #[error("Cannot revert cut: {0}")]
    CannotRevertCut(String),

    #[error("Cannot merge: {0}")]
    CannotMerge(String),

    #[error("Cannot move: {0}")]
    CannotMove(String),

    #[error("Structure {0} contains a cable")]
    StructureContainsCable(usize),

    #[error("The outer structure cannot be removed")]
    CannotRemoveOuterStructure,

    #[error("Span equipment contains cables")]
    ContainsCables,

    #[error("Specification is not valid for this equipment: {0}")]
    InvalidSpecification(String),

    #[error("Nothing changed")]
    NoChange,
}

impl SpanEquipmentError {
    pub fn code(&self) -> ErrorCode {
        use SpanEquipmentError::*;

        match self {
            NotPlaced(_) => ErrorCode::SpanEquipmentNotFound,
            AlreadyPlaced(_) => ErrorCode::SpanEquipmentAlreadyExists,
            Removed(_) => ErrorCode::SpanEquipmentIsRemoved,
            EmptyWalk => ErrorCode::InvalidWalk,
            ManufacturerNotInSpecification(_) => ErrorCode::ManufacturerNotInSpecification,
            SpanSegmentNotFound(_) => ErrorCode::SpanSegmentNotFound,
            StructureIndexOutOfBounds(_) => ErrorCode::StructureIndexOutOfBounds,
            SpanSegmentNotAtRouteNode { .. } => ErrorCode::SpanSegmentNotAtRouteNode,
            SpanSegmentAlreadyConnected(_) => ErrorCode::SpanSegmentAlreadyConnected,
            NotConnectedToTerminal { .. } => ErrorCode::SpanSegmentNotConnectedToTerminal,
            SpanSegmentContainsCable(_) => ErrorCode::SpanSegmentContainsCable,
            ConduitAlreadyContainsCable(_) => ErrorCode::ConduitAlreadyContainsCable,
            CableAlreadyAffixed(_) => ErrorCode::CableAlreadyAffixedToSegment,
            HopNotFound(_) => ErrorCode::HopNotFound,
            ExpectedCable => ErrorCode::ExpectedCable,
            ExpectedConduit => ErrorCode::ExpectedConduit,
            AlreadyAffixedToNodeContainer(_) => ErrorCode::AlreadyAffixedToNodeContainer,
            NotAffixedToNodeContainer(_) => ErrorCode::NotAffixedToNodeContainer,
            RouteNodeNotOnWalk(_) => ErrorCode::RouteNodeNotOnWalk,
            CutNodeNotInterior { .. } => ErrorCode::CutNodeNotInteriorOfSegment,
            NoSpanSegmentsSelected => ErrorCode::InvalidCommand,
            HopCrossesCutNode(_) => ErrorCode::HopCrossesCutNode,
            SegmentsConnectedAtRouteNode(_) => ErrorCode::SegmentsConnectedAtRouteNode,
            CannotRevertCut(_) => ErrorCode::CannotRevertCut,
            CannotMerge(_) => ErrorCode::CannotMerge,
            CannotMove(_) => ErrorCode::CannotMove,
            StructureContainsCable(_) => ErrorCode::StructureContainsCable,
            CannotRemoveOuterStructure => ErrorCode::CannotRemoveOuterStructure,
            ContainsCables => ErrorCode::SpanEquipmentContainsCable,
            InvalidSpecification(_) => ErrorCode::InvalidSpecification,
            NoChange => ErrorCode::NoChange,
        }
    }
}
