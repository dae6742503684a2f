// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stable error codes for user-facing failures
//!
//! Every business error of every aggregate maps to one code. Callers match
//! on the code; the message is for humans.

use serde::{Deserialize, Serialize};

/// User-facing error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidCommand,
    NoChange,

    SpecificationNotFound,
    SpecificationAlreadyExists,
    InvalidSpecification,
    ManufacturerNotInSpecification,

    InvalidWalk,
    RouteNetworkError,
    TraceFailed,

    SpanEquipmentNotFound,
    SpanEquipmentAlreadyExists,
    SpanEquipmentIsRemoved,
    SpanSegmentNotFound,
    SpanSegmentNotAtRouteNode,
    SpanSegmentAlreadyConnected,
    SpanSegmentNotConnectedToTerminal,
    SpanSegmentContainsCable,
    SpanEquipmentContainsCable,
    ConduitAlreadyContainsCable,
    CableAlreadyAffixedToSegment,
    HopNotFound,
    ExpectedCable,
    ExpectedConduit,
    StructureIndexOutOfBounds,
    StructureContainsCable,
    CannotRemoveOuterStructure,
    SegmentsConnectedAtRouteNode,

    AlreadyAffixedToNodeContainer,
    NotAffixedToNodeContainer,
    RouteNodeNotOnWalk,

    CutNodeNotInteriorOfSegment,
    CannotCutMultipleCables,
    HopCrossesCutNode,
    CannotRevertCut,
    CannotMerge,
    CannotMove,

    MismatchedSegmentCounts,
    CannotConnectInnerToOuter,
    UTurnNotAllowed,
    TerminalAlreadyConnected,
    TerminalNotFound,

    NodeContainerNotFound,
    NodeContainerAlreadyExists,
    NodeContainerNotEmpty,
    RackNotFound,
    RackNameAlreadyExists,
    RackSpaceOccupied,

    TerminalEquipmentNotFound,
    TerminalEquipmentAlreadyExists,
    TerminalStructureNotFound,
    TerminalStructureConnected,

    ConcurrencyConflict,
    EventStoreUnavailable,
}
