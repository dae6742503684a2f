// Copyright (c) 2025 - Cowboy AI, Inc.
//! Span Equipment Domain Events
//!
//! Every change to a conduit or cable is one of these facts. Events carry
//! exactly what `apply_event` needs to reproduce the change; identifiers of
//! new segments are chosen by the command handler, never during replay.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventHeader;
use crate::domain::{
    AddressInfo, MarkingInfo, NamingInfo, NodeContainerAffix, SpanEquipment, SpanStructure,
    SpanSegmentToTerminalConnectionDirection, UtilityNetworkHop,
};

/// Span Equipment Domain Events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpanEquipmentEvent {
    /// Equipment was created on a walk of interest
    PlacedInRouteNetwork(SpanEquipmentPlacedInRouteNetwork),

    /// Cable now rides through parent conduit segments
    AffixedToParent(SpanEquipmentAffixedToParent),

    /// Cable no longer rides through a parent conduit
    DetachedFromParent(SpanEquipmentDetachedFromParent),

    /// Equipment terminates inside a node container
    AffixedToContainer(SpanEquipmentAffixedToContainer),

    /// Equipment no longer terminates inside a node container
    DetachedFromContainer(SpanEquipmentDetachedFromContainer),

    /// Conduit segments joined through junction terminals
    SpanSegmentsConnectedToSimpleTerminals(SpanSegmentsConnectedToSimpleTerminals),

    /// Cable segments attached to terminals
    SpanSegmentsConnectedToTerminals(SpanSegmentsConnectedToTerminals),

    /// Segment ends released from their terminals
    SpanSegmentsDisconnectedFromTerminals(SpanSegmentsDisconnectedFromTerminals),

    /// Segments split in two at a route node
    SpanSegmentsCut(SpanSegmentsCut),

    /// Previously cut segments joined back together
    SpanSegmentsCutReverted(SpanSegmentsCutReverted),

    /// Another equipment was absorbed at a shared end node
    Merged(SpanEquipmentMerged),

    /// Walk ends and/or hops changed
    Moved(SpanEquipmentMoved),

    /// Walk truncated to a node-of-interest range
    Shrunk(SpanEquipmentShrunk),

    /// Inner structures added
    StructuresAdded(AdditionalStructuresAdded),

    /// Inner structure removed
    StructureRemoved(SpanStructureRemoved),

    /// Specification swapped
    SpecificationChanged(SpanEquipmentSpecificationChanged),

    NamingInfoChanged(SpanEquipmentNamingInfoChanged),

    MarkingInfoChanged(SpanEquipmentMarkingInfoChanged),

    AddressInfoChanged(SpanEquipmentAddressInfoChanged),

    ManufacturerChanged(SpanEquipmentManufacturerChanged),

    /// Equipment deleted
    Removed(SpanEquipmentRemoved),
}

impl SpanEquipmentEvent {
    pub fn header(&self) -> &EventHeader {
        use SpanEquipmentEvent::*;

        match self {
            PlacedInRouteNetwork(e) => &e.header,
            AffixedToParent(e) => &e.header,
            DetachedFromParent(e) => &e.header,
            AffixedToContainer(e) => &e.header,
            DetachedFromContainer(e) => &e.header,
            SpanSegmentsConnectedToSimpleTerminals(e) => &e.header,
            SpanSegmentsConnectedToTerminals(e) => &e.header,
            SpanSegmentsDisconnectedFromTerminals(e) => &e.header,
            SpanSegmentsCut(e) => &e.header,
            SpanSegmentsCutReverted(e) => &e.header,
            Merged(e) => &e.header,
            Moved(e) => &e.header,
            Shrunk(e) => &e.header,
            StructuresAdded(e) => &e.header,
            StructureRemoved(e) => &e.header,
            SpecificationChanged(e) => &e.header,
            NamingInfoChanged(e) => &e.header,
            MarkingInfoChanged(e) => &e.header,
            AddressInfoChanged(e) => &e.header,
            ManufacturerChanged(e) => &e.header,
            Removed(e) => &e.header,
        }
    }

    /// Human-readable event type name
    pub fn event_type_name(&self) -> &'static str {
        use SpanEquipmentEvent::*;

        match self {
            PlacedInRouteNetwork(_) => "SpanEquipmentPlacedInRouteNetwork",
            AffixedToParent(_) => "SpanEquipmentAffixedToParent",
            DetachedFromParent(_) => "SpanEquipmentDetachedFromParent",
            AffixedToContainer(_) => "SpanEquipmentAffixedToContainer",
            DetachedFromContainer(_) => "SpanEquipmentDetachedFromContainer",
            SpanSegmentsConnectedToSimpleTerminals(_) => "SpanSegmentsConnectedToSimpleTerminals",
            SpanSegmentsConnectedToTerminals(_) => "SpanSegmentsConnectedToTerminals",
            SpanSegmentsDisconnectedFromTerminals(_) => "SpanSegmentsDisconnectedFromTerminals",
            SpanSegmentsCut(_) => "SpanSegmentsCut",
            SpanSegmentsCutReverted(_) => "SpanSegmentsCutReverted",
            Merged(_) => "SpanEquipmentMerged",
            Moved(_) => "SpanEquipmentMoved",
            Shrunk(_) => "SpanEquipmentShrunk",
            StructuresAdded(_) => "AdditionalStructuresAdded",
            StructureRemoved(_) => "SpanStructureRemoved",
            SpecificationChanged(_) => "SpanEquipmentSpecificationChanged",
            NamingInfoChanged(_) => "SpanEquipmentNamingInfoChanged",
            MarkingInfoChanged(_) => "SpanEquipmentMarkingInfoChanged",
            AddressInfoChanged(_) => "SpanEquipmentAddressInfoChanged",
            ManufacturerChanged(_) => "SpanEquipmentManufacturerChanged",
            Removed(_) => "SpanEquipmentRemoved",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentPlacedInRouteNetwork {
    #[serde(flatten)]
    pub header: EventHeader,

    /// Complete equipment as created from its specification
    pub equipment: SpanEquipment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentAffixedToParent {
    #[serde(flatten)]
    pub header: EventHeader,
    pub hop: UtilityNetworkHop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentDetachedFromParent {
    #[serde(flatten)]
    pub header: EventHeader,
    pub hop: UtilityNetworkHop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentAffixedToContainer {
    #[serde(flatten)]
    pub header: EventHeader,
    pub affix: NodeContainerAffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentDetachedFromContainer {
    #[serde(flatten)]
    pub header: EventHeader,
    pub node_container_id: Uuid,
}

/// One segment end attached to a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentToTerminalConnect {
    pub span_segment_id: Uuid,
    pub terminal_id: Uuid,
    pub direction: SpanSegmentToTerminalConnectionDirection,
}

/// A segment paired with a terminal it is or should be linked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentTerminalRef {
    pub span_segment_id: Uuid,
    pub terminal_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentsConnectedToSimpleTerminals {
    #[serde(flatten)]
    pub header: EventHeader,
    pub connects: Vec<SpanSegmentToTerminalConnect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentsConnectedToTerminals {
    #[serde(flatten)]
    pub header: EventHeader,
    pub connects: Vec<SpanSegmentToTerminalConnect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentsDisconnectedFromTerminals {
    #[serde(flatten)]
    pub header: EventHeader,
    pub disconnects: Vec<SpanSegmentTerminalRef>,
}

/// Replacement of one segment by two
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentCutAction {
    pub old_span_segment_id: Uuid,
    pub structure_index: usize,
    /// Part before the cut node
    pub new_span_segment_id_1: Uuid,
    /// Part after the cut node
    pub new_span_segment_id_2: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentsCut {
    #[serde(flatten)]
    pub header: EventHeader,
    pub cut_node_of_interest_id: Uuid,
    /// Position the node takes in `node_of_interest_ids`
    pub cut_node_of_interest_index: usize,
    /// Whether the node had to be inserted into `node_of_interest_ids`
    pub node_of_interest_inserted: bool,
    pub cuts: Vec<SpanSegmentCutAction>,
}

/// Join of two segments meeting at a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentCutRevert {
    pub structure_index: usize,
    /// Segment ending at the node; survives with the merged extent
    pub kept_span_segment_id: Uuid,
    /// Segment starting at the node; disappears
    pub removed_span_segment_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanSegmentsCutReverted {
    #[serde(flatten)]
    pub header: EventHeader,
    pub route_node_id: Uuid,
    pub reverts: Vec<SpanSegmentCutRevert>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentMerged {
    #[serde(flatten)]
    pub header: EventHeader,
    pub merged_span_equipment_id: Uuid,
    pub node_of_interest_ids: Vec<Uuid>,
    pub span_structures: Vec<SpanStructure>,
    pub node_container_affixes: Vec<NodeContainerAffix>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentMoved {
    #[serde(flatten)]
    pub header: EventHeader,
    pub node_of_interest_ids: Vec<Uuid>,
    pub utility_network_hops: Vec<UtilityNetworkHop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentShrunk {
    #[serde(flatten)]
    pub header: EventHeader,
    /// Inclusive range of node-of-interest positions that remain
    pub from_node_of_interest_index: usize,
    pub to_node_of_interest_index: usize,
    /// Hops still lying on the shortened walk
    pub utility_network_hops: Vec<UtilityNetworkHop>,
    /// Container affixes still lying on the shortened walk
    pub node_container_affixes: Vec<NodeContainerAffix>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalStructuresAdded {
    #[serde(flatten)]
    pub header: EventHeader,
    pub span_structures: Vec<SpanStructure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanStructureRemoved {
    #[serde(flatten)]
    pub header: EventHeader,
    pub structure_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentSpecificationChanged {
    #[serde(flatten)]
    pub header: EventHeader,
    pub specification_id: Uuid,
    pub is_multi_level: bool,
    /// New structure specification per existing structure index
    pub structure_specification_ids: Vec<(usize, Uuid)>,
    pub added_structures: Vec<SpanStructure>,
    pub removed_structure_indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentNamingInfoChanged {
    #[serde(flatten)]
    pub header: EventHeader,
    pub naming_info: Option<NamingInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentMarkingInfoChanged {
    #[serde(flatten)]
    pub header: EventHeader,
    pub marking_info: Option<MarkingInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentAddressInfoChanged {
    #[serde(flatten)]
    pub header: EventHeader,
    pub address_info: Option<AddressInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentManufacturerChanged {
    #[serde(flatten)]
    pub header: EventHeader,
    pub manufacturer_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentRemoved {
    #[serde(flatten)]
    pub header: EventHeader,
}
