// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shared fixtures for span equipment handler tests

use uuid::Uuid;

use super::{apply_event, handle_place_in_route_network, SpanEquipmentState};
use crate::aggregate::commands::{CommandContext, SpanEquipmentProperties, UserContext};
use crate::domain::{
    RouteNetworkWalk, SpanEquipmentSpecification, SpanStructureTemplate, ValidatedRouteNetworkWalk,
};
use crate::events::SpanEquipmentEvent;

pub const A: Uuid = Uuid::from_u128(0xA);
pub const B: Uuid = Uuid::from_u128(0xB);
pub const C: Uuid = Uuid::from_u128(0xC);
pub const D: Uuid = Uuid::from_u128(0xD);
pub const E: Uuid = Uuid::from_u128(0xE);
pub const S1: Uuid = Uuid::from_u128(0x51);
pub const S2: Uuid = Uuid::from_u128(0x52);
pub const S3: Uuid = Uuid::from_u128(0x53);
pub const S4: Uuid = Uuid::from_u128(0x54);

pub const OUTER_SPEC: Uuid = Uuid::from_u128(0x1000);
pub const RED_TUBE_SPEC: Uuid = Uuid::from_u128(0x1001);
pub const BLUE_TUBE_SPEC: Uuid = Uuid::from_u128(0x1002);
pub const FIBER_SPEC: Uuid = Uuid::from_u128(0x1003);

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn ctx() -> CommandContext {
    CommandContext::new(
        id(0xC0),
        UserContext::new("test-user"),
        "2025-03-01T10:00:00Z".parse().unwrap(),
    )
}

pub fn walk(elements: &[Uuid]) -> ValidatedRouteNetworkWalk {
    ValidatedRouteNetworkWalk::from_validated(RouteNetworkWalk::new(elements.to_vec()).unwrap())
}

/// Outer conduit with a red and a blue inner tube
pub fn multi_conduit_spec() -> SpanEquipmentSpecification {
    SpanEquipmentSpecification {
        id: id(0x2000),
        category: "Conduit".to_string(),
        name: "Ø40 2x10".to_string(),
        is_cable: false,
        root_template: SpanStructureTemplate {
            span_structure_specification_id: OUTER_SPEC,
            level: 1,
            position: 1,
            child_templates: vec![
                SpanStructureTemplate::leaf(RED_TUBE_SPEC, 2, 1),
                SpanStructureTemplate::leaf(BLUE_TUBE_SPEC, 2, 2),
            ],
        },
        manufacturer_refs: vec![id(0x3000)],
    }
}

/// Single tube conduit
pub fn single_conduit_spec() -> SpanEquipmentSpecification {
    SpanEquipmentSpecification {
        id: id(0x2001),
        category: "Conduit".to_string(),
        name: "Ø12".to_string(),
        is_cable: false,
        root_template: SpanStructureTemplate::leaf(RED_TUBE_SPEC, 1, 1),
        manufacturer_refs: vec![],
    }
}

/// Cable with jacket and one fiber group
pub fn cable_spec() -> SpanEquipmentSpecification {
    SpanEquipmentSpecification {
        id: id(0x2002),
        category: "FiberCable".to_string(),
        name: "12 fiber".to_string(),
        is_cable: true,
        root_template: SpanStructureTemplate {
            span_structure_specification_id: OUTER_SPEC,
            level: 1,
            position: 1,
            child_templates: vec![SpanStructureTemplate::leaf(FIBER_SPEC, 2, 1)],
        },
        manufacturer_refs: vec![],
    }
}

pub fn placed(
    span_equipment_id: Uuid,
    specification: &SpanEquipmentSpecification,
    elements: &[Uuid],
) -> SpanEquipmentState {
    let state = SpanEquipmentState::default_for(span_equipment_id);
    let event = handle_place_in_route_network(
        &state,
        &ctx(),
        specification,
        id(span_equipment_id.as_u128() + 0x100_0000),
        &walk(elements),
        SpanEquipmentProperties::default(),
    )
    .unwrap();
    apply_event(state, &event)
}

pub fn placed_conduit(span_equipment_id: Uuid, elements: &[Uuid]) -> SpanEquipmentState {
    placed(span_equipment_id, &multi_conduit_spec(), elements)
}

pub fn placed_cable(span_equipment_id: Uuid, elements: &[Uuid]) -> SpanEquipmentState {
    placed(span_equipment_id, &cable_spec(), elements)
}

pub fn apply(state: SpanEquipmentState, event: &SpanEquipmentEvent) -> SpanEquipmentState {
    apply_event(state, event)
}

/// Segment id of a structure at a sequence position (1-based)
pub fn segment_id(state: &SpanEquipmentState, structure_index: usize, sequence_number: usize) -> Uuid {
    state.equipment().unwrap().span_structures[structure_index].span_segments[sequence_number - 1].id
}
