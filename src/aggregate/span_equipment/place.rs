// Copyright (c) 2025 - Cowboy AI, Inc.
//! Creation of span equipment
//!
//! New equipment gets one structure per template of its specification, each
//! with a single segment spanning the whole walk:
//!
//! ```text
//! node_of_interest_ids  [from, to]
//! structure 0 (outer)   (0→1)
//! structure 1..n        (0→1)
//! ```

use std::collections::HashMap;
use uuid::Uuid;

use super::{SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::commands::{CommandContext, SpanEquipmentProperties};
use crate::domain::{
    NodeContainerAffix, SpanEquipment, SpanEquipmentSpecification, SpanSegment, SpanStructure,
    UtilityNetworkHop, ValidatedRouteNetworkWalk,
};
use crate::events::span_equipment::*;

/// Handle PlaceSpanEquipmentInRouteNetwork
///
/// # Business Rules
/// - Equipment must not exist yet
/// - Manufacturer, if given, must be listed by the specification
pub fn handle_place_in_route_network(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    specification: &SpanEquipmentSpecification,
    walk_of_interest_id: Uuid,
    walk: &ValidatedRouteNetworkWalk,
    properties: SpanEquipmentProperties,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    check_new(state)?;
    check_manufacturer(specification, properties.manufacturer_id)?;

    if walk.segment_count() == 0 {
        return Err(SpanEquipmentError::EmptyWalk);
    }

    let equipment = new_equipment(
        state.id,
        specification,
        walk_of_interest_id,
        walk,
        Vec::new(),
        properties,
    );

    Ok(SpanEquipmentEvent::PlacedInRouteNetwork(
        SpanEquipmentPlacedInRouteNetwork {
            header: ctx.header(state.id),
            equipment,
        },
    ))
}

/// Handle PlaceSpanEquipmentInUtilityNetwork
///
/// The walk is the one assembled from the hops; every hop must lie on it.
///
/// # Business Rules
/// - Only cables ride through other equipment
/// - At least one hop
pub fn handle_place_in_utility_network(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    specification: &SpanEquipmentSpecification,
    walk_of_interest_id: Uuid,
    walk: &ValidatedRouteNetworkWalk,
    hops: Vec<UtilityNetworkHop>,
    properties: SpanEquipmentProperties,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    check_new(state)?;
    check_manufacturer(specification, properties.manufacturer_id)?;

    if !specification.is_cable {
        return Err(SpanEquipmentError::ExpectedCable);
    }

    if hops.is_empty() {
        return Err(SpanEquipmentError::EmptyWalk);
    }

    for hop in &hops {
        for node in [hop.from_node_id, hop.to_node_id] {
            if !walk.contains_node(node) {
                return Err(SpanEquipmentError::RouteNodeNotOnWalk(node));
            }
        }
    }

    let equipment = new_equipment(
        state.id,
        specification,
        walk_of_interest_id,
        walk,
        hops,
        properties,
    );

    Ok(SpanEquipmentEvent::PlacedInRouteNetwork(
        SpanEquipmentPlacedInRouteNetwork {
            header: ctx.header(state.id),
            equipment,
        },
    ))
}

/// Create the remainder of a cut cable as a new equipment
///
/// `source` is the cable after the cut has been applied. Everything from
/// node-of-interest `from_index` onward is copied with fresh structure and
/// segment ids and no terminal connections. Returns the placement event and
/// the old → new segment id map used to reconnect terminals.
pub fn handle_place_cable_remainder(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    source: &SpanEquipment,
    from_index: usize,
    walk_of_interest_id: Uuid,
    hops: Vec<UtilityNetworkHop>,
    node_container_affixes: Vec<NodeContainerAffix>,
) -> Result<(SpanEquipmentEvent, HashMap<Uuid, Uuid>), SpanEquipmentError> {
    check_new(state)?;

    if !source.is_cable {
        return Err(SpanEquipmentError::ExpectedCable);
    }

    if from_index + 1 >= source.node_of_interest_ids.len() {
        return Err(SpanEquipmentError::EmptyWalk);
    }

    let mut segment_map = HashMap::new();
    let mut span_structures = Vec::with_capacity(source.span_structures.len());

    for (structure_index, structure) in source.span_structures.iter().enumerate() {
        let span_segments = structure
            .span_segments
            .iter()
            .filter(|s| s.from_node_of_interest_index >= from_index)
            .enumerate()
            .map(|(i, s)| {
                let new_id = Uuid::now_v7();
                segment_map.insert(s.id, new_id);
                SpanSegment::new(
                    new_id,
                    structure_index,
                    i + 1,
                    s.from_node_of_interest_index - from_index,
                    s.to_node_of_interest_index - from_index,
                )
            })
            .collect();

        span_structures.push(SpanStructure {
            id: Uuid::now_v7(),
            span_segments,
            ..structure.clone()
        });
    }

    let equipment = SpanEquipment {
        id: state.id,
        walk_of_interest_id,
        node_of_interest_ids: source.node_of_interest_ids[from_index..].to_vec(),
        span_structures,
        utility_network_hops: hops,
        node_container_affixes,
        ..source.clone()
    };

    Ok((
        SpanEquipmentEvent::PlacedInRouteNetwork(SpanEquipmentPlacedInRouteNetwork {
            header: ctx.header(state.id),
            equipment,
        }),
        segment_map,
    ))
}

fn check_new(state: &SpanEquipmentState) -> Result<(), SpanEquipmentError> {
    if state.is_initialized() {
        return Err(SpanEquipmentError::AlreadyPlaced(state.id));
    }
    Ok(())
}

fn check_manufacturer(
    specification: &SpanEquipmentSpecification,
    manufacturer_id: Option<Uuid>,
) -> Result<(), SpanEquipmentError> {
    match manufacturer_id {
        Some(id) if !specification.manufacturer_refs.contains(&id) => {
            Err(SpanEquipmentError::ManufacturerNotInSpecification(id))
        }
        _ => Ok(()),
    }
}

fn new_equipment(
    id: Uuid,
    specification: &SpanEquipmentSpecification,
    walk_of_interest_id: Uuid,
    walk: &ValidatedRouteNetworkWalk,
    utility_network_hops: Vec<UtilityNetworkHop>,
    properties: SpanEquipmentProperties,
) -> SpanEquipment {
    SpanEquipment {
        id,
        specification_id: specification.id,
        walk_of_interest_id,
        node_of_interest_ids: vec![walk.from_node_id(), walk.to_node_id()],
        span_structures: structures_from_specification(specification, 0, 1),
        is_cable: specification.is_cable,
        is_multi_level: specification.is_multi_level(),
        utility_network_hops,
        node_container_affixes: Vec::new(),
        naming_info: properties.naming_info,
        marking_info: properties.marking_info,
        address_info: properties.address_info,
        manufacturer_id: properties.manufacturer_id,
    }
}

/// One structure per template, each with a single segment `from → to`
pub(crate) fn structures_from_specification(
    specification: &SpanEquipmentSpecification,
    from_index: usize,
    to_index: usize,
) -> Vec<SpanStructure> {
    specification
        .root_template
        .flatten()
        .into_iter()
        .enumerate()
        .map(|(structure_index, (parent_position, template))| SpanStructure {
            id: Uuid::now_v7(),
            specification_id: template.span_structure_specification_id,
            level: template.level,
            position: template.position,
            parent_position,
            span_segments: vec![SpanSegment::new(
                Uuid::now_v7(),
                structure_index,
                1,
                from_index,
                to_index,
            )],
            deleted: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::span_equipment::test_support::*;
    use crate::domain::validate_span_equipment;

    #[test]
    fn test_place_creates_structure_per_template() {
        let state = SpanEquipmentState::default_for(id(1));
        let event = handle_place_in_route_network(
            &state,
            &ctx(),
            &multi_conduit_spec(),
            id(2),
            &walk(&[A, S1, B, S2, C]),
            SpanEquipmentProperties::default(),
        )
        .unwrap();

        let state = super::super::apply_event(state, &event);
        let equipment = state.equipment().unwrap();

        assert_eq!(equipment.span_structures.len(), 3);
        assert_eq!(equipment.node_of_interest_ids, vec![A, C]);
        assert!(equipment.is_multi_level);
        assert_eq!(equipment.span_structures[1].parent_position, 1);
        assert_eq!(validate_span_equipment(equipment), Ok(()));
    }

    #[test]
    fn test_place_twice_fails() {
        let state = placed_conduit(id(1), &[A, S1, B]);
        let result = handle_place_in_route_network(
            &state,
            &ctx(),
            &multi_conduit_spec(),
            id(2),
            &walk(&[A, S1, B]),
            SpanEquipmentProperties::default(),
        );
        assert_eq!(result, Err(SpanEquipmentError::AlreadyPlaced(id(1))));
    }

    #[test]
    fn test_unknown_manufacturer_rejected() {
        let state = SpanEquipmentState::default_for(id(1));
        let result = handle_place_in_route_network(
            &state,
            &ctx(),
            &multi_conduit_spec(),
            id(2),
            &walk(&[A, S1, B]),
            SpanEquipmentProperties {
                manufacturer_id: Some(id(666)),
                ..Default::default()
            },
        );
        assert_eq!(
            result.map_err(|e| e.code()),
            Err(crate::aggregate::ErrorCode::ManufacturerNotInSpecification)
        );
    }

    #[test]
    fn test_utility_network_placement_requires_cable() {
        let state = SpanEquipmentState::default_for(id(1));
        let result = handle_place_in_utility_network(
            &state,
            &ctx(),
            &multi_conduit_spec(),
            id(2),
            &walk(&[A, S1, B]),
            vec![],
            SpanEquipmentProperties::default(),
        );
        assert_eq!(result, Err(SpanEquipmentError::ExpectedCable));
    }
}
