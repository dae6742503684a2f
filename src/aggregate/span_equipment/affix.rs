// Copyright (c) 2025 - Cowboy AI, Inc.
//! Affixing to parent conduits and node containers

use std::collections::HashSet;
use uuid::Uuid;

use super::{SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::commands::CommandContext;
use crate::domain::{
    NodeContainer, NodeContainerAffix, NodeContainerSide, SpanEquipment, SpanSegmentEnd,
    UtilityNetworkHop, ValidatedRouteNetworkWalk,
};
use crate::events::span_equipment::*;

/// Handle AffixSpanEquipmentToNodeContainer
///
/// # Business Rules
/// - The container's route node must lie on the equipment's walk
/// - At most one affix per route node
pub fn handle_affix_to_node_container(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    node_container: &NodeContainer,
    walk: &ValidatedRouteNetworkWalk,
    ingoing_side: NodeContainerSide,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;
    let route_node_id = node_container.route_node_id;

    if equipment.is_affixed_to_container_at(route_node_id) {
        return Err(SpanEquipmentError::AlreadyAffixedToNodeContainer(route_node_id));
    }

    if !walk.contains_node(route_node_id) {
        return Err(SpanEquipmentError::RouteNodeNotOnWalk(route_node_id));
    }

    Ok(SpanEquipmentEvent::AffixedToContainer(
        SpanEquipmentAffixedToContainer {
            header: ctx.header(state.id),
            affix: NodeContainerAffix {
                route_node_id,
                node_container_id: node_container.id,
                ingoing_side,
            },
        },
    ))
}

/// Handle DetachSpanEquipmentFromNodeContainer
///
/// # Business Rules
/// - Must be affixed to the container
/// - Nothing may be connected at the container's route node
pub fn handle_detach_from_node_container(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    node_container_id: Uuid,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    let affix = equipment
        .node_container_affixes
        .iter()
        .find(|a| a.node_container_id == node_container_id)
        .ok_or(SpanEquipmentError::NotAffixedToNodeContainer(node_container_id))?;

    if is_connected_at_node(equipment, affix.route_node_id) {
        return Err(SpanEquipmentError::SegmentsConnectedAtRouteNode(affix.route_node_id));
    }

    Ok(SpanEquipmentEvent::DetachedFromContainer(
        SpanEquipmentDetachedFromContainer {
            header: ctx.header(state.id),
            node_container_id,
        },
    ))
}

/// Handle AffixSpanEquipmentToParent
///
/// The hop has been computed by tracing the parent conduit. The caller
/// passes the parent segments that cannot take another cable.
///
/// # Business Rules
/// - Only cables are affixed to parents
/// - Hop ends must lie on the cable's walk
/// - The cable may ride a parent segment only once
/// - Occupied single-cable segments are rejected
pub fn handle_affix_to_parent(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    walk: &ValidatedRouteNetworkWalk,
    hop: UtilityNetworkHop,
    occupied_parent_segment_ids: &HashSet<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if !equipment.is_cable {
        return Err(SpanEquipmentError::ExpectedCable);
    }

    for node in [hop.from_node_id, hop.to_node_id] {
        if !walk.contains_node(node) {
            return Err(SpanEquipmentError::RouteNodeNotOnWalk(node));
        }
    }

    for affix in &hop.parent_affixes {
        if equipment.rides_through(affix.span_segment_id) {
            return Err(SpanEquipmentError::CableAlreadyAffixed(affix.span_segment_id));
        }
        if occupied_parent_segment_ids.contains(&affix.span_segment_id) {
            return Err(SpanEquipmentError::ConduitAlreadyContainsCable(affix.span_segment_id));
        }
    }

    Ok(SpanEquipmentEvent::AffixedToParent(SpanEquipmentAffixedToParent {
        header: ctx.header(state.id),
        hop,
    }))
}

/// Handle DetachSpanEquipmentFromParent
///
/// Removes the whole hop riding through the given parent segment.
pub fn handle_detach_from_parent(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    parent_span_segment_id: Uuid,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    let hop = equipment
        .utility_network_hops
        .iter()
        .find(|h| h.contains_parent_segment(parent_span_segment_id))
        .cloned()
        .ok_or(SpanEquipmentError::HopNotFound(parent_span_segment_id))?;

    Ok(SpanEquipmentEvent::DetachedFromParent(
        SpanEquipmentDetachedFromParent {
            header: ctx.header(state.id),
            hop,
        },
    ))
}

/// Whether any segment end at the route node has a terminal
pub(crate) fn is_connected_at_node(equipment: &SpanEquipment, route_node_id: Uuid) -> bool {
    let Some(index) = equipment.node_of_interest_index(route_node_id) else {
        return false;
    };

    equipment.all_segments().any(|s| {
        (s.from_node_of_interest_index == index && s.terminal_id(SpanSegmentEnd::From).is_some())
            || (s.to_node_of_interest_index == index && s.terminal_id(SpanSegmentEnd::To).is_some())
    })
}
