// Copyright (c) 2025 - Cowboy AI, Inc.
//! Moving span equipment to a new walk
//!
//! A move keeps the structure tree and every segment. Only the end nodes
//! change; interior nodes of interest must still be visited, in order.

use super::{SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::commands::CommandContext;
use crate::aggregate::span_equipment::affix::is_connected_at_node;
use crate::domain::{RouteNetworkWalk, UtilityNetworkHop, ValidatedRouteNetworkWalk};
use crate::events::span_equipment::*;

/// Handle MoveSpanEquipment
///
/// Also used for MoveWithParent and MoveAsPartOfAffix, where the caller has
/// recomputed the cable's hops: `new_hops` replaces the current hops when
/// given.
///
/// # Business Rules
/// - Interior nodes of interest must lie strictly inside the new walk, in order
/// - Node container affixes must lie on the new walk
/// - An end may only move if nothing is connected there
/// - Every hop must start and end on the new walk
pub fn handle_move(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    current_walk: &RouteNetworkWalk,
    new_walk: &ValidatedRouteNetworkWalk,
    new_hops: Option<Vec<UtilityNetworkHop>>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    let utility_network_hops = new_hops.unwrap_or_else(|| equipment.utility_network_hops.clone());

    if **new_walk == *current_walk && utility_network_hops == equipment.utility_network_hops {
        return Err(SpanEquipmentError::NoChange);
    }

    if new_walk.segment_count() == 0 {
        return Err(SpanEquipmentError::EmptyWalk);
    }

    let last_position = new_walk.segment_count();
    let node_count = equipment.node_of_interest_ids.len();
    let mut previous_position = 0;

    for node in &equipment.node_of_interest_ids[1..node_count - 1] {
        match new_walk.node_position(*node) {
            Some(position) if position > previous_position && position < last_position => {
                previous_position = position;
            }
            _ => {
                return Err(SpanEquipmentError::CannotMove(format!(
                    "route node {node} must stay inside the walk, in order"
                )))
            }
        }
    }

    for affix in &equipment.node_container_affixes {
        if !new_walk.contains_node(affix.route_node_id) {
            return Err(SpanEquipmentError::CannotMove(format!(
                "node container at route node {} is not on the new walk",
                affix.route_node_id
            )));
        }
    }

    for (old_end, new_end) in [
        (equipment.from_node_id(), new_walk.from_node_id()),
        (equipment.to_node_id(), new_walk.to_node_id()),
    ] {
        if old_end != new_end && is_connected_at_node(equipment, old_end) {
            return Err(SpanEquipmentError::SegmentsConnectedAtRouteNode(old_end));
        }
    }

    for hop in &utility_network_hops {
        for node in [hop.from_node_id, hop.to_node_id] {
            if !new_walk.contains_node(node) {
                return Err(SpanEquipmentError::CannotMove(format!(
                    "hop node {node} is not on the new walk"
                )));
            }
        }
    }

    let mut node_of_interest_ids = Vec::with_capacity(node_count);
    node_of_interest_ids.push(new_walk.from_node_id());
    node_of_interest_ids.extend_from_slice(&equipment.node_of_interest_ids[1..node_count - 1]);
    node_of_interest_ids.push(new_walk.to_node_id());

    Ok(SpanEquipmentEvent::Moved(SpanEquipmentMoved {
        header: ctx.header(state.id),
        node_of_interest_ids,
        utility_network_hops,
    }))
}
