// Copyright (c) 2025 - Cowboy AI, Inc.
//! Cutting segments at route nodes, reverting cuts, shrinking cables
//!
//! ```text
//! before   A ───────────── C          node_of_interest_ids [A, C]
//! cut @B   A ───── B ───── C          node_of_interest_ids [A, B, C]
//!                (1)  (2)             two segments, no terminals at B
//! ```
//!
//! A cut never changes the walk of the equipment. A cable cut is completed
//! by the service: the cable is shrunk to the part before the cut node and
//! the remainder is placed as a new cable.

use std::collections::HashSet;
use uuid::Uuid;

use super::{SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::commands::CommandContext;
use crate::domain::{
    NodeContainerAffix, RouteNetworkWalk, SpanEquipment, UtilityNetworkHop,
};
use crate::events::span_equipment::*;

/// Handle CutSpanSegmentsAtRouteNode
///
/// The walk is the equipment's current walk of interest.
///
/// # Business Rules
/// - The route node must lie on the walk
/// - The route node must be strictly inside every selected segment
/// - Conduit segments carrying a cable cannot be cut
pub fn handle_cut_span_segments(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    route_node_id: Uuid,
    walk: &RouteNetworkWalk,
    span_segment_ids: &[Uuid],
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if span_segment_ids.is_empty() {
        return Err(SpanEquipmentError::NoSpanSegmentsSelected);
    }

    let cut_position = walk
        .node_position(route_node_id)
        .ok_or(SpanEquipmentError::RouteNodeNotOnWalk(route_node_id))?;

    let mut seen = HashSet::new();
    let mut cuts = Vec::with_capacity(span_segment_ids.len());

    for span_segment_id in span_segment_ids {
        if !seen.insert(*span_segment_id) {
            continue;
        }

        let location = equipment
            .locate_segment(*span_segment_id)
            .ok_or(SpanEquipmentError::SpanSegmentNotFound(*span_segment_id))?;
        let segment =
            &equipment.span_structures[location.structure_index].span_segments[location.segment_index];

        if !equipment.is_cable && cable_carrying_segment_ids.contains(span_segment_id) {
            return Err(SpanEquipmentError::SpanSegmentContainsCable(*span_segment_id));
        }

        let from_position = walk.node_position(equipment.node_of_interest_ids[segment.from_node_of_interest_index]);
        let to_position = walk.node_position(equipment.node_of_interest_ids[segment.to_node_of_interest_index]);

        let interior = matches!(
            (from_position, to_position),
            (Some(from), Some(to)) if from < cut_position && cut_position < to
        );

        if !interior {
            return Err(SpanEquipmentError::CutNodeNotInterior {
                span_segment_id: *span_segment_id,
                route_node_id,
            });
        }

        cuts.push(SpanSegmentCutAction {
            old_span_segment_id: *span_segment_id,
            structure_index: location.structure_index,
            new_span_segment_id_1: Uuid::now_v7(),
            new_span_segment_id_2: Uuid::now_v7(),
        });
    }

    let (cut_node_of_interest_index, node_of_interest_inserted) =
        match equipment.node_of_interest_index(route_node_id) {
            Some(index) => (index, false),
            None => {
                let index = equipment
                    .node_of_interest_ids
                    .iter()
                    .filter(|node| {
                        walk.node_position(**node)
                            .map(|p| p < cut_position)
                            .unwrap_or(false)
                    })
                    .count();
                (index, true)
            }
        };

    Ok(SpanEquipmentEvent::SpanSegmentsCut(SpanSegmentsCut {
        header: ctx.header(state.id),
        cut_node_of_interest_id: route_node_id,
        cut_node_of_interest_index,
        node_of_interest_inserted,
        cuts,
    }))
}

/// Handle RevertCut
///
/// Joins, per structure, the segment ending at the node with the one
/// starting there. Structures passing through the node uncut are untouched.
///
/// # Business Rules
/// - The node must be an interior node of interest
/// - The outer structure must be cut at the node
/// - No segment may have a terminal at the node
/// - A conduit half carrying a cable cannot be joined back
pub fn handle_revert_cut(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    route_node_id: Uuid,
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    let index = equipment.node_of_interest_index(route_node_id).ok_or_else(|| {
        SpanEquipmentError::CannotRevertCut(format!(
            "route node {route_node_id} is not a node of interest"
        ))
    })?;

    if equipment.is_end_node(route_node_id) {
        return Err(SpanEquipmentError::CannotRevertCut(format!(
            "route node {route_node_id} is an end of the equipment"
        )));
    }

    let mut reverts = Vec::new();

    for (structure_index, structure) in equipment.active_structures() {
        let ending = structure
            .span_segments
            .iter()
            .find(|s| s.to_node_of_interest_index == index);
        let starting = structure
            .span_segments
            .iter()
            .find(|s| s.from_node_of_interest_index == index);

        match (ending, starting) {
            (Some(kept), Some(removed)) => {
                if kept.to_terminal_id.is_some() || removed.from_terminal_id.is_some() {
                    return Err(SpanEquipmentError::SegmentsConnectedAtRouteNode(route_node_id));
                }
                if !equipment.is_cable {
                    if let Some(carrying) = [kept.id, removed.id]
                        .into_iter()
                        .find(|id| cable_carrying_segment_ids.contains(id))
                    {
                        return Err(SpanEquipmentError::SpanSegmentContainsCable(carrying));
                    }
                }
                reverts.push(SpanSegmentCutRevert {
                    structure_index,
                    kept_span_segment_id: kept.id,
                    removed_span_segment_id: removed.id,
                });
            }
            _ if structure_index == 0 => {
                return Err(SpanEquipmentError::CannotRevertCut(
                    "outer structure is not cut at the route node".to_string(),
                ));
            }
            _ => {}
        }
    }

    Ok(SpanEquipmentEvent::SpanSegmentsCutReverted(
        SpanSegmentsCutReverted {
            header: ctx.header(state.id),
            route_node_id,
            reverts,
        },
    ))
}

/// Handle Shrink
///
/// Truncates the equipment to the nodes of interest `from_index..=to_index`.
/// Every segment must start and end inside that range, so the equipment has
/// to be cut at both new ends first. Hops and container affixes outside the
/// range are dropped.
///
/// # Business Rules
/// - The range must cover at least one route segment
/// - No segment may cross a range end
/// - No hop may cross a range end
pub fn handle_shrink(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    walk: &RouteNetworkWalk,
    from_index: usize,
    to_index: usize,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if from_index >= to_index || to_index >= equipment.node_of_interest_ids.len() {
        return Err(SpanEquipmentError::EmptyWalk);
    }

    for segment in equipment.all_segments() {
        let from = segment.from_node_of_interest_index;
        let to = segment.to_node_of_interest_index;
        let crosses = (from < from_index && to > from_index) || (from < to_index && to > to_index);
        if crosses {
            return Err(SpanEquipmentError::CutNodeNotInterior {
                span_segment_id: segment.id,
                route_node_id: equipment.node_of_interest_ids[if from < from_index { from_index } else { to_index }],
            });
        }
    }

    let from_node_id = equipment.node_of_interest_ids[from_index];
    let to_node_id = equipment.node_of_interest_ids[to_index];

    let range = walk
        .node_position(from_node_id)
        .zip(walk.node_position(to_node_id))
        .ok_or(SpanEquipmentError::RouteNodeNotOnWalk(from_node_id))?;

    let utility_network_hops = hops_within(&equipment.utility_network_hops, walk, range)?;

    let node_container_affixes = affixes_within(&equipment.node_container_affixes, walk, range);

    Ok(SpanEquipmentEvent::Shrunk(SpanEquipmentShrunk {
        header: ctx.header(state.id),
        from_node_of_interest_index: from_index,
        to_node_of_interest_index: to_index,
        utility_network_hops,
        node_container_affixes,
    }))
}

/// Hops and affixes of a cable on either side of a cut node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutPartition {
    pub hops_before: Vec<UtilityNetworkHop>,
    pub hops_after: Vec<UtilityNetworkHop>,
    pub affixes_before: Vec<NodeContainerAffix>,
    pub affixes_after: Vec<NodeContainerAffix>,
}

/// Split hops and container affixes at a route node on the walk
///
/// Affixes at the cut node are kept on both sides. A hop crossing the node
/// fails the split.
pub fn partition_at_route_node(
    equipment: &SpanEquipment,
    walk: &RouteNetworkWalk,
    route_node_id: Uuid,
) -> Result<CutPartition, SpanEquipmentError> {
    let cut = walk
        .node_position(route_node_id)
        .ok_or(SpanEquipmentError::RouteNodeNotOnWalk(route_node_id))?;
    let last = walk.segment_count();

    Ok(CutPartition {
        hops_before: hops_within(&equipment.utility_network_hops, walk, (0, cut))?,
        hops_after: hops_within(&equipment.utility_network_hops, walk, (cut, last))?,
        affixes_before: affixes_within(&equipment.node_container_affixes, walk, (0, cut)),
        affixes_after: affixes_within(&equipment.node_container_affixes, walk, (cut, last)),
    })
}

/// Hops lying inside the walk positions `range`, failing on hops crossing its ends
fn hops_within(
    hops: &[UtilityNetworkHop],
    walk: &RouteNetworkWalk,
    (start, end): (usize, usize),
) -> Result<Vec<UtilityNetworkHop>, SpanEquipmentError> {
    let mut kept = Vec::new();

    for hop in hops {
        let (Some(a), Some(b)) = (walk.node_position(hop.from_node_id), walk.node_position(hop.to_node_id)) else {
            continue;
        };
        let (lo, hi) = (a.min(b), a.max(b));

        if lo >= start && hi <= end {
            kept.push(hop.clone());
        } else if hi > start && lo < end {
            let parent = hop
                .parent_affixes
                .first()
                .map(|a| a.span_segment_id)
                .unwrap_or_default();
            return Err(SpanEquipmentError::HopCrossesCutNode(parent));
        }
    }

    Ok(kept)
}

fn affixes_within(
    affixes: &[NodeContainerAffix],
    walk: &RouteNetworkWalk,
    (start, end): (usize, usize),
) -> Vec<NodeContainerAffix> {
    affixes
        .iter()
        .filter(|a| {
            walk.node_position(a.route_node_id)
                .map(|p| p >= start && p <= end)
                .unwrap_or(false)
        })
        .copied()
        .collect()
}
