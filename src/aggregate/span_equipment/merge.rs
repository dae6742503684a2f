// Copyright (c) 2025 - Cowboy AI, Inc.
//! Merging two conduits that meet end to end
//!
//! ```text
//! survivor  A ════════ B            other  B ════════ C   (or C ════ B)
//! merged    A ═══════════════════ C
//! ```
//!
//! The other equipment is oriented to follow the survivor's direction, its
//! segments are appended (or prepended), and the segments meeting at the
//! merge node are joined. The survivor keeps its segment ids.

use std::collections::HashSet;
use uuid::Uuid;

use super::{renumber, SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::commands::CommandContext;
use crate::aggregate::span_equipment::affix::is_connected_at_node;
use crate::domain::{SpanEquipment, SpanSegment, SpanStructure};
use crate::events::span_equipment::*;

/// Handle MergeSpanEquipment
///
/// Emits the merge event for the survivor. The caller removes `other`.
///
/// # Business Rules
/// - Both are conduits of the same specification
/// - The route node is an end of both walks
/// - Neither carries a cable in any segment
/// - Nothing is connected at the route node on either side
/// - Neither is affixed to a node container at the route node
pub fn handle_merge(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    other: &SpanEquipment,
    route_node_id: Uuid,
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let survivor = state.equipment()?;

    check_mergeable(survivor, other, route_node_id, cable_carrying_segment_ids)?;

    let append = survivor.to_node_id() == route_node_id;

    // other must run towards the node when prepended, away from it when appended
    let other = if append == (other.from_node_id() == route_node_id) {
        other.clone()
    } else {
        reversed(other)
    };

    let merged = if append {
        join(survivor, &other, true)
    } else {
        join(&other, survivor, false)
    };

    let mut node_container_affixes = survivor.node_container_affixes.clone();
    node_container_affixes.extend(other.node_container_affixes.iter().copied());

    Ok(SpanEquipmentEvent::Merged(SpanEquipmentMerged {
        header: ctx.header(state.id),
        merged_span_equipment_id: other.id,
        node_of_interest_ids: merged.node_of_interest_ids,
        span_structures: merged.span_structures,
        node_container_affixes,
    }))
}

fn check_mergeable(
    survivor: &SpanEquipment,
    other: &SpanEquipment,
    route_node_id: Uuid,
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<(), SpanEquipmentError> {
    if survivor.id == other.id {
        return Err(SpanEquipmentError::CannotMerge(
            "span equipment cannot be merged with itself".to_string(),
        ));
    }

    if survivor.is_cable || other.is_cable {
        return Err(SpanEquipmentError::ExpectedConduit);
    }

    if survivor.specification_id != other.specification_id {
        return Err(SpanEquipmentError::CannotMerge(
            "span equipment have different specifications".to_string(),
        ));
    }

    if !survivor.is_end_node(route_node_id) || !other.is_end_node(route_node_id) {
        return Err(SpanEquipmentError::CannotMerge(format!(
            "route node {route_node_id} is not an end of both span equipment"
        )));
    }

    for equipment in [survivor, other] {
        if let Some(segment) = equipment
            .all_segments()
            .find(|s| cable_carrying_segment_ids.contains(&s.id))
        {
            return Err(SpanEquipmentError::SpanSegmentContainsCable(segment.id));
        }

        if is_connected_at_node(equipment, route_node_id) {
            return Err(SpanEquipmentError::SegmentsConnectedAtRouteNode(route_node_id));
        }

        if equipment.is_affixed_to_container_at(route_node_id) {
            return Err(SpanEquipmentError::CannotMerge(format!(
                "span equipment {} is affixed to a node container at the route node",
                equipment.id
            )));
        }
    }

    let survivor_specs: Vec<Uuid> = survivor.active_structures().map(|(_, s)| s.specification_id).collect();
    let other_specs: Vec<Uuid> = other.active_structures().map(|(_, s)| s.specification_id).collect();

    if survivor_specs != other_specs {
        return Err(SpanEquipmentError::CannotMerge(
            "span structures do not match".to_string(),
        ));
    }

    Ok(())
}

/// Equipment seen from its other end
fn reversed(equipment: &SpanEquipment) -> SpanEquipment {
    let last = equipment.node_of_interest_ids.len() - 1;
    let mut reversed = equipment.clone();

    reversed.node_of_interest_ids.reverse();
    reversed.utility_network_hops = equipment.utility_network_hops.iter().map(|h| h.reversed()).collect();

    for structure in reversed.span_structures.iter_mut() {
        structure.span_segments.reverse();
        for segment in structure.span_segments.iter_mut() {
            let from = segment.from_node_of_interest_index;
            segment.from_node_of_interest_index = last - segment.to_node_of_interest_index;
            segment.to_node_of_interest_index = last - from;
            std::mem::swap(&mut segment.from_terminal_id, &mut segment.to_terminal_id);
        }
        renumber(structure);
    }

    reversed
}

/// Place `second` after `first` and join the segments meeting at the seam
///
/// Structures and structure ids come from the survivor; `first_survives`
/// tells which side that is.
fn join(first: &SpanEquipment, second: &SpanEquipment, first_survives: bool) -> SpanEquipment {
    let seam = first.node_of_interest_ids.len() - 1;
    let survivor = if first_survives { first } else { second };

    let mut node_of_interest_ids = first.node_of_interest_ids.clone();
    node_of_interest_ids.extend_from_slice(&second.node_of_interest_ids[1..]);

    let second_active: Vec<&SpanStructure> = second.active_structures().map(|(_, s)| s).collect();
    let first_active: Vec<&SpanStructure> = first.active_structures().map(|(_, s)| s).collect();

    let mut span_structures = survivor.span_structures.clone();
    let mut pair = 0;

    for (structure_index, structure) in span_structures.iter_mut().enumerate() {
        if structure.deleted {
            if !first_survives {
                shift(&mut structure.span_segments, seam);
            }
            continue;
        }

        let earlier = &first_active[pair].span_segments;
        let mut later = second_active[pair].span_segments.clone();
        shift(&mut later, seam);
        pair += 1;

        structure.span_segments = join_segments(earlier, later, seam, first_survives);
        for segment in structure.span_segments.iter_mut() {
            segment.structure_index = structure_index;
        }
        renumber(structure);
    }

    node_of_interest_ids.remove(seam);
    for structure in span_structures.iter_mut() {
        for segment in structure.span_segments.iter_mut() {
            if segment.from_node_of_interest_index > seam {
                segment.from_node_of_interest_index -= 1;
            }
            if segment.to_node_of_interest_index > seam {
                segment.to_node_of_interest_index -= 1;
            }
        }
    }

    SpanEquipment {
        node_of_interest_ids,
        span_structures,
        ..survivor.clone()
    }
}

fn shift(segments: &mut [SpanSegment], offset: usize) {
    for segment in segments.iter_mut() {
        segment.from_node_of_interest_index += offset;
        segment.to_node_of_interest_index += offset;
    }
}

fn join_segments(
    earlier: &[SpanSegment],
    later: Vec<SpanSegment>,
    seam: usize,
    keep_earlier_id: bool,
) -> Vec<SpanSegment> {
    let mut joined: Vec<SpanSegment> = earlier.to_vec();
    let mut later = later.into_iter().peekable();

    let ending = joined.iter().position(|s| s.to_node_of_interest_index == seam);
    let starting = later.next_if(|s| s.from_node_of_interest_index == seam);

    match (ending, starting) {
        (Some(position), Some(starting)) => {
            let segment = &mut joined[position];
            segment.to_node_of_interest_index = starting.to_node_of_interest_index;
            segment.to_terminal_id = starting.to_terminal_id;
            if !keep_earlier_id {
                segment.id = starting.id;
            }
        }
        (_, Some(starting)) => joined.push(starting),
        _ => {}
    }

    joined.extend(later);
    joined
}
