// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connecting span segments to terminals
//!
//! A connection is recorded on the segment end only. Two conduit segments
//! joined at a node share one *simple terminal* id: a junction that exists
//! only as the id both ends point at. Cables connect to the terminals of
//! terminal equipment instead.

use std::collections::HashSet;
use uuid::Uuid;

use super::{SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::commands::CommandContext;
use crate::domain::{SpanEquipment, SpanSegmentToTerminalConnectionDirection};
use crate::events::span_equipment::*;

/// Handle ConnectConduitSpanSegmentsToSimpleTerminals
///
/// # Business Rules
/// - Only conduits use simple terminals
/// - Every segment must start or end at the route node and be free there
/// - Segments carrying a cable cannot be connected
pub fn handle_connect_to_simple_terminals(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    route_node_id: Uuid,
    connects: &[SpanSegmentTerminalRef],
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if equipment.is_cable {
        return Err(SpanEquipmentError::ExpectedConduit);
    }

    if let Some(pair) = connects
        .iter()
        .find(|c| cable_carrying_segment_ids.contains(&c.span_segment_id))
    {
        return Err(SpanEquipmentError::SpanSegmentContainsCable(pair.span_segment_id));
    }

    let connects = resolve_connects(equipment, route_node_id, connects)?;

    Ok(SpanEquipmentEvent::SpanSegmentsConnectedToSimpleTerminals(
        SpanSegmentsConnectedToSimpleTerminals {
            header: ctx.header(state.id),
            connects,
        },
    ))
}

/// Handle ConnectCableSpanSegmentsWithTerminals
///
/// # Business Rules
/// - Only cables connect to terminal equipment
/// - Every segment must start or end at the route node and be free there
pub fn handle_connect_to_terminals(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    route_node_id: Uuid,
    connects: &[SpanSegmentTerminalRef],
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if !equipment.is_cable {
        return Err(SpanEquipmentError::ExpectedCable);
    }

    let connects = resolve_connects(equipment, route_node_id, connects)?;

    Ok(SpanEquipmentEvent::SpanSegmentsConnectedToTerminals(
        SpanSegmentsConnectedToTerminals {
            header: ctx.header(state.id),
            connects,
        },
    ))
}

/// Handle DisconnectSpanSegmentsFromTerminals
///
/// # Business Rules
/// - Each segment must actually reference the terminal
pub fn handle_disconnect_from_terminals(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    disconnects: &[SpanSegmentTerminalRef],
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    for disconnect in disconnects {
        let segment = equipment
            .span_segment(disconnect.span_segment_id)
            .ok_or(SpanEquipmentError::SpanSegmentNotFound(disconnect.span_segment_id))?;

        if segment.end_connected_to(disconnect.terminal_id).is_none() {
            return Err(SpanEquipmentError::NotConnectedToTerminal {
                span_segment_id: disconnect.span_segment_id,
                terminal_id: disconnect.terminal_id,
            });
        }
    }

    Ok(SpanEquipmentEvent::SpanSegmentsDisconnectedFromTerminals(
        SpanSegmentsDisconnectedFromTerminals {
            header: ctx.header(state.id),
            disconnects: disconnects.to_vec(),
        },
    ))
}

fn resolve_connects(
    equipment: &SpanEquipment,
    route_node_id: Uuid,
    pairs: &[SpanSegmentTerminalRef],
) -> Result<Vec<SpanSegmentToTerminalConnect>, SpanEquipmentError> {
    let mut used_ends = HashSet::new();
    let mut connects = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let segment = equipment
            .span_segment(pair.span_segment_id)
            .ok_or(SpanEquipmentError::SpanSegmentNotFound(pair.span_segment_id))?;

        let end = equipment
            .segment_end_at_node(segment, route_node_id)
            .ok_or(SpanEquipmentError::SpanSegmentNotAtRouteNode {
                span_segment_id: pair.span_segment_id,
                route_node_id,
            })?;

        if segment.terminal_id(end).is_some() || !used_ends.insert((segment.id, end)) {
            return Err(SpanEquipmentError::SpanSegmentAlreadyConnected(segment.id));
        }

        connects.push(SpanSegmentToTerminalConnect {
            span_segment_id: segment.id,
            terminal_id: pair.terminal_id,
            direction: SpanSegmentToTerminalConnectionDirection::for_end(end),
        });
    }

    Ok(connects)
}
