// Copyright (c) 2025 - Cowboy AI, Inc.
//! Connectivity commands: connect, disconnect, cut, merge
//!
//! # Connect at a route node
//!
//! ```text
//! one equipment,  2 segments ──outer pair──> revert cut
//!                            └─otherwise──> junction (simple terminal)
//! two equipments, 1 + 1 outer, node is an end of both, not affixed
//!                            ──> merge (other equipment removed)
//! two equipments, n + n      ──> junction per aligned pair
//! ```
//!
//! # Cable cut
//!
//! Cutting a cable at an interior node splits it in two: the cable keeps
//! the part before the node, the remainder becomes a new cable with its own
//! walk of interest, and terminal links on the remainder move over.

use std::collections::{HashMap, HashSet};
use tracing::{error, info};
use uuid::Uuid;

use super::notifier::{categories, entity_types};
use super::{
    EntityKind, EquipmentChange, InterestChange, Loaded, ServiceError, ServiceResult, UnitOfWork,
    UtilityNetworkService,
};
use crate::aggregate::span_equipment::{self, SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::CommandContext;
use crate::domain::{RouteNetworkWalk, SpanEquipment, SpanSegmentEnd, ValidatedRouteNetworkWalk};
use crate::events::span_equipment::SpanSegmentTerminalRef;
use crate::projection::{SpanSegmentRef, UtilityGraph};

/// Selected segments of one span equipment, in selection order
struct Selection {
    span_equipment_id: Uuid,
    segments: Vec<SpanSegmentRef>,
}

impl Selection {
    fn span_segment_ids(&self) -> Vec<Uuid> {
        self.segments.iter().map(|s| s.span_segment_id).collect()
    }
}

fn select(graph: &UtilityGraph, span_segment_ids: &[Uuid]) -> ServiceResult<Vec<Selection>> {
    if span_segment_ids.is_empty() {
        return Err(SpanEquipmentError::NoSpanSegmentsSelected.into());
    }

    let mut selections: Vec<Selection> = Vec::new();
    for span_segment_id in span_segment_ids {
        let segment_ref = *graph
            .try_get_span_segment_ref(*span_segment_id)
            .ok_or(ServiceError::not_found(EntityKind::SpanSegment, *span_segment_id))?;

        match selections
            .iter_mut()
            .find(|s| s.span_equipment_id == segment_ref.span_equipment_id)
        {
            Some(selection) => selection.segments.push(segment_ref),
            None => selections.push(Selection {
                span_equipment_id: segment_ref.span_equipment_id,
                segments: vec![segment_ref],
            }),
        }
    }
    Ok(selections)
}

fn segment_end_at(
    equipment: &SpanEquipment,
    span_segment_id: Uuid,
    route_node_id: Uuid,
) -> ServiceResult<SpanSegmentEnd> {
    let segment = equipment
        .span_segment(span_segment_id)
        .ok_or(SpanEquipmentError::SpanSegmentNotFound(span_segment_id))?;
    Ok(equipment
        .segment_end_at_node(segment, route_node_id)
        .ok_or(SpanEquipmentError::SpanSegmentNotAtRouteNode {
            span_segment_id,
            route_node_id,
        })?)
}

impl UtilityNetworkService {
    /// Connect span segments meeting at a route node
    pub async fn connect_span_segments_at_route_node(
        &self,
        ctx: &CommandContext,
        route_node_id: Uuid,
        span_segment_ids: &[Uuid],
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let selections = select(&graph, span_segment_ids)?;

        match selections.as_slice() {
            [single] => self.connect_within_equipment(ctx, &graph, route_node_id, single).await,
            [first, second] => {
                if first.segments.len() != second.segments.len() {
                    return Err(ServiceError::MismatchedSegmentCounts {
                        left: first.segments.len(),
                        right: second.segments.len(),
                    });
                }

                if self.is_merge(&graph, route_node_id, first, second)? {
                    self.merge_at_route_node(ctx, &graph, route_node_id, first, second).await
                } else {
                    self.connect_between_equipment(ctx, &graph, route_node_id, first, second).await
                }
            }
            _ => Err(ServiceError::InvalidCommand(
                "span segments of at most two span equipment can be connected at once".to_string(),
            )),
        }
    }

    async fn connect_within_equipment(
        &self,
        ctx: &CommandContext,
        graph: &UtilityGraph,
        route_node_id: Uuid,
        selection: &Selection,
    ) -> ServiceResult<()> {
        let [a, b] = selection.segments.as_slice() else {
            return Err(ServiceError::InvalidCommand(
                "connecting segments of one span equipment takes exactly two segments".to_string(),
            ));
        };

        let loaded = self
            .load_existing::<SpanEquipmentState>(selection.span_equipment_id)
            .await?;
        let equipment = loaded.state.equipment()?;

        let end_a = segment_end_at(equipment, a.span_segment_id, route_node_id)?;
        let end_b = segment_end_at(equipment, b.span_segment_id, route_node_id)?;
        if end_a == end_b {
            return Err(ServiceError::UTurnNotAllowed(route_node_id));
        }

        let (event, category) = match (a.structure_index == 0, b.structure_index == 0) {
            (true, true) => (
                span_equipment::handle_revert_cut(
                    &loaded.state,
                    ctx,
                    route_node_id,
                    &graph.cable_carrying_segment_ids(equipment),
                )?,
                categories::REVERT_CUT,
            ),
            (true, false) | (false, true) => {
                let (outer, inner) = if a.structure_index == 0 { (a, b) } else { (b, a) };
                return Err(ServiceError::CannotConnectInnerToOuter {
                    outer: outer.span_segment_id,
                    inner: inner.span_segment_id,
                });
            }
            (false, false) => {
                let junction = Uuid::now_v7();
                let connects = [a, b].map(|s| SpanSegmentTerminalRef {
                    span_segment_id: s.span_segment_id,
                    terminal_id: junction,
                });
                (
                    span_equipment::handle_connect_to_simple_terminals(
                        &loaded.state,
                        ctx,
                        route_node_id,
                        &connects,
                        &graph.cable_carrying_segment_ids(equipment),
                    )?,
                    categories::CONNECT,
                )
            }
        };

        self.commit_span_equipment_change(
            ctx,
            selection.span_equipment_id,
            loaded.version,
            event,
            category,
            [route_node_id],
        )
        .await
    }

    /// Whether connecting two equipment at the node merges them
    fn is_merge(
        &self,
        graph: &UtilityGraph,
        route_node_id: Uuid,
        first: &Selection,
        second: &Selection,
    ) -> ServiceResult<bool> {
        if first.segments.len() != 1 {
            return Ok(false);
        }

        for selection in [first, second] {
            let equipment = graph
                .try_get_span_equipment(selection.span_equipment_id)
                .ok_or(ServiceError::not_found(
                    EntityKind::SpanEquipment,
                    selection.span_equipment_id,
                ))?;

            if selection.segments[0].structure_index != 0
                || !equipment.is_end_node(route_node_id)
                || equipment.is_affixed_to_container_at(route_node_id)
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Absorb the second equipment into the first
    async fn merge_at_route_node(
        &self,
        ctx: &CommandContext,
        graph: &UtilityGraph,
        route_node_id: Uuid,
        first: &Selection,
        second: &Selection,
    ) -> ServiceResult<()> {
        let survivor: Loaded<SpanEquipmentState> =
            self.load_existing(first.span_equipment_id).await?;
        let absorbed: Loaded<SpanEquipmentState> =
            self.load_existing(second.span_equipment_id).await?;
        let survivor_equipment = survivor.state.equipment()?;
        let absorbed_equipment = absorbed.state.equipment()?;

        let mut cable_carrying = graph.cable_carrying_segment_ids(survivor_equipment);
        cable_carrying.extend(graph.cable_carrying_segment_ids(absorbed_equipment));

        let merged = span_equipment::handle_merge(
            &survivor.state,
            ctx,
            absorbed_equipment,
            route_node_id,
            &cable_carrying,
        )?;
        let removed = span_equipment::handle_remove(&absorbed.state, ctx, &cable_carrying)?;

        let survivor_walk = self.walk_of_interest(survivor_equipment).await?;
        let absorbed_walk = self.walk_of_interest(absorbed_equipment).await?;
        let merged_walk = merged_walk(
            &survivor_walk,
            &absorbed_walk,
            survivor_equipment.to_node_id() == route_node_id,
            route_node_id,
        );
        let merged_walk = self
            .gateway()
            .validate_walk_of_interest(merged_walk.element_ids())
            .await?;

        let mut work = UnitOfWork::new();
        work.append(first.span_equipment_id, survivor.version, merged);
        work.append(second.span_equipment_id, absorbed.version, removed);
        work.change_interest(InterestChange::UpdateWalk {
            interest_id: survivor_equipment.walk_of_interest_id,
            walk: merged_walk.clone(),
        });
        work.change_interest(InterestChange::Unregister {
            interest_id: absorbed_equipment.walk_of_interest_id,
        });

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::MERGE)
                .modified(entity_types::SPAN_EQUIPMENT, vec![first.span_equipment_id])
                .deleted(entity_types::SPAN_EQUIPMENT, vec![second.span_equipment_id])
                .affecting(merged_walk.element_ids().iter().copied()),
        )
        .await?;

        info!(
            survivor = %first.span_equipment_id,
            absorbed = %second.span_equipment_id,
            %route_node_id,
            "Span equipment merged"
        );
        Ok(())
    }

    /// Create one junction per aligned pair of segments
    async fn connect_between_equipment(
        &self,
        ctx: &CommandContext,
        graph: &UtilityGraph,
        route_node_id: Uuid,
        first: &Selection,
        second: &Selection,
    ) -> ServiceResult<()> {
        let left: Loaded<SpanEquipmentState> = self.load_existing(first.span_equipment_id).await?;
        let right: Loaded<SpanEquipmentState> = self.load_existing(second.span_equipment_id).await?;
        let left_equipment = left.state.equipment()?;
        let right_equipment = right.state.equipment()?;

        let left_segments = aligned(left_equipment, &first.segments);
        let right_segments = aligned(right_equipment, &second.segments);

        let mut left_connects = Vec::with_capacity(left_segments.len());
        let mut right_connects = Vec::with_capacity(right_segments.len());

        for (l, r) in left_segments.iter().zip(&right_segments) {
            match (l.structure_index == 0, r.structure_index == 0) {
                (true, false) => {
                    return Err(ServiceError::CannotConnectInnerToOuter {
                        outer: l.span_segment_id,
                        inner: r.span_segment_id,
                    })
                }
                (false, true) => {
                    return Err(ServiceError::CannotConnectInnerToOuter {
                        outer: r.span_segment_id,
                        inner: l.span_segment_id,
                    })
                }
                _ => {}
            }

            let junction = Uuid::now_v7();
            left_connects.push(SpanSegmentTerminalRef {
                span_segment_id: l.span_segment_id,
                terminal_id: junction,
            });
            right_connects.push(SpanSegmentTerminalRef {
                span_segment_id: r.span_segment_id,
                terminal_id: junction,
            });
        }

        let left_event = span_equipment::handle_connect_to_simple_terminals(
            &left.state,
            ctx,
            route_node_id,
            &left_connects,
            &graph.cable_carrying_segment_ids(left_equipment),
        )?;
        let right_event = span_equipment::handle_connect_to_simple_terminals(
            &right.state,
            ctx,
            route_node_id,
            &right_connects,
            &graph.cable_carrying_segment_ids(right_equipment),
        )?;

        let mut work = UnitOfWork::new();
        work.append(first.span_equipment_id, left.version, left_event);
        work.append(second.span_equipment_id, right.version, right_event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::CONNECT)
                .modified(
                    entity_types::SPAN_EQUIPMENT,
                    vec![first.span_equipment_id, second.span_equipment_id],
                )
                .affecting([route_node_id]),
        )
        .await
    }

    /// Connect cable segment ends to terminals of terminal equipment
    ///
    /// Each terminal takes at most one span segment.
    pub async fn connect_cable_to_terminals(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        route_node_id: Uuid,
        connects: &[SpanSegmentTerminalRef],
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let mut requested = HashSet::new();
        let mut terminal_equipment_ids = Vec::new();

        for connect in connects {
            let terminal = graph
                .try_get_terminal_ref(connect.terminal_id)
                .filter(|t| !t.is_dummy_end())
                .ok_or(ServiceError::TerminalNotFound(connect.terminal_id))?;

            if graph.is_terminal_connected(connect.terminal_id) || !requested.insert(connect.terminal_id) {
                return Err(ServiceError::TerminalAlreadyConnected(connect.terminal_id));
            }

            let terminal_equipment = terminal
                .terminal_equipment(&graph)
                .ok_or(ServiceError::TerminalNotFound(connect.terminal_id))?;
            let at_node = graph
                .try_get_node_container(terminal_equipment.node_container_id)
                .is_some_and(|c| c.route_node_id == route_node_id);
            if !at_node {
                return Err(ServiceError::InvalidCommand(format!(
                    "terminal {} is not in a node container at route node {route_node_id}",
                    connect.terminal_id
                )));
            }
            if !terminal_equipment_ids.contains(&terminal_equipment.id) {
                terminal_equipment_ids.push(terminal_equipment.id);
            }
        }

        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let event = span_equipment::handle_connect_to_terminals(&loaded.state, ctx, route_node_id, connects)?;

        let mut work = UnitOfWork::new();
        work.append(span_equipment_id, loaded.version, event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::CONNECT)
                .modified(entity_types::SPAN_EQUIPMENT, vec![span_equipment_id])
                .modified(entity_types::TERMINAL_EQUIPMENT, terminal_equipment_ids)
                .affecting([route_node_id]),
        )
        .await
    }

    /// Disconnect one segment, or two segments sharing a terminal, at a route node
    pub async fn disconnect_span_segments_at_route_node(
        &self,
        ctx: &CommandContext,
        route_node_id: Uuid,
        span_segment_ids: &[Uuid],
    ) -> ServiceResult<()> {
        if span_segment_ids.len() > 2 {
            return Err(ServiceError::InvalidCommand(
                "at most two span segments can be disconnected at once".to_string(),
            ));
        }

        let graph = self.graph().await;
        let selections = select(&graph, span_segment_ids)?;

        let mut work = UnitOfWork::new();
        let mut modified = Vec::with_capacity(selections.len());
        let mut shared_terminal: Option<Uuid> = None;

        for selection in &selections {
            let loaded = self
                .load_existing::<SpanEquipmentState>(selection.span_equipment_id)
                .await?;
            let equipment = loaded.state.equipment()?;

            let mut disconnects = Vec::with_capacity(selection.segments.len());
            for segment_ref in &selection.segments {
                let end = segment_end_at(equipment, segment_ref.span_segment_id, route_node_id)?;
                let terminal_id = equipment
                    .span_segment(segment_ref.span_segment_id)
                    .and_then(|s| s.terminal_id(end))
                    .ok_or_else(|| {
                        ServiceError::InvalidCommand(format!(
                            "span segment {} is not connected at route node {route_node_id}",
                            segment_ref.span_segment_id
                        ))
                    })?;

                match shared_terminal {
                    Some(shared) if shared != terminal_id => {
                        return Err(ServiceError::InvalidCommand(
                            "the span segments are not connected to each other".to_string(),
                        ))
                    }
                    _ => shared_terminal = Some(terminal_id),
                }

                disconnects.push(SpanSegmentTerminalRef {
                    span_segment_id: segment_ref.span_segment_id,
                    terminal_id,
                });
            }

            let event = span_equipment::handle_disconnect_from_terminals(&loaded.state, ctx, &disconnects)?;
            work.append(selection.span_equipment_id, loaded.version, event);
            modified.push(selection.span_equipment_id);
        }

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::DISCONNECT)
                .modified(entity_types::SPAN_EQUIPMENT, modified)
                .affecting([route_node_id]),
        )
        .await
    }

    /// Disconnect segment ends of one span equipment from the given terminals
    pub async fn disconnect_span_segments_from_terminals(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        disconnects: &[SpanSegmentTerminalRef],
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let event = span_equipment::handle_disconnect_from_terminals(&loaded.state, ctx, disconnects)?;

        let equipment = loaded.state.equipment()?;
        let route_node_ids: Vec<Uuid> = disconnects
            .iter()
            .filter_map(|d| {
                let segment = equipment.span_segment(d.span_segment_id)?;
                let end = segment.end_connected_to(d.terminal_id)?;
                Some(equipment.segment_node_id(segment, end))
            })
            .collect();
        let terminal_equipment_ids: Vec<Uuid> = disconnects
            .iter()
            .filter_map(|d| graph.try_get_terminal_ref(d.terminal_id)?.terminal_equipment_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut work = UnitOfWork::new();
        work.append(span_equipment_id, loaded.version, event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::DISCONNECT)
                .modified(entity_types::SPAN_EQUIPMENT, vec![span_equipment_id])
                .modified(entity_types::TERMINAL_EQUIPMENT, terminal_equipment_ids)
                .affecting(route_node_ids),
        )
        .await
    }

    /// Cut span segments at a route node
    ///
    /// Conduit segments are cut in place. A selected cable is split at the
    /// node into two span equipment; at most one cable per command.
    pub async fn cut_span_segments_at_route_node(
        &self,
        ctx: &CommandContext,
        route_node_id: Uuid,
        span_segment_ids: &[Uuid],
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let selections = select(&graph, span_segment_ids)?;

        let mut cables = Vec::new();
        let mut conduits = Vec::new();
        for selection in &selections {
            let equipment = graph
                .try_get_span_equipment(selection.span_equipment_id)
                .ok_or(ServiceError::not_found(
                    EntityKind::SpanEquipment,
                    selection.span_equipment_id,
                ))?;
            if equipment.is_cable {
                cables.push(selection);
            } else {
                conduits.push(selection);
            }
        }
        if cables.len() > 1 {
            return Err(ServiceError::CannotCutMultipleCables);
        }

        let mut work = UnitOfWork::new();
        let mut change = EquipmentChange::new(categories::CUT);
        let mut modified = Vec::with_capacity(selections.len());
        let mut affected = vec![route_node_id];

        for selection in conduits {
            let loaded = self
                .load_existing::<SpanEquipmentState>(selection.span_equipment_id)
                .await?;
            let equipment = loaded.state.equipment()?;
            let walk = self.walk_of_interest(equipment).await?;

            let event = span_equipment::handle_cut_span_segments(
                &loaded.state,
                ctx,
                route_node_id,
                &walk,
                &selection.span_segment_ids(),
                &graph.cable_carrying_segment_ids(equipment),
            )?;
            work.append(selection.span_equipment_id, loaded.version, event);
            modified.push(selection.span_equipment_id);
        }

        if let Some(selection) = cables.first() {
            let loaded = self
                .load_existing::<SpanEquipmentState>(selection.span_equipment_id)
                .await?;
            let split = self
                .split_cable(ctx, &mut work, loaded, route_node_id, selection.segments[0].span_segment_id)
                .await?;

            modified.push(selection.span_equipment_id);
            affected.extend_from_slice(split.walk.element_ids());
            change = change.added(entity_types::SPAN_EQUIPMENT, vec![split.remainder_id]);
        }

        self.commit(
            ctx,
            work,
            change
                .modified(entity_types::SPAN_EQUIPMENT, modified)
                .affecting(affected),
        )
        .await?;

        info!(%route_node_id, segments = span_segment_ids.len(), "Span segments cut");
        Ok(())
    }

    /// Record the events splitting a cable at an interior route node
    async fn split_cable(
        &self,
        ctx: &CommandContext,
        work: &mut UnitOfWork,
        cable: Loaded<SpanEquipmentState>,
        route_node_id: Uuid,
        selected_span_segment_id: Uuid,
    ) -> ServiceResult<CableSplit> {
        let cable_id = cable.state.id;
        let equipment = cable.state.equipment()?;
        let walk = self.walk_of_interest(equipment).await?;

        let cut_position = walk
            .node_position(route_node_id)
            .ok_or(SpanEquipmentError::RouteNodeNotOnWalk(route_node_id))?;
        if equipment.is_end_node(route_node_id) {
            return Err(SpanEquipmentError::CutNodeNotInterior {
                span_segment_id: selected_span_segment_id,
                route_node_id,
            }
            .into());
        }

        let crossing: Vec<Uuid> = equipment
            .all_segments()
            .filter(|s| {
                let from = walk.node_position(equipment.segment_node_id(s, SpanSegmentEnd::From));
                let to = walk.node_position(equipment.segment_node_id(s, SpanSegmentEnd::To));
                matches!((from, to), (Some(from), Some(to)) if from < cut_position && cut_position < to)
            })
            .map(|s| s.id)
            .collect();

        let mut state = cable.state.clone();
        let mut events = Vec::new();

        if !crossing.is_empty() {
            let cut = span_equipment::handle_cut_span_segments(
                &state,
                ctx,
                route_node_id,
                &walk,
                &crossing,
                &HashSet::new(),
            )?;
            state = span_equipment::apply_event(state, &cut);
            events.push(cut);
        }

        let cut_equipment = state.equipment()?.clone();
        let Some(cut_index) = cut_equipment.node_of_interest_index(route_node_id) else {
            error!(%cable_id, %route_node_id, "Cut node missing from nodes of interest after cut");
            panic!("cable {cable_id} has no node of interest at cut node {route_node_id}");
        };

        let remainder_links = remainder_terminal_links(&cut_equipment, cut_index);
        if !remainder_links.is_empty() {
            let refs: Vec<SpanSegmentTerminalRef> = remainder_links.iter().map(|(_, r)| *r).collect();
            let disconnect = span_equipment::handle_disconnect_from_terminals(&state, ctx, &refs)?;
            state = span_equipment::apply_event(state, &disconnect);
            events.push(disconnect);
        }

        let partition = span_equipment::partition_at_route_node(&cut_equipment, &walk, route_node_id)?;
        let source = state.equipment()?.clone();
        events.push(span_equipment::handle_shrink(&state, ctx, &walk, 0, cut_index)?);

        let remainder_id = Uuid::now_v7();
        let remainder_interest_id = Uuid::now_v7();
        let (placed, segment_map) = span_equipment::handle_place_cable_remainder(
            &SpanEquipmentState::default_for(remainder_id),
            ctx,
            &source,
            cut_index,
            remainder_interest_id,
            partition.hops_after,
            partition.affixes_after,
        )?;
        let mut remainder = span_equipment::apply_event(SpanEquipmentState::default_for(remainder_id), &placed);
        let mut remainder_events = vec![placed];

        for (node_id, connects) in reconnects(&remainder_links, &segment_map, cable_id) {
            let connect = span_equipment::handle_connect_to_terminals(&remainder, ctx, node_id, &connects)?;
            remainder = span_equipment::apply_event(remainder, &connect);
            remainder_events.push(connect);
        }

        let (Some(kept_walk), Some(remainder_walk)) = (
            walk.section(walk.from_node_id(), route_node_id),
            walk.section(route_node_id, walk.to_node_id()),
        ) else {
            error!(%cable_id, %route_node_id, "Interior cut node does not split the cable walk");
            panic!("walk of cable {cable_id} cannot be split at {route_node_id}");
        };

        for event in events {
            work.append(cable_id, cable.version, event);
        }
        for event in remainder_events {
            work.append(remainder_id, 0, event);
        }
        work.change_interest(InterestChange::UpdateWalk {
            interest_id: equipment.walk_of_interest_id,
            walk: kept_walk,
        });
        work.change_interest(InterestChange::RegisterWalk {
            interest_id: remainder_interest_id,
            walk: remainder_walk,
        });

        info!(%cable_id, %remainder_id, %route_node_id, "Cable split at route node");

        Ok(CableSplit { remainder_id, walk })
    }
}

struct CableSplit {
    remainder_id: Uuid,
    walk: ValidatedRouteNetworkWalk,
}

/// Each segment's sort key for pairing across equipment
fn aligned(equipment: &SpanEquipment, segments: &[SpanSegmentRef]) -> Vec<SpanSegmentRef> {
    let mut sorted = segments.to_vec();
    sorted.sort_by_key(|s| {
        equipment
            .span_structures
            .get(s.structure_index)
            .map(|structure| (structure.specification_id, structure.position))
            .unwrap_or_default()
    });
    sorted
}

/// Walk of two equipment joined at a route node, in the survivor's direction
fn merged_walk(
    survivor: &RouteNetworkWalk,
    absorbed: &RouteNetworkWalk,
    append: bool,
    route_node_id: Uuid,
) -> RouteNetworkWalk {
    let far_end = if absorbed.from_node_id() == route_node_id {
        absorbed.to_node_id()
    } else {
        absorbed.from_node_id()
    };

    let merged = if append {
        absorbed
            .section(route_node_id, far_end)
            .and_then(|tail| survivor.concat(&tail))
    } else {
        absorbed
            .section(far_end, route_node_id)
            .and_then(|head| head.concat(survivor))
    };

    match merged {
        Some(walk) => walk,
        None => {
            error!(%route_node_id, "Walks of merged span equipment do not meet at the merge node");
            panic!("walks do not meet at merge node {route_node_id}");
        }
    }
}

/// Terminal links on the part of a cut cable from the cut node onward
fn remainder_terminal_links(equipment: &SpanEquipment, cut_index: usize) -> Vec<(Uuid, SpanSegmentTerminalRef)> {
    equipment
        .all_segments()
        .filter(|s| s.from_node_of_interest_index >= cut_index)
        .flat_map(|segment| {
            [SpanSegmentEnd::From, SpanSegmentEnd::To]
                .into_iter()
                .filter_map(move |end| {
                    segment.terminal_id(end).map(|terminal_id| {
                        (
                            equipment.segment_node_id(segment, end),
                            SpanSegmentTerminalRef {
                                span_segment_id: segment.id,
                                terminal_id,
                            },
                        )
                    })
                })
        })
        .collect()
}

/// Terminal links re-pointed at the remainder's segments, grouped by route node
fn reconnects(
    links: &[(Uuid, SpanSegmentTerminalRef)],
    segment_map: &HashMap<Uuid, Uuid>,
    cable_id: Uuid,
) -> Vec<(Uuid, Vec<SpanSegmentTerminalRef>)> {
    let mut grouped: Vec<(Uuid, Vec<SpanSegmentTerminalRef>)> = Vec::new();

    for (route_node_id, link) in links {
        let Some(span_segment_id) = segment_map.get(&link.span_segment_id) else {
            error!(%cable_id, span_segment_id = %link.span_segment_id, "Remainder lacks a copied segment");
            panic!("segment {} of cable {cable_id} was not copied to the remainder", link.span_segment_id);
        };
        let connect = SpanSegmentTerminalRef {
            span_segment_id: *span_segment_id,
            terminal_id: link.terminal_id,
        };

        match grouped.iter_mut().find(|(node, _)| node == route_node_id) {
            Some((_, connects)) => connects.push(connect),
            None => grouped.push((*route_node_id, vec![connect])),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn route(elements: &[u128]) -> RouteNetworkWalk {
        RouteNetworkWalk::new(elements.iter().map(|e| id(*e)).collect()).unwrap()
    }

    #[test]
    fn test_merged_walk_appends_in_survivor_direction() {
        let survivor = route(&[0xA, 0x51, 0xB]);

        for absorbed in [route(&[0xB, 0x52, 0xC]), route(&[0xC, 0x52, 0xB])] {
            assert_eq!(
                merged_walk(&survivor, &absorbed, true, id(0xB)),
                route(&[0xA, 0x51, 0xB, 0x52, 0xC])
            );
        }
    }

    #[test]
    fn test_merged_walk_prepends_when_survivor_starts_at_node() {
        let survivor = route(&[0xB, 0x52, 0xC]);
        let absorbed = route(&[0xB, 0x51, 0xA]);

        assert_eq!(
            merged_walk(&survivor, &absorbed, false, id(0xB)),
            route(&[0xA, 0x51, 0xB, 0x52, 0xC])
        );
    }

    #[test]
    #[should_panic(expected = "walks do not meet")]
    fn test_merged_walk_panics_when_walks_are_apart() {
        merged_walk(&route(&[0xA, 0x51, 0xB]), &route(&[0xC, 0x53, 0xD]), true, id(0xB));
    }

    #[test]
    fn test_reconnects_group_by_route_node() {
        let (old_1, old_2, new_1, new_2) = (id(1), id(2), id(11), id(12));
        let links = vec![
            (id(0xD), SpanSegmentTerminalRef { span_segment_id: old_1, terminal_id: id(0x70) }),
            (id(0xD), SpanSegmentTerminalRef { span_segment_id: old_2, terminal_id: id(0x71) }),
            (id(0xE), SpanSegmentTerminalRef { span_segment_id: old_2, terminal_id: id(0x72) }),
        ];
        let map = HashMap::from([(old_1, new_1), (old_2, new_2)]);

        let grouped = reconnects(&links, &map, id(0x99));
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, id(0xD));
        assert_eq!(
            grouped[0].1.iter().map(|c| c.span_segment_id).collect::<Vec<_>>(),
            vec![new_1, new_2]
        );
        assert_eq!(grouped[1].1[0].terminal_id, id(0x72));
    }
}
