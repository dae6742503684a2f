// Copyright (c) 2025 - Cowboy AI, Inc.
//! Span equipment placement and modification commands
//!
//! Moving a conduit that carries cables drags the cables along: each hop
//! through the conduit is traced again on a snapshot with the move applied
//! and the cable's walk is spliced around the new hop section.

use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::notifier::{categories, entity_types};
use super::{
    EntityKind, EquipmentChange, InterestChange, ServiceError, ServiceResult, UnitOfWork,
    UtilityNetworkService,
};
use crate::aggregate::span_equipment::{self, SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::{CommandContext, SpanEquipmentProperties};
use crate::domain::{
    AddressInfo, MarkingInfo, NamingInfo, NodeContainerSide, RouteNetworkWalk, SpanEquipment,
    SpanEquipmentAffixDirection, UtilityNetworkHop, ValidatedRouteNetworkWalk,
};
use crate::events::{SpanEquipmentEvent, UtilityNetworkEvent};
use crate::projection::UtilityGraph;
use crate::trace::routing::{
    assemble_route_walk, build_routing_plan, hop_from_trace, trace_route_walk, RoutingHop,
};
use crate::trace::SpanSegmentTracer;

impl UtilityNetworkService {
    /// Place a conduit or cable directly along a route network walk
    pub async fn place_span_equipment_in_route_network(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        specification_id: Uuid,
        element_ids: &[Uuid],
        properties: SpanEquipmentProperties,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let specification = graph
            .specifications()
            .span_equipment(specification_id)
            .ok_or(ServiceError::not_found(EntityKind::Specification, specification_id))?;

        let walk = self.gateway().validate_walk_of_interest(element_ids).await?;
        let loaded = self.load::<SpanEquipmentState>(span_equipment_id).await?;
        let interest_id = Uuid::now_v7();

        let event = span_equipment::handle_place_in_route_network(
            &loaded.state,
            ctx,
            specification,
            interest_id,
            &walk,
            properties,
        )?;

        let mut work = UnitOfWork::new();
        work.append(span_equipment_id, loaded.version, event);
        work.change_interest(InterestChange::RegisterWalk {
            interest_id,
            walk: walk.clone(),
        });

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::PLACED)
                .added(entity_types::SPAN_EQUIPMENT, vec![span_equipment_id])
                .affecting(walk.element_ids().iter().copied()),
        )
        .await?;

        info!(%span_equipment_id, %specification_id, "Span equipment placed in route network");
        Ok(())
    }

    /// Place a cable along a routing plan threading existing conduits
    ///
    /// Every conduit segment the cable rides through must still have room
    /// for it.
    pub async fn place_span_equipment_in_utility_network(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        specification_id: Uuid,
        routing_hops: &[RoutingHop],
        properties: SpanEquipmentProperties,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let specification = graph
            .specifications()
            .span_equipment(specification_id)
            .ok_or(ServiceError::not_found(EntityKind::Specification, specification_id))?;

        let plan = build_routing_plan(&graph, self.gateway(), routing_hops).await?;

        let occupied = graph.occupied_parent_segment_ids(parent_segment_ids(&plan.hops));
        if let Some(span_segment_id) = occupied.iter().next() {
            return Err(SpanEquipmentError::ConduitAlreadyContainsCable(*span_segment_id).into());
        }

        let loaded = self.load::<SpanEquipmentState>(span_equipment_id).await?;
        let interest_id = Uuid::now_v7();

        let event = span_equipment::handle_place_in_utility_network(
            &loaded.state,
            ctx,
            specification,
            interest_id,
            &plan.walk,
            plan.hops,
            properties,
        )?;

        let mut work = UnitOfWork::new();
        work.append(span_equipment_id, loaded.version, event);
        work.change_interest(InterestChange::RegisterWalk {
            interest_id,
            walk: plan.walk.clone(),
        });

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::PLACED)
                .added(entity_types::SPAN_EQUIPMENT, vec![span_equipment_id])
                .affecting(plan.walk.element_ids().iter().copied()),
        )
        .await?;

        info!(%span_equipment_id, %specification_id, "Span equipment placed in utility network");
        Ok(())
    }

    pub async fn affix_span_equipment_to_node_container(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        node_container_id: Uuid,
        ingoing_side: NodeContainerSide,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let container = graph
            .try_get_node_container(node_container_id)
            .ok_or(ServiceError::not_found(EntityKind::NodeContainer, node_container_id))?;

        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let walk = self.walk_of_interest(loaded.state.equipment()?).await?;

        let event =
            span_equipment::handle_affix_to_node_container(&loaded.state, ctx, container, &walk, ingoing_side)?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::AFFIXED_TO_CONTAINER,
            [container.route_node_id],
        )
        .await
    }

    pub async fn detach_span_equipment_from_node_container(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        node_container_id: Uuid,
    ) -> ServiceResult<()> {
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let route_node_id = loaded
            .state
            .equipment()?
            .node_container_affixes
            .iter()
            .find(|a| a.node_container_id == node_container_id)
            .map(|a| a.route_node_id);

        let event = span_equipment::handle_detach_from_node_container(&loaded.state, ctx, node_container_id)?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::DETACHED_FROM_CONTAINER,
            route_node_id,
        )
        .await
    }

    /// Thread a cable through the conduit the parent segment belongs to
    ///
    /// The conduit is traced end to end. When the cable's walk does not
    /// already follow the traced route between the hop nodes, the cable is
    /// moved onto it as part of the affix.
    pub async fn affix_span_equipment_to_parent(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        parent_span_segment_id: Uuid,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let equipment = loaded.state.equipment()?;
        let cable_walk = self.walk_of_interest(equipment).await?;

        let trace = SpanSegmentTracer::new(&graph).trace_conduit(parent_span_segment_id)?;
        let trace_walk = trace_route_walk(self.gateway(), &trace).await?;

        let (from, to) = match (
            cable_walk.node_position(trace.from_node_id()),
            cable_walk.node_position(trace.to_node_id()),
        ) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(ServiceError::InvalidCommand(format!(
                    "conduit trace from {} to {} does not start and end on the walk of span equipment {span_equipment_id}",
                    trace.from_node_id(),
                    trace.to_node_id()
                )))
            }
        };
        let trace = if from > to { trace.reversed() } else { trace };
        let hop = hop_from_trace(&trace);
        let occupied = graph.occupied_parent_segment_ids(parent_segment_ids(std::slice::from_ref(&hop)));

        let mut work = UnitOfWork::new();
        let mut affected = cable_walk.element_ids().to_vec();

        if cable_walk.contains_walk(&trace_walk) {
            let event = span_equipment::handle_affix_to_parent(&loaded.state, ctx, &cable_walk, hop, &occupied)?;
            work.append(span_equipment_id, loaded.version, event);
        } else {
            let rerouted = cable_walk.replace_section(&trace_walk).ok_or_else(|| {
                SpanEquipmentError::CannotMove(format!(
                    "the walk of span equipment {span_equipment_id} cannot follow the conduit trace"
                ))
            })?;
            let rerouted = self.gateway().validate_walk_of_interest(rerouted.element_ids()).await?;

            let moved = span_equipment::handle_move(&loaded.state, ctx, &cable_walk, &rerouted, None)?;
            let state = span_equipment::apply_event(loaded.state.clone(), &moved);
            let affixed = span_equipment::handle_affix_to_parent(&state, ctx, &rerouted, hop, &occupied)?;

            debug!(%span_equipment_id, "Moving cable onto conduit route while affixing");

            work.append(span_equipment_id, loaded.version, moved);
            work.append(span_equipment_id, loaded.version, affixed);
            work.change_interest(InterestChange::UpdateWalk {
                interest_id: equipment.walk_of_interest_id,
                walk: rerouted.clone(),
            });
            affected.extend_from_slice(rerouted.element_ids());
        }

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::AFFIXED_TO_PARENT)
                .modified(entity_types::SPAN_EQUIPMENT, vec![span_equipment_id])
                .affecting(affected),
        )
        .await?;

        info!(%span_equipment_id, %parent_span_segment_id, "Span equipment affixed to parent");
        Ok(())
    }

    pub async fn detach_span_equipment_from_parent(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        parent_span_segment_id: Uuid,
    ) -> ServiceResult<()> {
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let walk = self.walk_of_interest(loaded.state.equipment()?).await?;

        let event = span_equipment::handle_detach_from_parent(&loaded.state, ctx, parent_span_segment_id)?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::DETACHED_FROM_PARENT,
            walk.element_ids().iter().copied(),
        )
        .await
    }

    /// Move span equipment onto a new walk
    ///
    /// Cables riding through a moved conduit follow it.
    pub async fn move_span_equipment(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        element_ids: &[Uuid],
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let equipment = loaded.state.equipment()?;
        let current_walk = self.walk_of_interest(equipment).await?;

        let new_walk = self.gateway().validate_walk_of_interest(element_ids).await?;
        // A new walk starting at the current far end or ending at the current near end was drawn backwards.
        let new_walk = if new_walk.from_node_id() == current_walk.to_node_id()
            || new_walk.to_node_id() == current_walk.from_node_id()
        {
            new_walk.reversed()
        } else {
            new_walk
        };

        let event = span_equipment::handle_move(&loaded.state, ctx, &current_walk, &new_walk, None)?;

        let mut work = UnitOfWork::new();
        work.append(span_equipment_id, loaded.version, event.clone());
        work.change_interest(InterestChange::UpdateWalk {
            interest_id: equipment.walk_of_interest_id,
            walk: new_walk.clone(),
        });

        let mut modified = vec![span_equipment_id];
        let mut affected = current_walk.element_ids().to_vec();
        affected.extend_from_slice(new_walk.element_ids());

        let child_cable_ids = graph.child_cable_ids(equipment);
        if !child_cable_ids.is_empty() {
            let mut moved_graph = (*graph).clone();
            moved_graph.apply(&UtilityNetworkEvent::from(event));

            let mut walks = HashMap::from([(equipment.walk_of_interest_id, new_walk.clone().into_walk())]);

            for cable_id in child_cable_ids {
                let cable = self.load_existing::<SpanEquipmentState>(cable_id).await?;
                let cable_equipment = cable.state.equipment()?;
                let cable_walk = self.walk_of_interest(cable_equipment).await?;

                let (walk, hops) = self
                    .reroute_child_cable(&moved_graph, &mut walks, equipment, cable_equipment, &cable_walk)
                    .await?;

                if walk == *cable_walk && hops == cable_equipment.utility_network_hops {
                    continue;
                }

                let walk = self.gateway().validate_walk_of_interest(walk.element_ids()).await?;
                let moved = span_equipment::handle_move(&cable.state, ctx, &cable_walk, &walk, Some(hops))?;

                debug!(%cable_id, conduit_id = %span_equipment_id, "Moving child cable with its conduit");

                work.append(cable_id, cable.version, moved);
                work.change_interest(InterestChange::UpdateWalk {
                    interest_id: cable_equipment.walk_of_interest_id,
                    walk: walk.clone(),
                });
                modified.push(cable_id);
                affected.extend_from_slice(cable_walk.element_ids());
                affected.extend_from_slice(walk.element_ids());
            }
        }

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::MOVED)
                .modified(entity_types::SPAN_EQUIPMENT, modified)
                .affecting(affected),
        )
        .await?;

        info!(%span_equipment_id, "Span equipment moved");
        Ok(())
    }

    /// Recompute a child cable's walk and hops against a moved conduit
    async fn reroute_child_cable(
        &self,
        moved_graph: &UtilityGraph,
        walks: &mut HashMap<Uuid, RouteNetworkWalk>,
        conduit: &SpanEquipment,
        cable: &SpanEquipment,
        cable_walk: &RouteNetworkWalk,
    ) -> ServiceResult<(RouteNetworkWalk, Vec<UtilityNetworkHop>)> {
        let tracer = SpanSegmentTracer::new(moved_graph);
        let mut walk = cable_walk.clone();
        let mut hops = Vec::with_capacity(cable.utility_network_hops.len());

        for hop in &cable.utility_network_hops {
            let seed = match hop
                .parent_affixes
                .iter()
                .find(|a| conduit.span_segment(a.span_segment_id).is_some())
            {
                Some(seed) => seed,
                None => {
                    hops.push(hop.clone());
                    continue;
                }
            };

            let trace = tracer.trace(seed.span_segment_id)?;
            let trace = match seed.direction {
                SpanEquipmentAffixDirection::Forward => trace,
                SpanEquipmentAffixDirection::Backward => trace.reversed(),
            };

            for segment in trace.segments() {
                if !walks.contains_key(&segment.walk_of_interest_id) {
                    let interest_walk = self
                        .gateway()
                        .get_walk_of_interest(segment.walk_of_interest_id)
                        .await?
                        .into_walk();
                    walks.insert(segment.walk_of_interest_id, interest_walk);
                }
            }

            let section = assemble_route_walk(&trace, walks)?;
            walk = splice_walk(&walk, hop, &section).ok_or_else(|| {
                SpanEquipmentError::CannotMove(format!(
                    "cable {} cannot follow conduit {} to its new walk",
                    cable.id, conduit.id
                ))
            })?;
            hops.push(hop_from_trace(&trace));
        }

        Ok((walk, hops))
    }

    pub async fn add_additional_structures_to_span_equipment(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        structure_specification_ids: &[Uuid],
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        if let Some(missing) = structure_specification_ids
            .iter()
            .find(|id| graph.specifications().span_structure(**id).is_none())
        {
            return Err(ServiceError::not_found(EntityKind::Specification, *missing));
        }

        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let walk = self.walk_of_interest(loaded.state.equipment()?).await?;

        let event =
            span_equipment::handle_add_additional_structures(&loaded.state, ctx, structure_specification_ids)?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::STRUCTURES_ADDED,
            walk.element_ids().iter().copied(),
        )
        .await
    }

    /// Remove the structure owning the given span segment
    pub async fn remove_span_structure(&self, ctx: &CommandContext, span_segment_id: Uuid) -> ServiceResult<()> {
        let graph = self.graph().await;
        let segment_ref = graph
            .try_get_span_segment_ref(span_segment_id)
            .ok_or(ServiceError::not_found(EntityKind::SpanSegment, span_segment_id))?;
        let span_equipment_id = segment_ref.span_equipment_id;

        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let equipment = loaded.state.equipment()?;
        let walk = self.walk_of_interest(equipment).await?;

        let event = span_equipment::handle_remove_structure(
            &loaded.state,
            ctx,
            segment_ref.structure_index,
            &graph.cable_carrying_segment_ids(equipment),
        )?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::STRUCTURE_REMOVED,
            walk.element_ids().iter().copied(),
        )
        .await
    }

    /// Remove span equipment and unregister its walk of interest
    pub async fn remove_span_equipment(&self, ctx: &CommandContext, span_equipment_id: Uuid) -> ServiceResult<()> {
        let graph = self.graph().await;
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let equipment = loaded.state.equipment()?;
        let walk = self.walk_of_interest(equipment).await?;

        let event =
            span_equipment::handle_remove(&loaded.state, ctx, &graph.cable_carrying_segment_ids(equipment))?;

        let mut work = UnitOfWork::new();
        work.append(span_equipment_id, loaded.version, event);
        work.change_interest(InterestChange::Unregister {
            interest_id: equipment.walk_of_interest_id,
        });

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::DELETION)
                .deleted(entity_types::SPAN_EQUIPMENT, vec![span_equipment_id])
                .affecting(walk.element_ids().iter().copied()),
        )
        .await?;

        info!(%span_equipment_id, "Span equipment removed");
        Ok(())
    }

    pub async fn change_span_equipment_specification(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        specification_id: Uuid,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let specification = graph
            .specifications()
            .span_equipment(specification_id)
            .ok_or(ServiceError::not_found(EntityKind::Specification, specification_id))?;

        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let equipment = loaded.state.equipment()?;
        let walk = self.walk_of_interest(equipment).await?;

        let event = span_equipment::handle_change_specification(
            &loaded.state,
            ctx,
            specification,
            &graph.cable_carrying_segment_ids(equipment),
        )?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::SPECIFICATION_CHANGED,
            walk.element_ids().iter().copied(),
        )
        .await
    }

    pub async fn change_span_equipment_naming_info(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        naming_info: Option<NamingInfo>,
    ) -> ServiceResult<()> {
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let walk = self.walk_of_interest(loaded.state.equipment()?).await?;
        let event = span_equipment::handle_change_naming_info(&loaded.state, ctx, naming_info)?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::PROPERTIES_UPDATED,
            walk.element_ids().iter().copied(),
        )
        .await
    }

    pub async fn change_span_equipment_marking_info(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        marking_info: Option<MarkingInfo>,
    ) -> ServiceResult<()> {
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let walk = self.walk_of_interest(loaded.state.equipment()?).await?;
        let event = span_equipment::handle_change_marking_info(&loaded.state, ctx, marking_info)?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::PROPERTIES_UPDATED,
            walk.element_ids().iter().copied(),
        )
        .await
    }

    pub async fn change_span_equipment_address_info(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        address_info: Option<AddressInfo>,
    ) -> ServiceResult<()> {
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let walk = self.walk_of_interest(loaded.state.equipment()?).await?;
        let event = span_equipment::handle_change_address_info(&loaded.state, ctx, address_info)?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::PROPERTIES_UPDATED,
            walk.element_ids().iter().copied(),
        )
        .await
    }

    pub async fn change_span_equipment_manufacturer(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        manufacturer_id: Option<Uuid>,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let loaded = self.load_existing::<SpanEquipmentState>(span_equipment_id).await?;
        let equipment = loaded.state.equipment()?;
        let specification = graph
            .specifications()
            .span_equipment(equipment.specification_id)
            .ok_or(ServiceError::not_found(EntityKind::Specification, equipment.specification_id))?;
        let walk = self.walk_of_interest(equipment).await?;

        let event = span_equipment::handle_change_manufacturer(&loaded.state, ctx, specification, manufacturer_id)?;

        self.commit_span_equipment_change(
            ctx,
            span_equipment_id,
            loaded.version,
            event,
            categories::PROPERTIES_UPDATED,
            walk.element_ids().iter().copied(),
        )
        .await
    }

    /// Walk the equipment's interest currently covers
    pub(crate) async fn walk_of_interest(&self, equipment: &SpanEquipment) -> ServiceResult<ValidatedRouteNetworkWalk> {
        Ok(self
            .gateway()
            .get_walk_of_interest(equipment.walk_of_interest_id)
            .await?)
    }

    /// Commit a single event modifying one span equipment
    pub(crate) async fn commit_span_equipment_change(
        &self,
        ctx: &CommandContext,
        span_equipment_id: Uuid,
        expected_version: u64,
        event: SpanEquipmentEvent,
        category: &'static str,
        affected: impl IntoIterator<Item = Uuid>,
    ) -> ServiceResult<()> {
        let mut work = UnitOfWork::new();
        work.append(span_equipment_id, expected_version, event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(category)
                .modified(entity_types::SPAN_EQUIPMENT, vec![span_equipment_id])
                .affecting(affected),
        )
        .await
    }
}

fn parent_segment_ids(hops: &[UtilityNetworkHop]) -> impl Iterator<Item = Uuid> + '_ {
    hops.iter()
        .flat_map(|h| h.parent_affixes.iter().map(|a| a.span_segment_id))
}

/// Replace the part of `walk` the hop covered with `section`
///
/// Where the hop ended at an end of the walk, the walk's end follows the
/// new section.
fn splice_walk(
    walk: &RouteNetworkWalk,
    hop: &UtilityNetworkHop,
    section: &RouteNetworkWalk,
) -> Option<RouteNetworkWalk> {
    let (from, to, section) =
        if walk.node_position(hop.from_node_id)? <= walk.node_position(hop.to_node_id)? {
            (hop.from_node_id, hop.to_node_id, section.clone())
        } else {
            (hop.to_node_id, hop.from_node_id, section.reversed())
        };

    let mut spliced = section;
    if from != walk.from_node_id() {
        spliced = walk.section(walk.from_node_id(), from)?.concat(&spliced)?;
    }
    if to != walk.to_node_id() {
        spliced = spliced.concat(&walk.section(to, walk.to_node_id())?)?;
    }
    Some(spliced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UtilityNetworkHopParentAffix;
    use pretty_assertions::assert_eq;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn route(elements: &[u128]) -> RouteNetworkWalk {
        RouteNetworkWalk::new(elements.iter().map(|e| id(*e)).collect()).unwrap()
    }

    fn hop(from: u128, to: u128) -> UtilityNetworkHop {
        UtilityNetworkHop {
            from_node_id: id(from),
            to_node_id: id(to),
            parent_affixes: vec![UtilityNetworkHopParentAffix {
                span_segment_id: id(0x900),
                direction: SpanEquipmentAffixDirection::Forward,
            }],
        }
    }

    #[test]
    fn test_splice_replaces_interior_section() {
        let walk = route(&[0xA, 0x51, 0xB, 0x52, 0xC, 0x53, 0xD]);
        let section = route(&[0xB, 0x55, 0xF, 0x56, 0xC]);

        let spliced = splice_walk(&walk, &hop(0xB, 0xC), &section).unwrap();
        assert_eq!(spliced, route(&[0xA, 0x51, 0xB, 0x55, 0xF, 0x56, 0xC, 0x53, 0xD]));
    }

    #[test]
    fn test_splice_extends_walk_end_with_section() {
        let walk = route(&[0xA, 0x51, 0xB]);
        let section = route(&[0xA, 0x51, 0xB, 0x52, 0xC]);

        let spliced = splice_walk(&walk, &hop(0xA, 0xB), &section).unwrap();
        assert_eq!(spliced, section);
    }

    #[test]
    fn test_splice_follows_reversed_hop() {
        let walk = route(&[0xA, 0x51, 0xB, 0x52, 0xC]);
        let section = route(&[0xC, 0x52, 0xB]);

        let spliced = splice_walk(&walk, &hop(0xC, 0xB), &section).unwrap();
        assert_eq!(spliced, walk);
    }

    #[test]
    fn test_splice_rejects_disconnected_section() {
        let walk = route(&[0xA, 0x51, 0xB, 0x52, 0xC, 0x53, 0xD]);
        let section = route(&[0xE, 0x55, 0xC]);

        assert_eq!(splice_walk(&walk, &hop(0xB, 0xC), &section), None);
    }
}
