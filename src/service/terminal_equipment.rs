// Copyright (c) 2025 - Cowboy AI, Inc.
//! Terminal equipment modification commands

use uuid::Uuid;

use super::notifier::{categories, entity_types};
use super::{EntityKind, EquipmentChange, ServiceError, ServiceResult, UnitOfWork, UtilityNetworkService};
use crate::aggregate::terminal_equipment;
use crate::aggregate::{CommandContext, TerminalEquipmentState};
use crate::domain::NamingInfo;
use crate::projection::UtilityGraph;

impl UtilityNetworkService {
    pub async fn add_additional_terminal_structures(
        &self,
        ctx: &CommandContext,
        terminal_equipment_id: Uuid,
        terminal_structure_specification_id: Uuid,
        count: usize,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let specification = graph
            .specifications()
            .terminal_structure(terminal_structure_specification_id)
            .ok_or(ServiceError::not_found(
                EntityKind::Specification,
                terminal_structure_specification_id,
            ))?;

        let equipment = self.load_existing::<TerminalEquipmentState>(terminal_equipment_id).await?;
        let event =
            terminal_equipment::handle_add_additional_structures(&equipment.state, ctx, specification, count)?;

        let route_node = route_node_of(&graph, &equipment.state)?;
        let mut work = UnitOfWork::new();
        work.append(terminal_equipment_id, equipment.version, event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::TERMINAL_STRUCTURES_ADDED)
                .modified(entity_types::TERMINAL_EQUIPMENT, vec![terminal_equipment_id])
                .affecting(route_node),
        )
        .await
    }

    /// Remove one terminal structure; none of its terminals may be connected
    pub async fn remove_terminal_structure(
        &self,
        ctx: &CommandContext,
        terminal_equipment_id: Uuid,
        structure_index: usize,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let equipment = self.load_existing::<TerminalEquipmentState>(terminal_equipment_id).await?;
        let connected = graph.connected_terminal_ids(equipment.state.equipment()?);

        let event =
            terminal_equipment::handle_remove_structure(&equipment.state, ctx, structure_index, &connected)?;

        let route_node = route_node_of(&graph, &equipment.state)?;
        let mut work = UnitOfWork::new();
        work.append(terminal_equipment_id, equipment.version, event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::TERMINAL_STRUCTURE_REMOVED)
                .modified(entity_types::TERMINAL_EQUIPMENT, vec![terminal_equipment_id])
                .affecting(route_node),
        )
        .await
    }

    pub async fn change_terminal_equipment_naming_info(
        &self,
        ctx: &CommandContext,
        terminal_equipment_id: Uuid,
        naming_info: Option<NamingInfo>,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let equipment = self.load_existing::<TerminalEquipmentState>(terminal_equipment_id).await?;
        let event = terminal_equipment::handle_change_naming_info(&equipment.state, ctx, naming_info)?;

        let route_node = route_node_of(&graph, &equipment.state)?;
        let mut work = UnitOfWork::new();
        work.append(terminal_equipment_id, equipment.version, event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::TERMINAL_EQUIPMENT_PROPERTIES_UPDATED)
                .modified(entity_types::TERMINAL_EQUIPMENT, vec![terminal_equipment_id])
                .affecting(route_node),
        )
        .await
    }
}

/// Route node of the container holding the equipment, if the container is still projected
fn route_node_of(graph: &UtilityGraph, state: &TerminalEquipmentState) -> ServiceResult<Option<Uuid>> {
    let equipment = state.equipment()?;
    Ok(graph
        .try_get_node_container(equipment.node_container_id)
        .map(|c| c.route_node_id))
}
