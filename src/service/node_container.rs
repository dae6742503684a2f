// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node container and terminal equipment placement commands

use tracing::info;
use uuid::Uuid;

use super::notifier::{categories, entity_types};
use super::{
    EntityKind, EquipmentChange, InterestChange, ServiceError, ServiceResult, UnitOfWork,
    UtilityNetworkService,
};
use crate::aggregate::{node_container, terminal_equipment};
use crate::aggregate::{
    CommandContext, NodeContainerState, TerminalEquipmentPlacement, TerminalEquipmentState,
};
use crate::domain::{NamingInfo, RouteNetworkElementKind};
use crate::route_network::RelatedInterestFilter;

impl UtilityNetworkService {
    /// Place a node container at a route node
    ///
    /// Registers a node of interest for the container. A route node holds
    /// at most one container.
    pub async fn place_node_container_in_route_network(
        &self,
        ctx: &CommandContext,
        node_container_id: Uuid,
        specification_id: Uuid,
        route_node_id: Uuid,
        manufacturer_id: Option<Uuid>,
        naming_info: Option<NamingInfo>,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let specification = graph
            .specifications()
            .node_container(specification_id)
            .ok_or(ServiceError::not_found(EntityKind::Specification, specification_id))?;

        let details = self
            .gateway()
            .get_route_network_details(&[route_node_id], RelatedInterestFilter::None)
            .await?;
        if !details
            .elements
            .iter()
            .any(|e| e.id == route_node_id && e.kind == RouteNetworkElementKind::RouteNode)
        {
            return Err(ServiceError::InvalidCommand(format!(
                "{route_node_id} is not a route node"
            )));
        }

        if let Some(existing) = graph.node_container_at(route_node_id) {
            return Err(ServiceError::InvalidCommand(format!(
                "route node {route_node_id} already holds node container {}",
                existing.id
            )));
        }

        let container = self.load::<NodeContainerState>(node_container_id).await?;
        let interest_id = Uuid::now_v7();

        let event = node_container::handle_place_in_route_network(
            &container.state,
            ctx,
            specification,
            route_node_id,
            interest_id,
            manufacturer_id,
            naming_info,
        )?;

        let mut work = UnitOfWork::new();
        work.append(node_container_id, container.version, event);
        work.change_interest(InterestChange::RegisterNode {
            interest_id,
            route_node_id,
        });

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::NODE_CONTAINER_PLACED)
                .added(entity_types::NODE_CONTAINER, vec![node_container_id])
                .affecting([route_node_id]),
        )
        .await?;

        info!(%node_container_id, %route_node_id, "Node container placed");
        Ok(())
    }

    pub async fn add_rack_to_node_container(
        &self,
        ctx: &CommandContext,
        node_container_id: Uuid,
        rack_id: Uuid,
        rack_specification_id: Uuid,
        name: &str,
        height_in_units: u32,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let specification = graph
            .specifications()
            .rack(rack_specification_id)
            .ok_or(ServiceError::not_found(EntityKind::Specification, rack_specification_id))?;

        let container = self.load_existing::<NodeContainerState>(node_container_id).await?;
        let route_node_id = container.state.container()?.route_node_id;

        let event = node_container::handle_add_rack(
            &container.state,
            ctx,
            rack_id,
            specification,
            name,
            height_in_units,
        )?;

        let mut work = UnitOfWork::new();
        work.append(node_container_id, container.version, event);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::RACK_ADDED)
                .modified(entity_types::NODE_CONTAINER, vec![node_container_id])
                .affecting([route_node_id]),
        )
        .await
    }

    /// Create terminal equipment inside a node container, optionally in a rack
    pub async fn place_terminal_equipment_in_node_container(
        &self,
        ctx: &CommandContext,
        terminal_equipment_id: Uuid,
        specification_id: Uuid,
        node_container_id: Uuid,
        placement: TerminalEquipmentPlacement,
        naming_info: Option<NamingInfo>,
    ) -> ServiceResult<()> {
        let graph = self.graph().await;
        let lookup = graph.specifications();
        let specification = lookup
            .terminal_equipment(specification_id)
            .ok_or(ServiceError::not_found(EntityKind::Specification, specification_id))?;

        let container = self.load_existing::<NodeContainerState>(node_container_id).await?;
        let route_node_id = container.state.container()?.route_node_id;
        let equipment = self.load::<TerminalEquipmentState>(terminal_equipment_id).await?;

        let placed = terminal_equipment::handle_place(
            &equipment.state,
            ctx,
            specification,
            lookup,
            node_container_id,
            naming_info,
        )?;
        let recorded = node_container::handle_place_terminal_equipment(
            &container.state,
            ctx,
            terminal_equipment_id,
            placement,
        )?;

        let mut work = UnitOfWork::new();
        work.append(terminal_equipment_id, equipment.version, placed);
        work.append(node_container_id, container.version, recorded);

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::TERMINAL_EQUIPMENT_PLACED)
                .added(entity_types::TERMINAL_EQUIPMENT, vec![terminal_equipment_id])
                .modified(entity_types::NODE_CONTAINER, vec![node_container_id])
                .affecting([route_node_id]),
        )
        .await?;

        info!(%terminal_equipment_id, %node_container_id, "Terminal equipment placed");
        Ok(())
    }

    /// Remove an empty node container and its node of interest
    pub async fn remove_node_container(&self, ctx: &CommandContext, node_container_id: Uuid) -> ServiceResult<()> {
        let graph = self.graph().await;
        let container = self.load_existing::<NodeContainerState>(node_container_id).await?;
        let placed = container.state.container()?;
        let (route_node_id, interest_id) = (placed.route_node_id, placed.interest_id);

        let event = node_container::handle_remove(
            &container.state,
            ctx,
            graph.has_span_equipment_affixed_to(node_container_id),
        )?;

        let mut work = UnitOfWork::new();
        work.append(node_container_id, container.version, event);
        work.change_interest(InterestChange::Unregister { interest_id });

        self.commit(
            ctx,
            work,
            EquipmentChange::new(categories::NODE_CONTAINER_REMOVED)
                .deleted(entity_types::NODE_CONTAINER, vec![node_container_id])
                .affecting([route_node_id]),
        )
        .await
    }
}
