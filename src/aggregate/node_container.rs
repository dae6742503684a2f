// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional NodeContainer Aggregate
//!
//! A node container is placed at one route node and holds racks and terminal
//! equipment. Span equipment affixed to it is recorded on the span
//! equipment, so the caller tells [`handle_remove`] whether any is left.

use uuid::Uuid;

use crate::aggregate::commands::CommandContext;
use crate::aggregate::error_code::ErrorCode;
use crate::domain::{
    NamingInfo, NodeContainer, NodeContainerSpecification, Rack, RackSpecification, SubrackMount,
};
use crate::events::node_container::*;

/// Command validation error of the node container aggregate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeContainerError {
    #[error("Node container {0} has not been placed")]
    NotPlaced(Uuid),

    #[error("Node container {0} already exists")]
    AlreadyPlaced(Uuid),

    #[error("Node container {0} has been removed")]
    Removed(Uuid),

    #[error("Manufacturer {0} is not listed by the specification")]
    ManufacturerNotInSpecification(Uuid),

    #[error("Rack {0} not found in node container")]
    RackNotFound(Uuid),

    #[error("A rack named '{0}' already exists in the node container")]
    RackNameAlreadyExists(String),

    #[error("Rack units {position}..{end} are occupied or outside the rack")]
    RackSpaceOccupied { position: u32, end: u32 },

    #[error("Terminal equipment {0} is already placed in the node container")]
    TerminalEquipmentAlreadyPlaced(Uuid),

    #[error("Node container still holds equipment")]
    NotEmpty,
}

impl NodeContainerError {
    pub fn code(&self) -> ErrorCode {
        use NodeContainerError::*;

        match self {
            NotPlaced(_) | Removed(_) => ErrorCode::NodeContainerNotFound,
            AlreadyPlaced(_) => ErrorCode::NodeContainerAlreadyExists,
            ManufacturerNotInSpecification(_) => ErrorCode::ManufacturerNotInSpecification,
            RackNotFound(_) => ErrorCode::RackNotFound,
            RackNameAlreadyExists(_) => ErrorCode::RackNameAlreadyExists,
            RackSpaceOccupied { .. } => ErrorCode::RackSpaceOccupied,
            TerminalEquipmentAlreadyPlaced(_) => ErrorCode::TerminalEquipmentAlreadyExists,
            NotEmpty => ErrorCode::NodeContainerNotEmpty,
        }
    }
}

/// NodeContainer aggregate state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeContainerState {
    pub id: Uuid,
    pub container: Option<NodeContainer>,
    pub removed: bool,
}

impl NodeContainerState {
    pub fn default_for(id: Uuid) -> Self {
        Self {
            id,
            container: None,
            removed: false,
        }
    }

    /// Reconstruct state from event stream
    pub fn from_events(id: Uuid, events: &[NodeContainerEvent]) -> Self {
        events
            .iter()
            .fold(Self::default_for(id), |state, event| apply_event(state, event))
    }

    pub fn is_initialized(&self) -> bool {
        self.container.is_some()
    }

    pub fn container(&self) -> Result<&NodeContainer, NodeContainerError> {
        if self.removed {
            return Err(NodeContainerError::Removed(self.id));
        }
        self.container
            .as_ref()
            .ok_or(NodeContainerError::NotPlaced(self.id))
    }
}

/// Apply event to state (pure function)
pub fn apply_event(mut state: NodeContainerState, event: &NodeContainerEvent) -> NodeContainerState {
    use NodeContainerEvent::*;

    match event {
        PlacedInRouteNetwork(e) => state.container = Some(e.container.clone()),

        RackAdded(e) => {
            if let Some(container) = state.container.as_mut() {
                container.racks.push(e.rack.clone());
            }
        }

        TerminalEquipmentAdded(e) => {
            if let Some(container) = state.container.as_mut() {
                container.terminal_equipment_ids.push(e.terminal_equipment_id);
            }
        }

        TerminalEquipmentMountedInRack(e) => {
            if let Some(rack) = state
                .container
                .as_mut()
                .and_then(|c| c.racks.iter_mut().find(|r| r.id == e.rack_id))
            {
                rack.sub_rack_mounts.push(e.mount);
            }
        }

        Removed(_) => state.removed = true,
    }

    state
}

/// Handle PlaceNodeContainerInRouteNetwork
///
/// The node-of-interest has been registered by the caller.
///
/// # Business Rules
/// - Container must not exist yet
/// - Manufacturer, if given, must be listed by the specification
pub fn handle_place_in_route_network(
    state: &NodeContainerState,
    ctx: &CommandContext,
    specification: &NodeContainerSpecification,
    route_node_id: Uuid,
    interest_id: Uuid,
    manufacturer_id: Option<Uuid>,
    naming_info: Option<NamingInfo>,
) -> Result<NodeContainerEvent, NodeContainerError> {
    if state.is_initialized() {
        return Err(NodeContainerError::AlreadyPlaced(state.id));
    }

    if let Some(id) = manufacturer_id {
        if !specification.manufacturer_refs.contains(&id) {
            return Err(NodeContainerError::ManufacturerNotInSpecification(id));
        }
    }

    Ok(NodeContainerEvent::PlacedInRouteNetwork(
        NodeContainerPlacedInRouteNetwork {
            header: ctx.header(state.id),
            container: NodeContainer {
                id: state.id,
                specification_id: specification.id,
                route_node_id,
                interest_id,
                manufacturer_id,
                naming_info,
                racks: Vec::new(),
                terminal_equipment_ids: Vec::new(),
            },
        },
    ))
}

/// Handle AddRackToNodeContainer
///
/// # Business Rules
/// - Rack names are unique within the container
pub fn handle_add_rack(
    state: &NodeContainerState,
    ctx: &CommandContext,
    rack_id: Uuid,
    specification: &RackSpecification,
    name: &str,
    height_in_units: u32,
) -> Result<NodeContainerEvent, NodeContainerError> {
    let container = state.container()?;

    if container.racks.iter().any(|r| r.name == name) {
        return Err(NodeContainerError::RackNameAlreadyExists(name.to_string()));
    }

    Ok(NodeContainerEvent::RackAdded(NodeContainerRackAdded {
        header: ctx.header(state.id),
        rack: Rack {
            id: rack_id,
            name: name.to_string(),
            specification_id: specification.id,
            position: container.next_rack_position(),
            height_in_units,
            sub_rack_mounts: Vec::new(),
        },
    }))
}

/// Where terminal equipment goes inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEquipmentPlacement {
    /// Loose in the container
    Container,
    /// Mounted in a rack starting at a unit position
    Rack {
        rack_id: Uuid,
        position_in_rack: u32,
        height_in_units: u32,
    },
}

/// Handle PlaceTerminalEquipmentInNodeContainer
///
/// # Business Rules
/// - The terminal equipment is placed at most once
/// - Rack units must be free and inside the rack
pub fn handle_place_terminal_equipment(
    state: &NodeContainerState,
    ctx: &CommandContext,
    terminal_equipment_id: Uuid,
    placement: TerminalEquipmentPlacement,
) -> Result<NodeContainerEvent, NodeContainerError> {
    let container = state.container()?;

    if container.contains_terminal_equipment(terminal_equipment_id) {
        return Err(NodeContainerError::TerminalEquipmentAlreadyPlaced(terminal_equipment_id));
    }

    match placement {
        TerminalEquipmentPlacement::Container => Ok(NodeContainerEvent::TerminalEquipmentAdded(
            NodeContainerTerminalEquipmentAdded {
                header: ctx.header(state.id),
                terminal_equipment_id,
            },
        )),

        TerminalEquipmentPlacement::Rack {
            rack_id,
            position_in_rack,
            height_in_units,
        } => {
            let rack = container
                .rack(rack_id)
                .ok_or(NodeContainerError::RackNotFound(rack_id))?;

            let end = position_in_rack + height_in_units;
            let outside = position_in_rack == 0 || end > rack.height_in_units + 1;

            if outside
                || rack
                    .sub_rack_mounts
                    .iter()
                    .any(|m| m.overlaps(position_in_rack, height_in_units))
            {
                return Err(NodeContainerError::RackSpaceOccupied {
                    position: position_in_rack,
                    end,
                });
            }

            Ok(NodeContainerEvent::TerminalEquipmentMountedInRack(
                NodeContainerTerminalEquipmentMountedInRack {
                    header: ctx.header(state.id),
                    rack_id,
                    mount: SubrackMount {
                        terminal_equipment_id,
                        position_in_rack,
                        height_in_units,
                    },
                },
            ))
        }
    }
}

/// Handle RemoveNodeContainer
///
/// # Business Rules
/// - No terminal equipment may be placed in it
/// - No span equipment may be affixed to it
pub fn handle_remove(
    state: &NodeContainerState,
    ctx: &CommandContext,
    has_affixed_span_equipment: bool,
) -> Result<NodeContainerEvent, NodeContainerError> {
    let container = state.container()?;

    let holds_terminal_equipment = !container.terminal_equipment_ids.is_empty()
        || container.racks.iter().any(|r| !r.sub_rack_mounts.is_empty());

    if holds_terminal_equipment || has_affixed_span_equipment {
        return Err(NodeContainerError::NotEmpty);
    }

    Ok(NodeContainerEvent::Removed(NodeContainerRemoved {
        header: ctx.header(state.id),
    }))
}
