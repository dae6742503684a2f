// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional TerminalEquipment Aggregate
//!
//! Splice closures, patch panels and similar equipment. Each terminal
//! structure is created from a terminal structure specification and gets one
//! terminal per template. Which span segments are connected to a terminal is
//! recorded on the span segments; callers pass the connected terminal ids in.

use std::collections::HashSet;
use uuid::Uuid;

use crate::aggregate::commands::CommandContext;
use crate::aggregate::error_code::ErrorCode;
use crate::domain::{
    NamingInfo, SpecificationLookup, Terminal, TerminalEquipment, TerminalEquipmentSpecification,
    TerminalStructure, TerminalStructureSpecification,
};
use crate::events::terminal_equipment::*;

/// Command validation error of the terminal equipment aggregate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TerminalEquipmentError {
    #[error("Terminal equipment {0} has not been placed")]
    NotPlaced(Uuid),

    #[error("Terminal equipment {0} already exists")]
    AlreadyPlaced(Uuid),

    #[error("Terminal structure specification {0} not found")]
    StructureSpecificationNotFound(Uuid),

    #[error("Terminal structure {0} not found")]
    StructureNotFound(usize),

    #[error("Terminal structure {0} has connected terminals")]
    StructureConnected(usize),

    #[error("Nothing changed")]
    NoChange,
}

impl TerminalEquipmentError {
    pub fn code(&self) -> ErrorCode {
        use TerminalEquipmentError::*;

        match self {
            NotPlaced(_) => ErrorCode::TerminalEquipmentNotFound,
            AlreadyPlaced(_) => ErrorCode::TerminalEquipmentAlreadyExists,
            StructureSpecificationNotFound(_) => ErrorCode::SpecificationNotFound,
            StructureNotFound(_) => ErrorCode::TerminalStructureNotFound,
            StructureConnected(_) => ErrorCode::TerminalStructureConnected,
            NoChange => ErrorCode::NoChange,
        }
    }
}

/// TerminalEquipment aggregate state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEquipmentState {
    pub id: Uuid,
    pub equipment: Option<TerminalEquipment>,
}

impl TerminalEquipmentState {
    pub fn default_for(id: Uuid) -> Self {
        Self { id, equipment: None }
    }

    /// Reconstruct state from event stream
    pub fn from_events(id: Uuid, events: &[TerminalEquipmentEvent]) -> Self {
        events
            .iter()
            .fold(Self::default_for(id), |state, event| apply_event(state, event))
    }

    pub fn is_initialized(&self) -> bool {
        self.equipment.is_some()
    }

    pub fn equipment(&self) -> Result<&TerminalEquipment, TerminalEquipmentError> {
        self.equipment
            .as_ref()
            .ok_or(TerminalEquipmentError::NotPlaced(self.id))
    }
}

/// Apply event to state (pure function)
pub fn apply_event(
    mut state: TerminalEquipmentState,
    event: &TerminalEquipmentEvent,
) -> TerminalEquipmentState {
    use TerminalEquipmentEvent::*;

    if let Placed(e) = event {
        state.equipment = Some(e.equipment.clone());
        return state;
    }

    let Some(equipment) = state.equipment.as_mut() else {
        return state;
    };

    match event {
        StructuresAdded(e) => equipment
            .terminal_structures
            .extend(e.terminal_structures.iter().cloned()),

        StructureRemoved(e) => {
            if let Some(structure) = equipment.terminal_structures.get_mut(e.structure_index) {
                structure.deleted = true;
            }
        }

        NamingInfoChanged(e) => equipment.naming_info = e.naming_info.clone(),

        Placed(_) => {}
    }

    state
}

/// New terminal structure with fresh terminal ids
pub fn terminal_structure_from_specification(
    specification: &TerminalStructureSpecification,
    position: u32,
) -> TerminalStructure {
    TerminalStructure {
        id: Uuid::now_v7(),
        specification_id: specification.id,
        position,
        terminals: specification
            .terminal_templates
            .iter()
            .map(|template| Terminal {
                id: Uuid::now_v7(),
                name: template.name.clone(),
                direction: template.direction,
            })
            .collect(),
        deleted: false,
    }
}

/// Handle PlaceTerminalEquipment
///
/// # Business Rules
/// - Equipment must not exist yet
/// - Every structure template must reference a known terminal structure specification
pub fn handle_place(
    state: &TerminalEquipmentState,
    ctx: &CommandContext,
    specification: &TerminalEquipmentSpecification,
    specifications: &SpecificationLookup,
    node_container_id: Uuid,
    naming_info: Option<NamingInfo>,
) -> Result<TerminalEquipmentEvent, TerminalEquipmentError> {
    if state.is_initialized() {
        return Err(TerminalEquipmentError::AlreadyPlaced(state.id));
    }

    let mut templates: Vec<_> = specification.structure_templates.iter().collect();
    templates.sort_by_key(|t| t.position);

    let terminal_structures = templates
        .into_iter()
        .map(|template| {
            specifications
                .terminal_structure(template.terminal_structure_specification_id)
                .map(|s| terminal_structure_from_specification(s, template.position))
                .ok_or(TerminalEquipmentError::StructureSpecificationNotFound(
                    template.terminal_structure_specification_id,
                ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TerminalEquipmentEvent::Placed(TerminalEquipmentPlaced {
        header: ctx.header(state.id),
        equipment: TerminalEquipment {
            id: state.id,
            specification_id: specification.id,
            node_container_id,
            naming_info,
            terminal_structures,
        },
    }))
}

/// Handle AddAdditionalTerminalStructures
pub fn handle_add_additional_structures(
    state: &TerminalEquipmentState,
    ctx: &CommandContext,
    specification: &TerminalStructureSpecification,
    count: usize,
) -> Result<TerminalEquipmentEvent, TerminalEquipmentError> {
    let equipment = state.equipment()?;

    if count == 0 {
        return Err(TerminalEquipmentError::NoChange);
    }

    let first_position = equipment.next_structure_position();
    let terminal_structures = (0..count)
        .map(|i| terminal_structure_from_specification(specification, first_position + i as u32))
        .collect();

    Ok(TerminalEquipmentEvent::StructuresAdded(
        AdditionalTerminalStructuresAdded {
            header: ctx.header(state.id),
            terminal_structures,
        },
    ))
}

/// Handle RemoveTerminalStructure
///
/// # Business Rules
/// - No terminal of the structure may be connected
pub fn handle_remove_structure(
    state: &TerminalEquipmentState,
    ctx: &CommandContext,
    structure_index: usize,
    connected_terminal_ids: &HashSet<Uuid>,
) -> Result<TerminalEquipmentEvent, TerminalEquipmentError> {
    let equipment = state.equipment()?;

    let structure = equipment
        .terminal_structures
        .get(structure_index)
        .filter(|s| !s.deleted)
        .ok_or(TerminalEquipmentError::StructureNotFound(structure_index))?;

    if structure
        .terminals
        .iter()
        .any(|t| connected_terminal_ids.contains(&t.id))
    {
        return Err(TerminalEquipmentError::StructureConnected(structure_index));
    }

    Ok(TerminalEquipmentEvent::StructureRemoved(TerminalStructureRemoved {
        header: ctx.header(state.id),
        structure_index,
    }))
}

pub fn handle_change_naming_info(
    state: &TerminalEquipmentState,
    ctx: &CommandContext,
    naming_info: Option<NamingInfo>,
) -> Result<TerminalEquipmentEvent, TerminalEquipmentError> {
    let equipment = state.equipment()?;

    if equipment.naming_info == naming_info {
        return Err(TerminalEquipmentError::NoChange);
    }

    Ok(TerminalEquipmentEvent::NamingInfoChanged(
        TerminalEquipmentNamingInfoChanged {
            header: ctx.header(state.id),
            naming_info,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::commands::UserContext;
    use crate::domain::{Specification, TerminalDirection, TerminalStructureTemplate, TerminalTemplate};

    const EQUIPMENT: Uuid = Uuid::from_u128(0x700);
    const TRAY_SPEC: Uuid = Uuid::from_u128(0x4300);

    fn ctx() -> CommandContext {
        CommandContext::new(
            Uuid::from_u128(0xC0),
            UserContext::new("test-user"),
            "2025-03-01T10:00:00Z".parse().unwrap(),
        )
    }

    fn tray() -> TerminalStructureSpecification {
        TerminalStructureSpecification {
            id: TRAY_SPEC,
            category: "SpliceTray".to_string(),
            name: "Tray 4".to_string(),
            terminal_templates: (1..=4)
                .map(|i| TerminalTemplate {
                    name: i.to_string(),
                    direction: TerminalDirection::Bi,
                })
                .collect(),
        }
    }

    fn closure_spec() -> TerminalEquipmentSpecification {
        TerminalEquipmentSpecification {
            id: Uuid::from_u128(0x4400),
            category: "SpliceClosure".to_string(),
            name: "Closure 2 trays".to_string(),
            is_rack_equipment: false,
            height_in_rack_units: 0,
            structure_templates: vec![
                TerminalStructureTemplate {
                    terminal_structure_specification_id: TRAY_SPEC,
                    position: 2,
                },
                TerminalStructureTemplate {
                    terminal_structure_specification_id: TRAY_SPEC,
                    position: 1,
                },
            ],
        }
    }

    fn lookup() -> SpecificationLookup {
        let mut lookup = SpecificationLookup::new();
        lookup.insert(Specification::TerminalStructure(tray()));
        lookup
    }

    fn placed() -> TerminalEquipmentState {
        let state = TerminalEquipmentState::default_for(EQUIPMENT);
        let event = handle_place(&state, &ctx(), &closure_spec(), &lookup(), Uuid::from_u128(0x500), None).unwrap();
        apply_event(state, &event)
    }

    #[test]
    fn test_place_creates_structures_in_position_order() {
        let state = placed();
        let equipment = state.equipment().unwrap();

        assert_eq!(equipment.terminal_structures.len(), 2);
        assert_eq!(equipment.terminal_structures[0].position, 1);
        assert_eq!(equipment.terminal_structures[1].position, 2);
        assert_eq!(equipment.terminals().count(), 8);
    }

    #[test]
    fn test_place_with_unknown_structure_specification_fails() {
        let state = TerminalEquipmentState::default_for(EQUIPMENT);
        let result = handle_place(
            &state,
            &ctx(),
            &closure_spec(),
            &SpecificationLookup::new(),
            Uuid::from_u128(0x500),
            None,
        );
        assert_eq!(result, Err(TerminalEquipmentError::StructureSpecificationNotFound(TRAY_SPEC)));
    }

    #[test]
    fn test_add_structures_continues_positions() {
        let state = placed();
        let event = handle_add_additional_structures(&state, &ctx(), &tray(), 2).unwrap();
        let state = apply_event(state, &event);
        let positions: Vec<u32> = state
            .equipment()
            .unwrap()
            .terminal_structures
            .iter()
            .map(|s| s.position)
            .collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_connected_structure_fails() {
        let state = placed();
        let terminal = state.equipment().unwrap().terminal_structures[0].terminals[0].id;
        let connected: HashSet<Uuid> = [terminal].into_iter().collect();

        assert_eq!(
            handle_remove_structure(&state, &ctx(), 0, &connected),
            Err(TerminalEquipmentError::StructureConnected(0))
        );

        let event = handle_remove_structure(&state, &ctx(), 1, &connected).unwrap();
        let state = apply_event(state, &event);
        assert_eq!(state.equipment().unwrap().terminals().count(), 4);
    }
}
