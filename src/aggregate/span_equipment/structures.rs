// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inner structures, specification changes and removal

use std::collections::HashSet;
use uuid::Uuid;

use super::place::structures_from_specification;
use super::{SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::commands::CommandContext;
use crate::domain::{
    SpanEquipment, SpanEquipmentSpecification, SpanSegment, SpanSegmentEnd, SpanStructure,
};
use crate::events::span_equipment::*;

/// Handle AddAdditionalInnerSpanStructures
///
/// Each new structure gets one segment covering the whole walk.
///
/// # Business Rules
/// - Only multi-level conduits have inner structures
/// - At least one structure specification
pub fn handle_add_additional_structures(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    structure_specification_ids: &[Uuid],
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if equipment.is_cable {
        return Err(SpanEquipmentError::ExpectedConduit);
    }

    if !equipment.is_multi_level {
        return Err(SpanEquipmentError::InvalidSpecification(
            "inner structures can only be added to multi-level conduits".to_string(),
        ));
    }

    if structure_specification_ids.is_empty() {
        return Err(SpanEquipmentError::NoChange);
    }

    let outer = &equipment.span_structures[0];
    let last_index = equipment.node_of_interest_ids.len() - 1;
    let next_position = equipment
        .active_structures()
        .filter(|(i, _)| *i > 0)
        .map(|(_, s)| s.position)
        .max()
        .unwrap_or(0)
        + 1;

    let span_structures = structure_specification_ids
        .iter()
        .enumerate()
        .map(|(i, specification_id)| {
            let structure_index = equipment.span_structures.len() + i;
            SpanStructure {
                id: Uuid::now_v7(),
                specification_id: *specification_id,
                level: outer.level + 1,
                position: next_position + i as u32,
                parent_position: outer.position,
                span_segments: vec![SpanSegment::new(Uuid::now_v7(), structure_index, 1, 0, last_index)],
                deleted: false,
            }
        })
        .collect();

    Ok(SpanEquipmentEvent::StructuresAdded(AdditionalStructuresAdded {
        header: ctx.header(state.id),
        span_structures,
    }))
}

/// Handle RemoveSpanStructure
///
/// # Business Rules
/// - The outer structure cannot be removed (remove the equipment instead)
/// - No segment of the structure may carry a cable
/// - No segment of the structure may be connected
pub fn handle_remove_structure(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    structure_index: usize,
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if structure_index == 0 {
        return Err(SpanEquipmentError::CannotRemoveOuterStructure);
    }

    let structure = equipment
        .span_structures
        .get(structure_index)
        .filter(|s| !s.deleted)
        .ok_or(SpanEquipmentError::StructureIndexOutOfBounds(structure_index))?;

    check_structure_free(equipment, structure_index, structure, cable_carrying_segment_ids)?;

    Ok(SpanEquipmentEvent::StructureRemoved(SpanStructureRemoved {
        header: ctx.header(state.id),
        structure_index,
    }))
}

/// Handle RemoveSpanEquipment
///
/// # Business Rules
/// - No segment may carry a cable
pub fn handle_remove(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if equipment
        .all_segments()
        .any(|s| cable_carrying_segment_ids.contains(&s.id))
    {
        return Err(SpanEquipmentError::ContainsCables);
    }

    Ok(SpanEquipmentEvent::Removed(SpanEquipmentRemoved {
        header: ctx.header(state.id),
    }))
}

/// Handle ChangeSpanEquipmentSpecification
///
/// Existing structures are matched to the new specification's templates
/// positionally. Surplus structures are removed, surplus templates become
/// new structures.
///
/// # Business Rules
/// - The new specification must differ and keep the cable/conduit kind
/// - Removed structures must not carry cables or be connected
pub fn handle_change_specification(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    specification: &SpanEquipmentSpecification,
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if equipment.specification_id == specification.id {
        return Err(SpanEquipmentError::NoChange);
    }

    if equipment.is_cable != specification.is_cable {
        return Err(SpanEquipmentError::InvalidSpecification(
            "cannot change between cable and conduit".to_string(),
        ));
    }

    let last_index = equipment.node_of_interest_ids.len() - 1;
    let mut templates = structures_from_specification(specification, 0, last_index).into_iter();

    let mut structure_specification_ids = Vec::new();
    let mut removed_structure_indices = Vec::new();

    for (structure_index, structure) in equipment.active_structures() {
        match templates.next() {
            Some(template) => structure_specification_ids.push((structure_index, template.specification_id)),
            None => {
                check_structure_free(equipment, structure_index, structure, cable_carrying_segment_ids)?;
                removed_structure_indices.push(structure_index);
            }
        }
    }

    let added_structures = templates
        .enumerate()
        .map(|(i, mut structure)| {
            let structure_index = equipment.span_structures.len() + i;
            for segment in structure.span_segments.iter_mut() {
                segment.structure_index = structure_index;
            }
            structure
        })
        .collect();

    Ok(SpanEquipmentEvent::SpecificationChanged(
        SpanEquipmentSpecificationChanged {
            header: ctx.header(state.id),
            specification_id: specification.id,
            is_multi_level: specification.is_multi_level(),
            structure_specification_ids,
            added_structures,
            removed_structure_indices,
        },
    ))
}

fn check_structure_free(
    equipment: &SpanEquipment,
    structure_index: usize,
    structure: &SpanStructure,
    cable_carrying_segment_ids: &HashSet<Uuid>,
) -> Result<(), SpanEquipmentError> {
    for segment in &structure.span_segments {
        if cable_carrying_segment_ids.contains(&segment.id) {
            return Err(SpanEquipmentError::StructureContainsCable(structure_index));
        }
        if let Some(terminal_end) = [SpanSegmentEnd::From, SpanSegmentEnd::To]
            .into_iter()
            .find(|end| segment.terminal_id(*end).is_some())
        {
            return Err(SpanEquipmentError::SegmentsConnectedAtRouteNode(
                equipment.segment_node_id(segment, terminal_end),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::span_equipment::test_support::*;
    use crate::domain::{validate_span_equipment, SpanStructureTemplate};

    #[test]
    fn test_add_structures_to_multi_level_conduit() {
        let state = placed_conduit(id(1), &[A, S1, B]);
        let event = handle_add_additional_structures(&state, &ctx(), &[RED_TUBE_SPEC, BLUE_TUBE_SPEC]).unwrap();
        let state = apply(state, &event);
        let equipment = state.equipment().unwrap();

        assert_eq!(equipment.span_structures.len(), 5);
        assert_eq!(equipment.span_structures[3].position, 3);
        assert_eq!(equipment.span_structures[4].position, 4);
        assert_eq!(equipment.span_structures[4].span_segments[0].structure_index, 4);
        assert!(validate_span_equipment(equipment).is_ok());
    }

    #[test]
    fn test_add_structures_to_single_conduit_fails() {
        let state = placed(id(1), &single_conduit_spec(), &[A, S1, B]);
        let result = handle_add_additional_structures(&state, &ctx(), &[RED_TUBE_SPEC]);
        assert!(matches!(result, Err(SpanEquipmentError::InvalidSpecification(_))));
    }

    #[test]
    fn test_remove_outer_structure_fails() {
        let state = placed_conduit(id(1), &[A, S1, B]);
        let result = handle_remove_structure(&state, &ctx(), 0, &HashSet::new());
        assert_eq!(result, Err(SpanEquipmentError::CannotRemoveOuterStructure));
    }

    #[test]
    fn test_remove_structure_with_cable_fails() {
        let state = placed_conduit(id(1), &[A, S1, B]);
        let red = segment_id(&state, 1, 1);
        let carrying: HashSet<Uuid> = [red].into_iter().collect();

        let result = handle_remove_structure(&state, &ctx(), 1, &carrying);
        assert_eq!(result, Err(SpanEquipmentError::StructureContainsCable(1)));

        let event = handle_remove_structure(&state, &ctx(), 2, &carrying).unwrap();
        let state = apply(state, &event);
        assert!(state.equipment().unwrap().span_structures[2].deleted);

        let again = handle_remove_structure(&state, &ctx(), 2, &carrying);
        assert_eq!(again, Err(SpanEquipmentError::StructureIndexOutOfBounds(2)));
    }

    #[test]
    fn test_remove_equipment_with_cable_fails() {
        let state = placed_conduit(id(1), &[A, S1, B]);
        let outer = segment_id(&state, 0, 1);
        let carrying: HashSet<Uuid> = [outer].into_iter().collect();

        assert_eq!(
            handle_remove(&state, &ctx(), &carrying),
            Err(SpanEquipmentError::ContainsCables)
        );

        let event = handle_remove(&state, &ctx(), &HashSet::new()).unwrap();
        let state = apply(state, &event);
        assert_eq!(state.equipment(), Err(SpanEquipmentError::Removed(id(1))));
    }

    #[test]
    fn test_change_specification_remaps_and_removes() {
        let state = placed_conduit(id(1), &[A, S1, B]);
        let mut smaller = multi_conduit_spec();
        smaller.id = id(0x2100);
        smaller.root_template.child_templates = vec![SpanStructureTemplate::leaf(BLUE_TUBE_SPEC, 2, 1)];

        let event = handle_change_specification(&state, &ctx(), &smaller, &HashSet::new()).unwrap();
        let state = apply(state, &event);
        let equipment = state.equipment().unwrap();

        assert_eq!(equipment.specification_id, id(0x2100));
        assert_eq!(equipment.span_structures[1].specification_id, BLUE_TUBE_SPEC);
        assert!(equipment.span_structures[2].deleted);
        assert!(validate_span_equipment(equipment).is_ok());
    }

    #[test]
    fn test_change_specification_to_cable_fails() {
        let state = placed_conduit(id(1), &[A, S1, B]);
        let result = handle_change_specification(&state, &ctx(), &cable_spec(), &HashSet::new());
        assert!(matches!(result, Err(SpanEquipmentError::InvalidSpecification(_))));
    }
}
