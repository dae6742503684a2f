// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Span Equipment Invariants
//!
//! Structural checks every span equipment must pass after any event has
//! been applied. Aggregates never emit an event that breaks these; the
//! service asserts them in debug builds and the property tests lean on them.
//!
//! # Invariants
//!
//! 1. `node_of_interest_ids` has at least two entries and no duplicates
//! 2. Every live structure's segments cover `0..=last` without gaps,
//!    in sequence order, each segment going strictly forward
//! 3. Segment `structure_index` matches its actual position
//! 4. Every hop starts and ends on different route nodes and rides at
//!    least one parent segment
//! 5. The outer structure is never removed

use std::collections::HashSet;

use super::span_equipment::SpanEquipment;

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Invariant violation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Span equipment must reference at least two nodes of interest")]
    TooFewNodesOfInterest,

    #[error("Node of interest {0} appears more than once")]
    DuplicateNodeOfInterest(uuid::Uuid),

    #[error("Structure {structure_index} has no segments")]
    EmptyStructure { structure_index: usize },

    #[error("Structure {structure_index} is not continuous at segment {sequence_number}")]
    Discontinuous {
        structure_index: usize,
        sequence_number: usize,
    },

    #[error("Structure {structure_index} does not cover the whole walk")]
    IncompleteCoverage { structure_index: usize },

    #[error("Segment {0} has a wrong structure index")]
    MisplacedSegment(uuid::Uuid),

    #[error("Hop from {0} has an invalid shape")]
    InvalidHop(uuid::Uuid),

    #[error("The outer structure cannot be removed")]
    OuterStructureRemoved,
}

/// Check all structural invariants of a span equipment
pub fn validate_span_equipment(equipment: &SpanEquipment) -> ValidationResult {
    validate_nodes_of_interest(equipment)?;

    if equipment.span_structures.first().map_or(true, |s| s.deleted) {
        return Err(ValidationError::OuterStructureRemoved);
    }

    let last_index = equipment.node_of_interest_ids.len() - 1;

    for (structure_index, structure) in equipment.active_structures() {
        let segments = &structure.span_segments;

        let first = segments
            .first()
            .ok_or(ValidationError::EmptyStructure { structure_index })?;

        if first.from_node_of_interest_index != 0 {
            return Err(ValidationError::IncompleteCoverage { structure_index });
        }

        let mut expected_from = 0;
        for (i, segment) in segments.iter().enumerate() {
            if segment.structure_index != structure_index {
                return Err(ValidationError::MisplacedSegment(segment.id));
            }

            if segment.sequence_number != i + 1
                || segment.from_node_of_interest_index != expected_from
                || segment.to_node_of_interest_index <= segment.from_node_of_interest_index
            {
                return Err(ValidationError::Discontinuous {
                    structure_index,
                    sequence_number: segment.sequence_number,
                });
            }
            expected_from = segment.to_node_of_interest_index;
        }

        if expected_from != last_index {
            return Err(ValidationError::IncompleteCoverage { structure_index });
        }
    }

    for hop in &equipment.utility_network_hops {
        if hop.from_node_id == hop.to_node_id || hop.parent_affixes.is_empty() {
            return Err(ValidationError::InvalidHop(hop.from_node_id));
        }
    }

    Ok(())
}

fn validate_nodes_of_interest(equipment: &SpanEquipment) -> ValidationResult {
    if equipment.node_of_interest_ids.len() < 2 {
        return Err(ValidationError::TooFewNodesOfInterest);
    }

    let mut seen = HashSet::new();
    for id in &equipment.node_of_interest_ids {
        if !seen.insert(*id) {
            return Err(ValidationError::DuplicateNodeOfInterest(*id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::span_equipment::{SpanSegment, SpanStructure};
    use uuid::Uuid;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn equipment(segments: Vec<SpanSegment>, nodes: usize) -> SpanEquipment {
        SpanEquipment {
            id: id(1),
            specification_id: id(2),
            walk_of_interest_id: id(3),
            node_of_interest_ids: (0..nodes).map(|n| id(100 + n as u128)).collect(),
            span_structures: vec![SpanStructure {
                id: id(4),
                specification_id: id(5),
                level: 1,
                position: 1,
                parent_position: 0,
                span_segments: segments,
                deleted: false,
            }],
            is_cable: false,
            is_multi_level: false,
            utility_network_hops: vec![],
            node_container_affixes: vec![],
            naming_info: None,
            marking_info: None,
            address_info: None,
            manufacturer_id: None,
        }
    }

    #[test]
    fn test_continuous_structure_is_valid() {
        let e = equipment(
            vec![SpanSegment::new(id(10), 0, 1, 0, 1), SpanSegment::new(id(11), 0, 2, 1, 2)],
            3,
        );
        assert_eq!(validate_span_equipment(&e), Ok(()));
    }

    #[test]
    fn test_gap_is_rejected() {
        let e = equipment(
            vec![SpanSegment::new(id(10), 0, 1, 0, 1), SpanSegment::new(id(11), 0, 2, 2, 3)],
            4,
        );
        assert!(matches!(
            validate_span_equipment(&e),
            Err(ValidationError::Discontinuous { structure_index: 0, .. })
        ));
    }

    #[test]
    fn test_partial_coverage_is_rejected() {
        let e = equipment(vec![SpanSegment::new(id(10), 0, 1, 0, 1)], 3);
        assert_eq!(
            validate_span_equipment(&e),
            Err(ValidationError::IncompleteCoverage { structure_index: 0 })
        );
    }

    #[test]
    fn test_duplicate_node_is_rejected() {
        let mut e = equipment(vec![SpanSegment::new(id(10), 0, 1, 0, 1)], 2);
        e.node_of_interest_ids[1] = e.node_of_interest_ids[0];
        assert!(matches!(
            validate_span_equipment(&e),
            Err(ValidationError::DuplicateNodeOfInterest(_))
        ));
    }
}
