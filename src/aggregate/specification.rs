// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Specification Catalogue Aggregate
//!
//! All specifications live in one catalogue stream under a well-known
//! aggregate id. The state is the same eagerly indexed
//! [`SpecificationLookup`] the projection keeps.

use uuid::Uuid;

use crate::aggregate::commands::CommandContext;
use crate::aggregate::error_code::ErrorCode;
use crate::domain::{Specification, SpecificationLookup, SpanStructureTemplate};
use crate::events::specification::*;

/// Aggregate id of the specification catalogue
pub const SPECIFICATIONS_AGGREGATE_ID: Uuid = Uuid::from_u128(0x5be0_0000_0000_7000_8000_0000_0000_0001);

/// Command validation error of the specification catalogue
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecificationError {
    #[error("Specification {0} already exists")]
    AlreadyExists(Uuid),

    #[error("Specification {referenced} referenced by {specification_id} not found")]
    ReferenceNotFound {
        specification_id: Uuid,
        referenced: Uuid,
    },

    #[error("Invalid specification: {0}")]
    Invalid(String),
}

impl SpecificationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SpecificationError::AlreadyExists(_) => ErrorCode::SpecificationAlreadyExists,
            SpecificationError::ReferenceNotFound { .. } => ErrorCode::SpecificationNotFound,
            SpecificationError::Invalid(_) => ErrorCode::InvalidSpecification,
        }
    }
}

/// Specification catalogue state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecificationsState {
    pub lookup: SpecificationLookup,
}

impl SpecificationsState {
    /// Reconstruct state from event stream
    pub fn from_events(events: &[SpecificationEvent]) -> Self {
        events
            .iter()
            .fold(Self::default(), |state, event| apply_event(state, event))
    }
}

/// Apply event to state (pure function)
pub fn apply_event(mut state: SpecificationsState, event: &SpecificationEvent) -> SpecificationsState {
    match event {
        SpecificationEvent::SpecificationAdded(e) => state.lookup.insert(e.specification.clone()),
    }
    state
}

/// Handle AddSpecification (any kind)
///
/// # Business Rules
/// - Ids are unique across all kinds
/// - Names must not be empty
/// - Referenced structure specifications must already exist
pub fn handle_add_specification(
    state: &SpecificationsState,
    ctx: &CommandContext,
    specification: Specification,
) -> Result<SpecificationEvent, SpecificationError> {
    let id = specification.id();

    if state.lookup.contains(id) {
        return Err(SpecificationError::AlreadyExists(id));
    }

    if specification.name().trim().is_empty() {
        return Err(SpecificationError::Invalid("name must not be empty".to_string()));
    }

    match &specification {
        Specification::SpanEquipment(s) => {
            check_template(&state.lookup, id, &s.root_template)?;
        }
        Specification::TerminalEquipment(s) => {
            if s.structure_templates.is_empty() {
                return Err(SpecificationError::Invalid(
                    "terminal equipment needs at least one structure template".to_string(),
                ));
            }
            for template in &s.structure_templates {
                let referenced = template.terminal_structure_specification_id;
                if state.lookup.terminal_structure(referenced).is_none() {
                    return Err(SpecificationError::ReferenceNotFound {
                        specification_id: id,
                        referenced,
                    });
                }
            }
        }
        _ => {}
    }

    Ok(SpecificationEvent::SpecificationAdded(SpecificationAdded {
        header: ctx.header(SPECIFICATIONS_AGGREGATE_ID),
        specification,
    }))
}

fn check_template(
    lookup: &SpecificationLookup,
    specification_id: Uuid,
    template: &SpanStructureTemplate,
) -> Result<(), SpecificationError> {
    for (_, template) in template.flatten() {
        let referenced = template.span_structure_specification_id;
        if lookup.span_structure(referenced).is_none() {
            return Err(SpecificationError::ReferenceNotFound {
                specification_id,
                referenced,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::commands::UserContext;
    use crate::domain::{SpanEquipmentSpecification, SpanStructureSpecification};

    fn ctx() -> CommandContext {
        CommandContext::new(
            Uuid::from_u128(0xC0),
            UserContext::new("test-user"),
            "2025-03-01T10:00:00Z".parse().unwrap(),
        )
    }

    fn tube() -> Specification {
        Specification::SpanStructure(SpanStructureSpecification {
            id: Uuid::from_u128(0x1001),
            category: "Conduit".to_string(),
            name: "Ø10 red".to_string(),
            color: "Red".to_string(),
            inner_diameter: Some(8),
            outer_diameter: Some(10),
        })
    }

    fn conduit() -> Specification {
        Specification::SpanEquipment(SpanEquipmentSpecification {
            id: Uuid::from_u128(0x2001),
            category: "Conduit".to_string(),
            name: "Ø10".to_string(),
            is_cable: false,
            root_template: SpanStructureTemplate::leaf(Uuid::from_u128(0x1001), 1, 1),
            manufacturer_refs: vec![],
        })
    }

    #[test]
    fn test_span_equipment_requires_structure_specification() {
        let state = SpecificationsState::default();
        let result = handle_add_specification(&state, &ctx(), conduit());
        assert_eq!(
            result,
            Err(SpecificationError::ReferenceNotFound {
                specification_id: Uuid::from_u128(0x2001),
                referenced: Uuid::from_u128(0x1001),
            })
        );

        let event = handle_add_specification(&state, &ctx(), tube()).unwrap();
        let state = apply_event(state, &event);
        let event = handle_add_specification(&state, &ctx(), conduit()).unwrap();
        let state = apply_event(state, &event);

        assert_eq!(
            state.lookup.span_equipment_id_by_name("Ø10"),
            Some(Uuid::from_u128(0x2001))
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let state = SpecificationsState::default();
        let event = handle_add_specification(&state, &ctx(), tube()).unwrap();
        let state = apply_event(state, &event);

        let result = handle_add_specification(&state, &ctx(), tube());
        assert_eq!(result.unwrap_err().code(), ErrorCode::SpecificationAlreadyExists);
    }
}
