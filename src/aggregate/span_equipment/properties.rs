// Copyright (c) 2025 - Cowboy AI, Inc.
//! Descriptive property changes
//!
//! Every handler rejects a change to the current value with `NoChange`.

use uuid::Uuid;

use super::{SpanEquipmentError, SpanEquipmentState};
use crate::aggregate::commands::CommandContext;
use crate::domain::{AddressInfo, MarkingInfo, NamingInfo, SpanEquipmentSpecification};
use crate::events::span_equipment::*;

pub fn handle_change_naming_info(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    naming_info: Option<NamingInfo>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if equipment.naming_info == naming_info {
        return Err(SpanEquipmentError::NoChange);
    }

    Ok(SpanEquipmentEvent::NamingInfoChanged(
        SpanEquipmentNamingInfoChanged {
            header: ctx.header(state.id),
            naming_info,
        },
    ))
}

pub fn handle_change_marking_info(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    marking_info: Option<MarkingInfo>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if equipment.marking_info == marking_info {
        return Err(SpanEquipmentError::NoChange);
    }

    Ok(SpanEquipmentEvent::MarkingInfoChanged(
        SpanEquipmentMarkingInfoChanged {
            header: ctx.header(state.id),
            marking_info,
        },
    ))
}

pub fn handle_change_address_info(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    address_info: Option<AddressInfo>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if equipment.address_info == address_info {
        return Err(SpanEquipmentError::NoChange);
    }

    Ok(SpanEquipmentEvent::AddressInfoChanged(
        SpanEquipmentAddressInfoChanged {
            header: ctx.header(state.id),
            address_info,
        },
    ))
}

/// Handle ChangeSpanEquipmentManufacturer
///
/// # Business Rules
/// - The manufacturer must be listed by the equipment's specification
pub fn handle_change_manufacturer(
    state: &SpanEquipmentState,
    ctx: &CommandContext,
    specification: &SpanEquipmentSpecification,
    manufacturer_id: Option<Uuid>,
) -> Result<SpanEquipmentEvent, SpanEquipmentError> {
    let equipment = state.equipment()?;

    if equipment.manufacturer_id == manufacturer_id {
        return Err(SpanEquipmentError::NoChange);
    }

    if let Some(id) = manufacturer_id {
        if !specification.manufacturer_refs.contains(&id) {
            return Err(SpanEquipmentError::ManufacturerNotInSpecification(id));
        }
    }

    Ok(SpanEquipmentEvent::ManufacturerChanged(
        SpanEquipmentManufacturerChanged {
            header: ctx.header(state.id),
            manufacturer_id,
        },
    ))
}
