// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional SpanEquipment Aggregate
//!
//! One aggregate per conduit or cable. The state is rebuilt by folding its
//! events; command handlers are pure functions that validate against the
//! state and return the event(s) to append.
//!
//! # Architecture
//!
//! ```text
//! Command → handle_*(state, ctx, …) → Result<Event, SpanEquipmentError>
//!                                          ↓
//! Events → apply_event() → New State
//! ```
//!
//! Facts owned by other aggregates (which conduit segments carry cables,
//! the validated walk of interest) are passed in by the caller; handlers
//! never perform I/O.
//!
//! # Handlers
//!
//! - [`place`] - creation from a specification
//! - [`affix`] - parent conduits and node containers
//! - [`connectivity`] - terminal connects and disconnects
//! - [`cut`] - cutting, reverting cuts, splitting cables
//! - [`merge`] - absorbing walk-adjacent equipment
//! - [`relocate`] - moving and shrinking the walk
//! - [`structures`] - adding/removing inner structures, removal
//! - [`properties`] - metadata changes

use uuid::Uuid;

use crate::domain::{SpanEquipment, SpanStructure};
use crate::events::span_equipment::*;

pub mod affix;
pub mod connectivity;
pub mod cut;
pub mod error;
pub mod merge;
pub mod place;
pub mod properties;
pub mod relocate;
pub mod structures;

#[cfg(test)]
pub(crate) mod test_support;

pub use affix::*;
pub use connectivity::*;
pub use cut::*;
pub use error::SpanEquipmentError;
pub use merge::*;
pub use place::*;
pub use properties::*;
pub use relocate::*;
pub use structures::*;

/// SpanEquipment aggregate state
///
/// `equipment` is `None` until the placement event has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanEquipmentState {
    pub id: Uuid,
    pub equipment: Option<SpanEquipment>,
    pub removed: bool,
}

impl SpanEquipmentState {
    /// Initial state for event folding
    pub fn default_for(id: Uuid) -> Self {
        Self {
            id,
            equipment: None,
            removed: false,
        }
    }

    /// Reconstruct state from event stream
    pub fn from_events(id: Uuid, events: &[SpanEquipmentEvent]) -> Self {
        events
            .iter()
            .fold(Self::default_for(id), |state, event| apply_event(state, event))
    }

    pub fn is_initialized(&self) -> bool {
        self.equipment.is_some()
    }

    /// The live equipment, or why there is none
    pub fn equipment(&self) -> Result<&SpanEquipment, SpanEquipmentError> {
        if self.removed {
            return Err(SpanEquipmentError::Removed(self.id));
        }
        self.equipment
            .as_ref()
            .ok_or(SpanEquipmentError::NotPlaced(self.id))
    }
}

/// Apply event to state (pure function)
///
/// # Invariants
/// - Same event + same state = same result
/// - Never fails (events are facts that happened)
pub fn apply_event(mut state: SpanEquipmentState, event: &SpanEquipmentEvent) -> SpanEquipmentState {
    use SpanEquipmentEvent::*;

    if let PlacedInRouteNetwork(e) = event {
        state.equipment = Some(e.equipment.clone());
        return state;
    }

    if let Removed(_) = event {
        state.removed = true;
        return state;
    }

    let Some(equipment) = state.equipment.as_mut() else {
        return state;
    };

    match event {
        AffixedToParent(e) => equipment.utility_network_hops.push(e.hop.clone()),

        DetachedFromParent(e) => equipment.utility_network_hops.retain(|h| *h != e.hop),

        AffixedToContainer(e) => equipment.node_container_affixes.push(e.affix),

        DetachedFromContainer(e) => equipment
            .node_container_affixes
            .retain(|a| a.node_container_id != e.node_container_id),

        SpanSegmentsConnectedToSimpleTerminals(e) => apply_connects(equipment, &e.connects),

        SpanSegmentsConnectedToTerminals(e) => apply_connects(equipment, &e.connects),

        SpanSegmentsDisconnectedFromTerminals(e) => {
            for disconnect in &e.disconnects {
                if let Some(segment) = equipment.span_segment_mut(disconnect.span_segment_id) {
                    if let Some(end) = segment.end_connected_to(disconnect.terminal_id) {
                        segment.set_terminal_id(end, None);
                    }
                }
            }
        }

        SpanSegmentsCut(e) => apply_cut(equipment, e),

        SpanSegmentsCutReverted(e) => apply_cut_reverted(equipment, e),

        Merged(e) => {
            equipment.node_of_interest_ids = e.node_of_interest_ids.clone();
            equipment.span_structures = e.span_structures.clone();
            equipment.node_container_affixes = e.node_container_affixes.clone();
        }

        Moved(e) => {
            equipment.node_of_interest_ids = e.node_of_interest_ids.clone();
            equipment.utility_network_hops = e.utility_network_hops.clone();
        }

        Shrunk(e) => apply_shrunk(equipment, e),

        StructuresAdded(e) => equipment
            .span_structures
            .extend(e.span_structures.iter().cloned()),

        StructureRemoved(e) => {
            if let Some(structure) = equipment.span_structures.get_mut(e.structure_index) {
                structure.deleted = true;
            }
        }

        SpecificationChanged(e) => {
            equipment.specification_id = e.specification_id;
            equipment.is_multi_level = e.is_multi_level;
            for (index, specification_id) in &e.structure_specification_ids {
                if let Some(structure) = equipment.span_structures.get_mut(*index) {
                    structure.specification_id = *specification_id;
                }
            }
            for index in &e.removed_structure_indices {
                if let Some(structure) = equipment.span_structures.get_mut(*index) {
                    structure.deleted = true;
                }
            }
            equipment
                .span_structures
                .extend(e.added_structures.iter().cloned());
        }

        NamingInfoChanged(e) => equipment.naming_info = e.naming_info.clone(),

        MarkingInfoChanged(e) => equipment.marking_info = e.marking_info.clone(),

        AddressInfoChanged(e) => equipment.address_info = e.address_info.clone(),

        ManufacturerChanged(e) => equipment.manufacturer_id = e.manufacturer_id,

        PlacedInRouteNetwork(_) | Removed(_) => {}
    }

    state
}

fn apply_connects(equipment: &mut SpanEquipment, connects: &[SpanSegmentToTerminalConnect]) {
    for connect in connects {
        if let Some(segment) = equipment.span_segment_mut(connect.span_segment_id) {
            segment.set_terminal_id(connect.direction.segment_end(), Some(connect.terminal_id));
        }
    }
}

fn apply_cut(equipment: &mut SpanEquipment, e: &SpanSegmentsCut) {
    let index = e.cut_node_of_interest_index;

    if e.node_of_interest_inserted {
        equipment
            .node_of_interest_ids
            .insert(index, e.cut_node_of_interest_id);
        shift_node_indices(equipment, |i| if i >= index { i + 1 } else { i });
    }

    for cut in &e.cuts {
        let Some(structure) = equipment.span_structures.get_mut(cut.structure_index) else {
            continue;
        };
        let Some(position) = structure
            .span_segments
            .iter()
            .position(|s| s.id == cut.old_span_segment_id)
        else {
            continue;
        };

        let old = structure.span_segments.remove(position);

        let mut first = old.clone();
        first.id = cut.new_span_segment_id_1;
        first.to_node_of_interest_index = index;
        first.to_terminal_id = None;

        let mut second = old;
        second.id = cut.new_span_segment_id_2;
        second.from_node_of_interest_index = index;
        second.from_terminal_id = None;

        structure.span_segments.insert(position, second);
        structure.span_segments.insert(position, first);
        renumber(structure);
    }
}

fn apply_cut_reverted(equipment: &mut SpanEquipment, e: &SpanSegmentsCutReverted) {
    for revert in &e.reverts {
        let Some(structure) = equipment.span_structures.get_mut(revert.structure_index) else {
            continue;
        };
        let Some(removed_position) = structure
            .span_segments
            .iter()
            .position(|s| s.id == revert.removed_span_segment_id)
        else {
            continue;
        };

        let removed = structure.span_segments.remove(removed_position);
        if let Some(kept) = structure
            .span_segments
            .iter_mut()
            .find(|s| s.id == revert.kept_span_segment_id)
        {
            kept.to_node_of_interest_index = removed.to_node_of_interest_index;
            kept.to_terminal_id = removed.to_terminal_id;
        }
        renumber(structure);
    }

    let Some(index) = equipment.node_of_interest_index(e.route_node_id) else {
        return;
    };

    let still_referenced = equipment.all_segments().any(|s| {
        s.from_node_of_interest_index == index || s.to_node_of_interest_index == index
    });

    if !still_referenced {
        equipment.node_of_interest_ids.remove(index);
        shift_node_indices(equipment, |i| if i > index { i - 1 } else { i });
    }
}

fn apply_shrunk(equipment: &mut SpanEquipment, e: &SpanEquipmentShrunk) {
    let from = e.from_node_of_interest_index;
    let to = e.to_node_of_interest_index;

    equipment.node_of_interest_ids = equipment.node_of_interest_ids[from..=to].to_vec();

    for structure in equipment.span_structures.iter_mut() {
        structure.span_segments.retain(|s| {
            s.from_node_of_interest_index >= from && s.to_node_of_interest_index <= to
        });
        for segment in structure.span_segments.iter_mut() {
            segment.from_node_of_interest_index -= from;
            segment.to_node_of_interest_index -= from;
        }
        renumber(structure);
    }

    equipment.utility_network_hops = e.utility_network_hops.clone();
    equipment.node_container_affixes = e.node_container_affixes.clone();
}

fn shift_node_indices(equipment: &mut SpanEquipment, shift: impl Fn(usize) -> usize) {
    for structure in equipment.span_structures.iter_mut() {
        for segment in structure.span_segments.iter_mut() {
            segment.from_node_of_interest_index = shift(segment.from_node_of_interest_index);
            segment.to_node_of_interest_index = shift(segment.to_node_of_interest_index);
        }
    }
}

/// Restore 1-based sequence numbers after segments were inserted or removed
pub(crate) fn renumber(structure: &mut SpanStructure) {
    for (i, segment) in structure.span_segments.iter_mut().enumerate() {
        segment.sequence_number = i + 1;
    }
}
