// Copyright (c) 2025 - Cowboy AI, Inc.
//! Utility Graph Index
//!
//! Flat tables folded from the event log. Segments, terminals and equipment
//! reference each other by id only; every "pointer" is a table lookup.
//!
//! ```text
//! span_equipment     id → SpanEquipment
//! terminal_equipment id → TerminalEquipment
//! node_containers    id → NodeContainer
//! graph_elements     segment/terminal id → SpanSegmentRef | TerminalRef
//! terminal_connections  terminal id → segment ends pointing at it
//! cables_by_conduit_segment  conduit segment id → cable ids riding through
//! ```
//!
//! Updates reuse the aggregates' own `apply_event` folds, so the index can
//! never disagree with the write side about what an event means.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::aggregate::{node_container, span_equipment, specification, terminal_equipment};
use crate::aggregate::{NodeContainerState, SpanEquipmentState, SpecificationsState, TerminalEquipmentState};
use crate::domain::{
    NodeContainer, SpanEquipment, SpanSegment, SpanSegmentEnd, SpecificationLookup, Terminal,
    TerminalEquipment,
};
use crate::events::{
    NodeContainerEvent, SpanEquipmentEvent, SpecificationEvent, TerminalEquipmentEvent,
    UtilityNetworkEvent,
};

/// Reference from a span segment id back to its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpanSegmentRef {
    pub span_equipment_id: Uuid,
    pub span_segment_id: Uuid,
    pub structure_index: usize,
    pub segment_index: usize,
}

impl SpanSegmentRef {
    pub fn span_equipment<'g>(&self, graph: &'g UtilityGraph) -> Option<&'g SpanEquipment> {
        graph.span_equipment.get(&self.span_equipment_id)
    }

    pub fn span_segment<'g>(&self, graph: &'g UtilityGraph) -> Option<&'g SpanSegment> {
        self.span_equipment(graph)?
            .span_structures
            .get(self.structure_index)?
            .span_segments
            .get(self.segment_index)
    }
}

/// Reference from a terminal id back to its owner
///
/// Junctions between conduit segments have no terminal equipment: they exist
/// only as the id both segment ends point at and are reported as dummy ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalRef {
    pub terminal_id: Uuid,
    pub terminal_equipment_id: Option<Uuid>,
    pub structure_index: usize,
    pub terminal_index: usize,
}

impl TerminalRef {
    fn junction(terminal_id: Uuid) -> Self {
        Self {
            terminal_id,
            terminal_equipment_id: None,
            structure_index: 0,
            terminal_index: 0,
        }
    }

    pub fn is_dummy_end(&self) -> bool {
        self.terminal_equipment_id.is_none()
    }

    pub fn terminal_equipment<'g>(&self, graph: &'g UtilityGraph) -> Option<&'g TerminalEquipment> {
        graph.terminal_equipment.get(&self.terminal_equipment_id?)
    }

    pub fn terminal<'g>(&self, graph: &'g UtilityGraph) -> Option<&'g Terminal> {
        self.terminal_equipment(graph)?
            .terminal_structures
            .get(self.structure_index)?
            .terminals
            .get(self.terminal_index)
    }
}

/// Anything addressable in the utility graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphElement {
    SpanSegment(SpanSegmentRef),
    Terminal(TerminalRef),
}

impl GraphElement {
    pub fn as_span_segment(&self) -> Option<&SpanSegmentRef> {
        match self {
            GraphElement::SpanSegment(r) => Some(r),
            GraphElement::Terminal(_) => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalRef> {
        match self {
            GraphElement::Terminal(r) => Some(r),
            GraphElement::SpanSegment(_) => None,
        }
    }
}

/// A segment end pointing at a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalConnection {
    pub span_equipment_id: Uuid,
    pub span_segment_id: Uuid,
    pub end: SpanSegmentEnd,
}

/// Equipment kinds that can be looked up by id
pub trait ProjectedEquipment: Sized {
    fn table(graph: &UtilityGraph) -> &HashMap<Uuid, Self>;
}

impl ProjectedEquipment for SpanEquipment {
    fn table(graph: &UtilityGraph) -> &HashMap<Uuid, Self> {
        &graph.span_equipment
    }
}

impl ProjectedEquipment for TerminalEquipment {
    fn table(graph: &UtilityGraph) -> &HashMap<Uuid, Self> {
        &graph.terminal_equipment
    }
}

impl ProjectedEquipment for NodeContainer {
    fn table(graph: &UtilityGraph) -> &HashMap<Uuid, Self> {
        &graph.node_containers
    }
}

/// Read-optimized utility network index at one commit version
#[derive(Debug, Clone, Default)]
pub struct UtilityGraph {
    span_equipment: HashMap<Uuid, SpanEquipment>,
    terminal_equipment: HashMap<Uuid, TerminalEquipment>,
    node_containers: HashMap<Uuid, NodeContainer>,
    graph_elements: HashMap<Uuid, GraphElement>,
    terminal_connections: HashMap<Uuid, Vec<TerminalConnection>>,
    cables_by_conduit_segment: HashMap<Uuid, Vec<Uuid>>,
    specifications: SpecificationLookup,
    applied_event_ids: HashSet<Uuid>,
    version: u64,
}

impl UtilityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events folded into this graph
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn specifications(&self) -> &SpecificationLookup {
        &self.specifications
    }

    /// Fold one event; an event already applied is skipped
    ///
    /// Returns whether the event changed the graph.
    pub fn apply(&mut self, event: &UtilityNetworkEvent) -> bool {
        if !self.applied_event_ids.insert(event.event_id()) {
            return false;
        }

        match event {
            UtilityNetworkEvent::SpanEquipment(e) => self.apply_span_equipment_event(e),
            UtilityNetworkEvent::NodeContainer(e) => self.apply_node_container_event(e),
            UtilityNetworkEvent::TerminalEquipment(e) => self.apply_terminal_equipment_event(e),
            UtilityNetworkEvent::Specification(e) => self.apply_specification_event(e),
        }

        self.version += 1;
        true
    }

    // Queries

    pub fn try_get_equipment<T: ProjectedEquipment>(&self, id: Uuid) -> Option<&T> {
        T::table(self).get(&id)
    }

    pub fn try_get_span_equipment(&self, id: Uuid) -> Option<&SpanEquipment> {
        self.try_get_equipment(id)
    }

    pub fn try_get_terminal_equipment(&self, id: Uuid) -> Option<&TerminalEquipment> {
        self.try_get_equipment(id)
    }

    pub fn try_get_node_container(&self, id: Uuid) -> Option<&NodeContainer> {
        self.try_get_equipment(id)
    }

    pub fn try_get_graph_element(&self, id: Uuid) -> Option<&GraphElement> {
        self.graph_elements.get(&id)
    }

    pub fn try_get_span_segment_ref(&self, span_segment_id: Uuid) -> Option<&SpanSegmentRef> {
        self.try_get_graph_element(span_segment_id)?.as_span_segment()
    }

    pub fn try_get_terminal_ref(&self, terminal_id: Uuid) -> Option<&TerminalRef> {
        self.try_get_graph_element(terminal_id)?.as_terminal()
    }

    pub fn check_if_conduit_segment_contains_cables(&self, span_segment_id: Uuid) -> bool {
        self.cables_by_conduit_segment
            .get(&span_segment_id)
            .is_some_and(|cables| !cables.is_empty())
    }

    pub fn related_cables_by_conduit_segment_id(&self, span_segment_id: Uuid) -> &[Uuid] {
        self.cables_by_conduit_segment
            .get(&span_segment_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Segment ends pointing at a terminal
    pub fn terminal_connections(&self, terminal_id: Uuid) -> &[TerminalConnection] {
        self.terminal_connections
            .get(&terminal_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_terminal_connected(&self, terminal_id: Uuid) -> bool {
        !self.terminal_connections(terminal_id).is_empty()
    }

    /// Segments of the equipment that currently carry at least one cable
    pub fn cable_carrying_segment_ids(&self, equipment: &SpanEquipment) -> HashSet<Uuid> {
        equipment
            .all_segments()
            .map(|s| s.id)
            .filter(|id| self.check_if_conduit_segment_contains_cables(*id))
            .collect()
    }

    /// Whether a conduit segment takes only a single cable
    ///
    /// The outer segment of a multi-level conduit takes any number of cables.
    pub fn is_single_cable_segment(&self, segment: &SpanSegmentRef) -> bool {
        match segment.span_equipment(self) {
            Some(equipment) => !(equipment.is_multi_level && segment.structure_index == 0),
            None => true,
        }
    }

    /// The given parent segments that cannot take another cable
    pub fn occupied_parent_segment_ids(&self, span_segment_ids: impl IntoIterator<Item = Uuid>) -> HashSet<Uuid> {
        span_segment_ids
            .into_iter()
            .filter(|id| {
                self.check_if_conduit_segment_contains_cables(*id)
                    && self
                        .try_get_span_segment_ref(*id)
                        .is_some_and(|r| self.is_single_cable_segment(r))
            })
            .collect()
    }

    /// Terminal ids of the equipment that have a span segment connected
    pub fn connected_terminal_ids(&self, equipment: &TerminalEquipment) -> HashSet<Uuid> {
        equipment
            .terminals()
            .map(|(_, t)| t.id)
            .filter(|id| self.is_terminal_connected(*id))
            .collect()
    }

    /// Cables riding through any segment of the equipment
    pub fn child_cable_ids(&self, equipment: &SpanEquipment) -> Vec<Uuid> {
        let mut cables: Vec<Uuid> = Vec::new();
        for segment in equipment.all_segments() {
            for cable in self.related_cables_by_conduit_segment_id(segment.id) {
                if !cables.contains(cable) {
                    cables.push(*cable);
                }
            }
        }
        cables
    }

    pub fn has_span_equipment_affixed_to(&self, node_container_id: Uuid) -> bool {
        self.span_equipment.values().any(|e| {
            e.node_container_affixes
                .iter()
                .any(|a| a.node_container_id == node_container_id)
        })
    }

    /// Node container placed at a route node, if any
    pub fn node_container_at(&self, route_node_id: Uuid) -> Option<&NodeContainer> {
        self.node_containers
            .values()
            .find(|c| c.route_node_id == route_node_id)
    }

    pub fn span_equipment_count(&self) -> usize {
        self.span_equipment.len()
    }

    // Updates

    fn apply_span_equipment_event(&mut self, event: &SpanEquipmentEvent) {
        let id = event.header().aggregate_id;
        let previous = self.span_equipment.remove(&id);
        if let Some(previous) = &previous {
            self.unindex_span_equipment(previous);
        }

        let state = SpanEquipmentState {
            id,
            equipment: previous,
            removed: false,
        };
        let state = span_equipment::apply_event(state, event);

        if state.removed {
            return;
        }
        if let Some(equipment) = state.equipment {
            self.index_span_equipment(&equipment);
            self.span_equipment.insert(id, equipment);
        }
    }

    fn index_span_equipment(&mut self, equipment: &SpanEquipment) {
        for (structure_index, structure) in equipment.active_structures() {
            for (segment_index, segment) in structure.span_segments.iter().enumerate() {
                self.graph_elements.insert(
                    segment.id,
                    GraphElement::SpanSegment(SpanSegmentRef {
                        span_equipment_id: equipment.id,
                        span_segment_id: segment.id,
                        structure_index,
                        segment_index,
                    }),
                );

                for end in [SpanSegmentEnd::From, SpanSegmentEnd::To] {
                    if let Some(terminal_id) = segment.terminal_id(end) {
                        self.graph_elements
                            .entry(terminal_id)
                            .or_insert_with(|| GraphElement::Terminal(TerminalRef::junction(terminal_id)));
                        self.terminal_connections
                            .entry(terminal_id)
                            .or_default()
                            .push(TerminalConnection {
                                span_equipment_id: equipment.id,
                                span_segment_id: segment.id,
                                end,
                            });
                    }
                }
            }
        }

        if equipment.is_cable {
            for hop in &equipment.utility_network_hops {
                for affix in &hop.parent_affixes {
                    let cables = self
                        .cables_by_conduit_segment
                        .entry(affix.span_segment_id)
                        .or_default();
                    if !cables.contains(&equipment.id) {
                        cables.push(equipment.id);
                    }
                }
            }
        }
    }

    /// Drop the index entries owned by `equipment`
    ///
    /// A merge hands segment ids of the absorbed equipment to the survivor,
    /// so only entries still pointing at `equipment` are removed.
    fn unindex_span_equipment(&mut self, equipment: &SpanEquipment) {
        for structure in &equipment.span_structures {
            for segment in &structure.span_segments {
                let owned = matches!(
                    self.graph_elements.get(&segment.id),
                    Some(GraphElement::SpanSegment(r)) if r.span_equipment_id == equipment.id
                );
                if owned {
                    self.graph_elements.remove(&segment.id);
                }

                for end in [SpanSegmentEnd::From, SpanSegmentEnd::To] {
                    if let Some(terminal_id) = segment.terminal_id(end) {
                        self.remove_connection(terminal_id, equipment.id, segment.id);
                    }
                }
            }
        }

        for hop in &equipment.utility_network_hops {
            for affix in &hop.parent_affixes {
                if let Some(cables) = self.cables_by_conduit_segment.get_mut(&affix.span_segment_id) {
                    cables.retain(|c| *c != equipment.id);
                    if cables.is_empty() {
                        self.cables_by_conduit_segment.remove(&affix.span_segment_id);
                    }
                }
            }
        }
    }

    fn remove_connection(&mut self, terminal_id: Uuid, span_equipment_id: Uuid, span_segment_id: Uuid) {
        let Some(connections) = self.terminal_connections.get_mut(&terminal_id) else {
            return;
        };
        connections.retain(|c| c.span_equipment_id != span_equipment_id || c.span_segment_id != span_segment_id);
        if !connections.is_empty() {
            return;
        }

        self.terminal_connections.remove(&terminal_id);
        if let Some(GraphElement::Terminal(r)) = self.graph_elements.get(&terminal_id) {
            if r.is_dummy_end() {
                self.graph_elements.remove(&terminal_id);
            }
        }
    }

    fn apply_terminal_equipment_event(&mut self, event: &TerminalEquipmentEvent) {
        let id = event.header().aggregate_id;
        let previous = self.terminal_equipment.remove(&id);
        if let Some(previous) = &previous {
            for structure in &previous.terminal_structures {
                for terminal in &structure.terminals {
                    self.graph_elements.remove(&terminal.id);
                }
            }
        }

        let state = TerminalEquipmentState {
            id,
            equipment: previous,
        };
        let state = terminal_equipment::apply_event(state, event);

        if let Some(equipment) = state.equipment {
            for (location, terminal) in equipment.terminals() {
                self.graph_elements.insert(
                    terminal.id,
                    GraphElement::Terminal(TerminalRef {
                        terminal_id: terminal.id,
                        terminal_equipment_id: Some(id),
                        structure_index: location.structure_index,
                        terminal_index: location.terminal_index,
                    }),
                );
            }
            self.terminal_equipment.insert(id, equipment);
        }
    }

    fn apply_node_container_event(&mut self, event: &NodeContainerEvent) {
        let id = event.header().aggregate_id;
        let state = NodeContainerState {
            id,
            container: self.node_containers.remove(&id),
            removed: false,
        };
        let state = node_container::apply_event(state, event);

        if state.removed {
            return;
        }
        if let Some(container) = state.container {
            self.node_containers.insert(id, container);
        }
    }

    fn apply_specification_event(&mut self, event: &SpecificationEvent) {
        let state = SpecificationsState {
            lookup: std::mem::take(&mut self.specifications),
        };
        self.specifications = specification::apply_event(state, event).lookup;
    }
}
