// Copyright (c) 2025 - Cowboy AI, Inc.
//! Equipment Specifications
//!
//! Specifications are the product catalogue: what structures a conduit or
//! cable type has, what terminals a splice tray carries, and so on. New
//! equipment is always generated from a specification template.
//!
//! [`SpecificationLookup`] is the read side of the catalogue. It is built
//! eagerly, one insert per specification event, and keeps name indices in
//! step so callers never need to scan.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::terminal_equipment::TerminalDirection;

/// A tube or fiber-group type (e.g. "Ø10 red")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanStructureSpecification {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub color: String,
    pub inner_diameter: Option<u32>,
    pub outer_diameter: Option<u32>,
}

/// Node of the structure tree a span equipment specification describes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanStructureTemplate {
    pub span_structure_specification_id: Uuid,
    pub level: u32,
    pub position: u32,
    pub child_templates: Vec<SpanStructureTemplate>,
}

impl SpanStructureTemplate {
    /// A template with no children
    pub fn leaf(span_structure_specification_id: Uuid, level: u32, position: u32) -> Self {
        Self {
            span_structure_specification_id,
            level,
            position,
            child_templates: Vec::new(),
        }
    }

    /// Depth-first list of all templates, parent position attached
    pub fn flatten(&self) -> Vec<(u32, &SpanStructureTemplate)> {
        let mut result = vec![(0, self)];
        let mut children: Vec<&SpanStructureTemplate> = self.child_templates.iter().collect();
        children.sort_by_key(|t| (t.level, t.position));
        for child in children {
            for (parent_position, template) in child.flatten() {
                let parent = if std::ptr::eq(template, child) {
                    self.position
                } else {
                    parent_position
                };
                result.push((parent, template));
            }
        }
        result
    }
}

/// A conduit or cable product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEquipmentSpecification {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub is_cable: bool,
    pub root_template: SpanStructureTemplate,
    pub manufacturer_refs: Vec<Uuid>,
}

impl SpanEquipmentSpecification {
    /// Multi-level conduits have inner tubes inside the outer jacket
    pub fn is_multi_level(&self) -> bool {
        !self.root_template.child_templates.is_empty()
    }
}

/// A manhole, cabinet or closure product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainerSpecification {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub manufacturer_refs: Vec<Uuid>,
}

/// A rack product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RackSpecification {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
}

/// Terminal generated for each new terminal structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalTemplate {
    pub name: String,
    pub direction: TerminalDirection,
}

/// A splice tray, patch panel row or similar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStructureSpecification {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub terminal_templates: Vec<TerminalTemplate>,
}

/// Terminal structure slot of a terminal equipment specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStructureTemplate {
    pub terminal_structure_specification_id: Uuid,
    pub position: u32,
}

/// A closure, ODF or splice enclosure product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipmentSpecification {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub is_rack_equipment: bool,
    pub height_in_rack_units: u32,
    pub structure_templates: Vec<TerminalStructureTemplate>,
}

/// Any specification, as carried by catalogue events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Specification {
    SpanStructure(SpanStructureSpecification),
    SpanEquipment(SpanEquipmentSpecification),
    NodeContainer(NodeContainerSpecification),
    Rack(RackSpecification),
    TerminalStructure(TerminalStructureSpecification),
    TerminalEquipment(TerminalEquipmentSpecification),
}

impl Specification {
    pub fn id(&self) -> Uuid {
        match self {
            Specification::SpanStructure(s) => s.id,
            Specification::SpanEquipment(s) => s.id,
            Specification::NodeContainer(s) => s.id,
            Specification::Rack(s) => s.id,
            Specification::TerminalStructure(s) => s.id,
            Specification::TerminalEquipment(s) => s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Specification::SpanStructure(s) => &s.name,
            Specification::SpanEquipment(s) => &s.name,
            Specification::NodeContainer(s) => &s.name,
            Specification::Rack(s) => &s.name,
            Specification::TerminalStructure(s) => &s.name,
            Specification::TerminalEquipment(s) => &s.name,
        }
    }
}

/// Eagerly maintained catalogue index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecificationLookup {
    span_structures: HashMap<Uuid, SpanStructureSpecification>,
    span_equipment: HashMap<Uuid, SpanEquipmentSpecification>,
    node_containers: HashMap<Uuid, NodeContainerSpecification>,
    racks: HashMap<Uuid, RackSpecification>,
    terminal_structures: HashMap<Uuid, TerminalStructureSpecification>,
    terminal_equipment: HashMap<Uuid, TerminalEquipmentSpecification>,
    span_equipment_by_name: HashMap<String, Uuid>,
    terminal_equipment_by_name: HashMap<String, Uuid>,
    node_container_by_name: HashMap<String, Uuid>,
}

impl SpecificationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any kind of specification already uses the id
    pub fn contains(&self, id: Uuid) -> bool {
        self.span_structures.contains_key(&id)
            || self.span_equipment.contains_key(&id)
            || self.node_containers.contains_key(&id)
            || self.racks.contains_key(&id)
            || self.terminal_structures.contains_key(&id)
            || self.terminal_equipment.contains_key(&id)
    }

    /// Add or replace a specification and refresh the name indices
    pub fn insert(&mut self, specification: Specification) {
        match specification {
            Specification::SpanStructure(s) => {
                self.span_structures.insert(s.id, s);
            }
            Specification::SpanEquipment(s) => {
                self.span_equipment_by_name.insert(s.name.clone(), s.id);
                self.span_equipment.insert(s.id, s);
            }
            Specification::NodeContainer(s) => {
                self.node_container_by_name.insert(s.name.clone(), s.id);
                self.node_containers.insert(s.id, s);
            }
            Specification::Rack(s) => {
                self.racks.insert(s.id, s);
            }
            Specification::TerminalStructure(s) => {
                self.terminal_structures.insert(s.id, s);
            }
            Specification::TerminalEquipment(s) => {
                self.terminal_equipment_by_name.insert(s.name.clone(), s.id);
                self.terminal_equipment.insert(s.id, s);
            }
        }
    }

    pub fn span_structure(&self, id: Uuid) -> Option<&SpanStructureSpecification> {
        self.span_structures.get(&id)
    }

    pub fn span_equipment(&self, id: Uuid) -> Option<&SpanEquipmentSpecification> {
        self.span_equipment.get(&id)
    }

    pub fn node_container(&self, id: Uuid) -> Option<&NodeContainerSpecification> {
        self.node_containers.get(&id)
    }

    pub fn rack(&self, id: Uuid) -> Option<&RackSpecification> {
        self.racks.get(&id)
    }

    pub fn terminal_structure(&self, id: Uuid) -> Option<&TerminalStructureSpecification> {
        self.terminal_structures.get(&id)
    }

    pub fn terminal_equipment(&self, id: Uuid) -> Option<&TerminalEquipmentSpecification> {
        self.terminal_equipment.get(&id)
    }

    pub fn span_equipment_id_by_name(&self, name: &str) -> Option<Uuid> {
        self.span_equipment_by_name.get(name).copied()
    }

    pub fn terminal_equipment_id_by_name(&self, name: &str) -> Option<Uuid> {
        self.terminal_equipment_by_name.get(name).copied()
    }

    pub fn node_container_id_by_name(&self, name: &str) -> Option<Uuid> {
        self.node_container_by_name.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn multi_conduit() -> SpanEquipmentSpecification {
        SpanEquipmentSpecification {
            id: id(1),
            category: "Conduit".to_string(),
            name: "Ø50 3x10".to_string(),
            is_cable: false,
            root_template: SpanStructureTemplate {
                span_structure_specification_id: id(10),
                level: 1,
                position: 1,
                child_templates: vec![
                    SpanStructureTemplate::leaf(id(12), 2, 2),
                    SpanStructureTemplate::leaf(id(11), 2, 1),
                ],
            },
            manufacturer_refs: vec![],
        }
    }

    #[test]
    fn test_flatten_orders_children_by_position() {
        let spec = multi_conduit();
        let flat = spec.root_template.flatten();
        let ids: Vec<Uuid> = flat.iter().map(|(_, t)| t.span_structure_specification_id).collect();
        assert_eq!(ids, vec![id(10), id(11), id(12)]);
        assert_eq!(flat[1].0, 1);
        assert!(spec.is_multi_level());
    }

    #[test]
    fn test_lookup_by_name_refreshes_on_insert() {
        let mut lookup = SpecificationLookup::new();
        lookup.insert(Specification::SpanEquipment(multi_conduit()));
        assert_eq!(lookup.span_equipment_id_by_name("Ø50 3x10"), Some(id(1)));
        assert!(lookup.contains(id(1)));
        assert!(!lookup.contains(id(2)));
    }
}
