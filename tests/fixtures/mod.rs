// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-utility-network
//!
//! Builds a service over the in-memory event store, route network and
//! notifier, with a small specification catalogue already registered.
//!
//! Route network used by every scenario:
//!
//! ```text
//! A ─S1─ B ─S2─ C ─S3─ D ─S4─ E
//!         \         /
//!          S5─ F ─S6
//! ```
//!
//! Route element ids are fixed; correlation ids and timestamps are fixed
//! constants so events are reproducible apart from the ids the service
//! generates itself.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cim_utility_network::aggregate::TerminalEquipmentPlacement;
use cim_utility_network::domain::{
    NodeContainerSpecification, RackSpecification, SpanEquipment, SpanEquipmentSpecification,
    SpanStructureSpecification, SpanStructureTemplate, Specification, TerminalDirection,
    TerminalEquipmentSpecification, TerminalStructureSpecification, TerminalStructureTemplate,
    TerminalTemplate,
};
use cim_utility_network::events::RouteNetworkElementContainedEquipmentUpdated;
use cim_utility_network::service::InMemoryNotifier;
use cim_utility_network::{
    CommandContext, InMemoryEventStore, InMemoryRouteNetwork, RouteNetworkGateway,
    SpanEquipmentProperties, UserContext, UtilityGraph, UtilityNetworkService,
};

// Route network
pub const A: Uuid = Uuid::from_u128(0xA);
pub const B: Uuid = Uuid::from_u128(0xB);
pub const C: Uuid = Uuid::from_u128(0xC);
pub const D: Uuid = Uuid::from_u128(0xD);
pub const E: Uuid = Uuid::from_u128(0xE);
pub const F: Uuid = Uuid::from_u128(0xF);
pub const S1: Uuid = Uuid::from_u128(0x51);
pub const S2: Uuid = Uuid::from_u128(0x52);
pub const S3: Uuid = Uuid::from_u128(0x53);
pub const S4: Uuid = Uuid::from_u128(0x54);
pub const S5: Uuid = Uuid::from_u128(0x55);
pub const S6: Uuid = Uuid::from_u128(0x56);

// Span structure specifications
pub const OUTER_SPEC: Uuid = Uuid::from_u128(0x1000);
pub const RED_TUBE_SPEC: Uuid = Uuid::from_u128(0x1001);
pub const BLUE_TUBE_SPEC: Uuid = Uuid::from_u128(0x1002);
pub const FIBER_SPEC: Uuid = Uuid::from_u128(0x1003);

// Equipment specifications
pub const MULTI_CONDUIT_SPEC: Uuid = Uuid::from_u128(0x2000);
pub const SINGLE_CONDUIT_SPEC: Uuid = Uuid::from_u128(0x2001);
pub const CABLE_SPEC: Uuid = Uuid::from_u128(0x2002);
pub const CABINET_SPEC: Uuid = Uuid::from_u128(0x2100);
pub const RACK_SPEC: Uuid = Uuid::from_u128(0x2101);
pub const SPLICE_TRAY_SPEC: Uuid = Uuid::from_u128(0x2200);
pub const CLOSURE_SPEC: Uuid = Uuid::from_u128(0x2201);

pub const MANUFACTURER_ID: Uuid = Uuid::from_u128(0x3000);

pub const CORRELATION_ID_1: &str = "01934f4a-c001-7000-8000-00000000c001";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

/// Parse a fixed UUID from a constant string
pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    FIXED_TIMESTAMP.parse().expect("Invalid timestamp in test fixture")
}

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn ctx() -> CommandContext {
    CommandContext::new(
        parse_uuid(CORRELATION_ID_1),
        UserContext::new("fixture-user"),
        fixed_timestamp(),
    )
}

pub fn route_network() -> InMemoryRouteNetwork {
    InMemoryRouteNetwork::from_segments(&[
        (S1, A, B),
        (S2, B, C),
        (S3, C, D),
        (S4, D, E),
        (S5, B, F),
        (S6, F, C),
    ])
    .expect("Invalid route network fixture")
}

fn structure_spec(id: Uuid, name: &str, color: &str) -> Specification {
    Specification::SpanStructure(SpanStructureSpecification {
        id,
        category: "Conduit".to_string(),
        name: name.to_string(),
        color: color.to_string(),
        inner_diameter: None,
        outer_diameter: None,
    })
}

/// Outer conduit with a red and a blue inner tube
pub fn multi_conduit_spec() -> SpanEquipmentSpecification {
    SpanEquipmentSpecification {
        id: MULTI_CONDUIT_SPEC,
        category: "Conduit".to_string(),
        name: "Ø40 2x10".to_string(),
        is_cable: false,
        root_template: SpanStructureTemplate {
            span_structure_specification_id: OUTER_SPEC,
            level: 1,
            position: 1,
            child_templates: vec![
                SpanStructureTemplate::leaf(RED_TUBE_SPEC, 2, 1),
                SpanStructureTemplate::leaf(BLUE_TUBE_SPEC, 2, 2),
            ],
        },
        manufacturer_refs: vec![MANUFACTURER_ID],
    }
}

pub fn single_conduit_spec() -> SpanEquipmentSpecification {
    SpanEquipmentSpecification {
        id: SINGLE_CONDUIT_SPEC,
        category: "Conduit".to_string(),
        name: "Ø12".to_string(),
        is_cable: false,
        root_template: SpanStructureTemplate::leaf(RED_TUBE_SPEC, 1, 1),
        manufacturer_refs: vec![],
    }
}

/// Cable with a jacket and one fiber group
pub fn cable_spec() -> SpanEquipmentSpecification {
    SpanEquipmentSpecification {
        id: CABLE_SPEC,
        category: "FiberCable".to_string(),
        name: "12 fiber".to_string(),
        is_cable: true,
        root_template: SpanStructureTemplate {
            span_structure_specification_id: OUTER_SPEC,
            level: 1,
            position: 1,
            child_templates: vec![SpanStructureTemplate::leaf(FIBER_SPEC, 2, 1)],
        },
        manufacturer_refs: vec![],
    }
}

/// Catalogue in dependency order
pub fn specifications() -> Vec<Specification> {
    vec![
        structure_spec(OUTER_SPEC, "Outer", "Black"),
        structure_spec(RED_TUBE_SPEC, "Ø10 red", "Red"),
        structure_spec(BLUE_TUBE_SPEC, "Ø10 blue", "Blue"),
        structure_spec(FIBER_SPEC, "Fiber group", "Blue"),
        Specification::SpanEquipment(multi_conduit_spec()),
        Specification::SpanEquipment(single_conduit_spec()),
        Specification::SpanEquipment(cable_spec()),
        Specification::NodeContainer(NodeContainerSpecification {
            id: CABINET_SPEC,
            category: "Cabinet".to_string(),
            name: "Street cabinet".to_string(),
            manufacturer_refs: vec![MANUFACTURER_ID],
        }),
        Specification::Rack(RackSpecification {
            id: RACK_SPEC,
            name: "19\" rack".to_string(),
            short_name: "R".to_string(),
        }),
        Specification::TerminalStructure(TerminalStructureSpecification {
            id: SPLICE_TRAY_SPEC,
            category: "SpliceTray".to_string(),
            name: "4 splice tray".to_string(),
            terminal_templates: (1..=4)
                .map(|n| TerminalTemplate {
                    name: n.to_string(),
                    direction: TerminalDirection::Bi,
                })
                .collect(),
        }),
        Specification::TerminalEquipment(TerminalEquipmentSpecification {
            id: CLOSURE_SPEC,
            category: "SpliceClosure".to_string(),
            name: "Closure".to_string(),
            is_rack_equipment: false,
            height_in_rack_units: 0,
            structure_templates: vec![TerminalStructureTemplate {
                terminal_structure_specification_id: SPLICE_TRAY_SPEC,
                position: 1,
            }],
        }),
    ]
}

/// Service wired to in-memory collaborators
pub struct TestNetwork {
    pub service: UtilityNetworkService,
    pub store: Arc<InMemoryEventStore>,
    pub route_network: Arc<InMemoryRouteNetwork>,
    pub notifier: Arc<InMemoryNotifier>,
}

pub async fn test_network() -> TestNetwork {
    let store = Arc::new(InMemoryEventStore::new());
    let route_network = Arc::new(route_network());
    let notifier = Arc::new(InMemoryNotifier::new());

    let service = UtilityNetworkService::new(
        store.clone(),
        route_network.clone(),
        notifier.clone(),
        "UtilityNetworkTests",
    );

    for specification in specifications() {
        service
            .add_specification(&ctx(), specification)
            .await
            .expect("Failed to register specification fixture");
    }

    TestNetwork {
        service,
        store,
        route_network,
        notifier,
    }
}

impl TestNetwork {
    pub async fn graph(&self) -> Arc<UtilityGraph> {
        self.service.graph().await
    }

    pub async fn place(&self, span_equipment_id: Uuid, specification_id: Uuid, element_ids: &[Uuid]) {
        self.service
            .place_span_equipment_in_route_network(
                &ctx(),
                span_equipment_id,
                specification_id,
                element_ids,
                SpanEquipmentProperties::default(),
            )
            .await
            .expect("Failed to place span equipment fixture");
    }

    pub async fn place_conduit(&self, span_equipment_id: Uuid, element_ids: &[Uuid]) {
        self.place(span_equipment_id, MULTI_CONDUIT_SPEC, element_ids).await;
    }

    pub async fn place_cable(&self, span_equipment_id: Uuid, element_ids: &[Uuid]) {
        self.place(span_equipment_id, CABLE_SPEC, element_ids).await;
    }

    /// Projected span equipment
    pub async fn equipment(&self, span_equipment_id: Uuid) -> SpanEquipment {
        self.graph()
            .await
            .try_get_span_equipment(span_equipment_id)
            .cloned()
            .expect("Span equipment not projected")
    }

    /// Segment id of a structure at a sequence position (1-based)
    pub async fn segment(&self, span_equipment_id: Uuid, structure_index: usize, sequence_number: usize) -> Uuid {
        self.equipment(span_equipment_id).await.span_structures[structure_index].span_segments
            [sequence_number - 1]
            .id
    }

    /// Element ids of the walk registered for the equipment
    pub async fn registered_walk(&self, span_equipment_id: Uuid) -> Vec<Uuid> {
        let equipment = self.equipment(span_equipment_id).await;
        self.route_network
            .get_walk_of_interest(equipment.walk_of_interest_id)
            .await
            .expect("Walk of interest not registered")
            .element_ids()
            .to_vec()
    }

    /// Place a cabinet with one splice closure at a route node
    ///
    /// Returns the terminal ids of the closure.
    pub async fn place_closure(&self, node_container_id: Uuid, terminal_equipment_id: Uuid, route_node_id: Uuid) -> Vec<Uuid> {
        self.service
            .place_node_container_in_route_network(&ctx(), node_container_id, CABINET_SPEC, route_node_id, None, None)
            .await
            .expect("Failed to place node container fixture");
        self.service
            .place_terminal_equipment_in_node_container(
                &ctx(),
                terminal_equipment_id,
                CLOSURE_SPEC,
                node_container_id,
                TerminalEquipmentPlacement::Container,
                None,
            )
            .await
            .expect("Failed to place terminal equipment fixture");

        self.graph()
            .await
            .try_get_terminal_equipment(terminal_equipment_id)
            .expect("Terminal equipment not projected")
            .terminal_structures[0]
            .terminals
            .iter()
            .map(|t| t.id)
            .collect()
    }

    pub async fn last_notification(&self) -> RouteNetworkElementContainedEquipmentUpdated {
        self.notifier.last().await.expect("No notification published")
    }
}
