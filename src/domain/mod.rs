// Copyright (c) 2025 - Cowboy AI, Inc.
//! Utility Network Domain Models
//!
//! Value objects for the equipment that lives on top of the route network.
//!
//! # Route Network
//!
//! - [`RouteNetworkWalk`] / [`ValidatedRouteNetworkWalk`] - node/segment id sequences
//! - [`RouteNetworkInterest`] - walk or node registered against the route network
//!
//! # Equipment
//!
//! - [`SpanEquipment`] - conduits and cables, a tree of structures and segments
//! - [`NodeContainer`] - manholes, cabinets, closures at a route node
//! - [`TerminalEquipment`] - splice and patch equipment with terminals
//!
//! # Catalogue
//!
//! - [`SpecificationLookup`] - eagerly indexed product specifications

pub mod invariants;
pub mod node_container;
pub mod properties;
pub mod route_network;
pub mod span_equipment;
pub mod specification;
pub mod terminal_equipment;

pub use invariants::{validate_span_equipment, ValidationError, ValidationResult};
pub use node_container::{NodeContainer, Rack, SubrackMount};
pub use properties::{AddressInfo, MarkingInfo, NamingInfo};
pub use route_network::{
    RouteNetworkElementKind, RouteNetworkInterest, RouteNetworkInterestKind, RouteNetworkWalk,
    RouteNetworkWalkError, ValidatedRouteNetworkWalk,
};
pub use span_equipment::{
    NodeContainerAffix, NodeContainerSide, SpanEquipment, SpanEquipmentAffixDirection,
    SpanSegment, SpanSegmentEnd, SpanSegmentLocation, SpanSegmentToTerminalConnectionDirection,
    SpanStructure, UtilityNetworkHop, UtilityNetworkHopParentAffix,
};
pub use specification::{
    NodeContainerSpecification, RackSpecification, SpanEquipmentSpecification,
    SpanStructureSpecification, SpanStructureTemplate, Specification, SpecificationLookup,
    TerminalEquipmentSpecification, TerminalStructureSpecification, TerminalStructureTemplate,
    TerminalTemplate,
};
pub use terminal_equipment::{
    Terminal, TerminalDirection, TerminalEquipment, TerminalLocation, TerminalStructure,
};
