// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Aggregates
//!
//! This module provides the functional aggregate pattern for event sourcing:
//! - Aggregates are pure functions: State → Command → Result<Event, Error>
//! - State reconstruction via event folding: [Event] → State
//! - No I/O, no clock, no logging
//! - All state changes represented as events
//!
//! # Event Sourcing Pattern
//!
//! ```text
//! Command → Aggregate → Events → Event Store
//!    ↓          ↓          ↓
//! Intent   Validation  Facts
//! ```
//!
//! # Aggregates
//!
//! | Aggregate | Stream |
//! |---|---|
//! | [`span_equipment`] | one per conduit or cable |
//! | [`node_container`] | one per container |
//! | [`terminal_equipment`] | one per terminal equipment |
//! | [`specification`] | one catalogue stream |
//!
//! Facts owned by another aggregate (cables riding a conduit segment,
//! terminals in use, walks validated by the route network) are read from
//! the projection by the service and passed into the handlers.
//!
//! # Fold Pattern
//!
//! ```rust,ignore
//! let state = SpanEquipmentState::from_events(id, &events);
//! let event = handle_change_naming_info(&state, &ctx, Some(naming))?;
//! let state = span_equipment::apply_event(state, &event);
//! ```
//!
//! # Time as Parameter
//!
//! The timestamp travels in the [`CommandContext`]. Never call `Utc::now()`
//! in domain logic.

pub mod commands;
pub mod error_code;
pub mod node_container;
pub mod span_equipment;
pub mod specification;
pub mod terminal_equipment;

pub use commands::{CommandContext, SpanEquipmentProperties, UserContext};
pub use error_code::ErrorCode;
pub use node_container::{NodeContainerError, NodeContainerState, TerminalEquipmentPlacement};
pub use span_equipment::{SpanEquipmentError, SpanEquipmentState};
pub use specification::{SpecificationError, SpecificationsState, SPECIFICATIONS_AGGREGATE_ID};
pub use terminal_equipment::{TerminalEquipmentError, TerminalEquipmentState};
