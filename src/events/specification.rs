// Copyright (c) 2025 - Cowboy AI, Inc.
//! Specification Catalogue Events

use serde::{Deserialize, Serialize};

use super::EventHeader;
use crate::domain::Specification;

/// Specification Catalogue Events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecificationEvent {
    /// A specification of any kind entered the catalogue
    SpecificationAdded(SpecificationAdded),
}

impl SpecificationEvent {
    pub fn header(&self) -> &EventHeader {
        match self {
            SpecificationEvent::SpecificationAdded(e) => &e.header,
        }
    }

    pub fn event_type_name(&self) -> &'static str {
        match self {
            SpecificationEvent::SpecificationAdded(_) => "SpecificationAdded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificationAdded {
    #[serde(flatten)]
    pub header: EventHeader,
    pub specification: Specification,
}
