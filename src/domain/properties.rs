// Copyright (c) 2025 - Cowboy AI, Inc.
//! Descriptive properties shared by equipment types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name and free-text description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingInfo {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NamingInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }
}

/// Physical marking printed on or attached to the equipment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkingInfo {
    pub marking_color: Option<String>,
    pub marking_text: Option<String>,
}

/// Address the equipment serves
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub access_address_id: Option<Uuid>,
    pub unit_address_id: Option<Uuid>,
    pub remark: Option<String>,
}
