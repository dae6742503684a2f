// Copyright (c) 2025 - Cowboy AI, Inc.
//! Terminal Equipment Domain Events

use serde::{Deserialize, Serialize};

use super::EventHeader;
use crate::domain::{NamingInfo, TerminalEquipment, TerminalStructure};

/// Terminal Equipment Domain Events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TerminalEquipmentEvent {
    /// Equipment was created inside a node container
    Placed(TerminalEquipmentPlaced),

    /// Terminal structures were added
    StructuresAdded(AdditionalTerminalStructuresAdded),

    /// Terminal structure was removed
    StructureRemoved(TerminalStructureRemoved),

    NamingInfoChanged(TerminalEquipmentNamingInfoChanged),
}

impl TerminalEquipmentEvent {
    pub fn header(&self) -> &EventHeader {
        use TerminalEquipmentEvent::*;

        match self {
            Placed(e) => &e.header,
            StructuresAdded(e) => &e.header,
            StructureRemoved(e) => &e.header,
            NamingInfoChanged(e) => &e.header,
        }
    }

    pub fn event_type_name(&self) -> &'static str {
        use TerminalEquipmentEvent::*;

        match self {
            Placed(_) => "TerminalEquipmentPlaced",
            StructuresAdded(_) => "AdditionalTerminalStructuresAdded",
            StructureRemoved(_) => "TerminalStructureRemoved",
            NamingInfoChanged(_) => "TerminalEquipmentNamingInfoChanged",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipmentPlaced {
    #[serde(flatten)]
    pub header: EventHeader,
    pub equipment: TerminalEquipment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalTerminalStructuresAdded {
    #[serde(flatten)]
    pub header: EventHeader,
    pub terminal_structures: Vec<TerminalStructure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStructureRemoved {
    #[serde(flatten)]
    pub header: EventHeader,
    pub structure_index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipmentNamingInfoChanged {
    #[serde(flatten)]
    pub header: EventHeader,
    pub naming_info: Option<NamingInfo>,
}
