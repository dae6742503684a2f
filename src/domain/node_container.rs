// Copyright (c) 2025 - Cowboy AI, Inc.
//! Node Container Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::properties::NamingInfo;

/// Terminal equipment mounted in a rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubrackMount {
    pub terminal_equipment_id: Uuid,
    pub position_in_rack: u32,
    pub height_in_units: u32,
}

impl SubrackMount {
    /// Whether the mount overlaps the unit range `[position, position + height)`
    pub fn overlaps(&self, position: u32, height: u32) -> bool {
        let end = self.position_in_rack + self.height_in_units;
        position < end && self.position_in_rack < position + height
    }
}

/// A rack standing inside a node container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    pub id: Uuid,
    pub name: String,
    pub specification_id: Uuid,
    pub position: u32,
    pub height_in_units: u32,
    pub sub_rack_mounts: Vec<SubrackMount>,
}

/// A manhole, cabinet or building closure placed at one route node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContainer {
    pub id: Uuid,
    pub specification_id: Uuid,
    pub route_node_id: Uuid,
    pub interest_id: Uuid,
    pub manufacturer_id: Option<Uuid>,
    pub naming_info: Option<NamingInfo>,
    pub racks: Vec<Rack>,
    pub terminal_equipment_ids: Vec<Uuid>,
}

impl NodeContainer {
    pub fn rack(&self, rack_id: Uuid) -> Option<&Rack> {
        self.racks.iter().find(|r| r.id == rack_id)
    }

    /// Whether the terminal equipment is placed in the container, in or outside a rack
    pub fn contains_terminal_equipment(&self, terminal_equipment_id: Uuid) -> bool {
        self.terminal_equipment_ids.contains(&terminal_equipment_id)
            || self.racks.iter().any(|r| {
                r.sub_rack_mounts
                    .iter()
                    .any(|m| m.terminal_equipment_id == terminal_equipment_id)
            })
    }

    pub fn next_rack_position(&self) -> u32 {
        self.racks.iter().map(|r| r.position).max().map_or(1, |p| p + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subrack_overlap() {
        let mount = SubrackMount {
            terminal_equipment_id: Uuid::from_u128(1),
            position_in_rack: 10,
            height_in_units: 2,
        };

        assert!(mount.overlaps(11, 1));
        assert!(mount.overlaps(9, 2));
        assert!(!mount.overlaps(12, 4));
        assert!(!mount.overlaps(8, 2));
    }
}
