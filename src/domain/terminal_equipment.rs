// Copyright (c) 2025 - Cowboy AI, Inc.
//! Terminal Equipment Value Objects
//!
//! Terminal equipment is the splice/patch side of the network: closures,
//! splice trays, ODF panels. Each terminal is a junction point span
//! segments can be connected to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::properties::NamingInfo;

/// Signal direction a terminal is designed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalDirection {
    In,
    Out,
    Bi,
}

/// A single splice or patch point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Terminal {
    pub id: Uuid,
    pub name: String,
    pub direction: TerminalDirection,
}

/// A tray or row of terminals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalStructure {
    pub id: Uuid,
    pub specification_id: Uuid,
    pub position: u32,
    pub terminals: Vec<Terminal>,
    pub deleted: bool,
}

/// Position of a terminal inside its equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalLocation {
    pub structure_index: usize,
    pub terminal_index: usize,
}

/// A closure, splice enclosure or patch panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEquipment {
    pub id: Uuid,
    pub specification_id: Uuid,
    pub node_container_id: Uuid,
    pub naming_info: Option<NamingInfo>,
    pub terminal_structures: Vec<TerminalStructure>,
}

impl TerminalEquipment {
    pub fn locate_terminal(&self, terminal_id: Uuid) -> Option<TerminalLocation> {
        self.terminal_structures
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.deleted)
            .find_map(|(structure_index, structure)| {
                structure
                    .terminals
                    .iter()
                    .position(|t| t.id == terminal_id)
                    .map(|terminal_index| TerminalLocation {
                        structure_index,
                        terminal_index,
                    })
            })
    }

    pub fn terminal(&self, terminal_id: Uuid) -> Option<&Terminal> {
        self.locate_terminal(terminal_id).map(|loc| {
            &self.terminal_structures[loc.structure_index].terminals[loc.terminal_index]
        })
    }

    /// Live terminals with their location
    pub fn terminals(&self) -> impl Iterator<Item = (TerminalLocation, &Terminal)> {
        self.terminal_structures
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.deleted)
            .flat_map(|(structure_index, s)| {
                s.terminals.iter().enumerate().map(move |(terminal_index, t)| {
                    (
                        TerminalLocation {
                            structure_index,
                            terminal_index,
                        },
                        t,
                    )
                })
            })
    }

    /// Next free structure position
    pub fn next_structure_position(&self) -> u32 {
        self.terminal_structures
            .iter()
            .filter(|s| !s.deleted)
            .map(|s| s.position)
            .max()
            .map_or(1, |p| p + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tray(id: u128, position: u32, deleted: bool) -> TerminalStructure {
        TerminalStructure {
            id: Uuid::from_u128(id),
            specification_id: Uuid::from_u128(900),
            position,
            terminals: vec![Terminal {
                id: Uuid::from_u128(id * 10),
                name: "1".to_string(),
                direction: TerminalDirection::Bi,
            }],
            deleted,
        }
    }

    #[test]
    fn test_deleted_structures_are_invisible() {
        let equipment = TerminalEquipment {
            id: Uuid::from_u128(1),
            specification_id: Uuid::from_u128(2),
            node_container_id: Uuid::from_u128(3),
            naming_info: None,
            terminal_structures: vec![tray(10, 1, false), tray(11, 2, true)],
        };

        assert!(equipment.terminal(Uuid::from_u128(100)).is_some());
        assert!(equipment.terminal(Uuid::from_u128(110)).is_none());
        assert_eq!(equipment.terminals().count(), 1);
        assert_eq!(equipment.next_structure_position(), 2);
    }
}
