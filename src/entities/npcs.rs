//! Service NPCs
//!
//! NPCs are non-hostile entities that run the town's buildings. The
//! generators only decide who stands where; dialogue and shops live in the
//! game state.

use serde::{Deserialize, Serialize};

use crate::world::generation::town::BuildingCategory;
use crate::world::Position;

/// Types of NPCs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcRole {
    /// Sells consumables and curios
    Shopkeeper,
    /// Repairs and upgrades equipment
    Blacksmith,
    /// Rents beds and rumours
    Innkeeper,
}

impl NpcRole {
    /// The NPC who works in a building, if the building has one
    pub fn for_category(category: BuildingCategory) -> Option<NpcRole> {
        match category {
            BuildingCategory::Shop => Some(NpcRole::Shopkeeper),
            BuildingCategory::Blacksmith => Some(NpcRole::Blacksmith),
            BuildingCategory::Inn => Some(NpcRole::Innkeeper),
            BuildingCategory::Home | BuildingCategory::Crypt => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NpcRole::Shopkeeper => "Shopkeeper",
            NpcRole::Blacksmith => "Blacksmith",
            NpcRole::Innkeeper => "Innkeeper",
        }
    }

    /// Map glyph, never the player's '@'
    pub fn glyph(&self) -> char {
        match self {
            NpcRole::Shopkeeper => '$',
            NpcRole::Blacksmith => '&',
            NpcRole::Innkeeper => 'I',
        }
    }

    pub fn greeting(&self) -> &'static str {
        match self {
            NpcRole::Shopkeeper => "Coin first, questions after.",
            NpcRole::Blacksmith => "I can mend your gear, for a price.",
            NpcRole::Innkeeper => "A bed and a bowl. The crypt can wait till morning.",
        }
    }
}

/// Where a generator placed an NPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub role: NpcRole,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_by_category() {
        assert_eq!(NpcRole::for_category(BuildingCategory::Shop), Some(NpcRole::Shopkeeper));
        assert_eq!(NpcRole::for_category(BuildingCategory::Blacksmith), Some(NpcRole::Blacksmith));
        assert_eq!(NpcRole::for_category(BuildingCategory::Inn), Some(NpcRole::Innkeeper));
        assert_eq!(NpcRole::for_category(BuildingCategory::Home), None);
        assert_eq!(NpcRole::for_category(BuildingCategory::Crypt), None);
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let roles = [NpcRole::Shopkeeper, NpcRole::Blacksmith, NpcRole::Innkeeper];
        let glyphs = roles.map(|r| r.glyph());
        assert!(!glyphs.contains(&'@'));
        assert_ne!(glyphs[0], glyphs[1]);
        assert_ne!(glyphs[1], glyphs[2]);
        assert_ne!(glyphs[0], glyphs[2]);
    }
}
