//! # Item Model
//!
//! Typed inventory entries owned by a character.
//!
//! Each item kind carries only the attributes its weighing rule reads.
//! Missing attributes were defaulted to zero when the item was built
//! from its record (see [`crate::record`]), so nothing here is optional.

use crate::{ActiveState, ItemId, Weight};
use serde::{Deserialize, Serialize};

// =============================================================================
// KIND-SPECIFIC ATTRIBUTES
// =============================================================================

/// Attributes of a weapon.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeaponStats {
    /// Weight of the weapon itself.
    pub weight: Weight,
    /// Number of identical weapons in the stack.
    pub quantity: u32,
    /// Rounds of ammunition carried with each weapon.
    pub rounds: u32,
    /// Weapon class (`"Pistol"`, `"RPG"`, ...).
    pub class: String,
}

/// Attributes of a piece of armor.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArmorStats {
    pub weight: Weight,
}

/// Attributes of generic gear.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GearStats {
    /// The record type tag: `"item"`, or an unrecognized tag kept verbatim.
    pub tag: String,
    pub weight: Weight,
    pub quantity: u32,
}

// =============================================================================
// ITEM KIND
// =============================================================================

/// The closed set of item kinds the rules distinguish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Weapon(WeaponStats),
    Armor(ArmorStats),
    /// `item` and every unrecognized type.
    Gear(GearStats),
    Talent,
    Agenda,
    Specialty,
    CriticalInjury,
}

impl ItemKind {
    /// The record type tag of this kind.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Weapon(_) => "weapon",
            Self::Armor(_) => "armor",
            Self::Gear(gear) => &gear.tag,
            Self::Talent => "talent",
            Self::Agenda => "agenda",
            Self::Specialty => "specialty",
            Self::CriticalInjury => "critical-injury",
        }
    }

    /// Stack size of physical items; `None` for weightless kinds.
    #[must_use]
    pub const fn quantity(&self) -> Option<u32> {
        match self {
            Self::Weapon(w) => Some(w.quantity),
            Self::Gear(g) => Some(g.quantity),
            Self::Armor(_) => Some(1),
            _ => None,
        }
    }
}

// =============================================================================
// ITEM
// =============================================================================

/// An inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Display sort key; lower sorts first.
    pub sort: i64,
    /// `header.active` state.
    pub active: ActiveState,
    pub kind: ItemKind,
}

impl Item {
    /// Create an inactive item with sort key 0.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(id),
            name: name.into(),
            sort: 0,
            active: ActiveState::Inactive,
            kind,
        }
    }

    /// Set the `header.active` state.
    #[must_use]
    pub fn with_active(mut self, active: ActiveState) -> Self {
        self.active = active;
        self
    }

    /// Set the display sort key.
    #[must_use]
    pub fn with_sort(mut self, sort: i64) -> Self {
        self.sort = sort;
        self
    }

    /// Weapon helper.
    #[must_use]
    pub fn weapon(
        id: impl Into<String>,
        name: impl Into<String>,
        class: impl Into<String>,
        weight: Weight,
        rounds: u32,
        quantity: u32,
    ) -> Self {
        Self::new(
            id,
            name,
            ItemKind::Weapon(WeaponStats {
                weight,
                quantity,
                rounds,
                class: class.into(),
            }),
        )
    }

    /// Armor helper.
    #[must_use]
    pub fn armor(id: impl Into<String>, name: impl Into<String>, weight: Weight) -> Self {
        Self::new(id, name, ItemKind::Armor(ArmorStats { weight }))
    }

    /// Generic gear helper (type tag `"item"`).
    #[must_use]
    pub fn gear(
        id: impl Into<String>,
        name: impl Into<String>,
        weight: Weight,
        quantity: u32,
    ) -> Self {
        Self::new(
            id,
            name,
            ItemKind::Gear(GearStats {
                tag: "item".to_string(),
                weight,
                quantity,
            }),
        )
    }

    /// Talent helper.
    #[must_use]
    pub fn talent(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, ItemKind::Talent)
    }

    /// The record type tag of this item.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        self.kind.type_tag()
    }

    /// Whether the item is stowed and excluded from weight.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.active.is_locked()
    }

    #[must_use]
    pub const fn is_talent(&self) -> bool {
        matches!(self.kind, ItemKind::Talent)
    }

    /// A physical item held more than once.
    #[must_use]
    pub fn is_stack(&self) -> bool {
        self.kind.quantity().is_some_and(|q| q > 1)
    }
}

// =============================================================================
// TESTS
// =============================================================================
