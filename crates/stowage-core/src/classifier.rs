//! # Classifier
//!
//! Partitions an item sequence into the buckets a sheet displays.
//!
//! - One pass, input order preserved inside every bucket
//! - Only the first specialty is kept (single slot); later ones are
//!   dropped from the bucket but stay in the character's items
//! - Unrecognized types land in the generic gear bucket

use crate::{Item, ItemKind};
use serde::{Deserialize, Serialize};

/// Inventory sections of a sheet, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryCategory {
    Weapon,
    Item,
    Armor,
}

impl InventoryCategory {
    /// All sections in display order.
    pub const ALL: [Self; 3] = [Self::Weapon, Self::Item, Self::Armor];

    /// The inventory section an item kind belongs to, if any.
    #[must_use]
    pub const fn of(kind: &ItemKind) -> Option<Self> {
        match kind {
            ItemKind::Weapon(_) => Some(Self::Weapon),
            ItemKind::Armor(_) => Some(Self::Armor),
            ItemKind::Gear(_) => Some(Self::Item),
            _ => None,
        }
    }

    /// Record key of the section.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Item => "item",
            Self::Armor => "armor",
        }
    }
}

/// Inventory buckets keyed by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory<'a> {
    pub weapons: Vec<&'a Item>,
    pub items: Vec<&'a Item>,
    pub armor: Vec<&'a Item>,
}

impl<'a> Inventory<'a> {
    /// Items of one category, in input order.
    #[must_use]
    pub fn section(&self, category: InventoryCategory) -> &[&'a Item] {
        match category {
            InventoryCategory::Weapon => &self.weapons,
            InventoryCategory::Item => &self.items,
            InventoryCategory::Armor => &self.armor,
        }
    }

    fn push(&mut self, category: InventoryCategory, item: &'a Item) {
        match category {
            InventoryCategory::Weapon => self.weapons.push(item),
            InventoryCategory::Item => self.items.push(item),
            InventoryCategory::Armor => self.armor.push(item),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len() + self.items.len() + self.armor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classification result borrowing from the input items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets<'a> {
    pub talents: Vec<&'a Item>,
    pub agendas: Vec<&'a Item>,
    /// At most one entry.
    pub specialities: Vec<&'a Item>,
    pub critical_injuries: Vec<&'a Item>,
    pub inventory: Inventory<'a>,
}

/// Classify items into buckets.
#[must_use]
pub fn classify(items: &[Item]) -> Buckets<'_> {
    let mut buckets = Buckets::default();

    for item in items {
        match &item.kind {
            ItemKind::Talent => buckets.talents.push(item),
            ItemKind::Agenda => buckets.agendas.push(item),
            ItemKind::Specialty => {
                if buckets.specialities.is_empty() {
                    buckets.specialities.push(item);
                }
            }
            ItemKind::CriticalInjury => buckets.critical_injuries.push(item),
            kind => {
                if let Some(category) = InventoryCategory::of(kind) {
                    buckets.inventory.push(category, item);
                }
            }
        }
    }

    buckets
}

// =============================================================================
// TESTS
// =============================================================================
