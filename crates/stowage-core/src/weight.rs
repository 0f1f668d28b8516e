//! # Weight Aggregator
//!
//! Per-item and total carried weight.
//!
//! Weighing rules by kind, skipped entirely for locked (stowed) items:
//! - Armor: its own weight
//! - Weapon: `(weight + rounds × ammo unit) × quantity`, where the ammo
//!   unit is the heavy unit for rocket launchers
//! - Generic gear: `weight × quantity`
//! - Talents, agendas, specialties, injuries: weightless
//!
//! All arithmetic is fixed-point and saturating, so the total equals the
//! sum of the per-item weights in any order.

use crate::{Item, ItemId, ItemKind, Rules, Weight};
use crate::item::WeaponStats;
use serde::{Deserialize, Serialize};

/// Weight of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWeight {
    pub id: ItemId,
    pub weight: Weight,
}

/// Aggregation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightReport {
    /// One entry per input item, in input order.
    pub per_item: Vec<ItemWeight>,
    /// Sum of `per_item`.
    pub total: Weight,
}

impl WeightReport {
    /// Weight computed for an item, if it was part of the input.
    #[must_use]
    pub fn weight_of(&self, id: &ItemId) -> Option<Weight> {
        self.per_item
            .iter()
            .find(|entry| &entry.id == id)
            .map(|entry| entry.weight)
    }
}

impl Rules {
    /// Whether a weapon fires heavy rounds.
    ///
    /// True when the class equals the token, or the name contains the
    /// token as a space-delimited word, or starts or ends with it.
    /// Matching is case-sensitive.
    #[must_use]
    pub fn fires_heavy_ammo(&self, name: &str, weapon: &WeaponStats) -> bool {
        let token = self.heavy_ammo_token.as_str();
        if token.is_empty() {
            return false;
        }
        weapon.class == token
            || name.contains(&format!(" {} ", token))
            || name.starts_with(token)
            || name.ends_with(token)
    }

    /// Weight of a single round for this weapon.
    #[must_use]
    pub fn ammo_unit_weight(&self, name: &str, weapon: &WeaponStats) -> Weight {
        if self.fires_heavy_ammo(name, weapon) {
            self.heavy_ammo_unit_weight
        } else {
            self.ammo_unit_weight
        }
    }

    /// Carried weight of one item.
    #[must_use]
    pub fn item_weight(&self, item: &Item) -> Weight {
        if item.is_locked() {
            return Weight::ZERO;
        }
        match &item.kind {
            ItemKind::Armor(armor) => armor.weight,
            ItemKind::Weapon(weapon) => {
                let ammo = self
                    .ammo_unit_weight(&item.name, weapon)
                    .times(u64::from(weapon.rounds));
                weapon
                    .weight
                    .saturating_add(ammo)
                    .times(u64::from(weapon.quantity))
            }
            ItemKind::Gear(gear) => gear.weight.times(u64::from(gear.quantity)),
            ItemKind::Talent | ItemKind::Agenda | ItemKind::Specialty | ItemKind::CriticalInjury => {
                Weight::ZERO
            }
        }
    }

    /// Weigh every item and sum the result.
    #[must_use]
    pub fn aggregate(&self, items: &[Item]) -> WeightReport {
        let per_item: Vec<ItemWeight> = items
            .iter()
            .map(|item| ItemWeight {
                id: item.id.clone(),
                weight: self.item_weight(item),
            })
            .collect();
        let total = per_item.iter().map(|entry| entry.weight).sum();

        WeightReport { per_item, total }
    }
}

/// Weigh items under the default rules.
#[must_use]
pub fn aggregate(items: &[Item]) -> WeightReport {
    Rules::default().aggregate(items)
}

// =============================================================================
// TESTS
// =============================================================================
