//! # Sheet Pipeline
//!
//! Prepares everything a character sheet displays, in one pass over a
//! character snapshot:
//!
//! 1. Order items by their `sort` key (stable)
//! 2. Classify into buckets
//! 3. Weigh every item and total the load
//! 4. Evaluate encumbrance (characters and synthetics only)
//! 5. Build level indicators for the tracked stats
//!
//! Preparation is pure. Applying the resulting `encumbered` condition is
//! done by [`crate::Roster::refresh`].

use crate::classifier::{InventoryCategory, classify};
use crate::indicator::{StatIndicator, stat_indicators};
use crate::{ActorKind, Character, CharacterId, ConditionKey, Encumbrance, Item, Rules, Weight};
use serde::{Deserialize, Serialize};

// =============================================================================
// VIEW TYPES
// =============================================================================

/// An inventory item with its computed weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub item: Item,
    /// Weight the item contributes to the load (zero when stowed).
    pub total_weight: Weight,
    pub is_stack: bool,
}

/// One inventory section of the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySection {
    pub category: InventoryCategory,
    pub items: Vec<InventoryEntry>,
}

/// The prepared sheet of one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetView {
    pub id: CharacterId,
    pub name: String,
    pub kind: ActorKind,
    pub talents: Vec<Item>,
    pub agendas: Vec<Item>,
    /// At most one entry.
    pub specialities: Vec<Item>,
    pub critical_injuries: Vec<Item>,
    /// Sections in display order: weapon, item, armor.
    pub inventory: Vec<InventorySection>,
    pub total_weight: Weight,
    /// `None` for actor kinds without encumbrance.
    pub encumbrance: Option<Encumbrance>,
    pub indicators: Vec<StatIndicator>,
    pub conditions: Vec<ConditionKey>,
}

impl SheetView {
    /// Inventory section by category.
    #[must_use]
    pub fn section(&self, category: InventoryCategory) -> Option<&InventorySection> {
        self.inventory.iter().find(|s| s.category == category)
    }

    /// Whether the `encumbered` condition should be applied.
    #[must_use]
    pub fn is_encumbered(&self) -> bool {
        self.encumbrance.is_some_and(|e| e.encumbered)
    }
}

// =============================================================================
// SHEET
// =============================================================================

/// Sheet preparer bound to a rule set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    rules: Rules,
}

impl Sheet {
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Prepare the sheet of a character.
    #[must_use]
    pub fn prepare(&self, character: &Character) -> SheetView {
        let mut items = character.items.clone();
        items.sort_by_key(|item| item.sort);

        let buckets = classify(&items);
        let report = self.rules.aggregate(&items);

        let inventory = InventoryCategory::ALL
            .iter()
            .map(|&category| InventorySection {
                category,
                items: buckets
                    .inventory
                    .section(category)
                    .iter()
                    .map(|&item| InventoryEntry {
                        item: item.clone(),
                        total_weight: self.rules.item_weight(item),
                        is_stack: item.is_stack(),
                    })
                    .collect(),
            })
            .collect();

        let encumbrance = character.kind.tracks_encumbrance().then(|| {
            self.rules.evaluate(
                report.total,
                character.strength,
                buckets.talents.iter().copied(),
            )
        });

        SheetView {
            id: character.id.clone(),
            name: character.name.clone(),
            kind: character.kind,
            talents: owned(&buckets.talents),
            agendas: owned(&buckets.agendas),
            specialities: owned(&buckets.specialities),
            critical_injuries: owned(&buckets.critical_injuries),
            inventory,
            total_weight: report.total,
            encumbrance,
            indicators: stat_indicators(character),
            conditions: character.conditions.iter().cloned().collect(),
        }
    }
}

fn owned(bucket: &[&Item]) -> Vec<Item> {
    bucket.iter().map(|&item| item.clone()).collect()
}

// =============================================================================
// TESTS
// =============================================================================
