//! # Character Snapshot
//!
//! The read-only view of an actor that the rules evaluate: its items,
//! strength, tracked stats and currently applied conditions.

use crate::condition::ConditionSet;
use crate::primitives::{MAX_ID_LENGTH, MAX_ITEMS, MAX_NAME_LENGTH};
use crate::{ActorKind, CharacterId, Item, ItemId, StowageError, acceptance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bounded stat such as radiation or a condition tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatTrack {
    pub value: u32,
    pub max: u32,
}

impl StatTrack {
    #[must_use]
    pub const fn new(value: u32, max: u32) -> Self {
        Self { value, max }
    }
}

/// A character snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub kind: ActorKind,
    /// Strength attribute; capacity derives from it.
    pub strength: u32,
    /// Items in stored order (not necessarily display order).
    pub items: Vec<Item>,
    /// Bounded stats keyed by stat name.
    pub stats: BTreeMap<String, StatTrack>,
    /// Conditions currently applied.
    pub conditions: ConditionSet,
}

impl Character {
    /// Create an empty character of the given kind.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: CharacterId::new(id),
            name: name.into(),
            kind,
            strength: 0,
            items: Vec::new(),
            stats: BTreeMap::new(),
            conditions: ConditionSet::new(),
        }
    }

    #[must_use]
    pub fn with_strength(mut self, strength: u32) -> Self {
        self.strength = strength;
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn with_stat(mut self, key: impl Into<String>, track: StatTrack) -> Self {
        self.stats.insert(key.into(), track);
        self
    }

    /// Find an owned item.
    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Find an owned item for modification.
    pub fn item_mut(&mut self, id: &ItemId) -> Result<&mut Item, StowageError> {
        self.items
            .iter_mut()
            .find(|item| &item.id == id)
            .ok_or_else(|| StowageError::ItemNotFound(id.clone()))
    }

    /// Validate identifiers, limits and the item acceptance policy.
    pub fn validate(&self) -> Result<(), StowageError> {
        if self.id.as_str().is_empty() || self.id.as_str().len() > MAX_ID_LENGTH {
            return Err(StowageError::InvalidCharacter(format!(
                "id must be 1..={} bytes",
                MAX_ID_LENGTH
            )));
        }
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(StowageError::InvalidCharacter(format!(
                "name length {} exceeds maximum {} bytes",
                self.name.len(),
                MAX_NAME_LENGTH
            )));
        }
        if self.items.len() > MAX_ITEMS {
            return Err(StowageError::InvalidCharacter(format!(
                "{} items exceeds maximum {}",
                self.items.len(),
                MAX_ITEMS
            )));
        }
        for item in &self.items {
            if item.id.as_str().is_empty() || item.id.as_str().len() > MAX_ID_LENGTH {
                return Err(StowageError::InvalidCharacter(format!(
                    "item '{}' has an invalid id",
                    item.name
                )));
            }
            acceptance::check_item(self.kind, item.type_tag())?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
