//! # Roster
//!
//! The set of characters a host manages, with their applied conditions.
//!
//! ## Storage Backends
//!
//! - `InMemory`: a `BTreeMap` of characters; conditions live inside each
//!   character snapshot
//! - `Persistent`: [`RedbRoster`] for disk-backed ACID storage
//!
//! [`Roster::refresh`] is the recomputation entry point: it prepares the
//! sheet and then synchronizes the `encumbered` condition on every call.

use crate::condition::{self, SyncOutcome};
use crate::sheet::{Sheet, SheetView};
use crate::storage::RedbRoster;
use crate::{ActiveState, Character, CharacterId, ConditionKey, Item, ItemId, Rules, StowageError};
use std::collections::BTreeMap;
use std::path::Path;

/// Storage backend for a roster.
#[derive(Debug)]
pub enum RosterBackend {
    /// In-memory characters (fast, volatile).
    InMemory(BTreeMap<CharacterId, Character>),
    /// Disk-backed characters using redb.
    Persistent(RedbRoster),
}

impl Default for RosterBackend {
    fn default() -> Self {
        Self::InMemory(BTreeMap::new())
    }
}

/// Result of a sheet refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refresh {
    /// The prepared sheet, with conditions as they are after synchronization.
    pub view: SheetView,
    /// What synchronization did; `None` when the actor kind has no
    /// encumbrance.
    pub sync: Option<SyncOutcome>,
}

/// Characters plus the rules their sheets are prepared with.
#[derive(Debug, Default)]
pub struct Roster {
    backend: RosterBackend,
    sheet: Sheet,
}

impl Roster {
    /// Empty in-memory roster under the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty in-memory roster under custom rules.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        Self {
            backend: RosterBackend::default(),
            sheet: Sheet::new(rules),
        }
    }

    /// Roster backed by a redb database at `path`.
    pub fn with_redb(path: impl AsRef<Path>, rules: Rules) -> Result<Self, StowageError> {
        Ok(Self {
            backend: RosterBackend::Persistent(RedbRoster::open(path)?),
            sheet: Sheet::new(rules),
        })
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, RosterBackend::Persistent(_))
    }

    #[must_use]
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    #[must_use]
    pub fn rules(&self) -> &Rules {
        self.sheet.rules()
    }

    // =========================================================================
    // CHARACTERS
    // =========================================================================

    /// Validate and store a character, replacing any previous snapshot.
    pub fn put(&mut self, character: Character) -> Result<(), StowageError> {
        character.validate()?;
        match &mut self.backend {
            RosterBackend::InMemory(characters) => {
                characters.insert(character.id.clone(), character);
                Ok(())
            }
            RosterBackend::Persistent(redb) => redb.put_character(&character),
        }
    }

    /// Load a character with its applied conditions.
    pub fn get(&self, id: &CharacterId) -> Result<Character, StowageError> {
        let found = match &self.backend {
            RosterBackend::InMemory(characters) => characters.get(id).cloned(),
            RosterBackend::Persistent(redb) => redb.character(id)?,
        };
        found.ok_or_else(|| StowageError::CharacterNotFound(id.clone()))
    }

    /// Stored character ids in key order.
    pub fn ids(&self) -> Result<Vec<CharacterId>, StowageError> {
        match &self.backend {
            RosterBackend::InMemory(characters) => Ok(characters.keys().cloned().collect()),
            RosterBackend::Persistent(redb) => redb.ids(),
        }
    }

    #[must_use]
    pub fn prepare(&self, character: &Character) -> SheetView {
        self.sheet.prepare(character)
    }

    // =========================================================================
    // RECOMPUTATION
    // =========================================================================

    /// Prepare a character's sheet and synchronize its `encumbered`
    /// condition with the result.
    pub fn refresh(&mut self, id: &CharacterId) -> Result<Refresh, StowageError> {
        let character = self.get(id)?;
        let mut view = self.sheet.prepare(&character);

        let Some(encumbrance) = view.encumbrance else {
            return Ok(Refresh { view, sync: None });
        };

        let outcome = match &mut self.backend {
            RosterBackend::InMemory(characters) => {
                let stored = characters
                    .get_mut(id)
                    .ok_or_else(|| StowageError::CharacterNotFound(id.clone()))?;
                let outcome = condition::sync(&mut stored.conditions, &encumbrance)?;
                view.conditions = stored.conditions.iter().cloned().collect();
                outcome
            }
            RosterBackend::Persistent(redb) => {
                let outcome = condition::sync(&mut redb.conditions(id), &encumbrance)?;
                view.conditions = redb.conditions_of(id)?.iter().cloned().collect();
                outcome
            }
        };

        Ok(Refresh {
            view,
            sync: Some(outcome),
        })
    }

    // =========================================================================
    // CONDITIONS AND LOCKER
    // =========================================================================

    /// Flip a condition on a character. Returns whether it is applied afterwards.
    pub fn toggle_condition(
        &mut self,
        id: &CharacterId,
        key: &ConditionKey,
    ) -> Result<bool, StowageError> {
        match &mut self.backend {
            RosterBackend::InMemory(characters) => {
                let stored = characters
                    .get_mut(id)
                    .ok_or_else(|| StowageError::CharacterNotFound(id.clone()))?;
                condition::toggle(&mut stored.conditions, key)
            }
            RosterBackend::Persistent(redb) => condition::toggle(&mut redb.conditions(id), key),
        }
    }

    /// Set the `header.active` state of an owned item: activate,
    /// deactivate, or stow it in the locker.
    pub fn set_item_active(
        &mut self,
        id: &CharacterId,
        item: &ItemId,
        state: ActiveState,
    ) -> Result<Item, StowageError> {
        match &mut self.backend {
            RosterBackend::InMemory(characters) => {
                let stored = characters
                    .get_mut(id)
                    .ok_or_else(|| StowageError::CharacterNotFound(id.clone()))?;
                let target = stored.item_mut(item)?;
                target.active = state;
                Ok(target.clone())
            }
            RosterBackend::Persistent(redb) => {
                let mut stored = redb
                    .character(id)?
                    .ok_or_else(|| StowageError::CharacterNotFound(id.clone()))?;
                let updated = {
                    let target = stored.item_mut(item)?;
                    target.active = state;
                    target.clone()
                };
                redb.put_character(&stored)?;
                Ok(updated)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::{ActorKind, Weight};
    use tempfile::tempdir;

    fn loaded_marine() -> Character {
        // capacity 8, carrying 5
        Character::new("drake", "Drake", ActorKind::Character)
            .with_strength(2)
            .with_item(Item::gear("g1", "Ammo Crate", Weight::from_units(5), 1))
    }

    fn backends() -> Vec<(Roster, Option<tempfile::TempDir>)> {
        let temp = tempdir().expect("temp dir");
        let redb = Roster::with_redb(temp.path().join("roster.redb"), Rules::default()).unwrap();
        vec![(Roster::new(), None), (redb, Some(temp))]
    }

    #[test]
    fn refresh_applies_and_clears_encumbered() {
        for (mut roster, _guard) in backends() {
            let id = CharacterId::new("drake");
            roster.put(loaded_marine()).unwrap();

            let refresh = roster.refresh(&id).unwrap();
            assert_eq!(refresh.sync, Some(SyncOutcome::Added));
            assert_eq!(refresh.view.conditions, vec![ConditionKey::encumbered()]);

            roster
                .set_item_active(&id, &ItemId::new("g1"), ActiveState::Locked)
                .unwrap();
            let refresh = roster.refresh(&id).unwrap();
            assert_eq!(refresh.sync, Some(SyncOutcome::Removed));
            assert!(refresh.view.conditions.is_empty());
        }
    }

    #[test]
    fn refresh_every_call_is_idempotent() {
        for (mut roster, _guard) in backends() {
            let id = CharacterId::new("drake");
            roster.put(loaded_marine()).unwrap();

            roster.refresh(&id).unwrap();
            let again = roster.refresh(&id).unwrap();
            assert_eq!(again.sync, Some(SyncOutcome::Unchanged));
            assert_eq!(roster.get(&id).unwrap().conditions.len(), 1);
        }
    }

    #[test]
    fn refresh_skips_actors_without_encumbrance() {
        let mut roster = Roster::new();
        roster
            .put(
                Character::new("apc", "APC", ActorKind::Vehicles)
                    .with_item(Item::gear("g", "Cargo", Weight::from_units(500), 1)),
            )
            .unwrap();

        let refresh = roster.refresh(&CharacterId::new("apc")).unwrap();
        assert_eq!(refresh.sync, None);
        assert!(roster.get(&CharacterId::new("apc")).unwrap().conditions.is_empty());
    }

    #[test]
    fn unknown_character_is_reported() {
        for (mut roster, _guard) in backends() {
            let ghost = CharacterId::new("ghost");
            assert!(matches!(
                roster.refresh(&ghost),
                Err(StowageError::CharacterNotFound(_))
            ));
            assert!(matches!(
                roster.toggle_condition(&ghost, &ConditionKey::new("overwatch")),
                Err(StowageError::CharacterNotFound(_))
            ));
        }
    }

    #[test]
    fn toggle_overwatch() {
        for (mut roster, _guard) in backends() {
            let id = CharacterId::new("drake");
            let overwatch = ConditionKey::new("overwatch");
            roster.put(loaded_marine()).unwrap();

            assert!(roster.toggle_condition(&id, &overwatch).unwrap());
            assert!(roster.get(&id).unwrap().conditions.contains(&overwatch));
            assert!(!roster.toggle_condition(&id, &overwatch).unwrap());
        }
    }

    #[test]
    fn locker_operations_report_missing_items() {
        for (mut roster, _guard) in backends() {
            roster.put(loaded_marine()).unwrap();
            let result = roster.set_item_active(
                &CharacterId::new("drake"),
                &ItemId::new("nope"),
                ActiveState::Active,
            );
            assert!(matches!(result, Err(StowageError::ItemNotFound(_))));
        }
    }

    #[test]
    fn put_rejects_disallowed_items() {
        let mut roster = Roster::new();
        let beast = Character::new("xeno", "Drone", ActorKind::Creature)
            .with_item(Item::gear("g", "Egg", Weight::ZERO, 1));
        assert!(matches!(
            roster.put(beast),
            Err(StowageError::ItemNotAllowed { .. })
        ));
        assert!(roster.ids().unwrap().is_empty());
    }
}
