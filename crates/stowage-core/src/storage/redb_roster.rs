//! # redb-backed Roster Storage
//!
//! A disk-backed character store using the redb embedded database.
//!
//! Two tables:
//! - `characters`: character id -> encoded character (see
//!   [`crate::formats::persistence`]), stored without its conditions
//! - `conditions`: (character id, condition key) -> marker byte
//!
//! Conditions live in their own table so that synchronizing one
//! condition is a single-row write instead of a full record rewrite.

use crate::condition::{ConditionSet, ConditionStore, validate_key};
use crate::formats::{character_from_bytes, character_to_bytes};
use crate::{Character, CharacterId, ConditionKey, StowageError};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;

/// Table for characters: id -> encoded character bytes
const CHARACTERS: TableDefinition<&str, &[u8]> = TableDefinition::new("characters");

/// Table for applied conditions: (character id, condition key) -> 1
const CONDITIONS: TableDefinition<(&str, &str), u8> = TableDefinition::new("conditions");

const APPLIED: u8 = 1;

fn io_error(e: impl std::fmt::Display) -> StowageError {
    StowageError::IoError(e.to_string())
}

/// Condition keys stored for one character.
///
/// Rows are ordered by owner first, so the owner's rows form one run
/// starting at `(id, "")`.
fn owned_conditions<T>(table: &T, id: &str) -> Result<Vec<String>, StowageError>
where
    T: ReadableTable<(&'static str, &'static str), u8>,
{
    let mut found = Vec::new();
    for entry in table.range((id, "")..).map_err(io_error)? {
        let (key, _) = entry.map_err(io_error)?;
        let (owner, condition) = key.value();
        if owner != id {
            break;
        }
        found.push(condition.to_string());
    }
    Ok(found)
}

/// A disk-backed roster of characters.
pub struct RedbRoster {
    db: Database,
}

impl std::fmt::Debug for RedbRoster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbRoster").finish_non_exhaustive()
    }
}

impl RedbRoster {
    /// Open or create a roster database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StowageError> {
        let db = Database::create(path.as_ref()).map_err(io_error)?;

        {
            let write_txn = db.begin_write().map_err(io_error)?;
            let _ = write_txn.open_table(CHARACTERS).map_err(io_error)?;
            let _ = write_txn.open_table(CONDITIONS).map_err(io_error)?;
            write_txn.commit().map_err(io_error)?;
        }

        Ok(Self { db })
    }

    /// Store a character, replacing any previous record and its conditions.
    pub fn put_character(&mut self, character: &Character) -> Result<(), StowageError> {
        let id = character.id.as_str();
        let mut record = character.clone();
        let conditions = std::mem::take(&mut record.conditions);
        let bytes = character_to_bytes(&record)?;

        let write_txn = self.db.begin_write().map_err(io_error)?;
        {
            let mut characters = write_txn.open_table(CHARACTERS).map_err(io_error)?;
            characters.insert(id, bytes.as_slice()).map_err(io_error)?;
        }
        {
            let mut table = write_txn.open_table(CONDITIONS).map_err(io_error)?;
            for condition in &owned_conditions(&table, id)? {
                table.remove((id, condition.as_str())).map_err(io_error)?;
            }
            for condition in conditions.iter() {
                table.insert((id, condition.as_str()), APPLIED).map_err(io_error)?;
            }
        }
        write_txn.commit().map_err(io_error)?;
        Ok(())
    }

    /// Load a character with its applied conditions.
    pub fn character(&self, id: &CharacterId) -> Result<Option<Character>, StowageError> {
        let read_txn = self.db.begin_read().map_err(io_error)?;
        let characters = read_txn.open_table(CHARACTERS).map_err(io_error)?;

        let Some(data) = characters.get(id.as_str()).map_err(io_error)? else {
            return Ok(None);
        };
        let mut character = character_from_bytes(data.value())?;
        character.conditions = self.conditions_of(id)?;
        Ok(Some(character))
    }

    /// Whether a character is stored.
    pub fn contains(&self, id: &CharacterId) -> Result<bool, StowageError> {
        let read_txn = self.db.begin_read().map_err(io_error)?;
        let characters = read_txn.open_table(CHARACTERS).map_err(io_error)?;
        Ok(characters.get(id.as_str()).map_err(io_error)?.is_some())
    }

    /// All stored character ids in key order.
    pub fn ids(&self) -> Result<Vec<CharacterId>, StowageError> {
        let read_txn = self.db.begin_read().map_err(io_error)?;
        let characters = read_txn.open_table(CHARACTERS).map_err(io_error)?;

        let mut ids = Vec::new();
        for entry in characters.iter().map_err(io_error)? {
            let (key, _) = entry.map_err(io_error)?;
            ids.push(CharacterId::new(key.value()));
        }
        Ok(ids)
    }

    /// Conditions applied to a character.
    pub fn conditions_of(&self, id: &CharacterId) -> Result<ConditionSet, StowageError> {
        let read_txn = self.db.begin_read().map_err(io_error)?;
        let table = read_txn.open_table(CONDITIONS).map_err(io_error)?;

        Ok(owned_conditions(&table, id.as_str())?
            .into_iter()
            .map(ConditionKey::new)
            .collect())
    }

    /// A condition store scoped to one character.
    pub fn conditions(&mut self, id: &CharacterId) -> RedbConditions<'_> {
        RedbConditions {
            roster: self,
            id: id.clone(),
        }
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<(), StowageError> {
        self.db.compact().map_err(io_error)?;
        Ok(())
    }
}

// =============================================================================
// CONDITIONSTORE FOR ONE CHARACTER
// =============================================================================

/// The conditions of one stored character.
///
/// Writes fail with [`StowageError::CharacterNotFound`] when the
/// character is not stored.
#[derive(Debug)]
pub struct RedbConditions<'a> {
    roster: &'a mut RedbRoster,
    id: CharacterId,
}

impl RedbConditions<'_> {
    fn ensure_character(&self) -> Result<(), StowageError> {
        if self.roster.contains(&self.id)? {
            Ok(())
        } else {
            Err(StowageError::CharacterNotFound(self.id.clone()))
        }
    }
}

impl ConditionStore for RedbConditions<'_> {
    fn has_condition(&self, key: &ConditionKey) -> Result<bool, StowageError> {
        let read_txn = self.roster.db.begin_read().map_err(io_error)?;
        let table = read_txn.open_table(CONDITIONS).map_err(io_error)?;
        Ok(table
            .get((self.id.as_str(), key.as_str()))
            .map_err(io_error)?
            .is_some())
    }

    fn add_condition(&mut self, key: &ConditionKey) -> Result<(), StowageError> {
        validate_key(key)?;
        self.ensure_character()?;

        let write_txn = self.roster.db.begin_write().map_err(io_error)?;
        {
            let mut table = write_txn.open_table(CONDITIONS).map_err(io_error)?;
            table
                .insert((self.id.as_str(), key.as_str()), APPLIED)
                .map_err(io_error)?;
        }
        write_txn.commit().map_err(io_error)?;
        Ok(())
    }

    fn remove_condition(&mut self, key: &ConditionKey) -> Result<(), StowageError> {
        self.ensure_character()?;

        let write_txn = self.roster.db.begin_write().map_err(io_error)?;
        {
            let mut table = write_txn.open_table(CONDITIONS).map_err(io_error)?;
            table
                .remove((self.id.as_str(), key.as_str()))
                .map_err(io_error)?;
        }
        write_txn.commit().map_err(io_error)?;
        Ok(())
    }
}
