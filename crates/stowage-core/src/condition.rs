//! # Condition Synchronizer
//!
//! Applies or removes the `encumbered` condition to match an
//! [`Encumbrance`] result.
//!
//! Sheets call [`sync`] on every recomputation, not only on transitions,
//! so the synchronizer checks the store first and only mutates when the
//! stored state differs. Calling it twice with the same result issues no
//! second mutation.
//!
//! Store failures propagate to the caller unchanged; nothing is retried.

use crate::primitives::MAX_ID_LENGTH;
use crate::{ConditionKey, Encumbrance, StowageError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// CONDITIONSTORE TRAIT
// =============================================================================

/// Keyed status conditions of one character.
///
/// All operations return `Result<T, StowageError>` so in-memory and
/// persistent stores are used uniformly.
pub trait ConditionStore {
    /// Check whether the condition is applied.
    fn has_condition(&self, key: &ConditionKey) -> Result<bool, StowageError>;

    /// Apply the condition. Applying an applied condition is a no-op.
    fn add_condition(&mut self, key: &ConditionKey) -> Result<(), StowageError>;

    /// Remove the condition. Removing an absent condition is a no-op.
    fn remove_condition(&mut self, key: &ConditionKey) -> Result<(), StowageError>;
}

/// Validate a condition key before it reaches a store.
pub fn validate_key(key: &ConditionKey) -> Result<(), StowageError> {
    let raw = key.as_str();
    if raw.is_empty() || raw.len() > MAX_ID_LENGTH {
        return Err(StowageError::InvalidCondition(format!(
            "key must be 1..={} bytes",
            MAX_ID_LENGTH
        )));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(StowageError::InvalidCondition(format!(
            "key '{}' contains whitespace",
            raw
        )));
    }
    Ok(())
}

// =============================================================================
// IN-MEMORY CONDITION SET
// =============================================================================

/// Conditions held alongside a character snapshot.
///
/// Uses BTreeSet for deterministic ordering; a key is held at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSet(BTreeSet<ConditionKey>);

impl ConditionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &ConditionKey) -> bool {
        self.0.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConditionKey> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ConditionKey> for ConditionSet {
    fn from_iter<T: IntoIterator<Item = ConditionKey>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl ConditionStore for ConditionSet {
    fn has_condition(&self, key: &ConditionKey) -> Result<bool, StowageError> {
        Ok(self.0.contains(key))
    }

    fn add_condition(&mut self, key: &ConditionKey) -> Result<(), StowageError> {
        validate_key(key)?;
        self.0.insert(key.clone());
        Ok(())
    }

    fn remove_condition(&mut self, key: &ConditionKey) -> Result<(), StowageError> {
        self.0.remove(key);
        Ok(())
    }
}

// =============================================================================
// SYNCHRONIZATION
// =============================================================================

/// What a synchronization did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    /// The condition was applied.
    Added,
    /// The condition was removed.
    Removed,
    /// The store already matched.
    Unchanged,
}

impl SyncOutcome {
    #[must_use]
    pub const fn mutated(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Make the store hold the condition exactly when `wanted` is true.
pub fn ensure<S>(store: &mut S, key: &ConditionKey, wanted: bool) -> Result<SyncOutcome, StowageError>
where
    S: ConditionStore + ?Sized,
{
    let present = store.has_condition(key)?;
    match (wanted, present) {
        (true, false) => {
            store.add_condition(key)?;
            Ok(SyncOutcome::Added)
        }
        (false, true) => {
            store.remove_condition(key)?;
            Ok(SyncOutcome::Removed)
        }
        _ => Ok(SyncOutcome::Unchanged),
    }
}

/// Apply or remove the `encumbered` condition to match `encumbrance`.
pub fn sync<S>(store: &mut S, encumbrance: &Encumbrance) -> Result<SyncOutcome, StowageError>
where
    S: ConditionStore + ?Sized,
{
    ensure(store, &ConditionKey::encumbered(), encumbrance.encumbered)
}

/// Flip a condition: remove it when applied, apply it otherwise.
///
/// Returns whether the condition is applied afterwards.
pub fn toggle<S>(store: &mut S, key: &ConditionKey) -> Result<bool, StowageError>
where
    S: ConditionStore + ?Sized,
{
    validate_key(key)?;
    if store.has_condition(key)? {
        store.remove_condition(key)?;
        Ok(false)
    } else {
        store.add_condition(key)?;
        Ok(true)
    }
}

// =============================================================================
// TESTS
// =============================================================================
