//! # stowage-core
//!
//! The deterministic inventory and encumbrance rules behind a character
//! sheet - THE LOGIC.
//!
//! Given a character's items, strength and talents this crate:
//! - classifies items into the buckets a sheet displays
//! - weighs every item and totals the carried load
//! - evaluates capacity, load percentage and encumbrance
//! - keeps the `encumbered` condition in step with the evaluation
//! - draws filled/empty level indicators for bounded stats
//!
//! ## Architectural Constraints
//!
//! - Integer fixed-point arithmetic only (no floats)
//! - NO async, NO network dependencies, NO logging (pure Rust)
//! - Condition stores are reached through the [`ConditionStore`] trait;
//!   the roster offers in-memory and redb-backed stores

// =============================================================================
// MODULES
// =============================================================================

pub mod acceptance;
pub mod character;
pub mod classifier;
pub mod condition;
pub mod encumbrance;
pub mod formats;
pub mod indicator;
pub mod item;
pub mod primitives;
pub mod record;
pub mod roster;
pub mod rules;
pub mod sheet;
pub mod storage;
pub mod types;
pub mod weight;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ActiveState, ActorKind, CharacterId, ConditionKey, ItemId, StowageError, Weight};

// =============================================================================
// RE-EXPORTS: Model
// =============================================================================

pub use character::{Character, StatTrack};
pub use item::{ArmorStats, GearStats, Item, ItemKind, WeaponStats};
pub use record::{CharacterRecord, ItemRecord};
pub use rules::Rules;

// =============================================================================
// RE-EXPORTS: Rules Components
// =============================================================================

pub use classifier::{Buckets, Inventory, InventoryCategory, classify};
pub use condition::{ConditionSet, ConditionStore, SyncOutcome, sync, toggle};
pub use encumbrance::{Encumbrance, evaluate};
pub use indicator::{Mark, StatIndicator, indicator, stat_indicators};
pub use weight::{ItemWeight, WeightReport, aggregate};

// =============================================================================
// RE-EXPORTS: Sheet, Roster and Storage
// =============================================================================

pub use formats::{PersistenceHeader, character_from_bytes, character_to_bytes};
pub use roster::{Refresh, Roster, RosterBackend};
pub use sheet::{InventoryEntry, InventorySection, Sheet, SheetView};
pub use storage::{RedbConditions, RedbRoster};
