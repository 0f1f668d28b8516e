//! # Core Type Definitions
//!
//! This module contains the value types shared by every rules component:
//! - Identifiers (`CharacterId`, `ItemId`, `ConditionKey`)
//! - Fixed-point carried weight (`Weight`)
//! - Item stowage state (`ActiveState`) and actor kinds (`ActorKind`)
//! - Error types (`StowageError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for sums and products

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a character (actor) owned by the host application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub String);

impl CharacterId {
    /// Create a new character identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an item owned by a character.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Create a new item identifier.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of a status condition in a condition store (e.g. `"encumbered"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConditionKey(pub String);

impl ConditionKey {
    /// Create a new condition key.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The condition applied by the encumbrance rules.
    #[must_use]
    pub fn encumbered() -> Self {
        Self::new(crate::primitives::ENCUMBERED_CONDITION)
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// WEIGHT (fixed-point hundredths)
// =============================================================================

/// Carried weight in fixed-point hundredths of a weight unit.
///
/// `0.25` is stored as `25`. Sums are exact, so totals never depend on
/// the order items were added in.
///
/// Human-readable formats (JSON, TOML) read and write a decimal number;
/// binary formats (postcard) store the raw hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Weight(u64);

impl Weight {
    /// No weight at all.
    pub const ZERO: Self = Self(0);

    /// Create a weight from raw hundredths.
    #[must_use]
    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self(hundredths)
    }

    /// Create a weight from whole units.
    #[must_use]
    pub const fn from_units(units: u64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Raw value in hundredths.
    #[must_use]
    pub const fn hundredths(self) -> u64 {
        self.0
    }

    /// Whole units, fractional part discarded.
    #[must_use]
    pub const fn whole_units(self) -> u64 {
        self.0 / 100
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Add two weights using saturating arithmetic.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiply by an item count using saturating arithmetic.
    #[must_use]
    pub const fn times(self, count: u64) -> Self {
        Self(self.0.saturating_mul(count))
    }

    /// Parse a decimal literal such as `"1"`, `"0.25"` or `".5"`.
    ///
    /// Digits past the second decimal round half-up. Negative literals
    /// clamp to zero. Returns `None` for anything that is not a plain
    /// decimal number.
    #[must_use]
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let text = text.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        if negative {
            return Some(Self::ZERO);
        }

        // Only overflow can fail here; digits were checked above.
        let whole_units = if whole.is_empty() {
            0
        } else {
            whole.parse::<u64>().unwrap_or(u64::MAX)
        };

        let mut digits = frac.bytes().map(|b| u64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let round_up = u64::from(digits.next().is_some_and(|d| d >= 5));

        Some(Self(
            whole_units
                .saturating_mul(100)
                .saturating_add(tenths * 10 + hundredths)
                .saturating_add(round_up),
        ))
    }
}

impl std::iter::Sum for Weight {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}", whole, frac)
        }
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !serializer.is_human_readable() {
            return serializer.serialize_u64(self.0);
        }
        if self.0 % 100 == 0 {
            serializer.serialize_u64(self.0 / 100)
        } else {
            // The decimal rendering is exact; parsing it avoids float arithmetic.
            serializer.serialize_f64(self.to_string().parse::<f64>().unwrap_or_default())
        }
    }
}

impl<'de> Deserialize<'de> for Weight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(WeightVisitor)
        } else {
            u64::deserialize(deserializer).map(Self)
        }
    }
}

struct WeightVisitor;

impl Visitor<'_> for WeightVisitor {
    type Value = Weight;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal weight")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Weight, E> {
        Ok(Weight::from_units(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Weight, E> {
        Ok(u64::try_from(v).map_or(Weight::ZERO, Weight::from_units))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Weight, E> {
        // NaN and infinities render as text, not digits, and fall back to zero.
        Ok(Weight::parse_decimal(&v.to_string()).unwrap_or(Weight::ZERO))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Weight, E> {
        Weight::parse_decimal(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

// =============================================================================
// ITEM STOWAGE STATE
// =============================================================================

/// The `header.active` state of an item.
///
/// `Locked` means the item is stowed away (in a locker) and never counts
/// towards carried weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveState {
    /// Item is in use.
    Active,
    /// Item is carried but not in use.
    #[default]
    Inactive,
    /// Item is stowed and excluded from weight.
    Locked,
}

impl ActiveState {
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

// =============================================================================
// ACTOR KINDS
// =============================================================================

/// The kind of actor a sheet is prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    #[default]
    Character,
    Synthetic,
    Vehicles,
    Creature,
    Territory,
}

impl ActorKind {
    /// Whether encumbrance rules apply to this kind of actor.
    #[must_use]
    pub const fn tracks_encumbrance(self) -> bool {
        matches!(self, Self::Character | Self::Synthetic)
    }

    /// The tag used in records (`"character"`, `"vehicles"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Synthetic => "synthetic",
            Self::Vehicles => "vehicles",
            Self::Creature => "creature",
            Self::Territory => "territory",
        }
    }
}

impl std::str::FromStr for ActorKind {
    type Err = StowageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(Self::Character),
            "synthetic" => Ok(Self::Synthetic),
            "vehicles" => Ok(Self::Vehicles),
            "creature" => Ok(Self::Creature),
            "territory" => Ok(Self::Territory),
            other => Err(StowageError::InvalidCharacter(format!(
                "unknown actor kind '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the stowage rules core.
///
/// The pure evaluators never fail; errors come from validation at the
/// record boundary and from condition/roster storage.
#[derive(Debug, Error)]
pub enum StowageError {
    /// The requested character is not stored.
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// The requested item is not owned by the character.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// The actor kind may not own items of this type.
    #[error("Item type '{item_type}' is not allowed on actor kind '{actor}'")]
    ItemNotAllowed { actor: ActorKind, item_type: String },

    /// A character record failed validation.
    #[error("Invalid character: {0}")]
    InvalidCharacter(String),

    /// A condition key failed validation.
    #[error("Invalid condition key: {0}")]
    InvalidCondition(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O or storage error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_handles_fractions() {
        assert_eq!(Weight::parse_decimal("0.25"), Some(Weight::from_hundredths(25)));
        assert_eq!(Weight::parse_decimal("1.5"), Some(Weight::from_hundredths(150)));
        assert_eq!(Weight::parse_decimal(".5"), Some(Weight::from_hundredths(50)));
        assert_eq!(Weight::parse_decimal("3"), Some(Weight::from_units(3)));
    }

    #[test]
    fn parse_decimal_rounds_third_digit_half_up() {
        assert_eq!(Weight::parse_decimal("0.125"), Some(Weight::from_hundredths(13)));
        assert_eq!(Weight::parse_decimal("0.124"), Some(Weight::from_hundredths(12)));
    }

    #[test]
    fn parse_decimal_clamps_negative_and_rejects_garbage() {
        assert_eq!(Weight::parse_decimal("-2.5"), Some(Weight::ZERO));
        assert_eq!(Weight::parse_decimal("heavy"), None);
        assert_eq!(Weight::parse_decimal(""), None);
        assert_eq!(Weight::parse_decimal("NaN"), None);
    }

    #[test]
    fn parse_decimal_rounds_to_hundredths() {
        let third = Weight::parse_decimal("0.333").unwrap();
        assert_eq!(third.hundredths(), 33);
        // Rounding happens once per item, before any multiplication.
        assert_eq!(third.times(3), Weight::from_hundredths(99));
        assert_eq!(Weight::parse_decimal("0.335").unwrap().hundredths(), 34);
        assert_eq!(Weight::parse_decimal("0.999").unwrap(), Weight::from_units(1));
    }

    #[test]
    fn weight_display_trims_trailing_zeros() {
        assert_eq!(Weight::from_hundredths(400).to_string(), "4");
        assert_eq!(Weight::from_hundredths(450).to_string(), "4.5");
        assert_eq!(Weight::from_hundredths(425).to_string(), "4.25");
        assert_eq!(Weight::from_hundredths(5).to_string(), "0.05");
    }

    #[test]
    fn weight_json_reads_numbers_and_strings() {
        let w: Weight = serde_json::from_str("0.25").unwrap();
        assert_eq!(w.hundredths(), 25);
        let w: Weight = serde_json::from_str("2").unwrap();
        assert_eq!(w.hundredths(), 200);
        let w: Weight = serde_json::from_str("-1").unwrap();
        assert_eq!(w, Weight::ZERO);
        let w: Weight = serde_json::from_str("\"1.75\"").unwrap();
        assert_eq!(w.hundredths(), 175);
    }

    #[test]
    fn weight_json_writes_decimal_numbers() {
        assert_eq!(serde_json::to_string(&Weight::from_hundredths(425)).unwrap(), "4.25");
        assert_eq!(serde_json::to_string(&Weight::from_units(4)).unwrap(), "4");
    }

    #[test]
    fn weight_postcard_keeps_raw_hundredths() {
        let bytes = postcard::to_stdvec(&Weight::from_hundredths(1234)).unwrap();
        let back: Weight = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(back.hundredths(), 1234);
    }

    #[test]
    fn weight_sum_saturates() {
        let total: Weight = [Weight::from_hundredths(u64::MAX), Weight::from_units(1)]
            .into_iter()
            .sum();
        assert_eq!(total.hundredths(), u64::MAX);
    }

    #[test]
    fn actor_kind_parses_record_tags() {
        assert_eq!("synthetic".parse::<ActorKind>().unwrap(), ActorKind::Synthetic);
        assert!("dragon".parse::<ActorKind>().is_err());
        assert!(ActorKind::Character.tracks_encumbrance());
        assert!(!ActorKind::Vehicles.tracks_encumbrance());
    }
}
