//! # Rule Primitives
//!
//! Hardcoded constants for the stowage rules core.
//!
//! The game-rule values here are the defaults of [`crate::Rules`]; a
//! table can override them through configuration. Everything else
//! (formats, limits, stat keys) is fixed.

// =============================================================================
// ENCUMBRANCE DEFAULTS
// =============================================================================

/// Carrying capacity per point of strength.
pub const CAPACITY_PER_STRENGTH: u32 = 4;

/// A character is encumbered when the load percentage exceeds this value.
pub const ENCUMBERED_ABOVE_PERCENT: u32 = 50;

/// Threshold that replaces [`ENCUMBERED_ABOVE_PERCENT`] for pack mules.
pub const PACK_MULE_ABOVE_PERCENT: u32 = 75;

/// The load percentage never reports more than this.
pub const PERCENT_CAP: u32 = 99;

/// Talent name (compared upper-cased) that raises the threshold.
pub const PACK_MULE_TALENT: &str = "PACK MULE";

/// Condition applied while a character is over the threshold.
pub const ENCUMBERED_CONDITION: &str = "encumbered";

// =============================================================================
// AMMUNITION DEFAULTS (hundredths)
// =============================================================================

/// Weight of one round of ordinary ammunition: 0.25.
pub const AMMO_UNIT_HUNDREDTHS: u64 = 25;

/// Weight of one rocket: 0.5.
pub const HEAVY_AMMO_UNIT_HUNDREDTHS: u64 = 50;

/// Class value and name token that marks rocket launchers.
pub const HEAVY_AMMO_TOKEN: &str = "RPG";

// =============================================================================
// TRACKED STATS
// =============================================================================

/// Point stats drawn as level indicators on character and synthetic sheets.
pub const POINT_STATS: [&str; 3] = ["radiation", "xp", "sp"];

/// Condition trackers drawn as level indicators on character sheets only.
pub const CONDITION_TRACKERS: [&str; 5] =
    ["starving", "dehydrated", "exhausted", "freezing", "panic"];

// =============================================================================
// PERSISTENCE FORMAT
// =============================================================================

/// Magic bytes for stored character records.
///
/// - Record Header = Magic Bytes ("STOW") + Version (u8) before payload.
pub const MAGIC_BYTES: &[u8; 4] = b"STOW";

/// Current record format version.
///
/// Increment this when making breaking changes to the stored character layout.
pub const FORMAT_VERSION: u8 = 1;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length of character ids, item ids and condition keys.
pub const MAX_ID_LENGTH: usize = 128;

/// Maximum length of character and item names.
pub const MAX_NAME_LENGTH: usize = 256;

/// Maximum number of items a single character may own.
pub const MAX_ITEMS: usize = 4096;

/// Maximum `max` accepted for a level indicator.
///
/// Indicators allocate one mark per level.
pub const MAX_INDICATOR_LEVELS: u32 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(MAGIC_BYTES, b"STOW");
    }

    #[test]
    fn tracked_stats_do_not_overlap() {
        for stat in POINT_STATS {
            assert!(!CONDITION_TRACKERS.contains(&stat));
        }
    }
}
