//! # Encumbrance Evaluator
//!
//! Derives capacity, load percentage and the encumbered flag from carried
//! weight, strength and talents. Pure: applying the resulting condition is
//! the job of [`crate::condition::sync`].
//!
//! ## Arithmetic
//!
//! Capacity is `strength × capacity_per_strength` whole units. The load
//! percentage is kept in hundredths of a percent and clamped to
//! `percent_cap`. With zero capacity the percentage is the cap for any
//! positive load and `0` for no load.
//!
//! The encumbered test `percentage > threshold` is evaluated exactly as
//! `carried_hundredths > threshold × capacity`, so truncation of the
//! displayed percentage never changes the outcome.

use crate::{Item, Rules, Weight};
use serde::{Deserialize, Serialize};

/// Encumbrance of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encumbrance {
    /// Capacity in whole weight units.
    pub capacity: u64,
    /// Weight counted against capacity.
    pub carried: Weight,
    /// Load in hundredths of a percent, within `[0, percent_cap × 100]`.
    pub percent_hundredths: u64,
    /// Threshold (percent) that was applied.
    pub threshold_percent: u32,
    pub encumbered: bool,
}

impl Encumbrance {
    /// Load percentage rounded down to a whole percent.
    #[must_use]
    pub const fn percent(&self) -> u64 {
        self.percent_hundredths / 100
    }
}

impl Rules {
    /// Whether any of the talents is the pack-mule talent.
    pub fn has_pack_mule<'a, I>(&self, talents: I) -> bool
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let wanted = self.pack_mule_talent.to_uppercase();
        talents
            .into_iter()
            .any(|item| item.is_talent() && item.name.to_uppercase() == wanted)
    }

    /// Evaluate encumbrance for a carried weight and strength.
    pub fn evaluate<'a, I>(&self, carried: Weight, strength: u32, talents: I) -> Encumbrance
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let capacity = u64::from(strength).saturating_mul(u64::from(self.capacity_per_strength));
        let cap_hundredths = u64::from(self.percent_cap).saturating_mul(100);

        let percent_hundredths = if capacity == 0 {
            if carried.is_zero() { 0 } else { cap_hundredths }
        } else {
            // carried is already ×100; one more ×100 for hundredths of a percent
            (carried.hundredths().saturating_mul(100) / capacity).min(cap_hundredths)
        };

        let threshold_percent = if self.has_pack_mule(talents) {
            self.pack_mule_above_percent
        } else {
            self.encumbered_above_percent
        };

        // Clamped percentage can only exceed thresholds below the cap.
        let encumbered = threshold_percent < self.percent_cap
            && carried.hundredths() > u64::from(threshold_percent).saturating_mul(capacity);

        Encumbrance {
            capacity,
            carried,
            percent_hundredths,
            threshold_percent,
            encumbered,
        }
    }
}

/// Evaluate encumbrance under the default rules.
pub fn evaluate<'a, I>(carried: Weight, strength: u32, talents: I) -> Encumbrance
where
    I: IntoIterator<Item = &'a Item>,
{
    Rules::default().evaluate(carried, strength, talents)
}

// =============================================================================
// TESTS
// =============================================================================
