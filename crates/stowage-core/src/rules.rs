//! # Rule Set
//!
//! The tunable numbers behind weighing and encumbrance.
//!
//! `Rules::default()` is the published game rule. Tables that house-rule
//! capacity or thresholds load a `[rules]` section from configuration;
//! every field falls back to its default when omitted.

use crate::Weight;
use crate::primitives::{
    AMMO_UNIT_HUNDREDTHS, CAPACITY_PER_STRENGTH, ENCUMBERED_ABOVE_PERCENT,
    HEAVY_AMMO_TOKEN, HEAVY_AMMO_UNIT_HUNDREDTHS, PACK_MULE_ABOVE_PERCENT, PACK_MULE_TALENT,
    PERCENT_CAP,
};
use serde::{Deserialize, Serialize};

/// Weighing and encumbrance parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Capacity granted per point of strength.
    pub capacity_per_strength: u32,
    /// Default encumbrance threshold, in percent of capacity.
    pub encumbered_above_percent: u32,
    /// Threshold used instead when the pack-mule talent is present.
    pub pack_mule_above_percent: u32,
    /// Upper clamp of the reported load percentage.
    pub percent_cap: u32,
    /// Weight of one ordinary round.
    pub ammo_unit_weight: Weight,
    /// Weight of one heavy round (rockets).
    pub heavy_ammo_unit_weight: Weight,
    /// Weapon class / name token that selects heavy rounds.
    pub heavy_ammo_token: String,
    /// Talent name, compared case-insensitively, that raises the threshold.
    pub pack_mule_talent: String,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            capacity_per_strength: CAPACITY_PER_STRENGTH,
            encumbered_above_percent: ENCUMBERED_ABOVE_PERCENT,
            pack_mule_above_percent: PACK_MULE_ABOVE_PERCENT,
            percent_cap: PERCENT_CAP,
            ammo_unit_weight: Weight::from_hundredths(AMMO_UNIT_HUNDREDTHS),
            heavy_ammo_unit_weight: Weight::from_hundredths(HEAVY_AMMO_UNIT_HUNDREDTHS),
            heavy_ammo_token: HEAVY_AMMO_TOKEN.to_string(),
            pack_mule_talent: PACK_MULE_TALENT.to_string(),
        }
    }
}
