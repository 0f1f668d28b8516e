//! # Level Indicators
//!
//! Fixed-length filled/empty mark sequences for bounded stats such as
//! radiation, experience, stress and the condition trackers.
//!
//! `indicator(level, max)` has exactly `max` marks; positions `1..=level`
//! are filled. Levels above `max` fill every mark.

use crate::primitives::{CONDITION_TRACKERS, MAX_INDICATOR_LEVELS, POINT_STATS};
use crate::{ActorKind, Character};
use serde::{Deserialize, Serialize};

/// One position of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Filled,
    Empty,
}

impl Mark {
    #[must_use]
    pub const fn is_filled(self) -> bool {
        matches!(self, Self::Filled)
    }
}

/// Marks for a stat at `level` out of `max`.
#[must_use]
pub fn indicator(level: u32, max: u32) -> Vec<Mark> {
    (1..=max)
        .map(|position| {
            if position <= level {
                Mark::Filled
            } else {
                Mark::Empty
            }
        })
        .collect()
}

/// An indicator for one named stat of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatIndicator {
    pub stat: String,
    pub value: u32,
    pub max: u32,
    pub marks: Vec<Mark>,
}

/// Stats drawn as indicators on the sheet of `kind`, in display order.
#[must_use]
pub fn tracked_stats(kind: ActorKind) -> Vec<&'static str> {
    match kind {
        ActorKind::Character => POINT_STATS
            .iter()
            .chain(CONDITION_TRACKERS.iter())
            .copied()
            .collect(),
        ActorKind::Synthetic => POINT_STATS.to_vec(),
        ActorKind::Vehicles | ActorKind::Creature | ActorKind::Territory => Vec::new(),
    }
}

/// Indicators for every tracked stat the character has.
///
/// Stats missing from the character are skipped; `max` is capped at
/// [`MAX_INDICATOR_LEVELS`].
#[must_use]
pub fn stat_indicators(character: &Character) -> Vec<StatIndicator> {
    tracked_stats(character.kind)
        .into_iter()
        .filter_map(|stat| {
            character.stats.get(stat).map(|track| {
                let max = track.max.min(MAX_INDICATOR_LEVELS);
                StatIndicator {
                    stat: stat.to_string(),
                    value: track.value,
                    max,
                    marks: indicator(track.value, max),
                }
            })
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
