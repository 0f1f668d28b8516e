//! # Record Ingestion
//!
//! Converts loosely-typed actor and item records, as exported by the
//! virtual tabletop, into validated [`Character`] and [`Item`] values.
//!
//! Records are lenient by nature. Every numeric attribute may appear as
//! `{"value": x}` or as a bare `x`, and as a number or a numeric string;
//! missing, null or malformed attributes become zero (or empty), never an
//! error. Counts (quantity, rounds, strength, stat levels) accept `3`,
//! `3.0` and `"3"` alike; a fractional count is malformed.
//!
//! The item's `header.active` accepts `true`, `false`, `"locked"` and the
//! legacy `"fLocker"` marker; anything else reads as inactive.
//!
//! Record layout:
//!
//! ```text
//! { "_id", "name", "type",
//!   "data": { "attributes": { "str": { "value" } },
//!             "general": { "<stat>": { "value", "max" } } },
//!   "items": [ { "_id", "name", "type", "sort",
//!                "data": { "header": { "active" },
//!                          "attributes": { "weight", "quantity",
//!                                          "rounds", "class" } } } ],
//!   "conditions": [ "<key>" ] }
//! ```
//!
//! `data` may also be spelled `system`.

use crate::condition::ConditionStore;
use crate::item::{ArmorStats, GearStats, WeaponStats};
use crate::primitives::{CONDITION_TRACKERS, POINT_STATS};
use crate::{
    ActiveState, ActorKind, Character, ConditionKey, Item, ItemKind, StatTrack, StowageError, Weight,
};
use serde::de::{self, DeserializeOwned, IgnoredAny, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// LENIENT FIELDS
// =============================================================================

/// A record attribute that falls back to `T::default()` when malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lenient<T>(pub T);

#[derive(Deserialize)]
#[serde(untagged)]
enum Shape<T> {
    Wrapped { value: T },
    Plain(T),
    Other(IgnoredAny),
}

impl<'de, T> Deserialize<'de> for Lenient<T>
where
    T: DeserializeOwned + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Shape::<T>::deserialize(deserializer)? {
            Shape::Wrapped { value } | Shape::Plain(value) => Self(value),
            Shape::Other(IgnoredAny) => Self(T::default()),
        })
    }
}

impl Lenient<Count> {
    /// The count, zero when the attribute was malformed.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.0
    }
}

/// A whole-number record attribute.
///
/// Read through the same decimal path as [`Weight`], so `3`, `3.0`,
/// `"3"` and `"3.00"` are all three. Negative values clamp to zero and
/// values past `u32::MAX` saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Count(pub u32);

impl Count {
    fn from_weight(weight: Weight) -> Option<Self> {
        if weight.hundredths() % 100 != 0 {
            return None;
        }
        Some(Self(u32::try_from(weight.whole_units()).unwrap_or(u32::MAX)))
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CountVisitor)
    }
}

struct CountVisitor;

impl Visitor<'_> for CountVisitor {
    type Value = Count;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a whole number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Count, E> {
        Ok(Count(u32::try_from(v).unwrap_or(u32::MAX)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Count, E> {
        Ok(u64::try_from(v).map_or(Count(0), |v| Count(u32::try_from(v).unwrap_or(u32::MAX))))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Count, E> {
        Weight::parse_decimal(&v.to_string())
            .and_then(Count::from_weight)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Float(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Count, E> {
        Weight::parse_decimal(v)
            .and_then(Count::from_weight)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

/// The `header.active` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveMarker(pub ActiveState);

#[derive(Deserialize)]
#[serde(untagged)]
enum MarkerShape {
    Flag(bool),
    Text(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for ActiveMarker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let state = match MarkerShape::deserialize(deserializer)? {
            MarkerShape::Flag(true) => ActiveState::Active,
            MarkerShape::Text(text) if text == "locked" || text == "fLocker" => ActiveState::Locked,
            MarkerShape::Flag(false) | MarkerShape::Text(_) | MarkerShape::Other(IgnoredAny) => {
                ActiveState::Inactive
            }
        };
        Ok(Self(state))
    }
}

// =============================================================================
// ITEM RECORDS
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemHeader {
    #[serde(default)]
    pub active: ActiveMarker,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemAttributes {
    #[serde(default)]
    pub weight: Lenient<Weight>,
    #[serde(default)]
    pub quantity: Lenient<Count>,
    #[serde(default)]
    pub rounds: Lenient<Count>,
    #[serde(default)]
    pub class: Lenient<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemData {
    #[serde(default)]
    pub header: ItemHeader,
    #[serde(default)]
    pub attributes: ItemAttributes,
}

/// An item as found in an actor record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemRecord {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub sort: Lenient<i64>,
    #[serde(default, alias = "system")]
    pub data: ItemData,
}

impl ItemRecord {
    /// Build the typed item. `index` names items that carry no id.
    #[must_use]
    pub fn into_item(self, index: usize) -> Item {
        let attributes = self.data.attributes;
        let kind = match self.item_type.as_str() {
            "weapon" => ItemKind::Weapon(WeaponStats {
                weight: attributes.weight.0,
                quantity: attributes.quantity.get(),
                rounds: attributes.rounds.get(),
                class: attributes.class.0,
            }),
            "armor" => ItemKind::Armor(ArmorStats {
                weight: attributes.weight.0,
            }),
            "talent" => ItemKind::Talent,
            "agenda" => ItemKind::Agenda,
            "specialty" => ItemKind::Specialty,
            "critical-injury" => ItemKind::CriticalInjury,
            tag => ItemKind::Gear(GearStats {
                tag: if tag.is_empty() { "item".to_string() } else { tag.to_string() },
                weight: attributes.weight.0,
                quantity: attributes.quantity.get(),
            }),
        };

        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("item-{}", index));

        Item::new(id, self.name, kind)
            .with_sort(self.sort.0)
            .with_active(self.data.header.active.0)
    }
}

// =============================================================================
// ACTOR RECORDS
// =============================================================================

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct StatRecord {
    #[serde(default)]
    pub value: Lenient<Count>,
    #[serde(default)]
    pub max: Lenient<Count>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorAttributes {
    #[serde(default, rename = "str")]
    pub strength: Lenient<Count>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorData {
    #[serde(default)]
    pub attributes: ActorAttributes,
    #[serde(default)]
    pub general: BTreeMap<String, Lenient<StatRecord>>,
}

/// An actor as exported by the tabletop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CharacterRecord {
    #[serde(default, rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub actor_type: String,
    #[serde(default, alias = "system")]
    pub data: ActorData,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl CharacterRecord {
    /// Build and validate the character.
    ///
    /// Unknown actor types, invalid condition keys and items the actor
    /// kind may not own are errors. A missing actor type reads as
    /// `character`.
    pub fn into_character(self) -> Result<Character, StowageError> {
        let kind = if self.actor_type.is_empty() {
            ActorKind::default()
        } else {
            self.actor_type.parse()?
        };

        let mut character =
            Character::new(self.id, self.name, kind).with_strength(self.data.attributes.strength.get());

        for (stat, Lenient(track)) in self.data.general {
            if POINT_STATS.contains(&stat.as_str()) || CONDITION_TRACKERS.contains(&stat.as_str()) {
                character
                    .stats
                    .insert(stat, StatTrack::new(track.value.get(), track.max.get()));
            }
        }

        character.items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.into_item(index))
            .collect();

        for key in self.conditions {
            character.conditions.add_condition(&ConditionKey::new(key))?;
        }

        character.validate()?;
        Ok(character)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> Item {
        serde_json::from_value::<ItemRecord>(value).unwrap().into_item(0)
    }

    #[test]
    fn wrapped_and_plain_attributes() {
        let wrapped = item(json!({
            "_id": "w1", "name": "Pistol", "type": "weapon",
            "data": { "attributes": {
                "weight": { "value": 1 }, "quantity": { "value": 1 },
                "rounds": { "value": 12 }, "class": { "value": "Pistol" } } }
        }));
        let plain = item(json!({
            "_id": "w1", "name": "Pistol", "type": "weapon",
            "system": { "attributes": {
                "weight": 1, "quantity": 1, "rounds": 12, "class": "Pistol" } }
        }));
        assert_eq!(wrapped, plain);
        assert_eq!(wrapped.kind.quantity(), Some(1));
    }

    #[test]
    fn malformed_attributes_default_to_zero() {
        let gear = item(json!({
            "_id": "g1", "name": "Junk", "type": "item",
            "data": { "attributes": {
                "weight": { "value": null }, "quantity": { "value": "lots" } } }
        }));
        match gear.kind {
            ItemKind::Gear(stats) => {
                assert_eq!(stats.weight, Weight::ZERO);
                assert_eq!(stats.quantity, 0);
            }
            other => panic!("expected gear, got {:?}", other),
        }
    }

    #[test]
    fn counts_accept_numeric_strings_and_whole_floats() {
        let flare = |quantity: serde_json::Value| {
            let gear = item(json!({
                "_id": "g1", "name": "Flare", "type": "item",
                "data": { "attributes": {
                    "weight": { "value": 0.5 }, "quantity": { "value": quantity } } }
            }));
            crate::aggregate(std::slice::from_ref(&gear)).total
        };
        assert_eq!(flare(json!(3)), Weight::from_hundredths(150));
        assert_eq!(flare(json!("3")), Weight::from_hundredths(150));
        assert_eq!(flare(json!(3.0)), Weight::from_hundredths(150));
        assert_eq!(flare(json!(" 3 ")), Weight::from_hundredths(150));
    }

    #[test]
    fn string_rounds_count_towards_ammo() {
        let pistol = item(json!({
            "_id": "w1", "name": "Service Pistol", "type": "weapon",
            "data": { "attributes": {
                "weight": { "value": "1" }, "quantity": { "value": "1" },
                "rounds": { "value": "12" }, "class": { "value": "Pistol" } } }
        }));
        assert_eq!(crate::aggregate(std::slice::from_ref(&pistol)).total, Weight::from_units(4));
    }

    #[test]
    fn malformed_counts_read_as_zero() {
        for bad in [json!(2.5), json!("2.5"), json!("lots"), json!(-4), json!(true), json!([])] {
            let gear = item(json!({
                "type": "item", "data": { "attributes": { "weight": 1, "quantity": bad } }
            }));
            assert_eq!(gear.kind.quantity(), Some(0), "quantity {:?}", bad);
        }
    }

    #[test]
    fn actor_counts_accept_strings() {
        let record: CharacterRecord = serde_json::from_value(json!({
            "_id": "vasquez", "type": "character",
            "data": {
                "attributes": { "str": { "value": "5" } },
                "general": { "sp": { "value": "2", "max": 10.0 } }
            }
        }))
        .unwrap();
        let character = record.into_character().unwrap();
        assert_eq!(character.strength, 5);
        assert_eq!(character.stats["sp"], StatTrack::new(2, 10));
    }

    #[test]
    fn negative_weight_reads_as_zero() {
        let armor = item(json!({
            "_id": "a1", "name": "Vest", "type": "armor",
            "data": { "attributes": { "weight": { "value": -2 } } }
        }));
        assert_eq!(armor.kind, ItemKind::Armor(ArmorStats { weight: Weight::ZERO }));
    }

    #[test]
    fn header_active_markers() {
        let state = |active: serde_json::Value| {
            item(json!({ "type": "item", "data": { "header": { "active": active } } })).active
        };
        assert_eq!(state(json!(true)), ActiveState::Active);
        assert_eq!(state(json!(false)), ActiveState::Inactive);
        assert_eq!(state(json!("locked")), ActiveState::Locked);
        assert_eq!(state(json!("fLocker")), ActiveState::Locked);
        assert_eq!(state(json!("stowed")), ActiveState::Inactive);
        assert_eq!(state(json!(7)), ActiveState::Inactive);
    }

    #[test]
    fn unknown_type_keeps_its_tag() {
        let odd = item(json!({ "_id": "p1", "name": "LV-426", "type": "planet-system" }));
        assert_eq!(odd.type_tag(), "planet-system");
    }

    #[test]
    fn missing_item_id_uses_index() {
        let record: ItemRecord = serde_json::from_value(json!({ "type": "talent" })).unwrap();
        assert_eq!(record.into_item(3).id.as_str(), "item-3");
    }

    #[test]
    fn character_record_converts() {
        let record: CharacterRecord = serde_json::from_value(json!({
            "_id": "ripley", "name": "Ripley", "type": "character",
            "data": {
                "attributes": { "str": { "value": 4 } },
                "general": {
                    "radiation": { "value": 1, "max": 10 },
                    "panic": { "value": 0, "max": 1 },
                    "armor": { "value": 2 }
                }
            },
            "items": [
                { "_id": "t1", "name": "Pack Mule", "type": "talent", "sort": 2 },
                { "_id": "g1", "name": "Flare", "type": "item", "sort": 1,
                  "data": { "attributes": { "weight": 0.5, "quantity": 3 } } }
            ],
            "conditions": ["overwatch"]
        }))
        .unwrap();

        let character = record.into_character().unwrap();
        assert_eq!(character.strength, 4);
        assert_eq!(character.items.len(), 2);
        assert!(character.stats.contains_key("radiation"));
        assert!(!character.stats.contains_key("armor"));
        assert!(character.conditions.contains(&ConditionKey::new("overwatch")));
    }

    #[test]
    fn unknown_actor_type_is_rejected() {
        let record = CharacterRecord {
            id: "x".to_string(),
            actor_type: "spaceship".to_string(),
            ..CharacterRecord::default()
        };
        assert!(matches!(
            record.into_character(),
            Err(StowageError::InvalidCharacter(_))
        ));
    }

    #[test]
    fn disallowed_item_is_rejected() {
        let record: CharacterRecord = serde_json::from_value(json!({
            "_id": "apc", "type": "vehicles",
            "items": [{ "_id": "a1", "type": "armor" }]
        }))
        .unwrap();
        assert!(matches!(
            record.into_character(),
            Err(StowageError::ItemNotAllowed { .. })
        ));
    }
}
