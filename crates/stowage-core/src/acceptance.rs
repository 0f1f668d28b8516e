//! # Item Acceptance
//!
//! Which item types an actor kind may own. Items of other types are
//! refused when they are dropped onto or imported with an actor.

use crate::{ActorKind, StowageError};

const PERSONAL_ITEMS: &[&str] = &[
    "item",
    "weapon",
    "armor",
    "talent",
    "agenda",
    "specialty",
    "critical-injury",
];
const VEHICLE_ITEMS: &[&str] = &["item", "weapon"];
const TERRITORY_ITEMS: &[&str] = &["planet-system"];

/// Item types the actor kind may own.
#[must_use]
pub fn allowed_item_types(kind: ActorKind) -> &'static [&'static str] {
    match kind {
        ActorKind::Character | ActorKind::Synthetic => PERSONAL_ITEMS,
        ActorKind::Vehicles => VEHICLE_ITEMS,
        ActorKind::Territory => TERRITORY_ITEMS,
        ActorKind::Creature => &[],
    }
}

/// Check that an actor kind may own an item of `item_type`.
pub fn check_item(kind: ActorKind, item_type: &str) -> Result<(), StowageError> {
    if allowed_item_types(kind).contains(&item_type) {
        Ok(())
    } else {
        Err(StowageError::ItemNotAllowed {
            actor: kind,
            item_type: item_type.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personal_actors_take_every_known_type() {
        for kind in [ActorKind::Character, ActorKind::Synthetic] {
            for tag in PERSONAL_ITEMS {
                assert!(check_item(kind, tag).is_ok());
            }
        }
    }

    #[test]
    fn vehicles_only_carry_gear_and_weapons() {
        assert!(check_item(ActorKind::Vehicles, "weapon").is_ok());
        assert!(check_item(ActorKind::Vehicles, "armor").is_err());
        assert!(check_item(ActorKind::Vehicles, "talent").is_err());
    }

    #[test]
    fn creatures_own_nothing() {
        assert!(check_item(ActorKind::Creature, "item").is_err());
    }

    #[test]
    fn territories_hold_planet_systems() {
        assert!(check_item(ActorKind::Territory, "planet-system").is_ok());
        assert!(check_item(ActorKind::Territory, "weapon").is_err());
    }

    #[test]
    fn unknown_tags_are_refused_on_characters() {
        let err = check_item(ActorKind::Character, "planet-system");
        assert!(matches!(err, Err(StowageError::ItemNotAllowed { .. })));
    }
}
