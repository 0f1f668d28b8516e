//! # Property-Based Tests
//!
//! Invariants of the weighing, encumbrance, condition and indicator
//! rules, checked with proptest.

use proptest::collection::vec;
use proptest::prelude::*;
use stowage_core::{
    ActiveState, ConditionKey, ConditionSet, ConditionStore, Item, Mark, Rules, SyncOutcome,
    Weight, aggregate, classify, evaluate, indicator, sync,
};

// =============================================================================
// STRATEGIES
// =============================================================================

fn active_state() -> impl Strategy<Value = ActiveState> {
    prop_oneof![
        Just(ActiveState::Active),
        Just(ActiveState::Inactive),
        Just(ActiveState::Locked),
    ]
}

/// Any item the sheet can weigh, with bounded attributes.
fn any_item() -> impl Strategy<Value = Item> {
    let weight = (0u64..5_000).prop_map(Weight::from_hundredths);
    prop_oneof![
        (weight.clone(), 0u32..50, 0u32..200, 0u32..5, prop::bool::ANY, active_state()).prop_map(
            |(w, quantity, rounds, id, heavy, active)| {
                let class = if heavy { "RPG" } else { "Rifle" };
                Item::weapon(format!("w{}", id), "Weapon", class, w, rounds, quantity)
                    .with_active(active)
            }
        ),
        (weight.clone(), active_state())
            .prop_map(|(w, active)| Item::armor("a", "Armor", w).with_active(active)),
        (weight, 0u32..50, active_state())
            .prop_map(|(w, q, active)| Item::gear("g", "Gear", w, q).with_active(active)),
        Just(Item::talent("t", "Talent")),
    ]
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The total is the sum of the per-item weights.
    #[test]
    fn total_is_sum_of_items(items in vec(any_item(), 0..40)) {
        let report = aggregate(&items);
        let sum: u64 = report.per_item.iter().map(|e| e.weight.hundredths()).sum();
        prop_assert_eq!(report.total.hundredths(), sum);
        prop_assert_eq!(report.per_item.len(), items.len());
    }

    /// Reordering items never changes the total.
    #[test]
    fn total_is_order_independent(items in vec(any_item(), 0..40)) {
        let mut reversed = items.clone();
        reversed.reverse();
        let mut by_name = items.clone();
        by_name.sort_by(|a, b| a.type_tag().cmp(b.type_tag()));

        let total = aggregate(&items).total;
        prop_assert_eq!(aggregate(&reversed).total, total);
        prop_assert_eq!(aggregate(&by_name).total, total);
    }

    /// Locked items contribute nothing.
    #[test]
    fn locked_items_weigh_zero(items in vec(any_item(), 0..40)) {
        let locked: Vec<Item> = items
            .into_iter()
            .map(|item| item.with_active(ActiveState::Locked))
            .collect();
        prop_assert_eq!(aggregate(&locked).total, Weight::ZERO);
    }

    /// Classification keeps every non-specialty item exactly once.
    #[test]
    fn classification_partitions_items(items in vec(any_item(), 0..40)) {
        let buckets = classify(&items);
        let placed = buckets.talents.len() + buckets.inventory.len();
        prop_assert_eq!(placed, items.len());
    }

    /// The percentage stays within [0, 99] and zero load is never encumbered.
    #[test]
    fn percentage_is_bounded(carried in 0u64..10_000_000, strength in 0u32..20) {
        let enc = evaluate(Weight::from_hundredths(carried), strength, &Vec::<Item>::new());
        prop_assert!(enc.percent_hundredths <= 9_900);
        prop_assert!(enc.percent() <= 99);
        if carried == 0 {
            prop_assert!(!enc.encumbered);
        }
    }

    /// Encumbrance is monotonic in carried weight.
    #[test]
    fn encumbrance_is_monotonic(a in 0u64..100_000, b in 0u64..100_000, strength in 1u32..10) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let talents = Vec::<Item>::new();
        let light = evaluate(Weight::from_hundredths(low), strength, &talents);
        let heavy = evaluate(Weight::from_hundredths(high), strength, &talents);
        prop_assert!(light.percent_hundredths <= heavy.percent_hundredths);
        prop_assert!(!light.encumbered || heavy.encumbered);
    }

    /// Pack mule never makes a load encumbered that was not before.
    #[test]
    fn pack_mule_only_relaxes(carried in 0u64..100_000, strength in 0u32..10) {
        let rules = Rules::default();
        let plain = rules.evaluate(Weight::from_hundredths(carried), strength, &Vec::<Item>::new());
        let mule = rules.evaluate(
            Weight::from_hundredths(carried),
            strength,
            &[Item::talent("t", "Pack Mule")],
        );
        prop_assert!(!mule.encumbered || plain.encumbered);
    }

    /// Synchronizing the same result twice changes nothing the second time.
    #[test]
    fn sync_is_idempotent(carried in 0u64..10_000, strength in 0u32..10, preset in prop::bool::ANY) {
        let enc = evaluate(Weight::from_hundredths(carried), strength, &Vec::<Item>::new());
        let mut store = ConditionSet::new();
        if preset {
            store.add_condition(&ConditionKey::encumbered()).expect("add");
        }

        sync(&mut store, &enc).expect("first sync");
        prop_assert_eq!(sync(&mut store, &enc).expect("second sync"), SyncOutcome::Unchanged);
        prop_assert_eq!(store.contains(&ConditionKey::encumbered()), enc.encumbered);
    }

    /// Indicators have `max` marks with `min(level, max)` filled, filled first.
    #[test]
    fn indicator_shape(level in 0u32..50, max in 0u32..50) {
        let marks = indicator(level, max);
        prop_assert_eq!(marks.len(), max as usize);

        let filled = marks.iter().filter(|m| m.is_filled()).count();
        prop_assert_eq!(filled, level.min(max) as usize);
        prop_assert!(marks.windows(2).all(|w| !(w[0] == Mark::Empty && w[1] == Mark::Filled)));
    }
}
