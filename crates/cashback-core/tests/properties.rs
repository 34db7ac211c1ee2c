//! Property tests for tier resolution and cashback calculation.

use cashback_core::{
    calculate, explain, resolve_percentage, CashbackSettings, LineItem, Money, OrderInput,
    Percent, Rule, Tier, TierConfig,
};
use proptest::prelude::*;

/// Ascending thresholds with arbitrary (possibly zero) percentages.
fn ascending_tiers() -> impl Strategy<Value = TierConfig> {
    prop::collection::vec((0i64..500_000, 0u32..=3_000), 1..6).prop_map(|mut raw| {
        raw.sort_by_key(|&(threshold, _)| threshold);
        TierConfig::new(
            raw.into_iter()
                .map(|(threshold, bps)| Tier::new(Money::from_cents(threshold), Percent::from_bps(bps)))
                .collect(),
        )
    })
}

/// Ascending thresholds with strictly increasing, non-zero percentages.
fn well_formed_tiers() -> impl Strategy<Value = TierConfig> {
    prop::collection::vec((1i64..100_000, 1u32..500), 1..6).prop_map(|steps| {
        let mut threshold = 0;
        let mut bps = 0;
        TierConfig::new(
            steps
                .into_iter()
                .map(|(dt, dp)| {
                    threshold += dt;
                    bps += dp;
                    Tier::new(Money::from_cents(threshold), Percent::from_bps(bps))
                })
                .collect(),
        )
    })
}

fn line_items() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec((0u8..6, 0i64..200_000, prop::collection::btree_set(0u8..4, 0..3)), 0..8)
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(product, cents, brands)| {
                    LineItem::new(format!("p{}", product), Money::from_cents(cents))
                        .with_brands(brands.into_iter().map(|b| format!("b{}", b)))
                })
                .collect()
        })
}

fn settings() -> impl Strategy<Value = CashbackSettings> {
    prop::collection::vec((any::<bool>(), 0u8..6, 0u32..=3_000), 0..5).prop_map(|raw| {
        let rules = raw
            .into_iter()
            .map(|(is_product, id, bps)| {
                if is_product {
                    Rule::product([format!("p{}", id)], Percent::from_bps(bps))
                } else {
                    Rule::brand([format!("b{}", id % 4)], Percent::from_bps(bps))
                }
            })
            .collect();
        CashbackSettings::new(true, rules)
    })
}

proptest! {
    #[test]
    fn all_zero_percentages_resolve_to_zero(
        subtotal in -1_000_000i64..10_000_000,
        thresholds in prop::collection::vec(0i64..1_000_000, 0..6),
    ) {
        let tiers = TierConfig::new(
            thresholds.into_iter().map(|t| Tier::new(Money::from_cents(t), Percent::zero())).collect(),
        );
        prop_assert_eq!(resolve_percentage(Money::from_cents(subtotal), &tiers), Percent::zero());
    }

    #[test]
    fn highest_enabled_tier_wins_once_reached(tiers in ascending_tiers(), extra in 0i64..1_000_000) {
        if let Some(top) = tiers.tiers().iter().rev().find(|t| t.is_enabled()) {
            let subtotal = top.threshold + Money::from_cents(extra);
            prop_assert_eq!(resolve_percentage(subtotal, &tiers), top.percentage);
        }
    }

    #[test]
    fn resolution_is_monotonic(tiers in well_formed_tiers(), a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            resolve_percentage(Money::from_cents(low), &tiers)
                <= resolve_percentage(Money::from_cents(high), &tiers)
        );
    }

    #[test]
    fn calculate_is_idempotent(items in line_items(), settings in settings(), tiers in ascending_tiers()) {
        let order = OrderInput::LineItems(items);
        prop_assert_eq!(calculate(&order, &settings, &tiers), calculate(&order, &settings, &tiers));
    }

    #[test]
    fn calculate_equals_explained_total(items in line_items(), settings in settings(), tiers in ascending_tiers()) {
        let order = OrderInput::LineItems(items);
        prop_assert_eq!(calculate(&order, &settings, &tiers), explain(&order, &settings, &tiers).total);
    }

    /// The total is the rounded sum, so it differs from the sum of
    /// individually rounded lines by at most half a cent per line.
    #[test]
    fn total_is_rounded_once(items in line_items(), settings in settings(), tiers in ascending_tiers()) {
        let order = OrderInput::LineItems(items);
        let breakdown = explain(&order, &settings, &tiers);
        let per_line: Money = breakdown.lines.iter().map(|line| line.cashback).sum();
        let drift = (breakdown.total - per_line).cents().abs();
        prop_assert!(drift as usize <= breakdown.lines.len() / 2 + 1);
    }

    #[test]
    fn cashback_is_never_negative(items in line_items(), settings in settings(), tiers in ascending_tiers()) {
        let order = OrderInput::LineItems(items);
        prop_assert!(!calculate(&order, &settings, &tiers).is_negative());
    }

    #[test]
    fn legacy_mode_matches_flat_subtotal(items in line_items(), tiers in ascending_tiers()) {
        let settings = CashbackSettings::default();
        let subtotal = OrderInput::LineItems(items.clone()).subtotal();
        prop_assert_eq!(
            calculate(&OrderInput::LineItems(items), &settings, &tiers),
            calculate(&OrderInput::FlatSubtotal(subtotal), &settings, &tiers)
        );
    }
}
