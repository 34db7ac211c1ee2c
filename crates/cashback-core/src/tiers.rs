//! # Tier Resolution
//!
//! Maps a subtotal to a flat cashback percentage.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tiers = [500 → 3%, 1000 → 5%, 1500 → 7%]      subtotal = 1200          │
//! │                                                                         │
//! │  check 1500 → 7%   1200 >= 1500?  no                                    │
//! │  check 1000 → 5%   1200 >= 1000?  yes, 5% > 0  → return 5%              │
//! │  check  500 → 3%   (not reached)                                        │
//! │                                                                         │
//! │  Nothing qualified → 0%                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A tier with 0% is skipped even when its threshold is met, so an
//! administrator can switch a tier off without deleting it.

use crate::money::Money;
use crate::types::{Percent, TierConfig};

/// Returns the percentage of the last configured tier that `subtotal`
/// reaches and that is enabled, or zero.
///
/// Tiers are checked from the last entry to the first; the list is neither
/// sorted nor validated here. A negative subtotal is below every tier.
///
/// ## Example
/// ```rust
/// use cashback_core::money::Money;
/// use cashback_core::tiers::resolve_percentage;
/// use cashback_core::types::{Percent, TierConfig};
///
/// let tiers = TierConfig::default(); // 500 → 3%, 1000 → 5%, 1500 → 7%
/// let pct = resolve_percentage(Money::from_major_minor(1200, 0), &tiers);
/// assert_eq!(pct, Percent::from_whole(5));
/// ```
pub fn resolve_percentage(subtotal: Money, tiers: &TierConfig) -> Percent {
    if subtotal.is_negative() {
        return Percent::zero();
    }

    tiers
        .tiers()
        .iter()
        .rev()
        .find(|tier| subtotal >= tier.threshold && tier.is_enabled())
        .map(|tier| tier.percentage)
        .unwrap_or_else(Percent::zero)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tier;

    fn money(major: i64) -> Money {
        Money::from_major_minor(major, 0)
    }

    fn tiers(ladder: &[(i64, u32)]) -> TierConfig {
        TierConfig::new(
            ladder.iter()
                .map(|&(threshold, pct)| Tier::new(money(threshold), Percent::from_whole(pct)))
                .collect(),
        )
    }

    #[test]
    fn test_below_first_threshold_is_zero() {
        let config = TierConfig::default();
        assert_eq!(resolve_percentage(money(499), &config), Percent::zero());
        assert_eq!(resolve_percentage(Money::zero(), &config), Percent::zero());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = TierConfig::default();
        assert_eq!(resolve_percentage(money(500), &config), Percent::from_whole(3));
        assert_eq!(resolve_percentage(money(1000), &config), Percent::from_whole(5));
        assert_eq!(resolve_percentage(money(1500), &config), Percent::from_whole(7));
        assert_eq!(
            resolve_percentage(Money::from_cents(149_999), &config),
            Percent::from_whole(5)
        );
    }

    #[test]
    fn test_highest_tier_wins() {
        let config = TierConfig::default();
        assert_eq!(resolve_percentage(money(1_000_000), &config), Percent::from_whole(7));
    }

    #[test]
    fn test_disabled_tier_falls_through_to_lower_tier() {
        let config = tiers(&[(500, 3), (1000, 5), (1500, 0)]);
        assert_eq!(resolve_percentage(money(2000), &config), Percent::from_whole(5));
    }

    #[test]
    fn test_all_disabled_is_zero() {
        let config = tiers(&[(500, 0), (1000, 0), (1500, 0)]);
        assert_eq!(resolve_percentage(money(2000), &config), Percent::zero());
    }

    #[test]
    fn test_empty_config_is_zero() {
        let config = TierConfig::new(Vec::new());
        assert_eq!(resolve_percentage(money(2000), &config), Percent::zero());
    }

    #[test]
    fn test_negative_subtotal_is_below_all_tiers() {
        let config = tiers(&[(0, 1), (500, 3)]);
        assert_eq!(resolve_percentage(Money::from_cents(-100), &config), Percent::zero());
        assert_eq!(resolve_percentage(Money::zero(), &config), Percent::from_whole(1));
    }

    /// Misordered tiers resolve by position: the last entry is checked first.
    #[test]
    fn test_unsorted_config_resolves_by_position() {
        let config = tiers(&[(1500, 7), (500, 3)]);
        assert_eq!(resolve_percentage(money(2000), &config), Percent::from_whole(3));
        assert_eq!(resolve_percentage(money(400), &config), Percent::zero());
    }

    #[test]
    fn test_more_than_three_tiers() {
        let config = tiers(&[(100, 1), (500, 3), (1000, 5), (1500, 7), (5000, 10)]);
        assert_eq!(resolve_percentage(money(150), &config), Percent::from_whole(1));
        assert_eq!(resolve_percentage(money(6000), &config), Percent::from_whole(10));
    }

    #[test]
    fn test_tier_config_resolve_delegates() {
        let config = TierConfig::default();
        assert_eq!(config.resolve(money(1200)), resolve_percentage(money(1200), &config));
    }
}
