//! # Cashback Engine
//!
//! Computes the cashback for one purchase.
//!
//! ## Mode Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  use_brand_rules && line items present?                                 │
//! │       │                                                                 │
//! │       ├── no ──► LEGACY                                                 │
//! │       │          pct = tier(subtotal)                                   │
//! │       │          cashback = round(subtotal × pct)                       │
//! │       │                                                                 │
//! │       └── yes ─► BRAND-AWARE                                            │
//! │                  fallback = tier(Σ line totals)   ← once per order      │
//! │                  for each line:                                         │
//! │                    1. first product rule listing the product            │
//! │                    2. else first brand rule sharing a brand             │
//! │                    3. else fallback                                     │
//! │                    acc += line_total × pct        ← unrounded           │
//! │                  cashback = round(acc)            ← once                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The fallback percentage comes from the whole order's subtotal, not from
//! each line's own total: a cheap item in a large order earns the large
//! order's tier.
//!
//! Every function here is pure. Calling it twice with the same inputs gives
//! the same result.

use serde::{Deserialize, Serialize};

use crate::money::{Money, UnroundedMoney};
use crate::tiers::resolve_percentage;
use crate::types::{CashbackSettings, LineItem, OrderInput, Percent, TierConfig};

/// Which calculation path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    /// Flat tier percentage of the subtotal.
    Legacy,
    /// Per-line rule matching with tier fallback.
    BrandAware,
}

/// Where a line's percentage came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    ProductException,
    BrandMatch,
    Tier,
}

/// Per-line detail of a brand-aware calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCashback {
    pub product_id: String,
    pub line_total: Money,
    pub percentage: Percent,
    pub source: RateSource,
    /// This line's share rounded on its own, for display. The order total is
    /// rounded from the unrounded sum, so these need not add up to it.
    pub cashback: Money,
}

/// Full result of a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashbackBreakdown {
    pub mode: CalculationMode,
    /// Subtotal used for the tier lookup.
    pub subtotal: Money,
    /// Tier percentage for `subtotal`. In legacy mode this is the rate applied.
    pub tier_percentage: Percent,
    /// Empty in legacy mode.
    pub lines: Vec<LineCashback>,
    pub total: Money,
}

/// Calculates the cashback for `order`.
///
/// Never fails: zero is the answer whenever nothing qualifies. The result is
/// never negative.
///
/// ## Example
/// ```rust
/// use cashback_core::engine::calculate;
/// use cashback_core::money::Money;
/// use cashback_core::types::{CashbackSettings, OrderInput, TierConfig};
///
/// let order = OrderInput::FlatSubtotal(Money::from_major_minor(1200, 0));
/// let cashback = calculate(&order, &CashbackSettings::default(), &TierConfig::default());
/// assert_eq!(cashback, Money::from_major_minor(60, 0));
/// ```
pub fn calculate(order: &OrderInput, settings: &CashbackSettings, tiers: &TierConfig) -> Money {
    let subtotal = order.subtotal();
    let tier_percentage = resolve_percentage(subtotal, tiers);

    if select_mode(order, settings) == CalculationMode::Legacy {
        return legacy_cashback(subtotal, tier_percentage);
    }

    let fallback = tier_percentage;
    let accrued: UnroundedMoney = order
        .line_items()
        .iter()
        .map(|item| {
            let (pct, _) = effective_percentage(item, settings, fallback);
            UnroundedMoney::of(item.line_total, pct)
        })
        .sum();

    accrued.round().non_negative()
}

/// Same computation as [`calculate`], reporting how the total was reached.
pub fn explain(
    order: &OrderInput,
    settings: &CashbackSettings,
    tiers: &TierConfig,
) -> CashbackBreakdown {
    let items = order.line_items();
    let subtotal = order.subtotal();
    let tier_percentage = resolve_percentage(subtotal, tiers);

    if select_mode(order, settings) == CalculationMode::Legacy {
        return CashbackBreakdown {
            mode: CalculationMode::Legacy,
            subtotal,
            tier_percentage,
            lines: Vec::new(),
            total: legacy_cashback(subtotal, tier_percentage),
        };
    }

    let mut accrued = UnroundedMoney::zero();
    let mut lines = Vec::with_capacity(items.len());

    for item in items {
        let (percentage, source) = effective_percentage(item, settings, tier_percentage);
        let share = UnroundedMoney::of(item.line_total, percentage);
        accrued += share;

        lines.push(LineCashback {
            product_id: item.product_id.clone(),
            line_total: item.line_total,
            percentage,
            source,
            cashback: share.round(),
        });
    }

    CashbackBreakdown {
        mode: CalculationMode::BrandAware,
        subtotal,
        tier_percentage,
        lines,
        total: accrued.round().non_negative(),
    }
}

/// Brand-aware only when brand rules are on and there are lines to price.
pub fn select_mode(order: &OrderInput, settings: &CashbackSettings) -> CalculationMode {
    if settings.use_brand_rules && !order.line_items().is_empty() {
        CalculationMode::BrandAware
    } else {
        CalculationMode::Legacy
    }
}

fn legacy_cashback(subtotal: Money, pct: Percent) -> Money {
    if pct.is_zero() {
        return Money::zero();
    }
    subtotal.percentage(pct).non_negative()
}

/// Product exceptions, then brand rules, then the order's tier percentage.
fn effective_percentage(
    item: &LineItem,
    settings: &CashbackSettings,
    fallback: Percent,
) -> (Percent, RateSource) {
    if let Some(rule) = settings.product_exception_for(&item.product_id) {
        return (rule.percentage, RateSource::ProductException);
    }

    if let Some(rule) = settings.brand_rule_for(&item.brand_ids) {
        return (rule.percentage, RateSource::BrandMatch);
    }

    (fallback, RateSource::Tier)
}

// =============================================================================
// Unit Tests
// =============================================================================
