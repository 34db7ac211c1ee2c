//! # Domain Types
//!
//! Value objects consumed by the tier resolver and the cashback engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   TierConfig    │   │ CashbackSettings│   │   OrderInput    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Vec<Tier>      │   │  use_brand_rules│   │  FlatSubtotal   │       │
//! │  │   threshold     │   │  Vec<Rule>      │   │  LineItems      │       │
//! │  │   percentage    │   │   kind/ids/pct  │   │   product_id    │       │
//! │  └─────────────────┘   └─────────────────┘   │   brand_ids     │       │
//! │                                              │   line_total    │       │
//! │  ┌─────────────────┐                         └─────────────────┘       │
//! │  │    Percent      │                                                    │
//! │  │  bps (u32)      │   All of these are plain data: owned by the       │
//! │  │  750 = 7.50%    │   caller, read-only to the engine.                │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{parse_hundredths, Money};
use crate::tiers::resolve_percentage;

// =============================================================================
// Percent
// =============================================================================

/// A percentage in basis points (1 bps = 0.01%).
///
/// ## Why Basis Points?
/// Percentages are entered with two decimals (`7.5`, `3.25`), so basis
/// points hold every configurable value exactly. `0` means "disabled / not
/// eligible" wherever a percentage gates a tier.
///
/// ## Wire Form
/// Serializes as the bare integer number of basis points, also in the
/// TypeScript bindings: `1000` is 10%, not 1000%. The config file is the
/// exception; it takes decimal percent (`10`) and converts on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// One hundred percent.
    pub const HUNDRED: Percent = Percent(10_000);

    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a whole number of percent (`5` = 5%).
    #[inline]
    pub const fn from_whole(pct: u32) -> Self {
        Percent(pct.saturating_mul(100))
    }

    /// Parses `"7"`, `"7.5"`, `" 3.25 "`.
    ///
    /// Unparsable text and negative values become zero.
    ///
    /// ```rust
    /// use cashback_core::types::Percent;
    ///
    /// assert_eq!(Percent::parse_lenient("7.5").bps(), 750);
    /// assert_eq!(Percent::parse_lenient("n/a").bps(), 0);
    /// assert_eq!(Percent::parse_lenient("-3").bps(), 0);
    /// ```
    pub fn parse_lenient(text: &str) -> Self {
        parse_hundredths(text)
            .and_then(|bps| u32::try_from(bps).ok())
            .map(Percent)
            .unwrap_or_else(Percent::zero)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Tiers
// =============================================================================

/// A (threshold, percentage) pair: the percentage is unlocked once a
/// subtotal reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tier {
    pub threshold: Money,
    pub percentage: Percent,
}

impl Tier {
    pub const fn new(threshold: Money, percentage: Percent) -> Self {
        Tier {
            threshold,
            percentage,
        }
    }

    /// A tier with a zero percentage is kept in the config but never applies.
    #[inline]
    pub const fn is_enabled(&self) -> bool {
        !self.percentage.is_zero()
    }
}

/// The configured tier ladder.
///
/// Tiers are listed lowest first. The resolver checks them from the last
/// entry to the first and does not sort, so a config whose thresholds are
/// not ascending resolves by position, not by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierConfig {
    pub tiers: Vec<Tier>,
}

impl TierConfig {
    pub fn new(tiers: Vec<Tier>) -> Self {
        TierConfig { tiers }
    }

    #[inline]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Tiers that can actually apply (percentage > 0), in configured order.
    ///
    /// This is the list shown to customers ("spend 500, get 3%").
    pub fn enabled_tiers(&self) -> Vec<Tier> {
        self.tiers.iter().copied().filter(Tier::is_enabled).collect()
    }

    /// Resolves the flat percentage for `subtotal`.
    #[inline]
    pub fn resolve(&self, subtotal: Money) -> Percent {
        resolve_percentage(subtotal, self)
    }
}

/// 500 → 3%, 1000 → 5%, 1500 → 7%.
impl Default for TierConfig {
    fn default() -> Self {
        TierConfig::new(vec![
            Tier::new(Money::from_major_minor(500, 0), Percent::from_whole(3)),
            Tier::new(Money::from_major_minor(1000, 0), Percent::from_whole(5)),
            Tier::new(Money::from_major_minor(1500, 0), Percent::from_whole(7)),
        ])
    }
}

// =============================================================================
// Rules
// =============================================================================

/// What a rule's `ids` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RuleKind {
    /// `ids` are product identifiers. Checked before any brand rule.
    #[serde(rename = "product", alias = "product_exception")]
    ProductException,
    /// `ids` are brand identifiers.
    #[serde(rename = "brand", alias = "brand_match")]
    BrandMatch,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::ProductException => write!(f, "product"),
            RuleKind::BrandMatch => write!(f, "brand"),
        }
    }
}

/// A per-product or per-brand percentage override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rule {
    #[serde(rename = "type")]
    pub kind: RuleKind,
    #[serde(default)]
    pub ids: BTreeSet<String>,
    pub percentage: Percent,
}

impl Rule {
    pub fn new<I, S>(kind: RuleKind, ids: I, percentage: Percent) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule {
            kind,
            ids: ids.into_iter().map(Into::into).collect(),
            percentage,
        }
    }

    /// Shorthand for a product exception rule.
    pub fn product<I, S>(ids: I, percentage: Percent) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::new(RuleKind::ProductException, ids, percentage)
    }

    /// Shorthand for a brand rule.
    pub fn brand<I, S>(ids: I, percentage: Percent) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Rule::new(RuleKind::BrandMatch, ids, percentage)
    }

    /// True for a product exception rule listing `product_id`.
    pub fn matches_product(&self, product_id: &str) -> bool {
        self.kind == RuleKind::ProductException && self.ids.contains(product_id)
    }

    /// True for a brand rule sharing at least one id with `brand_ids`.
    pub fn matches_any_brand(&self, brand_ids: &BTreeSet<String>) -> bool {
        self.kind == RuleKind::BrandMatch && !self.ids.is_disjoint(brand_ids)
    }
}

/// Engine settings: the brand-mode switch and the ordered rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashbackSettings {
    #[serde(default)]
    pub use_brand_rules: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl CashbackSettings {
    pub fn new(use_brand_rules: bool, rules: Vec<Rule>) -> Self {
        CashbackSettings {
            use_brand_rules,
            rules,
        }
    }

    /// First product exception rule (in list order) naming `product_id`.
    pub fn product_exception_for(&self, product_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matches_product(product_id))
    }

    /// First brand rule (in list order) sharing a brand with `brand_ids`.
    pub fn brand_rule_for(&self, brand_ids: &BTreeSet<String>) -> Option<&Rule> {
        if brand_ids.is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches_any_brand(brand_ids))
    }
}

// =============================================================================
// Order Input
// =============================================================================

/// One purchased line with its brand membership already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    pub product_id: String,
    #[serde(default)]
    pub brand_ids: BTreeSet<String>,
    pub line_total: Money,
}

impl LineItem {
    /// A line with no known brands.
    pub fn new(product_id: impl Into<String>, line_total: Money) -> Self {
        LineItem {
            product_id: product_id.into(),
            brand_ids: BTreeSet::new(),
            line_total,
        }
    }

    /// Replaces the brand set.
    pub fn with_brands<I, S>(mut self, brand_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brand_ids = brand_ids.into_iter().map(Into::into).collect();
        self
    }
}

/// What the caller knows about the purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderInput {
    /// Only the subtotal is known.
    FlatSubtotal(Money),
    /// Itemized order or cart.
    LineItems(Vec<LineItem>),
}

impl OrderInput {
    /// The flat subtotal, or the sum of all line totals.
    pub fn subtotal(&self) -> Money {
        match self {
            OrderInput::FlatSubtotal(subtotal) => *subtotal,
            OrderInput::LineItems(items) => items.iter().map(|item| item.line_total).sum(),
        }
    }

    /// Line items, empty for a flat subtotal.
    pub fn line_items(&self) -> &[LineItem] {
        match self {
            OrderInput::FlatSubtotal(_) => &[],
            OrderInput::LineItems(items) => items,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
