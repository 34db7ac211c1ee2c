//! # cashback-core: Pure Cashback Calculation
//!
//! Computes the cashback reward for a purchase from tiered percentage rules
//! and per-product / per-brand overrides. Every function is pure: no I/O,
//! no shared state, no logging.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashback Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              cashback-service (settings, catalog)               │   │
//! │  │   load config ──► resolve brands per line ──► build LineItems   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain data                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cashback-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   tiers   │  │  engine   │  │  limits   │  │ validation│  │   │
//! │  │   │ subtotal  │  │ legacy /  │  │ redeem /  │  │ settings  │  │   │
//! │  │   │  → pct    │  │ per-line  │  │  credit   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Percent, tiers, rules, line items, order input
//! - [`money`] - Integer-cent `Money` and the unrounded accumulator
//! - [`tiers`] - Subtotal → percentage
//! - [`engine`] - Legacy and brand-aware cashback calculation
//! - [`limits`] - Redemption and balance caps
//! - [`validation`] - Settings checks
//! - [`error`] - Validation errors
//!
//! ## Example Usage
//!
//! ```rust
//! use cashback_core::{calculate, CashbackSettings, LineItem, Money, OrderInput, Percent, Rule, TierConfig};
//!
//! let settings = CashbackSettings::new(true, vec![
//!     Rule::product(["42"], Percent::from_whole(10)),
//!     Rule::brand(["acme"], Percent::from_whole(2)),
//! ]);
//! let order = OrderInput::LineItems(vec![
//!     LineItem::new("42", Money::from_major_minor(100, 0)).with_brands(["acme"]),
//!     LineItem::new("7", Money::from_major_minor(50, 0)).with_brands(["acme"]),
//! ]);
//!
//! // 100.00 × 10% + 50.00 × 2% = 11.00
//! let cashback = calculate(&order, &settings, &TierConfig::default());
//! assert_eq!(cashback, Money::from_major_minor(11, 0));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod limits;
pub mod money;
pub mod tiers;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{calculate, explain, select_mode, CalculationMode, CashbackBreakdown, LineCashback, RateSource};
pub use error::{ValidationError, ValidationResult};
pub use limits::RedemptionLimits;
pub use money::{Money, UnroundedMoney};
pub use tiers::resolve_percentage;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default share of an order that may be paid with cashback (50%).
pub const DEFAULT_USAGE_LIMIT_BPS: u32 = 5_000;

/// Default ceiling on a customer's cashback balance (10 000.00).
pub const DEFAULT_MAX_BALANCE_CENTS: i64 = 1_000_000;
