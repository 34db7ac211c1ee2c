//! # Redemption Limits
//!
//! How much cashback may be spent on an order and how much may be held.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Spending (redeemable)                                                  │
//! │    order 300.00, usage limit 50%, balance 400.00                        │
//! │    → min(400.00, 300.00 × 50%) = 150.00                                 │
//! │                                                                         │
//! │  Earning (creditable)                                                   │
//! │    balance 9 990.00, max balance 10 000.00, earned 25.00                │
//! │    → min(25.00, 10 000.00 − 9 990.00) = 10.00                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both are pure calculations; keeping the balance is the caller's job.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Percent;
use crate::{DEFAULT_MAX_BALANCE_CENTS, DEFAULT_USAGE_LIMIT_BPS};

/// Caps applied around the engine's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RedemptionLimits {
    /// Share of an order total that may be paid with cashback.
    pub usage_limit: Percent,
    /// Highest balance a customer may hold.
    pub max_balance: Money,
}

impl Default for RedemptionLimits {
    fn default() -> Self {
        RedemptionLimits {
            usage_limit: Percent::from_bps(DEFAULT_USAGE_LIMIT_BPS),
            max_balance: Money::from_cents(DEFAULT_MAX_BALANCE_CENTS),
        }
    }
}

impl RedemptionLimits {
    /// Cashback that may be applied to an order of `order_total`.
    ///
    /// The cap is rounded to the cent like any other percentage of money.
    pub fn redeemable(&self, order_total: Money, balance: Money) -> Money {
        let cap = order_total.non_negative().percentage(self.usage_limit);
        balance.non_negative().min(cap)
    }

    /// Part of `earned` that can be credited without exceeding `max_balance`.
    pub fn creditable(&self, balance: Money, earned: Money) -> Money {
        let headroom = (self.max_balance - balance).non_negative();
        earned.non_negative().min(headroom)
    }
}
