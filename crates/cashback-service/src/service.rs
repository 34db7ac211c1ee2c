//! # Quote Service
//!
//! Glue between the configuration, the catalog and the pure engine.
//!
//! ## Quote Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote(config, subtotal, lines)                                         │
//! │       │                                                                 │
//! │       ├── brand rules off / no lines ──► FlatSubtotal(subtotal)         │
//! │       │                                                                 │
//! │       └── brand rules on                                                │
//! │             for each line:                                              │
//! │               product exception?  ──► skip the catalog                  │
//! │               else brand_ids(product, taxonomy)                         │
//! │                      Err ──► warn, price as brandless                   │
//! │             LineItems(..) ──► engine                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! In brand mode the supplied subtotal is ignored: the engine takes the tier
//! from the sum of the lines.

use std::collections::BTreeSet;

use cashback_core::engine::{self, CalculationMode, CashbackBreakdown};
use cashback_core::{LineItem, Money, OrderInput};
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{BrandLookup, CartLine};
use crate::config::CashbackConfig;

/// Result of pricing a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CashbackQuote {
    pub cashback: Money,
    pub mode: CalculationMode,
    /// Lines whose brands could not be looked up and were priced without.
    pub lookup_failures: usize,
}

/// Prices purchases against a brand catalog.
#[derive(Debug, Clone)]
pub struct CashbackService<L> {
    lookup: L,
}

impl<L: BrandLookup> CashbackService<L> {
    pub fn new(lookup: L) -> Self {
        CashbackService { lookup }
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Cashback earned on a purchase.
    pub fn quote(&self, config: &CashbackConfig, subtotal: Money, lines: &[CartLine]) -> CashbackQuote {
        let (order, lookup_failures) = self.build_order(config, subtotal, lines);
        let mode = engine::select_mode(&order, &config.settings);
        let cashback = engine::calculate(&order, &config.settings, &config.tiers);

        debug!(
            ?mode,
            subtotal = %order.subtotal(),
            cashback = %cashback,
            lookup_failures,
            "Cashback quoted"
        );

        CashbackQuote {
            cashback,
            mode,
            lookup_failures,
        }
    }

    /// Like [`quote`](Self::quote), with the per-line detail.
    pub fn explain(&self, config: &CashbackConfig, subtotal: Money, lines: &[CartLine]) -> CashbackBreakdown {
        let (order, _) = self.build_order(config, subtotal, lines);
        engine::explain(&order, &config.settings, &config.tiers)
    }

    /// Cashback the customer may spend on an order of `order_total`.
    pub fn redeemable(&self, config: &CashbackConfig, order_total: Money, balance: Money) -> Money {
        config.limits.redeemable(order_total, balance)
    }

    /// Part of `earned` that fits under the configured balance ceiling.
    pub fn creditable(&self, config: &CashbackConfig, balance: Money, earned: Money) -> Money {
        let credited = config.limits.creditable(balance, earned);
        if credited < earned {
            debug!(%earned, %credited, %balance, "Cashback credit capped by max balance");
        }
        credited
    }

    fn build_order(&self, config: &CashbackConfig, subtotal: Money, lines: &[CartLine]) -> (OrderInput, usize) {
        if !config.settings.use_brand_rules || lines.is_empty() {
            return (OrderInput::FlatSubtotal(subtotal), 0);
        }

        let mut failures = 0;
        let items = lines
            .iter()
            .map(|line| {
                let item = LineItem::new(line.product_id.clone(), line.line_total);
                if config.settings.product_exception_for(&line.product_id).is_some() {
                    return item;
                }

                match self.lookup.brand_ids(&line.product_id, &config.brand_taxonomy) {
                    Ok(brands) => item.with_brands(brands),
                    Err(err) => {
                        warn!(
                            product_id = %line.product_id,
                            taxonomy = %config.brand_taxonomy,
                            error = %err,
                            "Brand lookup failed, pricing line without brands"
                        );
                        failures += 1;
                        item.with_brands(BTreeSet::<String>::new())
                    }
                }
            })
            .collect();

        (OrderInput::LineItems(items), failures)
    }
}
