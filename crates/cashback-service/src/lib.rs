//! # cashback-service: Configuration and Quoting
//!
//! Everything around the pure engine: loading settings, resolving brand
//! membership through a catalog, and turning a cart into a cashback quote.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashback Service Layer                           │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ CashbackConfig │  │  BrandLookup   │  │   CashbackService      │    │
//! │  │  (config.rs)   │  │  (catalog.rs)  │  │   (service.rs)         │    │
//! │  │                │  │                │  │                        │    │
//! │  │ defaults       │  │ product →      │  │ CartLine → LineItem    │    │
//! │  │ TOML / JSON    │──│ brand ids      │──│ quote / explain        │    │
//! │  │ env overrides  │  │ per taxonomy   │  │ redeemable / credit    │    │
//! │  └────────────────┘  └────────────────┘  └───────────┬────────────┘    │
//! │                                                      │                  │
//! │                                          ┌───────────▼────────────┐    │
//! │                                          │     cashback-core      │    │
//! │                                          └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`config`] - Settings loading and validation
//! - [`catalog`] - Brand lookup trait and an in-memory catalog
//! - [`service`] - Quotes and redemption caps
//! - [`error`] - Service error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod service;

pub use catalog::{BrandLookup, CartLine, InMemoryCatalog};
pub use config::{CashbackConfig, DEFAULT_BRAND_TAXONOMY};
pub use error::{CatalogError, ServiceError, ServiceResult};
pub use service::{CashbackQuote, CashbackService};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cashback_service=trace` - Trace this crate only
/// - Default: `info`, with `debug` for the cashback crates
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cashback_service=debug,cashback_core=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
