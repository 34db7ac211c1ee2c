//! # Service Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌─────────────────────────┐        ┌─────────────────────────┐        │
//! │  │  ServiceError           │        │  CatalogError           │        │
//! │  │  (config load time)     │        │  (per brand lookup)     │        │
//! │  │                         │        │                         │        │
//! │  │  ConfigLoadFailed       │        │  TaxonomyNotFound       │        │
//! │  │  InvalidConfig          │        │  Unavailable            │        │
//! │  │  Validation             │        │                         │        │
//! │  └─────────────────────────┘        └─────────────────────────┘        │
//! │                                                                         │
//! │  CatalogError never leaves a quote: the line is priced as brandless.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashback_core::ValidationError;
use thiserror::Error;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised while loading and checking cashback configuration.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Config parsed but is unusable.
    #[error("Invalid cashback configuration: {0}")]
    InvalidConfig(String),

    /// Config values break a tier, rule or limit constraint.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Errors from a brand lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The configured brand taxonomy does not exist.
    #[error("Brand taxonomy not found: {0}")]
    TaxonomyNotFound(String),

    /// The catalog could not be reached or answered with an error.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}
