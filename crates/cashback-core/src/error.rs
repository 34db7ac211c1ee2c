//! # Error Types
//!
//! Configuration errors for cashback-core.
//!
//! ## Where Errors Can Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Settings store ──► validate_* ──► ValidationError  (load time)         │
//! │                                                                         │
//! │  resolve_percentage / calculate / explain           (call time)         │
//! │    never fail: zero is a valid answer                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;
use crate::types::Percent;

/// A settings value that breaks a configuration rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A tier's threshold is below the previous tier's threshold.
    #[error("Tier {tier} threshold {threshold} must be greater than or equal to tier {previous_tier} threshold {previous_threshold}")]
    ThresholdNotAscending {
        tier: usize,
        threshold: Money,
        previous_tier: usize,
        previous_threshold: Money,
    },

    /// A money amount that must not be negative is.
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: String, value: Money },

    /// A percentage above 100%.
    #[error("{field} must be at most 100%, got {value}")]
    PercentageTooHigh { field: String, value: Percent },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;
