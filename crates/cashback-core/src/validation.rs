//! # Validation Module
//!
//! Checks applied when settings are loaded, before any calculation runs.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Settings source                                               │
//! │  └── Lenient parsing: unparsable numbers become 0                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Tier thresholds non-negative and non-decreasing                    │
//! │  └── Percentages at most 100%                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine                                                        │
//! │  └── No checks at all: whatever it is given, it answers                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tiers are numbered from 1 in error messages, the way the settings screen
//! labels them.

use crate::error::{ValidationError, ValidationResult};
use crate::limits::RedemptionLimits;
use crate::types::{CashbackSettings, Percent, Rule, TierConfig};

/// Validates the tier ladder.
///
/// ## Rules
/// - Thresholds must not be negative
/// - Each threshold must be >= the one before it
/// - Percentages must be at most 100%
///
/// Value errors are reported before ordering errors, so callers that
/// tolerate unsorted ladders can accept `ThresholdNotAscending` alone.
///
/// ## Example
/// ```rust
/// use cashback_core::money::Money;
/// use cashback_core::types::{Percent, Tier, TierConfig};
/// use cashback_core::validation::validate_tiers;
///
/// assert!(validate_tiers(&TierConfig::default()).is_ok());
///
/// let descending = TierConfig::new(vec![
///     Tier::new(Money::from_cents(100_000), Percent::from_whole(5)),
///     Tier::new(Money::from_cents(50_000), Percent::from_whole(3)),
/// ]);
/// assert!(validate_tiers(&descending).is_err());
/// ```
pub fn validate_tiers(tiers: &TierConfig) -> ValidationResult<()> {
    for (index, tier) in tiers.tiers().iter().enumerate() {
        let number = index + 1;

        if tier.threshold.is_negative() {
            return Err(ValidationError::NegativeAmount {
                field: format!("tier {} threshold", number),
                value: tier.threshold,
            });
        }

        validate_percentage(&format!("tier {} percentage", number), tier.percentage)?;
    }

    // Ordering last: a ThresholdNotAscending error means every value passed.
    for (index, pair) in tiers.tiers().windows(2).enumerate() {
        let (previous, tier) = (pair[0], pair[1]);
        if tier.threshold < previous.threshold {
            return Err(ValidationError::ThresholdNotAscending {
                tier: index + 2,
                threshold: tier.threshold,
                previous_tier: index + 1,
                previous_threshold: previous.threshold,
            });
        }
    }

    Ok(())
}

/// Validates one rule. `number` is its 1-based position in the rule list.
///
/// A rule with no ids is valid; it simply never matches.
pub fn validate_rule(number: usize, rule: &Rule) -> ValidationResult<()> {
    validate_percentage(&format!("rule {} ({}) percentage", number, rule.kind), rule.percentage)
}

/// Validates every rule in `settings`.
pub fn validate_settings(settings: &CashbackSettings) -> ValidationResult<()> {
    settings
        .rules
        .iter()
        .enumerate()
        .try_for_each(|(index, rule)| validate_rule(index + 1, rule))
}

/// Validates redemption limits.
pub fn validate_limits(limits: &RedemptionLimits) -> ValidationResult<()> {
    validate_percentage("usage limit", limits.usage_limit)?;

    if limits.max_balance.is_negative() {
        return Err(ValidationError::NegativeAmount {
            field: "max balance".to_string(),
            value: limits.max_balance,
        });
    }

    Ok(())
}

fn validate_percentage(field: &str, value: Percent) -> ValidationResult<()> {
    if value > Percent::HUNDRED {
        return Err(ValidationError::PercentageTooHigh {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
