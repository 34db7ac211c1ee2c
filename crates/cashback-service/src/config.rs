//! # Cashback Configuration
//!
//! Loads tiers, rules and limits from a config file and the environment.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     CASHBACK_USE_BRAND_RULES=yes                                        │
//! │     CASHBACK_TIER_2_PERCENTAGE=5.5                                      │
//! │                                                                         │
//! │  2. Config File                                                         │
//! │     cashback.toml, or cashback.json (chosen by extension)               │
//! │     ~/.config/cashback-engine/cashback.toml (Linux)                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     500 → 3%, 1000 → 5%, 1500 → 7%, brand rules off                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! use_brand_rules = "yes"          # true/false or "yes"/"no"
//! brand_taxonomy = "product_brand"
//!
//! [[tiers]]
//! threshold = 500
//! percentage = 3
//!
//! [[tiers]]
//! threshold = "1000"               # numbers may also be strings
//! percentage = 5.5
//!
//! [[rules]]
//! type = "product"                 # "product" or "brand"
//! ids = [12, "13"]
//! percentage = 10
//!
//! [limits]
//! usage_limit_percentage = 50
//! max_balance = 10000
//! ```
//!
//! Numeric values that cannot be read as a number count as zero, so a typo
//! disables a tier instead of failing the whole load.

use std::path::{Path, PathBuf};

use cashback_core::validation::{validate_limits, validate_settings, validate_tiers};
use cashback_core::{
    CashbackSettings, Money, Percent, RedemptionLimits, Rule, RuleKind, Tier, TierConfig, ValidationError,
};
use serde::de::IgnoredAny;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};

/// Brand taxonomy used when none is configured.
pub const DEFAULT_BRAND_TAXONOMY: &str = "product_brand";

const ENV_PREFIX: &str = "CASHBACK_";

// =============================================================================
// Lenient Raw Values
// =============================================================================

/// A number as written by a person: integer, float, string, or junk.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Int(i64),
    Float(f64),
    Text(String),
    Unparsable(IgnoredAny),
}

impl LenientNumber {
    fn as_text(&self) -> String {
        match self {
            LenientNumber::Int(value) => value.to_string(),
            LenientNumber::Float(value) => value.to_string(),
            LenientNumber::Text(text) => text.clone(),
            LenientNumber::Unparsable(_) => String::new(),
        }
    }

    pub fn to_money(&self) -> Money {
        Money::parse_lenient(&self.as_text())
    }

    pub fn to_percent(&self) -> Percent {
        Percent::parse_lenient(&self.as_text())
    }
}

/// A switch written as a bool, `1`/`0`, or `"yes"`/`"no"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LenientFlag {
    Bool(bool),
    Int(i64),
    Text(String),
    Unparsable(IgnoredAny),
}

impl LenientFlag {
    fn is_on(&self) -> bool {
        match self {
            LenientFlag::Bool(value) => *value,
            LenientFlag::Int(value) => *value != 0,
            LenientFlag::Text(text) => parse_flag(text),
            LenientFlag::Unparsable(_) => false,
        }
    }
}

fn parse_flag(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "yes" | "true" | "1" | "on"
    )
}

/// A product or brand id written as a number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LenientId {
    Int(i64),
    Text(String),
    Unparsable(IgnoredAny),
}

impl LenientId {
    fn normalized(&self) -> Option<String> {
        match self {
            LenientId::Int(value) => Some(value.to_string()),
            LenientId::Text(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            LenientId::Unparsable(_) => None,
        }
    }
}

// =============================================================================
// File Representation
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    use_brand_rules: Option<LenientFlag>,
    brand_taxonomy: Option<String>,
    tiers: Option<Vec<RawTier>>,
    rules: Vec<RawRule>,
    limits: RawLimits,
}

#[derive(Debug, Deserialize)]
struct RawTier {
    threshold: Option<LenientNumber>,
    percentage: Option<LenientNumber>,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    ids: Vec<LenientId>,
    percentage: Option<LenientNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLimits {
    usage_limit_percentage: Option<LenientNumber>,
    max_balance: Option<LenientNumber>,
}

fn money_or_zero(value: &Option<LenientNumber>) -> Money {
    value.as_ref().map(LenientNumber::to_money).unwrap_or_default()
}

fn percent_or_zero(value: &Option<LenientNumber>) -> Percent {
    value.as_ref().map(LenientNumber::to_percent).unwrap_or_default()
}

fn rule_kind(kind: &str) -> Option<RuleKind> {
    match kind.trim().to_lowercase().as_str() {
        "product" | "product_exception" => Some(RuleKind::ProductException),
        "brand" | "brand_match" => Some(RuleKind::BrandMatch),
        _ => None,
    }
}

impl From<RawConfig> for CashbackConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = CashbackConfig::default();

        let tiers = match raw.tiers {
            Some(tiers) => TierConfig::new(
                tiers
                    .iter()
                    .map(|tier| Tier::new(money_or_zero(&tier.threshold), percent_or_zero(&tier.percentage)))
                    .collect(),
            ),
            None => defaults.tiers,
        };

        let rules = raw
            .rules
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                let Some(kind) = rule_kind(&rule.kind) else {
                    warn!(rule = index + 1, kind = %rule.kind, "Skipping rule with unknown type");
                    return None;
                };
                let ids = rule.ids.iter().filter_map(LenientId::normalized);
                Some(Rule::new(kind, ids, percent_or_zero(&rule.percentage)))
            })
            .collect();

        let limits = RedemptionLimits {
            usage_limit: raw
                .limits
                .usage_limit_percentage
                .as_ref()
                .map_or(defaults.limits.usage_limit, LenientNumber::to_percent),
            max_balance: raw
                .limits
                .max_balance
                .as_ref()
                .map_or(defaults.limits.max_balance, LenientNumber::to_money),
        };

        CashbackConfig {
            tiers,
            settings: CashbackSettings::new(
                raw.use_brand_rules.as_ref().map_or(false, LenientFlag::is_on),
                rules,
            ),
            limits,
            brand_taxonomy: raw
                .brand_taxonomy
                .map(|t| t.trim().to_string())
                .unwrap_or(defaults.brand_taxonomy),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Everything a cashback calculation needs besides the order itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashbackConfig {
    pub tiers: TierConfig,
    pub settings: CashbackSettings,
    pub limits: RedemptionLimits,
    /// Taxonomy the catalog groups brands under.
    pub brand_taxonomy: String,
}

impl Default for CashbackConfig {
    fn default() -> Self {
        CashbackConfig {
            tiers: TierConfig::default(),
            settings: CashbackSettings::default(),
            limits: RedemptionLimits::default(),
            brand_taxonomy: DEFAULT_BRAND_TAXONOMY.to_string(),
        }
    }
}

impl CashbackConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`cashback.toml` / `cashback.json`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading cashback config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load cashback config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads one file, picking the format from its extension.
    pub fn from_file(path: &Path) -> ServiceResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        }
    }

    /// Parses the TOML config format. Does not validate.
    pub fn from_toml_str(contents: &str) -> ServiceResult<Self> {
        let raw: RawConfig = toml::from_str(contents)?;
        Ok(raw.into())
    }

    /// Parses the same layout written as JSON. Does not validate.
    pub fn from_json_str(contents: &str) -> ServiceResult<Self> {
        let raw: RawConfig = serde_json::from_str(contents)?;
        Ok(raw.into())
    }

    /// Validates the configuration.
    ///
    /// Rules with no ids pass (they can never match) but are logged. So do
    /// tiers out of ascending order: they resolve by position.
    pub fn validate(&self) -> ServiceResult<()> {
        match validate_tiers(&self.tiers) {
            Err(err @ ValidationError::ThresholdNotAscending { .. }) => {
                warn!(error = %err, "Tier thresholds are not ascending, tiers resolve by position");
            }
            other => other?,
        }
        validate_settings(&self.settings)?;
        validate_limits(&self.limits)?;

        if self.settings.use_brand_rules && self.brand_taxonomy.is_empty() {
            return Err(ServiceError::InvalidConfig(
                "brand_taxonomy must be set when brand rules are enabled".into(),
            ));
        }

        for (index, rule) in self.settings.rules.iter().enumerate() {
            if rule.ids.is_empty() {
                warn!(rule = index + 1, kind = %rule.kind, "Rule has no ids and will never match");
            }
        }

        Ok(())
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`, which maps a variable name such as
    /// `CASHBACK_MAX_BALANCE` to its value.
    ///
    /// Tier variables are 1-based and only touch tiers that already exist.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(flag) = var("USE_BRAND_RULES") {
            debug!(flag = %flag, "Overriding brand rules switch from environment");
            self.settings.use_brand_rules = parse_flag(&flag);
        }

        for (index, tier) in self.tiers.tiers.iter_mut().enumerate() {
            let number = index + 1;
            if let Some(threshold) = var(&format!("TIER_{}_THRESHOLD", number)) {
                debug!(tier = number, threshold = %threshold, "Overriding tier threshold from environment");
                tier.threshold = Money::parse_lenient(&threshold);
            }
            if let Some(percentage) = var(&format!("TIER_{}_PERCENTAGE", number)) {
                debug!(tier = number, percentage = %percentage, "Overriding tier percentage from environment");
                tier.percentage = Percent::parse_lenient(&percentage);
            }
        }

        if let Some(usage_limit) = var("USAGE_LIMIT_PERCENTAGE") {
            self.limits.usage_limit = Percent::parse_lenient(&usage_limit);
        }

        if let Some(max_balance) = var("MAX_BALANCE") {
            self.limits.max_balance = Money::parse_lenient(&max_balance);
        }

        if let Some(taxonomy) = var("BRAND_TAXONOMY") {
            debug!(taxonomy = %taxonomy, "Overriding brand taxonomy from environment");
            self.brand_taxonomy = taxonomy.trim().to_string();
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cashback", "cashback-engine")
            .map(|dirs| dirs.config_dir().join("cashback.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cashback-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CashbackConfig::default();
        assert_eq!(config.tiers, TierConfig::default());
        assert!(!config.settings.use_brand_rules);
        assert!(config.settings.rules.is_empty());
        assert_eq!(config.limits, RedemptionLimits::default());
        assert_eq!(config.brand_taxonomy, DEFAULT_BRAND_TAXONOMY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = CashbackConfig::from_toml_str("").unwrap();
        assert_eq!(config, CashbackConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let config = CashbackConfig::from_toml_str(
            r#"
            use_brand_rules = "yes"
            brand_taxonomy = "pa_brand"

            [[tiers]]
            threshold = 500
            percentage = 3

            [[tiers]]
            threshold = "1000"
            percentage = 5.5

            [[rules]]
            type = "product"
            ids = [12, " 13 ", ""]
            percentage = "10"

            [[rules]]
            type = "brand"
            ids = ["nike"]
            percentage = 2

            [limits]
            usage_limit_percentage = 30
            max_balance = "2500.50"
            "#,
        )
        .unwrap();

        assert!(config.settings.use_brand_rules);
        assert_eq!(config.brand_taxonomy, "pa_brand");
        assert_eq!(
            config.tiers,
            TierConfig::new(vec![
                Tier::new(Money::from_cents(50_000), Percent::from_bps(300)),
                Tier::new(Money::from_cents(100_000), Percent::from_bps(550)),
            ])
        );
        assert_eq!(config.settings.rules[0], Rule::product(["12", "13"], Percent::from_whole(10)));
        assert_eq!(config.settings.rules[1], Rule::brand(["nike"], Percent::from_whole(2)));
        assert_eq!(config.limits.usage_limit, Percent::from_whole(30));
        assert_eq!(config.limits.max_balance, Money::from_cents(250_050));
    }

    #[test]
    fn test_unparsable_numbers_become_zero() {
        let config = CashbackConfig::from_toml_str(
            r#"
            [[tiers]]
            threshold = "five hundred"
            percentage = true

            [[rules]]
            type = "brand"
            ids = ["x"]
            percentage = "ten"
            "#,
        )
        .unwrap();

        assert_eq!(config.tiers.tiers()[0], Tier::new(Money::zero(), Percent::zero()));
        assert_eq!(config.settings.rules[0].percentage, Percent::zero());
    }

    #[test]
    fn test_unknown_rule_type_is_skipped() {
        let config = CashbackConfig::from_toml_str(
            r#"
            [[rules]]
            type = "category"
            ids = ["1"]
            percentage = 5

            [[rules]]
            type = "Brand"
            ids = ["2"]
            percentage = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.settings.rules.len(), 1);
        assert_eq!(config.settings.rules[0].kind, RuleKind::BrandMatch);
    }

    #[test]
    fn test_parse_json() {
        let config = CashbackConfig::from_json_str(
            r#"{
                "use_brand_rules": true,
                "tiers": [{"threshold": 100, "percentage": "1.25"}],
                "rules": [{"type": "product", "ids": [7], "percentage": 4}]
            }"#,
        )
        .unwrap();

        assert!(config.settings.use_brand_rules);
        assert_eq!(config.tiers.tiers()[0].percentage, Percent::from_bps(125));
        assert!(config.settings.rules[0].matches_product("7"));
    }

    #[test]
    fn test_malformed_toml_is_load_error() {
        let err = CashbackConfig::from_toml_str("[[tiers]\nthreshold = ").unwrap_err();
        assert!(matches!(err, ServiceError::ConfigLoadFailed(_)));
    }

    #[test]
    fn test_load_from_file_and_validate() {
        let path = temp_file(
            "valid.toml",
            "[[tiers]]\nthreshold = 100\npercentage = 2\n\n[[tiers]]\nthreshold = 200\npercentage = 4\n",
        );
        let config = CashbackConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.tiers.tiers().len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_json_by_extension() {
        let path = temp_file("settings.json", r#"{"use_brand_rules": "yes"}"#);
        let config = CashbackConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(config.settings.use_brand_rules);
    }

    #[test]
    fn test_load_keeps_descending_tiers() {
        let path = temp_file(
            "descending.toml",
            r#"
            use_brand_rules = "yes"

            [[tiers]]
            threshold = 1000
            percentage = 5

            [[tiers]]
            threshold = 500
            percentage = 3

            [[rules]]
            type = "brand"
            ids = ["nike"]
            percentage = 4
            "#,
        );
        let config = CashbackConfig::load_or_default(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        assert!(config.settings.use_brand_rules);
        assert_eq!(config.settings.rules.len(), 1);
        assert_eq!(config.tiers.tiers()[0].threshold, Money::from_cents(100_000));
        // Last tier reached wins: 1200.00 meets 500 first, checked from the end.
        assert_eq!(config.tiers.resolve(Money::from_cents(120_000)), Percent::from_whole(3));
    }

    #[test]
    fn test_load_rejects_bad_tier_values() {
        let path = temp_file(
            "too-high.toml",
            "[[tiers]]\nthreshold = 1000\npercentage = 5\n\n[[tiers]]\nthreshold = 500\npercentage = 150\n",
        );
        let result = CashbackConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let path = temp_file("broken.toml", "use_brand_rules = [");
        let config = CashbackConfig::load_or_default(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        assert_eq!(config.tiers, TierConfig::default());
    }

    #[test]
    fn test_overrides() {
        let mut config = CashbackConfig::default();
        config.apply_overrides(overrides(&[
            ("CASHBACK_USE_BRAND_RULES", "yes"),
            ("CASHBACK_TIER_2_THRESHOLD", "900"),
            ("CASHBACK_TIER_3_PERCENTAGE", "8.5"),
            ("CASHBACK_TIER_4_PERCENTAGE", "20"),
            ("CASHBACK_USAGE_LIMIT_PERCENTAGE", "25"),
            ("CASHBACK_MAX_BALANCE", "500"),
            ("CASHBACK_BRAND_TAXONOMY", " pa_brand "),
        ]));

        assert!(config.settings.use_brand_rules);
        assert_eq!(config.tiers.tiers().len(), 3);
        assert_eq!(config.tiers.tiers()[1].threshold, Money::from_cents(90_000));
        assert_eq!(config.tiers.tiers()[2].percentage, Percent::from_bps(850));
        assert_eq!(config.limits.usage_limit, Percent::from_whole(25));
        assert_eq!(config.limits.max_balance, Money::from_cents(50_000));
        assert_eq!(config.brand_taxonomy, "pa_brand");
    }

    #[test]
    fn test_brand_mode_requires_taxonomy() {
        let mut config = CashbackConfig::default();
        config.settings.use_brand_rules = true;
        config.brand_taxonomy = String::new();

        assert!(matches!(config.validate(), Err(ServiceError::InvalidConfig(_))));
    }

    #[test]
    fn test_rule_without_ids_is_valid() {
        let mut config = CashbackConfig::default();
        config.settings.rules.push(Rule::brand(Vec::<String>::new(), Percent::from_whole(3)));
        assert!(config.validate().is_ok());
    }
}
