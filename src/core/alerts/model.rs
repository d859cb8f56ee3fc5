// Matcher configuration and rejection reasons.

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Minimum credits a credits-only alert must pay to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum CreditsTier {
    /// Show every credits-only alert
    #[default]
    Any,
    Min3k,
    Min5k,
    Min7k,
    Min10k,
    /// Never show credits-only alerts
    Never,
}

impl CreditsTier {
    pub fn all() -> &'static [CreditsTier] {
        &[
            Self::Any,
            Self::Min3k,
            Self::Min5k,
            Self::Min7k,
            Self::Min10k,
            Self::Never,
        ]
    }

    /// Tier by its settings index (0-5).
    pub fn from_index(index: u8) -> Result<Self> {
        Self::all()
            .get(usize::from(index))
            .copied()
            .ok_or(Error::InvalidCreditsTier(index))
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Credits required, or None when credits-only alerts are always rejected.
    pub fn threshold(self) -> Option<u32> {
        match self {
            Self::Any => Some(0),
            Self::Min3k => Some(3_000),
            Self::Min5k => Some(5_000),
            Self::Min7k => Some(7_000),
            Self::Min10k => Some(10_000),
            Self::Never => None,
        }
    }

    pub fn accepts(self, credits: u32) -> bool {
        self.threshold().is_some_and(|min| credits >= min)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Any => "All credits",
            Self::Min3k => "3K+ credits",
            Self::Min5k => "5K+ credits",
            Self::Min7k => "7K+ credits",
            Self::Min10k => "10K+ credits",
            Self::Never => "No credits",
        }
    }
}

/// User toggles the matcher is built from. Persisted in settings.json.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub credits: CreditsTier,
    pub blueprints: bool,
    pub mods: bool,
    pub auras: bool,
    pub resources: bool,
    /// Hide alerts whose reward is in the filter set
    pub filter: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            credits: CreditsTier::Any,
            blueprints: true,
            mods: true,
            auras: true,
            resources: true,
            filter: true,
        }
    }
}

/// Why an alert was not matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    Done,
    Credits,
    Blueprint,
    Mod,
    Aura,
    Resource,
    Filtered,
}

impl Rejection {
    pub fn description(self) -> &'static str {
        match self {
            Self::Done => "already done",
            Self::Credits => "credits below threshold",
            Self::Blueprint => "blueprints hidden",
            Self::Mod => "mods hidden",
            Self::Aura => "auras hidden",
            Self::Resource => "resources hidden",
            Self::Filtered => "reward is ignored",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_indexes() {
        for (i, tier) in CreditsTier::all().iter().enumerate() {
            assert_eq!(usize::from(tier.index()), i);
            assert_eq!(CreditsTier::from_index(tier.index()).unwrap(), *tier);
            assert!(!tier.display_name().is_empty());
        }
        assert!(matches!(
            CreditsTier::from_index(6),
            Err(Error::InvalidCreditsTier(6))
        ));
    }

    #[test]
    fn test_tier_thresholds() {
        assert!(CreditsTier::Any.accepts(0));
        assert!(!CreditsTier::Min3k.accepts(2_999));
        assert!(CreditsTier::Min3k.accepts(3_000));
        assert!(!CreditsTier::Min5k.accepts(4_000));
        assert!(CreditsTier::Min7k.accepts(7_000));
        assert!(!CreditsTier::Min10k.accepts(9_999));
        assert!(!CreditsTier::Never.accepts(u32::MAX));
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let config: MatchConfig = serde_json::from_str(r#"{ "mods": false }"#).unwrap();
        assert!(!config.mods);
        assert!(config.blueprints);
        assert_eq!(config.credits, CreditsTier::Any);
    }
}
