//! Salary-matching rule configuration.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Thresholds used by the CBA rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CbaConfig {
    /// Incoming salary multiplier for teams at or crossing the first apron
    pub first_apron_match_pct: Decimal,

    /// Incoming salary multiplier for over-cap teams below the first apron
    pub over_cap_match_pct: Decimal,

    /// Flat dollar allowance added on top of either multiplier
    pub match_buffer: i64,

    /// Fewest teams a proposal may involve
    pub min_teams: usize,

    /// Most teams a proposal may involve
    pub max_teams: usize,
}

impl Default for CbaConfig {
    fn default() -> Self {
        Self {
            first_apron_match_pct: dec!(1.10), // 110%
            over_cap_match_pct: dec!(1.25),    // 125%
            match_buffer: 100_000,             // + $100K
            min_teams: 2,
            max_teams: 5,
        }
    }
}

impl CbaConfig {
    /// Load overrides from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse rules file {}", path.display()))?;

        if config.min_teams > config.max_teams {
            anyhow::bail!(
                "Invalid rules: min_teams {} > max_teams {}",
                config.min_teams,
                config.max_teams
            );
        }
        Ok(config)
    }

    /// Largest incoming salary allowed for a first-apron team.
    pub fn first_apron_ceiling(&self, outgoing_salary: i64) -> Decimal {
        Decimal::from(outgoing_salary) * self.first_apron_match_pct + Decimal::from(self.match_buffer)
    }

    /// Largest incoming salary allowed for an over-cap team.
    pub fn over_cap_ceiling(&self, outgoing_salary: i64) -> Decimal {
        Decimal::from(outgoing_salary) * self.over_cap_match_pct + Decimal::from(self.match_buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ceilings() {
        let config = CbaConfig::default();
        assert_eq!(config.first_apron_ceiling(10_000_000), dec!(11_100_000));
        assert_eq!(config.over_cap_ceiling(5_000_000), dec!(6_350_000));
        assert_eq!(config.over_cap_ceiling(0), dec!(100_000));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: CbaConfig = serde_json::from_str(r#"{"match_buffer": 250000}"#).unwrap();
        assert_eq!(config.match_buffer, 250_000);
        assert_eq!(config.first_apron_match_pct, dec!(1.10));
        assert_eq!(config.max_teams, 5);
    }

    #[test]
    fn test_load_demo_rules_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/rules.json");
        let config = CbaConfig::from_json_file(&path).unwrap();
        assert_eq!(config, CbaConfig::default());
    }

    #[test]
    fn test_missing_rules_file_is_an_error() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/no_such_rules.json");
        let err = CbaConfig::from_json_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to read rules file"));
    }
}
