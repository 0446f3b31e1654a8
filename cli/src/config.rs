//! TOML configuration loading and validation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use folioscope::{AnalyticsConfig, AssetId, Holdings};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Thresholds and annualization; every field has a default.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Shares per asset.
    pub holdings: BTreeMap<String, u64>,
    #[serde(default)]
    pub rebalance: RebalanceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RebalanceConfig {
    /// Overrides the equal-weight target allocation (percent).
    pub target_alloc_pct: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// Warn when the snapshot is older than this many seconds.
    #[serde(default = "default_max_age")]
    pub max_snapshot_age_secs: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            max_snapshot_age_secs: default_max_age(),
        }
    }
}

fn default_export_dir() -> String {
    "./reports".into()
}
fn default_max_age() -> u64 {
    24 * 60 * 60
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Parse from a TOML string (useful for testing).
    pub fn from_toml(toml: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    fn validate(&self) -> Result<()> {
        self.analytics.validate()?;
        if self.holdings.is_empty() {
            return Err(Error::Config("holdings table is empty".into()));
        }
        if self.holdings.keys().any(|k| k.trim().is_empty()) {
            return Err(Error::Config("empty asset id in holdings".into()));
        }
        if let Some(t) = self.rebalance.target_alloc_pct {
            if !(t.is_finite() && t > 0.0 && t <= 100.0) {
                return Err(Error::Config(format!(
                    "target_alloc_pct must be in (0, 100], got {t}"
                )));
            }
        }
        Ok(())
    }

    /// Holdings as the analytics input type.
    pub fn holdings(&self) -> Holdings {
        self.holdings
            .iter()
            .map(|(id, &shares)| (AssetId::from(id.as_str()), shares))
            .collect()
    }

    /// Path of the JSON export for a given file name.
    pub fn export_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.output.export_dir).join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_toml() -> &'static str {
        r#"
[analytics]
periods_per_year = 252.0
var_percentile = 5.0

[analytics.risk]
medium_volatility_pct = 20.0
high_volatility_pct = 35.0

[analytics.allocation]
over_pct = 30.0
under_pct = 10.0

[analytics.rebalance]
max_alloc_pct = 30.0
buy_below_pct = 20.0

[holdings]
"RELIANCE.NS" = 10
"TCS.NS" = 15
AAPL = 5

[rebalance]
target_alloc_pct = 33.33

[output]
export_dir = "./out"
max_snapshot_age_secs = 3600
"#
    }

    #[test]
    fn parse_example_config() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(config.holdings.len(), 3);
        assert_eq!(config.holdings["TCS.NS"], 15);
        assert_eq!(config.analytics, AnalyticsConfig::default());
        assert_eq!(config.rebalance.target_alloc_pct, Some(33.33));
        assert_eq!(config.output.max_snapshot_age_secs, 3600);
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml("[holdings]\nAAPL = 5\n").unwrap();
        assert_eq!(config.analytics, AnalyticsConfig::default());
        assert!(config.rebalance.target_alloc_pct.is_none());
        assert_eq!(config.output.export_dir, "./reports");
    }

    #[test]
    fn partial_analytics_table() {
        let config =
            Config::from_toml("[analytics.risk]\nhigh_volatility_pct = 50.0\n[holdings]\nA = 1\n")
                .unwrap();
        assert_eq!(config.analytics.risk.high_volatility_pct, 50.0);
        assert_eq!(config.analytics.risk.medium_volatility_pct, 20.0);
    }

    #[test]
    fn holdings_conversion() {
        let config = Config::from_toml(example_toml()).unwrap();
        let holdings = config.holdings();
        assert_eq!(holdings.get("AAPL"), Some(&5));
        assert_eq!(holdings.get("RELIANCE.NS"), Some(&10));
    }

    #[test]
    fn validate_catches_negative_shares() {
        assert!(Config::from_toml("[holdings]\nAAPL = -5\n").is_err());
    }

    #[test]
    fn validate_catches_empty_holdings() {
        assert!(Config::from_toml("[holdings]\n").is_err());
    }

    #[test]
    fn validate_catches_bad_thresholds() {
        let toml = "[analytics.allocation]\nover_pct = 5.0\n[holdings]\nA = 1\n";
        assert!(matches!(
            Config::from_toml(toml),
            Err(Error::Analytics(_))
        ));
    }

    #[test]
    fn validate_catches_bad_target() {
        let toml = example_toml().replace("33.33", "150.0");
        assert!(Config::from_toml(&toml).is_err());
    }

    #[test]
    fn export_path() {
        let config = Config::from_toml(example_toml()).unwrap();
        assert_eq!(
            config.export_path("report.json"),
            PathBuf::from("./out/report.json")
        );
    }
}
