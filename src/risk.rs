//! Risk engine: per-asset volatility, Sharpe, historical VaR and risk level.
//!
//! All figures are sample estimators over the supplied return window. The
//! annualization factor comes from [`AnalyticsConfig::periods_per_year`]; the
//! caller must supply returns whose periodicity matches it, otherwise the
//! "annual" figures are not annual.

use std::fmt;

use log::{debug, warn};

use crate::config::AnalyticsConfig;
use crate::error::{ConfigError, DataGap, Degeneracy, GapReason};
use crate::stats;
use crate::types::{AssetId, OrUndefined, ReturnWindow, RiskLevel};

/// Observations needed for variance-based metrics.
pub const MIN_OBSERVATIONS: usize = 2;

/// Risk metrics for one asset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskRecord {
    /// Annualized volatility in percent.
    pub volatility_pct: f64,
    /// Annualized Sharpe ratio with a zero risk-free rate.
    /// `None` when the return std-dev is zero.
    pub sharpe: Option<f64>,
    /// Historical VaR in percent (signed; a loss is negative).
    pub var_pct: f64,
    pub level: RiskLevel,
}

/// Per-asset risk records plus the assets that could not be scored.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskTable {
    /// Sorted by asset id.
    pub records: Vec<(AssetId, RiskRecord)>,
    pub gaps: Vec<DataGap>,
    pub degeneracies: Vec<Degeneracy>,
}

impl RiskTable {
    /// Look up one asset's record.
    pub fn get(&self, asset: &str) -> Option<&RiskRecord> {
        self.records
            .binary_search_by(|(id, _)| id.as_str().cmp(asset))
            .ok()
            .map(|i| &self.records[i].1)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Display for RiskTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RISK REPORT:")?;
        writeln!(
            f,
            "  {:<12} {:>10} {:>10} {:>10}  {}",
            "Asset", "Vol (%)", "Sharpe", "VaR (%)", "Risk"
        )?;
        for (asset, r) in &self.records {
            writeln!(
                f,
                "  {:<12} {:>10.2} {:>10.2} {:>10.2}  {}",
                asset,
                r.volatility_pct,
                OrUndefined(r.sharpe),
                r.var_pct,
                r.level
            )?;
        }
        Ok(())
    }
}

/// Computes [`RiskRecord`]s from return windows.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: AnalyticsConfig,
}

impl RiskEngine {
    /// Create an engine from a config, rejecting invalid configs.
    pub fn try_new(config: AnalyticsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Score every asset in the window.
    ///
    /// Assets with fewer than [`MIN_OBSERVATIONS`] returns, or with a
    /// non-finite return, are excluded and reported as gaps.
    pub fn calculate_metrics(&self, returns: &ReturnWindow) -> RiskTable {
        let mut assets: Vec<&AssetId> = returns.keys().collect();
        assets.sort();

        let mut table = RiskTable::default();
        for asset in assets {
            let series = &returns[asset];
            match self.asset_metrics(series) {
                Ok(record) => {
                    debug!(
                        "{asset}: vol={:.4}% var={:.4}% level={}",
                        record.volatility_pct, record.var_pct, record.level
                    );
                    if record.sharpe.is_none() {
                        warn!("{asset}: zero return volatility, Sharpe undefined");
                        table
                            .degeneracies
                            .push(Degeneracy::ZeroVolatility(asset.clone()));
                    }
                    table.records.push((asset.clone(), record));
                }
                Err(reason) => {
                    warn!("{asset}: excluded from risk table ({reason})");
                    table.gaps.push(DataGap::new(asset.clone(), reason));
                }
            }
        }
        table
    }

    /// Metrics for one return series, or the reason it cannot be scored.
    pub fn asset_metrics(&self, series: &[f64]) -> Result<RiskRecord, GapReason> {
        if series.is_empty() {
            return Err(GapReason::MissingReturns);
        }
        if series.len() < MIN_OBSERVATIONS {
            return Err(GapReason::InsufficientReturns {
                observations: series.len(),
                required: MIN_OBSERVATIONS,
            });
        }
        if series.iter().any(|r| !r.is_finite()) {
            return Err(GapReason::NonFiniteReturn);
        }

        let insufficient = GapReason::InsufficientReturns {
            observations: series.len(),
            required: MIN_OBSERVATIONS,
        };
        let std = stats::sample_std(series).ok_or_else(|| insufficient.clone())?;
        let mean = stats::mean(series).ok_or_else(|| insufficient.clone())?;
        let var = stats::percentile(series, self.config.var_percentile).ok_or(insufficient)?;

        let periods = self.config.periods_per_year;
        let volatility_pct = std * periods.sqrt() * 100.0;
        let sharpe = if std == 0.0 {
            None
        } else {
            Some((mean * periods) / (std * periods.sqrt()))
        };

        Ok(RiskRecord {
            volatility_pct,
            sharpe,
            var_pct: var * 100.0,
            level: self.risk_level(volatility_pct),
        })
    }

    /// Bucket an annualized volatility (percent) into a [`RiskLevel`].
    pub fn risk_level(&self, volatility_pct: f64) -> RiskLevel {
        let t = &self.config.risk;
        if volatility_pct < t.medium_volatility_pct {
            RiskLevel::Low
        } else if volatility_pct < t.high_volatility_pct {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    /// Aggregate portfolio risk in percent.
    ///
    /// Mean of each asset's per-period std-dev, annualized. This ignores
    /// cross-asset correlation, so it is an upper-bound style approximation
    /// rather than true portfolio volatility (which needs a covariance
    /// matrix and weights). Assets the engine cannot score are skipped;
    /// `None` if no asset can be scored.
    pub fn portfolio_risk(&self, returns: &ReturnWindow) -> Option<f64> {
        let mut assets: Vec<&AssetId> = returns.keys().collect();
        assets.sort();
        let stds: Vec<f64> = assets
            .into_iter()
            .map(|a| &returns[a])
            .filter(|s| s.iter().all(|r| r.is_finite()))
            .filter_map(|s| stats::sample_std(s))
            .collect();
        let avg = stats::mean(&stds)?;
        Some(avg * self.config.periods_per_year.sqrt() * 100.0)
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self {
            config: AnalyticsConfig::default(),
        }
    }
}
