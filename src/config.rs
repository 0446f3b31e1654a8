//! Analytics configuration.
//!
//! Every threshold the engines use lives here, with the defaults below.
//! Components take a validated config at construction instead of reading
//! constants, so tests can probe boundary values exactly.

use crate::error::ConfigError;

/// Trading periods per year used to annualize per-period statistics.
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 252.0;
/// Annualized volatility (%) at which an asset stops being LOW risk.
pub const DEFAULT_MEDIUM_VOLATILITY_PCT: f64 = 20.0;
/// Annualized volatility (%) at which an asset becomes HIGH risk.
pub const DEFAULT_HIGH_VOLATILITY_PCT: f64 = 35.0;
/// Percentile of the return sample reported as VaR (5 → VaR-95).
pub const DEFAULT_VAR_PERCENTILE: f64 = 5.0;
/// Allocation (%) above which an asset is flagged over-allocated.
pub const DEFAULT_OVER_ALLOCATED_PCT: f64 = 30.0;
/// Allocation (%) below which an asset is flagged under-allocated.
pub const DEFAULT_UNDER_ALLOCATED_PCT: f64 = 10.0;
/// Allocation (%) above which the rebalancer emits REDUCE.
pub const DEFAULT_MAX_ALLOC_PCT: f64 = 30.0;
/// Allocation (%) below which the rebalancer emits BUY.
pub const DEFAULT_BUY_BELOW_PCT: f64 = 20.0;

/// Volatility buckets for [`RiskLevel`](crate::RiskLevel).
///
/// `vol < medium → LOW`, `medium <= vol < high → MEDIUM`, `vol >= high → HIGH`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RiskThresholds {
    pub medium_volatility_pct: f64,
    pub high_volatility_pct: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium_volatility_pct: DEFAULT_MEDIUM_VOLATILITY_PCT,
            high_volatility_pct: DEFAULT_HIGH_VOLATILITY_PCT,
        }
    }
}

/// Over/under allocation flags used by the valuator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AllocationThresholds {
    pub over_pct: f64,
    pub under_pct: f64,
}

impl Default for AllocationThresholds {
    fn default() -> Self {
        Self {
            over_pct: DEFAULT_OVER_ALLOCATED_PCT,
            under_pct: DEFAULT_UNDER_ALLOCATED_PCT,
        }
    }
}

/// Signal triggers used by the rebalancer.
///
/// The two triggers are independent. Neither depends on the number of assets.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RebalanceThresholds {
    pub max_alloc_pct: f64,
    pub buy_below_pct: f64,
}

impl Default for RebalanceThresholds {
    fn default() -> Self {
        Self {
            max_alloc_pct: DEFAULT_MAX_ALLOC_PCT,
            buy_below_pct: DEFAULT_BUY_BELOW_PCT,
        }
    }
}

/// Configuration shared by the risk engine, valuator and rebalancer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalyticsConfig {
    /// Annualization factor (252 for daily returns).
    pub periods_per_year: f64,
    /// Percentile of returns reported as VaR, in (0, 100).
    pub var_percentile: f64,
    pub risk: RiskThresholds,
    pub allocation: AllocationThresholds,
    pub rebalance: RebalanceThresholds,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: DEFAULT_PERIODS_PER_YEAR,
            var_percentile: DEFAULT_VAR_PERCENTILE,
            risk: RiskThresholds::default(),
            allocation: AllocationThresholds::default(),
            rebalance: RebalanceThresholds::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate the config. Returns the first nonsensical field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("periods_per_year", self.periods_per_year)?;
        percent("var_percentile", self.var_percentile)?;

        positive("risk.medium_volatility_pct", self.risk.medium_volatility_pct)?;
        positive("risk.high_volatility_pct", self.risk.high_volatility_pct)?;
        ordered(
            ("risk.medium_volatility_pct", self.risk.medium_volatility_pct),
            ("risk.high_volatility_pct", self.risk.high_volatility_pct),
        )?;

        percent("allocation.under_pct", self.allocation.under_pct)?;
        percent("allocation.over_pct", self.allocation.over_pct)?;
        ordered(
            ("allocation.under_pct", self.allocation.under_pct),
            ("allocation.over_pct", self.allocation.over_pct),
        )?;

        percent("rebalance.max_alloc_pct", self.rebalance.max_alloc_pct)?;
        percent("rebalance.buy_below_pct", self.rebalance.buy_below_pct)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn percent(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value < 100.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn ordered(lower: (&'static str, f64), upper: (&'static str, f64)) -> Result<(), ConfigError> {
    if lower.1 < upper.1 {
        Ok(())
    } else {
        Err(ConfigError::Misordered {
            lower: lower.0,
            lower_value: lower.1,
            upper: upper.0,
            upper_value: upper.1,
        })
    }
}
