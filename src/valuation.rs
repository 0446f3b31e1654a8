//! Portfolio valuator: holdings × prices → valuation table with allocations.

use std::fmt;

use log::{debug, warn};

use crate::config::AnalyticsConfig;
use crate::error::{ConfigError, DataGap, Degeneracy, GapReason};
use crate::risk::RiskTable;
use crate::types::{AssetId, Holdings, OrUndefined, PriceSnapshot, RiskLevel, round2};

/// One valued position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuationRow {
    pub asset: AssetId,
    pub shares: u64,
    pub price: f64,
    /// `shares * price`
    pub value: f64,
    /// Share of total value in percent, at full precision.
    /// `None` when the total value is zero.
    pub allocation_pct: Option<f64>,
    /// `None` when the risk engine could not score the asset.
    pub risk: Option<RiskLevel>,
}

impl ValuationRow {
    /// Allocation rounded to 2 decimals, for display.
    pub fn allocation_display(&self) -> Option<f64> {
        self.allocation_pct.map(round2)
    }
}

/// Output of [`PortfolioValuator::analyze`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Valuation {
    /// Sorted by asset id.
    pub rows: Vec<ValuationRow>,
    pub total_value: f64,
    /// Allocation strictly above the over threshold, ascending asset id.
    pub over_allocated: Vec<AssetId>,
    /// Allocation strictly below the under threshold, ascending asset id.
    pub under_allocated: Vec<AssetId>,
    pub gaps: Vec<DataGap>,
    pub degeneracies: Vec<Degeneracy>,
}

impl Valuation {
    pub fn row(&self, asset: &str) -> Option<&ValuationRow> {
        self.rows.iter().find(|r| r.asset.as_str() == asset)
    }

    /// `(asset, allocation%)` for every row whose allocation is defined.
    pub fn current_allocations(&self) -> Vec<(AssetId, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.allocation_pct.map(|a| (r.asset.clone(), a)))
            .collect()
    }

    /// Sum of defined allocations (100 up to rounding, or 0 if undefined).
    pub fn allocation_sum(&self) -> f64 {
        self.rows.iter().filter_map(|r| r.allocation_pct).sum()
    }
}

impl fmt::Display for Valuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TOTAL PORTFOLIO VALUE: {:.2}", self.total_value)?;
        writeln!(f, "PORTFOLIO SUMMARY:")?;
        writeln!(
            f,
            "  {:<12} {:>8} {:>12} {:>14} {:>12}  {}",
            "Asset", "Shares", "Price", "Value", "Alloc (%)", "Risk"
        )?;
        for row in &self.rows {
            let risk = row.risk.map_or_else(|| "unknown".to_string(), |r| r.to_string());
            writeln!(
                f,
                "  {:<12} {:>8} {:>12.2} {:>14.2} {:>12.2}  {}",
                row.asset,
                row.shares,
                row.price,
                row.value,
                OrUndefined(row.allocation_display()),
                risk
            )?;
        }
        writeln!(
            f,
            "OVER-ALLOCATED: {} [{}]",
            self.over_allocated.len(),
            join(&self.over_allocated)
        )?;
        writeln!(
            f,
            "UNDER-ALLOCATED: {} [{}]",
            self.under_allocated.len(),
            join(&self.under_allocated)
        )?;
        Ok(())
    }
}

/// `value / total` in percent. Multiplies first so exact shares such as 30%
/// stay exact, unless that would overflow.
fn share_pct(value: f64, total: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled / total
    } else {
        value / total * 100.0
    }
}

fn join(ids: &[AssetId]) -> String {
    ids.iter()
        .map(AssetId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values holdings at a price snapshot and flags allocation outliers.
#[derive(Debug, Clone)]
pub struct PortfolioValuator {
    config: AnalyticsConfig,
}

impl PortfolioValuator {
    /// Create a valuator from a config, rejecting invalid configs.
    pub fn try_new(config: AnalyticsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Value every held asset that has a usable price.
    ///
    /// Held assets without a usable price, or whose value overflows, are left
    /// out of the table and reported as gaps; they never count as zero value.
    pub fn analyze(
        &self,
        holdings: &Holdings,
        prices: &PriceSnapshot,
        risk: &RiskTable,
    ) -> Valuation {
        let mut assets: Vec<(&AssetId, u64)> = holdings.iter().map(|(a, &s)| (a, s)).collect();
        assets.sort_by(|a, b| a.0.cmp(b.0));

        let mut valuation = Valuation::default();
        for (asset, shares) in assets {
            let price = match prices.get(asset) {
                None => {
                    warn!("{asset}: no price in snapshot, excluded from valuation");
                    valuation
                        .gaps
                        .push(DataGap::new(asset.clone(), GapReason::MissingPrice));
                    continue;
                }
                Some(&p) if !p.is_finite() => {
                    warn!("{asset}: non-finite price {p}, excluded from valuation");
                    valuation
                        .gaps
                        .push(DataGap::new(asset.clone(), GapReason::NonFinitePrice));
                    continue;
                }
                Some(&p) if p <= 0.0 => {
                    warn!("{asset}: non-positive price {p}, excluded from valuation");
                    valuation
                        .gaps
                        .push(DataGap::new(asset.clone(), GapReason::NonPositivePrice(p)));
                    continue;
                }
                Some(&p) => p,
            };

            let value = shares as f64 * price;
            if !value.is_finite() {
                warn!("{asset}: {shares} × {price} overflows, excluded from valuation");
                valuation
                    .gaps
                    .push(DataGap::new(asset.clone(), GapReason::ValueOverflow));
                continue;
            }

            valuation.rows.push(ValuationRow {
                asset: asset.clone(),
                shares,
                price,
                value,
                allocation_pct: None,
                risk: risk.get(asset.as_str()).map(|r| r.level),
            });
        }

        let total: f64 = valuation.rows.iter().map(|r| r.value).sum();
        if !total.is_finite() {
            warn!("total portfolio value overflows, allocations undefined");
            valuation.total_value = f64::MAX;
            valuation.degeneracies.push(Degeneracy::TotalValueOverflow);
        } else if total > 0.0 {
            valuation.total_value = total;
            for row in &mut valuation.rows {
                row.allocation_pct = Some(share_pct(row.value, total));
            }
        } else if !valuation.rows.is_empty() {
            warn!("total portfolio value is zero, allocations undefined");
            valuation.degeneracies.push(Degeneracy::ZeroTotalValue);
        }

        let t = &self.config.allocation;
        for row in &valuation.rows {
            let Some(pct) = row.allocation_pct else {
                continue;
            };
            if pct > t.over_pct {
                valuation.over_allocated.push(row.asset.clone());
            } else if pct < t.under_pct {
                valuation.under_allocated.push(row.asset.clone());
            }
        }

        debug!(
            "valued {} asset(s), total={:.2}, over={}, under={}",
            valuation.rows.len(),
            valuation.total_value,
            valuation.over_allocated.len(),
            valuation.under_allocated.len()
        );
        valuation
    }
}

impl Default for PortfolioValuator {
    fn default() -> Self {
        Self {
            config: AnalyticsConfig::default(),
        }
    }
}
