//! End-to-end analysis run: risk → valuation → signals → report.
//!
//! A run is a pure function of its inputs. [`Analyzer`] holds only the
//! validated config; holdings and market data are passed to every call and
//! the returned [`AnalysisReport`] is owned by the caller.

use std::fmt;

use log::info;

use crate::config::AnalyticsConfig;
use crate::error::{ConfigError, DataGap, Degeneracy, FeedError, GapReason};
use crate::feed::{MarketData, MarketFeed};
use crate::rebalance::{Rebalancer, Signal};
use crate::report::{RebalanceReport, execute_report};
use crate::risk::{RiskEngine, RiskTable};
use crate::types::{AssetId, Holdings, OrUndefined};
use crate::valuation::{PortfolioValuator, Valuation};

/// Everything one run produces.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalysisReport {
    pub risk: RiskTable,
    /// Annualized percent; `None` when no asset could be scored.
    pub portfolio_risk: Option<f64>,
    pub rebalance: RebalanceReport,
    /// Every gap seen in this run (feed, risk, valuation), sorted by asset.
    pub gaps: Vec<DataGap>,
    pub degeneracies: Vec<Degeneracy>,
}

impl AnalysisReport {
    pub fn valuation(&self) -> &Valuation {
        &self.rebalance.valuation
    }

    pub fn signals(&self) -> &[Signal] {
        &self.rebalance.signals
    }

    pub fn trades(&self) -> &[String] {
        &self.rebalance.trades
    }

    /// True when no asset was excluded and no metric is undefined.
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty() && self.degeneracies.is_empty()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.risk)?;
        match self.portfolio_risk {
            Some(v) => writeln!(f, "PORTFOLIO RISK: {v:.2}%")?,
            None => writeln!(f, "PORTFOLIO RISK: {}", OrUndefined(None))?,
        }
        writeln!(f)?;
        write!(f, "{}", self.rebalance)?;
        if !self.is_complete() {
            writeln!(f)?;
            writeln!(f, "DATA ISSUES:")?;
            for gap in &self.gaps {
                writeln!(f, "  [GAP] {gap}")?;
            }
            for d in &self.degeneracies {
                writeln!(f, "  [UNDEFINED] {d}")?;
            }
        }
        Ok(())
    }
}

/// Runs the full analytics pipeline under one config.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    risk: RiskEngine,
    valuator: PortfolioValuator,
    rebalancer: Rebalancer,
}

impl Analyzer {
    /// Build the three engines from one validated config.
    pub fn try_new(config: AnalyticsConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            risk: RiskEngine::try_new(config)?,
            valuator: PortfolioValuator::try_new(config)?,
            rebalancer: Rebalancer::try_new(config)?,
        })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        self.risk.config()
    }

    pub fn risk_engine(&self) -> &RiskEngine {
        &self.risk
    }

    pub fn valuator(&self) -> &PortfolioValuator {
        &self.valuator
    }

    pub fn rebalancer(&self) -> &Rebalancer {
        &self.rebalancer
    }

    /// Run one analysis over already-fetched market data.
    ///
    /// `target_alloc` overrides the equal-weight rebalancing target, which
    /// otherwise is `100 / N` over the assets with a defined allocation in
    /// this run. Fails only if the override is out of range.
    ///
    /// A held asset with no return window is reported as a
    /// [`GapReason::MissingReturns`] gap.
    pub fn run(
        &self,
        holdings: &Holdings,
        data: &MarketData,
        target_alloc: Option<f64>,
    ) -> Result<AnalysisReport, ConfigError> {
        let risk = self.risk.calculate_metrics(&data.returns);
        let portfolio_risk = self.risk.portfolio_risk(&data.returns);
        let valuation = self.valuator.analyze(holdings, &data.prices, &risk);
        let signals = self
            .rebalancer
            .generate_signals(&valuation.current_allocations(), target_alloc)?;

        // Price problems first, then return problems, per asset.
        let mut gaps: Vec<DataGap> = valuation.gaps.iter().chain(&risk.gaps).cloned().collect();
        for asset in holdings.keys() {
            if !data.returns.contains_key(asset) {
                let gap = DataGap::new(asset.clone(), GapReason::MissingReturns);
                if !gaps.contains(&gap) {
                    gaps.push(gap);
                }
            }
        }
        gaps.sort_by(|a, b| a.asset.cmp(&b.asset));

        let mut degeneracies: Vec<Degeneracy> = risk
            .degeneracies
            .iter()
            .chain(&valuation.degeneracies)
            .cloned()
            .collect();
        degeneracies.sort();

        let rebalance = execute_report(valuation, signals);
        info!(
            "analysis: {} valued, {} scored, {} trade(s), {} gap(s)",
            rebalance.valuation.rows.len(),
            risk.len(),
            rebalance.trade_count(),
            gaps.len()
        );

        Ok(AnalysisReport {
            risk,
            portfolio_risk,
            rebalance,
            gaps,
            degeneracies,
        })
    }

    /// Fetch market data for the held assets, then [`run`](Self::run).
    ///
    /// A failed feed is an error. A partial feed still produces a report,
    /// with the feed's gaps merged into it.
    pub fn run_with_feed<F: MarketFeed + ?Sized>(
        &self,
        feed: &F,
        holdings: &Holdings,
        target_alloc: Option<f64>,
    ) -> Result<AnalysisReport, RunError> {
        let mut assets: Vec<AssetId> = holdings.keys().cloned().collect();
        assets.sort();

        let (data, feed_gaps) = feed.fetch(&assets).into_parts()?;
        let mut report = self.run(holdings, &data, target_alloc)?;

        for gap in feed_gaps {
            if !report.gaps.contains(&gap) {
                report.gaps.push(gap);
            }
        }
        report.gaps.sort_by(|a, b| a.asset.cmp(&b.asset));
        Ok(report)
    }
}

/// Why [`Analyzer::run_with_feed`] produced no report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
