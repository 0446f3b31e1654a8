//! # folioscope
//!
//! Deterministic portfolio analytics: per-asset risk metrics, valuation with
//! allocation checks, and threshold rebalancing signals.
//!
//! ## Features
//!
//! - **Risk engine**: annualized volatility, Sharpe ratio, historical VaR-95,
//!   LOW / MEDIUM / HIGH risk level, aggregate portfolio risk
//! - **Valuator**: value and allocation per asset, over/under-allocation flags
//! - **Rebalancer**: REDUCE / BUY / HOLD per asset and a rendered trade list
//! - **Explicit gaps**: missing or short data excludes only the affected asset
//!   and is reported, never zero-filled; undefined metrics are `None`
//! - **Injected thresholds**: every constant lives in [`AnalyticsConfig`]
//!
//! ## Quick Start
//!
//! ```
//! use folioscope::{Action, Analyzer, AssetId, Holdings, MarketData};
//!
//! let mut holdings = Holdings::default();
//! holdings.insert(AssetId::from("X"), 10);
//! holdings.insert(AssetId::from("Y"), 10);
//!
//! let mut data = MarketData::default();
//! data.prices.insert(AssetId::from("X"), 100.0);
//! data.prices.insert(AssetId::from("Y"), 100.0);
//!
//! let report = Analyzer::default().run(&holdings, &data, None).unwrap();
//!
//! assert_eq!(report.valuation().total_value, 2000.0);
//! assert_eq!(report.valuation().over_allocated.len(), 2); // 50% > 30%
//! assert!(report.signals().iter().all(|s| s.action == Action::Reduce));
//! ```
//!
//! ## Risk Metrics
//!
//! For a return series `r` with sample std-dev `s` and `P` periods per year
//! (252 by default):
//!
//! | Metric | Definition |
//! |--------|------------|
//! | Volatility | `s × √P × 100` |
//! | Sharpe | `mean(r) × P / (s × √P)`, `None` when `s == 0` |
//! | VaR-95 | 5th percentile of `r` × 100, linear interpolation |
//! | Risk level | `< 20` LOW, `< 35` MEDIUM, else HIGH |
//!
//! ```
//! use folioscope::{RiskEngine, RiskLevel};
//!
//! let record = RiskEngine::default()
//!     .asset_metrics(&[0.01, 0.01, 0.01, 0.01])
//!     .unwrap();
//!
//! assert_eq!(record.volatility_pct, 0.0);
//! assert_eq!(record.sharpe, None); // undefined, not infinite
//! assert_eq!(record.level, RiskLevel::Low);
//! ```
//!
//! ## Rebalancing
//!
//! ```
//! use folioscope::{Action, AssetId, Rebalancer};
//!
//! let current = [(AssetId::from("X"), 35.0), (AssetId::from("Y"), 15.0)];
//! let signals = Rebalancer::default().generate_signals(&current, None).unwrap();
//!
//! assert_eq!(signals[0].action, Action::Reduce);
//! assert_eq!(signals[1].action, Action::Buy);
//! assert_eq!(signals[1].trade_line().unwrap(), "BUY Y: 15.0% → 50.0%");
//! ```

pub mod config;
mod error;
pub mod feed;
#[cfg(feature = "persistence")]
pub mod persistence;
mod pipeline;
pub mod rebalance;
mod report;
pub mod risk;
pub mod stats;
#[cfg(feature = "parallel")]
pub mod sweep;
mod types;
pub mod valuation;

// Re-export public API
pub use config::AnalyticsConfig;
pub use error::{ConfigError, DataGap, Degeneracy, FeedError, GapReason};
pub use feed::{FeedOutcome, MarketData, MarketFeed, StaticFeed};
pub use pipeline::{AnalysisReport, Analyzer, RunError};
pub use rebalance::{Rebalancer, Signal};
pub use report::{RebalanceReport, execute_report};
pub use risk::{RiskEngine, RiskRecord, RiskTable};
pub use types::{Action, AssetId, Holdings, PriceSnapshot, ReturnWindow, RiskLevel, round2};
pub use valuation::{PortfolioValuator, Valuation, ValuationRow};
