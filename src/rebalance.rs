//! Threshold rebalancer: current allocations → REDUCE / BUY / HOLD signals.
//!
//! Rules, evaluated per asset in ascending asset id order:
//!
//! 1. `current > max_alloc` → REDUCE to the target allocation
//! 2. `current < buy_below` → BUY up to the target allocation
//! 3. otherwise → HOLD at the current allocation
//!
//! The target defaults to an equal-weight split `100 / N`, where `N` is the
//! number of assets passed to this call.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, warn};

use crate::config::AnalyticsConfig;
use crate::error::ConfigError;
use crate::types::{Action, AssetId};

/// Recommendation for one asset.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signal {
    pub asset: AssetId,
    pub current_pct: f64,
    pub target_pct: f64,
    pub action: Action,
}

impl Signal {
    /// `"ACTION asset: current% → target%"`, or `None` for HOLD.
    pub fn trade_line(&self) -> Option<String> {
        if self.action == Action::Hold {
            return None;
        }
        Some(format!(
            "{} {}: {:.1}% → {:.1}%",
            self.action, self.asset, self.current_pct, self.target_pct
        ))
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:>10.2} {:>10.2}  {}",
            self.asset, self.current_pct, self.target_pct, self.action
        )
    }
}

/// Emits rebalancing signals from current allocations.
#[derive(Debug, Clone)]
pub struct Rebalancer {
    config: AnalyticsConfig,
}

impl Rebalancer {
    /// Create a rebalancer from a config, rejecting invalid configs.
    pub fn try_new(config: AnalyticsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Equal-weight target for `n` assets, `None` when `n == 0`.
    pub fn equal_weight(n: usize) -> Option<f64> {
        (n > 0).then(|| 100.0 / n as f64)
    }

    /// Generate one signal per asset.
    ///
    /// `target_alloc` overrides the equal-weight default and must lie in
    /// `(0, 100]`. A repeated asset keeps its last finite allocation.
    /// Non-finite allocations are skipped with a warning and do not count
    /// towards `N`.
    pub fn generate_signals(
        &self,
        current: &[(AssetId, f64)],
        target_alloc: Option<f64>,
    ) -> Result<Vec<Signal>, ConfigError> {
        if let Some(t) = target_alloc {
            if !(t.is_finite() && t > 0.0 && t <= 100.0) {
                return Err(ConfigError::TargetAllocation(t));
            }
        }

        let mut ordered: BTreeMap<&AssetId, f64> = BTreeMap::new();
        for (asset, pct) in current {
            if pct.is_finite() {
                ordered.insert(asset, *pct);
            } else {
                warn!("{asset}: non-finite allocation {pct}, no signal emitted");
            }
        }

        let Some(target) = target_alloc.or_else(|| Self::equal_weight(ordered.len())) else {
            return Ok(Vec::new());
        };

        let t = &self.config.rebalance;
        let signals: Vec<Signal> = ordered
            .into_iter()
            .map(|(asset, pct)| {
                let (action, target_pct) = if pct > t.max_alloc_pct {
                    (Action::Reduce, target)
                } else if pct < t.buy_below_pct {
                    (Action::Buy, target)
                } else {
                    (Action::Hold, pct)
                };
                Signal {
                    asset: asset.clone(),
                    current_pct: pct,
                    target_pct,
                    action,
                }
            })
            .collect();

        debug!(
            "{} signal(s), target={target:.2}%, {} trade(s)",
            signals.len(),
            signals.iter().filter(|s| s.action != Action::Hold).count()
        );
        Ok(signals)
    }
}

impl Default for Rebalancer {
    fn default() -> Self {
        Self {
            config: AnalyticsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(entries: &[(&str, f64)]) -> Vec<(AssetId, f64)> {
        entries.iter().map(|&(a, p)| (AssetId::from(a), p)).collect()
    }

    #[test]
    fn reduce_buy_hold() {
        let signals = Rebalancer::default()
            .generate_signals(&alloc(&[("C", 25.0), ("A", 45.0), ("B", 30.0)]), None)
            .unwrap();
        // Ascending asset order regardless of input order
        let ids: Vec<&str> = signals.iter().map(|s| s.asset.as_str()).collect();
        assert_eq!(ids, ["A", "B", "C"]);

        let target = 100.0 / 3.0;
        assert_eq!(signals[0].action, Action::Reduce);
        assert!((signals[0].target_pct - target).abs() < 1e-12);
        // 30 is not > 30, and not < 20
        assert_eq!(signals[1].action, Action::Hold);
        assert_eq!(signals[1].target_pct, 30.0);
        assert_eq!(signals[2].action, Action::Hold);
        assert_eq!(signals[2].target_pct, 25.0);
    }

    #[test]
    fn buy_below_trigger() {
        let signals = Rebalancer::default()
            .generate_signals(&alloc(&[("A", 19.99), ("B", 20.0)]), None)
            .unwrap();
        assert_eq!(signals[0].action, Action::Buy);
        assert_eq!(signals[0].target_pct, 50.0);
        assert_eq!(signals[1].action, Action::Hold);
    }

    #[test]
    fn target_override() {
        let signals = Rebalancer::default()
            .generate_signals(&alloc(&[("A", 80.0), ("B", 20.0)]), Some(25.0))
            .unwrap();
        assert_eq!(signals[0].action, Action::Reduce);
        assert_eq!(signals[0].target_pct, 25.0);
    }

    #[test]
    fn invalid_target_override() {
        let r = Rebalancer::default();
        for t in [0.0, -1.0, 100.5, f64::NAN] {
            assert!(r.generate_signals(&alloc(&[("A", 100.0)]), Some(t)).is_err());
        }
    }

    #[test]
    fn non_finite_allocation_is_skipped() {
        let signals = Rebalancer::default()
            .generate_signals(&alloc(&[("A", f64::NAN), ("B", 10.0), ("C", f64::INFINITY)]), None)
            .unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].asset.as_str(), "B");
        // N counts only the usable allocations
        assert_eq!(signals[0].target_pct, 100.0);
    }

    #[test]
    fn empty_input_has_no_signals() {
        let signals = Rebalancer::default().generate_signals(&[], None).unwrap();
        assert!(signals.is_empty());
    }

    #[test]
    fn custom_max_alloc() {
        let mut config = AnalyticsConfig::default();
        config.rebalance.max_alloc_pct = 60.0;
        let signals = Rebalancer::try_new(config)
            .unwrap()
            .generate_signals(&alloc(&[("A", 55.0), ("B", 45.0)]), None)
            .unwrap();
        assert!(signals.iter().all(|s| s.action == Action::Hold));
    }

    #[test]
    fn trade_line_format() {
        let s = Signal {
            asset: AssetId::from("X"),
            current_pct: 35.0,
            target_pct: 50.0,
            action: Action::Reduce,
        };
        assert_eq!(s.trade_line().unwrap(), "REDUCE X: 35.0% → 50.0%");

        let hold = Signal {
            action: Action::Hold,
            ..s
        };
        assert!(hold.trade_line().is_none());
    }

    #[test]
    fn equal_weight() {
        assert_eq!(Rebalancer::equal_weight(0), None);
        assert_eq!(Rebalancer::equal_weight(4), Some(25.0));
    }
}
