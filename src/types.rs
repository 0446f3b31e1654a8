//! Core types: AssetId, Holdings, PriceSnapshot, ReturnWindow, RiskLevel, Action

use std::borrow::Borrow;
use std::fmt;

use rustc_hash::FxHashMap;

/// Ticker-like identifier of a tradable instrument.
///
/// Case-sensitive: `"aapl"` and `"AAPL"` are different assets.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Forward so width/alignment flags work in report tables
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Shares held per asset. Share counts are non-negative by construction.
pub type Holdings = FxHashMap<AssetId, u64>;

/// Latest known price per asset, one snapshot per run.
pub type PriceSnapshot = FxHashMap<AssetId, f64>;

/// Periodic fractional returns per asset, most recent last (0.0123 = +1.23%).
pub type ReturnWindow = FxHashMap<AssetId, Vec<f64>>;

/// Categorical risk bucket derived from annualized volatility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        };
        f.pad(s)
    }
}

/// Rebalancing action for one asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Action {
    Reduce,
    Buy,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Reduce => "REDUCE",
            Action::Buy => "BUY",
            Action::Hold => "HOLD",
        };
        f.pad(s)
    }
}

/// Render an optional metric, using `undefined` for `None`.
pub(crate) struct OrUndefined(pub Option<f64>);

impl fmt::Display for OrUndefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => {
                let prec = f.precision().unwrap_or(2);
                match f.width() {
                    Some(w) => write!(f, "{v:>w$.prec$}"),
                    None => write!(f, "{v:.prec$}"),
                }
            }
            None => f.pad("undefined"),
        }
    }
}

/// Round to 2 decimal places, the display precision of report tables.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_is_case_sensitive() {
        assert_ne!(AssetId::from("aapl"), AssetId::from("AAPL"));
        assert!(AssetId::from("AAPL") < AssetId::from("MSFT"));
    }

    #[test]
    fn asset_id_lookup_by_str() {
        let mut prices = PriceSnapshot::default();
        prices.insert(AssetId::from("TCS.NS"), 4185.20);
        assert_eq!(prices.get("TCS.NS"), Some(&4185.20));
    }

    #[test]
    fn display_labels() {
        assert_eq!(RiskLevel::Medium.to_string(), "MEDIUM");
        assert_eq!(Action::Reduce.to_string(), "REDUCE");
        assert_eq!(format!("{:<6}|", Action::Buy), "BUY   |");
    }

    #[test]
    fn or_undefined_rendering() {
        assert_eq!(format!("{}", OrUndefined(Some(1.234))), "1.23");
        assert_eq!(format!("{:>8.1}", OrUndefined(Some(1.26))), "     1.3");
        assert_eq!(format!("{}", OrUndefined(None)), "undefined");
        assert_eq!(format!("{:>10}", OrUndefined(None)), " undefined");
    }

    #[test]
    fn round2_half_away_from_zero() {
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(-1.005_1), -1.01);
    }
}
