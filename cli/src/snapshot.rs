//! Market snapshot file (snapshot.json) loading, exposed as a feed.
//!
//! The snapshot is produced by whatever fetches live data. This module only
//! reads it; it never fills in missing prices or returns.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use folioscope::{
    AssetId, FeedError, FeedOutcome, MarketData, MarketFeed, PriceSnapshot, ReturnWindow,
    StaticFeed,
};
use log::warn;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Prices and return windows captured at one point in time.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    /// Free-form origin label, e.g. the data vendor.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub prices: BTreeMap<String, f64>,
    /// Periodic fractional returns, most recent last.
    #[serde(default)]
    pub returns: BTreeMap<String, Vec<f64>>,
}

impl Snapshot {
    /// Load and validate a snapshot.json file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::SnapshotRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Structural checks only. Bad individual prices are reported per asset
    /// by the valuator, not rejected here.
    fn validate(&self) -> Result<()> {
        if self
            .prices
            .keys()
            .chain(self.returns.keys())
            .any(|k| k.trim().is_empty())
        {
            return Err(Error::Snapshot("empty asset id".into()));
        }
        Ok(())
    }

    /// Age of the snapshot relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.timestamp)
    }

    /// Warn if the snapshot is older than `max_age_secs`.
    pub fn check_freshness(&self, now: DateTime<Utc>, max_age_secs: u64) -> bool {
        let age = self.age(now);
        let fresh = age.num_seconds() <= max_age_secs as i64;
        if !fresh {
            warn!(
                "snapshot from {} is {}s old (limit {}s); prices may be stale",
                self.timestamp,
                age.num_seconds(),
                max_age_secs
            );
        }
        fresh
    }

    /// Convert to the analytics input type.
    pub fn market_data(&self) -> MarketData {
        let prices: PriceSnapshot = self
            .prices
            .iter()
            .map(|(id, &p)| (AssetId::from(id.as_str()), p))
            .collect();
        let returns: ReturnWindow = self
            .returns
            .iter()
            .map(|(id, r)| (AssetId::from(id.as_str()), r.clone()))
            .collect();
        MarketData::new(prices, returns)
    }
}

/// Feed backed by a loaded [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotFeed {
    snapshot: Snapshot,
}

impl SnapshotFeed {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl MarketFeed for SnapshotFeed {
    fn fetch(&self, assets: &[AssetId]) -> FeedOutcome {
        if self.snapshot.prices.is_empty() && self.snapshot.returns.is_empty() {
            return FeedOutcome::Failed(FeedError::Unavailable(format!(
                "snapshot from {} contains no market data",
                self.snapshot.timestamp
            )));
        }

        StaticFeed::new(self.snapshot.market_data()).fetch(assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> &'static str {
        r#"{
            "timestamp": "2026-02-09T15:30:00Z",
            "source": "yahoo",
            "prices": { "AAPL": 255.80, "TCS.NS": 4185.20 },
            "returns": {
                "AAPL": [0.0012, -0.0031, 0.0008, 0.0021, -0.0007],
                "TCS.NS": [0.0004]
            }
        }"#
    }

    fn ids(names: &[&str]) -> Vec<AssetId> {
        names.iter().map(|&n| AssetId::from(n)).collect()
    }

    #[test]
    fn parse_valid_snapshot() {
        let snap = Snapshot::from_json(valid_json()).unwrap();
        assert_eq!(snap.prices.len(), 2);
        assert_eq!(snap.returns["AAPL"].len(), 5);
        assert_eq!(snap.source.as_deref(), Some("yahoo"));
    }

    #[test]
    fn reject_empty_asset_id() {
        let json = r#"{"timestamp":"2026-01-01T00:00:00Z","prices":{"":1.0}}"#;
        assert!(Snapshot::from_json(json).is_err());
    }

    #[test]
    fn reject_missing_timestamp() {
        assert!(Snapshot::from_json(r#"{"prices":{"A":1.0}}"#).is_err());
    }

    #[test]
    fn freshness() {
        let snap = Snapshot::from_json(valid_json()).unwrap();
        let now: DateTime<Utc> = "2026-02-09T16:30:00Z".parse().unwrap();
        assert!(snap.check_freshness(now, 3600));
        assert!(!snap.check_freshness(now, 60));
    }

    #[test]
    fn feed_reports_short_history() {
        let feed = SnapshotFeed::new(Snapshot::from_json(valid_json()).unwrap());
        let outcome = feed.fetch(&ids(&["AAPL", "TCS.NS"]));
        let (data, gaps) = outcome.into_parts().unwrap();
        assert_eq!(data.prices.len(), 2);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].asset.as_str(), "TCS.NS");
    }

    #[test]
    fn empty_snapshot_is_a_feed_failure() {
        let snap = Snapshot::from_json(r#"{"timestamp":"2026-01-01T00:00:00Z"}"#).unwrap();
        let outcome = SnapshotFeed::new(snap).fetch(&ids(&["AAPL"]));
        assert!(matches!(outcome, FeedOutcome::Failed(_)));
    }
}
