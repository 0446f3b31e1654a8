//! Price/return feed seam.
//!
//! Live market data is fetched by an external collaborator. The analytics
//! core only consumes what a [`MarketFeed`] returns, and the outcome always
//! says whether the data is complete, partial (with a reason per missing
//! asset) or absent. The core never substitutes fallback numbers.

use crate::error::{DataGap, FeedError, GapReason};
use crate::risk::MIN_OBSERVATIONS;
use crate::types::{AssetId, PriceSnapshot, ReturnWindow};

/// Prices and return windows for one analysis run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketData {
    #[cfg_attr(feature = "serde", serde(default))]
    pub prices: PriceSnapshot,
    #[cfg_attr(feature = "serde", serde(default))]
    pub returns: ReturnWindow,
}

impl MarketData {
    pub fn new(prices: PriceSnapshot, returns: ReturnWindow) -> Self {
        Self { prices, returns }
    }

    /// Gaps for `assets` that lack a price or enough return history.
    pub fn gaps_for(&self, assets: &[AssetId]) -> Vec<DataGap> {
        let mut gaps = Vec::new();
        for asset in assets {
            if !self.prices.contains_key(asset) {
                gaps.push(DataGap::new(asset.clone(), GapReason::MissingPrice));
            }
            match self.returns.get(asset).map(Vec::len) {
                None | Some(0) => {
                    gaps.push(DataGap::new(asset.clone(), GapReason::MissingReturns));
                }
                Some(n) if n < MIN_OBSERVATIONS => gaps.push(DataGap::new(
                    asset.clone(),
                    GapReason::InsufficientReturns {
                        observations: n,
                        required: MIN_OBSERVATIONS,
                    },
                )),
                Some(_) => {}
            }
        }
        gaps
    }
}

/// Result of one fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedOutcome {
    /// Every requested asset has a price and a usable return window.
    Complete(MarketData),
    /// Some assets are missing data; `gaps` says which and why.
    Partial { data: MarketData, gaps: Vec<DataGap> },
    /// Nothing usable was delivered.
    Failed(FeedError),
}

impl FeedOutcome {
    /// Classify `data` against the requested assets.
    pub fn classify(data: MarketData, assets: &[AssetId]) -> Self {
        let gaps = data.gaps_for(assets);
        if gaps.is_empty() {
            FeedOutcome::Complete(data)
        } else {
            FeedOutcome::Partial { data, gaps }
        }
    }

    /// Split into data and gaps, or the failure.
    pub fn into_parts(self) -> Result<(MarketData, Vec<DataGap>), FeedError> {
        match self {
            FeedOutcome::Complete(data) => Ok((data, Vec::new())),
            FeedOutcome::Partial { data, gaps } => Ok((data, gaps)),
            FeedOutcome::Failed(err) => Err(err),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, FeedOutcome::Complete(_))
    }
}

/// Source of prices and returns for a set of assets.
pub trait MarketFeed {
    fn fetch(&self, assets: &[AssetId]) -> FeedOutcome;
}

/// In-memory feed over a fixed [`MarketData`].
///
/// Returns only the requested assets. Useful for tests and for replaying a
/// snapshot captured elsewhere.
#[derive(Clone, Debug, Default)]
pub struct StaticFeed {
    data: MarketData,
}

impl StaticFeed {
    pub fn new(data: MarketData) -> Self {
        Self { data }
    }
}

impl MarketFeed for StaticFeed {
    fn fetch(&self, assets: &[AssetId]) -> FeedOutcome {
        if self.data.prices.is_empty() && self.data.returns.is_empty() {
            return FeedOutcome::Failed(FeedError::Unavailable("no market data loaded".into()));
        }

        let mut data = MarketData::default();
        for asset in assets {
            if let Some(&p) = self.data.prices.get(asset) {
                data.prices.insert(asset.clone(), p);
            }
            if let Some(r) = self.data.returns.get(asset) {
                data.returns.insert(asset.clone(), r.clone());
            }
        }
        FeedOutcome::classify(data, assets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<AssetId> {
        names.iter().map(|&n| AssetId::from(n)).collect()
    }

    fn sample() -> MarketData {
        let mut data = MarketData::default();
        data.prices.insert(AssetId::from("A"), 10.0);
        data.prices.insert(AssetId::from("B"), 20.0);
        data.returns.insert(AssetId::from("A"), vec![0.01, -0.01]);
        data.returns.insert(AssetId::from("B"), vec![0.02]);
        data
    }

    #[test]
    fn complete_when_everything_present() {
        let outcome = StaticFeed::new(sample()).fetch(&ids(&["A"]));
        assert!(outcome.is_complete());
        let (data, gaps) = outcome.into_parts().unwrap();
        assert_eq!(data.prices.len(), 1);
        assert!(gaps.is_empty());
    }

    #[test]
    fn partial_names_each_missing_asset() {
        let outcome = StaticFeed::new(sample()).fetch(&ids(&["A", "B", "C"]));
        let FeedOutcome::Partial { gaps, .. } = outcome else {
            panic!("expected partial outcome");
        };
        assert_eq!(
            gaps,
            vec![
                DataGap::new(
                    "B",
                    GapReason::InsufficientReturns {
                        observations: 1,
                        required: 2
                    }
                ),
                DataGap::new("C", GapReason::MissingPrice),
                DataGap::new("C", GapReason::MissingReturns),
            ]
        );
    }

    #[test]
    fn empty_feed_fails() {
        let outcome = StaticFeed::default().fetch(&ids(&["A"]));
        assert!(matches!(outcome, FeedOutcome::Failed(FeedError::Unavailable(_))));
        assert!(outcome.into_parts().is_err());
    }

    #[test]
    fn unrequested_assets_are_dropped() {
        let (data, _) = StaticFeed::new(sample())
            .fetch(&ids(&["B"]))
            .into_parts()
            .unwrap();
        assert!(!data.prices.contains_key("A"));
        assert!(!data.returns.contains_key("A"));
    }
}
