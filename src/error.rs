//! Error taxonomy.
//!
//! Only whole-run problems are `Err` values: an invalid configuration or a
//! feed that delivered nothing. Everything that concerns a single asset is
//! recovered locally and carried in the result as a [`DataGap`] or a
//! [`Degeneracy`].

use std::fmt;

use crate::types::AssetId;

/// Invalid [`AnalyticsConfig`](crate::AnalyticsConfig) field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite and > 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be in (0, 100), got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("{lower} ({lower_value}) must be below {upper} ({upper_value})")]
    Misordered {
        lower: &'static str,
        lower_value: f64,
        upper: &'static str,
        upper_value: f64,
    },

    #[error("target allocation must be in (0, 100], got {0}")]
    TargetAllocation(f64),
}

/// Total failure of the price/return feed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeedError {
    #[error("feed unavailable: {0}")]
    Unavailable(String),

    #[error("malformed feed data: {0}")]
    Malformed(String),
}

/// Why an asset was left out of a table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapReason {
    /// Held, but the price snapshot has no entry for it.
    MissingPrice,
    /// Price is NaN or infinite.
    NonFinitePrice,
    /// Price is zero or negative.
    NonPositivePrice(f64),
    /// `shares × price` overflows to infinity.
    ValueOverflow,
    /// No return history at all.
    MissingReturns,
    /// Fewer observations than the variance-based metrics need.
    InsufficientReturns { observations: usize, required: usize },
    /// Return history contains NaN or infinity.
    NonFiniteReturn,
}

impl fmt::Display for GapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapReason::MissingPrice => write!(f, "missing price"),
            GapReason::NonFinitePrice => write!(f, "price is not a finite number"),
            GapReason::NonPositivePrice(p) => write!(f, "non-positive price {p}"),
            GapReason::ValueOverflow => write!(f, "position value overflows"),
            GapReason::MissingReturns => write!(f, "missing return history"),
            GapReason::InsufficientReturns {
                observations,
                required,
            } => write!(
                f,
                "insufficient data: {observations} return(s), need {required}"
            ),
            GapReason::NonFiniteReturn => write!(f, "non-finite return in history"),
        }
    }
}

/// An asset excluded from one table, with the reason.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DataGap {
    pub asset: AssetId,
    pub reason: GapReason,
}

impl DataGap {
    pub fn new(asset: impl Into<AssetId>, reason: GapReason) -> Self {
        Self {
            asset: asset.into(),
            reason,
        }
    }
}

impl fmt::Display for DataGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.asset, self.reason)
    }
}

/// A metric that is undefined for the given inputs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Degeneracy {
    /// Total portfolio value is zero; every allocation is undefined.
    ZeroTotalValue,
    /// Position values are finite but their sum is not; every allocation is
    /// undefined and the total saturates at `f64::MAX`.
    TotalValueOverflow,
    /// Return std-dev is zero; the Sharpe ratio is undefined.
    ZeroVolatility(AssetId),
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::ZeroTotalValue => {
                write!(f, "total value is zero: allocations undefined")
            }
            Degeneracy::TotalValueOverflow => {
                write!(f, "total value overflows: allocations undefined")
            }
            Degeneracy::ZeroVolatility(asset) => {
                write!(f, "{asset}: zero volatility: Sharpe ratio undefined")
            }
        }
    }
}
