//! Parallel analysis of independent portfolios.

use crate::error::ConfigError;
use crate::feed::MarketData;
use crate::pipeline::{AnalysisReport, Analyzer};
use crate::types::Holdings;

/// One portfolio to analyze: holdings, market data, optional target override.
#[derive(Clone, Debug, Default)]
pub struct RunInput {
    pub holdings: Holdings,
    pub data: MarketData,
    pub target_alloc: Option<f64>,
}

/// Analyze many portfolios in parallel.
///
/// Runs share nothing but the read-only analyzer, so no coordination is
/// needed. Results come back in input order.
///
/// # Example
///
/// ```ignore
/// use folioscope::{Analyzer, sweep::{analyze_many, RunInput}};
///
/// let reports = analyze_many(&Analyzer::default(), &inputs);
/// assert_eq!(reports.len(), inputs.len());
/// ```
#[cfg(feature = "parallel")]
pub fn analyze_many(
    analyzer: &Analyzer,
    inputs: &[RunInput],
) -> Vec<Result<AnalysisReport, ConfigError>> {
    use rayon::prelude::*;

    inputs
        .par_iter()
        .map(|input| analyzer.run(&input.holdings, &input.data, input.target_alloc))
        .collect()
}
