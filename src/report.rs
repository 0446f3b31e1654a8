//! Rebalance report: valuation + signals + rendered trade list.

use std::fmt;

use crate::rebalance::Signal;
use crate::types::Action;
use crate::valuation::Valuation;

/// Combined valuation and signal list with the trades they imply.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RebalanceReport {
    pub valuation: Valuation,
    pub signals: Vec<Signal>,
    /// One line per non-HOLD signal, in signal order.
    pub trades: Vec<String>,
}

impl RebalanceReport {
    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Signals that call for a trade.
    pub fn actionable(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter().filter(|s| s.action != Action::Hold)
    }
}

/// Compose a valuation and its signals into a report.
pub fn execute_report(valuation: Valuation, signals: Vec<Signal>) -> RebalanceReport {
    let trades = signals.iter().filter_map(Signal::trade_line).collect();
    RebalanceReport {
        valuation,
        signals,
        trades,
    }
}

impl fmt::Display for RebalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.valuation)?;
        writeln!(f)?;
        writeln!(f, "REBALANCING SIGNALS:")?;
        writeln!(
            f,
            "  {:<12} {:>10} {:>10}  {}",
            "Asset", "Current %", "Target %", "Action"
        )?;
        for signal in &self.signals {
            writeln!(f, "  {signal}")?;
        }
        writeln!(f)?;
        writeln!(f, "RECOMMENDED TRADES ({} trades):", self.trade_count())?;
        for line in &self.trades {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}
