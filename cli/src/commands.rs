//! Command orchestration: config + snapshot → analysis → rendered output.

use std::path::{Path, PathBuf};

use chrono::Utc;
use folioscope::{AnalysisReport, Analyzer, persistence};
use log::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::snapshot::{Snapshot, SnapshotFeed};

/// Load a snapshot, warn on staleness and run the analysis.
///
/// `target_override` takes precedence over `[rebalance] target_alloc_pct`.
pub fn analyze(
    config: &Config,
    snapshot_path: &Path,
    target_override: Option<f64>,
) -> Result<AnalysisReport> {
    let snapshot = Snapshot::load(snapshot_path)?;
    analyze_snapshot(config, snapshot, target_override)
}

/// Same as [`analyze`] for an already loaded snapshot.
pub fn analyze_snapshot(
    config: &Config,
    snapshot: Snapshot,
    target_override: Option<f64>,
) -> Result<AnalysisReport> {
    snapshot.check_freshness(Utc::now(), config.output.max_snapshot_age_secs);
    info!(
        "snapshot {} ({}): {} price(s), {} return window(s)",
        snapshot.timestamp,
        snapshot.source.as_deref().unwrap_or("unknown source"),
        snapshot.prices.len(),
        snapshot.returns.len()
    );

    let analyzer = Analyzer::try_new(config.analytics)?;
    let target = target_override.or(config.rebalance.target_alloc_pct);
    let feed = SnapshotFeed::new(snapshot);
    Ok(analyzer.run_with_feed(&feed, &config.holdings(), target)?)
}

/// Full text report, or pretty JSON with `json`.
pub fn run_report(config: &Config, snapshot_path: &Path, json: bool) -> Result<String> {
    let report = analyze(config, snapshot_path, None)?;
    if json {
        persistence::to_json(&report)
            .map(|s| s + "\n")
            .map_err(Error::Serialize)
    } else {
        Ok(report.to_string())
    }
}

/// Per-asset risk table plus the portfolio figure.
pub fn run_risk(config: &Config, snapshot_path: &Path) -> Result<String> {
    let report = analyze(config, snapshot_path, None)?;
    let mut out = report.risk.to_string();
    for gap in &report.risk.gaps {
        out.push_str(&format!("  [GAP] {gap}\n"));
    }
    match report.portfolio_risk {
        Some(v) => out.push_str(&format!("PORTFOLIO RISK: {v:.2}%\n")),
        None => out.push_str("PORTFOLIO RISK: undefined\n"),
    }
    Ok(out)
}

/// Signals and trade lines only.
pub fn run_signals(config: &Config, snapshot_path: &Path, target: Option<f64>) -> Result<String> {
    let report = analyze(config, snapshot_path, target)?;
    if report.signals().is_empty() {
        return Ok("No signals: no asset has a defined allocation.\n".into());
    }

    let mut out = String::new();
    for signal in report.signals() {
        out.push_str(&format!("{signal}\n"));
    }
    out.push('\n');
    if report.trades().is_empty() {
        out.push_str("No rebalancing needed.\n");
    } else {
        for line in report.trades() {
            out.push_str(line);
            out.push('\n');
        }
    }
    Ok(out)
}

/// What `export` writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// The whole report as pretty JSON.
    #[default]
    Json,
    /// The signal table as CSV.
    Csv,
}

impl ExportFormat {
    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Write the report in `format`. Without `out`, the file lands in the
/// configured export directory, named after the current UTC time.
pub fn run_export(
    config: &Config,
    snapshot_path: &Path,
    out: Option<PathBuf>,
    format: ExportFormat,
) -> Result<PathBuf> {
    let report = analyze(config, snapshot_path, None)?;
    let path = out.unwrap_or_else(|| {
        config.export_path(&format!(
            "report-{}.{}",
            Utc::now().format("%Y%m%dT%H%M%SZ"),
            format.extension()
        ))
    });

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| Error::Export {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    let written = match format {
        ExportFormat::Json => persistence::save_report(&report, &path),
        ExportFormat::Csv => persistence::save_signals_csv(report.signals(), &path),
    };
    written.map_err(|e| Error::Export {
        path: path.clone(),
        source: e,
    })?;
    info!("report written to {}", path.display());
    Ok(path)
}
