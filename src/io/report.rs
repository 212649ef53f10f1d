//! Read/write valuation report JSON files.
//!
//! A report is the "portable" record of one valuation:
//! - inputs and every computed metric
//! - the rating and its advisory copy for the chosen edition
//! - the yearly amortization schedule (for re-plotting with `hvcalc show`)

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::app::pipeline::ValuationRun;
use crate::domain::{AmortizationPeriod, Edition, FinancingInputs, FinancingResult};
use crate::engine::total_interest;
use crate::error::AppError;

pub const TOOL_NAME: &str = "hvcalc";

/// A saved report file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub edition: Edition,
    pub inputs: FinancingInputs,
    pub result: FinancingResult,
    pub rating_message: String,
    pub total_interest: f64,
    pub schedule: Vec<AmortizationPeriod>,
}

impl ValuationReport {
    pub fn from_run(run: &ValuationRun, edition: Edition) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            generated_at: Utc::now(),
            edition,
            inputs: run.inputs,
            result: run.result,
            rating_message: run.result.rating.message(edition).to_string(),
            total_interest: total_interest(&run.schedule),
            schedule: run.schedule.clone(),
        }
    }

    /// View the report as a run again (for formatting/plotting).
    pub fn to_run(&self) -> ValuationRun {
        ValuationRun {
            inputs: self.inputs,
            result: self.result,
            schedule: self.schedule.clone(),
        }
    }
}

/// Write a report JSON file.
pub fn write_report_json(path: &Path, report: &ValuationReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Read a report JSON file.
pub fn read_report_json(path: &Path) -> Result<ValuationReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    let report: ValuationReport =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))?;
    Ok(report)
}

/// Write a timestamped report into `dir` (created if missing).
///
/// Never overwrites: a name collision gets a `_N` suffix.
pub fn write_report_into(dir: &Path, report: &ValuationReport) -> Result<PathBuf, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create report dir '{}': {e}", dir.display())))?;
    let stem = format!("{TOOL_NAME}_report_{}", Local::now().format("%Y%m%d_%H%M%S_%3f"));
    let mut path = dir.join(format!("{stem}.json"));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{stem}_{n}.json"));
        n += 1;
    }
    write_report_json(&path, report)?;
    Ok(path)
}
