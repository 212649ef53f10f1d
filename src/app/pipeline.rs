//! Shared valuation workflow used by both CLI and TUI front-ends.
//!
//! inputs -> engine result -> amortization schedule
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use rayon::prelude::*;

use crate::domain::{AmortizationPeriod, Deal, DealOutcome, FinancingInputs, FinancingResult};
use crate::engine::{MAX_SCHEDULE_YEARS, amortization_schedule, compute_financing_result};
use crate::error::AppError;
use crate::io::ingest::RowError;

/// All computed outputs for one set of inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationRun {
    pub inputs: FinancingInputs,
    pub result: FinancingResult,
    pub schedule: Vec<AmortizationPeriod>,
}

/// Evaluate one deal.
///
/// Terms longer than `MAX_SCHEDULE_YEARS` still get a result; their schedule
/// is left empty.
pub fn run_valuation(inputs: &FinancingInputs) -> Result<ValuationRun, AppError> {
    let result = compute_financing_result(inputs)?;
    let schedule = if inputs.loan_term_years <= MAX_SCHEDULE_YEARS {
        amortization_schedule(
            result.loan_amount,
            inputs.annual_interest_rate_pct,
            inputs.loan_term_years,
        )?
    } else {
        tracing::debug!(term = inputs.loan_term_years, "term exceeds schedule limit; schedule omitted");
        Vec::new()
    };

    tracing::debug!(
        loan_amount = result.loan_amount,
        monthly_payment = result.monthly_payment,
        annual_profit = result.annual_profit,
        rating = result.rating.display_name(),
        "valuation computed"
    );

    Ok(ValuationRun {
        inputs: *inputs,
        result,
        schedule,
    })
}

/// Batch output: evaluated deals plus per-deal rejections.
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub outcomes: Vec<DealOutcome>,
    pub rejected: Vec<RowError>,
}

/// Evaluate deals in parallel, keeping input order.
///
/// `lines` holds each deal's CSV line number for error reporting; when it is
/// shorter than `deals` the 1-based index is used instead.
pub fn run_batch(deals: &[Deal], lines: &[usize]) -> BatchOutput {
    let evaluated: Vec<_> = deals
        .par_iter()
        .map(|deal| compute_financing_result(&deal.inputs))
        .collect();

    let mut out = BatchOutput::default();
    for (idx, (deal, res)) in deals.iter().zip(evaluated).enumerate() {
        match res {
            Ok(result) => out.outcomes.push(DealOutcome {
                deal: deal.clone(),
                result,
            }),
            Err(err) => {
                tracing::warn!(id = %deal.id, error = %err, "deal rejected");
                out.rejected.push(RowError {
                    line: lines.get(idx).copied().unwrap_or(idx + 1),
                    id: Some(deal.id.clone()),
                    message: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        evaluated = out.outcomes.len(),
        rejected = out.rejected.len(),
        "batch complete"
    );
    out
}
