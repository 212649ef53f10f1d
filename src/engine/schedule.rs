//! Yearly amortization schedule.
//!
//! Months are simulated with the level payment from `compute_monthly_payment`
//! and rolled up into one row per loan year.

use crate::domain::AmortizationPeriod;
use crate::engine::{PERIODS_PER_YEAR, ValuationError, compute_monthly_payment, monthly_rate};

/// Longest term a schedule is built for.
pub const MAX_SCHEDULE_YEARS: u32 = 100;

/// Build the yearly schedule for a loan.
///
/// The last row's ending balance is exactly `0.0`; any float residue is folded
/// into that year's principal so total principal equals the loan amount.
pub fn amortization_schedule(
    loan_amount: f64,
    annual_interest_rate_pct: f64,
    loan_term_years: u32,
) -> Result<Vec<AmortizationPeriod>, ValuationError> {
    let payment = compute_monthly_payment(loan_amount, annual_interest_rate_pct, loan_term_years)?;
    if loan_term_years > MAX_SCHEDULE_YEARS {
        return Err(ValuationError::invalid(
            "loan_term_years",
            format!("schedules are limited to {MAX_SCHEDULE_YEARS} years (got {loan_term_years})"),
        ));
    }
    let r = monthly_rate(annual_interest_rate_pct);

    let mut out = Vec::with_capacity(loan_term_years as usize);
    let mut balance = loan_amount;

    for year in 1..=loan_term_years {
        let beginning_balance = balance;
        let mut interest_paid = 0.0;
        let mut principal_paid = 0.0;

        for _ in 0..PERIODS_PER_YEAR {
            let interest = balance * r;
            let principal = payment - interest;
            balance -= principal;
            interest_paid += interest;
            principal_paid += principal;
        }

        if year == loan_term_years {
            principal_paid += balance;
            balance = 0.0;
        }

        out.push(AmortizationPeriod {
            year,
            beginning_balance,
            interest_paid,
            principal_paid,
            ending_balance: balance,
        });
    }

    Ok(out)
}

/// Total interest paid over the schedule.
pub fn total_interest(schedule: &[AmortizationPeriod]) -> f64 {
    schedule.iter().map(|p| p.interest_paid).sum()
}
