//! CSV exports (batch results, amortization schedule).
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{AmortizationPeriod, DealOutcome, Edition};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    id: &'a str,
    purchase_price: f64,
    down_payment_pct: f64,
    interest_rate_pct: f64,
    loan_term_years: u32,
    noi: f64,
    down_payment: f64,
    loan_amount: f64,
    monthly_payment: f64,
    annual_debt_service: f64,
    cap_rate_pct: f64,
    cash_on_cash_return_pct: f64,
    dscr: f64,
    annual_profit: f64,
    rating: &'static str,
    message: &'static str,
}

/// Write per-deal results to a CSV file.
pub fn write_results_csv(path: &Path, outcomes: &[DealOutcome], edition: Edition) -> Result<(), AppError> {
    let writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(writer, outcomes, edition)?;
    tracing::info!(path = %path.display(), rows = outcomes.len(), "results exported");
    Ok(())
}

fn write_results<W: Write>(mut writer: csv::Writer<W>, outcomes: &[DealOutcome], edition: Edition) -> Result<(), AppError> {
    for o in outcomes {
        let i = &o.deal.inputs;
        let r = &o.result;
        writer
            .serialize(ResultRow {
                id: &o.deal.id,
                purchase_price: i.purchase_price,
                down_payment_pct: i.down_payment_pct,
                interest_rate_pct: i.annual_interest_rate_pct,
                loan_term_years: i.loan_term_years,
                noi: i.net_operating_income,
                down_payment: r.down_payment,
                loan_amount: r.loan_amount,
                monthly_payment: r.monthly_payment,
                annual_debt_service: r.annual_debt_service,
                cap_rate_pct: r.cap_rate_pct,
                cash_on_cash_return_pct: r.cash_on_cash_return_pct,
                dscr: r.debt_service_coverage_ratio,
                annual_profit: r.annual_profit,
                rating: r.rating.display_name(),
                message: r.rating.message(edition),
            })
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

/// Write the yearly amortization schedule to a CSV file.
pub fn write_schedule_csv(path: &Path, schedule: &[AmortizationPeriod]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create schedule CSV '{}': {e}", path.display())))?;
    for period in schedule {
        writer
            .serialize(period)
            .map_err(|e| AppError::new(2, format!("Failed to write schedule CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush schedule CSV: {e}")))?;
    tracing::info!(path = %path.display(), rows = schedule.len(), "schedule exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Deal, FinancingInputs};
    use crate::engine::{amortization_schedule, compute_financing_result};

    #[test]
    fn results_csv_has_header_and_one_row_per_deal() {
        let inputs = FinancingInputs {
            purchase_price: 1_000_000.0,
            down_payment_pct: 20.0,
            annual_interest_rate_pct: 5.0,
            loan_term_years: 20,
            net_operating_income: 100_000.0,
        };
        let outcome = DealOutcome {
            deal: Deal { id: "inn".to_string(), inputs },
            result: compute_financing_result(&inputs).unwrap(),
        };

        let mut buf = Vec::new();
        write_results(csv::Writer::from_writer(&mut buf), &[outcome], Edition::Financing).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id,purchase_price,down_payment_pct"));
        assert!(lines[0].ends_with("rating,message"));
        assert!(lines[1].starts_with("inn,1000000.0,20.0,5.0,20,"));
        assert!(lines[1].contains(",Caution,"));
    }

    #[test]
    fn schedule_csv_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedule.csv");
        let schedule = amortization_schedule(100_000.0, 4.0, 5).unwrap();
        write_schedule_csv(&path, &schedule).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<AmortizationPeriod> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[4].ending_balance, 0.0);
        assert_eq!(rows[0].year, 1);
    }
}
