//! Level-payment amortizing loan math.
//!
//! ```text
//! r = (annual_pct / 100) / 12
//! n = years * 12
//! payment = L * r * (1 + r)^n / ((1 + r)^n - 1)     (r > 0)
//!         (evaluated as exp(n * ln(1 + r)) to keep tiny rates accurate)
//! payment = L / n                                   (r = 0)
//! ```

use crate::engine::ValuationError;

/// Months per year; both the periodic rate and the payment count use it.
pub const PERIODS_PER_YEAR: u32 = 12;

/// Convert an annual percentage rate into the monthly periodic rate.
pub fn monthly_rate(annual_interest_rate_pct: f64) -> f64 {
    (annual_interest_rate_pct / 100.0) / f64::from(PERIODS_PER_YEAR)
}

/// Total number of monthly payments over the term.
pub fn payment_count(loan_term_years: u32) -> u64 {
    u64::from(loan_term_years) * u64::from(PERIODS_PER_YEAR)
}

/// Monthly payment for a fully amortizing loan.
///
/// A zero loan amount yields `0.0` on both branches. Zero terms, negative or
/// non-finite amounts/rates are rejected rather than producing NaN/Infinity.
pub fn compute_monthly_payment(
    loan_amount: f64,
    annual_interest_rate_pct: f64,
    loan_term_years: u32,
) -> Result<f64, ValuationError> {
    if !(loan_amount.is_finite() && loan_amount >= 0.0) {
        return Err(ValuationError::invalid(
            "loan_amount",
            format!("must be a finite, non-negative amount (got {loan_amount})"),
        ));
    }
    if !(annual_interest_rate_pct.is_finite() && annual_interest_rate_pct >= 0.0) {
        return Err(ValuationError::invalid(
            "annual_interest_rate_pct",
            format!("must be a finite, non-negative rate (got {annual_interest_rate_pct})"),
        ));
    }
    if loan_term_years == 0 {
        return Err(ValuationError::invalid("loan_term_years", "must be at least 1 year"));
    }

    let r = monthly_rate(annual_interest_rate_pct);
    let n = payment_count(loan_term_years) as f64;

    if r > 0.0 {
        // (1 + r)^n via ln_1p/exp_m1 so tiny rates don't lose their digits
        // to the rounding of `1 + r`.
        let log_growth = n * r.ln_1p();
        let growth = log_growth.exp();
        let denom = log_growth.exp_m1();
        // Overflowing growth: the payment tends to L * r.
        if !growth.is_finite() {
            return Ok(loan_amount * r);
        }
        if denom >= f64::MIN_POSITIVE {
            return Ok(loan_amount * r * (growth / denom));
        }
    }

    Ok(loan_amount / n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_amortization_matches_formula() {
        let payment = compute_monthly_payment(800_000.0, 5.0, 20).unwrap();
        assert!((payment - 5_279.65).abs() < 0.005, "got {payment}");
        assert!((payment * 12.0 - 63_355.75).abs() < 0.01);
    }

    #[test]
    fn thirty_year_mortgage_reference_value() {
        // Textbook: 200k at 6% over 30y is 1199.10/month.
        let payment = compute_monthly_payment(200_000.0, 6.0, 30).unwrap();
        assert!((payment - 1_199.10).abs() < 0.005, "got {payment}");
    }

    #[test]
    fn zero_rate_is_straight_line() {
        let payment = compute_monthly_payment(600_000.0, 0.0, 25).unwrap();
        assert_eq!(payment, 600_000.0 / 300.0);
    }

    #[test]
    fn zero_loan_pays_nothing() {
        assert_eq!(compute_monthly_payment(0.0, 7.5, 30).unwrap(), 0.0);
        assert_eq!(compute_monthly_payment(0.0, 0.0, 5).unwrap(), 0.0);
    }

    #[test]
    fn vanishing_rate_falls_back_to_straight_line() {
        let payment = compute_monthly_payment(120_000.0, 1e-300, 10).unwrap();
        assert!(payment.is_finite());
        assert!((payment - 1_000.0).abs() < 1e-9);
    }

    #[test]
    fn tiny_rates_converge_to_straight_line() {
        let payment = compute_monthly_payment(240_000.0, 1.2e-12, 20).unwrap();
        assert!((payment - 1_000.0).abs() < 1e-6, "{payment}");

        let payment = compute_monthly_payment(240_000.0, 1e-9, 20).unwrap();
        assert!(payment > 1_000.0 && payment - 1_000.0 < 1e-6, "{payment}");
    }

    #[test]
    fn huge_terms_stay_finite() {
        let payment = compute_monthly_payment(100_000.0, 10.0, u32::MAX).unwrap();
        assert!(payment.is_finite());
        assert!((payment - 100_000.0 * monthly_rate(10.0)).abs() < 1e-6);
    }

    #[test]
    fn rejects_zero_term_and_bad_domains() {
        assert_eq!(
            compute_monthly_payment(1.0, 5.0, 0).unwrap_err().field(),
            "loan_term_years"
        );
        assert_eq!(
            compute_monthly_payment(-1.0, 5.0, 10).unwrap_err().field(),
            "loan_amount"
        );
        assert_eq!(
            compute_monthly_payment(1.0, -0.5, 10).unwrap_err().field(),
            "annual_interest_rate_pct"
        );
        assert!(compute_monthly_payment(f64::NAN, 5.0, 10).is_err());
        assert!(compute_monthly_payment(1.0, f64::INFINITY, 10).is_err());
    }
}
