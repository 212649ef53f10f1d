//! Deal metrics derived from financing inputs.
//!
//! DSCR and cash-on-cash are defined as `0.0` when their denominator
//! (annual debt service, down payment) is zero. Cap rate has no such guard;
//! `validate_inputs` guarantees a positive purchase price.

use crate::domain::{FinancingInputs, FinancingResult};
use crate::engine::{ValuationError, classify_rating, compute_monthly_payment};

/// Reject inputs for which the math is undefined.
///
/// Checks run in field order and the first failure is returned.
pub fn validate_inputs(inputs: &FinancingInputs) -> Result<(), ValuationError> {
    if !(inputs.purchase_price.is_finite() && inputs.purchase_price > 0.0) {
        return Err(ValuationError::invalid(
            "purchase_price",
            format!("must be a finite amount greater than zero (got {})", inputs.purchase_price),
        ));
    }
    if !(inputs.down_payment_pct.is_finite() && (0.0..=100.0).contains(&inputs.down_payment_pct)) {
        return Err(ValuationError::invalid(
            "down_payment_pct",
            format!("must be within [0, 100] (got {})", inputs.down_payment_pct),
        ));
    }
    if !(inputs.annual_interest_rate_pct.is_finite() && inputs.annual_interest_rate_pct >= 0.0) {
        return Err(ValuationError::invalid(
            "annual_interest_rate_pct",
            format!(
                "must be a finite, non-negative rate (got {})",
                inputs.annual_interest_rate_pct
            ),
        ));
    }
    if inputs.loan_term_years == 0 {
        return Err(ValuationError::invalid("loan_term_years", "must be at least 1 year"));
    }
    if !(inputs.net_operating_income.is_finite() && inputs.net_operating_income >= 0.0) {
        return Err(ValuationError::invalid(
            "net_operating_income",
            format!(
                "must be a finite, non-negative amount (got {})",
                inputs.net_operating_income
            ),
        ));
    }
    Ok(())
}

/// Compute every deal metric, or reject the inputs as a whole.
pub fn compute_financing_result(inputs: &FinancingInputs) -> Result<FinancingResult, ValuationError> {
    validate_inputs(inputs)?;

    let noi = inputs.net_operating_income;

    let down_payment = (inputs.down_payment_pct / 100.0) * inputs.purchase_price;
    let loan_amount = inputs.purchase_price - down_payment;
    let monthly_payment = compute_monthly_payment(
        loan_amount,
        inputs.annual_interest_rate_pct,
        inputs.loan_term_years,
    )?;
    let annual_debt_service = monthly_payment * 12.0;

    let debt_service_coverage_ratio = if annual_debt_service > 0.0 {
        noi / annual_debt_service
    } else {
        0.0
    };
    let cap_rate_pct = (noi / inputs.purchase_price) * 100.0;
    let cash_on_cash_return_pct = if down_payment > 0.0 {
        ((noi - annual_debt_service) / down_payment) * 100.0
    } else {
        0.0
    };
    let annual_profit = noi - annual_debt_service;

    let result = FinancingResult {
        down_payment,
        loan_amount,
        monthly_payment,
        annual_debt_service,
        cap_rate_pct,
        cash_on_cash_return_pct,
        debt_service_coverage_ratio,
        annual_profit,
        rating: classify_rating(annual_profit),
    };

    // Finite inputs can still overflow. Debt-side amounts scale with the
    // price; the remaining ratios have NOI in the numerator.
    let debt_side = [down_payment, loan_amount, monthly_payment, annual_debt_service];
    if !debt_side.iter().all(|v| v.is_finite()) {
        return Err(ValuationError::invalid(
            "purchase_price",
            "too large to compute a finite debt service",
        ));
    }
    if !all_finite(&result) {
        return Err(ValuationError::invalid(
            "net_operating_income",
            "too large relative to the price or debt service to compute finite ratios",
        ));
    }

    Ok(result)
}

fn all_finite(r: &FinancingResult) -> bool {
    [
        r.down_payment,
        r.loan_amount,
        r.monthly_payment,
        r.annual_debt_service,
        r.cap_rate_pct,
        r.cash_on_cash_return_pct,
        r.debt_service_coverage_ratio,
        r.annual_profit,
    ]
    .iter()
    .all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RatingTier;
    use proptest::prelude::*;

    fn base() -> FinancingInputs {
        FinancingInputs {
            purchase_price: 1_000_000.0,
            down_payment_pct: 20.0,
            annual_interest_rate_pct: 5.0,
            loan_term_years: 20,
            net_operating_income: 100_000.0,
        }
    }

    #[test]
    fn reference_deal_metrics() {
        let r = compute_financing_result(&base()).unwrap();
        assert_eq!(r.down_payment, 200_000.0);
        assert_eq!(r.loan_amount, 800_000.0);
        assert!((r.monthly_payment - 5_279.65).abs() < 0.005);
        assert!((r.annual_debt_service - 63_355.75).abs() < 0.01);
        assert!((r.cap_rate_pct - 10.0).abs() < 1e-12);
        assert!((r.debt_service_coverage_ratio - 1.5784).abs() < 1e-4);
        assert!((r.cash_on_cash_return_pct - 18.3221).abs() < 1e-4);
        assert!((r.annual_profit - 36_644.25).abs() < 0.01);
        assert_eq!(r.rating, RatingTier::Caution);
    }

    #[test]
    fn zero_interest_is_straight_line() {
        let inputs = FinancingInputs {
            annual_interest_rate_pct: 0.0,
            ..base()
        };
        let r = compute_financing_result(&inputs).unwrap();
        assert_eq!(r.monthly_payment, 800_000.0 / 240.0);
    }

    #[test]
    fn full_cash_purchase_has_no_debt_service() {
        let inputs = FinancingInputs {
            down_payment_pct: 100.0,
            ..base()
        };
        let r = compute_financing_result(&inputs).unwrap();
        assert_eq!(r.loan_amount, 0.0);
        assert_eq!(r.monthly_payment, 0.0);
        assert_eq!(r.annual_debt_service, 0.0);
        assert_eq!(r.debt_service_coverage_ratio, 0.0);
        assert!((r.cash_on_cash_return_pct - 10.0).abs() < 1e-12);
        assert_eq!(r.annual_profit, 100_000.0);
        assert_eq!(r.rating, RatingTier::Caution);
    }

    #[test]
    fn zero_down_payment_has_no_cash_on_cash() {
        let inputs = FinancingInputs {
            down_payment_pct: 0.0,
            ..base()
        };
        let r = compute_financing_result(&inputs).unwrap();
        assert_eq!(r.down_payment, 0.0);
        assert_eq!(r.loan_amount, 1_000_000.0);
        assert_eq!(r.cash_on_cash_return_pct, 0.0);
        assert!(r.debt_service_coverage_ratio > 0.0);
    }

    #[test]
    fn zero_noi_is_poor_with_zero_cap_rate() {
        let inputs = FinancingInputs {
            net_operating_income: 0.0,
            ..base()
        };
        let r = compute_financing_result(&inputs).unwrap();
        assert_eq!(r.cap_rate_pct, 0.0);
        assert_eq!(r.debt_service_coverage_ratio, 0.0);
        assert!(r.annual_profit < 0.0);
        assert_eq!(r.rating, RatingTier::Poor);
    }

    #[test]
    fn rejects_invalid_inputs_without_partial_results() {
        let cases = [
            (FinancingInputs { purchase_price: 0.0, ..base() }, "purchase_price"),
            (FinancingInputs { purchase_price: -5.0, ..base() }, "purchase_price"),
            (FinancingInputs { purchase_price: f64::INFINITY, ..base() }, "purchase_price"),
            (FinancingInputs { down_payment_pct: 100.5, ..base() }, "down_payment_pct"),
            (FinancingInputs { down_payment_pct: f64::NAN, ..base() }, "down_payment_pct"),
            (FinancingInputs { annual_interest_rate_pct: -1.0, ..base() }, "annual_interest_rate_pct"),
            (FinancingInputs { loan_term_years: 0, ..base() }, "loan_term_years"),
            (FinancingInputs { net_operating_income: -1.0, ..base() }, "net_operating_income"),
        ];
        for (inputs, field) in cases {
            let err = compute_financing_result(&inputs).unwrap_err();
            assert_eq!(err.field(), field, "inputs: {inputs:?}");
        }
    }

    #[test]
    fn first_invalid_field_wins() {
        let inputs = FinancingInputs {
            purchase_price: 0.0,
            loan_term_years: 0,
            ..base()
        };
        assert_eq!(validate_inputs(&inputs).unwrap_err().field(), "purchase_price");
    }

    #[test]
    fn overflowing_ratios_blame_noi() {
        let inputs = FinancingInputs {
            purchase_price: 1.0,
            net_operating_income: f64::MAX,
            ..base()
        };
        let err = compute_financing_result(&inputs).unwrap_err();
        assert_eq!(err.field(), "net_operating_income");
    }

    #[test]
    fn overflowing_debt_service_blames_price() {
        let inputs = FinancingInputs {
            purchase_price: f64::MAX,
            down_payment_pct: 0.0,
            annual_interest_rate_pct: 1_000.0,
            loan_term_years: 5,
            ..base()
        };
        let err = compute_financing_result(&inputs).unwrap_err();
        assert_eq!(err.field(), "purchase_price");
    }

    #[test]
    fn near_max_amounts_that_stay_finite_are_accepted() {
        let inputs = FinancingInputs {
            purchase_price: f64::MAX,
            net_operating_income: f64::MAX,
            down_payment_pct: 0.0,
            ..base()
        };
        let r = compute_financing_result(&inputs).unwrap();
        assert_eq!(r.rating, RatingTier::Excellent);
        assert!(r.annual_profit.is_finite());
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let a = compute_financing_result(&base()).unwrap();
        let b = compute_financing_result(&base()).unwrap();
        assert_eq!(a.monthly_payment.to_bits(), b.monthly_payment.to_bits());
        assert_eq!(a.annual_profit.to_bits(), b.annual_profit.to_bits());
        assert_eq!(a, b);
    }

    fn valid_inputs() -> impl Strategy<Value = FinancingInputs> {
        (
            10_000.0f64..50_000_000.0,
            0.0f64..=100.0,
            0.0f64..25.0,
            1u32..=40,
            0.0f64..5_000_000.0,
        )
            .prop_map(|(price, down, rate, term, noi)| FinancingInputs {
                purchase_price: price,
                down_payment_pct: down,
                annual_interest_rate_pct: rate,
                loan_term_years: term,
                net_operating_income: noi,
            })
    }

    proptest! {
        #[test]
        fn valid_inputs_never_produce_non_finite_metrics(inputs in valid_inputs()) {
            let r = compute_financing_result(&inputs).unwrap();
            prop_assert!(all_finite(&r));
            prop_assert!(r.monthly_payment >= 0.0);
            prop_assert!(r.debt_service_coverage_ratio >= 0.0);
            prop_assert_eq!(r.rating, classify_rating(r.annual_profit));
        }

        #[test]
        fn results_are_deterministic(inputs in valid_inputs()) {
            let a = compute_financing_result(&inputs).unwrap();
            let b = compute_financing_result(&inputs).unwrap();
            prop_assert_eq!(a.annual_profit.to_bits(), b.annual_profit.to_bits());
            prop_assert_eq!(a.cash_on_cash_return_pct.to_bits(), b.cash_on_cash_return_pct.to_bits());
        }

        #[test]
        fn more_noi_never_lowers_the_tier(inputs in valid_inputs(), extra in 0.0f64..1_000_000.0) {
            let richer = FinancingInputs {
                net_operating_income: inputs.net_operating_income + extra,
                ..inputs
            };
            let a = compute_financing_result(&inputs).unwrap();
            let b = compute_financing_result(&richer).unwrap();
            prop_assert!(tier_rank(b.rating) >= tier_rank(a.rating));
        }
    }

    fn tier_rank(tier: RatingTier) -> u8 {
        match tier {
            RatingTier::Poor => 0,
            RatingTier::Warning => 1,
            RatingTier::Caution => 2,
            RatingTier::Excellent => 3,
        }
    }
}
