//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed by value into the engine
//! - exported to JSON/CSV
//! - reloaded later for display

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Raw deal inputs handed to the engine.
///
/// The presentation layer is responsible for range checks (`InputBounds`); the
/// engine only rejects values for which the math is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingInputs {
    pub purchase_price: f64,
    /// Down payment as a percentage of the purchase price, in `[0, 100]`.
    pub down_payment_pct: f64,
    /// Nominal annual rate in percent (e.g. `5.0` for 5%).
    pub annual_interest_rate_pct: f64,
    pub loan_term_years: u32,
    /// Annual income before debt service.
    pub net_operating_income: f64,
}

/// All metrics derived from one `FinancingInputs`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingResult {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub annual_debt_service: f64,
    pub cap_rate_pct: f64,
    pub cash_on_cash_return_pct: f64,
    pub debt_service_coverage_ratio: f64,
    pub annual_profit: f64,
    pub rating: RatingTier,
}

/// Qualitative rating bands for annual profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTier {
    Excellent,
    Caution,
    Warning,
    Poor,
}

impl RatingTier {
    pub const ALL: [RatingTier; 4] = [
        RatingTier::Excellent,
        RatingTier::Caution,
        RatingTier::Warning,
        RatingTier::Poor,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            RatingTier::Excellent => "Excellent",
            RatingTier::Caution => "Caution",
            RatingTier::Warning => "Warning",
            RatingTier::Poor => "Poor",
        }
    }

    /// Advisory copy shown next to the tier.
    pub fn message(self, edition: Edition) -> &'static str {
        match (edition, self) {
            (Edition::Valuation, RatingTier::Excellent) => {
                "Great Start! This looks promising, but dig deeper. Every deal has its quirks!"
            }
            (Edition::Valuation, RatingTier::Caution) => {
                "Not So Good But Worth Looking Into. Maybe there's untapped potential? Let's analyze further!"
            }
            (Edition::Valuation, RatingTier::Warning) => {
                "Something Smells Fishy... Double-check your numbers and get expert insight before diving in."
            }
            (Edition::Valuation, RatingTier::Poor) => {
                "Not Really Worth It in Today's Economy. Creative financing and deep due diligence might turn things around."
            }
            (Edition::Financing, RatingTier::Excellent) => {
                "Great Start! But dive deeper for hidden costs and opportunities."
            }
            (Edition::Financing, RatingTier::Caution) => {
                "Worth Looking Into. Consider optimization strategies."
            }
            (Edition::Financing, RatingTier::Warning) => {
                "Something Feels Off. Run deeper analysis before committing."
            }
            (Edition::Financing, RatingTier::Poor) => {
                "High Risk. Seek professional insights before proceeding!"
            }
        }
    }
}

/// Which calculator page's copy and slider steps are in effect.
///
/// Editions never change thresholds or math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    /// Full metric set (cap rate, cash-on-cash, DSCR).
    Valuation,
    /// Financing view centered on estimated annual profit.
    Financing,
}

impl Edition {
    pub fn display_name(self) -> &'static str {
        match self {
            Edition::Valuation => "Hotel Valuation Calculator",
            Edition::Financing => "Hotel Financing Calculator",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Edition::Valuation => Edition::Financing,
            Edition::Financing => Edition::Valuation,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "valuation" => Some(Edition::Valuation),
            "financing" => Some(Edition::Financing),
            _ => None,
        }
    }

    pub fn bounds(self) -> InputBounds {
        match self {
            Edition::Valuation => InputBounds {
                purchase_price_step: 10_000.0,
                noi_step: 1_000.0,
                ..InputBounds::BASE
            },
            Edition::Financing => InputBounds {
                purchase_price_step: 50_000.0,
                noi_step: 25_000.0,
                ..InputBounds::BASE
            },
        }
    }
}

/// Presentation-layer input ranges and slider steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputBounds {
    pub purchase_price_min: f64,
    pub purchase_price_step: f64,
    pub down_payment_pct_min: f64,
    pub down_payment_pct_max: f64,
    pub down_payment_pct_step: f64,
    pub interest_rate_pct_min: f64,
    pub interest_rate_pct_max: f64,
    pub interest_rate_pct_step: f64,
    pub loan_term_years_min: u32,
    pub loan_term_years_max: u32,
    pub loan_term_years_step: u32,
    pub noi_min: f64,
    pub noi_step: f64,
}

impl InputBounds {
    const BASE: InputBounds = InputBounds {
        purchase_price_min: 10_000.0,
        purchase_price_step: 10_000.0,
        down_payment_pct_min: 0.0,
        down_payment_pct_max: 100.0,
        down_payment_pct_step: 1.0,
        interest_rate_pct_min: 1.0,
        interest_rate_pct_max: 10.0,
        interest_rate_pct_step: 0.1,
        loan_term_years_min: 5,
        loan_term_years_max: 30,
        loan_term_years_step: 5,
        noi_min: 0.0,
        noi_step: 1_000.0,
    };

    /// Reject inputs outside the presentation ranges (exit code 2).
    pub fn check(&self, inputs: &FinancingInputs) -> Result<(), AppError> {
        if !(inputs.purchase_price >= self.purchase_price_min) {
            return Err(AppError::new(
                2,
                format!(
                    "Purchase price must be at least {:.0} (got {}).",
                    self.purchase_price_min, inputs.purchase_price
                ),
            ));
        }
        if !(self.down_payment_pct_min..=self.down_payment_pct_max).contains(&inputs.down_payment_pct) {
            return Err(AppError::new(
                2,
                format!(
                    "Down payment must be within [{:.0}, {:.0}]% (got {}).",
                    self.down_payment_pct_min, self.down_payment_pct_max, inputs.down_payment_pct
                ),
            ));
        }
        if !(self.interest_rate_pct_min..=self.interest_rate_pct_max).contains(&inputs.annual_interest_rate_pct) {
            return Err(AppError::new(
                2,
                format!(
                    "Interest rate must be within [{:.1}, {:.1}]% (got {}).",
                    self.interest_rate_pct_min, self.interest_rate_pct_max, inputs.annual_interest_rate_pct
                ),
            ));
        }
        if !(self.loan_term_years_min..=self.loan_term_years_max).contains(&inputs.loan_term_years) {
            return Err(AppError::new(
                2,
                format!(
                    "Loan term must be within [{}, {}] years (got {}).",
                    self.loan_term_years_min, self.loan_term_years_max, inputs.loan_term_years
                ),
            ));
        }
        if !(inputs.net_operating_income >= self.noi_min) {
            return Err(AppError::new(
                2,
                format!(
                    "NOI must be at least {:.0} (got {}).",
                    self.noi_min, inputs.net_operating_income
                ),
            ));
        }
        Ok(())
    }

    /// Step a purchase price by `delta` slider ticks.
    pub fn step_purchase_price(&self, value: f64, delta: i32) -> f64 {
        (value + f64::from(delta) * self.purchase_price_step).max(self.purchase_price_min)
    }

    pub fn step_down_payment_pct(&self, value: f64, delta: i32) -> f64 {
        (value + f64::from(delta) * self.down_payment_pct_step)
            .clamp(self.down_payment_pct_min, self.down_payment_pct_max)
    }

    /// Interest steps are snapped to the step grid so repeated ticks don't drift.
    pub fn step_interest_rate_pct(&self, value: f64, delta: i32) -> f64 {
        let ticks = (value / self.interest_rate_pct_step).round() + f64::from(delta);
        (ticks * self.interest_rate_pct_step)
            .clamp(self.interest_rate_pct_min, self.interest_rate_pct_max)
    }

    pub fn step_loan_term_years(&self, value: u32, delta: i32) -> u32 {
        let next = i64::from(value) + i64::from(delta) * i64::from(self.loan_term_years_step);
        next.clamp(
            i64::from(self.loan_term_years_min),
            i64::from(self.loan_term_years_max),
        ) as u32
    }

    pub fn step_noi(&self, value: f64, delta: i32) -> f64 {
        (value + f64::from(delta) * self.noi_step).max(self.noi_min)
    }
}

/// One year of a loan's amortization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    pub year: u32,
    pub beginning_balance: f64,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub ending_balance: f64,
}

/// A named deal row (batch mode).
#[derive(Debug, Clone, PartialEq)]
pub struct Deal {
    pub id: String,
    pub inputs: FinancingInputs,
}

/// A deal with its computed metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct DealOutcome {
    pub deal: Deal,
    pub result: FinancingResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> FinancingInputs {
        FinancingInputs {
            purchase_price: 1_000_000.0,
            down_payment_pct: 20.0,
            annual_interest_rate_pct: 5.0,
            loan_term_years: 20,
            net_operating_income: 100_000.0,
        }
    }

    #[test]
    fn editions_share_ranges_but_not_steps() {
        let v = Edition::Valuation.bounds();
        let f = Edition::Financing.bounds();
        assert_eq!(v.purchase_price_min, f.purchase_price_min);
        assert_eq!(v.interest_rate_pct_max, f.interest_rate_pct_max);
        assert_eq!(v.purchase_price_step, 10_000.0);
        assert_eq!(f.purchase_price_step, 50_000.0);
        assert_eq!(f.noi_step, 25_000.0);
    }

    #[test]
    fn bounds_accept_defaults_and_reject_out_of_range() {
        let bounds = Edition::Valuation.bounds();
        assert!(bounds.check(&inputs()).is_ok());

        let low_price = FinancingInputs { purchase_price: 9_999.0, ..inputs() };
        assert_eq!(bounds.check(&low_price).unwrap_err().exit_code(), 2);

        let high_rate = FinancingInputs { annual_interest_rate_pct: 10.5, ..inputs() };
        assert!(bounds.check(&high_rate).is_err());

        let short_term = FinancingInputs { loan_term_years: 1, ..inputs() };
        assert!(bounds.check(&short_term).is_err());

        let nan_noi = FinancingInputs { net_operating_income: f64::NAN, ..inputs() };
        assert!(bounds.check(&nan_noi).is_err());
    }

    #[test]
    fn slider_steps_clamp_to_range() {
        let bounds = Edition::Valuation.bounds();
        assert_eq!(bounds.step_down_payment_pct(100.0, 1), 100.0);
        assert_eq!(bounds.step_down_payment_pct(0.0, -1), 0.0);
        assert_eq!(bounds.step_loan_term_years(30, 1), 30);
        assert_eq!(bounds.step_loan_term_years(20, -1), 15);
        assert_eq!(bounds.step_loan_term_years(5, -1), 5);
        assert_eq!(bounds.step_purchase_price(10_000.0, -1), 10_000.0);
        assert_eq!(bounds.step_noi(0.0, -3), 0.0);
    }

    #[test]
    fn interest_steps_stay_on_grid() {
        let bounds = Edition::Valuation.bounds();
        let mut rate = 5.0;
        for _ in 0..3 {
            rate = bounds.step_interest_rate_pct(rate, 1);
        }
        assert!((rate - 5.3).abs() < 1e-9);
        assert_eq!(bounds.step_interest_rate_pct(10.0, 1), 10.0);
        assert_eq!(bounds.step_interest_rate_pct(1.0, -1), 1.0);
    }

    #[test]
    fn each_tier_has_copy_in_both_editions() {
        for tier in RatingTier::ALL {
            assert!(!tier.message(Edition::Valuation).is_empty());
            assert!(!tier.message(Edition::Financing).is_empty());
            assert_ne!(tier.message(Edition::Valuation), tier.message(Edition::Financing));
        }
    }

    #[test]
    fn edition_parse_is_case_insensitive() {
        assert_eq!(Edition::parse(" Financing "), Some(Edition::Financing));
        assert_eq!(Edition::parse("valuation"), Some(Edition::Valuation));
        assert_eq!(Edition::parse("other"), None);
        assert_eq!(Edition::Valuation.next(), Edition::Financing);
    }
}
