//! Run defaults loaded from the environment.
//!
//! Precedence: CLI flag > environment / `.env` > built-in default.
//!
//! | variable | default |
//! |---|---|
//! | `HVCALC_PURCHASE_PRICE` | 1,000,000 |
//! | `HVCALC_DOWN_PAYMENT_PCT` | 20 |
//! | `HVCALC_INTEREST_RATE_PCT` | 5.0 |
//! | `HVCALC_LOAN_TERM_YEARS` | 20 |
//! | `HVCALC_NOI` | 100,000 |
//! | `HVCALC_EDITION` | valuation |
//! | `HVCALC_LOG` | warn |

use crate::domain::{Edition, FinancingInputs};
use crate::error::AppError;

pub const ENV_PURCHASE_PRICE: &str = "HVCALC_PURCHASE_PRICE";
pub const ENV_DOWN_PAYMENT_PCT: &str = "HVCALC_DOWN_PAYMENT_PCT";
pub const ENV_INTEREST_RATE_PCT: &str = "HVCALC_INTEREST_RATE_PCT";
pub const ENV_LOAN_TERM_YEARS: &str = "HVCALC_LOAN_TERM_YEARS";
pub const ENV_NOI: &str = "HVCALC_NOI";
pub const ENV_EDITION: &str = "HVCALC_EDITION";
pub const ENV_LOG: &str = "HVCALC_LOG";

/// Defaults applied to any input not given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub inputs: FinancingInputs,
    pub edition: Edition,
    pub log_level: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            inputs: FinancingInputs {
                purchase_price: 1_000_000.0,
                down_payment_pct: 20.0,
                annual_interest_rate_pct: 5.0,
                loan_term_years: 20,
                net_operating_income: 100_000.0,
            },
            edition: Edition::Valuation,
            log_level: "warn".to_string(),
        }
    }
}

impl Defaults {
    /// Load `.env` (if present) and read `HVCALC_*` variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build defaults from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut out = Self::default();

        if let Some(v) = lookup(ENV_PURCHASE_PRICE) {
            out.inputs.purchase_price = parse_amount(ENV_PURCHASE_PRICE, &v)?;
        }
        if let Some(v) = lookup(ENV_DOWN_PAYMENT_PCT) {
            out.inputs.down_payment_pct = parse_amount(ENV_DOWN_PAYMENT_PCT, &v)?;
        }
        if let Some(v) = lookup(ENV_INTEREST_RATE_PCT) {
            out.inputs.annual_interest_rate_pct = parse_amount(ENV_INTEREST_RATE_PCT, &v)?;
        }
        if let Some(v) = lookup(ENV_LOAN_TERM_YEARS) {
            out.inputs.loan_term_years = v.trim().parse::<u32>().map_err(|e| {
                AppError::new(2, format!("Invalid {ENV_LOAN_TERM_YEARS} '{v}': {e}"))
            })?;
        }
        if let Some(v) = lookup(ENV_NOI) {
            out.inputs.net_operating_income = parse_amount(ENV_NOI, &v)?;
        }
        if let Some(v) = lookup(ENV_EDITION) {
            out.edition = Edition::parse(&v).ok_or_else(|| {
                AppError::new(
                    2,
                    format!("Invalid {ENV_EDITION} '{v}' (expected `valuation` or `financing`)."),
                )
            })?;
        }
        if let Some(v) = lookup(ENV_LOG) {
            let v = v.trim();
            if !v.is_empty() {
                out.log_level = v.to_string();
            }
        }

        Ok(out)
    }
}

/// Parse a numeric amount, tolerating `_` and `,` digit separators.
fn parse_amount(key: &str, raw: &str) -> Result<f64, AppError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '_' && *c != ',').collect();
    let v = cleaned
        .parse::<f64>()
        .map_err(|e| AppError::new(2, format!("Invalid {key} '{raw}': {e}")))?;
    if !v.is_finite() {
        return Err(AppError::new(2, format!("Invalid {key} '{raw}': not a finite number")));
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_built_ins() {
        let d = Defaults::from_lookup(|_| None).unwrap();
        assert_eq!(d, Defaults::default());
        assert_eq!(d.inputs.purchase_price, 1_000_000.0);
        assert_eq!(d.inputs.loan_term_years, 20);
        assert_eq!(d.edition, Edition::Valuation);
    }

    #[test]
    fn environment_overrides_each_field() {
        let d = Defaults::from_lookup(lookup_from(&[
            (ENV_PURCHASE_PRICE, "2,500,000"),
            (ENV_DOWN_PAYMENT_PCT, "35"),
            (ENV_INTEREST_RATE_PCT, "6.25"),
            (ENV_LOAN_TERM_YEARS, "25"),
            (ENV_NOI, "180_000"),
            (ENV_EDITION, "Financing"),
            (ENV_LOG, "debug"),
        ]))
        .unwrap();

        assert_eq!(d.inputs.purchase_price, 2_500_000.0);
        assert_eq!(d.inputs.down_payment_pct, 35.0);
        assert_eq!(d.inputs.annual_interest_rate_pct, 6.25);
        assert_eq!(d.inputs.loan_term_years, 25);
        assert_eq!(d.inputs.net_operating_income, 180_000.0);
        assert_eq!(d.edition, Edition::Financing);
        assert_eq!(d.log_level, "debug");
    }

    #[test]
    fn malformed_values_are_input_errors() {
        let err = Defaults::from_lookup(lookup_from(&[(ENV_LOAN_TERM_YEARS, "-3")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains(ENV_LOAN_TERM_YEARS));

        assert!(Defaults::from_lookup(lookup_from(&[(ENV_NOI, "lots")])).is_err());
        assert!(Defaults::from_lookup(lookup_from(&[(ENV_PURCHASE_PRICE, "inf")])).is_err());
        assert!(Defaults::from_lookup(lookup_from(&[(ENV_EDITION, "luxury")])).is_err());
    }
}
