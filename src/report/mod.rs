//! Reporting utilities: batch rankings and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::DealOutcome;

/// Best/worst deals by annual profit (top-N each side).
#[derive(Debug, Clone)]
pub struct Rankings {
    pub best: Vec<DealOutcome>,
    pub worst: Vec<DealOutcome>,
}

/// Rank the top and bottom deals by annual profit.
///
/// Ties keep input order (stable sort).
pub fn rank_deals(outcomes: &[DealOutcome], top_n: usize) -> Rankings {
    let mut sorted = outcomes.to_vec();
    sorted.sort_by(|a, b| b.result.annual_profit.total_cmp(&a.result.annual_profit));
    let best = sorted.iter().take(top_n).cloned().collect();

    let mut sorted_worst = outcomes.to_vec();
    sorted_worst.sort_by(|a, b| a.result.annual_profit.total_cmp(&b.result.annual_profit));
    let worst = sorted_worst.iter().take(top_n).cloned().collect();

    Rankings { best, worst }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Deal, FinancingInputs};
    use crate::engine::compute_financing_result;

    pub(crate) fn outcome(id: &str, noi: f64) -> DealOutcome {
        let inputs = FinancingInputs {
            purchase_price: 1_000_000.0,
            down_payment_pct: 20.0,
            annual_interest_rate_pct: 5.0,
            loan_term_years: 20,
            net_operating_income: noi,
        };
        DealOutcome {
            deal: Deal { id: id.to_string(), inputs },
            result: compute_financing_result(&inputs).unwrap(),
        }
    }

    #[test]
    fn rank_deals_orders_by_profit() {
        let outcomes = vec![
            outcome("mid", 90_000.0),
            outcome("top", 250_000.0),
            outcome("low", 10_000.0),
        ];

        let rankings = rank_deals(&outcomes, 2);
        let best: Vec<&str> = rankings.best.iter().map(|o| o.deal.id.as_str()).collect();
        let worst: Vec<&str> = rankings.worst.iter().map(|o| o.deal.id.as_str()).collect();
        assert_eq!(best, vec!["top", "mid"]);
        assert_eq!(worst, vec!["low", "mid"]);
    }

    #[test]
    fn rank_deals_handles_short_lists() {
        let rankings = rank_deals(&[outcome("only", 1.0)], 20);
        assert_eq!(rankings.best.len(), 1);
        assert_eq!(rankings.worst.len(), 1);
        assert!(rank_deals(&[], 5).best.is_empty());
    }
}
