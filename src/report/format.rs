//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the engine stays clean and testable
//! - output changes are localized (snapshot-style tests below)

use crate::app::pipeline::ValuationRun;
use crate::domain::{AmortizationPeriod, DealOutcome, Edition, FinancingInputs, RatingTier};
use crate::engine::total_interest;
use crate::io::ingest::RowError;
use crate::report::Rankings;

pub const DISCLAIMER: &str = "*All information is deemed reliable but not guaranteed. Buyer to verify all information. We just do math.*";

/// Format the full valuation summary for one run.
///
/// The valuation edition shows the yield ratios; the financing edition shows
/// estimated annual profit instead.
pub fn format_summary(run: &ValuationRun, edition: Edition) -> String {
    let r = &run.result;
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", edition.display_name()));
    out.push_str(&format_inputs_line(&run.inputs));
    out.push('\n');

    out.push_str("\nFinancial metrics:\n");
    out.push_str(&metric_line("Loan Amount", &fmt_money(r.loan_amount)));
    out.push_str(&metric_line("Monthly Payment", &fmt_money(r.monthly_payment)));
    out.push_str(&metric_line("Annual Debt Service", &fmt_money(r.annual_debt_service)));
    match edition {
        Edition::Valuation => {
            out.push_str(&metric_line("Capitalization Rate", &format!("{:.2}%", r.cap_rate_pct)));
            out.push_str(&metric_line("Cash-on-Cash Return", &format!("{:.2}%", r.cash_on_cash_return_pct)));
            out.push_str(&metric_line("DSCR", &format!("{:.2}", r.debt_service_coverage_ratio)));
        }
        Edition::Financing => {
            out.push_str(&metric_line("Estimated Annual Profit", &fmt_money(r.annual_profit)));
        }
    }
    if !run.schedule.is_empty() {
        out.push_str(&metric_line("Total Interest", &fmt_money(total_interest(&run.schedule))));
    }

    out.push('\n');
    out.push_str(&format_rating(r.rating, edition));
    out.push('\n');
    out.push_str(DISCLAIMER);
    out.push('\n');

    out
}

/// Format a tier and its advisory copy.
pub fn format_rating(tier: RatingTier, edition: Edition) -> String {
    format!(
        "Investment rating: {}\n  {}\n",
        tier.display_name(),
        tier.message(edition)
    )
}

/// Format the yearly amortization table.
pub fn format_schedule(schedule: &[AmortizationPeriod]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>4} {:>16} {:>14} {:>14} {:>16}\n",
        "year", "begin_balance", "interest", "principal", "end_balance"
    ));
    out.push_str(&format!(
        "{:-<4} {:-<16} {:-<14} {:-<14} {:-<16}\n",
        "", "", "", "", ""
    ));
    for p in schedule {
        out.push_str(&format!(
            "{:>4} {:>16} {:>14} {:>14} {:>16}\n",
            p.year,
            fmt_money(p.beginning_balance),
            fmt_money(p.interest_paid),
            fmt_money(p.principal_paid),
            fmt_money(p.ending_balance),
        ));
    }
    out.push_str(&format!("Total interest: {}\n", fmt_money(total_interest(schedule))));
    out
}

/// Format the best/worst deal tables.
pub fn format_rankings(rankings: &Rankings) -> String {
    let mut out = String::new();

    out.push_str("Top deals (highest annual profit):\n");
    out.push_str(&format_deal_table(&rankings.best));
    out.push('\n');

    out.push_str("Weakest deals (lowest annual profit):\n");
    out.push_str(&format_deal_table(&rankings.worst));

    out
}

/// Format row-level ingest/evaluation problems (empty string when none).
pub fn format_row_errors(errors: &[RowError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut out = format!("Skipped {} row(s):\n", errors.len());
    for e in errors {
        out.push_str(&format!(
            "  line {}{}: {}\n",
            e.line,
            e.id.as_deref().map(|id| format!(" ({id})")).unwrap_or_default(),
            e.message
        ));
    }
    out
}

fn format_inputs_line(inputs: &FinancingInputs) -> String {
    format!(
        "Price: {} | Down: {:.0}% | Rate: {:.2}% | Term: {}y | NOI: {}",
        fmt_money(inputs.purchase_price),
        inputs.down_payment_pct,
        inputs.annual_interest_rate_pct,
        inputs.loan_term_years,
        fmt_money(inputs.net_operating_income),
    )
}

fn metric_line(label: &str, value: &str) -> String {
    format!("  {label:<24} {value:>14}\n")
}

fn format_deal_table(rows: &[DealOutcome]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<20} {:>14} {:>14} {:>10} {:>6} {:>14} {:<10}\n",
            "id", "price", "debt_service", "cap_rate", "dscr", "profit", "rating"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<20} {:-<14} {:-<14} {:-<10} {:-<6} {:-<14} {:-<10}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for o in rows {
        let r = &o.result;
        out.push_str(
            format!(
                "{:<20} {:>14} {:>14} {:>9.2}% {:>6.2} {:>14} {:<10}\n",
                truncate(&o.deal.id, 20),
                fmt_money(o.deal.inputs.purchase_price),
                fmt_money(r.annual_debt_service),
                r.cap_rate_pct,
                r.debt_service_coverage_ratio,
                fmt_money(r.annual_profit),
                r.rating.display_name(),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Whole-dollar amount with thousands separators, e.g. `$1,234,567` / `-$5,000`.
pub fn fmt_money(v: f64) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    let rounded = v.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
