//! Command-line parsing for the hotel valuation calculator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! engine and from presentation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Defaults;
use crate::domain::{Edition, FinancingInputs};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hvcalc", version, about = "Hotel valuation and financing calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute financing metrics and the investment rating for one deal.
    Calc(CalcArgs),
    /// Print the rating band for an annual profit figure.
    Rate(RateArgs),
    /// Print the yearly amortization schedule.
    Schedule(ScheduleArgs),
    /// Evaluate every deal in a CSV and rank them by annual profit.
    Batch(BatchArgs),
    /// Re-render a report written by `hvcalc calc --report`.
    Show(ShowArgs),
    /// Launch the interactive TUI.
    Tui(InputArgs),
}

/// Deal inputs. Anything omitted falls back to `HVCALC_*` / built-in defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct InputArgs {
    /// Purchase price ($).
    #[arg(short = 'p', long = "price")]
    pub purchase_price: Option<f64>,

    /// Down payment (% of price, 0-100).
    #[arg(short = 'd', long = "down")]
    pub down_payment_pct: Option<f64>,

    /// Annual interest rate (%).
    #[arg(short = 'r', long = "rate")]
    pub interest_rate_pct: Option<f64>,

    /// Loan term (years).
    #[arg(short = 't', long = "term")]
    pub loan_term_years: Option<u32>,

    /// Net operating income ($ per year).
    #[arg(short = 'n', long = "noi")]
    pub noi: Option<f64>,

    /// Copy and slider steps to use (valuation or financing).
    #[arg(short = 'e', long, value_enum)]
    pub edition: Option<Edition>,

    /// Skip the calculator's input range checks (engine validation still applies).
    #[arg(long)]
    pub no_bounds: bool,
}

impl InputArgs {
    /// Merge flags over defaults.
    pub fn resolve(&self, defaults: &Defaults) -> (FinancingInputs, Edition) {
        let d = defaults.inputs;
        let inputs = FinancingInputs {
            purchase_price: self.purchase_price.unwrap_or(d.purchase_price),
            down_payment_pct: self.down_payment_pct.unwrap_or(d.down_payment_pct),
            annual_interest_rate_pct: self.interest_rate_pct.unwrap_or(d.annual_interest_rate_pct),
            loan_term_years: self.loan_term_years.unwrap_or(d.loan_term_years),
            net_operating_income: self.noi.unwrap_or(d.net_operating_income),
        };
        (inputs, self.edition.unwrap_or(defaults.edition))
    }
}

/// Options for `calc`.
#[derive(Debug, Args, Clone)]
pub struct CalcArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Render an ASCII plot of the loan balance.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,

    /// Write a JSON report (inputs, metrics, rating, schedule).
    #[arg(long, value_name = "JSON")]
    pub report: Option<PathBuf>,

    /// Export the amortization schedule to CSV.
    #[arg(long = "export-schedule", value_name = "CSV")]
    pub export_schedule: Option<PathBuf>,
}

/// Options for `rate`.
#[derive(Debug, Args, Clone)]
pub struct RateArgs {
    /// Annual profit (NOI minus annual debt service).
    #[arg(long, allow_negative_numbers = true)]
    pub profit: f64,

    /// Copy to use for the advisory message.
    #[arg(short = 'e', long, value_enum)]
    pub edition: Option<Edition>,
}

/// Options for `schedule`.
#[derive(Debug, Args, Clone)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Export the schedule to CSV instead of only printing it.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

/// Options for `batch`.
#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Deal CSV (prompted for when omitted).
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Show top-N best and worst deals.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export per-deal results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Copy to use for exported rating messages.
    #[arg(short = 'e', long, value_enum)]
    pub edition: Option<Edition>,
}

/// Options for `show`.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Report JSON produced by `hvcalc calc --report`.
    #[arg(long, value_name = "JSON")]
    pub report: PathBuf,

    /// Render an ASCII plot of the loan balance.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 16)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn calc_flags_override_defaults() {
        let cli = Cli::parse_from(["hvcalc", "calc", "-p", "2000000", "--noi", "150000", "-e", "financing"]);
        let Command::Calc(args) = cli.command else {
            panic!("expected calc");
        };
        let (inputs, edition) = args.inputs.resolve(&Defaults::default());
        assert_eq!(inputs.purchase_price, 2_000_000.0);
        assert_eq!(inputs.net_operating_income, 150_000.0);
        assert_eq!(inputs.down_payment_pct, 20.0);
        assert_eq!(inputs.loan_term_years, 20);
        assert_eq!(edition, Edition::Financing);
    }

    #[test]
    fn rate_accepts_negative_profit() {
        let cli = Cli::parse_from(["hvcalc", "rate", "--profit", "-2500"]);
        let Command::Rate(args) = cli.command else {
            panic!("expected rate");
        };
        assert_eq!(args.profit, -2_500.0);
    }
}
