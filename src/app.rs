//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `HVCALC_*` defaults and parses CLI arguments
//! - runs the valuation engine (single deal or batch)
//! - prints summaries, schedules and plots
//! - writes optional reports/exports

use std::path::Path;

use clap::Parser;
use tracing::info;

use crate::cli::{BatchArgs, CalcArgs, Command, InputArgs, RateArgs, ScheduleArgs, ShowArgs};
use crate::config::Defaults;
use crate::domain::{Edition, FinancingInputs};
use crate::error::AppError;
use crate::io::report::ValuationReport;

pub mod pipeline;

/// Entry point for the `hvcalc` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let defaults = Defaults::from_env()?;
    crate::logging::init(&defaults.log_level, matches!(cli.command, Command::Tui(_)));

    match cli.command {
        Command::Calc(args) => handle_calc(args, &defaults),
        Command::Rate(args) => handle_rate(args, &defaults),
        Command::Schedule(args) => handle_schedule(args, &defaults),
        Command::Batch(args) => handle_batch(args, &defaults),
        Command::Show(args) => handle_show(args),
        Command::Tui(args) => handle_tui(args, &defaults),
    }
}

/// Merge flags over defaults and apply the edition's range checks.
pub fn resolve_inputs(args: &InputArgs, defaults: &Defaults) -> Result<(FinancingInputs, Edition), AppError> {
    let (inputs, edition) = args.resolve(defaults);
    if !args.no_bounds {
        edition.bounds().check(&inputs)?;
    }
    Ok((inputs, edition))
}

fn handle_calc(args: CalcArgs, defaults: &Defaults) -> Result<(), AppError> {
    let (inputs, edition) = resolve_inputs(&args.inputs, defaults)?;
    let run = pipeline::run_valuation(&inputs)?;

    println!("{}", crate::report::format_summary(&run, edition));

    if args.plot {
        let plot = crate::plot::render_balance_plot(&run.schedule, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.report {
        let report = ValuationReport::from_run(&run, edition);
        crate::io::report::write_report_json(path, &report)?;
        println!("Report written to {}", path.display());
    }
    if let Some(path) = &args.export_schedule {
        crate::io::export::write_schedule_csv(path, &run.schedule)?;
        println!("Schedule written to {}", path.display());
    }

    Ok(())
}

fn handle_rate(args: RateArgs, defaults: &Defaults) -> Result<(), AppError> {
    if !args.profit.is_finite() {
        return Err(AppError::new(2, "Annual profit must be a finite number."));
    }
    let edition = args.edition.unwrap_or(defaults.edition);
    let tier = crate::engine::classify_rating(args.profit);
    print!("{}", crate::report::format_rating(tier, edition));
    Ok(())
}

fn handle_schedule(args: ScheduleArgs, defaults: &Defaults) -> Result<(), AppError> {
    let (inputs, _) = resolve_inputs(&args.inputs, defaults)?;
    let run = pipeline::run_valuation(&inputs)?;
    if run.schedule.is_empty() {
        return Err(AppError::new(
            2,
            format!(
                "Schedules are limited to {} years (got {}).",
                crate::engine::MAX_SCHEDULE_YEARS,
                inputs.loan_term_years
            ),
        ));
    }

    println!(
        "Loan: {} at {:.2}% over {} years ({}/month)\n",
        crate::report::fmt_money(run.result.loan_amount),
        inputs.annual_interest_rate_pct,
        inputs.loan_term_years,
        crate::report::fmt_money(run.result.monthly_payment),
    );
    print!("{}", crate::report::format_schedule(&run.schedule));

    if let Some(path) = &args.export {
        crate::io::export::write_schedule_csv(path, &run.schedule)?;
        println!("Schedule written to {}", path.display());
    }
    Ok(())
}

fn handle_batch(args: BatchArgs, defaults: &Defaults) -> Result<(), AppError> {
    let path = match &args.file {
        Some(path) => crate::cli::picker::validate_csv_path(path)?,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };
    let edition = args.edition.unwrap_or(defaults.edition);

    let ingested = crate::io::ingest::load_deals(&path)?;
    let output = pipeline::run_batch(&ingested.deals, &ingested.lines);

    let mut problems = ingested.row_errors;
    problems.extend(output.rejected);
    problems.sort_by_key(|e| e.line);
    eprint!("{}", crate::report::format_row_errors(&problems));

    if output.outcomes.is_empty() {
        return Err(AppError::new(
            3,
            format!("No deal in {} could be evaluated.", path.display()),
        ));
    }

    println!(
        "Evaluated {} of {} deal(s) from {}\n",
        output.outcomes.len(),
        ingested.rows_read,
        display(&path)
    );
    let rankings = crate::report::rank_deals(&output.outcomes, args.top);
    println!("{}", crate::report::format_rankings(&rankings));

    if let Some(out) = &args.export {
        crate::io::export::write_results_csv(out, &output.outcomes, edition)?;
        info!(path = %out.display(), "batch results exported");
        println!("Results written to {}", out.display());
    }
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let report = crate::io::report::read_report_json(&args.report)?;
    let run = report.to_run();

    println!(
        "Report generated {} by {}\n",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.tool
    );
    println!("{}", crate::report::format_summary(&run, report.edition));

    if args.plot {
        println!(
            "{}",
            crate::plot::render_balance_plot(&run.schedule, args.width, args.height)
        );
    }
    Ok(())
}

fn handle_tui(args: InputArgs, defaults: &Defaults) -> Result<(), AppError> {
    let (inputs, edition) = resolve_inputs(&args, defaults)?;
    crate::tui::run(inputs, edition)
}

fn display(path: &Path) -> String {
    path.strip_prefix("./").unwrap_or(path).display().to_string()
}

/// Rewrite argv so `hvcalc` defaults to the TUI and bare flags mean `calc`.
///
/// Rules:
/// - `hvcalc`                      -> `hvcalc tui`
/// - `hvcalc -p 2000000 ...`       -> `hvcalc calc -p 2000000 ...`
/// - `hvcalc --help/--version/-h`  -> unchanged (show top-level help/version)
pub fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "calc" | "rate" | "schedule" | "batch" | "show" | "tui"
    );
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "calc".to_string());
    }
    argv
}
