//! `hvcalc` library crate.
//!
//! The binary (`hvcalc`) is a thin wrapper around this library so that:
//!
//! - the valuation engine is testable without spawning processes
//! - the CLI, batch mode and TUI all share one computation path

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
