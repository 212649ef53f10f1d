//! Domain types used throughout the calculator.
//!
//! This module defines:
//!
//! - the engine's value types (`FinancingInputs`, `FinancingResult`, `RatingTier`)
//! - presentation variants and input ranges (`Edition`, `InputBounds`)
//! - the yearly amortization rows (`AmortizationPeriod`)

pub mod types;

pub use types::*;
