//! Input/output helpers.
//!
//! - deal CSV ingest + validation (`ingest`)
//! - result and schedule exports (CSV) (`export`)
//! - report JSON read/write (`report`)

pub mod export;
pub mod ingest;
pub mod report;

pub use export::*;
pub use ingest::*;
pub use report::*;
