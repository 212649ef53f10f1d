//! The valuation engine: pure, synchronous financing math.
//!
//! Everything in here is a plain function of its arguments:
//! - loan payment and amortization (`payment`, `schedule`)
//! - derived deal metrics (`valuation`)
//! - profit rating bands (`rating`)
//!
//! No I/O and no logging happens here; the pipeline layer does that.

pub mod error;
pub mod payment;
pub mod rating;
pub mod schedule;
pub mod valuation;

pub use error::*;
pub use payment::*;
pub use rating::*;
pub use schedule::*;
pub use valuation::*;
