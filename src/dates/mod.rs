//! Date-of-birth arithmetic.
//!
//! # Data Flow
//! ```text
//! path segments ("06", "14", "00")
//!     → triple.rs (format check, two ASCII digits each)
//!     → engine.rs (calendar validity, age, next birthday)
//!     → AgeResult
//! ```
//!
//! # Design Decisions
//! - Birth year is always 2000 + YY; 1900s dates cannot be expressed
//! - Pure functions over an explicit `now` so the math is testable

pub mod engine;
pub mod triple;

use thiserror::Error;

pub use engine::{age_at, age_now, AgeResult, DAYS_PER_MONTH};
pub use triple::DateTriple;

/// Errors produced by the date engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    /// A segment is not exactly two ASCII digits.
    #[error("invalid format Use MM/DD/YY")]
    Format,

    /// The segments do not name a real calendar date.
    #[error("invalid date")]
    InvalidDate,
}
