//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (allow-listed IP bypass, else per-IP window)
//!     → cors.rs (reject unlisted origins, add CORS headers)
//!     → Pass to handlers
//! Outgoing response:
//!     → headers.rs (security headers on every response)
//! ```
//!
//! # Design Decisions
//! - One limiter for the whole process; counters shared across requests
//! - Fail closed: reject on any security check failure

pub mod cors;
pub mod headers;
pub mod rate_limit;

pub use cors::OriginPolicy;
pub use rate_limit::{AccessDecision, AccessGate, FixedWindowLimiter};
