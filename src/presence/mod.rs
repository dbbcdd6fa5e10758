//! Presence adapter for the upstream Lanyard-style API.
//!
//! # Data Flow
//! ```text
//! user id
//!     → client.rs (single GET {base_url}/{id})
//!     → types.rs (PresenceEnvelope, spotify as object | list | absent)
//!     → PresenceSnapshot (normalized, ordered lists)
//! ```
//!
//! # Design Decisions
//! - Errors are returned, not swallowed; the handler decides the response
//! - No retries and no timeout unless configured

pub mod client;
pub mod types;

pub use client::{PresenceClient, PresenceError};
pub use types::{Activity, PresenceSnapshot, SpotifyEntry};
