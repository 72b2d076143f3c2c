//! # Alerty Core — Domain model and derived-state computation
//!
//! Shared library for the Alerty vehicle-safety monitoring layer:
//! - Typed records for alerts, shifts, companies, fleets, users and
//!   notification groups (the backend owns the data; these are transient,
//!   non-authoritative copies).
//! - The shift/time-window matcher that decides which alerts belong to an
//!   operational shift.
//! - Dashboard summaries (counts, monthly series) computed client-side.
//! - Error taxonomy and TOML configuration.

pub mod config;
pub mod error;
pub mod shift_match;
pub mod summary;
pub mod types;

pub use config::AlertyConfig;
pub use error::{AlertyError, AlertyResult};

/// Fixed America/Lima UTC offset in seconds. Operations run in one timezone
/// and Peru observes no daylight saving, so a constant offset is correct.
pub const LIMA_UTC_OFFSET_SECS: i32 = -5 * 3600;
