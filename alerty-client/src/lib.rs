//! # Alerty Client — Session-aware REST client for the Alerty backend
//!
//! Everything that talks to the remote backend lives here:
//! - `session`: explicit login session object (token + profile fields),
//!   created on login, attached to requests, cleared on logout/expiry.
//! - `ingest`: the single normalization boundary turning the backend's loose
//!   JSON into typed records.
//! - `cache`: time-based staleness wrapper for fetched lists.
//! - `api`: the `BackendClient` with alert and CRUD operations.

pub mod api;
pub mod cache;
pub mod ingest;
pub mod session;

pub use api::BackendClient;
pub use session::{Session, SessionStore};
