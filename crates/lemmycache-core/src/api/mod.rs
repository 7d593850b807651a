//! Remote directory access for a Lemmy instance.
//!
//! This module provides the `DirectoryClient` and `SiteRefresher` traits the
//! community workflows depend on, and `LemmyClient`, their implementation
//! over the Lemmy v3 HTTP API.
//!
//! Authenticated calls carry the session JWT both as the `auth` parameter
//! and as a bearer token, which covers 0.18 and 0.19 instances.

pub mod client;
pub mod directory;
pub mod error;

pub use client::LemmyClient;
pub use directory::{DirectoryClient, SiteRefresher};
pub use error::ApiError;
