//! Session handling for the active Lemmy account.
//!
//! `Session` carries the two pieces of context every community workflow
//! reads: the auth token (JWT) and the active user handle. It can be
//! persisted to `session.json` in the data directory.

pub mod session;

pub use session::{Session, SessionData};
