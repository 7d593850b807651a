//! Durable per-user settings.
//!
//! This module provides the `SettingsStore` trait and `FileSettingsStore`,
//! which keeps one JSON document per user handle. Settings are addressed by
//! a `SettingKey` and stored as raw JSON values.

pub mod store;

pub use store::{FileSettingsStore, SettingKey, SettingsStore};
