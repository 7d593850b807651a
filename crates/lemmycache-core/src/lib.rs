//! lemmycache core library.
//!
//! Client-side community cache for Lemmy: fetches community metadata,
//! tracks a trending list and keeps each user's favorite communities in a
//! local settings store.

pub mod api;
pub mod auth;
pub mod community;
pub mod config;
pub mod models;
pub mod settings;

pub use api::{ApiError, DirectoryClient, LemmyClient, SiteRefresher};
pub use auth::{Session, SessionData};
pub use community::{CommunityAction, CommunityError, CommunityManager, CommunityState};
pub use config::Config;
pub use settings::{FileSettingsStore, SettingKey, SettingsStore};
