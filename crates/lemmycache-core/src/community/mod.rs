//! Community cache and favorites.
//!
//! `CommunityState` holds the cached community views keyed by handle, the
//! trending list and the active user's favorites. `CommunityManager` owns a
//! state and runs the async workflows that fetch, follow, block and persist.

pub mod manager;
pub mod state;

pub use manager::{
    CommunityError, CommunityManager, TRENDING_LIMIT, TRENDING_LISTING_TYPE, TRENDING_SORT,
};
pub use state::{CommunityAction, CommunityState};
