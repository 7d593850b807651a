use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

use crate::api::{DirectoryClient, SiteRefresher};
use crate::auth::Session;
use crate::models::{
    BlockCommunity, CommunityId, CommunityView, FollowCommunity, ListCommunities, ListingType,
    SortType,
};
use crate::settings::{SettingKey, SettingsStore};

use super::{CommunityAction, CommunityState};

/// Trending list policy: all communities, hottest first, six of them.
pub const TRENDING_LISTING_TYPE: ListingType = ListingType::All;
pub const TRENDING_SORT: SortType = SortType::Hot;
pub const TRENDING_LIMIT: u32 = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommunityError {
    #[error("Not authorized")]
    Unauthorized,
}

/// Owns the community state and runs the workflows that feed it.
///
/// Every workflow takes `&mut self`, so state transitions never interleave.
/// Workflows that need an account read it from the `Session` passed in.
pub struct CommunityManager<C, S> {
    client: C,
    store: S,
    state: CommunityState,
}

impl<C: DirectoryClient, S: SettingsStore> CommunityManager<C, S> {
    pub fn new(client: C, store: S) -> Self {
        Self {
            client,
            store,
            state: CommunityState::new(),
        }
    }

    pub fn state(&self) -> &CommunityState {
        &self.state
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatch(&mut self, action: CommunityAction) {
        self.state.apply(action);
    }

    pub fn reset(&mut self) {
        self.dispatch(CommunityAction::ResetCommunities);
    }

    /// Fetch a community by handle and cache it. Unknown communities are ignored.
    pub async fn fetch_community(&mut self, session: &Session, handle: &str) -> Result<()> {
        let response = self.client.get_community(handle, session.token()).await?;

        match response {
            Some(response) => {
                debug!(handle = handle, "Received community");
                self.dispatch(CommunityAction::ReceivedCommunity(response.community_view));
            }
            None => debug!(handle = handle, "Community not found, nothing cached"),
        }
        Ok(())
    }

    /// Append `handle` to the active user's favorites and persist the list.
    ///
    /// A handle that is already a favorite is not appended again, so the
    /// list stays unique per user; the unchanged list is still persisted.
    pub async fn add_favorite(&mut self, session: &Session, handle: &str) -> Result<()> {
        let Some(user_handle) = session.active_handle() else {
            debug!(community = handle, "No active user, favorite not added");
            return Ok(());
        };

        let mut favorites = self.state.favorites().to_vec();
        if !favorites.iter().any(|f| f == handle) {
            favorites.push(handle.to_string());
        }
        self.save_favorites(user_handle, favorites).await
    }

    pub async fn remove_favorite(&mut self, session: &Session, handle: &str) -> Result<()> {
        let Some(user_handle) = session.active_handle() else {
            debug!(community = handle, "No active user, favorite not removed");
            return Ok(());
        };

        let favorites: Vec<String> = self
            .state
            .favorites()
            .iter()
            .filter(|f| f.as_str() != handle)
            .cloned()
            .collect();
        self.save_favorites(user_handle, favorites).await
    }

    /// Replace the in-memory favorites with the stored list of the active user.
    pub async fn load_favorites(&mut self, session: &Session) -> Result<()> {
        let Some(user_handle) = session.active_handle() else {
            self.dispatch(CommunityAction::SetFavorites(Vec::new()));
            return Ok(());
        };

        let stored = self
            .store
            .get_setting(SettingKey::FavoriteCommunities, user_handle)
            .await?;

        let favorites = match stored {
            Some(value) => serde_json::from_value::<Vec<String>>(value)
                .with_context(|| format!("Malformed favorite communities for {}", user_handle))?,
            None => Vec::new(),
        };

        debug!(user = user_handle, count = favorites.len(), "Loaded favorites");
        self.dispatch(CommunityAction::SetFavorites(favorites));
        Ok(())
    }

    /// Follow or unfollow a cached community.
    ///
    /// Communities that were never fetched are ignored; a missing auth token
    /// is an error.
    pub async fn follow_community(
        &mut self,
        session: &Session,
        follow: bool,
        handle: &str,
    ) -> Result<()> {
        let Some(community_id) = self
            .state
            .community(handle)
            .map(CommunityView::id)
            .filter(CommunityId::is_valid)
        else {
            debug!(handle = handle, "Community not cached, follow skipped");
            return Ok(());
        };
        let Some(auth) = session.token() else {
            return Err(CommunityError::Unauthorized.into());
        };

        let request = FollowCommunity {
            community_id,
            follow,
            auth: auth.to_string(),
        };
        let response = self.client.follow_community(&request).await?;

        debug!(handle = handle, follow = follow, "Follow state updated");
        self.dispatch(CommunityAction::ReceivedCommunity(response.community_view));
        Ok(())
    }

    /// Block or unblock a community, then have `site` reload the account
    /// context so block lists elsewhere stay current.
    pub async fn block_community<R>(
        &mut self,
        session: &Session,
        block: bool,
        community_id: CommunityId,
        site: &R,
    ) -> Result<()>
    where
        R: SiteRefresher + ?Sized,
    {
        if !community_id.is_valid() {
            return Ok(());
        }
        let Some(auth) = session.token() else {
            return Err(CommunityError::Unauthorized.into());
        };

        let request = BlockCommunity {
            community_id,
            block,
            auth: auth.to_string(),
        };
        let response = self.client.block_community(&request).await?;

        debug!(community_id = %community_id, block = block, "Block state updated");
        self.dispatch(CommunityAction::ReceivedCommunity(response.community_view));
        site.refresh_site(session).await
    }

    pub async fn fetch_trending_communities(&mut self) -> Result<()> {
        let request = ListCommunities {
            type_: TRENDING_LISTING_TYPE,
            sort: TRENDING_SORT,
            limit: TRENDING_LIMIT,
        };
        let response = self.client.list_communities(&request, None).await?;

        debug!(count = response.communities.len(), "Received trending communities");
        self.dispatch(CommunityAction::ReceivedTrendingCommunities(
            response.communities,
        ));
        Ok(())
    }

    /// Update favorites in memory first, then persist them for `user_handle`.
    /// A failed write leaves the in-memory list as updated.
    async fn save_favorites(&mut self, user_handle: &str, favorites: Vec<String>) -> Result<()> {
        let value = serde_json::to_value(&favorites)?;
        self.dispatch(CommunityAction::SetFavorites(favorites));

        if let Err(e) = self
            .store
            .set_setting(SettingKey::FavoriteCommunities, value, user_handle)
            .await
        {
            warn!(user = user_handle, error = %e, "Failed to persist favorite communities");
            return Err(e);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
