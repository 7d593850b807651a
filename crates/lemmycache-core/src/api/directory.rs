use anyhow::Result;
use async_trait::async_trait;

use crate::auth::Session;
use crate::models::{
    BlockCommunity, BlockCommunityResponse, CommunityResponse, FollowCommunity,
    GetCommunityResponse, ListCommunities, ListCommunitiesResponse,
};

/// Operations the community cache needs from the remote directory.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Look up a community by name (`name` or `name@host`).
    /// Returns `Ok(None)` when the instance does not know it.
    async fn get_community(
        &self,
        name: &str,
        auth: Option<&str>,
    ) -> Result<Option<GetCommunityResponse>>;

    async fn follow_community(&self, request: &FollowCommunity) -> Result<CommunityResponse>;

    async fn block_community(&self, request: &BlockCommunity) -> Result<BlockCommunityResponse>;

    async fn list_communities(
        &self,
        request: &ListCommunities,
        auth: Option<&str>,
    ) -> Result<ListCommunitiesResponse>;
}

/// Reloads the current user / site context after account-level changes
/// such as blocking a community.
#[async_trait]
pub trait SiteRefresher: Send + Sync {
    async fn refresh_site(&self, session: &Session) -> Result<()>;
}
