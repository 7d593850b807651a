//! Data models for Lemmy entities.
//!
//! - `CommunityView`, `Community`, `CommunityAggregates`: community records
//!   and the viewer's relationship to them
//! - Request/response shapes for the community endpoints
//! - Site and login types used for session and site context

pub mod community;
pub mod site;

pub use community::{
    BlockCommunity, BlockCommunityResponse, Community, CommunityAggregates, CommunityId,
    CommunityResponse, CommunityView, FollowCommunity, GetCommunityResponse, ListCommunities,
    ListCommunitiesResponse, ListingType, SortType, SubscribedType,
};
pub use site::{GetSiteResponse, Login, LoginResponse, MyUserInfo};
