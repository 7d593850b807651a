use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Server-assigned community id. Zero and negative values never name a
/// real community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunityId(pub i32);

impl CommunityId {
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: CommunityId,
    pub name: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub removed: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub nsfw: bool,
    pub actor_id: String,
    #[serde(default)]
    pub local: bool,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub posting_restricted_to_mods: bool,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub instance_id: Option<i32>,
}

impl Community {
    /// The host the community lives on, taken from its ActivityPub actor id.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.actor_id)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }

    /// Bare name for communities local to the instance, `name@host` for
    /// federated ones. A local name is also what the instance resolves in
    /// `/community?name=`, so a lookup by bare name caches under the same key.
    pub fn handle(&self) -> String {
        if self.local {
            return self.name.clone();
        }
        match self.host() {
            Some(host) => format!("{}@{}", self.name, host),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SubscribedType {
    Subscribed,
    #[default]
    NotSubscribed,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommunityAggregates {
    #[serde(default)]
    pub subscribers: i64,
    #[serde(default)]
    pub posts: i64,
    #[serde(default)]
    pub comments: i64,
    #[serde(default)]
    pub users_active_day: i64,
    #[serde(default)]
    pub users_active_week: i64,
    #[serde(default)]
    pub users_active_month: i64,
    #[serde(default)]
    pub users_active_half_year: i64,
    #[serde(default)]
    pub hot_rank: Option<f64>,
}

/// A community together with the viewer's relationship to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityView {
    pub community: Community,
    #[serde(default)]
    pub subscribed: SubscribedType,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub counts: CommunityAggregates,
}

impl CommunityView {
    pub fn handle(&self) -> String {
        self.community.handle()
    }

    pub fn id(&self) -> CommunityId {
        self.community.id
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed == SubscribedType::Subscribed
    }

    pub fn display_subscribers(&self) -> String {
        match self.counts.subscribers {
            1 => "1 subscriber".to_string(),
            n => format!("{} subscribers", n),
        }
    }
}

/// Listing scope accepted by `/community/list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingType {
    All,
    Local,
    Subscribed,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::All => "All",
            ListingType::Local => "Local",
            ListingType::Subscribed => "Subscribed",
        }
    }
}

/// Sort orders accepted by `/community/list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    Active,
    Hot,
    New,
    Old,
    TopDay,
    TopWeek,
    TopMonth,
    TopYear,
    TopAll,
}

impl SortType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortType::Active => "Active",
            SortType::Hot => "Hot",
            SortType::New => "New",
            SortType::Old => "Old",
            SortType::TopDay => "TopDay",
            SortType::TopWeek => "TopWeek",
            SortType::TopMonth => "TopMonth",
            SortType::TopYear => "TopYear",
            SortType::TopAll => "TopAll",
        }
    }
}

// ===== Request / response shapes =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCommunityResponse {
    pub community_view: CommunityView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityResponse {
    pub community_view: CommunityView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockCommunityResponse {
    pub community_view: CommunityView,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ListCommunitiesResponse {
    #[serde(default)]
    pub communities: Vec<CommunityView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowCommunity {
    pub community_id: CommunityId,
    pub follow: bool,
    pub auth: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockCommunity {
    pub community_id: CommunityId,
    pub block: bool,
    pub auth: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCommunities {
    pub type_: ListingType,
    pub sort: SortType,
    pub limit: u32,
}
