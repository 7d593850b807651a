// Allow dead code: API response structs have fields for completeness
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub sidebar: Option<String>,
    pub actor_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteView {
    pub site: Site,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub actor_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalUserView {
    pub person: Person,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityFollowerView {
    pub community: super::Community,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityBlockView {
    pub community: super::Community,
}

/// The logged-in user's account context as reported by `/site`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyUserInfo {
    pub local_user_view: LocalUserView,
    #[serde(default)]
    pub follows: Vec<CommunityFollowerView>,
    #[serde(default)]
    pub community_blocks: Vec<CommunityBlockView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetSiteResponse {
    #[serde(default)]
    pub site_view: Option<SiteView>,
    #[serde(default)]
    pub my_user: Option<MyUserInfo>,
    #[serde(default)]
    pub version: String,
}

impl GetSiteResponse {
    pub fn blocked_community_count(&self) -> usize {
        self.my_user
            .as_ref()
            .map(|u| u.community_blocks.len())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Login {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub jwt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_community_count() {
        let json = r#"{"version":"0.18.4","my_user":{"local_user_view":{"person":{"id":5,"name":"alice","actor_id":"https://lemmy.ml/u/alice"}},"follows":[],"community_blocks":[{"community":{"id":9,"name":"spam","title":"Spam","actor_id":"https://lemmy.ml/c/spam"}},{"community":{"id":10,"name":"memes","title":"Memes","actor_id":"https://lemmy.world/c/memes"}}]}}"#;
        let site: GetSiteResponse =
            serde_json::from_str(json).expect("Failed to parse site test JSON");
        assert_eq!(site.blocked_community_count(), 2);

        let anonymous: GetSiteResponse = serde_json::from_str(r#"{"version":"0.18.4"}"#).unwrap();
        assert_eq!(anonymous.blocked_community_count(), 0);
    }
}
