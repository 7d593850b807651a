//! API client for communicating with a Lemmy instance.
//!
//! This module provides the `LemmyClient` struct for fetching, listing,
//! following and blocking communities, logging in, and loading site context.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::{Session, SessionData};
use crate::models::{
    BlockCommunity, BlockCommunityResponse, CommunityResponse, FollowCommunity,
    GetCommunityResponse, GetSiteResponse, ListCommunities, ListCommunitiesResponse, Login,
    LoginResponse,
};

use super::{ApiError, DirectoryClient, SiteRefresher};

// ============================================================================
// Constants
// ============================================================================

/// Path prefix of the Lemmy HTTP API
const API_PATH: &str = "api/v3";

/// HTTP request timeout in seconds.
/// 30s allows for slow federated instances while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for a single Lemmy instance.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct LemmyClient {
    client: Client,
    base_url: Url,
    site: Arc<RwLock<Option<GetSiteResponse>>>,
}

impl LemmyClient {
    /// Create a new client for the instance at `instance_url`
    /// (`https://lemmy.ml` or bare `lemmy.ml`).
    pub fn new(instance_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: Self::normalize_base_url(instance_url)?,
            site: Arc::new(RwLock::new(None)),
        })
    }

    fn normalize_base_url(instance_url: &str) -> Result<Url> {
        let trimmed = instance_url.trim().trim_end_matches('/');
        let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };
        let url = Url::parse(&format!("{}/", with_scheme))
            .with_context(|| format!("Invalid instance URL: {}", instance_url))?;
        if url.host_str().is_none() {
            anyhow::bail!("Instance URL has no host: {}", instance_url);
        }
        Ok(url)
    }

    pub fn instance_url(&self) -> String {
        self.base_url.as_str().trim_end_matches('/').to_string()
    }

    pub fn instance_host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    /// The most recently loaded site context, if any.
    pub async fn site(&self) -> Option<GetSiteResponse> {
        self.site.read().await.clone()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(&format!("{}/{}", API_PATH, path))
            .with_context(|| format!("Failed to build URL for {}", path))
    }

    fn with_auth(builder: RequestBuilder, auth: Option<&str>) -> RequestBuilder {
        match auth {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        auth: Option<&str>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let mut params: Vec<(&str, String)> = query.to_vec();
        if let Some(token) = auth {
            params.push(("auth", token.to_string()));
        }

        let builder = Self::with_auth(self.client.get(url.clone()).query(&params), auth);
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Option<&str>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let builder = Self::with_auth(self.client.post(url.clone()).json(body), auth);
        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    /// Log in and return session data for `username@instance`.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionData> {
        let request = Login {
            username_or_email: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .post("user/login", &request, None)
            .await
            .context("Failed to log in")?;

        let jwt = response.jwt.ok_or_else(|| {
            anyhow::anyhow!("Login did not return a token (email verification may be pending)")
        })?;

        let handle = format!("{}@{}", username, self.instance_host());
        debug!(handle = %handle, "Logged in");
        Ok(SessionData::logged_in(self.instance_url(), handle, jwt))
    }

    /// Fetch the site and current-user context.
    pub async fn get_site(&self, auth: Option<&str>) -> Result<GetSiteResponse> {
        self.get("site", &[], auth).await
    }
}

#[async_trait]
impl DirectoryClient for LemmyClient {
    async fn get_community(
        &self,
        name: &str,
        auth: Option<&str>,
    ) -> Result<Option<GetCommunityResponse>> {
        let result = self
            .get::<GetCommunityResponse>("community", &[("name", name.to_string())], auth)
            .await;

        match result {
            Ok(response) => Ok(Some(response)),
            Err(e) if e.downcast_ref::<ApiError>().is_some_and(ApiError::is_not_found) => {
                debug!(name = name, "Community not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn follow_community(&self, request: &FollowCommunity) -> Result<CommunityResponse> {
        self.post("community/follow", request, Some(request.auth.as_str())).await
    }

    async fn block_community(&self, request: &BlockCommunity) -> Result<BlockCommunityResponse> {
        self.post("community/block", request, Some(request.auth.as_str())).await
    }

    async fn list_communities(
        &self,
        request: &ListCommunities,
        auth: Option<&str>,
    ) -> Result<ListCommunitiesResponse> {
        let query = [
            ("type_", request.type_.as_str().to_string()),
            ("sort", request.sort.as_str().to_string()),
            ("limit", request.limit.to_string()),
        ];
        self.get("community/list", &query, auth).await
    }
}

#[async_trait]
impl SiteRefresher for LemmyClient {
    async fn refresh_site(&self, session: &Session) -> Result<()> {
        let site = self.get_site(session.token()).await?;
        debug!(
            version = %site.version,
            blocked = site.blocked_community_count(),
            "Refreshed site context"
        );
        *self.site.write().await = Some(site);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        let url = LemmyClient::normalize_base_url("lemmy.ml").unwrap();
        assert_eq!(url.as_str(), "https://lemmy.ml/");

        let url = LemmyClient::normalize_base_url("http://localhost:8536/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8536/");

        assert!(LemmyClient::normalize_base_url("exa mple.com").is_err());
    }

    #[test]
    fn test_endpoint_joins_api_path() {
        let client = LemmyClient::new("https://lemmy.world").unwrap();
        let url = client.endpoint("community/list").unwrap();
        assert_eq!(url.as_str(), "https://lemmy.world/api/v3/community/list");
        assert_eq!(client.instance_url(), "https://lemmy.world");
        assert_eq!(client.instance_host(), "lemmy.world");
    }

    #[tokio::test]
    async fn test_site_context_empty_until_refreshed() {
        let client = LemmyClient::new("https://lemmy.world").unwrap();
        assert!(client.site().await.is_none());

        let site: GetSiteResponse = serde_json::from_str(r#"{"version":"0.18.4"}"#).unwrap();
        *client.site.write().await = Some(site);

        let shared = client.clone();
        let cached = shared.site().await.expect("site context shared across clones");
        assert_eq!(cached.version, "0.18.4");
        assert_eq!(cached.blocked_community_count(), 0);
    }
}
