//! Profile lookups against Instagram's public web profile endpoint.

use super::{is_valid_username, AccountFetcher, FetchFuture, ProfileSnapshot};
use crate::config::FetcherConfig;
use crate::error::FetchError;
use crate::features::RawAccountFeatures;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

const PROFILE_PATH: &str = "/api/v1/users/web_profile_info/";

#[derive(Deserialize)]
struct ProfileResponse {
    data: Option<ProfileData>,
}

#[derive(Deserialize)]
struct ProfileData {
    user: Option<ProfileUser>,
}

#[derive(Deserialize)]
struct Count {
    count: u64,
}

#[derive(Deserialize)]
struct ProfileUser {
    username: String,
    #[serde(default)]
    is_private: bool,
    edge_followed_by: Count,
    edge_follow: Count,
    edge_owner_to_timeline_media: Count,
}

/// Map a non-success HTTP status to a lookup failure.
pub(crate) fn classify_status(status: u16) -> FetchError {
    match status {
        404 => FetchError::NotFound,
        // Instagram answers throttled anonymous clients with 401/403 as well as 429
        401 | 403 | 429 => FetchError::RateLimited,
        s => FetchError::Transient(format!("profile source returned HTTP {s}")),
    }
}

/// Parse a web profile response body.
pub(crate) fn parse_profile(body: &[u8]) -> Result<ProfileSnapshot, FetchError> {
    let resp: ProfileResponse = serde_json::from_slice(body)
        .map_err(|e| FetchError::Transient(format!("unexpected profile payload: {e}")))?;
    let user = resp
        .data
        .and_then(|d| d.user)
        .ok_or(FetchError::NotFound)?;
    Ok(ProfileSnapshot {
        username: user.username,
        followers: user.edge_followed_by.count,
        followees: user.edge_follow.count,
        media_count: user.edge_owner_to_timeline_media.count,
        is_private: user.is_private,
    })
}

pub struct InstagramFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl InstagramFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(&config.app_id) {
            headers.insert("x-ig-app-id", v);
        }
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn lookup(&self, username: &str) -> Result<ProfileSnapshot, FetchError> {
        if !is_valid_username(username) {
            debug!(username, "rejecting malformed username without lookup");
            return Err(FetchError::NotFound);
        }

        let url = format!("{}{}", self.base_url, PROFILE_PATH);
        let res = self
            .client
            .get(&url)
            .query(&[("username", username)])
            .send()
            .await
            .map_err(request_error)?;

        let status = res.status();
        if !status.is_success() {
            let err = classify_status(status.as_u16());
            warn!(username, status = status.as_u16(), error = %err, "profile lookup failed");
            return Err(err);
        }

        let body = res.bytes().await.map_err(request_error)?;
        parse_profile(&body)
    }
}

fn request_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transient(e.to_string())
    }
}

impl AccountFetcher for InstagramFetcher {
    fn fetch<'a>(&'a self, username: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let profile = self.lookup(username).await?;
            Ok(RawAccountFeatures::from(&profile))
        })
    }
}
