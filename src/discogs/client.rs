use async_trait::async_trait;
use log::debug;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use std::time::Duration;

use crate::config::FetchSettings;
use crate::discogs::fetcher::PageSource;
use crate::discogs::types::CollectionPage;
use crate::{Result, VinylError};

/// Authenticated access to the Discogs collection endpoint.
pub struct DiscogsClient {
    http_client: reqwest::Client,
    base_url: Url,
    token: String,
    user_agent: String,
}

impl DiscogsClient {
    pub fn new(token: impl Into<String>, settings: &FetchSettings) -> Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|e| VinylError::InvalidBaseUrl(format!("{}: {}", settings.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(VinylError::InvalidBaseUrl(settings.base_url.clone()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            token: token.into(),
            user_agent: settings.user_agent.clone(),
        })
    }

    /// `{base}/users/{username}/collection/folders/0/releases`, with the
    /// username percent-encoded as a single path segment.
    pub fn releases_url(&self, username: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| VinylError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["users", username, "collection", "folders", "0", "releases"]);
        Ok(url)
    }
}

#[async_trait]
impl PageSource for DiscogsClient {
    async fn fetch_page(&self, username: &str, page: u32, per_page: u32) -> Result<CollectionPage> {
        let url = self.releases_url(username)?;
        debug!("Requesting page {} of {}'s collection", page, username);

        let response = self
            .http_client
            .get(url)
            .query(&[("per_page", per_page), ("page", page)])
            .header(AUTHORIZATION, format!("Discogs token={}", self.token))
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VinylError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
