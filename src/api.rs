use async_trait::async_trait;
use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::error::UpstreamUnavailableError;
use crate::location::BoundingBox;

/// Upstream session cookie, acquired once at startup and never refreshed.
///
/// If the feed invalidates it, every later fetch fails until restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    cookie: String,
}

impl SessionToken {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
        }
    }

    /// Visits the feed's landing page and keeps the first `Set-Cookie` pair.
    pub async fn acquire(client: &Client, session_url: &str) -> Result<Self, UpstreamUnavailableError> {
        let res = client.get(session_url).send().await?;

        let cookie = res
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(cookie_pair)
            .ok_or(UpstreamUnavailableError::MissingSessionCookie)?;

        info!("Acquired upstream session cookie");
        Ok(Self::new(cookie))
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }
}

/// `name=value` part of a `Set-Cookie` header value.
fn cookie_pair(header: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    if pair.is_empty() {
        None
    } else {
        Some(pair.to_string())
    }
}

/// Source of raw flight feed snapshots.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(
        &self,
        session: &SessionToken,
        bounds: &BoundingBox,
    ) -> Result<Vec<u8>, UpstreamUnavailableError>;
}

/// Client for the flightradar24 zone feed.
pub struct FlightProvider {
    client: Client,
    feed_url: String,
}

impl FlightProvider {
    pub fn new(client: Client, feed: &FeedConfig) -> Self {
        Self {
            client,
            feed_url: feed.feed_url.clone(),
        }
    }

    /// HTTP client carrying the configured request timeout.
    pub fn build_client(feed: &FeedConfig) -> Result<Client, UpstreamUnavailableError> {
        Ok(Client::builder()
            .timeout(std::time::Duration::from_secs(feed.timeout_seconds))
            .build()?)
    }

    pub fn feed_url(&self, bounds: &BoundingBox) -> String {
        format!(
            "{}?faa=1&bounds={}&satellite=1&mlat=1&flarm=1&adsb=1&gnd=0&air=1&vehicles=0\
             &estimated=1&maxage=14400&gliders=0&stats=0",
            self.feed_url,
            bounds.to_query_param()
        )
    }
}

#[async_trait]
impl FeedFetcher for FlightProvider {
    async fn fetch(
        &self,
        session: &SessionToken,
        bounds: &BoundingBox,
    ) -> Result<Vec<u8>, UpstreamUnavailableError> {
        let url = self.feed_url(bounds);
        debug!("Fetching {}", url);

        let res = self
            .client
            .get(url)
            .header(COOKIE, session.cookie())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(UpstreamUnavailableError::Status(status));
        }

        Ok(res.bytes().await?.to_vec())
    }
}
