use crate::error::Result;
use crate::models::YouTubeVideo;
use crate::types::{FeedItem, FeedResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const RSS_PROXY_URL: &str = "https://api.rss2json.com/v1/api.json";
pub const FEED_BASE_URL: &str = "https://www.youtube.com/feeds/videos.xml";
pub const MAX_VIDEOS: usize = 3;

/// Legacy per-user RSS feed of a channel handle
pub fn feed_url(handle: &str) -> Result<Url> {
    Ok(Url::parse_with_params(FEED_BASE_URL, &[("user", handle)])?)
}

/// Wrap a feed URL in the RSS to JSON proxy
pub fn proxy_url(proxy_base: &str, feed: &Url) -> Result<Url> {
    Ok(Url::parse_with_params(proxy_base, &[("rss_url", feed.as_str())])?)
}

/// Video identifier from a `yt:video:<id>` guid, falling back to the `v=` query of the link
pub fn video_id(guid: &str, link: &str) -> String {
    if let Some(id) = guid.split(':').nth(2).filter(|id| !id.is_empty()) {
        return id.to_string();
    }

    link.split("v=")
        .nth(1)
        .map(|rest| rest.split('&').next().unwrap_or(rest))
        .filter(|id| !id.is_empty())
        .unwrap_or(guid)
        .to_string()
}

/// Latest videos of a proxied feed; anything but an `ok` status counts as empty
pub fn videos_from_feed(feed: FeedResponse) -> Vec<YouTubeVideo> {
    if feed.status != "ok" {
        debug!(status = %feed.status, "RSS proxy reported a non-ok status");
        return Vec::new();
    }

    feed.items
        .into_iter()
        .take(MAX_VIDEOS)
        .map(|item: FeedItem| YouTubeVideo {
            guid: video_id(&item.guid, &item.link),
            title: item.title,
            link: item.link,
            thumbnail: item.thumbnail,
            pub_date: item.pub_date,
        })
        .collect()
}

pub struct YouTubeClient {
    client: Client,
    proxy_base: String,
}

impl YouTubeClient {
    pub fn new() -> Result<Self> {
        Self::with_proxy_url(RSS_PROXY_URL)
    }

    pub fn with_proxy_url(proxy_base: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("portfolio-hub/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(YouTubeClient {
            client,
            proxy_base: proxy_base.into(),
        })
    }

    async fn fetch_feed(&self, handle: &str) -> Result<FeedResponse> {
        let url = proxy_url(&self.proxy_base, &feed_url(handle)?)?;
        let response = self.client.get(url).send().await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Detect the latest videos of a channel handle. Failures yield an empty list.
    pub async fn fetch_latest_videos(&self, handle: &str) -> Vec<YouTubeVideo> {
        let handle = handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            return Vec::new();
        }

        match self.fetch_feed(handle).await {
            Ok(feed) => videos_from_feed(feed),
            Err(e) => {
                warn!(handle, error = %e, "YouTube detection failed");
                Vec::new()
            }
        }
    }
}
