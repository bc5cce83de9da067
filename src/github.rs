use crate::error::{PortfolioError, Result};
use crate::models::SectionState;
use crate::types::Repository;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const API_BASE_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 10;

/// Message shown in place of repositories when the fetch fails
pub const FETCH_FAILED: &str = "Failed to fetch repositories";

/// Rate limit budget reported by the last GitHub response
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: DateTime<Utc>,
    pub is_limited: bool,
}

pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(API_BASE_URL, token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("portfolio-hub/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(GitHubClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github.v3+json");

        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request.send().await?;
        let rate_limit = rate_limit_state(response.headers());

        match response.status() {
            status if status.is_success() => {
                if rate_limit.remaining < 10 {
                    warn!(
                        remaining = rate_limit.remaining,
                        reset = %rate_limit.reset_time,
                        "GitHub rate limit running low"
                    );
                }
                Ok(response)
            }
            reqwest::StatusCode::NOT_FOUND => {
                Err(PortfolioError::NotFound(format!("Resource not found: {}", url)))
            }
            reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::TOO_MANY_REQUESTS
                if rate_limit.is_limited =>
            {
                Err(PortfolioError::RateLimitExceeded(format!(
                    "API rate limit exceeded. Reset at: {}",
                    rate_limit.reset_time
                )))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(PortfolioError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }

    /// Fetch the first page of a user's repositories, most recently updated first.
    ///
    /// An empty username yields no repositories and issues no request.
    pub async fn fetch_repositories(
        &self,
        username: &str,
        limit: Option<usize>,
    ) -> Result<Vec<Repository>> {
        let username = username.trim();
        if username.is_empty() {
            debug!("No GitHub username configured, skipping fetch");
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/users/{}/repos?sort=updated&per_page={}",
            self.base_url, username, PER_PAGE
        );

        let response = self.make_request(&url).await?;
        let mut repos: Vec<Repository> = response.json().await?;

        if let Some(limit) = limit {
            repos.truncate(limit);
        }

        Ok(repos)
    }

    /// Fetch repositories for display, collapsing any failure into the generic message
    pub async fn repositories_section(
        &self,
        username: &str,
        limit: Option<usize>,
    ) -> SectionState<Repository> {
        match self.fetch_repositories(username, limit).await {
            Ok(repos) => SectionState::from_items(repos),
            Err(e) => {
                warn!(username, error = %e, "GitHub repository fetch failed");
                SectionState::Failed(FETCH_FAILED.to_string())
            }
        }
    }
}

/// Parse the `X-RateLimit-*` headers of a GitHub response
pub fn rate_limit_state(headers: &HeaderMap) -> RateLimitState {
    let remaining = headers
        .get("X-RateLimit-Remaining")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok());

    let limit = headers
        .get("X-RateLimit-Limit")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(60);

    let reset = headers
        .get("X-RateLimit-Reset")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

    RateLimitState {
        // missing headers (mirrors, proxies) are treated as an unknown, unexhausted budget
        remaining: remaining.unwrap_or(limit),
        limit,
        reset_time: reset,
        is_limited: remaining == Some(0),
    }
}
