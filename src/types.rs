use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// GitHub API response structures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u32,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

// rss2json proxy response structures
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    pub status: String,
    #[serde(default)]
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
pub struct FeedItem {
    #[serde(default)]
    pub guid: String,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(rename = "pubDate", default)]
    pub pub_date: String,
}
