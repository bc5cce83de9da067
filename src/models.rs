use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity provider a mock login claims to come from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Discord,
    GitHub,
}

impl Provider {
    /// Resolve the `state` callback parameter. Anything unrecognised is Discord.
    pub fn from_state(state: Option<&str>) -> Self {
        match state {
            Some(s) if s.eq_ignore_ascii_case("github") => Provider::GitHub,
            _ => Provider::Discord,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Discord => "discord",
            Provider::GitHub => "github",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in visitor, as fabricated by the mock authorization callback
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub username: String,
    pub avatar: String,
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Video detected on the configured YouTube channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YouTubeVideo {
    pub guid: String,
    pub title: String,
    pub link: String,
    pub thumbnail: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
}

/// Outcome of fetching one section's data
#[derive(Debug, Clone, PartialEq)]
pub enum SectionState<T> {
    Ready(Vec<T>),
    Empty,
    Failed(String),
}

impl<T> SectionState<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            SectionState::Empty
        } else {
            SectionState::Ready(items)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            SectionState::Ready(items) => items,
            _ => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SectionState::Failed(_))
    }
}
