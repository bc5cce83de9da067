//! Profile and social-account settings.
//!
//! Loaded once at start-up and shared read-only with every view. The built-in
//! defaults describe `myperson8`; a TOML file may override any subset of the
//! fields.

use crate::error::{PortfolioError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub profile: ProfileSettings,
    pub socials: SocialSettings,
    pub theme: ThemeSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub name: String,
    pub display_name: String,
    pub avatar_url: String,
    pub fallback_avatar_url: String,
    pub tagline: String,
    pub bio: String,
    pub location: String,
    pub email: String,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            name: "myperson8".to_string(),
            display_name: "myperson8".to_string(),
            avatar_url: "https://unavatar.io/youtube/@myperson8".to_string(),
            fallback_avatar_url: "https://github.com/myperson8.png".to_string(),
            tagline: "Software Engineer • Gamer • Content Creator".to_string(),
            bio: "Building the future of the web, one commit at a time. Catch me streaming late-night coding or high-stakes gameplay. Welcome to my digital corner.".to_string(),
            location: "Global".to_string(),
            email: "contact@myperson8.dev".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSettings {
    pub github: GitHubSettings,
    pub youtube: YouTubeSettings,
    pub twitch: TwitchSettings,
    pub twitter: TwitterSettings,
    pub discord: DiscordSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    pub username: String,
    pub url: String,
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            username: "myperson8".to_string(),
            url: "https://github.com/myperson8".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeSettings {
    pub handle: String,
    pub url: String,
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            handle: "@myperson8".to_string(),
            url: "https://youtube.com/@myperson8".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchSettings {
    pub username: String,
    pub url: String,
    pub is_live: bool,
}

impl Default for TwitchSettings {
    fn default() -> Self {
        Self {
            username: "myperson8".to_string(),
            url: "https://twitch.tv/myperson8".to_string(),
            is_live: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterSettings {
    pub username: String,
    pub url: String,
    pub verified: bool,
}

impl Default for TwitterSettings {
    fn default() -> Self {
        Self {
            username: "myperson80".to_string(),
            url: "https://x.com/myperson80".to_string(),
            verified: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordSettings {
    pub invite_url: String,
    pub server_id: String,
}

impl Default for DiscordSettings {
    fn default() -> Self {
        Self {
            invite_url: "https://discord.gg/TJ56TkCgpy".to_string(),
            server_id: "1434918817141624986".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub primary_color: String,
    pub secondary_color: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#3b82f6".to_string(),
            secondary_color: "#a855f7".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, falling back to the built-in profile
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| {
            PortfolioError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// YouTube handle without the leading `@`
    pub fn youtube_handle(&self) -> &str {
        let handle = self.socials.youtube.handle.trim();
        handle.strip_prefix('@').unwrap_or(handle)
    }

    pub fn has_twitch(&self) -> bool {
        !self.socials.twitch.username.trim().is_empty()
    }

    pub fn has_discord(&self) -> bool {
        !self.socials.discord.invite_url.trim().is_empty()
            || !self.socials.discord.server_id.trim().is_empty()
    }
}
