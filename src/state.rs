use crate::auth::AuthStore;
use crate::github::GitHubClient;
use crate::oauth::{Authoriser, OAuthConfig};
use crate::settings::Settings;
use crate::youtube::YouTubeClient;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub github: Arc<GitHubClient>,
    pub youtube: Arc<YouTubeClient>,
    pub auth: AuthStore,
    pub authoriser: Authoriser,
    pub oauth: Arc<OAuthConfig>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        settings: Settings,
        github: GitHubClient,
        youtube: YouTubeClient,
        auth: AuthStore,
        oauth: OAuthConfig,
    ) -> Self {
        let authoriser = Authoriser::new(auth.clone(), oauth.delay);
        Self {
            settings: Arc::new(settings),
            github: Arc::new(github),
            youtube: Arc::new(youtube),
            auth,
            authoriser,
            oauth: Arc::new(oauth),
            start_time: Instant::now(),
        }
    }
}
