//! Simulated social login.
//!
//! Redirects to a provider's real authorization page, but the callback never
//! exchanges the code: after a fixed delay it signs in a fabricated profile.
//! Nothing here verifies a token or a signature.

use crate::auth::AuthStore;
use crate::error::Result;
use crate::models::{Provider, UserProfile};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use url::Url;

pub const DISCORD_AUTHORIZE_URL: &str = "https://discord.com/oauth2/authorize";
pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

const GITHUB_AVATAR: &str = "https://github.com/identicons/myperson8.png";
const DISCORD_AVATAR: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub discord_client_id: String,
    pub github_client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub delay: Duration,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            discord_client_id: "1434918817141624986".to_string(),
            github_client_id: "Ov23liMyperson8Demo".to_string(),
            redirect_uri: "http://localhost:3000/authorising".to_string(),
            scope: "identify".to_string(),
            delay: DEFAULT_DELAY,
        }
    }
}

impl OAuthConfig {
    /// Authorization page of the provider; `state` carries the provider name back
    pub fn authorization_url(&self, provider: Provider) -> Result<Url> {
        let (endpoint, client_id) = match provider {
            Provider::Discord => (DISCORD_AUTHORIZE_URL, &self.discord_client_id),
            Provider::GitHub => (GITHUB_AUTHORIZE_URL, &self.github_client_id),
        };

        Ok(Url::parse_with_params(
            endpoint,
            &[
                ("client_id", client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", self.scope.as_str()),
                ("state", provider.as_str()),
            ],
        )?)
    }
}

/// Profile handed out for any authorization code
pub fn fabricate_profile(code: &str, provider: Provider) -> UserProfile {
    let avatar = match provider {
        Provider::GitHub => GITHUB_AVATAR,
        Provider::Discord => DISCORD_AVATAR,
    };

    UserProfile {
        username: "Verified User".to_string(),
        avatar: avatar.to_string(),
        provider,
        id: Some(code.chars().take(8).collect()),
    }
}

/// A scheduled login and the flag that withdraws it
#[derive(Debug)]
struct PendingLogin {
    handle: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
}

impl PendingLogin {
    /// The task is never aborted: a login that already holds the auth lock finishes
    /// its storage write, and one that has not yet taken it sees the flag and stops.
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Holds the one pending delayed login. Starting a new one or cancelling withdraws it.
#[derive(Debug, Clone)]
pub struct Authoriser {
    auth: AuthStore,
    delay: Duration,
    pending: Arc<Mutex<Option<PendingLogin>>>,
}

impl Authoriser {
    pub fn new(auth: AuthStore, delay: Duration) -> Self {
        Self {
            auth,
            delay,
            pending: Arc::new(Mutex::new(None)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule the fabricated login for an authorization callback
    pub fn begin(&self, code: &str, state: Option<&str>) {
        let provider = Provider::from_state(state);
        let profile = fabricate_profile(code, provider);
        let auth = self.auth.clone();
        let delay = self.delay;

        info!(%provider, "Authorization callback received, verifying");

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if flag.load(Ordering::SeqCst) {
                return;
            }
            if let Err(e) = auth.login_unless(profile, &flag).await {
                error!(error = %e, "Failed to store signed-in profile");
            }
        });

        let previous = self
            .lock_pending()
            .replace(PendingLogin { handle, cancelled });
        if let Some(previous) = previous {
            debug!("Replacing pending authorization");
            previous.cancel();
        }
    }

    pub fn cancel(&self) {
        if let Some(pending) = self.lock_pending().take() {
            debug!("Cancelling pending authorization");
            pending.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|pending| !pending.handle.is_finished())
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Option<PendingLogin>> {
        // a poisoned lock only means a panic while swapping handles; the slot is still usable
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
