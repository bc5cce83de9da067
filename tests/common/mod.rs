#![allow(dead_code)]

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use portfolio_hub::auth::AuthStore;
use portfolio_hub::github::GitHubClient;
use portfolio_hub::oauth::OAuthConfig;
use portfolio_hub::settings::Settings;
use portfolio_hub::state::AppState;
use portfolio_hub::youtube::YouTubeClient;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Canned responses served by the stand-in GitHub API and RSS proxy
#[derive(Clone)]
pub struct Upstream {
    pub repos_status: StatusCode,
    pub repos_body: Value,
    pub rate_limit_remaining: u32,
    pub feed_body: String,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            repos_status: StatusCode::OK,
            repos_body: repos_json(10),
            rate_limit_remaining: 59,
            feed_body: feed_json(5).to_string(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    upstream: Upstream,
    github_hits: Arc<AtomicUsize>,
    feed_hits: Arc<AtomicUsize>,
}

pub struct MockServer {
    pub base_url: String,
    github_hits: Arc<AtomicUsize>,
    feed_hits: Arc<AtomicUsize>,
}

impl MockServer {
    pub async fn start(upstream: Upstream) -> anyhow::Result<Self> {
        let github_hits = Arc::new(AtomicUsize::new(0));
        let feed_hits = Arc::new(AtomicUsize::new(0));

        let state = MockState {
            upstream,
            github_hits: github_hits.clone(),
            feed_hits: feed_hits.clone(),
        };

        let app = Router::new()
            .route("/users/:username/repos", get(user_repos))
            .route("/rss", get(rss_proxy))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            github_hits,
            feed_hits,
        })
    }

    pub fn github_hits(&self) -> usize {
        self.github_hits.load(Ordering::SeqCst)
    }

    pub fn feed_hits(&self) -> usize {
        self.feed_hits.load(Ordering::SeqCst)
    }

    pub fn github_client(&self) -> GitHubClient {
        GitHubClient::with_base_url(&self.base_url, None).expect("Failed to create client")
    }

    pub fn youtube_client(&self) -> YouTubeClient {
        YouTubeClient::with_proxy_url(format!("{}/rss", self.base_url))
            .expect("Failed to create client")
    }

    /// Application state wired to this server, with a short authorization delay
    pub fn app_state(&self, settings: Settings, auth: AuthStore) -> AppState {
        let oauth = OAuthConfig {
            delay: Duration::from_millis(50),
            ..Default::default()
        };
        AppState::new(settings, self.github_client(), self.youtube_client(), auth, oauth)
    }
}

async fn user_repos(State(state): State<MockState>) -> impl IntoResponse {
    state.github_hits.fetch_add(1, Ordering::SeqCst);
    let upstream = state.upstream;
    (
        upstream.repos_status,
        [
            ("X-RateLimit-Limit", "60".to_string()),
            ("X-RateLimit-Remaining", upstream.rate_limit_remaining.to_string()),
            ("X-RateLimit-Reset", "1700000000".to_string()),
        ],
        Json(upstream.repos_body),
    )
}

async fn rss_proxy(State(state): State<MockState>) -> impl IntoResponse {
    state.feed_hits.fetch_add(1, Ordering::SeqCst);
    (
        [("content-type", "application/json")],
        state.upstream.feed_body,
    )
}

pub fn repos_json(count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| {
                json!({
                    "id": 1000 + i,
                    "name": format!("project-{}", i),
                    "full_name": format!("myperson8/project-{}", i),
                    "description": if i % 2 == 0 { Value::Null } else { json!("A side project") },
                    "html_url": format!("https://github.com/myperson8/project-{}", i),
                    "stargazers_count": i * 3,
                    "language": if i % 3 == 0 { Value::Null } else { json!("Rust") },
                    "updated_at": "2024-06-01T12:00:00Z",
                    "fork": false
                })
            })
            .collect(),
    )
}

pub fn feed_json(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Video {}", i),
                "pubDate": "2024-05-20 17:00:00",
                "link": format!("https://www.youtube.com/watch?v=vid{}", i),
                "guid": format!("yt:video:vid{}", i),
                "author": "myperson8",
                "thumbnail": format!("https://i.ytimg.com/vi/vid{}/hqdefault.jpg", i),
                "description": "",
                "enclosure": {},
                "categories": []
            })
        })
        .collect();

    json!({
        "status": "ok",
        "feed": { "url": "https://www.youtube.com/feeds/videos.xml?user=myperson8" },
        "items": items
    })
}
