mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use common::{MockServer, Upstream};
use portfolio_hub::auth::{AuthStore, LocalStorage, STORAGE_KEY};
use portfolio_hub::models::{Provider, UserProfile};
use portfolio_hub::routes::create_router;
use portfolio_hub::settings::Settings;
use std::time::Duration;
use tower::util::ServiceExt;

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn app_with(upstream: Upstream, settings: Settings, auth: AuthStore) -> (Router, MockServer) {
    let server = MockServer::start(upstream).await.unwrap();
    let app = create_router(server.app_state(settings, auth));
    (app, server)
}

#[tokio::test]
async fn test_authorising_with_code_signs_in_after_delay() {
    let auth = AuthStore::memory();
    let (app, _server) = app_with(Upstream::default(), Settings::default(), auth.clone()).await;

    let response = get(&app, "/authorising?code=XYZ&state=github").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("refresh").unwrap().to_str().unwrap(),
        "1;url=/home"
    );
    let html = body_text(response).await;
    assert!(html.contains("Establishing Secure Connection"));

    // not signed in until the delay has passed
    assert!(auth.current().await.is_none());

    tokio::time::sleep(Duration::from_millis(300)).await;
    let profile = auth.current().await.expect("profile should be stored");
    assert_eq!(profile.provider, Provider::GitHub);
    assert_eq!(profile.id.as_deref(), Some("XYZ"));

    let home = body_text(get(&app, "/home").await).await;
    assert!(home.contains(r#"data-auth="signed-in""#));
    assert!(home.contains("Verified User"));
}

#[tokio::test]
async fn test_authorising_without_code_returns_home() {
    let auth = AuthStore::memory();
    let (app, _server) = app_with(Upstream::default(), Settings::default(), auth.clone()).await;

    let response = get(&app, "/authorising?state=github").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/home");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(auth.current().await.is_none());
}

#[tokio::test]
async fn test_logout_clears_persisted_profile() {
    let dir = tempfile::tempdir().unwrap();
    let storage = LocalStorage::new(Some(dir.path().join("storage.json")));
    let auth = AuthStore::open(storage.clone()).await.unwrap();
    auth.login(UserProfile {
        username: "Verified User".to_string(),
        avatar: "https://cdn.discordapp.com/embed/avatars/0.png".to_string(),
        provider: Provider::Discord,
        id: Some("abc".to_string()),
    })
    .await
    .unwrap();
    assert!(storage.get(STORAGE_KEY).await.unwrap().is_some());

    let (app, _server) = app_with(Upstream::default(), Settings::default(), auth.clone()).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/home");

    assert!(auth.current().await.is_none());
    assert!(storage.get(STORAGE_KEY).await.unwrap().is_none());

    let html = body_text(get(&app, "/twitch").await).await;
    assert!(html.contains(r#"data-auth="signed-out""#));
    assert!(!html.contains("Verified User"));
}

#[tokio::test]
async fn test_home_limits_repositories() {
    let (app, _server) = app_with(Upstream::default(), Settings::default(), AuthStore::memory()).await;

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;

    assert_eq!(html.matches("repo-card").count(), 4);
    assert_eq!(html.matches("video-card").count(), 3);
    assert!(html.contains("Twitch Status"));
}

#[tokio::test]
async fn test_github_page_shows_all_fetched() {
    let (app, _server) = app_with(Upstream::default(), Settings::default(), AuthStore::memory()).await;

    let html = body_text(get(&app, "/github").await).await;
    assert_eq!(html.matches("repo-card").count(), 10);
    assert!(html.contains(r#"aria-current="page">GitHub</a>"#));
}

#[tokio::test]
async fn test_github_error_renders_no_cards() {
    let upstream = Upstream {
        repos_status: StatusCode::FORBIDDEN,
        rate_limit_remaining: 0,
        ..Default::default()
    };
    let (app, _server) = app_with(upstream, Settings::default(), AuthStore::memory()).await;

    let html = body_text(get(&app, "/github").await).await;
    assert!(html.contains("Error loading repositories: Failed to fetch repositories"));
    assert!(!html.contains("repo-card"));
}

#[tokio::test]
async fn test_empty_username_renders_empty_state() {
    let mut settings = Settings::default();
    settings.socials.github.username = String::new();
    let (app, server) = app_with(Upstream::default(), settings, AuthStore::memory()).await;

    let html = body_text(get(&app, "/github").await).await;
    assert!(html.contains("No repositories found."));
    assert!(!html.contains("repo-card"));
    assert_eq!(server.github_hits(), 0);
}

#[tokio::test]
async fn test_youtube_empty_feed_renders_placeholder() {
    let upstream = Upstream {
        feed_body: common::feed_json(0).to_string(),
        ..Default::default()
    };
    let (app, _server) = app_with(upstream, Settings::default(), AuthStore::memory()).await;

    let response = get(&app, "/youtube").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No videos found on this channel yet."));
    assert!(html.contains("Content detected from @myperson8"));
}

#[tokio::test]
async fn test_discord_not_configured() {
    let mut settings = Settings::default();
    settings.socials.discord.invite_url.clear();
    settings.socials.discord.server_id.clear();
    let (app, _server) = app_with(Upstream::default(), settings, AuthStore::memory()).await;

    let html = body_text(get(&app, "/discord").await).await;
    assert!(html.contains("Discord Not Configured"));
    assert!(!html.contains("Accept Invite"));
}

#[tokio::test]
async fn test_login_redirects_to_provider() {
    let (app, _server) = app_with(Upstream::default(), Settings::default(), AuthStore::memory()).await;

    let response = get(&app, "/login").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("https://discord.com/oauth2/authorize?"));
    assert!(location(&response).contains("state=discord"));

    let response = get(&app, "/login?provider=github").await;
    assert!(location(&response).starts_with("https://github.com/login/oauth/authorize?"));
}

#[tokio::test]
async fn test_case_alias_and_catch_all() {
    let (app, _server) = app_with(Upstream::default(), Settings::default(), AuthStore::memory()).await;

    let response = get(&app, "/GitHub").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/github");

    let response = get(&app, "/Authorising?code=abc").await;
    assert_eq!(location(&response), "/authorising?code=abc");

    let response = get(&app, "/Home").await;
    assert_eq!(location(&response), "/home");

    let response = get(&app, "/no/such/page").await;
    assert_eq!(location(&response), "/home");
}

#[tokio::test]
async fn test_api_endpoints() {
    let (app, _server) = app_with(Upstream::default(), Settings::default(), AuthStore::memory()).await;

    let repos: serde_json::Value =
        serde_json::from_str(&body_text(get(&app, "/api/github/repos?limit=2").await).await).unwrap();
    assert_eq!(repos.as_array().unwrap().len(), 2);

    let videos: serde_json::Value =
        serde_json::from_str(&body_text(get(&app, "/api/youtube/videos").await).await).unwrap();
    assert_eq!(videos[0]["guid"], "vid0");

    let profile = body_text(get(&app, "/api/profile").await).await;
    assert_eq!(profile, "null");

    let live = get(&app, "/livez").await;
    assert_eq!(live.status(), StatusCode::OK);

    let health: serde_json::Value =
        serde_json::from_str(&body_text(get(&app, "/healthz").await).await).unwrap();
    assert_eq!(health["status"], "healthy");
}
