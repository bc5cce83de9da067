use crate::error::{ErrorResponse, PortfolioError};
use crate::health::{health_check, liveness_check};
use crate::models::{Provider, SectionState, UserProfile, YouTubeVideo};
use crate::state::AppState;
use crate::types::Repository;
use crate::views::{self, Tab};
use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Number of repositories shown on the home page
pub const HOME_REPO_LIMIT: usize = 4;

/// Canonical page routes; other casings redirect here
const KNOWN_ROUTES: [&str; 9] = [
    "/home",
    "/login",
    "/authorising",
    "/github",
    "/youtube",
    "/twitch",
    "/twitter",
    "/discord",
    "/logout",
];

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    pub provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuthorisingParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepoParams {
    pub limit: Option<usize>,
}

/// Create the site router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Sections
        .route("/", get(home))
        .route("/home", get(home))
        .route("/github", get(github))
        .route("/youtube", get(youtube))
        .route("/twitch", get(twitch))
        .route("/twitter", get(twitter))
        .route("/discord", get(discord))

        // Mock authorization flow
        .route("/login", get(login))
        .route("/authorising", get(authorising))
        .route("/logout", get(logout).post(logout))

        // JSON
        .route("/api/profile", get(api_profile))
        .route("/api/github/repos", get(api_github_repos))
        .route("/api/youtube/videos", get(api_youtube_videos))

        // Probes
        .route("/healthz", get(health_check))
        .route("/livez", get(liveness_check))

        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn render(state: &AppState, active: Option<Tab>, title: &str, main: &str) -> Html<String> {
    let user = state.auth.current().await;
    Html(views::page(&state.settings, user.as_ref(), active, title, main))
}

async fn home(State(state): State<AppState>) -> Html<String> {
    let settings = &state.settings;
    let (repos, videos) = futures::join!(
        state
            .github
            .repositories_section(&settings.socials.github.username, Some(HOME_REPO_LIMIT)),
        state.youtube.fetch_latest_videos(settings.youtube_handle()),
    );

    let main = views::home(settings, &repos, &videos);
    render(&state, Some(Tab::Home), "Home", &main).await
}

async fn github(State(state): State<AppState>) -> Html<String> {
    let repos = state
        .github
        .repositories_section(&state.settings.socials.github.username, None)
        .await;

    let main = views::github_section(&state.settings, &repos, Tab::GitHub.path());
    render(&state, Some(Tab::GitHub), "GitHub", &main).await
}

async fn youtube(State(state): State<AppState>) -> Html<String> {
    let videos = state
        .youtube
        .fetch_latest_videos(state.settings.youtube_handle())
        .await;

    let main = views::youtube_section(&state.settings, &videos);
    render(&state, Some(Tab::YouTube), "YouTube", &main).await
}

async fn twitch(State(state): State<AppState>) -> Html<String> {
    let main = views::twitch_section(&state.settings);
    render(&state, Some(Tab::Twitch), "Twitch", &main).await
}

async fn twitter(State(state): State<AppState>) -> Html<String> {
    let main = views::twitter_section(&state.settings);
    render(&state, Some(Tab::Twitter), "Twitter", &main).await
}

async fn discord(State(state): State<AppState>) -> Html<String> {
    let main = views::discord_section(&state.settings);
    render(&state, Some(Tab::Discord), "Discord", &main).await
}

/// Full-page navigation to the provider's authorization page
async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> Result<Redirect, PortfolioError> {
    let provider = Provider::from_state(params.provider.as_deref());
    let url = state.oauth.authorization_url(provider)?;
    info!(%provider, "Redirecting to provider authorization");
    Ok(Redirect::to(url.as_str()))
}

async fn authorising(
    State(state): State<AppState>,
    Query(params): Query<AuthorisingParams>,
) -> Response {
    let code = params.code.as_deref().map(str::trim).unwrap_or_default();
    if code.is_empty() {
        debug!("Authorization callback without a code, returning home");
        return Redirect::to("/home").into_response();
    }

    state.authoriser.begin(code, params.state.as_deref());

    let delay = state.authoriser.delay();
    let main = views::authorising(delay);
    let page = render(&state, None, "Authorising", &main).await;

    ([("refresh", refresh_header(delay))], page).into_response()
}

/// Reload target for the authorising page, one second of slack past the delay
fn refresh_header(delay: Duration) -> String {
    format!("{};url=/home", delay.as_millis() / 1000 + 1)
}

async fn logout(State(state): State<AppState>) -> Result<Redirect, PortfolioError> {
    state.authoriser.cancel();
    state.auth.logout().await?;
    Ok(Redirect::to("/home"))
}

async fn api_profile(State(state): State<AppState>) -> Json<Option<UserProfile>> {
    Json(state.auth.current().await)
}

async fn api_github_repos(
    State(state): State<AppState>,
    Query(params): Query<RepoParams>,
) -> Result<Json<Vec<Repository>>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .github
        .repositories_section(&state.settings.socials.github.username, params.limit)
        .await
    {
        SectionState::Failed(message) => Err((
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse { error: message }),
        )),
        SectionState::Ready(repos) => Ok(Json(repos)),
        SectionState::Empty => Ok(Json(Vec::new())),
    }
}

async fn api_youtube_videos(State(state): State<AppState>) -> Json<Vec<YouTubeVideo>> {
    Json(
        state
            .youtube
            .fetch_latest_videos(state.settings.youtube_handle())
            .await,
    )
}

/// Case aliases go to their canonical route; everything else goes home
async fn fallback(uri: Uri) -> Redirect {
    let path = uri.path();
    let normalized = path.trim_end_matches('/').to_ascii_lowercase();

    let target = match KNOWN_ROUTES.iter().find(|route| **route == normalized) {
        Some(route) => match uri.query() {
            Some(query) => format!("{}?{}", route, query),
            None => route.to_string(),
        },
        None => {
            if !normalized.is_empty() {
                debug!(path, "Unknown route, redirecting home");
            }
            "/home".to_string()
        }
    };

    Redirect::to(&target)
}
