use anyhow::Context;
use clap::Parser;
use colored::*;
use portfolio_hub::auth::{AuthStore, LocalStorage};
use portfolio_hub::cli::Cli;
use portfolio_hub::github::GitHubClient;
use portfolio_hub::oauth::OAuthConfig;
use portfolio_hub::routes::create_router;
use portfolio_hub::settings::Settings;
use portfolio_hub::state::AppState;
use portfolio_hub::youtube::YouTubeClient;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "Portfolio Hub".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    let settings = Settings::load(cli.settings.as_deref())
        .context("Failed to load settings")?;

    println!("👤 Serving the portfolio of {}", settings.profile.display_name.bold());

    let storage = if cli.memory {
        println!("{}", "Profile storage is memory-only".yellow());
        LocalStorage::memory()
    } else {
        println!("💾 Profile storage: {}", cli.storage.display());
        LocalStorage::new(Some(cli.storage.clone()))
    };

    let auth = AuthStore::open(storage)
        .await
        .context("Failed to open profile storage")?;

    let github = GitHubClient::with_base_url(&cli.github_api_url, cli.github_token.clone())
        .context("Failed to create GitHub client")?;
    let youtube = YouTubeClient::with_proxy_url(&cli.rss_proxy_url)
        .context("Failed to create YouTube client")?;

    let oauth = OAuthConfig {
        discord_client_id: cli.discord_client_id.clone(),
        github_client_id: cli.github_client_id.clone(),
        redirect_uri: cli.redirect_uri.clone(),
        delay: Duration::from_millis(cli.auth_delay_ms),
        ..Default::default()
    };

    let state = AppState::new(settings, github, youtube, auth, oauth);
    let app = create_router(state);

    let addr = cli.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!("✅ Listening on http://{}", addr);
    println!("\nPress Ctrl+C to stop the server\n");
    info!(%addr, "Portfolio server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("✅ Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    println!("\n🛑 Shutting down server...");
}
