use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "portfolio-hub")]
#[command(about = "Portfolio Hub - Serves a personal portfolio aggregating GitHub, YouTube, Twitch, Twitter and Discord")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// TOML file overriding the built-in profile settings
    #[arg(long, env = "SETTINGS_PATH")]
    pub settings: Option<PathBuf>,

    /// JSON file persisting the signed-in profile
    #[arg(long, env = "STORAGE_PATH", default_value = "portfolio_storage.json")]
    pub storage: PathBuf,

    /// Keep the signed-in profile in memory only
    #[arg(long)]
    pub memory: bool,

    /// Optional GitHub token to raise the API rate limit
    #[arg(long, env = "GITHUB_TOKEN")]
    pub github_token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    /// RSS to JSON proxy used for the YouTube feed
    #[arg(long, env = "RSS_PROXY_URL", default_value = "https://api.rss2json.com/v1/api.json")]
    pub rss_proxy_url: String,

    /// Discord OAuth client id
    #[arg(long, env = "DISCORD_CLIENT_ID", default_value = "1434918817141624986")]
    pub discord_client_id: String,

    /// GitHub OAuth client id
    #[arg(long, env = "GITHUB_CLIENT_ID", default_value = "Ov23liMyperson8Demo")]
    pub github_client_id: String,

    /// Callback URL registered with the providers
    #[arg(long, env = "OAUTH_REDIRECT_URI", default_value = "http://localhost:3000/authorising")]
    pub redirect_uri: String,

    /// Delay before the mock authorization signs the visitor in
    #[arg(long, env = "AUTH_DELAY_MS", default_value_t = 2000)]
    pub auth_delay_ms: u64,
}

impl Cli {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
