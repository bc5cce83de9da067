use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),
}

impl From<toml::de::Error> for PortfolioError {
    fn from(e: toml::de::Error) -> Self {
        PortfolioError::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;

/// JSON body for failed API requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for PortfolioError {
    fn into_response(self) -> Response {
        let status = match &self {
            PortfolioError::NotFound(_) => StatusCode::NOT_FOUND,
            PortfolioError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            PortfolioError::ApiError(_) | PortfolioError::NetworkError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}
