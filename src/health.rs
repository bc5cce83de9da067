use crate::auth::STORAGE_KEY;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

/// Individual health checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub storage: CheckResult,
    pub authorisation: CheckResult,
}

/// Result of an individual check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Liveness probe response (minimal, just indicates the process is running)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Main health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    // Local storage must stay readable for the signed-in profile to survive restarts
    let storage_check = match state.auth.storage().get(STORAGE_KEY).await {
        Ok(_) => CheckResult {
            status: HealthStatus::Healthy,
            message: match state.auth.storage().path() {
                Some(_) => None,
                None => Some("Profile storage is memory-only".to_string()),
            },
        },
        Err(e) => {
            warn!(error = %e, "Profile storage unreadable");
            CheckResult {
                status: HealthStatus::Degraded,
                message: Some(format!("Profile storage unreadable: {}", e)),
            }
        }
    };

    let authorisation_check = CheckResult {
        status: HealthStatus::Healthy,
        message: state
            .authoriser
            .is_pending()
            .then(|| "Authorization in progress".to_string()),
    };

    let overall_status = if storage_check.status == HealthStatus::Healthy
        && authorisation_check.status == HealthStatus::Healthy
    {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        checks: HealthChecks {
            storage: storage_check,
            authorisation: authorisation_check,
        },
    };

    // Degraded still serves pages
    (StatusCode::OK, Json(response))
}

/// Liveness probe - just checks if the process is alive
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(LivenessResponse {
            status: "alive".to_string(),
        }),
    )
}
