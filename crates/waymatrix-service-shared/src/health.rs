//! Health check handlers for Kubernetes health checks.
//!
//! Provides `/health/live` and `/health/ready` endpoints that return JSON
//! status responses for liveness and readiness checks.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health status response for liveness and readiness checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Status indicator, "ok" whenever the service answers.
    pub status: String,

    /// Service name for identification.
    pub service: String,

    /// Service version from build-time.
    pub version: String,

    /// Configured locality source (for readiness check).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            source: None,
        }
    }

    pub fn ready(service: &str, version: &str, source: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            source: Some(source.to_string()),
        }
    }
}

/// Liveness check handler.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"waymatrix-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// Readiness check handler.
///
/// The service holds no preloaded data, and [`AppState`] cannot be built
/// without a locality source, so a running service is always ready. The
/// source itself is not contacted; an outage there surfaces per request as a
/// 502/504 problem.
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let source = state.source().config().location.to_string();
    let status = HealthStatus::ready(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &source);
    (StatusCode::OK, Json(status))
}
